use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Derived display status of a PDV
#[derive(Debug, Serialize, ToSchema)]
pub struct PdvStatusResponse {
    pub status_id: i32,
    pub status_name: Option<String>,
    pub status_color: Option<String>,
    pub description: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub tech_name: Option<String>,
}

/// PDV with its derived status, for the store dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct PdvWithStatusResponse {
    pub id: i32,
    pub number: String,
    pub store_id: i32,
    pub last_status: PdvStatusResponse,
}

/// Status ledger entry
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryResponse {
    pub id: i32,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub status_id: i32,
    pub status_name: Option<String>,
    pub status_color: Option<String>,
    pub tech_name: Option<String>,
    pub item_id: Option<i32>,
}

/// New status observation for a PDV
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewStatusEventRequest {
    pub status_id: i32,
    pub description: String,
    pub item_id: Option<i32>,
}

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Maximum entries to return (default 20, max 200)
    #[serde(default = "default_history_limit")]
    pub limit: u64,
}

fn default_history_limit() -> u64 {
    20
}

/// Ledger entries grouped by referenced item
#[derive(Debug, Serialize, ToSchema)]
pub struct RecurringProblemResponse {
    pub item_name: String,
    pub count: i64,
}
