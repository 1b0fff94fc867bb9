use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::problems::ProblemStatus;

/// Brief problem record for PDV detail views
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemSummaryResponse {
    pub id: i32,
    #[schema(value_type = String)]
    pub status: ProblemStatus,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub reported_by_tech_name: Option<String>,
    pub resolved_by_tech_name: Option<String>,
    pub status_name: Option<String>,
    pub status_color: Option<String>,
    pub item_name: Option<String>,
}

/// Full problem record
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetailResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub status: ProblemStatus,
    pub reported_by_tech_name: Option<String>,
    pub item_name: Option<String>,
}

/// Resolution payload; notes shorter than 10 characters are rejected
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveProblemRequest {
    pub resolution_notes: String,
}
