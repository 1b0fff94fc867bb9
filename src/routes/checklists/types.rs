use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::checklists::{self, ChecklistStatus, PdvCheck};

/// Checklist record with its per-PDV check results
#[derive(Debug, Serialize, ToSchema)]
pub struct ChecklistResponse {
    pub id: i32,
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub status: ChecklistStatus,
    #[schema(value_type = Vec<Object>)]
    pub pdv_checks: Vec<PdvCheck>,
    pub store_id: i32,
    pub finalized_by_user_id: Option<i32>,
}

impl From<checklists::Model> for ChecklistResponse {
    fn from(model: checklists::Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            status: model.status,
            pdv_checks: model.pdv_checks.0,
            store_id: model.store_id,
            finalized_by_user_id: model.finalized_by_user_id,
        }
    }
}

/// Autosave/finalize payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveChecklistRequest {
    /// Existing checklist to update; omitted on first save of the day
    pub id: Option<i32>,
    pub store_id: i32,
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub status: ChecklistStatus,
    #[schema(value_type = Vec<Object>)]
    pub pdv_checks: Vec<PdvCheck>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveChecklistResponse {
    pub id: i32,
}

/// Query parameters for today's checklist
#[derive(Debug, Deserialize, IntoParams)]
pub struct TodayQuery {
    pub store_id: i32,
}

/// Query parameters for the completed-checklist listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ChecklistsQuery {
    /// Filter by store id
    pub store_id: Option<i32>,
}
