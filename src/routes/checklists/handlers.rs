use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::common::{AppState, TechIdentity};
use crate::entity::checklists::{self, ChecklistStatus};
use crate::error::{AppError, AppResult};
use crate::routes::resolve_store;
use crate::workflow::{self, ChecklistSave};

use super::types::{
    ChecklistResponse, ChecklistsQuery, SaveChecklistRequest, SaveChecklistResponse, TodayQuery,
};

/// Get today's checklist for a store
#[utoipa::path(
    get,
    path = "/api/checklists/today",
    params(TodayQuery),
    responses(
        (status = 200, description = "Checklist retrieved successfully", body = ChecklistResponse),
        (status = 404, description = "No checklist for today"),
    ),
    tag = "checklists"
)]
pub async fn get_today_checklist(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> AppResult<Json<ChecklistResponse>> {
    let today = Utc::now().date_naive();

    let checklist = checklists::Entity::find()
        .filter(checklists::Column::StoreId.eq(query.store_id))
        .filter(checklists::Column::Date.eq(today))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No checklist for today".to_string()))?;

    Ok(Json(checklist.into()))
}

/// List completed checklists, newest first
#[utoipa::path(
    get,
    path = "/api/checklists",
    params(ChecklistsQuery),
    responses(
        (status = 200, description = "Checklists retrieved successfully", body = Vec<ChecklistResponse>),
    ),
    tag = "checklists"
)]
pub async fn list_checklists(
    State(state): State<AppState>,
    Query(query): Query<ChecklistsQuery>,
) -> AppResult<Json<Vec<ChecklistResponse>>> {
    let mut db_query = checklists::Entity::find()
        .filter(checklists::Column::Status.eq(ChecklistStatus::Completed));

    if let Some(store_id) = query.store_id {
        db_query = db_query.filter(checklists::Column::StoreId.eq(store_id));
    }

    let rows = db_query
        .order_by_desc(checklists::Column::Date)
        .all(&state.db)
        .await?;

    let response: Vec<ChecklistResponse> = rows.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

/// Get a specific checklist by id
#[utoipa::path(
    get,
    path = "/api/checklists/{checklist_id}",
    params(
        ("checklist_id" = i32, Path, description = "Checklist id"),
    ),
    responses(
        (status = 200, description = "Checklist retrieved successfully", body = ChecklistResponse),
        (status = 404, description = "Checklist not found"),
    ),
    tag = "checklists"
)]
pub async fn get_checklist(
    State(state): State<AppState>,
    Path(checklist_id): Path<i32>,
) -> AppResult<Json<ChecklistResponse>> {
    let checklist = checklists::Entity::find_by_id(checklist_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Checklist {checklist_id} not found")))?;

    Ok(Json(checklist.into()))
}

/// Save a checklist
///
/// Upserts by id or by (store, date). Saving with status "completed" runs
/// the finalization fan-out once: one ledger entry per check carrying a new
/// status, plus a problem for every non-"Ok" status, all in one transaction
/// with the checklist row itself. Repeating a completed save is a no-op.
#[utoipa::path(
    post,
    path = "/api/checklists",
    request_body = SaveChecklistRequest,
    responses(
        (status = 200, description = "Checklist updated", body = SaveChecklistResponse),
        (status = 201, description = "Checklist created", body = SaveChecklistResponse),
        (status = 400, description = "Malformed payload or completed checklist being reopened"),
        (status = 404, description = "Store or checklist not found"),
    ),
    tag = "checklists"
)]
pub async fn save_checklist(
    State(state): State<AppState>,
    tech: TechIdentity,
    Json(body): Json<SaveChecklistRequest>,
) -> AppResult<(StatusCode, Json<SaveChecklistResponse>)> {
    resolve_store(&state.db, body.store_id).await?;

    let outcome = workflow::save_checklist(
        &state.db,
        state.sentinels,
        ChecklistSave {
            id: body.id,
            store_id: body.store_id,
            date: body.date,
            status: body.status,
            pdv_checks: body.pdv_checks,
        },
        tech.id,
    )
    .await?;

    let code = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((code, Json(SaveChecklistResponse { id: outcome.id })))
}
