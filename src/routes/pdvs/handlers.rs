use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    TransactionTrait,
};
use std::collections::HashMap;

use crate::common::{AppState, TechIdentity};
use crate::entity::{pdv_items, status_history, status_types, users};
use crate::error::{AppError, AppResult};
use crate::routes::{resolve_pdv, resolve_store, status_map};
use crate::workflow::{self, CurrentStatus, NewStatusEvent};

use super::types::{
    HistoryEntryResponse, HistoryQuery, NewStatusEventRequest, PdvStatusResponse,
    PdvWithStatusResponse, RecurringProblemResponse,
};

/// List a store's PDVs with their derived status
#[utoipa::path(
    get,
    path = "/api/stores/{store_id}/pdvs-with-status",
    params(
        ("store_id" = i32, Path, description = "Store id"),
    ),
    responses(
        (status = 200, description = "PDVs retrieved successfully", body = Vec<PdvWithStatusResponse>),
        (status = 404, description = "Store not found"),
    ),
    tag = "pdvs"
)]
pub async fn list_store_pdvs_with_status(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> AppResult<Json<Vec<PdvWithStatusResponse>>> {
    resolve_store(&state.db, store_id).await?;

    let statuses = workflow::store_statuses(&state.db, state.sentinels, store_id).await?;
    let status_ref = status_map(&state.db).await?;

    let response: Vec<PdvWithStatusResponse> = statuses
        .into_iter()
        .map(|(pdv, status)| PdvWithStatusResponse {
            id: pdv.id,
            number: pdv.number,
            store_id: pdv.store_id,
            last_status: status_view(&status_ref, status),
        })
        .collect();

    Ok(Json(response))
}

/// Get the derived status of a PDV
#[utoipa::path(
    get,
    path = "/api/pdvs/{pdv_id}/status",
    params(
        ("pdv_id" = i32, Path, description = "PDV id"),
    ),
    responses(
        (status = 200, description = "Status derived successfully", body = PdvStatusResponse),
        (status = 404, description = "PDV not found"),
    ),
    tag = "pdvs"
)]
pub async fn get_pdv_status(
    State(state): State<AppState>,
    Path(pdv_id): Path<i32>,
) -> AppResult<Json<PdvStatusResponse>> {
    let pdv = resolve_pdv(&state.db, pdv_id).await?;

    let status = workflow::current_status(&state.db, state.sentinels, pdv.id).await?;
    let status_ref = status_map(&state.db).await?;

    Ok(Json(status_view(&status_ref, status)))
}

/// List the latest ledger entries of a PDV
#[utoipa::path(
    get,
    path = "/api/pdvs/{pdv_id}/history",
    params(
        ("pdv_id" = i32, Path, description = "PDV id"),
        HistoryQuery,
    ),
    responses(
        (status = 200, description = "History retrieved successfully", body = Vec<HistoryEntryResponse>),
        (status = 404, description = "PDV not found"),
    ),
    tag = "pdvs"
)]
pub async fn list_pdv_history(
    State(state): State<AppState>,
    Path(pdv_id): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<HistoryEntryResponse>>> {
    let pdv = resolve_pdv(&state.db, pdv_id).await?;
    let limit = query.limit.clamp(1, 200);

    let entries = status_history::Entity::find()
        .find_also_related(users::Entity)
        .filter(status_history::Column::PdvId.eq(pdv.id))
        .order_by_desc(status_history::Column::Timestamp)
        .order_by_desc(status_history::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?;

    let status_ref = status_map(&state.db).await?;

    let response: Vec<HistoryEntryResponse> = entries
        .into_iter()
        .map(|(entry, tech)| {
            let status = status_ref.get(&entry.status_id);
            HistoryEntryResponse {
                id: entry.id,
                description: entry.description,
                timestamp: entry.timestamp,
                status_id: entry.status_id,
                status_name: status.map(|s| s.name.clone()),
                status_color: status.map(|s| s.color.clone()),
                tech_name: tech.map(|u| u.name),
                item_id: entry.item_id,
            }
        })
        .collect();

    Ok(Json(response))
}

/// Record a status observation for a PDV
///
/// Appends a ledger entry and, for any status other than "Ok", opens a
/// problem in the same transaction.
#[utoipa::path(
    post,
    path = "/api/pdvs/{pdv_id}/status-history",
    params(
        ("pdv_id" = i32, Path, description = "PDV id"),
    ),
    request_body = NewStatusEventRequest,
    responses(
        (status = 201, description = "Status recorded", body = HistoryEntryResponse),
        (status = 400, description = "Missing status or description"),
        (status = 404, description = "PDV not found"),
    ),
    tag = "pdvs"
)]
pub async fn record_pdv_status(
    State(state): State<AppState>,
    tech: TechIdentity,
    Path(pdv_id): Path<i32>,
    Json(body): Json<NewStatusEventRequest>,
) -> AppResult<(StatusCode, Json<HistoryEntryResponse>)> {
    // validation happens before the transaction opens
    let description = body.description.trim();
    if description.is_empty() {
        return Err(AppError::BadRequest("description is required".to_string()));
    }
    let status = status_types::Entity::find_by_id(body.status_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown status {}", body.status_id)))?;
    let pdv = resolve_pdv(&state.db, pdv_id).await?;

    let txn = state.db.begin().await?;
    let entry = workflow::record_status_event(
        &txn,
        state.sentinels,
        NewStatusEvent {
            pdv_id: pdv.id,
            status_id: body.status_id,
            description: description.to_string(),
            item_id: body.item_id,
            tech_id: tech.id,
        },
        Utc::now(),
    )
    .await?;
    txn.commit().await?;

    let response = HistoryEntryResponse {
        id: entry.id,
        description: entry.description,
        timestamp: entry.timestamp,
        status_id: entry.status_id,
        status_name: Some(status.name),
        status_color: Some(status.color),
        tech_name: Some(tech.name),
        item_id: entry.item_id,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Count ledger entries per referenced item
#[utoipa::path(
    get,
    path = "/api/pdvs/{pdv_id}/recurring-problems",
    params(
        ("pdv_id" = i32, Path, description = "PDV id"),
    ),
    responses(
        (status = 200, description = "Counts retrieved successfully", body = Vec<RecurringProblemResponse>),
        (status = 404, description = "PDV not found"),
    ),
    tag = "pdvs"
)]
pub async fn list_recurring_problems(
    State(state): State<AppState>,
    Path(pdv_id): Path<i32>,
) -> AppResult<Json<Vec<RecurringProblemResponse>>> {
    let pdv = resolve_pdv(&state.db, pdv_id).await?;

    let mut rows: Vec<(String, i64)> = status_history::Entity::find()
        .select_only()
        .column_as(pdv_items::Column::Name, "item_name")
        .column_as(status_history::Column::Id.count(), "count")
        .join(JoinType::InnerJoin, status_history::Relation::Item.def())
        .filter(status_history::Column::PdvId.eq(pdv.id))
        .group_by(pdv_items::Column::Name)
        .into_tuple()
        .all(&state.db)
        .await?;

    rows.sort_by(|a, b| b.1.cmp(&a.1));

    let response: Vec<RecurringProblemResponse> = rows
        .into_iter()
        .map(|(item_name, count)| RecurringProblemResponse { item_name, count })
        .collect();

    Ok(Json(response))
}

fn status_view(
    status_ref: &HashMap<i32, status_types::Model>,
    status: CurrentStatus,
) -> PdvStatusResponse {
    let status_type = status_ref.get(&status.status_id);
    PdvStatusResponse {
        status_id: status.status_id,
        status_name: status_type.map(|s| s.name.clone()),
        status_color: status_type.map(|s| s.color.clone()),
        description: status.description,
        timestamp: status.timestamp,
        tech_name: status.tech_name,
    }
}
