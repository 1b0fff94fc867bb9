use axum::{extract::State, Json};
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::entity::status_types;
use crate::error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusTypeResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
}

/// List all status types
#[utoipa::path(
    get,
    path = "/api/status-types",
    responses(
        (status = 200, description = "Status types retrieved successfully", body = Vec<StatusTypeResponse>),
    ),
    tag = "reference"
)]
pub async fn list_status_types(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StatusTypeResponse>>> {
    let types = status_types::Entity::find()
        .order_by_asc(status_types::Column::Id)
        .all(&state.db)
        .await?;

    let response: Vec<StatusTypeResponse> = types
        .into_iter()
        .map(|s| StatusTypeResponse {
            id: s.id,
            name: s.name,
            color: s.color,
        })
        .collect();

    Ok(Json(response))
}
