use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use std::collections::HashMap;

use crate::common::{AppState, TechIdentity};
use crate::entity::{pdv_items, problems, users};
use crate::error::{AppError, AppResult};
use crate::routes::{resolve_pdv, status_map};
use crate::workflow;

use super::types::{ProblemDetailResponse, ProblemSummaryResponse, ResolveProblemRequest};

/// List the five most recent problems of a PDV
#[utoipa::path(
    get,
    path = "/api/pdvs/{pdv_id}/problems",
    params(
        ("pdv_id" = i32, Path, description = "PDV id"),
    ),
    responses(
        (status = 200, description = "Problems retrieved successfully", body = Vec<ProblemSummaryResponse>),
        (status = 404, description = "PDV not found"),
    ),
    tag = "problems"
)]
pub async fn list_pdv_problems(
    State(state): State<AppState>,
    Path(pdv_id): Path<i32>,
) -> AppResult<Json<Vec<ProblemSummaryResponse>>> {
    let pdv = resolve_pdv(&state.db, pdv_id).await?;

    let problem_rows = problems::Entity::find()
        .filter(problems::Column::PdvId.eq(pdv.id))
        .order_by_desc(problems::Column::CreatedAt)
        .order_by_desc(problems::Column::Id)
        .limit(5)
        .all(&state.db)
        .await?;

    let status_ref = status_map(&state.db).await?;
    let user_names = user_names(&state.db).await?;
    let item_names = item_names(&state.db).await?;

    let response: Vec<ProblemSummaryResponse> = problem_rows
        .into_iter()
        .map(|p| {
            let status_type = status_ref.get(&p.origin_status_id);
            ProblemSummaryResponse {
                id: p.id,
                status: p.status,
                title: p.title,
                created_at: p.created_at,
                resolved_at: p.resolved_at,
                reported_by_tech_name: p
                    .reported_by_user_id
                    .and_then(|id| user_names.get(&id).cloned()),
                resolved_by_tech_name: p
                    .resolved_by_user_id
                    .and_then(|id| user_names.get(&id).cloned()),
                status_name: status_type.map(|s| s.name.clone()),
                status_color: status_type.map(|s| s.color.clone()),
                item_name: p.item_id.and_then(|id| item_names.get(&id).cloned()),
            }
        })
        .collect();

    Ok(Json(response))
}

/// Get a specific problem by id
#[utoipa::path(
    get,
    path = "/api/problems/{problem_id}",
    params(
        ("problem_id" = i32, Path, description = "Problem id"),
    ),
    responses(
        (status = 200, description = "Problem retrieved successfully", body = ProblemDetailResponse),
        (status = 404, description = "Problem not found"),
    ),
    tag = "problems"
)]
pub async fn get_problem(
    State(state): State<AppState>,
    Path(problem_id): Path<i32>,
) -> AppResult<Json<ProblemDetailResponse>> {
    let problem = problems::Entity::find_by_id(problem_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Problem {problem_id} not found")))?;

    let reported_by_tech_name = match problem.reported_by_user_id {
        Some(id) => users::Entity::find_by_id(id)
            .one(&state.db)
            .await?
            .map(|u| u.name),
        None => None,
    };
    let item_name = match problem.item_id {
        Some(id) => pdv_items::Entity::find_by_id(id)
            .one(&state.db)
            .await?
            .map(|i| i.name),
        None => None,
    };

    Ok(Json(ProblemDetailResponse {
        id: problem.id,
        title: problem.title,
        description: problem.description,
        created_at: problem.created_at,
        status: problem.status,
        reported_by_tech_name,
        item_name,
    }))
}

/// Resolve a problem
///
/// Marks the problem resolved and, when it was the PDV's last open problem,
/// appends one reconciling "Ok" ledger entry in the same transaction.
#[utoipa::path(
    put,
    path = "/api/problems/{problem_id}/resolve",
    params(
        ("problem_id" = i32, Path, description = "Problem id"),
    ),
    request_body = ResolveProblemRequest,
    responses(
        (status = 204, description = "Problem resolved"),
        (status = 400, description = "Notes too short or problem already resolved"),
        (status = 404, description = "Problem not found"),
    ),
    tag = "problems"
)]
pub async fn resolve_problem(
    State(state): State<AppState>,
    tech: TechIdentity,
    Path(problem_id): Path<i32>,
    Json(body): Json<ResolveProblemRequest>,
) -> AppResult<StatusCode> {
    workflow::resolve_problem(
        &state.db,
        state.sentinels,
        problem_id,
        &body.resolution_notes,
        tech.id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn user_names(db: &DatabaseConnection) -> AppResult<HashMap<i32, String>> {
    Ok(users::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect())
}

async fn item_names(db: &DatabaseConnection) -> AppResult<HashMap<i32, String>> {
    Ok(pdv_items::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|i| (i.id, i.name))
        .collect())
}
