pub mod checklists;
pub mod health;
pub mod pdvs;
pub mod problems;
mod rate_limit;
pub mod status_types;

use axum::{
    routing::{get, post, put},
    Router,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::error::{AppError, AppResult};

/// Look up a PDV or fail with 404.
pub async fn resolve_pdv(
    db: &DatabaseConnection,
    pdv_id: i32,
) -> AppResult<crate::entity::pdvs::Model> {
    crate::entity::pdvs::Entity::find_by_id(pdv_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("PDV {pdv_id} not found")))
}

/// Look up a store or fail with 404.
pub async fn resolve_store(
    db: &DatabaseConnection,
    store_id: i32,
) -> AppResult<crate::entity::stores::Model> {
    crate::entity::stores::Entity::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Store {store_id} not found")))
}

/// Status reference data keyed by id, for joining names/colors into responses.
pub(crate) async fn status_map(
    db: &DatabaseConnection,
) -> AppResult<std::collections::HashMap<i32, crate::entity::status_types::Model>> {
    Ok(crate::entity::status_types::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        status_types::list_status_types,
        pdvs::list_store_pdvs_with_status,
        pdvs::get_pdv_status,
        pdvs::list_pdv_history,
        pdvs::record_pdv_status,
        pdvs::list_recurring_problems,
        problems::list_pdv_problems,
        problems::get_problem,
        problems::resolve_problem,
        checklists::get_today_checklist,
        checklists::list_checklists,
        checklists::get_checklist,
        checklists::save_checklist,
    ),
    components(
        schemas(
            status_types::StatusTypeResponse,
            pdvs::PdvStatusResponse,
            pdvs::PdvWithStatusResponse,
            pdvs::HistoryEntryResponse,
            pdvs::NewStatusEventRequest,
            pdvs::RecurringProblemResponse,
            problems::ProblemSummaryResponse,
            problems::ProblemDetailResponse,
            problems::ResolveProblemRequest,
            checklists::ChecklistResponse,
            checklists::SaveChecklistRequest,
            checklists::SaveChecklistResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "reference", description = "Status reference data"),
        (name = "pdvs", description = "PDV status ledger and derived status"),
        (name = "problems", description = "Problem lifecycle"),
        (name = "checklists", description = "Daily per-store checklists"),
    ),
    info(
        title = "Painel TI API",
        description = "Retail IT-operations API: PDV health ledger, problems and daily checklists",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            rate = %format!("{}/s burst {}", config.rate_limit_per_second, config.rate_limit_burst),
            "Rate limiting configured"
        );
    }

    let api_routes_base = Router::new()
        .route("/status-types", get(status_types::list_status_types))
        .route(
            "/stores/{store_id}/pdvs-with-status",
            get(pdvs::list_store_pdvs_with_status),
        )
        .route("/pdvs/{pdv_id}/status", get(pdvs::get_pdv_status))
        .route("/pdvs/{pdv_id}/history", get(pdvs::list_pdv_history))
        .route("/pdvs/{pdv_id}/status-history", post(pdvs::record_pdv_status))
        .route(
            "/pdvs/{pdv_id}/recurring-problems",
            get(pdvs::list_recurring_problems),
        )
        .route("/pdvs/{pdv_id}/problems", get(problems::list_pdv_problems))
        .route("/problems/{problem_id}", get(problems::get_problem))
        .route("/problems/{problem_id}/resolve", put(problems::resolve_problem))
        .route(
            "/checklists",
            get(checklists::list_checklists).post(checklists::save_checklist),
        )
        .route("/checklists/today", get(checklists::get_today_checklist))
        .route("/checklists/{checklist_id}", get(checklists::get_checklist));

    // Combine API routes, conditionally applying rate limiting
    let api_routes = if config.disable_rate_limiting {
        api_routes_base
    } else {
        let limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to create rate limiter");

        api_routes_base.layer(GovernorLayer {
            config: Arc::new(limiter),
        })
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
