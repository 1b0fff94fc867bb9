use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::common::StatusSentinels;
use crate::entity::problems::{self, ProblemStatus};
use crate::error::{AppError, AppResult};
use crate::workflow::ledger;

/// Resolution notes below this many characters are rejected before any write.
pub const MIN_RESOLUTION_NOTES: usize = 10;

/// Close a problem and reconcile the ledger.
///
/// Atomically marks the problem resolved and, when it was the last unresolved
/// problem on its PDV, appends one "Ok" ledger entry prefixed `[SOLUÇÃO]` so
/// the status resolver falls back to "Ok" naturally.
///
/// The remaining-problem count sees whatever the store's isolation level
/// shows; two overlapping resolutions on one PDV may miscount. Accepted
/// limitation, documented in DESIGN.md.
///
/// # Errors
///
/// `BadRequest` for short notes or an already-resolved problem (the lifecycle
/// is terminal), `NotFound` for an unknown problem id.
pub async fn resolve_problem(
    db: &DatabaseConnection,
    sentinels: StatusSentinels,
    problem_id: i32,
    resolution_notes: &str,
    resolved_by: i32,
) -> AppResult<()> {
    if resolution_notes.chars().count() < MIN_RESOLUTION_NOTES {
        return Err(AppError::BadRequest(format!(
            "resolution notes must be at least {MIN_RESOLUTION_NOTES} characters"
        )));
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    let problem = problems::Entity::find_by_id(problem_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Problem {problem_id} not found")))?;

    if problem.status == ProblemStatus::Resolved {
        return Err(AppError::BadRequest(format!(
            "Problem {problem_id} is already resolved"
        )));
    }

    let pdv_id = problem.pdv_id;

    let mut resolved: problems::ActiveModel = problem.into();
    resolved.status = Set(ProblemStatus::Resolved);
    resolved.resolution_notes = Set(Some(resolution_notes.to_string()));
    resolved.resolved_at = Set(Some(now));
    resolved.resolved_by_user_id = Set(Some(resolved_by));
    resolved.update(&txn).await?;

    let remaining = problems::Entity::find()
        .filter(problems::Column::PdvId.eq(pdv_id))
        .filter(problems::Column::Status.ne(ProblemStatus::Resolved))
        .count(&txn)
        .await?;
    let reconciled = remaining == 0;

    if reconciled {
        ledger::append_entry(
            &txn,
            pdv_id,
            sentinels.ok,
            &format!("[SOLUÇÃO] {resolution_notes}"),
            Some(resolved_by),
            None,
            now,
        )
        .await?;
    }

    txn.commit().await?;

    tracing::info!(problem_id, pdv_id, reconciled, "Problem resolved");
    Ok(())
}
