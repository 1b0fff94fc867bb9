use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::common::StatusSentinels;
use crate::entity::checklists::{self, CheckResult, ChecklistStatus, PdvCheck, PdvChecks};
use crate::error::{AppError, AppResult};
use crate::workflow::ledger::{self, ProblemSeed};

/// Upsert payload for a daily checklist.
#[derive(Debug, Clone)]
pub struct ChecklistSave {
    /// Existing row to update; `None` falls back to the (store, date) key.
    pub id: Option<i32>,
    pub store_id: i32,
    pub date: chrono::NaiveDate,
    pub status: ChecklistStatus,
    pub pdv_checks: Vec<PdvCheck>,
}

#[derive(Debug, Clone, Copy)]
pub struct SaveOutcome {
    pub id: i32,
    pub created: bool,
    /// Whether this save ran the finalization fan-out.
    pub finalized: bool,
}

/// Save a checklist; when the save transitions it to completed, fan out the
/// ledger and problem writes for every check carrying a new status.
///
/// The checklist upsert and the whole fan-out share one transaction: either
/// every eligible check produces its history/problem rows and the checklist
/// lands completed, or nothing is committed.
///
/// Finalization side effects run only on the first transition to completed.
/// A repeated completed save is accepted and returns the id without writing
/// anything, so retries cannot duplicate history or problem rows.
pub async fn save_checklist(
    db: &DatabaseConnection,
    sentinels: StatusSentinels,
    save: ChecklistSave,
    acting_user_id: i32,
) -> AppResult<SaveOutcome> {
    let now = Utc::now();
    let txn = db.begin().await?;

    let existing = match save.id {
        Some(id) => Some(
            checklists::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Checklist {id} not found")))?,
        ),
        None => {
            checklists::Entity::find()
                .filter(checklists::Column::StoreId.eq(save.store_id))
                .filter(checklists::Column::Date.eq(save.date))
                .one(&txn)
                .await?
        }
    };

    if let Some(row) = existing
        .as_ref()
        .filter(|c| c.status == ChecklistStatus::Completed)
    {
        // completed is terminal: reopening is rejected, a repeated completed
        // save is a no-op
        if save.status != ChecklistStatus::Completed {
            return Err(AppError::BadRequest(format!(
                "Checklist {} is already completed",
                row.id
            )));
        }
        return Ok(SaveOutcome {
            id: row.id,
            created: false,
            finalized: false,
        });
    }

    let created = existing.is_none();
    let finalizing = save.status == ChecklistStatus::Completed;
    let finalized_by = finalizing.then_some(acting_user_id);
    let checks = PdvChecks(save.pdv_checks.clone());

    let checklist_id = match existing {
        Some(row) => {
            let id = row.id;
            let mut active: checklists::ActiveModel = row.into();
            active.status = Set(save.status.clone());
            active.pdv_checks = Set(checks);
            active.finalized_by_user_id = Set(finalized_by);
            active.update(&txn).await?;
            id
        }
        None => {
            checklists::ActiveModel {
                date: Set(save.date),
                status: Set(save.status.clone()),
                pdv_checks: Set(checks),
                store_id: Set(save.store_id),
                finalized_by_user_id: Set(finalized_by),
                ..Default::default()
            }
            .insert(&txn)
            .await?
            .id
        }
    };

    if finalizing {
        for check in &save.pdv_checks {
            // checks without a new status (e.g. result=busy) write nothing
            let Some(new_status_id) = check.new_status_id else {
                continue;
            };

            let observation = check
                .observation
                .as_deref()
                .filter(|o| !o.trim().is_empty());
            let default_phrase = match check.result {
                CheckResult::Ok => "Tudo OK.",
                CheckResult::Problem | CheckResult::Busy => "Problema reportado.",
            };
            let description = format!("[CHECKLIST] {}", observation.unwrap_or(default_phrase));

            ledger::append_entry(
                &txn,
                check.pdv_id,
                new_status_id,
                &description,
                Some(acting_user_id),
                None,
                now,
            )
            .await?;

            if !sentinels.is_ok(new_status_id) {
                ledger::open_problem(
                    &txn,
                    ProblemSeed {
                        pdv_id: check.pdv_id,
                        item_id: check.issue_item_id(),
                        reported_by: acting_user_id,
                        description: &description,
                        origin_status_id: new_status_id,
                        at: now,
                    },
                )
                .await?;
            }
        }
    }

    txn.commit().await?;

    if finalizing {
        tracing::info!(
            checklist_id,
            store_id = save.store_id,
            checks = save.pdv_checks.len(),
            "Checklist finalized"
        );
    }

    Ok(SaveOutcome {
        id: checklist_id,
        created,
        finalized: finalizing,
    })
}
