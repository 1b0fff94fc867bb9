//! Checklist autosave/finalization tests.
//!
//! Run with: cargo test --test checklist_test

mod common;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use painel_ti::entity::checklists::{self, CheckResult, ChecklistStatus, PdvCheck};
use painel_ti::entity::{problems, status_history};
use painel_ti::error::AppError;
use painel_ti::workflow::{self, ChecklistSave};

use common::{ADMIN_ID, PDV_101, PDV_102, PDV_103, STORE_ID};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

fn check_ok(pdv_id: i32, ok_status: i32) -> PdvCheck {
    PdvCheck {
        pdv_id,
        result: CheckResult::Ok,
        new_status_id: Some(ok_status),
        observation: None,
        issues: vec![],
    }
}

async fn total_history(ctx: &common::TestContext) -> u64 {
    status_history::Entity::find().count(&ctx.db).await.unwrap()
}

async fn total_problems(ctx: &common::TestContext) -> u64 {
    problems::Entity::find().count(&ctx.db).await.unwrap()
}

// Two checks with new statuses produce two ledger entries and one
// problem, and the checklist lands completed.
#[tokio::test]
async fn finalize_fans_out_history_and_problems() {
    let ctx = common::setup().await;
    let maintenance = common::status_id_by_name(&ctx.db, "Manutenção").await;

    let outcome = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: vec![
                check_ok(PDV_101, ctx.sentinels.ok),
                PdvCheck {
                    pdv_id: PDV_102,
                    result: CheckResult::Problem,
                    new_status_id: Some(maintenance),
                    observation: Some("Tecla travada".to_string()),
                    issues: vec!["std-2".to_string()],
                },
            ],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();

    assert!(outcome.created);
    assert!(outcome.finalized);

    let checklist = checklists::Entity::find_by_id(outcome.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(checklist.status, ChecklistStatus::Completed);
    assert_eq!(checklist.finalized_by_user_id, Some(ADMIN_ID));
    assert_eq!(checklist.pdv_checks.0.len(), 2);
    assert_eq!(checklist.pdv_checks.0[0].pdv_id, PDV_101);
    assert_eq!(checklist.pdv_checks.0[1].pdv_id, PDV_102);

    assert_eq!(total_history(&ctx).await, 2);
    assert_eq!(total_problems(&ctx).await, 1);

    let ok_entry = status_history::Entity::find()
        .filter(status_history::Column::PdvId.eq(PDV_101))
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ok_entry.description, "[CHECKLIST] Tudo OK.");
    assert_eq!(ok_entry.status_id, ctx.sentinels.ok);
    assert_eq!(ok_entry.tech_id, Some(ADMIN_ID));

    let problem = problems::Entity::find()
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(problem.pdv_id, PDV_102);
    assert_eq!(problem.origin_status_id, maintenance);
    assert_eq!(problem.item_id, Some(2));
    assert_eq!(problem.title, "[CHECKLIST] Tecla travada");

    // derived statuses follow the fan-out
    let status_101 = workflow::current_status(&ctx.db, ctx.sentinels, PDV_101)
        .await
        .unwrap();
    assert_eq!(status_101.status_id, ctx.sentinels.ok);
    let status_102 = workflow::current_status(&ctx.db, ctx.sentinels, PDV_102)
        .await
        .unwrap();
    assert_eq!(status_102.status_id, maintenance);
}

#[tokio::test]
async fn checks_without_new_status_write_nothing() {
    let ctx = common::setup().await;

    let outcome = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: vec![PdvCheck {
                pdv_id: PDV_103,
                result: CheckResult::Busy,
                new_status_id: None,
                observation: Some("Fila no caixa".to_string()),
                issues: vec![],
            }],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();

    assert!(outcome.finalized);
    assert_eq!(total_history(&ctx).await, 0);
    assert_eq!(total_problems(&ctx).await, 0);
}

#[tokio::test]
async fn empty_observation_falls_back_to_default_phrase() {
    let ctx = common::setup().await;
    let attention = common::status_id_by_name(&ctx.db, "Atenção").await;

    workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: vec![PdvCheck {
                pdv_id: PDV_102,
                result: CheckResult::Problem,
                new_status_id: Some(attention),
                observation: Some("   ".to_string()),
                issues: vec![],
            }],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();

    let entry = status_history::Entity::find()
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.description, "[CHECKLIST] Problema reportado.");
}

// Autosave keeps the checklist mutable and writes no ledger rows until the
// completed transition; the fan-out then runs exactly once.
#[tokio::test]
async fn autosave_then_finalize_runs_fanout_once() {
    let ctx = common::setup().await;
    let maintenance = common::status_id_by_name(&ctx.db, "Manutenção").await;

    let draft = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::InProgress,
            pdv_checks: vec![check_ok(PDV_101, ctx.sentinels.ok)],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();
    assert!(draft.created);
    assert!(!draft.finalized);
    assert_eq!(total_history(&ctx).await, 0);

    let final_checks = vec![
        check_ok(PDV_101, ctx.sentinels.ok),
        PdvCheck {
            pdv_id: PDV_102,
            result: CheckResult::Problem,
            new_status_id: Some(maintenance),
            observation: Some("Scanner não lê".to_string()),
            issues: vec!["std-4".to_string()],
        },
    ];

    let finalized = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: Some(draft.id),
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: final_checks.clone(),
        },
        ADMIN_ID,
    )
    .await
    .unwrap();
    assert_eq!(finalized.id, draft.id);
    assert!(!finalized.created);
    assert!(finalized.finalized);
    assert_eq!(total_history(&ctx).await, 2);
    assert_eq!(total_problems(&ctx).await, 1);

    // a retried completed save is accepted but writes nothing new
    let retried = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: Some(draft.id),
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: final_checks,
        },
        ADMIN_ID,
    )
    .await
    .unwrap();
    assert_eq!(retried.id, draft.id);
    assert!(!retried.finalized);
    assert_eq!(total_history(&ctx).await, 2);
    assert_eq!(total_problems(&ctx).await, 1);
}

// A second save without id for the same (store, date) updates the
// existing row instead of inserting another.
#[tokio::test]
async fn store_and_date_identify_a_single_checklist() {
    let ctx = common::setup().await;

    let first = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::InProgress,
            pdv_checks: vec![],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();

    let second = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::InProgress,
            pdv_checks: vec![check_ok(PDV_101, ctx.sentinels.ok)],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();

    assert_eq!(second.id, first.id);
    assert!(!second.created);
    assert_eq!(checklists::Entity::find().count(&ctx.db).await.unwrap(), 1);

    let row = checklists::Entity::find_by_id(first.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.pdv_checks.0.len(), 1);
}

#[tokio::test]
async fn completed_checklist_cannot_be_reopened() {
    let ctx = common::setup().await;

    let outcome = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: vec![],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();

    let err = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: Some(outcome.id),
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::InProgress,
            pdv_checks: vec![],
        },
        ADMIN_ID,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

// One bad check rolls back the whole batch, including the
// checklist transition itself.
#[tokio::test]
async fn failed_fanout_rolls_back_everything() {
    let ctx = common::setup().await;
    let maintenance = common::status_id_by_name(&ctx.db, "Manutenção").await;

    let draft = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: None,
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::InProgress,
            pdv_checks: vec![],
        },
        ADMIN_ID,
    )
    .await
    .unwrap();

    let result = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: Some(draft.id),
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: vec![
                check_ok(PDV_101, ctx.sentinels.ok),
                PdvCheck {
                    // unknown terminal violates the FK mid-transaction
                    pdv_id: 999,
                    result: CheckResult::Problem,
                    new_status_id: Some(maintenance),
                    observation: None,
                    issues: vec![],
                },
            ],
        },
        ADMIN_ID,
    )
    .await;
    assert!(result.is_err());

    let row = checklists::Entity::find_by_id(draft.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ChecklistStatus::InProgress);
    assert!(row.finalized_by_user_id.is_none());
    assert_eq!(total_history(&ctx).await, 0);
    assert_eq!(total_problems(&ctx).await, 0);
}

#[tokio::test]
async fn finalizing_unknown_checklist_is_not_found() {
    let ctx = common::setup().await;

    let err = workflow::save_checklist(
        &ctx.db,
        ctx.sentinels,
        ChecklistSave {
            id: Some(4242),
            store_id: STORE_ID,
            date: day(),
            status: ChecklistStatus::Completed,
            pdv_checks: vec![],
        },
        ADMIN_ID,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
