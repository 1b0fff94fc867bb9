use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
};

use crate::common::StatusSentinels;
use crate::entity::{pdvs, problems, status_history, users};
use crate::error::AppResult;
use sea_orm::prelude::DateTimeUtc;

/// Derived display status of a PDV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentStatus {
    pub status_id: i32,
    pub description: Option<String>,
    pub timestamp: Option<DateTimeUtc>,
    pub tech_name: Option<String>,
}

/// Compute the status a PDV should display. Read-only.
///
/// An unresolved problem dominates the display even when a newer benign
/// ledger entry exists; only with no open problem does the latest ledger
/// entry apply, and a never-inspected PDV falls back to the "Sem status"
/// sentinel.
pub async fn current_status<C>(
    conn: &C,
    sentinels: StatusSentinels,
    pdv_id: i32,
) -> AppResult<CurrentStatus>
where
    C: ConnectionTrait,
{
    let open_problem = problems::Entity::find()
        .filter(problems::Column::PdvId.eq(pdv_id))
        .filter(problems::Column::Status.ne(problems::ProblemStatus::Resolved))
        .order_by_desc(problems::Column::CreatedAt)
        .order_by_desc(problems::Column::Id)
        .one(conn)
        .await?;

    if let Some(problem) = open_problem {
        let tech_name = user_name(conn, problem.reported_by_user_id).await?;
        return Ok(CurrentStatus {
            status_id: problem.origin_status_id,
            description: Some(problem.title),
            timestamp: Some(problem.created_at),
            tech_name: Some(tech_name.unwrap_or_else(|| "Sistema".to_string())),
        });
    }

    let last_entry = status_history::Entity::find()
        .filter(status_history::Column::PdvId.eq(pdv_id))
        .order_by_desc(status_history::Column::Timestamp)
        .order_by_desc(status_history::Column::Id)
        .one(conn)
        .await?;

    if let Some(entry) = last_entry {
        let tech_name = user_name(conn, entry.tech_id).await?;
        return Ok(CurrentStatus {
            status_id: entry.status_id,
            description: Some(entry.description),
            timestamp: Some(entry.timestamp),
            tech_name,
        });
    }

    Ok(CurrentStatus {
        status_id: sentinels.none,
        description: None,
        timestamp: None,
        tech_name: None,
    })
}

/// Derived status for every PDV of a store, ordered by terminal number.
pub async fn store_statuses(
    db: &DatabaseConnection,
    sentinels: StatusSentinels,
    store_id: i32,
) -> AppResult<Vec<(pdvs::Model, CurrentStatus)>> {
    // terminal numbers are stored as text but sort numerically
    let number_as_int: SimpleExpr = Expr::cust("CAST(number AS INTEGER)").into();

    let pdv_rows = pdvs::Entity::find()
        .filter(pdvs::Column::StoreId.eq(store_id))
        .order_by(number_as_int, Order::Asc)
        .all(db)
        .await?;

    let mut statuses = Vec::with_capacity(pdv_rows.len());
    for pdv in pdv_rows {
        let status = current_status(db, sentinels, pdv.id).await?;
        statuses.push((pdv, status));
    }
    Ok(statuses)
}

async fn user_name<C>(conn: &C, user_id: Option<i32>) -> AppResult<Option<String>>
where
    C: ConnectionTrait,
{
    let Some(id) = user_id else {
        return Ok(None);
    };
    Ok(users::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(|u| u.name))
}
