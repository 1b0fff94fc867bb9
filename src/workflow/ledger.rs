use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use crate::common::StatusSentinels;
use crate::entity::{problems, status_history};
use crate::error::AppResult;

/// Problem titles are the leading slice of the triggering description.
pub const TITLE_MAX_CHARS: usize = 100;

/// Validated input for a single status observation.
#[derive(Debug, Clone)]
pub struct NewStatusEvent {
    pub pdv_id: i32,
    pub status_id: i32,
    pub description: String,
    pub item_id: Option<i32>,
    pub tech_id: i32,
}

/// Append a ledger entry and, when the status is not "Ok", open a problem
/// carrying the same item reference. Callers supply the connection so the
/// pair of writes lands inside their transaction.
pub async fn record_status_event<C>(
    conn: &C,
    sentinels: StatusSentinels,
    event: NewStatusEvent,
    at: DateTime<Utc>,
) -> AppResult<status_history::Model>
where
    C: ConnectionTrait,
{
    let entry = append_entry(
        conn,
        event.pdv_id,
        event.status_id,
        &event.description,
        Some(event.tech_id),
        event.item_id,
        at,
    )
    .await?;

    if !sentinels.is_ok(event.status_id) {
        open_problem(
            conn,
            ProblemSeed {
                pdv_id: event.pdv_id,
                item_id: event.item_id,
                reported_by: event.tech_id,
                description: &event.description,
                origin_status_id: event.status_id,
                at,
            },
        )
        .await?;
    }

    Ok(entry)
}

pub(crate) async fn append_entry<C>(
    conn: &C,
    pdv_id: i32,
    status_id: i32,
    description: &str,
    tech_id: Option<i32>,
    item_id: Option<i32>,
    at: DateTime<Utc>,
) -> AppResult<status_history::Model>
where
    C: ConnectionTrait,
{
    let entry = status_history::ActiveModel {
        description: Set(description.to_string()),
        timestamp: Set(at),
        pdv_id: Set(pdv_id),
        status_id: Set(status_id),
        tech_id: Set(tech_id),
        item_id: Set(item_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(entry)
}

pub(crate) struct ProblemSeed<'a> {
    pub pdv_id: i32,
    pub item_id: Option<i32>,
    pub reported_by: i32,
    pub description: &'a str,
    pub origin_status_id: i32,
    pub at: DateTime<Utc>,
}

pub(crate) async fn open_problem<C>(conn: &C, seed: ProblemSeed<'_>) -> AppResult<problems::Model>
where
    C: ConnectionTrait,
{
    let problem = problems::ActiveModel {
        pdv_id: Set(seed.pdv_id),
        item_id: Set(seed.item_id),
        reported_by_user_id: Set(Some(seed.reported_by)),
        title: Set(truncate_title(seed.description)),
        description: Set(seed.description.to_string()),
        status: Set(problems::ProblemStatus::Open),
        created_at: Set(seed.at),
        origin_status_id: Set(seed.origin_status_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(problem)
}

// char-based: descriptions are pt-BR text with multi-byte characters
pub(crate) fn truncate_title(description: &str) -> String {
    description.chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_descriptions_become_the_whole_title() {
        assert_eq!(truncate_title("Fonte queimada"), "Fonte queimada");
    }

    #[test]
    fn long_descriptions_are_cut_at_char_boundaries() {
        let long = "ç".repeat(150);
        let title = truncate_title(&long);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
        assert_eq!(title, "ç".repeat(TITLE_MAX_CHARS));
    }
}
