//! Status-derivation and checklist-finalization workflows.
//!
//! Every compound write here runs inside a single database transaction; the
//! relational store's isolation is the only concurrency control, matching the
//! one-request-at-a-time model of the API.

mod checklist;
mod ledger;
mod problems;
mod resolver;

pub use checklist::{save_checklist, ChecklistSave, SaveOutcome};
pub use ledger::{record_status_event, NewStatusEvent, TITLE_MAX_CHARS};
pub use problems::{resolve_problem, MIN_RESOLUTION_NOTES};
pub use resolver::{current_status, store_statuses, CurrentStatus};
