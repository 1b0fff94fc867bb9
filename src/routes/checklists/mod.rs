mod handlers;
mod types;

pub use handlers::{get_checklist, get_today_checklist, list_checklists, save_checklist};
pub use types::{
    ChecklistResponse, ChecklistsQuery, SaveChecklistRequest, SaveChecklistResponse, TodayQuery,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_get_checklist, __path_get_today_checklist, __path_list_checklists,
    __path_save_checklist,
};
