mod handlers;
mod types;

pub use handlers::{
    get_pdv_status, list_pdv_history, list_recurring_problems, list_store_pdvs_with_status,
    record_pdv_status,
};
pub use types::{
    HistoryEntryResponse, HistoryQuery, NewStatusEventRequest, PdvStatusResponse,
    PdvWithStatusResponse, RecurringProblemResponse,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_get_pdv_status, __path_list_pdv_history, __path_list_recurring_problems,
    __path_list_store_pdvs_with_status, __path_record_pdv_status,
};
