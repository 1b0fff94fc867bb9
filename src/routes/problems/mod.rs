mod handlers;
mod types;

pub use handlers::{get_problem, list_pdv_problems, resolve_problem};
pub use types::{ProblemDetailResponse, ProblemSummaryResponse, ResolveProblemRequest};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_problem, __path_list_pdv_problems, __path_resolve_problem};
