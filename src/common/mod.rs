mod identity;
mod sentinels;
mod state;

pub use identity::{TechIdentity, USER_ID_HEADER};
pub use sentinels::{StatusSentinels, STATUS_NONE, STATUS_OK};
pub use state::AppState;
