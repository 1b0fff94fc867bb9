use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::common::StatusSentinels;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub sentinels: StatusSentinels,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, sentinels: StatusSentinels) -> Self {
        Self {
            db,
            config: Arc::new(config),
            sentinels,
        }
    }
}
