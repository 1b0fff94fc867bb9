use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entity::status_types;
use crate::error::{AppError, AppResult};

/// Status name meaning "no issue"; events with any other status open a problem.
pub const STATUS_OK: &str = "Ok";
/// Status name for terminals that were never inspected.
pub const STATUS_NONE: &str = "Sem status";

/// Sentinel status ids, resolved by name once at startup. Every
/// status-classifying decision compares against these ids; nothing re-resolves
/// the names at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSentinels {
    pub ok: i32,
    pub none: i32,
}

impl StatusSentinels {
    /// Resolve both sentinels from the reference data.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingStatus` if either sentinel row is absent,
    /// which is fatal for every core operation.
    pub async fn load(db: &DatabaseConnection) -> AppResult<Self> {
        Ok(Self {
            ok: find_by_name(db, STATUS_OK).await?,
            none: find_by_name(db, STATUS_NONE).await?,
        })
    }

    #[must_use]
    pub fn is_ok(&self, status_id: i32) -> bool {
        status_id == self.ok
    }
}

async fn find_by_name(db: &DatabaseConnection, name: &'static str) -> AppResult<i32> {
    status_types::Entity::find()
        .filter(status_types::Column::Name.eq(name))
        .one(db)
        .await?
        .map(|s| s.id)
        .ok_or(AppError::MissingStatus(name))
}
