pub mod lessons;
pub mod memory;
pub mod provisioning;
pub mod users;

pub use lessons::{LessonStore, PgLessonStore};
pub use memory::{MemoryLessonStore, MemoryProvisioningStore, MemoryUserStore};
pub use provisioning::{PgProvisioningStore, ProvisioningStore};
pub use users::{PgUserStore, UserStore};

use std::fmt;

/// Storage-layer error: either a backend fault or an entity validation
/// failure (e.g. a uniqueness violation).
#[derive(Debug)]
pub enum StoreError {
    Db(sqlx::Error),
    Validation(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(e) => write!(f, "storage error: {}", e),
            StoreError::Validation(msg) => write!(f, "entity validation failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Db(err)
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
