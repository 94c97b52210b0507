//! Template and report storage adapters

mod memory;
mod retry;
mod sqlite;

pub use memory::InMemoryStore;
pub use retry::RetryPolicy;
pub use sqlite::SqliteStore;

use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{Storage, StoreError};
use crate::domain::config::StorageKind;

/// Open the configured storage backend.
///
/// SQLite bootstrap goes through `policy`, so a locked or briefly
/// unavailable database file is retried before giving up.
pub async fn open_storage(
    kind: StorageKind,
    database: &Path,
    policy: &RetryPolicy,
) -> Result<Arc<dyn Storage>, StoreError> {
    match kind {
        StorageKind::Memory => {
            log::debug!("Using in-memory storage");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageKind::Sqlite => {
            log::debug!("Opening SQLite database at {}", database.display());
            let store = policy
                .run("Database connection", || async { SqliteStore::open(database) })
                .await?;
            Ok(Arc::new(store))
        }
    }
}
