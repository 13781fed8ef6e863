//! MongoDB implementation of the [`crate::dao::pick_store::PickStore`] trait.

mod connection;
mod error;
mod models;
/// Store implementation and index bootstrap.
pub mod store;

/// Connection settings parsed from a URI or the environment.
pub mod config;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoPickStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::DuplicateKey { constraint } => StorageError::conflict(format!(
                "uniqueness constraint `{constraint}` rejected the write"
            )),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
