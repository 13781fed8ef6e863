use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Errors raised by the MongoDB pick store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("required environment variable `{var}` is not set")]
    MissingEnvVar { var: &'static str },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("uniqueness constraint `{constraint}` rejected the write")]
    DuplicateKey { constraint: &'static str },
    #[error("failed to save document `{id}` in `{collection}`")]
    SaveDocument {
        collection: &'static str,
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load document `{id}` from `{collection}`")]
    LoadDocument {
        collection: &'static str,
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete document `{id}` from `{collection}`")]
    DeleteDocument {
        collection: &'static str,
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to query collection `{collection}`")]
    Query {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
}

/// Translate a write error into [`MongoDaoError::DuplicateKey`] when the
/// server rejected it for violating a unique index.
pub fn classify_write_error(
    err: MongoError,
    constraint: &'static str,
    fallback: impl FnOnce(MongoError) -> MongoDaoError,
) -> MongoDaoError {
    const DUPLICATE_KEY_CODE: i32 = 11000;

    let is_duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    };

    if is_duplicate {
        MongoDaoError::DuplicateKey { constraint }
    } else {
        fallback(err)
    }
}
