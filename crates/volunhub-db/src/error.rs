//! Database error types

use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for DbError {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        // Surface unique-index violations as duplicates so callers can map
        // them to a validation failure instead of a server error.
        if let ErrorKind::Write(WriteFailure::WriteError(ref write_error)) = *e.kind {
            if write_error.code == 11000 {
                return DbError::Duplicate(write_error.message.clone());
            }
        }

        DbError::Query(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for DbError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        DbError::Serialization(e.to_string())
    }
}

impl From<mongodb::bson::de::Error> for DbError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        DbError::Serialization(e.to_string())
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
