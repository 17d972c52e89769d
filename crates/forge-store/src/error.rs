use forge_core::DomainError;
use forge_data::DataLoadError;

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// A `UNIQUE` or primary key constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// A stored value could not be mapped back into the domain.
    #[error("corrupt {table}.{column}: {detail}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        detail: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, Some(msg))
                if code.code == rusqlite::ErrorCode::ConstraintViolation
                    && (msg.contains("UNIQUE") || msg.contains("PRIMARY KEY")) =>
            {
                StoreError::UniqueViolation(msg)
            }
            other => StoreError::Sqlite(other),
        }
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
