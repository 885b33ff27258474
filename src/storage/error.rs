//! Errors raised by the marketplace stores

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// `save` on a record that was never inserted
    #[error("{entity} not found: {key}")]
    Missing { entity: &'static str, key: String },

    /// A unique field (id, uid or email) is already taken
    #[error("{entity} with {field} {value} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
}

impl StorageError {
    pub fn missing(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Missing {
            entity,
            key: key.into(),
        }
    }

    pub fn duplicate(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Corrupt(err.to_string())
    }
}
