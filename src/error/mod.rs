use thiserror::Error;

pub mod codes;
pub mod helpers;

pub use codes::{describe_error_code, ErrorCode};
pub use helpers::{common, ErrorExt};

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The unified error type for the marketplace application layer
#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Not found: {message}")]
    NotFound {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Authentication error: {message}")]
    Auth {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Forbidden: {message}")]
    Forbidden {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Mail error: {message}")]
    Mail {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Analysis error: {message}")]
    Analysis {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] {message}")]
    Internal {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl MarketplaceError {
    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Create a not found error with specific code
    pub fn not_found_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create an authentication error with specific code
    pub fn auth(code: u16, message: impl Into<String>) -> Self {
        Self::Auth {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: ErrorCode::AUTH_FORBIDDEN,
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with specific code
    pub fn storage_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a mail error with specific code
    pub fn mail_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Mail {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create an analysis error with specific code
    pub fn analysis_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Analysis {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a generic internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::OTHER_INTERNAL_ERROR,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Validation { source: src, .. }
            | Self::NotFound { source: src, .. }
            | Self::Auth { source: src, .. }
            | Self::Forbidden { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Mail { source: src, .. }
            | Self::Analysis { source: src, .. }
            | Self::Internal { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Validation { code, .. }
            | Self::NotFound { code, .. }
            | Self::Auth { code, .. }
            | Self::Forbidden { code, .. }
            | Self::Storage { code, .. }
            | Self::Mail { code, .. }
            | Self::Analysis { code, .. }
            | Self::Internal { code, .. } => *code,
        }
    }

    /// Get the exit code for this error when it ends a CLI run
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Validation { .. } => 3,
            Self::NotFound { .. } => 4,
            Self::Auth { .. } | Self::Forbidden { .. } => 5,
            Self::Storage { .. } => 6,
            Self::Mail { .. } => 7,
            Self::Analysis { .. } => 8,
            Self::Internal { .. } => 1,
        }
    }

    /// Get the message shown to API clients, without the code prefix
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, field, .. } => {
                if let Some(f) = field {
                    format!("Validation error for '{}': {}", f, message)
                } else {
                    message.clone()
                }
            }
            Self::Config { message, .. }
            | Self::NotFound { message, .. }
            | Self::Auth { message, .. }
            | Self::Forbidden { message, .. }
            | Self::Storage { message, .. }
            | Self::Mail { message, .. }
            | Self::Analysis { message, .. }
            | Self::Internal { message, .. } => message.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Type alias for Results using MarketplaceError
pub type Result<T> = std::result::Result<T, MarketplaceError>;

impl From<crate::storage::error::StorageError> for MarketplaceError {
    fn from(err: crate::storage::error::StorageError) -> Self {
        use crate::storage::error::StorageError;

        match err {
            StorageError::Missing { .. } => MarketplaceError::not_found_with_code(
                ErrorCode::NOT_FOUND_GENERIC,
                err.to_string(),
            ),
            StorageError::Duplicate { field, .. } => MarketplaceError::validation_with_code(
                ErrorCode::VALIDATION_DUPLICATE_VALUE,
                err.to_string(),
                Some(field.to_string()),
            ),
            StorageError::Corrupt(msg) => {
                MarketplaceError::storage_with_code(ErrorCode::STORAGE_SERIALIZATION_ERROR, msg)
            }
            StorageError::Io(io_err) => MarketplaceError::storage_with_code(
                ErrorCode::STORAGE_IO_ERROR,
                "Storage I/O operation failed",
            )
            .with_source(io_err),
        }
    }
}

impl From<crate::mail::MailError> for MarketplaceError {
    fn from(err: crate::mail::MailError) -> Self {
        use crate::mail::MailError;

        let code = match &err {
            MailError::Template(_) => ErrorCode::MAIL_TEMPLATE_ERROR,
            MailError::Transport(_) | MailError::Rejected { .. } => {
                ErrorCode::MAIL_TRANSPORT_ERROR
            }
        };
        MarketplaceError::mail_with_code(code, err.to_string()).with_source(err)
    }
}

impl From<crate::analysis::AnalysisError> for MarketplaceError {
    fn from(err: crate::analysis::AnalysisError) -> Self {
        use crate::analysis::AnalysisError;

        let code = match &err {
            AnalysisError::Request(_) | AnalysisError::Status { .. } => {
                ErrorCode::ANALYSIS_PROVIDER_ERROR
            }
            AnalysisError::InvalidResponse(_) => ErrorCode::ANALYSIS_INVALID_RESPONSE,
            AnalysisError::Config(_) => ErrorCode::ANALYSIS_NOT_CONFIGURED,
        };
        MarketplaceError::analysis_with_code(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::error::StorageError;

    #[test]
    fn test_error_creation_and_chaining() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "mentors.json");
        let err = MarketplaceError::storage_with_code(ErrorCode::STORAGE_IO_ERROR, "Cannot read")
            .with_source(io_err);

        assert_eq!(err.code(), ErrorCode::STORAGE_IO_ERROR);
        assert!(err.to_string().contains("[E3001]"));
        assert_eq!(err.user_message(), "Cannot read");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_conflict_becomes_validation() {
        let err: MarketplaceError = StorageError::duplicate("Mentor", "email", "a@x.com").into();
        assert!(err.is_validation());
        assert_eq!(err.code(), ErrorCode::VALIDATION_DUPLICATE_VALUE);
    }

    #[test]
    fn test_storage_not_found_maps_to_not_found() {
        let err: MarketplaceError = StorageError::missing("User", "u-1").into();
        assert!(err.is_not_found());
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_validation_user_message_names_field() {
        let err = MarketplaceError::validation_with_code(
            ErrorCode::VALIDATION_REQUIRED_FIELD,
            "is required",
            Some("email".to_string()),
        );
        assert_eq!(err.user_message(), "Validation error for 'email': is required");
    }
}
