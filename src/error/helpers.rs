use super::{ErrorCode, MarketplaceError};

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to an internal MarketplaceError with context
    fn to_internal(self, context: impl Into<String>) -> Result<T, MarketplaceError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_internal(self, context: impl Into<String>) -> Result<T, MarketplaceError> {
        self.map_err(|e| MarketplaceError::internal(context).with_source(e))
    }
}

/// Helper functions for common error scenarios
pub mod common {
    use super::*;

    pub fn required_field(field: &str) -> MarketplaceError {
        MarketplaceError::validation_with_code(
            ErrorCode::VALIDATION_REQUIRED_FIELD,
            format!("{} is required", field),
            Some(field.to_string()),
        )
    }

    pub fn invalid_format(field: &str, detail: impl Into<String>) -> MarketplaceError {
        MarketplaceError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_FORMAT,
            detail,
            Some(field.to_string()),
        )
    }

    pub fn out_of_range(field: &str, detail: impl Into<String>) -> MarketplaceError {
        MarketplaceError::validation_with_code(
            ErrorCode::VALIDATION_OUT_OF_RANGE,
            detail,
            Some(field.to_string()),
        )
    }

    pub fn mentor_not_found(mentor_ref: &str) -> MarketplaceError {
        MarketplaceError::not_found_with_code(
            ErrorCode::MENTOR_NOT_FOUND,
            format!("Mentor '{}' not found", mentor_ref),
        )
    }

    pub fn booking_not_found(booking_id: &str) -> MarketplaceError {
        MarketplaceError::not_found_with_code(
            ErrorCode::BOOKING_NOT_FOUND,
            format!("Booking '{}' not found", booking_id),
        )
    }

    pub fn user_not_found(uid: &str) -> MarketplaceError {
        MarketplaceError::not_found_with_code(
            ErrorCode::USER_NOT_FOUND,
            format!("User '{}' not found", uid),
        )
    }

    pub fn idea_not_found(idea_id: &str) -> MarketplaceError {
        MarketplaceError::not_found_with_code(
            ErrorCode::IDEA_NOT_FOUND,
            format!("Idea analysis '{}' not found", idea_id),
        )
    }

    pub fn invalid_token() -> MarketplaceError {
        MarketplaceError::not_found_with_code(
            ErrorCode::TOKEN_NOT_FOUND,
            "Invalid or expired verification token",
        )
    }

    pub fn missing_identity() -> MarketplaceError {
        MarketplaceError::auth(
            ErrorCode::AUTH_MISSING_IDENTITY,
            "Missing uid or email header",
        )
    }
}
