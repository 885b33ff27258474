/// Error code registry for MentorHub
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Validation errors
/// - 3000-3999: Storage errors
/// - 4000-4999: Not found errors
/// - 5000-5999: Authentication and authorization errors
/// - 6000-6999: Mail errors
/// - 7000-7999: Idea analysis errors
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1003;

    // Validation errors (2000-2999)
    pub const VALIDATION_REQUIRED_FIELD: u16 = 2001;
    pub const VALIDATION_INVALID_FORMAT: u16 = 2002;
    pub const VALIDATION_OUT_OF_RANGE: u16 = 2003;
    pub const VALIDATION_DUPLICATE_VALUE: u16 = 2004;
    pub const VALIDATION_INVALID_STATE: u16 = 2005;

    // Storage errors (3000-3999)
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_SERIALIZATION_ERROR: u16 = 3002;

    // Not found errors (4000-4999)
    pub const NOT_FOUND_GENERIC: u16 = 4000;
    pub const MENTOR_NOT_FOUND: u16 = 4001;
    pub const BOOKING_NOT_FOUND: u16 = 4002;
    pub const USER_NOT_FOUND: u16 = 4003;
    pub const IDEA_NOT_FOUND: u16 = 4004;
    pub const TOKEN_NOT_FOUND: u16 = 4005;

    // Auth errors (5000-5999)
    pub const AUTH_MISSING_IDENTITY: u16 = 5001;
    pub const AUTH_FORBIDDEN: u16 = 5002;

    // Mail errors (6000-6999)
    pub const MAIL_TEMPLATE_ERROR: u16 = 6001;
    pub const MAIL_TRANSPORT_ERROR: u16 = 6002;

    // Analysis errors (7000-7999)
    pub const ANALYSIS_NOT_CONFIGURED: u16 = 7001;
    pub const ANALYSIS_PROVIDER_ERROR: u16 = 7002;
    pub const ANALYSIS_INVALID_RESPONSE: u16 = 7003;

    // Other errors (9000-9999)
    pub const OTHER_INTERNAL_ERROR: u16 = 9001;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1001 => "Configuration file not found",
        1002 => "Invalid TOML syntax in configuration",
        1003 => "Invalid value in configuration",

        2001 => "Required field is missing",
        2002 => "Invalid format",
        2003 => "Value out of allowed range",
        2004 => "Duplicate value not allowed",
        2005 => "Operation not allowed in current state",

        3001 => "Storage I/O error",
        3002 => "Storage serialization error",

        4000 => "Resource not found",
        4001 => "Mentor not found",
        4002 => "Booking not found",
        4003 => "User not found",
        4004 => "Idea analysis not found",
        4005 => "Verification token not found or already used",

        5001 => "Missing identity headers",
        5002 => "Not allowed to modify this resource",

        6001 => "Email template rendering failed",
        6002 => "Email transport failed",

        7001 => "Idea analyzer is not configured",
        7002 => "Analysis provider request failed",
        7003 => "Analysis provider returned an invalid response",

        9001 => "Internal error",

        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        assert!(ErrorCode::CONFIG_NOT_FOUND >= 1000 && ErrorCode::CONFIG_NOT_FOUND < 2000);
        assert!(
            ErrorCode::VALIDATION_REQUIRED_FIELD >= 2000
                && ErrorCode::VALIDATION_REQUIRED_FIELD < 3000
        );
        assert!(ErrorCode::STORAGE_IO_ERROR >= 3000 && ErrorCode::STORAGE_IO_ERROR < 4000);
        assert!(ErrorCode::NOT_FOUND_GENERIC >= 4000 && ErrorCode::NOT_FOUND_GENERIC < 5000);
        assert!(ErrorCode::AUTH_FORBIDDEN >= 5000 && ErrorCode::AUTH_FORBIDDEN < 6000);
        assert!(ErrorCode::MAIL_TRANSPORT_ERROR >= 6000 && ErrorCode::MAIL_TRANSPORT_ERROR < 7000);
        assert!(
            ErrorCode::ANALYSIS_PROVIDER_ERROR >= 7000 && ErrorCode::ANALYSIS_PROVIDER_ERROR < 8000
        );
        assert!(
            ErrorCode::OTHER_INTERNAL_ERROR >= 9000 && ErrorCode::OTHER_INTERNAL_ERROR < 10000
        );
    }

    #[test]
    fn test_error_code_descriptions() {
        assert_eq!(describe_error_code(1001), "Configuration file not found");
        assert_eq!(
            describe_error_code(ErrorCode::TOKEN_NOT_FOUND),
            "Verification token not found or already used"
        );
        assert_eq!(describe_error_code(65535), "Unknown error code");
        // Unassigned slots inside a category are unknown too
        assert_eq!(describe_error_code(3003), "Unknown error code");
    }
}
