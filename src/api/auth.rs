//! Header identity
//!
//! The `uid` and `email` headers are trusted as sent. The first request
//! carrying a new uid creates the user record.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::{common, MarketplaceError};
use crate::services::AppState;

pub const UID_HEADER: &str = "uid";
pub const EMAIL_HEADER: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    /// The user record was created while extracting this identity
    pub first_seen: bool,
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (uid, email) = match (
            header_value(parts, UID_HEADER),
            header_value(parts, EMAIL_HEADER),
        ) {
            (Some(uid), Some(email)) => (uid, email),
            _ => return Err(common::missing_identity()),
        };

        let (_, first_seen) = state.users().find_or_create(&uid, &email).await?;
        Ok(Self {
            uid,
            email,
            first_seen,
        })
    }
}
