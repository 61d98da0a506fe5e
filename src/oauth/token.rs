use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// The only token type the API hands out.
pub const BEARER: &str = "Bearer";

/// How long before its actual expiry a token is already considered stale,
/// so that it is not rejected mid-flight.
const EXPIRY_DELTA_SECONDS: i64 = 10;

/// An access/refresh token pair as issued by the token endpoint.
///
/// Tokens are serializable so callers can cache them across runs
/// (see [`TokenStorage`](super::TokenStorage)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Absolute expiry. A token without one never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

fn bearer() -> String {
    BEARER.to_string()
}

impl Token {
    /// Creates a bearer token from its raw parts.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: bearer(),
            refresh_token,
            expires_at,
        }
    }

    /// Whether the token has expired, or is about to.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(EXPIRY_DELTA_SECONDS) < Utc::now(),
            None => false,
        }
    }

    /// A token is usable when it carries an access token that has not expired.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.is_expired()
    }

    /// Whether both halves of the pair are present.
    pub fn has_refresh_token(&self) -> bool {
        matches!(&self.refresh_token, Some(refresh) if !refresh.is_empty())
    }
}

/// `expires_in` arrives as a number from most deployments, but as a string
/// from a few.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> Option<i64> {
        match self {
            ExpiresIn::Seconds(seconds) => Some(*seconds),
            ExpiresIn::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// The body of a successful token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<ExpiresIn>,
}

impl TokenResponse {
    /// Converts the response into a [`Token`], anchoring `expires_in` at `now`.
    ///
    /// A missing token type is taken to mean bearer; any other type is refused.
    pub(crate) fn into_token(self, now: DateTime<Utc>) -> Result<Token, AuthError> {
        let token_type = self.token_type.unwrap_or_else(bearer);
        if !token_type.eq_ignore_ascii_case(BEARER) {
            return Err(AuthError::UnsupportedTokenType(token_type));
        }

        let expires_at = self
            .expires_in
            .as_ref()
            .and_then(ExpiresIn::seconds)
            .filter(|seconds| *seconds > 0)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));

        Ok(Token {
            access_token: self.access_token,
            token_type: bearer(),
            refresh_token: self.refresh_token.filter(|refresh| !refresh.is_empty()),
            expires_at,
        })
    }
}

/// The body of a failed token endpoint response (RFC 6749, section 5.2).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}
