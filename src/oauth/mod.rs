//! OAuth2 plumbing for the Upwork API: the authorization URL, the token
//! endpoint grants, token sources with refresh notification, and a keyring
//! cache for the resulting token pair.

mod authorize;
mod oauth_client;
mod storage;
mod token;
mod token_source;

use reqwest::StatusCode;
use thiserror::Error;

pub use authorize::new_state;
pub use oauth_client::{ClientAuthStyle, OAuthClient, OAuthConfig};
pub use storage::TokenStorage;
pub use token::{Token, BEARER};
pub use token_source::{
    ClientCredentialsTokenSource, NotifyingTokenSource, RefreshTokenSource, ReuseTokenSource,
    TokenNotifyFn, TokenSource,
};

/// Errors a token notification callback may hand back.
pub type NotifyError = Box<dyn std::error::Error + Send + Sync>;

/// Possible errors while authorizing against the API.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached.
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status.
    #[error(
        "token endpoint rejected the request ({status}): {}",
        .error.as_deref().unwrap_or("no error code")
    )]
    TokenEndpoint {
        status: StatusCode,
        error: Option<String>,
        description: Option<String>,
    },

    #[error("unable to parse token response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported token type {0:?}, only bearer tokens are accepted")]
    UnsupportedTokenType(String),

    #[error("no refresh token is available")]
    NoRefreshToken,

    #[error("a redirect URI is required for the authorization code grant")]
    MissingRedirectUri,

    #[error("invalid OAuth2 endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The registered notification callback refused the new token.
    #[error("token notification failed: {0}")]
    Notify(#[source] NotifyError),

    #[error("credential storage error: {0}")]
    Storage(#[from] keyring::Error),
}
