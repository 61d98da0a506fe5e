use chrono::Utc;
use reqwest::header;
use url::Url;

use super::authorize;
use super::token::{TokenErrorResponse, TokenResponse};
use super::{AuthError, Token};

/// How the client proves its identity to the token endpoint.
///
/// The Upwork token endpoint does not accept credentials from the
/// `Authorization` header, so [`ClientAuthStyle::RequestBody`] is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientAuthStyle {
    /// `client_id` and `client_secret` are sent as form fields.
    #[default]
    RequestBody,
    /// `client_id` and `client_secret` are sent via HTTP basic authentication.
    BasicAuthHeader,
}

/// Everything needed to speak to the authorization and token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub scopes: Vec<String>,
    pub auth_style: ClientAuthStyle,
}

/// Performs the token endpoint grants over a given HTTP client.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// See [`new_state`](super::new_state) for generating `state`.
    pub fn authorization_url(&self, state: &str) -> Result<Url, AuthError> {
        authorize::authorization_url(&self.config, state)
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// Codes pasted from a terminal usually carry a trailing newline, so the
    /// code is trimmed first.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, AuthError> {
        let redirect_uri = self
            .config
            .redirect_uri
            .as_deref()
            .ok_or(AuthError::MissingRedirectUri)?;

        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code.trim()),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// Obtains a token for the application itself, with no user involved.
    pub async fn client_credentials(&self) -> Result<Token, AuthError> {
        self.request_token(&[("grant_type", "client_credentials")])
            .await
    }

    /// Uses a refresh token to obtain a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::NoRefreshToken);
        }

        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    /// POSTs a grant to the token endpoint and parses the issued token.
    async fn request_token(&self, grant: &[(&str, &str)]) -> Result<Token, AuthError> {
        let mut form: Vec<(&str, &str)> = grant.to_vec();
        let mut request = self
            .http
            .post(&self.config.token_endpoint)
            .header(header::ACCEPT, "application/json");

        match self.config.auth_style {
            ClientAuthStyle::RequestBody => {
                form.push(("client_id", self.config.client_id.as_str()));
                form.push(("client_secret", self.config.client_secret.as_str()));
            }
            ClientAuthStyle::BasicAuthHeader => {
                request =
                    request.basic_auth(&self.config.client_id, Some(&self.config.client_secret));
            }
        }

        let grant_type = grant
            .iter()
            .find_map(|(key, value)| (*key == "grant_type").then_some(*value))
            .unwrap_or_default();
        tracing::debug!(grant_type, endpoint = %self.config.token_endpoint, "requesting token");

        let result = request.form(&form).send().await?;
        let status = result.status();
        let response_text = result.text().await?;

        // The endpoint explains failures in a small JSON document, when it
        // explains them at all.
        if !status.is_success() {
            let body: TokenErrorResponse = serde_json::from_str(&response_text).unwrap_or_default();
            tracing::debug!(%status, error = ?body.error, "token request was rejected");
            return Err(AuthError::TokenEndpoint {
                status,
                error: body.error,
                description: body.error_description,
            });
        }

        let body: TokenResponse = serde_json::from_str(&response_text)?;
        body.into_token(Utc::now())
    }
}
