use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AuthError, NotifyError, OAuthClient, Token};

/// Callback invoked with every newly obtained token.
///
/// Returning an error makes the token fetch fail with [`AuthError::Notify`].
/// A typical callback persists the refreshed pair somewhere.
pub type TokenNotifyFn = Arc<dyn Fn(&Token) -> Result<(), NotifyError> + Send + Sync>;

/// Anything able to produce a current token on demand.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<Token, AuthError>;

    /// The token currently held, for sources that hold one. Never blocks and
    /// never fetches.
    fn cached(&self) -> Option<Token> {
        None
    }
}

/// Obtains a new access token through the refresh token grant.
pub struct RefreshTokenSource {
    client: OAuthClient,
    refresh_token: StdMutex<String>,
}

impl RefreshTokenSource {
    pub fn new(client: OAuthClient, refresh_token: impl Into<String>) -> Self {
        Self {
            client,
            refresh_token: StdMutex::new(refresh_token.into()),
        }
    }

    fn current_refresh_token(&self) -> String {
        match self.refresh_token.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl TokenSource for RefreshTokenSource {
    async fn token(&self) -> Result<Token, AuthError> {
        let refresh_token = self.current_refresh_token();
        let mut token = self.client.refresh(&refresh_token).await?;

        // The server may rotate the refresh token, or leave it out entirely
        // when the old one stays valid.
        match token.refresh_token.clone().filter(|rotated| !rotated.is_empty()) {
            Some(rotated) => {
                let mut guard = match self.refresh_token.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                *guard = rotated;
            }
            None => token.refresh_token = Some(refresh_token),
        }

        tracing::info!(expires_at = ?token.expires_at, "access token refreshed");
        Ok(token)
    }
}

/// Obtains a new application token through the client credentials grant.
pub struct ClientCredentialsTokenSource {
    client: OAuthClient,
}

impl ClientCredentialsTokenSource {
    pub fn new(client: OAuthClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsTokenSource {
    async fn token(&self) -> Result<Token, AuthError> {
        let token = self.client.client_credentials().await?;
        tracing::info!(expires_at = ?token.expires_at, "client credentials token obtained");
        Ok(token)
    }
}

/// Calls a function whenever the wrapped source hands out a new token.
pub struct NotifyingTokenSource {
    src: Box<dyn TokenSource>,
    notify: Option<TokenNotifyFn>,
}

impl NotifyingTokenSource {
    pub fn new(src: impl TokenSource + 'static, notify: Option<TokenNotifyFn>) -> Self {
        Self {
            src: Box::new(src),
            notify,
        }
    }
}

#[async_trait]
impl TokenSource for NotifyingTokenSource {
    async fn token(&self) -> Result<Token, AuthError> {
        // Failures of the underlying source are never reported to the callback.
        let token = self.src.token().await?;
        let Some(notify) = &self.notify else {
            return Ok(token);
        };

        notify(&token).map_err(AuthError::Notify)?;
        Ok(token)
    }
}

/// Hands out the held token for as long as it stays valid, and only then asks
/// the wrapped source for a new one.
pub struct ReuseTokenSource {
    current: Mutex<Option<Token>>,
    src: Box<dyn TokenSource>,
}

impl ReuseTokenSource {
    pub fn new(initial: Option<Token>, src: impl TokenSource + 'static) -> Self {
        Self {
            current: Mutex::new(initial),
            src: Box::new(src),
        }
    }
}

#[async_trait]
impl TokenSource for ReuseTokenSource {
    async fn token(&self) -> Result<Token, AuthError> {
        // Holding the lock across the refresh keeps concurrent callers from
        // all refreshing at once.
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref().filter(|token| token.is_valid()) {
            return Ok(token.clone());
        }

        let token = self.src.token().await?;
        *current = Some(token.clone());
        Ok(token)
    }

    fn cached(&self) -> Option<Token> {
        // A held lock means a refresh is underway; there is nothing settled
        // to report.
        self.current.try_lock().ok().and_then(|current| current.clone())
    }
}
