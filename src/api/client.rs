use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::config::{Config, ConfigError, GrantType};
use super::endpoints::{EntryPoint, Endpoints};
use super::http_client::{self, Params, RequestBody};
use super::response::ApiResponse;
use crate::oauth::{
    AuthError, ClientAuthStyle, ClientCredentialsTokenSource, NotifyingTokenSource, OAuthClient,
    OAuthConfig, RefreshTokenSource, ReuseTokenSource, Token, TokenNotifyFn, TokenSource,
};

/// Possible errors while talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("authorization failure: {0}")]
    Auth(#[from] AuthError),

    /// No token is available yet; see [`ApiClient::get_token`].
    #[error("the client holds no access token, authorize it first")]
    NotAuthorized,

    #[error("{endpoint} was retired along with the legacy API, use a GraphQL call instead")]
    EndpointRetired { endpoint: &'static str },

    #[error("the tenant header cannot be set on a custom HTTP client, add it there directly")]
    CustomHttpClient,

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("unable to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A client for the Upwork API.
///
/// Configuration methods take `&mut self`; once configured, the client can be
/// shared (by reference or inside an `Arc`) and used for concurrent requests.
///
/// Requests are authorized with a token drawn from a token source: the current
/// token is reused until it expires, after which a new one is obtained, via the
/// refresh token or, for the client credentials grant, by asking again. The
/// callback set with [`ApiClient::set_refresh_token_notify_fn`] sees every
/// newly obtained token.
pub struct ApiClient {
    config: Config,
    endpoints: Endpoints,
    auth_style: ClientAuthStyle,
    http: reqwest::Client,
    has_custom_http_client: bool,
    /// The token the current token source started from.
    token: Option<Token>,
    token_source: Option<Arc<dyn TokenSource>>,
    notify: Option<TokenNotifyFn>,
    entry_point: EntryPoint,
    post_as_json: bool,
}

impl ApiClient {
    /// Sets up a client against the production API.
    pub fn setup(config: Config) -> Result<Self, ApiError> {
        Self::setup_with_endpoints(config, Endpoints::default())
    }

    pub fn setup_with_endpoints(config: Config, endpoints: Endpoints) -> Result<Self, ApiError> {
        let http = http_client::build_http_client(config.tenant_id_header())?;

        // A token pair may already be known from an earlier run.
        let token = config
            .access_token
            .as_ref()
            .filter(|access_token| !access_token.is_empty())
            .map(|access_token| {
                Token::new(
                    access_token.clone(),
                    config.refresh_token.clone().filter(|refresh| !refresh.is_empty()),
                    config.expires_at,
                )
            });

        Ok(Self {
            config,
            endpoints,
            auth_style: ClientAuthStyle::default(),
            http,
            has_custom_http_client: false,
            token,
            token_source: None,
            notify: None,
            entry_point: EntryPoint::default(),
            post_as_json: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    /// Selects the namespace request paths are resolved against.
    /// Routers do this themselves when they are created.
    pub fn set_entry_point(&mut self, entry_point: EntryPoint) {
        self.entry_point = entry_point;
    }

    /// Sends POST (and so PUT and DELETE) parameters as a JSON object instead
    /// of a form. GraphQL requests are always JSON.
    pub fn set_post_as_json(&mut self, post_as_json: bool) {
        self.post_as_json = post_as_json;
    }

    pub fn set_client_auth_style(&mut self, auth_style: ClientAuthStyle) {
        self.auth_style = auth_style;
        self.rebuild_token_source();
    }

    /// Registers a callback for every newly obtained token.
    pub fn set_refresh_token_notify_fn(&mut self, notify: TokenNotifyFn) {
        self.notify = Some(notify);
        self.rebuild_token_source();
    }

    /// Uses the given HTTP client for every request, token requests included.
    ///
    /// Such a client is used as is: neither our `User-Agent` nor the tenant
    /// header are added to it.
    pub fn set_custom_http_client(&mut self, http: reqwest::Client) {
        self.http = http;
        self.has_custom_http_client = true;
        self.rebuild_token_source();
    }

    /// Goes back to a client of our own making after
    /// [`ApiClient::set_custom_http_client`].
    pub fn set_own_http_client(&mut self) -> Result<(), ApiError> {
        self.http = http_client::build_http_client(self.config.tenant_id_header())?;
        self.has_custom_http_client = false;
        self.rebuild_token_source();
        Ok(())
    }

    /// Addresses subsequent requests to the given organization, as multi-tenant
    /// GraphQL calls require. An empty `tenant_id` drops the header again.
    pub fn set_org_uid_header(&mut self, tenant_id: &str) -> Result<(), ApiError> {
        if self.has_custom_http_client {
            return Err(ApiError::CustomHttpClient);
        }

        self.http = http_client::build_http_client(Some(tenant_id))?;
        self.config.set_org_uid_header(tenant_id);
        self.rebuild_token_source();
        Ok(())
    }

    /// The token endpoint client matching our current settings.
    pub fn oauth_client(&self) -> OAuthClient {
        let config = OAuthConfig {
            client_id: self.config.client_id.clone(),
            client_secret: self.config.client_secret.clone(),
            redirect_uri: self.config.redirect_uri.clone(),
            authorization_endpoint: self.endpoints.authorization.clone(),
            token_endpoint: self.endpoints.token.clone(),
            scopes: Vec::new(),
            auth_style: self.auth_style,
        };
        OAuthClient::new(config, self.http.clone())
    }

    /// The URL a user must visit to authorize this application.
    pub fn authorization_url(&self, state: &str) -> Result<Url, ApiError> {
        Ok(self.oauth_client().authorization_url(state)?)
    }

    /// Obtains a token and starts authorizing requests with it.
    ///
    /// With the authorization code grant `code` is the code the user was
    /// redirected with; with the client credentials grant it is ignored.
    pub async fn get_token(&mut self, code: &str) -> Result<Token, ApiError> {
        let oauth = self.oauth_client();
        let token = match self.config.grant_type {
            GrantType::AuthorizationCode => oauth.exchange_code(code).await?,
            GrantType::ClientCredentials => oauth.client_credentials().await?,
        };
        tracing::debug!(grant_type = self.config.grant_type.as_str(), "obtained access token");

        self.token = Some(token.clone());
        self.install_token_source();
        Ok(token)
    }

    /// Whether an access/refresh token pair is already known, in which case
    /// the client starts authorizing requests with it.
    pub fn has_access_token(&mut self) -> bool {
        self.token = self.latest_token();
        let has = self
            .token
            .as_ref()
            .is_some_and(|token| !token.access_token.is_empty() && token.has_refresh_token());
        if has {
            self.install_token_source();
        }
        has
    }

    /// Starts authorizing requests with a token obtained elsewhere, e.g. a
    /// cached one.
    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
        self.install_token_source();
    }

    /// The token requests are currently authorized with, refreshing it first
    /// if it expired.
    pub async fn current_token(&self) -> Result<Token, ApiError> {
        let source = self.token_source.as_ref().ok_or(ApiError::NotAuthorized)?;
        Ok(source.token().await?)
    }

    pub async fn get(&self, uri: &str, params: &Params) -> Result<ApiResponse, ApiError> {
        let response = self.get_raw(uri, params).await?;
        Ok(ApiResponse::buffer(response).await?)
    }

    pub async fn post(&self, uri: &str, params: &Params) -> Result<ApiResponse, ApiError> {
        let response = self.post_raw(uri, params).await?;
        Ok(ApiResponse::buffer(response).await?)
    }

    pub async fn put(&self, uri: &str, params: &Params) -> Result<ApiResponse, ApiError> {
        let response = self.put_raw(uri, params).await?;
        Ok(ApiResponse::buffer(response).await?)
    }

    pub async fn delete(&self, uri: &str, params: &Params) -> Result<ApiResponse, ApiError> {
        let response = self.delete_raw(uri, params).await?;
        Ok(ApiResponse::buffer(response).await?)
    }

    /// POSTs an arbitrary JSON body, such as a GraphQL request with variables.
    pub async fn post_json<T>(&self, uri: &str, body: &T) -> Result<ApiResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let response = self.post_json_raw(uri, body).await?;
        Ok(ApiResponse::buffer(response).await?)
    }

    /// Like [`ApiClient::get`], but hands back the response unread.
    pub async fn get_raw(&self, uri: &str, params: &Params) -> Result<reqwest::Response, ApiError> {
        let url = format!(
            "{}{}",
            self.endpoints.resource_url(self.entry_point, uri),
            http_client::encode_query(params)
        );
        self.send(Method::GET, &url, None).await
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        params: &Params,
    ) -> Result<reqwest::Response, ApiError> {
        self.send_post(uri, params).await
    }

    pub async fn put_raw(&self, uri: &str, params: &Params) -> Result<reqwest::Response, ApiError> {
        self.send_post(uri, &http_client::with_overload_param(params, "put"))
            .await
    }

    pub async fn delete_raw(
        &self,
        uri: &str,
        params: &Params,
    ) -> Result<reqwest::Response, ApiError> {
        self.send_post(uri, &http_client::with_overload_param(params, "delete"))
            .await
    }

    pub async fn post_json_raw<T>(&self, uri: &str, body: &T) -> Result<reqwest::Response, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.send(Method::POST, &self.post_url(uri), Some(body))
            .await
    }

    /// GraphQL has a single URL of its own; the path is of no concern there.
    fn post_url(&self, uri: &str) -> String {
        match self.entry_point {
            EntryPoint::Graphql => self.endpoints.graphql.clone(),
            entry_point => self.endpoints.resource_url(entry_point, uri),
        }
    }

    async fn send_post(&self, uri: &str, params: &Params) -> Result<reqwest::Response, ApiError> {
        let body = RequestBody::for_post(self.entry_point, self.post_as_json, params);
        self.send(Method::POST, &self.post_url(uri), Some(body))
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody>,
    ) -> Result<reqwest::Response, ApiError> {
        let token = self.current_token().await?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&token.access_token);
        if let Some(body) = body {
            request = body.apply(request);
        }

        tracing::debug!(%method, url, entry_point = %self.entry_point, "dispatching API request");
        Ok(request.send().await?)
    }

    /// The newest token we know of: refreshes happen inside the token source.
    fn latest_token(&self) -> Option<Token> {
        self.token_source
            .as_ref()
            .and_then(|source| source.cached())
            .or_else(|| self.token.clone())
    }

    /// Settings a token source depends on changed; start over from the newest
    /// token, if requests were being authorized at all.
    fn rebuild_token_source(&mut self) {
        if self.token_source.is_some() {
            self.token = self.latest_token();
            self.install_token_source();
        }
    }

    fn install_token_source(&mut self) {
        let oauth = self.oauth_client();
        let refresh_token = self
            .token
            .as_ref()
            .and_then(|token| token.refresh_token.clone());
        let notify = self.notify.clone();

        // Without a refresh token, the client credentials grant can simply
        // be repeated. An authorization code can't, so once such a token
        // expires the user has to authorize again.
        let source = match (self.config.grant_type, refresh_token) {
            (GrantType::ClientCredentials, None) => {
                NotifyingTokenSource::new(ClientCredentialsTokenSource::new(oauth), notify)
            }
            (_, refresh_token) => NotifyingTokenSource::new(
                RefreshTokenSource::new(oauth, refresh_token.unwrap_or_default()),
                notify,
            ),
        };

        self.token_source = Some(Arc::new(ReuseTokenSource::new(self.token.clone(), source)));
    }
}
