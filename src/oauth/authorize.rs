use url::Url;
use uuid::Uuid;

use super::{AuthError, OAuthConfig};

/// Builds the URL the resource owner must visit to grant access.
/// ("Authorize" here is the first leg of the authorization code grant.)
///
/// Once the user approves, the API redirects to our redirect URI with a `code`
/// and the same `state` in its query. The caller is expected to compare that
/// `state` with the one given here before exchanging the code.
pub(crate) fn authorization_url(config: &OAuthConfig, state: &str) -> Result<Url, AuthError> {
    let mut url = Url::parse(&config.authorization_endpoint)?;

    // Standard OAuth2 query parameters.
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("response_type", "code")
            .append_pair("client_id", &config.client_id);
        if let Some(redirect_uri) = &config.redirect_uri {
            query.append_pair("redirect_uri", redirect_uri);
        }
        if !config.scopes.is_empty() {
            query.append_pair("scope", &config.scopes.join(" "));
        }
        query.append_pair("state", state);
    }

    Ok(url)
}

/// Generates a fresh, unguessable `state` value for an authorization request.
pub fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}
