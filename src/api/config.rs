use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Format of `expires_at`, e.g. `2018-01-01T01:00:00.000Z`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Keys every configuration must carry.
const REQUIRED_KEYS: [&str; 2] = ["client_id", "client_secret"];

/// Possible issues with a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{key} is missing")]
    MissingKey { key: &'static str },

    #[error("{key} must be a string")]
    NotAString { key: String },

    #[error("invalid expires_at {value:?}, expected YYYY-MM-DDTHH:mm:ss.sssZ: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unsupported grant type {0:?}")]
    UnsupportedGrantType(String),
}

/// The OAuth2 grant a client authorizes with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrantType {
    /// A user approves access in the browser; the default.
    #[default]
    AuthorizationCode,
    /// The application authorizes as itself.
    ClientCredentials,
}

impl GrantType {
    pub fn as_str(self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::ClientCredentials => "client_credentials",
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "authorization_code" => Ok(GrantType::AuthorizationCode),
            "client_credentials" => Ok(GrantType::ClientCredentials),
            other => Err(ConfigError::UnsupportedGrantType(other.to_string())),
        }
    }
}

/// Client settings, typically read once from a JSON file.
///
/// Apart from the tenant header, which follows the organization currently
/// being addressed, a config does not change after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Kept verbatim; `expires_at` is what expiry checks use.
    pub expires_in: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub state: Option<String>,
    pub grant_type: GrantType,
    pub debug: bool,
    pub(crate) tenant_id_header: Option<String>,
}

impl Config {
    /// Builds a config from in-code settings.
    ///
    /// Only `client_id` and `client_secret` are required here; the stricter
    /// `redirect_uri` rule of [`Config::read`] applies to files alone.
    pub fn from_map(data: &HashMap<String, String>) -> Result<Self, ConfigError> {
        for key in REQUIRED_KEYS {
            if !data.contains_key(key) {
                return Err(ConfigError::MissingKey { key });
            }
        }

        let get = |key: &str| data.get(key).cloned();
        let expires_at = match data.get("expires_at") {
            Some(value) => Some(parse_timestamp(value)?),
            None => None,
        };
        let grant_type = match data.get("grant_type") {
            Some(value) => GrantType::parse(value)?,
            None => GrantType::default(),
        };

        Ok(Self {
            client_id: data["client_id"].clone(),
            client_secret: data["client_secret"].clone(),
            redirect_uri: get("redirect_uri"),
            access_token: get("access_token"),
            refresh_token: get("refresh_token"),
            expires_in: get("expires_in"),
            expires_at,
            state: get("state"),
            grant_type,
            debug: data.get("debug").is_some_and(|debug| debug == "on"),
            tenant_id_header: None,
        })
    }

    /// Reads a JSON configuration file.
    ///
    /// Every value must be a string. `redirect_uri` is required unless the
    /// file selects the `client_credentials` grant.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let data: serde_json::Map<String, Value> =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let is_client_credentials = data.get("grant_type").and_then(Value::as_str)
            == Some(GrantType::ClientCredentials.as_str());
        if !is_client_credentials && !data.contains_key("redirect_uri") {
            return Err(ConfigError::MissingKey { key: "redirect_uri" });
        }

        let mut settings = HashMap::with_capacity(data.len());
        for (key, value) in data {
            let Value::String(value) = value else {
                return Err(ConfigError::NotAString { key });
            };
            settings.insert(key, value);
        }

        let config = Self::from_map(&settings)?;
        tracing::debug!(
            client_id = %config.client_id,
            path = %path.display(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// The organization GraphQL calls are currently addressed to.
    pub fn tenant_id_header(&self) -> Option<&str> {
        self.tenant_id_header.as_deref()
    }

    /// Only [`ApiClient`](crate::api::ApiClient) changes the tenant, as it
    /// must rebuild its HTTP client afterwards. An empty tenant clears it.
    pub(crate) fn set_org_uid_header(&mut self, tenant_id: impl Into<String>) {
        let tenant_id = tenant_id.into();
        self.tenant_id_header = (!tenant_id.is_empty()).then_some(tenant_id);
    }
}

/// Parses an `expires_at` value written in [`TIME_FORMAT`] as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| ConfigError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_from_map_keeps_literal_values() {
        let config = Config::from_map(&settings(&[
            ("client_id", "consumerkey"),
            ("client_secret", "consumersecret"),
            ("access_token", "accesstoken"),
            ("refresh_token", "refreshtoken"),
            ("redirect_uri", "http://a.redirect.uri"),
            ("expires_at", "2018-01-01T01:00:00.000Z"),
            ("expires_in", "100"),
            ("state", "some-state"),
            ("debug", "on"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "consumerkey");
        assert_eq!(config.client_secret, "consumersecret");
        assert_eq!(config.access_token.as_deref(), Some("accesstoken"));
        assert_eq!(config.refresh_token.as_deref(), Some("refreshtoken"));
        assert_eq!(config.redirect_uri.as_deref(), Some("http://a.redirect.uri"));
        assert_eq!(
            config.expires_at,
            Some(parse_timestamp("2018-01-01T01:00:00.000Z").unwrap())
        );
        assert_eq!(config.expires_in.as_deref(), Some("100"));
        assert_eq!(config.state.as_deref(), Some("some-state"));
        assert_eq!(config.grant_type, GrantType::AuthorizationCode);
        assert!(config.debug);
        assert_eq!(config.tenant_id_header(), None);
    }

    #[test]
    fn test_from_map_requires_credentials() {
        let missing_id = Config::from_map(&settings(&[("client_secret", "s")]));
        assert!(matches!(missing_id, Err(ConfigError::MissingKey { key: "client_id" })));

        let missing_secret = Config::from_map(&settings(&[("client_id", "c")]));
        assert!(matches!(
            missing_secret,
            Err(ConfigError::MissingKey { key: "client_secret" })
        ));
    }

    #[test]
    fn test_debug_only_enabled_by_on() {
        let config = Config::from_map(&settings(&[
            ("client_id", "c"),
            ("client_secret", "s"),
            ("debug", "yes"),
        ]))
        .unwrap();
        assert!(!config.debug);
    }

    #[test]
    fn test_from_map_rejects_unknown_grant() {
        let result = Config::from_map(&settings(&[
            ("client_id", "c"),
            ("client_secret", "s"),
            ("grant_type", "password"),
        ]));
        assert!(
            matches!(result, Err(ConfigError::UnsupportedGrantType(grant)) if grant == "password")
        );
    }

    #[test]
    fn test_timestamp_round_trip() {
        let parsed = parse_timestamp("2018-01-01T01:00:00.000Z").unwrap();
        let reparsed = NaiveDateTime::parse_from_str("2018-01-01T01:00:00.000Z", TIME_FORMAT)
            .unwrap()
            .and_utc();

        assert_eq!(parsed, reparsed);
        assert_eq!(parsed, Utc.with_ymd_and_hms(2018, 1, 1, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let result = Config::from_map(&settings(&[
            ("client_id", "c"),
            ("client_secret", "s"),
            ("expires_at", "2018-01-01 01:00"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_tenant_header_is_settable() {
        let mut config =
            Config::from_map(&settings(&[("client_id", "c"), ("client_secret", "s")])).unwrap();
        config.set_org_uid_header("1234567890");
        assert_eq!(config.tenant_id_header(), Some("1234567890"));

        config.set_org_uid_header("");
        assert_eq!(config.tenant_id_header(), None);
    }
}
