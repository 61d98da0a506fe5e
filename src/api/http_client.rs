use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::form_urlencoded;

use super::endpoints::{EntryPoint, OVERLOAD_PARAM, USER_AGENT};
use super::ApiError;

/// [`TENANT_ID_HEADER`](super::endpoints::TENANT_ID_HEADER), in the lowercase
/// form header names are stored in.
const TENANT_ID_HEADER_NAME: &str = "x-upwork-api-tenantid";

/// Flat request parameters. Ordered, so that query strings are stable.
pub type Params = BTreeMap<String, String>;

/// Builds the HTTP client used when the caller did not bring their own.
///
/// Every request it sends carries our `User-Agent`, and the tenant header
/// once an organization has been selected. An empty tenant means none.
pub(crate) fn build_http_client(tenant_id: Option<&str>) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    if let Some(tenant_id) = tenant_id.filter(|tenant_id| !tenant_id.is_empty()) {
        headers.insert(
            HeaderName::from_static(TENANT_ID_HEADER_NAME),
            HeaderValue::from_str(tenant_id)?,
        );
    }

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Encodes GET parameters as a query string, leading `?` included.
///
/// Pairs are form-urlencoded, which also takes care of `;` (`%3B`). An empty
/// map produces an empty string rather than a lone `?`.
pub(crate) fn encode_query(params: &Params) -> String {
    if params.is_empty() {
        return String::new();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();
    format!("?{query}")
}

/// The legacy endpoints know nothing of PUT and DELETE; instead, a POST
/// names the intended verb in [`OVERLOAD_PARAM`].
pub(crate) fn with_overload_param(params: &Params, verb: &str) -> Params {
    let mut params = params.clone();
    params.insert(OVERLOAD_PARAM.to_string(), verb.to_string());
    params
}

/// What a POST carries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequestBody {
    Form(Params),
    Json(Value),
}

impl RequestBody {
    /// GraphQL always wants JSON. Everything else is form-encoded, unless
    /// the client was asked to post JSON.
    pub(crate) fn for_post(entry_point: EntryPoint, post_as_json: bool, params: &Params) -> Self {
        if entry_point == EntryPoint::Graphql || post_as_json {
            let object = params
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            RequestBody::Json(Value::Object(object))
        } else {
            RequestBody::Form(params.clone())
        }
    }

    pub(crate) fn apply(self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            RequestBody::Form(params) => request.form(&params),
            RequestBody::Json(value) => request.json(&value),
        }
    }
}
