mod client;
mod config;
mod endpoints;
mod http_client;
mod response;
pub mod routers;

pub use client::{ApiClient, ApiError};
pub use config::{parse_timestamp, Config, ConfigError, GrantType, TIME_FORMAT};
pub use endpoints::{
    EntryPoint, Endpoints, ACCESS_TOKEN_ENDPOINT, AUTHORIZATION_ENDPOINT, BASE_HOST, DATA_FORMAT,
    GRAPHQL_ENDPOINT, OVERLOAD_PARAM, TENANT_ID_HEADER, USER_AGENT,
};
pub use http_client::Params;
pub use response::ApiResponse;
