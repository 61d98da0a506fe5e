//! A client for the Upwork REST and GraphQL API.
//!
//! ```no_run
//! use upwork_api::api::routers::graphql::{Graphql, GraphqlRequest};
//! use upwork_api::{ApiClient, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ApiClient::setup(Config::read("config.json")?)?;
//! if !client.has_access_token() {
//!     println!("Visit {}", client.authorization_url(&upwork_api::oauth::new_state())?);
//!     client.get_token("code-from-the-redirect").await?;
//! }
//!
//! let response = Graphql::new(&mut client)
//!     .execute_query(&GraphqlRequest::new("{ user { id nid } }"))
//!     .await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod oauth;

pub use api::{ApiClient, ApiError, ApiResponse, Config, ConfigError, EntryPoint, Params};
pub use oauth::{AuthError, Token};
