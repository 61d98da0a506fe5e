use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use upwork_api::api::routers::graphql::{Graphql, GraphqlRequest};
use upwork_api::api::GrantType;
use upwork_api::oauth::{self, NotifyError, TokenNotifyFn, TokenStorage};
use upwork_api::{ApiClient, Config, Token};

const DEFAULT_QUERY: &str = "{ user { id nid } organization { id } }";

/// Runs a GraphQL query against the Upwork API, authorizing first if needed.
#[derive(Debug, Parser)]
#[command(name = "upworkctl", version)]
struct Cli {
    /// JSON configuration file holding the OAuth2 client credentials.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Organization to address the query to.
    #[arg(long)]
    tenant: Option<String>,

    /// Forget the cached token pair and authorize again.
    #[arg(long)]
    reauthorize: bool,

    /// The GraphQL query to run.
    #[arg(default_value = DEFAULT_QUERY)]
    query: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::read(&cli.config)?;
    init_tracing(config.debug);

    let storage = Arc::new(TokenStorage::new(&config.client_id)?);
    if cli.reauthorize {
        storage.clear()?;
    }

    let mut client = ApiClient::setup(config)?;

    // Whenever the client refreshes its token, the cached pair follows along.
    let cache = Arc::clone(&storage);
    let notify: TokenNotifyFn = Arc::new(move |token: &Token| -> Result<(), NotifyError> {
        cache.save(token)?;
        Ok(())
    });
    client.set_refresh_token_notify_fn(notify);

    if let Some(tenant) = &cli.tenant {
        client.set_org_uid_header(tenant)?;
    }

    login(&mut client, &storage, cli.reauthorize).await?;

    let response = Graphql::new(&mut client)
        .execute_query(&GraphqlRequest::new(cli.query))
        .await?;
    if !response.is_success() {
        tracing::warn!(status = %response.status(), "query was not successful");
    }
    println!("{}", response.text());

    Ok(())
}

/// Makes sure the client holds a token.
/// If nothing usable is known, the user is walked through authorization.
async fn login(client: &mut ApiClient, storage: &TokenStorage, reauthorize: bool) -> Result<()> {
    // Tokens from the configuration file take precedence over cached ones.
    if !reauthorize {
        if client.has_access_token() {
            return Ok(());
        }
        if let Some(token) = storage.load()? {
            tracing::debug!("using cached token pair");
            client.set_token(token);
            return Ok(());
        }
    }

    let token = match client.config().grant_type {
        GrantType::ClientCredentials => client.get_token("").await?,
        GrantType::AuthorizationCode => {
            let state = oauth::new_state();
            println!("Visit the authorization URL and provide the code you are redirected with:");
            println!("{}", client.authorization_url(&state)?);

            let code = interactive_prompt("the authorization code")?;
            if code.is_empty() {
                bail!("no authorization code was given");
            }
            client.get_token(&code).await?
        }
    };

    storage.save(&token)?;
    Ok(())
}

/// Quick function to read a line of input from the user.
fn interactive_prompt(prompt_type: &str) -> io::Result<String> {
    let mut response = String::new();
    print!("Please enter {prompt_type}: ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut response)?;

    Ok(response.trim().to_string())
}

/// Logs go to stderr so that query output stays clean. `RUST_LOG` wins over
/// the configuration's debug flag.
fn init_tracing(debug: bool) {
    let default_directives = if debug {
        "upwork_api=debug,upworkctl=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
