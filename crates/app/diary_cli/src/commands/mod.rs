pub mod auth;
pub mod navigate;
pub mod output;
pub mod student;
pub mod teacher;

use std::path::PathBuf;

use diary_api_client::{ApiGateway, ClientConfig, ClientError, Session};
use diary_core::routes::{GuardDecision, Route};

use crate::cli::Commands;
use crate::{Error, Result};

pub fn version() -> Result<()> {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Build the gateway from the environment plus command-line overrides.
pub fn connect(api_url: Option<&str>, credentials: Option<PathBuf>) -> Result<ApiGateway> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config.base_url = ClientConfig::new(url)?.base_url;
    }
    if credentials.is_some() {
        config.credentials_path = credentials;
    }
    log::debug!("API root {}", config.base_url);

    Ok(ApiGateway::new(Session::from_config(config)?))
}

pub async fn dispatch(gateway: &ApiGateway, command: Commands) -> Result<()> {
    let result = match command {
        Commands::Version => version(),
        Commands::Login { username, password } => {
            auth::login(gateway.session(), &username, &password).await
        }
        Commands::Logout => auth::logout(gateway.session()),
        Commands::Whoami => auth::whoami(gateway.session()),
        Commands::Navigate { path } => navigate::navigate(gateway.session(), &path),
        Commands::Teacher(command) => teacher::run(gateway, command).await,
        Commands::Student(command) => student::run(gateway, command).await,
    };

    // A session that can no longer be refreshed is dropped so the next
    // command starts from the login page.
    if let Err(Error::Api {
        source: ClientError::SessionExpired,
        ..
    }) = &result
    {
        gateway.session().logout();
    }
    result
}

/// Bring the stored access token up to date, then run the route guard.
///
/// An expired token is refreshed through the gateway first, so a session
/// that can still be refreshed is not turned away. Fails with
/// [`Error::Denied`] unless the session may open `route`.
pub async fn authorize(gateway: &ApiGateway, route: Route) -> Result<()> {
    let session = gateway.session();
    if session.store().refresh().is_some() {
        gateway
            .resolve_access_token()
            .await
            .map_err(Error::api("refresh session"))?;
    }

    match session.guard(route) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect(redirect) => Err(Error::Denied {
            route,
            redirect,
            signed_in: session.is_authenticated(),
        }),
    }
}
