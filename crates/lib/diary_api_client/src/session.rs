//! Session service: login/logout and the derived "current user".
//!
//! The session is never cached: every query re-reads the token store and
//! decodes the access token, so a logout or refresh is visible immediately.

use std::sync::Arc;

use diary_core::auth::jwt;
use diary_core::auth::{Clock, FileTokenStore, SystemClock, TokenStore};
use diary_core::models::auth::{Claims, LoginRequest, TokenPair};
use diary_core::routes::{self, GuardDecision, Route};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Login endpoint.
pub const TOKEN_PATH: &str = "/token/";
/// Refresh endpoint.
pub const TOKEN_REFRESH_PATH: &str = "/token/refresh/";

/// Token lifecycle over a [`TokenStore`].
pub struct Session {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            store,
            clock: Arc::new(SystemClock),
        })
    }

    /// Session backed by the credentials file named in `config` (or the
    /// platform default).
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let store = match &config.credentials_path {
            Some(path) => FileTokenStore::new(path),
            None => FileTokenStore::at_default_path(),
        };
        Self::new(config, Arc::new(store))
    }

    /// Replace the clock used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Current time in unix seconds, from the session clock.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Exchange credentials for a token pair and persist it once the access
    /// token decodes.
    ///
    /// A 400/401 from the server is [`ClientError::Credentials`]; nothing is
    /// retried.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Claims> {
        let resp = self
            .http
            .post(self.config.endpoint(TOKEN_PATH))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            warn!(username, %status, "login rejected");
            return Err(ClientError::Credentials);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, body));
        }

        let pair: TokenPair = resp.json().await?;
        // An access token that does not decode is never persisted.
        let claims = jwt::decode_claims(&pair.access)?;
        self.store.save(&pair.access, &pair.refresh)?;
        info!(username, subject = %claims.subject, role = ?claims.role, "logged in");
        Ok(claims)
    }

    /// Forget both tokens. Never fails; store errors are logged.
    pub fn logout(&self) {
        match self.store.clear() {
            Ok(()) => info!("logged out"),
            Err(e) => warn!(error = %e, "failed to clear stored tokens"),
        }
    }

    /// Claims of the stored access token, or `None` when signed out.
    ///
    /// A half-present pair (only one of access/refresh) or an undecodable
    /// token both read as "no session".
    pub fn current_user(&self) -> Option<Claims> {
        let access = self.store.access()?;
        if self.store.refresh().is_none() {
            debug!("access token stored without refresh token; treating as signed out");
            return None;
        }
        match jwt::decode_claims(&access) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "stored access token does not decode");
                None
            }
        }
    }

    /// `true` iff a session exists and `now < exp`.
    ///
    /// Local check only; a 401 from the API overrides it.
    pub fn is_authenticated(&self) -> bool {
        self.current_user()
            .is_some_and(|claims| claims.is_valid_at(self.now()))
    }

    /// Landing route after login, `None` when the role is missing or unknown.
    pub fn home_route(&self) -> Option<Route> {
        self.current_user()
            .and_then(|claims| claims.role)
            .and_then(Route::home_for)
    }

    /// Run the route guard against the current session.
    pub fn guard(&self, route: Route) -> GuardDecision {
        let user = self.current_user();
        let authenticated = user
            .as_ref()
            .is_some_and(|claims| claims.is_valid_at(self.now()));
        routes::guard_route(route, authenticated, user.as_ref())
    }

    /// Resolve a path and guard it. Unmatched paths resolve to `/`.
    pub fn navigate(&self, path: &str) -> (Route, GuardDecision) {
        let route = Route::resolve(path);
        (route, self.guard(route))
    }
}
