//! API gateway: the single outbound path for application requests.
//!
//! Before a request is sent the gateway resolves an access token: a valid
//! stored token is used as-is, an expired (or undecodable) one is refreshed
//! first. Refreshes are coalesced: while one is in flight, other requests
//! wait for it and reuse its result instead of starting their own.

use diary_core::auth::jwt;
use diary_core::models::auth::{RefreshRequest, RefreshResponse};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::session::{Session, TOKEN_REFRESH_PATH};

/// Authenticated HTTP client over a [`Session`].
pub struct ApiGateway {
    session: Session,
    refresh_lock: Mutex<()>,
}

impl ApiGateway {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -------------------------------------------------------------------------
    // Typed helpers
    // -------------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        Ok(resp.json().await?)
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(resp.json().await?)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::PUT, path).json(body)).await?;
        Ok(resp.json().await?)
    }

    /// DELETE; the response body (usually empty) is discarded.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Request pipeline
    // -------------------------------------------------------------------------

    /// Unauthenticated request builder for an endpoint path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.session
            .http()
            .request(method, self.session.config().endpoint(path))
    }

    /// Attach a valid bearer token (refreshing first if needed) and send.
    /// Non-success statuses become errors.
    pub async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = match self.resolve_access_token().await? {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!("no access token; sending request unauthenticated");
                request
            }
        };

        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!(%status, "API rejected the access token");
        }
        Err(ClientError::from_status(status, body))
    }

    /// The token to attach to the next request.
    ///
    /// - no access token → `None` (unless `refresh_on_missing_access` is set
    ///   and a refresh token exists)
    /// - valid access token → that token
    /// - expired or undecodable → a freshly refreshed token, or
    ///   [`ClientError::SessionExpired`] if the refresh fails
    pub async fn resolve_access_token(&self) -> ClientResult<Option<String>> {
        let store = self.session.store();
        let Some(access) = store.access() else {
            if self.session.config().refresh_on_missing_access && store.refresh().is_some() {
                debug!("access token missing; refreshing");
                return self.refresh_access_token(None).await.map(Some);
            }
            return Ok(None);
        };

        if self.is_usable(&access) {
            return Ok(Some(access));
        }
        debug!("access token expired; refreshing");
        self.refresh_access_token(Some(&access)).await.map(Some)
    }

    fn is_usable(&self, access: &str) -> bool {
        match jwt::decode_claims(access) {
            Ok(claims) => !jwt::is_expired(&claims, self.session.now()),
            Err(e) => {
                debug!(error = %e, "access token does not decode");
                false
            }
        }
    }

    /// Refresh under the gateway's lock. `stale` is the token the caller saw;
    /// if the store holds a different, usable token by the time the lock is
    /// acquired, another request already refreshed and that token is reused.
    async fn refresh_access_token(&self, stale: Option<&str>) -> ClientResult<String> {
        let _guard = self.refresh_lock.lock().await;
        let store = self.session.store();

        if let Some(current) = store.access()
            && Some(current.as_str()) != stale
            && self.is_usable(&current)
        {
            debug!("reusing token refreshed by a concurrent request");
            return Ok(current);
        }

        let Some(refresh) = store.refresh() else {
            warn!("access token expired and no refresh token stored");
            return Err(ClientError::SessionExpired);
        };

        match self.request_refresh(&refresh).await {
            Ok(tokens) => {
                match &tokens.refresh {
                    Some(rotated) => store.save(&tokens.access, rotated)?,
                    None => store.set_access(&tokens.access)?,
                }
                info!("access token refreshed");
                Ok(tokens.access)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// `POST /token/refresh/`. Bypasses [`send`](Self::send) so it never
    /// carries a bearer token or recurses into another refresh.
    async fn request_refresh(&self, refresh: &str) -> ClientResult<RefreshResponse> {
        let resp = self
            .request(Method::POST, TOKEN_REFRESH_PATH)
            .json(&RefreshRequest { refresh })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, body));
        }
        Ok(resp.json().await?)
    }
}
