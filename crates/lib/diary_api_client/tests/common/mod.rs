//! Shared fixtures: a wiremock server standing in for the diary API, an
//! in-memory token store and a manual clock.

#![allow(dead_code)]

use std::sync::Arc;

use diary_api_client::{ApiGateway, ClientConfig, Session};
use diary_core::auth::jwt;
use diary_core::auth::{ManualClock, MemoryTokenStore, TokenStore};
use diary_core::models::auth::{Claims, Role, Subject};
use wiremock::MockServer;

pub const NOW: i64 = 1_700_000_000;

pub fn token(role: Role, exp: i64) -> String {
    let claims = Claims {
        subject: Subject::Id(11),
        role: Some(role),
        exp,
        iat: Some(exp - 300),
        jti: Some(format!("jti-{exp}")),
        token_type: Some("access".into()),
    };
    jwt::sign_claims(&claims, b"server-secret").unwrap()
}

pub struct Harness {
    pub server: MockServer,
    pub store: Arc<dyn TokenStore>,
    pub clock: Arc<ManualClock>,
    pub gateway: ApiGateway,
}

pub async fn harness() -> Harness {
    harness_with(Arc::new(MemoryTokenStore::new()), |_| {}).await
}

pub async fn harness_with(
    store: Arc<dyn TokenStore>,
    configure: impl FnOnce(&mut ClientConfig),
) -> Harness {
    let server = MockServer::start().await;
    let mut config = ClientConfig::new(&format!("{}/api", server.uri())).unwrap();
    configure(&mut config);
    let clock = Arc::new(ManualClock::new(NOW));
    let session = Session::new(config, store.clone())
        .unwrap()
        .with_clock(clock.clone());
    Harness {
        server,
        store,
        clock,
        gateway: ApiGateway::new(session),
    }
}

/// Store that only ever holds a refresh token.
pub struct RefreshOnlyStore {
    inner: MemoryTokenStore,
}

impl RefreshOnlyStore {
    pub fn new(refresh: &str) -> Self {
        let inner = MemoryTokenStore::new();
        inner.save("", refresh).unwrap();
        Self { inner }
    }
}

impl TokenStore for RefreshOnlyStore {
    fn access(&self) -> Option<String> {
        self.inner.access().filter(|a| !a.is_empty())
    }

    fn refresh(&self) -> Option<String> {
        self.inner.refresh()
    }

    fn save(&self, access: &str, refresh: &str) -> Result<(), diary_core::auth::StoreError> {
        self.inner.save(access, refresh)
    }

    fn set_access(&self, access: &str) -> Result<(), diary_core::auth::StoreError> {
        self.inner.set_access(access)
    }

    fn clear(&self) -> Result<(), diary_core::auth::StoreError> {
        self.inner.clear()
    }
}
