//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default API root when `DIARY_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Configuration for the API client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it (e.g. `/token/`).
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Also refresh when the access token is missing but a refresh token is
    /// stored. Off by default: only an expired token triggers a refresh.
    pub refresh_on_missing_access: bool,
    /// Credentials file for the file-backed token store; `None` selects the
    /// platform default.
    pub credentials_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Configuration pointing at `base_url`, everything else default.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(30),
            refresh_on_missing_access: false,
            credentials_path: None,
        })
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                          | Default                      |
    /// |-----------------------------------|------------------------------|
    /// | `DIARY_API_URL`                   | `http://localhost:8000/api`  |
    /// | `DIARY_API_TIMEOUT_SECS`          | `30`                         |
    /// | `DIARY_REFRESH_ON_MISSING_ACCESS` | `false`                      |
    /// | `DIARY_CREDENTIALS_PATH`          | platform data dir            |
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("DIARY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut config = Self::new(&base_url)?;
        if let Some(secs) = std::env::var("DIARY_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config.refresh_on_missing_access = std::env::var("DIARY_REFRESH_ON_MISSING_ACCESS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        config.credentials_path = std::env::var_os("DIARY_CREDENTIALS_PATH").map(PathBuf::from);
        Ok(config)
    }

    /// Absolute URL for an endpoint path such as `/teacher/marks/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::Config(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "{raw}: unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(url)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
