use diary_api_client::ClientError;
use diary_core::routes::Route;
use diary_core::validation::ValidationError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Json::{}", .0)]
    Json(#[from] serde_json::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("{}", .0)]
    Validation(#[from] ValidationError),

    #[error("{}", .0)]
    Client(#[from] ClientError),

    /// A request failed; `action` names what the user was doing.
    #[error("Failed to {action}: {source}")]
    Api {
        action: &'static str,
        source: ClientError,
    },

    /// The route guard refused `route`. `signed_in` tells a missing or
    /// expired session apart from a wrong role.
    #[error("Access to {route} denied; redirected to {redirect}")]
    Denied {
        route: Route,
        redirect: Route,
        signed_in: bool,
    },

    #[error("Invalid role.")]
    InvalidRole,
}

impl Error {
    pub fn api(action: &'static str) -> impl FnOnce(ClientError) -> Error {
        move |source| Error::Api { action, source }
    }

    /// `true` when the stored session is no longer usable.
    pub fn requires_login(&self) -> bool {
        match self {
            Error::Api { source, .. } | Error::Client(source) => source.requires_login(),
            Error::Denied { signed_in, .. } => !signed_in,
            _ => false,
        }
    }
}
