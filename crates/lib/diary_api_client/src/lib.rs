//! # diary_api_client
//!
//! Authenticated HTTP client for the Diary REST API.
//!
//! [`Session`] owns the token lifecycle (login, logout, current user) on top
//! of a [`TokenStore`](diary_core::auth::TokenStore). [`ApiGateway`] is the
//! single path every application request takes: it refreshes an expired
//! access token before attaching it. [`TeacherApi`] and [`StudentApi`] are
//! typed views over the gateway.

pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod student;
pub mod teacher;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::ApiGateway;
pub use session::Session;
pub use student::StudentApi;
pub use teacher::TeacherApi;
