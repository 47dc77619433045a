//! Domain models shared by the API client and the CLI.

pub mod auth;
pub mod school;
