//! # diary_core
//!
//! Core domain logic for Diary: token claims and storage, the client-side
//! route table and guard, resource models, and input validation.

pub mod auth;
pub mod models;
pub mod routes;
pub mod validation;
