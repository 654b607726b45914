//! Chirpy - authentication and session-credential core
//!
//! Password hashing, signed access tokens, revocable refresh tokens and the
//! `Authorization` header gate, served over a small hyper HTTP API with an
//! in-memory credential store.

pub mod auth;
pub mod config;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{AuthError, ChirpyError, Result};
