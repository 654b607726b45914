//! Shared types for Chirpy

pub mod error;
pub mod user;

pub use error::{AuthError, ChirpyError, Result, UNAUTHORIZED_MESSAGE};
pub use user::{User, UserId};
