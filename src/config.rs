//! Configuration for Chirpy
//!
//! CLI arguments and environment variable handling using clap. A `.env` file
//! is loaded by `main` before parsing, so every option can live there too.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

use crate::types::ChirpyError;

/// Signing secret used when `PLATFORM=dev` and no `JWT_SECRET` is set
const DEV_JWT_SECRET: &str = "dev-only-insecure-secret-do-not-deploy";

/// Webhook key used when `PLATFORM=dev` and no `POLKA_KEY` is set
const DEV_POLKA_KEY: &str = "dev-only-polka-key";

/// Shortest signing secret accepted outside dev (HS256 key size)
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Deployment platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Dev,
    Prod,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Chirpy - authentication and session API
#[derive(Parser, Debug, Clone)]
#[command(name = "chirpy")]
#[command(about = "Chirpy API server: users, login and session tokens")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Deployment platform (`dev` enables built-in insecure credentials)
    #[arg(long, env = "PLATFORM", value_enum, default_value = "prod")]
    pub platform: Platform,

    /// Secret for access token signing (required outside dev)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// API key the payment webhook must present (required outside dev)
    #[arg(long, env = "POLKA_KEY", hide_env_values = true)]
    pub polka_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Args {
    pub fn is_dev(&self) -> bool {
        self.platform == Platform::Dev
    }

    /// Get effective JWT secret (uses default in dev mode)
    pub fn jwt_secret(&self) -> Result<String, ChirpyError> {
        match (&self.jwt_secret, self.is_dev()) {
            (Some(secret), _) => Ok(secret.clone()),
            (None, true) => Ok(DEV_JWT_SECRET.to_string()),
            (None, false) => Err(ChirpyError::Config(
                "JWT_SECRET is required in production mode".into(),
            )),
        }
    }

    /// Get effective webhook API key (uses default in dev mode)
    pub fn polka_key(&self) -> Result<String, ChirpyError> {
        match (&self.polka_key, self.is_dev()) {
            (Some(key), _) => Ok(key.clone()),
            (None, true) => Ok(DEV_POLKA_KEY.to_string()),
            (None, false) => Err(ChirpyError::Config(
                "POLKA_KEY is required in production mode".into(),
            )),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.is_dev() {
            return Ok(());
        }

        match &self.jwt_secret {
            None => return Err("JWT_SECRET is required in production mode".to_string()),
            Some(secret) if secret.len() < MIN_JWT_SECRET_BYTES => {
                return Err(format!(
                    "JWT_SECRET must be at least {MIN_JWT_SECRET_BYTES} bytes"
                ));
            }
            Some(_) => {}
        }

        if self.polka_key.as_deref().map_or(true, str::is_empty) {
            return Err("POLKA_KEY is required in production mode".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chirpy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_dev_defaults() {
        let args = parse(&["--platform", "dev"]);
        assert!(args.is_dev());
        assert!(args.validate().is_ok());
        assert_eq!(args.jwt_secret().unwrap(), DEV_JWT_SECRET);
        assert_eq!(args.polka_key().unwrap(), DEV_POLKA_KEY);
    }

    #[test]
    fn test_prod_requires_secrets() {
        let args = parse(&["--platform", "prod"]);
        assert!(args.validate().is_err());
        assert!(matches!(args.jwt_secret(), Err(ChirpyError::Config(_))));
        assert!(matches!(args.polka_key(), Err(ChirpyError::Config(_))));
    }

    #[test]
    fn test_prod_rejects_short_secret() {
        let args = parse(&[
            "--platform",
            "prod",
            "--jwt-secret",
            "too-short",
            "--polka-key",
            "key",
        ]);
        let err = args.validate().unwrap_err();
        assert!(err.contains("at least 32 bytes"));
    }

    #[test]
    fn test_prod_valid() {
        let args = parse(&[
            "--platform",
            "prod",
            "--jwt-secret",
            "0123456789abcdef0123456789abcdef",
            "--polka-key",
            "f271c819202a4667a425332c02094c97",
            "--listen",
            "127.0.0.1:9000",
            "--log-format",
            "json",
        ]);
        assert!(args.validate().is_ok());
        assert_eq!(args.listen.port(), 9000);
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
