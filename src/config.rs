//! Runtime configuration — environment variables parsed once at startup.

use std::env;

/// Application-level constants.
pub const APP_NAME: &str = "Boutik";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info,boutik=debug".to_string()
}

/// Deployment environment. Production additionally enables HSTS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Parsed process configuration.
///
/// The hosted backend owns all durable state, so configuration reduces to
/// "where is the backend, who are we to it, and who may call us".
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted Supabase project (no trailing slash).
    pub supabase_url: String,
    /// Service-role key used by the backend for data-API calls.
    pub supabase_service_key: String,
    /// TCP port the API server binds to.
    pub port: u16,
    /// Extra CORS origins from the environment, merged with the built-in
    /// dev defaults by the CORS middleware.
    pub allowed_origins: Vec<String>,
    pub environment: Environment,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = require("SUPABASE_URL")?;
        let supabase_service_key = require("SUPABASE_SERVICE_KEY")?;

        let port = match env::var("PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => 3001,
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let environment = env::var("APP_ENV")
            .map(|raw| Environment::parse(&raw))
            .unwrap_or(Environment::Development);

        Ok(Config {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_service_key,
            port,
            allowed_origins,
            environment,
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidVar {
        var: "PORT",
        reason: e.to_string(),
    })
}

/// Split a comma-separated origin list, dropping empties and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
