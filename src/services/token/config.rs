//! Configuration for the token manager.

use std::env;
use std::str::FromStr;

use crate::errors::TokenResult;

use super::algorithm::Algorithm;

/// Compiled-in fallback secret; deployments are expected to override it.
pub const DEFAULT_SECRET: &str = "asdqwe";

/// Default token lifetime carried over from existing deployments.
///
/// The mint path computes `createTime + timeout_secs * 1000`, so this
/// value yields tokens that effectively never expire (~274 years). Kept
/// for wire compatibility; see DESIGN.md.
pub const DEFAULT_TIMEOUT_SECS: i64 = 8_640_000;

/// Configuration for the token manager.
///
/// Created once at startup and treated as immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct TokenManagerConfig {
    /// HMAC signing secret (UTF-8 bytes).
    pub secret: String,

    /// HMAC signing algorithm.
    pub algorithm: Algorithm,

    /// Default token lifetime, multiplied by 1000 and added to the mint
    /// timestamp when computing the expiry instant.
    pub timeout_secs: i64,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TokenManagerConfig {
    /// Creates a configuration with the given secret and defaults for
    /// everything else.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: i64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// True when running on the compiled-in fallback secret (security
    /// warning for the composition root).
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Reads `JWT_TOKEN_SECRET`, `JWT_TOKEN_TIMEOUT`, and
    /// `JWT_TOKEN_ALGORITHM` from the environment, falling back to the
    /// defaults above. An unrecognized algorithm name is an error rather
    /// than a silent fallback.
    pub fn from_env() -> TokenResult<Self> {
        let secret =
            env::var("JWT_TOKEN_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());
        let timeout_secs = env::var("JWT_TOKEN_TIMEOUT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let algorithm = match env::var("JWT_TOKEN_ALGORITHM") {
            Ok(name) => Algorithm::from_str(&name)?,
            Err(_) => Algorithm::HS256,
        };

        Ok(Self {
            secret,
            algorithm,
            timeout_secs,
        })
    }
}
