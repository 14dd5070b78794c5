//! Token error taxonomy for mint, decode, and configuration failures.
//!
//! Expiry is deliberately not an error: it surfaces through
//! `TokenManager::is_expired` and `TokenManager::validate` instead.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// The algorithm name is not one of the supported HMAC families.
    #[error("unsupported signing algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    /// The token is not a valid three-segment compact serialization, or
    /// its payload fails to decompress or parse.
    #[error("malformed token: {reason}")]
    Malformed { reason: String },

    /// The HMAC signature did not verify against the configured secret.
    #[error("invalid signature")]
    InvalidSignature,

    /// Regeneration was asked for a token without usable credentials.
    #[error("cannot extract user info from token")]
    MissingUserInfo,
}

impl TokenError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}
