//! Main token manager implementation.

use crate::domain::entities::token::{Claims, TokenInfo};
use crate::errors::{TokenError, TokenResult};

use super::clock::{Clock, SystemClock};
use super::codec::JwtCodec;
use super::config::TokenManagerConfig;

/// Mints, refreshes, inspects, and validates bearer tokens.
///
/// The only component callers see. Stateless after construction and
/// holding only immutable configuration, so a single instance can be
/// shared across threads by the composition root (typically behind an
/// `Arc`).
pub struct TokenManager<C: Clock = SystemClock> {
    config: TokenManagerConfig,
    codec: JwtCodec,
    clock: C,
}

impl TokenManager<SystemClock> {
    /// Creates a manager backed by the system wall clock.
    pub fn new(config: TokenManagerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TokenManager<C> {
    /// Creates a manager with an explicit clock; tests inject a fixed
    /// one here.
    pub fn with_clock(config: TokenManagerConfig, clock: C) -> Self {
        let codec = JwtCodec::new(config.secret.as_bytes().to_vec(), config.algorithm);
        Self {
            config,
            codec,
            clock,
        }
    }

    /// Mints a token for the given credentials with the default
    /// timeout. Absent credentials become empty-string claims.
    pub fn generate(&self, username: Option<&str>, password: Option<&str>) -> TokenResult<String> {
        let claims = Claims::for_user(username, password, self.clock.now_millis());
        self.emit(claims, self.config.timeout_secs)
    }

    /// Mints a token for a credential pair with the default timeout.
    pub fn generate_for(&self, info: &TokenInfo) -> TokenResult<String> {
        self.generate(Some(&info.username), Some(&info.password))
    }

    /// Mints a token for a credential pair with a caller-supplied
    /// timeout in seconds.
    pub fn generate_with_timeout(&self, info: &TokenInfo, timeout_secs: i64) -> TokenResult<String> {
        let claims = Claims::for_user(
            Some(&info.username),
            Some(&info.password),
            self.clock.now_millis(),
        );
        self.emit(claims, timeout_secs)
    }

    /// Mints a replacement for `token` with a fresh mint time and the
    /// given timeout, reusing the credentials carried in its claims.
    ///
    /// Fails with [`TokenError::MissingUserInfo`] when either credential
    /// is empty or cannot be read from the token.
    pub fn regenerate(&self, token: &str, timeout_secs: i64) -> TokenResult<String> {
        let username = self.username_of(token).filter(|name| !name.is_empty());
        let password = self.password_of(token).filter(|word| !word.is_empty());
        let (username, password) = match (username, password) {
            (Some(username), Some(password)) => (username, password),
            _ => return Err(TokenError::MissingUserInfo),
        };

        let claims = Claims::for_user(
            Some(&username),
            Some(&password),
            self.clock.now_millis(),
        );
        self.emit(claims, timeout_secs)
    }

    /// Re-mints `token` with `createTime = now` and the default timeout,
    /// preserving every other claim key.
    pub fn refresh(&self, token: &str) -> TokenResult<String> {
        let claims = self.claims_of(token)?.refreshed(self.clock.now_millis());
        self.emit(claims, self.config.timeout_secs)
    }

    /// Mints a non-expiring token (no `exp` claim) for service-to-service
    /// channels.
    pub fn generate_continuous(&self, info: &TokenInfo) -> TokenResult<String> {
        let claims = Claims::for_user(
            Some(&info.username),
            Some(&info.password),
            self.clock.now_millis(),
        );
        let subject = claims.username.clone();
        self.codec.encode(claims, subject.as_deref(), None)
    }

    /// Best-effort read of the `username` claim; decode failures are
    /// logged and yield `None`. HTTP filters call this per request.
    pub fn username_of(&self, token: &str) -> Option<String> {
        match self.claims_of(token) {
            Ok(claims) => claims.username,
            Err(error) => {
                tracing::error!(
                    event = "token_claim_read_failed",
                    claim = "username",
                    error = %error,
                    "failed to read username from token"
                );
                None
            }
        }
    }

    /// Best-effort read of the `password` claim; decode failures are
    /// logged and yield `None`.
    pub fn password_of(&self, token: &str) -> Option<String> {
        match self.claims_of(token) {
            Ok(claims) => claims.password,
            Err(error) => {
                tracing::error!(
                    event = "token_claim_read_failed",
                    claim = "password",
                    error = %error,
                    "failed to read password from token"
                );
                None
            }
        }
    }

    /// Best-effort read of the mint timestamp in epoch milliseconds.
    pub fn created_at_millis(&self, token: &str) -> Option<i64> {
        match self.claims_of(token) {
            Ok(claims) => claims.create_time,
            Err(error) => {
                tracing::error!(
                    event = "token_claim_read_failed",
                    claim = "createTime",
                    error = %error,
                    "failed to read create time from token"
                );
                None
            }
        }
    }

    /// Best-effort read of the expiry instant in epoch milliseconds;
    /// `None` for continuous or unreadable tokens.
    pub fn expires_at_millis(&self, token: &str) -> Option<i64> {
        match self.claims_of(token) {
            Ok(claims) => claims.exp.map(|exp| exp * 1000),
            Err(error) => {
                tracing::error!(
                    event = "token_claim_read_failed",
                    claim = "exp",
                    error = %error,
                    "failed to read expiration from token"
                );
                None
            }
        }
    }

    /// Decodes and verifies the token, propagating decode errors.
    pub fn claims_of(&self, token: &str) -> TokenResult<Claims> {
        self.codec.decode(token)
    }

    /// True iff the token decodes, carries exactly the expected
    /// credential pair (byte-exact comparison), and is not expired.
    /// Never errors.
    pub fn validate(&self, token: &str, username: &str, password: &str) -> bool {
        let token_username = self.username_of(token);
        let token_password = self.password_of(token);

        token_username.as_deref() == Some(username)
            && token_password.as_deref() == Some(password)
            && !self.is_expired(token)
    }

    /// True iff the token carries an `exp` claim whose instant has
    /// passed. Continuous and unreadable tokens are never expired.
    pub fn is_expired(&self, token: &str) -> bool {
        match self.expires_at_millis(token) {
            Some(expires_at) => expires_at < self.clock.now_millis(),
            None => false,
        }
    }

    /// Encodes claims with the subject mirrored from the username claim
    /// and an expiry of `createTime + timeout_secs * 1000`.
    fn emit(&self, claims: Claims, timeout_secs: i64) -> TokenResult<String> {
        let create_time = claims
            .create_time
            .unwrap_or_else(|| self.clock.now_millis());
        let expiry_millis = create_time + timeout_secs * 1000;
        let subject = claims.username.clone();
        self.codec.encode(claims, subject.as_deref(), Some(expiry_millis))
    }
}
