//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::TokenError;

pub type TokenResult<T> = Result<T, TokenError>;
