//! # DataQuality Auth Core
//!
//! Bearer-token minting, refresh, inspection, and validation for the
//! data-quality platform's authentication layer. This crate contains the
//! claims model, the signed-and-compressed token codec, and the token
//! manager that the surrounding HTTP layer talks to.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
