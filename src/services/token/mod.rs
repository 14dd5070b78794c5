//! Token service module for bearer-token management.
//!
//! This module handles all token-related operations including:
//! - Minting signed, DEFLATE-compressed bearer tokens
//! - Refresh and regeneration with a fresh mint timestamp
//! - Best-effort claim inspection for HTTP filters
//! - Validation against a ground-truth credential pair

mod algorithm;
mod clock;
mod codec;
mod config;
mod manager;

#[cfg(test)]
mod tests;

pub use algorithm::Algorithm;
pub use clock::{Clock, SystemClock};
pub use codec::JwtCodec;
pub use config::{TokenManagerConfig, DEFAULT_SECRET, DEFAULT_TIMEOUT_SECS};
pub use manager::TokenManager;
