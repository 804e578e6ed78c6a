//! Identity provider seam.
//!
//! The identity provider owns user accounts. This crate only reads and writes
//! the free-usage counter kept in a user's private metadata.

pub mod clerk;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use clerk::ClerkIdentityProvider;

/// Metadata key holding the free-usage counter
pub const FREE_USAGE_KEY: &str = "free_usage";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Identity provider is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Identity provider request failed: {0}")]
    Transport(String),

    #[error("Identity provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current free-usage counter of a user, normalized to a count
    async fn free_usage(&self, user_id: &str) -> Result<u32, IdentityError>;

    /// Overwrite the free-usage counter of a user
    async fn set_free_usage(&self, user_id: &str, count: u32) -> Result<(), IdentityError>;
}

/// Read the free-usage counter out of a private metadata object.
///
/// Missing, non-numeric, non-finite or negative values count as zero.
/// Fractional values are truncated.
pub fn free_usage_from_metadata(metadata: &Value) -> u32 {
    let value = match metadata.get(FREE_USAGE_KEY) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}
