//! Common error types for intake collaborators.

use thiserror::Error;

/// Errors raised by the collaborators the submission pipeline calls
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis connection/operation error
    #[error("Redis error: {0}")]
    Redis(String),

    /// reCAPTCHA service unreachable or answered with garbage
    #[error("reCAPTCHA error: {0}")]
    Recaptcha(String),

    /// Bearer token could not be resolved to a user
    #[error("Identity error: {0}")]
    Identity(String),

    /// Submission could not be encoded for storage
    #[error("Storage error: {0}")]
    Storage(String),
}

impl IntakeError {
    /// Returns true if the failure originated in infrastructure rather than in
    /// the caller's input
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Redis(_) | Self::Storage(_))
    }
}
