//! Human-verification (reCAPTCHA) collaborator.

mod client;

pub use client::RecaptchaClient;

use async_trait::async_trait;
use intake_common::{IntakeError, VerificationResult};

/// Checks a client-supplied challenge token against the verification service.
///
/// An `Err` means the service could not be asked; an unsuccessful answer is an
/// `Ok` result with `success == false`.
#[async_trait]
pub trait RecaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerificationResult, IntakeError>;
}
