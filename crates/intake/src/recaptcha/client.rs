//! reCAPTCHA siteverify HTTP client.

use async_trait::async_trait;
use intake_common::{IntakeError, VerificationResult};
use std::time::Duration;

use super::RecaptchaVerifier;
use crate::config::RecaptchaConfig;

/// Calls the siteverify endpoint once per token
pub struct RecaptchaClient {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl RecaptchaClient {
    pub fn new(config: &RecaptchaConfig) -> Result<Self, IntakeError> {
        if config.secret.is_empty() {
            return Err(IntakeError::Config("recaptcha secret is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IntakeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
        })
    }
}

#[async_trait]
impl RecaptchaVerifier for RecaptchaClient {
    async fn verify(&self, token: &str) -> Result<VerificationResult, IntakeError> {
        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| IntakeError::Recaptcha(format!("siteverify request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IntakeError::Recaptcha(format!(
                "siteverify answered {status}"
            )));
        }

        let result: VerificationResult = response.json().await.map_err(|e| {
            IntakeError::Recaptcha(format!("failed to decode siteverify response: {e}"))
        })?;

        tracing::debug!(
            success = result.success,
            hostname = ?result.hostname,
            error_codes = ?result.error_codes,
            "reCAPTCHA token checked"
        );

        Ok(result)
    }
}
