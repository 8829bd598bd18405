//! Stage failures and how each one is answered and reported.

use axum::http::StatusCode;
use intake_common::{IntakeError, ResponseCode, VerificationResult};
use thiserror::Error;

use super::ApiResponse;
use crate::reporting::ErrorReport;

/// Why a submission was turned away. One variant per failing stage.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("This endpoint only responds to POST")]
    MethodNotAllowed,

    #[error("{0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("unauthorized request token or recaptcha not valid")]
    MissingCredentials,

    #[error("{0}")]
    RecaptchaUnavailable(#[source] IntakeError),

    #[error("recaptcha token invalid {}", serde_json::to_string(.0).unwrap_or_default())]
    RecaptchaRejected(VerificationResult),

    /// Identity lookup or answer storage failed; callers cannot tell which
    #[error("{0}")]
    Persistence(#[source] IntakeError),
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredentials
            | Self::RecaptchaUnavailable(_)
            | Self::RecaptchaRejected(_) => StatusCode::UNAUTHORIZED,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ResponseCode {
        match self {
            Self::MethodNotAllowed => ResponseCode::MethodUnknown,
            Self::InvalidBody(_) => ResponseCode::InvalidRequest,
            Self::MissingCredentials
            | Self::RecaptchaUnavailable(_)
            | Self::RecaptchaRejected(_) => ResponseCode::Unauthorized,
            Self::Persistence(_) => ResponseCode::ServerError,
        }
    }

    /// What the error sink receives for this rejection
    pub fn report(&self) -> ErrorReport {
        match self {
            Self::InvalidBody(_) | Self::RecaptchaUnavailable(_) | Self::Persistence(_) => {
                ErrorReport::Error(self.to_string())
            }
            Self::MethodNotAllowed | Self::MissingCredentials | Self::RecaptchaRejected(_) => {
                ErrorReport::Message(self.to_string())
            }
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        let code = self.code();
        match self {
            Self::MethodNotAllowed => {
                ApiResponse::new(status, code, "This endpoint only responds to POST")
            }
            Self::InvalidBody(_) => ApiResponse::new(status, code, "Invalid body data"),
            Self::MissingCredentials => ApiResponse::new(status, code, "unauthorized request"),
            Self::RecaptchaUnavailable(e) => ApiResponse::new(status, code, "error recaptcha")
                .with_error(Some(serde_json::Value::String(e.to_string()))),
            Self::RecaptchaRejected(result) => {
                ApiResponse::new(status, code, "recaptcha token invalid")
                    .with_error(result.error_codes.map(serde_json::Value::from))
            }
            Self::Persistence(e) => ApiResponse::new(status, code, "Server error")
                .with_origin(serde_json::Value::String(e.to_string())),
        }
    }
}
