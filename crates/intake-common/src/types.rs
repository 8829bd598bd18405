//! Core types shared across intake components.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a reCAPTCHA siteverify call.
///
/// Only `success` gates the pipeline; the remaining fields are kept so the
/// full result can be reported when verification is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Absent or `null` on the wire is treated as `false`
    #[serde(default, deserialize_with = "null_as_false")]
    pub success: bool,

    /// Error codes reported by the verification service, in order
    #[serde(
        rename = "error-codes",
        alias = "errorCodes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_codes: Option<Vec<String>>,

    /// Timestamp of the challenge load (ISO format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,

    /// Hostname of the site where the challenge was solved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl VerificationResult {
    pub fn passed() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn rejected(codes: &[&str]) -> Self {
        Self {
            success: false,
            error_codes: Some(codes.iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A user resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub uid: String,
}

impl UserIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

/// Stable machine-readable code carried by every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "invalid_request")]
    InvalidRequest,
    #[serde(rename = "unauthorized")]
    Unauthorized,
    #[serde(rename = "method_unknown")]
    MethodUnknown,
    #[serde(rename = "server-error")]
    ServerError,
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::MethodUnknown => "method_unknown",
            Self::ServerError => "server-error",
        }
    }
}

/// A persisted submission, one per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub uid: String,

    /// The submitted body, stored as received
    pub answer: serde_json::Value,

    /// Submission timestamp (Unix epoch seconds)
    pub submitted_at: i64,
}

impl StoredAnswer {
    pub fn new(uid: String, answer: serde_json::Value) -> Self {
        Self {
            uid,
            answer,
            submitted_at: chrono::Utc::now().timestamp(),
        }
    }
}
