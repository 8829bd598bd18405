//! The single response produced per submission.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use intake_common::ResponseCode;
use serde::{Deserialize, Serialize};

/// JSON body returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub code: ResponseCode,
    pub message: String,

    /// Verification diagnostics (error codes or the raised error)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,

    /// Infrastructure diagnostics (the raised error)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: StatusCode, code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody {
                code,
                message: message.into(),
                error: None,
                origin: None,
            },
        }
    }

    pub fn submitted() -> Self {
        Self::new(StatusCode::OK, ResponseCode::Success, "response submitted")
    }

    pub fn with_error(mut self, error: Option<serde_json::Value>) -> Self {
        self.body.error = error;
        self
    }

    pub fn with_origin(mut self, origin: serde_json::Value) -> Self {
        self.body.origin = Some(origin);
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
