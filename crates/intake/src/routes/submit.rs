//! Submission endpoint.

use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, Method},
};
use std::sync::Arc;

use crate::pipeline::{ApiResponse, InboundRequest, SubmissionPipeline};

/// Hand the raw request to the pipeline. Any method is routed here so the
/// pipeline can answer non-POST requests with its own JSON body.
///
/// A body that cannot be buffered (over the size limit, aborted upload) is
/// handed on as absent, so the pipeline still decides the response.
pub async fn submit_answer(
    State(pipeline): State<Arc<SubmissionPipeline>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    let body = match body {
        Ok(body) => (!body.is_empty()).then_some(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Request body not readable");
            None
        }
    };

    let request = InboundRequest {
        method,
        headers,
        body,
    };

    pipeline.handle(request).await
}
