//! The submission pipeline.
//!
//! Every request runs the same ordered checks. The first failing stage is
//! reported to the error sink and decides the response; later stages never run.
//!
//! ```text
//! method → body → credentials → reCAPTCHA → identity + store → 200
//!  405      400      401           401            500
//! ```

mod rejection;
mod response;
mod stages;
#[cfg(test)]
pub(crate) mod testing;

pub use rejection::Rejection;
pub use response::{ApiResponse, ResponseBody};

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use intake_common::UserIdentity;
use std::sync::Arc;
use tracing::Instrument;

use crate::recaptcha::RecaptchaVerifier;
use crate::reporting::ErrorReporter;
use crate::storage::{AnswerStore, IdentityLookup};

/// One inbound submission, owned by the pipeline for the duration of `handle`
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Validates, authenticates and stores submissions.
///
/// Holds only shared handles to its collaborators, so one instance serves
/// every request concurrently.
pub struct SubmissionPipeline {
    verifier: Arc<dyn RecaptchaVerifier>,
    identities: Arc<dyn IdentityLookup>,
    answers: Arc<dyn AnswerStore>,
    reporter: Arc<dyn ErrorReporter>,
}

impl SubmissionPipeline {
    pub fn new(
        verifier: Arc<dyn RecaptchaVerifier>,
        identities: Arc<dyn IdentityLookup>,
        answers: Arc<dyn AnswerStore>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            verifier,
            identities,
            answers,
            reporter,
        }
    }

    /// Run all stages and produce the one response for this request
    pub async fn handle(&self, request: InboundRequest) -> ApiResponse {
        let span = tracing::info_span!(
            "submission",
            request_id = %generate_request_id(),
            method = %request.method,
        );

        async move {
            match self.run(request).await {
                Ok(user) => {
                    tracing::info!(uid = %user.uid, "Submission stored");
                    ApiResponse::submitted()
                }
                Err(rejection) => {
                    if let Rejection::Persistence(ref e) = rejection {
                        if e.is_infrastructure() {
                            tracing::warn!(error = %e, "Submission could not be stored");
                        }
                    }
                    tracing::debug!(
                        status = rejection.status().as_u16(),
                        code = rejection.code().as_str(),
                        "Submission rejected"
                    );
                    self.reporter.report(rejection.report());
                    rejection.into_response()
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: InboundRequest) -> Result<UserIdentity, Rejection> {
        stages::check_method(&request.method)?;
        let payload = stages::parse_body(request.body.as_deref())?;
        let credentials = stages::extract_credentials(&request.headers)?;
        stages::verify_recaptcha(self.verifier.as_ref(), &credentials.recaptcha_token).await?;
        stages::persist(
            self.identities.as_ref(),
            self.answers.as_ref(),
            &credentials.bearer_token,
            payload,
        )
        .await
    }
}

/// Random identifier tying together the log lines of one request
fn generate_request_id() -> String {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use rand::Rng;

    let mut bytes = [0u8; 9];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
