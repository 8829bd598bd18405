//! In-memory collaborators for pipeline and router tests.

use async_trait::async_trait;
use intake_common::{IntakeError, UserIdentity, VerificationResult};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::recaptcha::RecaptchaVerifier;
use crate::reporting::{ErrorReport, ErrorReporter};
use crate::storage::{AnswerStore, IdentityLookup};

pub struct StubVerifier {
    outcome: Result<VerificationResult, String>,
    calls: AtomicUsize,
}

impl StubVerifier {
    pub fn answering(result: VerificationResult) -> Self {
        Self {
            outcome: Ok(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecaptchaVerifier for StubVerifier {
    async fn verify(&self, _token: &str) -> Result<VerificationResult, IntakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(IntakeError::Recaptcha)
    }
}

pub struct StubIdentities {
    uid: String,
}

impl StubIdentities {
    pub fn new(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
        }
    }
}

#[async_trait]
impl IdentityLookup for StubIdentities {
    async fn get_user(&self, _token: &str) -> Result<UserIdentity, IntakeError> {
        Ok(UserIdentity::new(self.uid.clone()))
    }
}

pub struct FailingIdentities;

#[async_trait]
impl IdentityLookup for FailingIdentities {
    async fn get_user(&self, _token: &str) -> Result<UserIdentity, IntakeError> {
        Err(IntakeError::Identity("session token unknown or expired".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingStore {
    fail: bool,
    saved: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn saved(&self) -> Vec<(String, serde_json::Value)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerStore for RecordingStore {
    async fn save_answer(&self, uid: &str, answer: serde_json::Value) -> Result<(), IntakeError> {
        if self.fail {
            return Err(IntakeError::Redis("connection refused".to_string()));
        }
        self.saved.lock().unwrap().push((uid.to_string(), answer));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, report: ErrorReport) {
        self.reports.lock().unwrap().push(report);
    }
}
