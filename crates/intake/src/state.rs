//! Application state and shared resources.

use anyhow::{Context, Result};
use axum::extract::FromRef;
use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::pipeline::SubmissionPipeline;
use crate::recaptcha::RecaptchaClient;
use crate::reporting::ErrorReporter;
use crate::storage::{RedisAnswerStore, RedisIdentityLookup};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Redis connection manager (auto-reconnecting)
    pub redis: ConnectionManager,

    /// Submission pipeline wired to the production collaborators
    pub pipeline: Arc<SubmissionPipeline>,
}

impl AppState {
    /// Create new application state, connecting to Redis
    pub async fn new(config: AppConfig, reporter: Arc<dyn ErrorReporter>) -> Result<Self> {
        // Connect to Redis with connection manager (handles reconnection)
        let client = redis::Client::open(config.redis_url.as_str())
            .context("Failed to create Redis client")?;

        let redis = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        let verifier =
            RecaptchaClient::new(&config.recaptcha).context("Failed to create reCAPTCHA client")?;
        let identities =
            RedisIdentityLookup::new(redis.clone(), config.identity.session_prefix.clone());
        let answers = RedisAnswerStore::new(redis.clone(), config.storage.answer_prefix.clone());

        let pipeline = Arc::new(SubmissionPipeline::new(
            Arc::new(verifier),
            Arc::new(identities),
            Arc::new(answers),
            reporter,
        ));

        Ok(Self {
            config,
            redis,
            pipeline,
        })
    }
}

impl FromRef<AppState> for Arc<SubmissionPipeline> {
    fn from_ref(state: &AppState) -> Self {
        state.pipeline.clone()
    }
}
