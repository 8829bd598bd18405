//! Error reporting sink.
//!
//! Every rejected submission is forwarded here before the response is built.
//! Reporting is fire-and-forget: `report` never blocks the caller and never
//! fails, whatever happens to the report afterwards.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use intake_common::constants::SERVICE_NAME;

use crate::config::ReportingConfig;

/// Webhook delivery timeout
const WEBHOOK_TIMEOUT_SECS: u64 = 5;

/// What gets reported for a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReport {
    /// A fixed diagnostic describing the rejection
    Message(String),
    /// The rendered error raised by a parser or collaborator
    Error(String),
}

impl ErrorReport {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Error(_) => "error",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Message(text) | Self::Error(text) => text,
        }
    }
}

/// Observability sink injected into the pipeline
pub trait ErrorReporter: Send + Sync {
    fn report(&self, report: ErrorReport);
}

/// Writes reports to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, report: ErrorReport) {
        tracing::error!(kind = report.kind(), "{}", report.text());
    }
}

/// Payload posted to the error webhook
#[derive(Debug, Serialize)]
struct ReportEvent {
    service: &'static str,
    version: &'static str,
    environment: String,
    kind: &'static str,
    message: String,
    timestamp: i64,
}

/// Logs reports and forwards them to an HTTP collector on a background task
pub struct WebhookReporter {
    client: reqwest::Client,
    url: String,
    environment: String,
    local: TracingReporter,
}

impl WebhookReporter {
    pub fn new(url: String, environment: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .context("Failed to build error webhook client")?;

        Ok(Self {
            client,
            url,
            environment,
            local: TracingReporter,
        })
    }

    fn event(&self, report: &ErrorReport) -> ReportEvent {
        ReportEvent {
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            environment: self.environment.clone(),
            kind: report.kind(),
            message: report.text().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ErrorReporter for WebhookReporter {
    fn report(&self, report: ErrorReport) {
        let event = self.event(&report);
        self.local.report(report);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available, error report not forwarded");
            return;
        };

        let client = self.client.clone();
        let url = self.url.clone();
        runtime.spawn(async move {
            match client.post(&url).json(&event).send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(status = %response.status(), "Error webhook refused report");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to deliver error report");
                }
            }
        });
    }
}

/// Build the reporter described by the configuration
pub fn init_reporter(config: &ReportingConfig) -> Result<Arc<dyn ErrorReporter>> {
    match config.webhook_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => {
            tracing::info!(environment = %config.environment, "Error reports forwarded to webhook");
            Ok(Arc::new(WebhookReporter::new(
                url.to_string(),
                config.environment.clone(),
            )?))
        }
        None => Ok(Arc::new(TracingReporter)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_and_text() {
        let report = ErrorReport::Message("unauthorized request".to_string());
        assert_eq!(report.kind(), "message");
        assert_eq!(report.text(), "unauthorized request");

        let report = ErrorReport::Error("Redis error: refused".to_string());
        assert_eq!(report.kind(), "error");
    }

    #[test]
    fn test_webhook_event_shape() {
        let reporter =
            WebhookReporter::new("http://127.0.0.1:9/hook".to_string(), "staging".to_string())
                .unwrap();
        let event = reporter.event(&ErrorReport::Error("boom".to_string()));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["service"], "intake");
        assert_eq!(value["environment"], "staging");
        assert_eq!(value["kind"], "error");
        assert_eq!(value["message"], "boom");
        assert!(value["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_webhook_report_outside_runtime_is_dropped() {
        let reporter =
            WebhookReporter::new("http://127.0.0.1:9/hook".to_string(), "test".to_string())
                .unwrap();
        reporter.report(ErrorReport::Message("no runtime".to_string()));
    }

    #[tokio::test]
    async fn test_webhook_posts_event_to_collector() {
        use axum::{Json, Router, routing::post};
        use std::sync::Mutex;
        use tokio::sync::oneshot;

        let (tx, rx) = oneshot::channel::<serde_json::Value>();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let collector = Router::new().route(
            "/hook",
            post(move |Json(event): Json<serde_json::Value>| {
                let tx = tx.clone();
                async move {
                    if let Some(tx) = tx.lock().unwrap().take() {
                        let _ = tx.send(event);
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, collector).await.unwrap();
        });

        let reporter =
            WebhookReporter::new(format!("http://{addr}/hook"), "staging".to_string()).unwrap();
        reporter.report(ErrorReport::Error("Redis error: refused".to_string()));

        let event = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("collector never received the report")
            .unwrap();

        assert_eq!(event["service"], "intake");
        assert_eq!(event["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(event["environment"], "staging");
        assert_eq!(event["kind"], "error");
        assert_eq!(event["message"], "Redis error: refused");
        assert!(event["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_init_reporter_without_webhook() {
        let reporter = init_reporter(&ReportingConfig::default());
        assert!(reporter.is_ok());
    }
}
