//! Shared constants for the intake service.

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8890";

/// Default path the submission endpoint is mounted on
pub const DEFAULT_SUBMIT_PATH: &str = "/api/submit";

/// Google reCAPTCHA verification endpoint
pub const DEFAULT_RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// reCAPTCHA HTTP client timeout (seconds)
pub const DEFAULT_RECAPTCHA_TIMEOUT_SECS: u64 = 10;

/// Service name attached to error reports
pub const SERVICE_NAME: &str = "intake";

/// Prefix stripped from the `Authorization` header value
pub const BEARER_PREFIX: &str = "Bearer ";

/// Redis key prefixes
pub mod redis_keys {
    /// Session token lookup: session:{sha256(token)}
    pub const SESSION_PREFIX: &str = "session:";

    /// Stored answer: answer:{uid}
    pub const ANSWER_PREFIX: &str = "answer:";
}

/// HTTP header names (lowercase, as stored in `http::HeaderMap`)
pub mod headers {
    /// Bearer credential header
    pub const AUTHORIZATION: &str = "authorization";

    /// reCAPTCHA response token header
    pub const X_RECAPTCHA_TOKEN: &str = "x-recaptcha-token";
}
