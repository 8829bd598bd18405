//! Identity lookup and answer persistence backed by Redis.

mod answers;
mod identity;

pub use answers::RedisAnswerStore;
pub use identity::RedisIdentityLookup;

use async_trait::async_trait;
use intake_common::{IntakeError, UserIdentity};

/// Resolves a bearer token to the user it was issued to
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn get_user(&self, token: &str) -> Result<UserIdentity, IntakeError>;
}

/// Persists a submission under a user id
#[async_trait]
pub trait AnswerStore: Send + Sync {
    async fn save_answer(&self, uid: &str, answer: serde_json::Value) -> Result<(), IntakeError>;
}

fn redis_error(e: redis::RedisError) -> IntakeError {
    IntakeError::Redis(e.to_string())
}
