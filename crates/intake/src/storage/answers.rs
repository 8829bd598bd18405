//! Answer persistence. One document per user; a new submission replaces the
//! previous one.

use async_trait::async_trait;
use intake_common::{IntakeError, StoredAnswer};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{AnswerStore, redis_error};

pub struct RedisAnswerStore {
    redis: ConnectionManager,
    prefix: String,
}

impl RedisAnswerStore {
    pub fn new(redis: ConnectionManager, prefix: String) -> Self {
        Self { redis, prefix }
    }
}

fn answer_key(prefix: &str, uid: &str) -> String {
    format!("{}{}", prefix, uid)
}

fn encode(uid: &str, answer: serde_json::Value) -> Result<String, IntakeError> {
    let record = StoredAnswer::new(uid.to_string(), answer);
    serde_json::to_string(&record)
        .map_err(|e| IntakeError::Storage(format!("failed to encode answer: {e}")))
}

#[async_trait]
impl AnswerStore for RedisAnswerStore {
    async fn save_answer(&self, uid: &str, answer: serde_json::Value) -> Result<(), IntakeError> {
        let encoded = encode(uid, answer)?;

        let mut conn = self.redis.clone();
        let _: () = conn
            .set(answer_key(&self.prefix, uid), encoded)
            .await
            .map_err(redis_error)?;

        tracing::debug!(uid = %uid, "Answer stored");
        Ok(())
    }
}
