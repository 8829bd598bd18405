//! Session token → user lookup.
//!
//! The login side writes `session:<digest>` → uid when it issues a token; this
//! side only reads. Tokens are never used as keys verbatim.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use intake_common::{IntakeError, UserIdentity};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use sha2::{Digest, Sha256};

use super::{IdentityLookup, redis_error};

pub struct RedisIdentityLookup {
    redis: ConnectionManager,
    prefix: String,
}

impl RedisIdentityLookup {
    pub fn new(redis: ConnectionManager, prefix: String) -> Self {
        Self { redis, prefix }
    }
}

/// Redis key holding the uid for `token`
fn session_key(prefix: &str, token: &str) -> String {
    format!("{}{}", prefix, token_digest(token))
}

fn token_digest(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

#[async_trait]
impl IdentityLookup for RedisIdentityLookup {
    async fn get_user(&self, token: &str) -> Result<UserIdentity, IntakeError> {
        let mut conn = self.redis.clone();
        let uid: Option<String> = conn
            .get(session_key(&self.prefix, token))
            .await
            .map_err(redis_error)?;

        match uid {
            Some(uid) if !uid.is_empty() => Ok(UserIdentity::new(uid)),
            _ => Err(IntakeError::Identity(
                "session token unknown or expired".to_string(),
            )),
        }
    }
}
