//! Dialog state persistence
//!
//! This module handles persistence of per-user dialog state using Redis,
//! including serialization, expiration and cleanup. The engine talks to the
//! [`DialogStore`] trait so tests can swap in the in-memory implementation.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, error, warn};

use super::flow::DialogState;
use crate::config::RedisConfig;
use crate::utils::errors::Result;

/// Persistence contract for dialog state: one record per user, replaced
/// wholesale at each transition.
#[async_trait]
pub trait DialogStore: Send + Sync {
    /// Load the current dialog state, dropping an expired record
    async fn load(&self, user_id: &str) -> Result<Option<DialogState>>;

    /// Replace the stored state for the record's user
    async fn save(&self, state: &DialogState) -> Result<()>;

    /// Delete the stored state, a no-op when none exists
    async fn clear(&self, user_id: &str) -> Result<()>;
}

/// Redis-backed dialog store
#[derive(Clone)]
pub struct RedisDialogStore {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl RedisDialogStore {
    /// Create a new store from Redis configuration
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    fn dialog_key(&self, user_id: &str) -> String {
        format!("{}dialog:{}", self.config.prefix, user_id)
    }

    /// Test Redis connection
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl DialogStore for RedisDialogStore {
    async fn load(&self, user_id: &str) -> Result<Option<DialogState>> {
        let key = self.dialog_key(user_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&key).await?;

        let Some(data) = serialized else {
            debug!(user_id = user_id, "No dialog state found");
            return Ok(None);
        };

        let state: DialogState = match serde_json::from_str(&data) {
            Ok(state) => state,
            Err(e) => {
                // A corrupt record would otherwise wedge the user; drop it.
                error!(user_id = user_id, error = %e, "Failed to deserialize dialog state, clearing");
                self.clear(user_id).await?;
                return Ok(None);
            }
        };

        if state.is_expired() {
            warn!(user_id = user_id, flow = state.flow.name(), "Dialog state expired, removing");
            self.clear(user_id).await?;
            return Ok(None);
        }

        debug!(user_id = user_id, flow = state.flow.name(), "Dialog state loaded");
        Ok(Some(state))
    }

    async fn save(&self, state: &DialogState) -> Result<()> {
        let key = self.dialog_key(&state.user_id);
        let serialized = serde_json::to_string(state)?;

        let now = chrono::Utc::now();
        let ttl_seconds = std::cmp::max((state.expires_at - now).num_seconds(), 60) as u64;

        let mut conn = self.connection_manager.clone();
        conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await?;

        debug!(
            user_id = %state.user_id,
            flow = state.flow.name(),
            ttl_seconds = ttl_seconds,
            "Dialog state saved"
        );
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<()> {
        let key = self.dialog_key(user_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(user_id = user_id, deleted = deleted > 0, "Dialog state cleared");

        Ok(())
    }
}

impl std::fmt::Debug for RedisDialogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisDialogStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
