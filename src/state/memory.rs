//! In-memory dialog store
//!
//! Used by tests and local development; honors the same expiry semantics as
//! the Redis store.

use async_trait::async_trait;
use dashmap::DashMap;

use super::flow::DialogState;
use super::store::DialogStore;
use crate::utils::errors::Result;

#[derive(Debug, Default)]
pub struct InMemoryDialogStore {
    states: DashMap<String, DialogState>,
}

impl InMemoryDialogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records, for assertions in tests
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[async_trait]
impl DialogStore for InMemoryDialogStore {
    async fn load(&self, user_id: &str) -> Result<Option<DialogState>> {
        if let Some(state) = self.states.get(user_id).map(|s| s.clone()) {
            if state.is_expired() {
                self.states.remove(user_id);
                return Ok(None);
            }
            return Ok(Some(state));
        }
        Ok(None)
    }

    async fn save(&self, state: &DialogState) -> Result<()> {
        self.states.insert(state.user_id.clone(), state.clone());
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<()> {
        self.states.remove(user_id);
        Ok(())
    }
}
