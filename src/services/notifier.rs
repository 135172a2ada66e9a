//! Admin notifier
//!
//! Fire-and-forget plain-text notifications to the single configured admin
//! identity on key events. A failed notification is logged and never
//! propagated to the flow that triggered it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::platform::{Messenger, OutboundMessage};

#[derive(Clone)]
pub struct AdminNotifier {
    messenger: Arc<dyn Messenger>,
    admin_phone: String,
}

impl AdminNotifier {
    pub fn new(messenger: Arc<dyn Messenger>, admin_phone: String) -> Self {
        Self {
            messenger,
            admin_phone,
        }
    }

    /// Send a notification to the admin, swallowing delivery failures
    pub async fn notify(&self, text: &str) {
        match self
            .messenger
            .send(&self.admin_phone, OutboundMessage::text(text))
            .await
        {
            Ok(()) => debug!("Admin notified"),
            Err(e) => warn!(error = %e, "Failed to notify admin"),
        }
    }
}

impl std::fmt::Debug for AdminNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminNotifier")
            .field("admin_phone", &self.admin_phone)
            .finish_non_exhaustive()
    }
}
