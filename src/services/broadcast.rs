//! Broadcast fan-out service
//!
//! Sends one message to every known user in fixed-size batches with an
//! inter-batch pause. A failing recipient never aborts its batch; the caller
//! gets aggregate success and failure counts.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use crate::config::BroadcastConfig;
use crate::platform::{Messenger, OutboundMessage};

/// Aggregate result of one broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct Broadcaster {
    messenger: Arc<dyn Messenger>,
    batch_size: usize,
    batch_delay: Duration,
}

impl Broadcaster {
    pub fn new(messenger: Arc<dyn Messenger>, config: &BroadcastConfig) -> Self {
        Self {
            messenger,
            batch_size: config.batch_size.max(1),
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }

    /// Fan a text message out to all recipients
    pub async fn broadcast(&self, recipients: &[String], body: &str) -> BroadcastReport {
        info!(
            recipients = recipients.len(),
            batch_size = self.batch_size,
            "Starting broadcast"
        );

        let mut sent = 0;
        let mut failed = 0;
        let mut batches = recipients.chunks(self.batch_size).peekable();

        while let Some(batch) = batches.next() {
            let sends = batch.iter().map(|recipient| {
                let messenger = self.messenger.clone();
                let message = OutboundMessage::text(body);
                async move {
                    messenger
                        .send(recipient, message)
                        .await
                        .map_err(|e| (recipient.clone(), e))
                }
            });

            for result in join_all(sends).await {
                match result {
                    Ok(()) => sent += 1,
                    Err((recipient, e)) => {
                        warn!(recipient = %recipient, error = %e, "Broadcast recipient failed");
                        failed += 1;
                    }
                }
            }

            if batches.peek().is_some() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        let report = BroadcastReport {
            total: recipients.len(),
            sent,
            failed,
        };
        info!(sent = report.sent, failed = report.failed, "Broadcast completed");
        report
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("batch_size", &self.batch_size)
            .field("batch_delay", &self.batch_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::utils::errors::{ChatCartError, Result};

    /// Messenger that fails for recipients listed in `failing`
    struct FlakyMessenger {
        failing: Vec<String>,
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Messenger for FlakyMessenger {
        async fn send(&self, to: &str, _message: OutboundMessage) -> Result<()> {
            if self.failing.iter().any(|f| f == to) {
                return Err(ChatCartError::Delivery("boom".to_string()));
            }
            self.delivered.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    fn recipients(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("88017000000{:02}", i)).collect()
    }

    #[tokio::test]
    async fn test_counts_add_up_with_failures() {
        let all = recipients(23);
        let messenger = Arc::new(FlakyMessenger {
            failing: vec![all[3].clone(), all[11].clone(), all[22].clone()],
            delivered: Mutex::new(Vec::new()),
        });
        let broadcaster = Broadcaster::new(
            messenger.clone(),
            &BroadcastConfig {
                batch_size: 5,
                batch_delay_ms: 0,
            },
        );

        let report = broadcaster.broadcast(&all, "hello").await;
        assert_eq!(report.total, 23);
        assert_eq!(report.sent + report.failed, 23);
        assert_eq!(report.failed, 3);
        assert_eq!(messenger.delivered.lock().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_empty_recipient_list() {
        let messenger = Arc::new(FlakyMessenger {
            failing: vec![],
            delivered: Mutex::new(Vec::new()),
        });
        let broadcaster = Broadcaster::new(
            messenger,
            &BroadcastConfig {
                batch_size: 10,
                batch_delay_ms: 0,
            },
        );

        let report = broadcaster.broadcast(&[], "hello").await;
        assert_eq!(report.total, 0);
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 0);
    }
}
