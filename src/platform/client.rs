//! Outbound platform client
//!
//! `Messenger` is the delivery contract the engine depends on;
//! `WhatsAppClient` implements it against the Cloud API send endpoint with
//! bearer authentication. Rich shapes that fail to deliver are degraded once
//! to their plain-text rendering; only a failing degraded send propagates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::message::OutboundMessage;
use crate::config::PlatformConfig;
use crate::utils::errors::{ChatCartError, Result};

/// Delivery contract for the dialog engine
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send one message to a normalized recipient identity
    async fn send(&self, to: &str, message: OutboundMessage) -> Result<()>;
}

/// WhatsApp Cloud API client
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    http: Client,
    config: PlatformConfig,
}

impl WhatsAppClient {
    /// Create a new client from platform configuration
    pub fn new(config: PlatformConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("chatcart/1.0")
            .build()
            .map_err(ChatCartError::Http)?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_url.trim_end_matches('/'),
            self.config.phone_number_id
        )
    }

    fn build_payload(&self, to: &str, message: &OutboundMessage) -> Value {
        match message {
            OutboundMessage::Text(body) => json!({
                "messaging_product": "whatsapp",
                "to": to,
                "type": "text",
                "text": { "body": body },
            }),
            OutboundMessage::Buttons(menu) => {
                let buttons: Vec<Value> = menu
                    .buttons
                    .iter()
                    .map(|b| {
                        json!({
                            "type": "reply",
                            "reply": { "id": b.id, "title": b.title },
                        })
                    })
                    .collect();

                let mut interactive = json!({
                    "type": "button",
                    "body": { "text": menu.body },
                    "action": { "buttons": buttons },
                });
                if let Some(header) = &menu.header {
                    interactive["header"] = json!({ "type": "text", "text": header });
                }

                json!({
                    "messaging_product": "whatsapp",
                    "to": to,
                    "type": "interactive",
                    "interactive": interactive,
                })
            }
            OutboundMessage::List(menu) => {
                let sections: Vec<Value> = menu
                    .sections
                    .iter()
                    .map(|section| {
                        let rows: Vec<Value> = section
                            .rows
                            .iter()
                            .map(|row| {
                                let mut value = json!({ "id": row.id, "title": row.title });
                                if let Some(description) = &row.description {
                                    value["description"] = json!(description);
                                }
                                value
                            })
                            .collect();
                        json!({ "title": section.title, "rows": rows })
                    })
                    .collect();

                let mut interactive = json!({
                    "type": "list",
                    "body": { "text": menu.body },
                    "action": { "button": menu.button_text, "sections": sections },
                });
                if let Some(header) = &menu.header {
                    interactive["header"] = json!({ "type": "text", "text": header });
                }

                json!({
                    "messaging_product": "whatsapp",
                    "to": to,
                    "type": "interactive",
                    "interactive": interactive,
                })
            }
        }
    }

    async fn post_message(&self, to: &str, message: &OutboundMessage) -> Result<()> {
        let payload = self.build_payload(to, message);

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.access_token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatCartError::Delivery(format!(
                "send returned {}: {}",
                status, body
            )));
        }

        debug!(to = to, "Message delivered");
        Ok(())
    }
}

#[async_trait]
impl Messenger for WhatsAppClient {
    async fn send(&self, to: &str, message: OutboundMessage) -> Result<()> {
        let message = message.sanitize();

        match self.post_message(to, &message).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if matches!(message, OutboundMessage::Text(_)) {
                    return Err(e);
                }

                // Degrade a failed rich shape to its plain-text rendering.
                warn!(to = to, error = %e, "Rich message delivery failed, degrading to text");
                let fallback =
                    OutboundMessage::Text(message.to_text_fallback()).sanitize();
                self.post_message(to, &fallback).await
            }
        }
    }
}
