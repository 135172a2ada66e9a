//! Inbound webhook surface
//!
//! Parses platform event envelopes into the transient [`InboundEvent`] the
//! engine consumes, answers the verification handshake, and exposes the axum
//! router. The POST handler acknowledges immediately and processes each event
//! on a spawned task, so transport retries never block on dialog processing.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::database::{health_check, DatabasePool};
use crate::dispatch::Dispatcher;

/// One inbound chat event, never persisted
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Text(String),
    ListReply { id: String, title: String },
    ButtonReply { id: String, title: String },
    Unsupported,
}

/// Platform webhook envelope (the subset the engine consumes)
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub entry: Vec<EnvelopeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeEntry {
    #[serde(default)]
    pub changes: Vec<EnvelopeChange>,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeChange {
    pub value: ChangeValue,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<TextPayload>,
    pub interactive: Option<InteractivePayload>,
}

#[derive(Debug, Deserialize)]
pub struct TextPayload {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractivePayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub list_reply: Option<InteractiveReply>,
    pub button_reply: Option<InteractiveReply>,
}

#[derive(Debug, Deserialize)]
pub struct InteractiveReply {
    pub id: String,
    pub title: String,
}

/// Flatten an envelope into (sender, event) pairs
pub fn parse_events(envelope: &WebhookEnvelope) -> Vec<(String, InboundEvent)> {
    let mut events = Vec::new();

    for entry in &envelope.entry {
        for change in &entry.changes {
            for message in &change.value.messages {
                events.push((message.from.clone(), classify_message(message)));
            }
        }
    }

    events
}

fn classify_message(message: &InboundMessage) -> InboundEvent {
    match message.kind.as_str() {
        "text" => match &message.text {
            Some(payload) => InboundEvent::Text(payload.body.clone()),
            None => InboundEvent::Unsupported,
        },
        "interactive" => match &message.interactive {
            Some(payload) if payload.kind == "list_reply" => match &payload.list_reply {
                Some(reply) => InboundEvent::ListReply {
                    id: reply.id.clone(),
                    title: reply.title.clone(),
                },
                None => InboundEvent::Unsupported,
            },
            Some(payload) if payload.kind == "button_reply" => match &payload.button_reply {
                Some(reply) => InboundEvent::ButtonReply {
                    id: reply.id.clone(),
                    title: reply.title.clone(),
                },
                None => InboundEvent::Unsupported,
            },
            _ => InboundEvent::Unsupported,
        },
        _ => InboundEvent::Unsupported,
    }
}

/// Answer the verification handshake: echo the challenge only when the
/// provided token matches the configured secret.
pub fn verify_handshake(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    secret: &str,
) -> Option<String> {
    if mode == Some("subscribe") && token == Some(secret) {
        challenge.map(|c| c.to_string())
    } else {
        None
    }
}

/// Shared state for the webhook routes
pub struct WebhookState {
    pub dispatcher: Arc<Dispatcher>,
    pub verify_token: String,
    pub pool: DatabasePool,
}

/// Build the webhook router
pub fn router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhook", get(handle_verify).post(handle_events))
        .route("/health", get(handle_health))
        .with_state(state)
}

async fn handle_verify(
    State(state): State<Arc<WebhookState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let echoed = verify_handshake(
        params.get("hub.mode").map(String::as_str),
        params.get("hub.verify_token").map(String::as_str),
        params.get("hub.challenge").map(String::as_str),
        &state.verify_token,
    );

    match echoed {
        Some(challenge) => {
            info!("Webhook verification handshake accepted");
            (StatusCode::OK, challenge)
        }
        None => {
            warn!("Webhook verification handshake rejected");
            (StatusCode::FORBIDDEN, String::new())
        }
    }
}

async fn handle_events(
    State(state): State<Arc<WebhookState>>,
    Json(envelope): Json<WebhookEnvelope>,
) -> StatusCode {
    let events = parse_events(&envelope);
    debug!(count = events.len(), "Webhook events received");

    // Ack first; dialog processing is decoupled from the transport response.
    for (sender, event) in events {
        let dispatcher = state.dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.handle_inbound(&sender, event).await;
        });
    }

    StatusCode::OK
}

async fn handle_health(State(state): State<Arc<WebhookState>>) -> impl IntoResponse {
    match health_check(&state.pool).await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_handshake_accepts_matching_token() {
        let echoed = verify_handshake(
            Some("subscribe"),
            Some("secret"),
            Some("12345"),
            "secret",
        );
        assert_eq!(echoed, Some("12345".to_string()));
    }

    #[test]
    fn test_verify_handshake_rejects_bad_token() {
        assert!(verify_handshake(Some("subscribe"), Some("wrong"), Some("12345"), "secret").is_none());
        assert!(verify_handshake(None, Some("secret"), Some("12345"), "secret").is_none());
    }

    #[test]
    fn test_parse_text_event() {
        let envelope: WebhookEnvelope = serde_json::from_value(serde_json::json!({
            "entry": [{ "changes": [{ "value": { "messages": [
                { "from": "8801712345678", "type": "text", "text": { "body": "hello" } }
            ]}}]}]
        }))
        .unwrap();

        let events = parse_events(&envelope);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "8801712345678");
        assert_eq!(events[0].1, InboundEvent::Text("hello".to_string()));
    }

    #[test]
    fn test_parse_list_reply_event() {
        let envelope: WebhookEnvelope = serde_json::from_value(serde_json::json!({
            "entry": [{ "changes": [{ "value": { "messages": [
                { "from": "8801712345678", "type": "interactive",
                  "interactive": { "type": "list_reply",
                                   "list_reply": { "id": "svc:vpn", "title": "VPN" } } }
            ]}}]}]
        }))
        .unwrap();

        let events = parse_events(&envelope);
        assert_eq!(
            events[0].1,
            InboundEvent::ListReply {
                id: "svc:vpn".to_string(),
                title: "VPN".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown_kind_is_unsupported() {
        let envelope: WebhookEnvelope = serde_json::from_value(serde_json::json!({
            "entry": [{ "changes": [{ "value": { "messages": [
                { "from": "8801712345678", "type": "image" }
            ]}}]}]
        }))
        .unwrap();

        assert_eq!(parse_events(&envelope)[0].1, InboundEvent::Unsupported);
    }

    #[test]
    fn test_empty_envelope_yields_no_events() {
        let envelope: WebhookEnvelope = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parse_events(&envelope).is_empty());
    }
}
