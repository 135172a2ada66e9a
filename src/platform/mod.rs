//! Messaging platform integration
//!
//! Inbound webhook parsing, outbound message shapes and delivery, and phone
//! identity normalization.

pub mod client;
pub mod message;
pub mod phone;
pub mod webhook;

pub use client::{Messenger, WhatsAppClient};
pub use message::{Button, ButtonMenu, ListMenu, ListRow, ListSection, OutboundMessage};
pub use phone::normalize_phone;
pub use webhook::{parse_events, verify_handshake, InboundEvent, WebhookEnvelope, WebhookState};
