//! Flow handlers
//!
//! One module per multi-step dialog. Each handler receives the current flow
//! state and one input and returns an [`Outcome`]; the dispatcher owns
//! applying it (save, clear, send). Handlers never touch the dialog store
//! directly.

pub mod admin;
pub mod orders;
pub mod recharge;

use std::sync::Arc;

use crate::database::repositories::{OrderLedger, ServiceCatalog, UserDirectory};
use crate::i18n::{I18n, TranslationParams};
use crate::models::{Service, User};
use crate::platform::{Messenger, OutboundMessage};
use crate::services::{AdminNotifier, Broadcaster, PaymentVerifier};
use crate::state::Flow;
use crate::utils::errors::Result;

/// What a flow handler decided to do with one input
#[derive(Debug)]
pub enum Outcome {
    /// Re-prompt without changing state
    Stay(OutboundMessage),
    /// Transition to the next state
    Next(Flow, OutboundMessage),
    /// Flow finished: clear state, send the replies
    Done(Vec<OutboundMessage>),
    /// Flow aborted: clear state, send the reply, then render the main menu
    Abort(OutboundMessage),
}

/// One inbound input as the flow layer sees it
#[derive(Debug, Clone, Copy)]
pub enum FlowInput<'a> {
    Text(&'a str),
    /// The row id of an interactive list reply
    ListReply(&'a str),
}

impl FlowInput<'_> {
    pub fn value(&self) -> &str {
        match self {
            FlowInput::Text(text) => text,
            FlowInput::ListReply(id) => id,
        }
    }
}

/// Everything a flow handler may need to act
#[derive(Clone)]
pub struct FlowContext {
    pub users: Arc<dyn UserDirectory>,
    pub services: Arc<dyn ServiceCatalog>,
    pub ledger: Arc<dyn OrderLedger>,
    pub payment: Arc<dyn PaymentVerifier>,
    pub messenger: Arc<dyn Messenger>,
    pub notifier: AdminNotifier,
    pub broadcaster: Broadcaster,
    pub i18n: I18n,
}

impl FlowContext {
    pub fn text(&self, key: &str) -> String {
        self.i18n.td(key, None)
    }

    pub fn text_with(&self, key: &str, params: &TranslationParams) -> String {
        self.i18n.td(key, Some(params))
    }

    pub fn msg(&self, key: &str) -> OutboundMessage {
        OutboundMessage::text(self.text(key))
    }

    pub fn msg_with(&self, key: &str, params: &TranslationParams) -> OutboundMessage {
        OutboundMessage::text(self.text_with(key, params))
    }
}

impl std::fmt::Debug for FlowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowContext").finish_non_exhaustive()
    }
}

/// Route one input to the handler of the active flow
pub async fn handle(
    ctx: &FlowContext,
    user: &User,
    flow: &Flow,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    match flow {
        Flow::Recharge => recharge::handle(ctx, user, input).await,
        Flow::ServiceOrder { service_id, price } => {
            orders::handle(ctx, user, service_id, *price, input).await
        }
        Flow::AddService { step, draft } => {
            admin::add_service::handle(ctx, user, *step, draft, input).await
        }
        Flow::EditService { step } => admin::edit_service::handle(ctx, user, step, input).await,
        Flow::DeleteService { step } => {
            admin::delete_service::handle(ctx, user, step, input).await
        }
        Flow::Broadcast => admin::broadcast::handle(ctx, user, input).await,
    }
}

/// Parse a user-supplied price: finite and strictly positive
pub(crate) fn parse_price(input: &str) -> Option<f64> {
    let price: f64 = input.trim().parse().ok()?;
    (price.is_finite() && price > 0.0).then_some(price)
}

/// Render an amount the way users see money
pub(crate) fn fmt_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Numbered one-per-line service listing for text selection prompts
pub(crate) fn service_listing(services: &[Service]) -> String {
    services
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} ({})", i + 1, s.name, fmt_amount(s.price)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve a 1-based numeric selection against a slice
pub(crate) fn select_indexed<'a, T>(input: &str, items: &'a [T]) -> Option<&'a T> {
    let index: usize = input.trim().parse().ok()?;
    (1..=items.len()).contains(&index).then(|| &items[index - 1])
}
