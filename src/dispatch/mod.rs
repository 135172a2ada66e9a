//! Message dispatcher
//!
//! The single entry point for inbound events. Resolves each event against
//! the waterfall: cancel and menu keywords from any state, then the active
//! flow, then the flow-less routers, with a top-level guard that force-clears
//! state on internal errors so a user can never get stuck.

pub mod router;

pub use router::Routed;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::{PhoneScheme, Settings};
use crate::flows::{self, FlowContext, FlowInput, Outcome};
use crate::models::User;
use crate::platform::{normalize_phone, InboundEvent, OutboundMessage};
use crate::state::{DialogState, DialogStore};
use crate::utils::errors::Result;
use crate::utils::logging::log_dialog_transition;

const CANCEL_KEYWORDS: &[&str] = &["cancel", "stop", "exit", "c"];
const MENU_KEYWORDS: &[&str] = &["menu", "start", "hi", "hello", "home"];

pub struct Dispatcher {
    ctx: FlowContext,
    store: Arc<dyn DialogStore>,
    admin_phone: String,
    phone_schemes: Vec<PhoneScheme>,
    dialog_ttl: u64,
    /// One lock per user: the whole handle path is single-writer per key,
    /// so two near-simultaneous messages cannot race the dialog record.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Dispatcher {
    pub fn new(ctx: FlowContext, store: Arc<dyn DialogStore>, settings: &Settings) -> Self {
        let phone_schemes = settings.phone.schemes.clone();
        let admin_phone = normalize_phone(&settings.platform.admin_phone, &phone_schemes);
        Self {
            ctx,
            store,
            admin_phone,
            phone_schemes,
            dialog_ttl: settings.dialog.ttl_seconds,
            locks: DashMap::new(),
        }
    }

    /// Handle one inbound event end to end. Never returns an error: the
    /// top-level guard turns internal failures into a cleared state and a
    /// generic apology.
    pub async fn handle_inbound(&self, sender: &str, event: InboundEvent) {
        let user_id = normalize_phone(sender, &self.phone_schemes);

        let lock = self
            .locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        {
            let _guard = lock.lock().await;

            if let Err(e) = self.process(&user_id, &event).await {
                let correlation_id = Uuid::new_v4();
                error!(
                    user_id = %user_id,
                    correlation_id = %correlation_id,
                    error = %e,
                    "Dispatch failed, clearing dialog state"
                );

                if let Err(e) = self.store.clear(&user_id).await {
                    warn!(user_id = %user_id, error = %e, "Failed to clear dialog state");
                }
                self.send_best_effort(&user_id, self.ctx.msg("errors.generic"))
                    .await;
                let menu = router::main_menu(&self.ctx, user_id == self.admin_phone);
                self.send_best_effort(&user_id, menu).await;
            }
        }

        // Drop the idle entry so the lock map tracks active users only.
        drop(lock);
        self.locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of per-user dispatch locks currently held
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    async fn process(&self, user_id: &str, event: &InboundEvent) -> Result<()> {
        let user = self.ctx.users.get_or_create(user_id).await?;
        let is_admin = user_id == self.admin_phone;

        // Store trouble must not bounce the message: treat it as no flow.
        let state = match self.store.load(user_id).await {
            Ok(state) => state,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Dialog store unavailable, assuming no flow");
                None
            }
        };

        match event {
            InboundEvent::Text(text) => self.process_text(&user, is_admin, state, text).await,
            InboundEvent::ListReply { id, .. } => {
                self.process_list_reply(&user, is_admin, state, id).await
            }
            InboundEvent::ButtonReply { id, .. } => {
                if id.trim().eq_ignore_ascii_case("cancel") {
                    self.cancel(&user, is_admin).await
                } else {
                    self.send(&user.phone, self.ctx.msg("errors.button_hint"))
                        .await
                }
            }
            InboundEvent::Unsupported => {
                self.send(&user.phone, self.ctx.msg("errors.unsupported"))
                    .await?;
                self.send(&user.phone, router::main_menu(&self.ctx, is_admin))
                    .await
            }
        }
    }

    async fn process_text(
        &self,
        user: &User,
        is_admin: bool,
        state: Option<DialogState>,
        text: &str,
    ) -> Result<()> {
        let trimmed = text.trim();
        let lower = trimmed.to_lowercase();

        if CANCEL_KEYWORDS.contains(&lower.as_str()) {
            return self.cancel(user, is_admin).await;
        }
        if MENU_KEYWORDS.contains(&lower.as_str()) {
            self.store.clear(&user.phone).await?;
            return self
                .send(&user.phone, router::main_menu(&self.ctx, is_admin))
                .await;
        }

        if let Some(state) = state {
            let outcome =
                flows::handle(&self.ctx, user, &state.flow, FlowInput::Text(trimmed)).await?;
            return self.apply_outcome(user, is_admin, state, outcome).await;
        }

        let routed =
            router::handle_text(&self.ctx, user, is_admin, &self.admin_phone, trimmed).await?;
        self.apply_routed(user, routed).await
    }

    async fn process_list_reply(
        &self,
        user: &User,
        is_admin: bool,
        state: Option<DialogState>,
        id: &str,
    ) -> Result<()> {
        if let Some(state) = state {
            if state.flow.accepts_list_replies() {
                let outcome =
                    flows::handle(&self.ctx, user, &state.flow, FlowInput::ListReply(id)).await?;
                return self.apply_outcome(user, is_admin, state, outcome).await;
            }

            // A list selection mid-flow is fresh navigation: drop the flow
            // before routing it.
            debug!(user_id = %user.phone, flow = state.flow.name(), "List reply abandons flow");
            self.store.clear(&user.phone).await?;
        }

        let routed =
            router::handle_list_reply(&self.ctx, user, is_admin, &self.admin_phone, id).await?;
        self.apply_routed(user, routed).await
    }

    async fn cancel(&self, user: &User, is_admin: bool) -> Result<()> {
        self.store.clear(&user.phone).await?;
        self.send(&user.phone, self.ctx.msg("cancel.ack")).await?;
        self.send(&user.phone, router::main_menu(&self.ctx, is_admin))
            .await
    }

    async fn apply_outcome(
        &self,
        user: &User,
        is_admin: bool,
        state: DialogState,
        outcome: Outcome,
    ) -> Result<()> {
        match outcome {
            Outcome::Stay(reply) => self.send(&user.phone, reply).await,
            Outcome::Next(flow, reply) => {
                log_dialog_transition(&user.phone, state.flow.name(), flow.name());
                self.store.save(&state.advance(flow)).await?;
                self.send(&user.phone, reply).await
            }
            Outcome::Done(replies) => {
                log_dialog_transition(&user.phone, state.flow.name(), "done");
                self.store.clear(&user.phone).await?;
                for reply in replies {
                    self.send(&user.phone, reply).await?;
                }
                self.send(&user.phone, router::main_menu(&self.ctx, is_admin))
                    .await
            }
            Outcome::Abort(reply) => {
                log_dialog_transition(&user.phone, state.flow.name(), "aborted");
                self.store.clear(&user.phone).await?;
                self.send(&user.phone, reply).await?;
                self.send(&user.phone, router::main_menu(&self.ctx, is_admin))
                    .await
            }
        }
    }

    async fn apply_routed(&self, user: &User, routed: Routed) -> Result<()> {
        match routed {
            Routed::Reply(replies) => {
                for reply in replies {
                    self.send(&user.phone, reply).await?;
                }
                Ok(())
            }
            Routed::Start(flow, reply) => {
                log_dialog_transition(&user.phone, "none", flow.name());
                self.store
                    .save(&DialogState::new(&user.phone, flow, self.dialog_ttl))
                    .await?;
                self.send(&user.phone, reply).await
            }
        }
    }

    async fn send(&self, to: &str, message: OutboundMessage) -> Result<()> {
        self.ctx.messenger.send(to, message).await
    }

    async fn send_best_effort(&self, to: &str, message: OutboundMessage) {
        if let Err(e) = self.ctx.messenger.send(to, message).await {
            warn!(user_id = %to, error = %e, "Failed to deliver reply");
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("admin_phone", &self.admin_phone)
            .field("dialog_ttl", &self.dialog_ttl)
            .finish_non_exhaustive()
    }
}
