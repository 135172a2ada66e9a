//! Broadcast flow
//!
//! The admin sends one free-text announcement; it fans out to every known
//! user and the admin gets the delivery counts back.

use crate::models::User;
use crate::platform::OutboundMessage;
use crate::state::Flow;
use crate::tr_params;
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

use crate::flows::{FlowContext, FlowInput, Outcome};

pub fn start(ctx: &FlowContext) -> (Flow, OutboundMessage) {
    (Flow::Broadcast, ctx.msg("broadcast.prompt"))
}

pub async fn handle(ctx: &FlowContext, user: &User, input: FlowInput<'_>) -> Result<Outcome> {
    let text = input.value().trim();
    if text.is_empty() {
        return Ok(Outcome::Stay(ctx.msg("broadcast.empty")));
    }

    let phones = ctx.users.list_phones().await?;
    let report = ctx.broadcaster.broadcast(&phones, text).await;
    log_admin_action(&user.phone, "broadcast", None);

    Ok(Outcome::Done(vec![ctx.msg_with(
        "broadcast.report",
        &tr_params!(
            "total" => report.total,
            "sent" => report.sent,
            "failed" => report.failed,
        ),
    )]))
}
