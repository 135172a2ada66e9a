//! Service order flow
//!
//! Entered from the service list with an affordability pre-check; the
//! purchase itself happens only on the literal "confirm" keyword, and the
//! debit re-checks the balance atomically so drift between the two checks
//! can never overdraw.

use tracing::{info, warn};

use crate::models::{NewOrder, NewTransaction, Service, TransactionKind, User};
use crate::platform::OutboundMessage;
use crate::state::Flow;
use crate::tr_params;
use crate::utils::errors::Result;
use crate::utils::logging::log_balance_change;

use super::{fmt_amount, FlowContext, FlowInput, Outcome};

/// Entry point from the service list. Returns the flow to save (if the order
/// can proceed) and the reply to send either way.
pub fn start(ctx: &FlowContext, user: &User, service: &Service) -> (Option<Flow>, OutboundMessage) {
    if !service.active {
        return (None, ctx.msg("order.inactive"));
    }

    if user.balance < service.price {
        let reply = ctx.msg_with(
            "order.insufficient",
            &tr_params!(
                "balance" => fmt_amount(user.balance),
                "price" => fmt_amount(service.price),
            ),
        );
        return (None, reply);
    }

    let flow = Flow::ServiceOrder {
        service_id: service.id.clone(),
        price: service.price,
    };
    let reply = ctx.msg_with(
        "order.detail",
        &tr_params!(
            "name" => service.name,
            "description" => service.description,
            "price" => fmt_amount(service.price),
            "balance" => fmt_amount(user.balance),
        ),
    );
    (Some(flow), reply)
}

pub async fn handle(
    ctx: &FlowContext,
    user: &User,
    service_id: &str,
    price: f64,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    if !input.value().trim().eq_ignore_ascii_case("confirm") {
        return Ok(Outcome::Stay(ctx.msg("order.confirm_invalid")));
    }

    // The catalog may have changed since the flow started.
    let Some(service) = ctx.services.find(service_id).await? else {
        return Ok(Outcome::Abort(ctx.msg("errors.service_missing")));
    };
    if !service.active {
        return Ok(Outcome::Abort(ctx.msg("order.inactive")));
    }

    if !ctx.users.debit_if_sufficient(&user.phone, price).await? {
        warn!(
            user_id = %user.phone,
            service_id = service_id,
            "Order rejected at debit, balance drifted"
        );
        let reply = ctx.msg_with(
            "order.insufficient",
            &tr_params!(
                "balance" => fmt_amount(user.balance),
                "price" => fmt_amount(price),
            ),
        );
        return Ok(Outcome::Abort(reply));
    }

    ctx.ledger
        .record_transaction(NewTransaction {
            user_phone: user.phone.clone(),
            amount: price,
            kind: TransactionKind::Debit,
            reference: None,
            note: Some(format!("order: {}", service.name)),
        })
        .await?;
    let order = ctx
        .ledger
        .create_order(NewOrder {
            user_phone: user.phone.clone(),
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            price,
        })
        .await?;
    log_balance_change(&user.phone, price, "debit", None);
    info!(order_id = %order.id, user_id = %user.phone, service_id = %service.id, "Order created");

    ctx.notifier
        .notify(&ctx.text_with(
            "admin.notify_order",
            &tr_params!(
                "phone" => user.phone,
                "name" => service.name,
                "price" => fmt_amount(price),
            ),
        ))
        .await;

    let balance = ctx
        .users
        .find(&user.phone)
        .await?
        .map(|u| u.balance)
        .unwrap_or(user.balance - price);
    let mut replies = vec![ctx.msg_with(
        "order.success",
        &tr_params!(
            "name" => service.name,
            "price" => fmt_amount(price),
            "balance" => fmt_amount(balance),
        ),
    )];
    if let Some(instructions) = &service.instructions {
        replies.push(ctx.msg_with(
            "order.instructions",
            &tr_params!("instructions" => instructions),
        ));
    }
    Ok(Outcome::Done(replies))
}
