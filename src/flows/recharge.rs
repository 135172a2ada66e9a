//! Recharge flow
//!
//! The user supplies an external payment transaction id; the verifier
//! confirms it, the amount is credited and recorded with the trx id as
//! reference. Any verification failure aborts the flow without touching the
//! balance.

use tracing::warn;

use crate::models::{NewTransaction, TransactionKind};
use crate::state::Flow;
use crate::tr_params;
use crate::utils::errors::PaymentError;
use crate::utils::logging::log_balance_change;

use super::{fmt_amount, FlowContext, FlowInput, Outcome};
use crate::models::User;
use crate::platform::OutboundMessage;
use crate::utils::errors::Result;

/// Entry point: the flow to save and the prompt to send
pub fn start(ctx: &FlowContext) -> (Flow, OutboundMessage) {
    (Flow::Recharge, ctx.msg("recharge.prompt"))
}

pub async fn handle(ctx: &FlowContext, user: &User, input: FlowInput<'_>) -> Result<Outcome> {
    let trx_id = input.value().trim();
    if trx_id.is_empty() {
        return Ok(Outcome::Stay(ctx.msg("recharge.empty")));
    }

    // A reference can be redeemed once, ever.
    if ctx
        .ledger
        .find_transaction_by_reference(trx_id)
        .await?
        .is_some()
    {
        return Ok(Outcome::Done(vec![ctx.msg("recharge.already_used")]));
    }

    let info = match ctx.payment.verify(trx_id).await {
        Ok(info) => info,
        Err(e) => {
            warn!(trx_id = trx_id, error = %e, "Recharge verification failed");
            let key = match e {
                PaymentError::NotVerified => "recharge.not_verified",
                PaymentError::MissingAmount => "recharge.missing_amount",
                PaymentError::InvalidResponse(_) => "recharge.invalid_response",
                PaymentError::Timeout | PaymentError::RequestFailed(_) => "recharge.network",
            };
            return Ok(Outcome::Done(vec![ctx.msg(key)]));
        }
    };

    let balance = ctx.users.credit_balance(&user.phone, info.amount).await?;
    ctx.ledger
        .record_transaction(NewTransaction {
            user_phone: user.phone.clone(),
            amount: info.amount,
            kind: TransactionKind::Credit,
            reference: Some(trx_id.to_string()),
            note: Some(format!("recharge by {}", info.payer)),
        })
        .await?;
    log_balance_change(&user.phone, info.amount, "credit", Some(trx_id));

    ctx.notifier
        .notify(&ctx.text_with(
            "admin.notify_recharge",
            &tr_params!(
                "phone" => user.phone,
                "amount" => fmt_amount(info.amount),
                "reference" => trx_id,
            ),
        ))
        .await;

    Ok(Outcome::Done(vec![ctx.msg_with(
        "recharge.success",
        &tr_params!(
            "amount" => fmt_amount(info.amount),
            "balance" => fmt_amount(balance),
        ),
    )]))
}
