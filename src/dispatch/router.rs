//! Flow-less command routing
//!
//! Keyword intents for plain text outside any flow, the main menu, and the
//! list-reply id routing (direct row ids plus the `svc:`/`edit:`/`del:`
//! prefixed ids).

use crate::flows::{self, fmt_amount, FlowContext};
use crate::models::User;
use crate::platform::{ListMenu, ListRow, ListSection, OutboundMessage};
use crate::state::Flow;
use crate::tr_params;
use crate::utils::errors::Result;

/// What the router decided for one flow-less input
#[derive(Debug)]
pub enum Routed {
    /// Just send these
    Reply(Vec<OutboundMessage>),
    /// Begin a flow: save the state, send the prompt
    Start(Flow, OutboundMessage),
}

impl Routed {
    fn reply(msg: OutboundMessage) -> Self {
        Routed::Reply(vec![msg])
    }
}

/// The main navigation menu
pub fn main_menu(ctx: &FlowContext, is_admin: bool) -> OutboundMessage {
    let row = |id: &str, title_key: &str, desc_key: &str| ListRow {
        id: id.to_string(),
        title: ctx.text(title_key),
        description: Some(ctx.text(desc_key)),
    };

    let mut sections = vec![ListSection {
        title: ctx.text("menu.section"),
        rows: vec![
            row("recharge", "menu.rows.recharge.title", "menu.rows.recharge.desc"),
            row("services", "menu.rows.services.title", "menu.rows.services.desc"),
            row("orders", "menu.rows.orders.title", "menu.rows.orders.desc"),
            row("history", "menu.rows.history.title", "menu.rows.history.desc"),
            row("account", "menu.rows.account.title", "menu.rows.account.desc"),
            row("support", "menu.rows.support.title", "menu.rows.support.desc"),
        ],
    }];
    if is_admin {
        sections.push(ListSection {
            title: ctx.text("menu.admin_section"),
            rows: vec![
                row("admin_add", "menu.admin_rows.add.title", "menu.admin_rows.add.desc"),
                row("admin_edit", "menu.admin_rows.edit.title", "menu.admin_rows.edit.desc"),
                row(
                    "admin_delete",
                    "menu.admin_rows.delete.title",
                    "menu.admin_rows.delete.desc",
                ),
                row(
                    "admin_broadcast",
                    "menu.admin_rows.broadcast.title",
                    "menu.admin_rows.broadcast.desc",
                ),
            ],
        });
    }

    OutboundMessage::List(ListMenu {
        header: Some(ctx.text("menu.header")),
        body: ctx.text("menu.body"),
        button_text: ctx.text("menu.button"),
        sections,
    })
}

/// Route a plain text message with no active flow
pub async fn handle_text(
    ctx: &FlowContext,
    user: &User,
    is_admin: bool,
    admin_phone: &str,
    text: &str,
) -> Result<Routed> {
    let lower = text.trim().to_lowercase();

    if contains_any(&lower, &["recharge", "top up", "topup"]) {
        let (flow, reply) = flows::recharge::start(ctx);
        return Ok(Routed::Start(flow, reply));
    }
    if lower.contains("service") {
        return Ok(Routed::reply(services_list(ctx).await?));
    }
    if lower.contains("order") {
        return Ok(Routed::reply(orders_listing(ctx, user).await?));
    }
    if contains_any(&lower, &["history", "transaction"]) {
        return Ok(Routed::reply(history_listing(ctx, user).await?));
    }
    if contains_any(&lower, &["account", "balance"]) {
        return Ok(Routed::reply(account_info(ctx, user)));
    }
    if contains_any(&lower, &["support", "help"]) {
        return Ok(Routed::reply(support_info(ctx, admin_phone)));
    }
    if is_admin && lower.contains("admin") {
        return Ok(Routed::reply(main_menu(ctx, true)));
    }

    Ok(Routed::Reply(vec![
        ctx.msg("greeting"),
        main_menu(ctx, is_admin),
    ]))
}

/// Route a list-reply row id with no active flow (or after clearing one)
pub async fn handle_list_reply(
    ctx: &FlowContext,
    user: &User,
    is_admin: bool,
    admin_phone: &str,
    id: &str,
) -> Result<Routed> {
    if let Some(service_id) = id.strip_prefix("svc:") {
        let Some(service) = ctx.services.find(service_id).await? else {
            return Ok(unknown_option(ctx, is_admin));
        };
        let (flow, reply) = flows::orders::start(ctx, user, &service);
        return Ok(match flow {
            Some(flow) => Routed::Start(flow, reply),
            None => Routed::reply(reply),
        });
    }

    if let Some(service_id) = id.strip_prefix("edit:") {
        if !is_admin {
            return Ok(Routed::reply(ctx.msg("errors.not_admin")));
        }
        return Ok(match flows::admin::edit_service::enter(ctx, service_id).await? {
            Some((flow, reply)) => Routed::Start(flow, reply),
            None => unknown_option(ctx, is_admin),
        });
    }

    if let Some(service_id) = id.strip_prefix("del:") {
        if !is_admin {
            return Ok(Routed::reply(ctx.msg("errors.not_admin")));
        }
        return Ok(
            match flows::admin::delete_service::enter(ctx, service_id).await? {
                Some((flow, reply)) => Routed::Start(flow, reply),
                None => unknown_option(ctx, is_admin),
            },
        );
    }

    match id {
        "recharge" => {
            let (flow, reply) = flows::recharge::start(ctx);
            Ok(Routed::Start(flow, reply))
        }
        "services" => Ok(Routed::reply(services_list(ctx).await?)),
        "orders" => Ok(Routed::reply(orders_listing(ctx, user).await?)),
        "history" => Ok(Routed::reply(history_listing(ctx, user).await?)),
        "account" => Ok(Routed::reply(account_info(ctx, user))),
        "support" => Ok(Routed::reply(support_info(ctx, admin_phone))),
        "admin_add" | "admin_edit" | "admin_delete" | "admin_broadcast" if !is_admin => {
            Ok(Routed::reply(ctx.msg("errors.not_admin")))
        }
        "admin_add" => {
            let (flow, reply) = flows::admin::add_service::start(ctx);
            Ok(Routed::Start(flow, reply))
        }
        "admin_edit" => {
            let (flow, reply) = flows::admin::edit_service::start(ctx).await?;
            Ok(match flow {
                Some(flow) => Routed::Start(flow, reply),
                None => Routed::reply(reply),
            })
        }
        "admin_delete" => {
            let (flow, reply) = flows::admin::delete_service::start(ctx).await?;
            Ok(match flow {
                Some(flow) => Routed::Start(flow, reply),
                None => Routed::reply(reply),
            })
        }
        "admin_broadcast" => {
            let (flow, reply) = flows::admin::broadcast::start(ctx);
            Ok(Routed::Start(flow, reply))
        }
        _ => Ok(unknown_option(ctx, is_admin)),
    }
}

fn unknown_option(ctx: &FlowContext, is_admin: bool) -> Routed {
    Routed::Reply(vec![
        ctx.msg("errors.unknown_option"),
        main_menu(ctx, is_admin),
    ])
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// The browsable catalog as an interactive list of `svc:<id>` rows
pub async fn services_list(ctx: &FlowContext) -> Result<OutboundMessage> {
    let services = ctx.services.list_active().await?;
    if services.is_empty() {
        return Ok(ctx.msg("services.empty"));
    }

    let rows = services
        .iter()
        .map(|s| ListRow {
            id: format!("svc:{}", s.id),
            title: s.name.clone(),
            description: Some(ctx.text_with(
                "services.row_desc",
                &tr_params!("price" => fmt_amount(s.price)),
            )),
        })
        .collect();
    Ok(OutboundMessage::List(ListMenu {
        header: Some(ctx.text("services.header")),
        body: ctx.text("services.body"),
        button_text: ctx.text("services.button"),
        sections: vec![ListSection {
            title: ctx.text("menu.section"),
            rows,
        }],
    }))
}

async fn orders_listing(ctx: &FlowContext, user: &User) -> Result<OutboundMessage> {
    let orders = ctx.ledger.list_orders_for(&user.phone, 10).await?;
    if orders.is_empty() {
        return Ok(ctx.msg("orders.empty"));
    }

    let mut lines = vec![ctx.text("orders.header")];
    for (i, order) in orders.iter().enumerate() {
        lines.push(ctx.text_with(
            "orders.line",
            &tr_params!(
                "index" => i + 1,
                "name" => order.service_name,
                "price" => fmt_amount(order.price),
                "status" => order.status,
                "date" => order.created_at.format("%Y-%m-%d"),
            ),
        ));
    }
    Ok(OutboundMessage::text(lines.join("\n")))
}

async fn history_listing(ctx: &FlowContext, user: &User) -> Result<OutboundMessage> {
    let transactions = ctx.ledger.list_transactions_for(&user.phone, 10).await?;
    if transactions.is_empty() {
        return Ok(ctx.msg("history.empty"));
    }

    let mut lines = vec![ctx.text("history.header")];
    for (i, tx) in transactions.iter().enumerate() {
        let key = if tx.kind == "credit" {
            "history.credit_line"
        } else {
            "history.debit_line"
        };
        lines.push(ctx.text_with(
            key,
            &tr_params!(
                "index" => i + 1,
                "amount" => fmt_amount(tx.amount),
                "date" => tx.created_at.format("%Y-%m-%d"),
            ),
        ));
    }
    Ok(OutboundMessage::text(lines.join("\n")))
}

fn account_info(ctx: &FlowContext, user: &User) -> OutboundMessage {
    ctx.msg_with(
        "account.info",
        &tr_params!(
            "phone" => user.phone,
            "balance" => fmt_amount(user.balance),
            "joined" => user.created_at.format("%Y-%m-%d"),
        ),
    )
}

fn support_info(ctx: &FlowContext, admin_phone: &str) -> OutboundMessage {
    ctx.msg_with("support.info", &tr_params!("admin_phone" => admin_phone))
}
