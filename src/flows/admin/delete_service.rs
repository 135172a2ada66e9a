//! Delete-service flow
//!
//! Deletion is irreversible, so the confirmation demands the exact phrase
//! "confirm delete" rather than a plain "confirm".

use crate::models::User;
use crate::platform::message::MAX_LIST_ROWS;
use crate::platform::{ListMenu, ListRow, ListSection, OutboundMessage};
use crate::state::{DeleteStep, Flow};
use crate::tr_params;
use crate::utils::errors::{ChatCartError, Result};
use crate::utils::logging::log_admin_action;

use crate::flows::{select_indexed, service_listing, FlowContext, FlowInput, Outcome};

/// Entry point from the admin menu
pub async fn start(ctx: &FlowContext) -> Result<(Option<Flow>, OutboundMessage)> {
    let services = ctx.services.list_all().await?;
    if services.is_empty() {
        return Ok((None, ctx.msg("delete_service.empty")));
    }

    if services.len() > MAX_LIST_ROWS {
        let flow = Flow::DeleteService {
            step: DeleteStep::SelectService,
        };
        let reply = ctx.msg_with(
            "delete_service.select_prompt",
            &tr_params!("listing" => service_listing(&services)),
        );
        return Ok((Some(flow), reply));
    }

    let rows = services
        .iter()
        .map(|s| ListRow {
            id: format!("del:{}", s.id),
            title: s.name.clone(),
            description: Some(s.description.clone()),
        })
        .collect();
    let reply = OutboundMessage::List(ListMenu {
        header: Some(ctx.text("delete_service.pick_header")),
        body: ctx.text("delete_service.pick_body"),
        button_text: ctx.text("delete_service.pick_button"),
        sections: vec![ListSection {
            title: ctx.text("menu.section"),
            rows,
        }],
    });
    Ok((None, reply))
}

/// Entry point from a `del:<id>` list row
pub async fn enter(
    ctx: &FlowContext,
    service_id: &str,
) -> Result<Option<(Flow, OutboundMessage)>> {
    let Some(service) = ctx.services.find(service_id).await? else {
        return Ok(None);
    };
    let flow = Flow::DeleteService {
        step: DeleteStep::Confirm {
            service_id: service.id.clone(),
        },
    };
    let reply = ctx.msg_with(
        "delete_service.confirm_prompt",
        &tr_params!("name" => service.name),
    );
    Ok(Some((flow, reply)))
}

pub async fn handle(
    ctx: &FlowContext,
    user: &User,
    step: &DeleteStep,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    match step {
        DeleteStep::SelectService => {
            let services = ctx.services.list_all().await?;
            match select_indexed(input.value(), &services) {
                Some(service) => Ok(Outcome::Next(
                    Flow::DeleteService {
                        step: DeleteStep::Confirm {
                            service_id: service.id.clone(),
                        },
                    },
                    ctx.msg_with(
                        "delete_service.confirm_prompt",
                        &tr_params!("name" => service.name),
                    ),
                )),
                None => Ok(Outcome::Stay(ctx.msg("delete_service.select_invalid"))),
            }
        }
        DeleteStep::Confirm { service_id } => {
            if !input.value().trim().eq_ignore_ascii_case("confirm delete") {
                return Ok(Outcome::Stay(ctx.msg("delete_service.confirm_invalid")));
            }

            let Some(service) = ctx.services.find(service_id).await? else {
                return Ok(Outcome::Abort(ctx.msg("errors.service_missing")));
            };
            match ctx.services.delete(service_id).await {
                Ok(()) => {}
                Err(ChatCartError::ServiceNotFound { .. }) => {
                    return Ok(Outcome::Abort(ctx.msg("errors.service_missing")))
                }
                Err(e) => return Err(e),
            }
            log_admin_action(&user.phone, "service_deleted", Some(service_id));

            Ok(Outcome::Done(vec![ctx.msg_with(
                "delete_service.deleted",
                &tr_params!("name" => service.name),
            )]))
        }
    }
}
