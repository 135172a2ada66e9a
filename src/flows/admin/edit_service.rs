//! Edit-service wizard
//!
//! Pick a service, pick an attribute, send the new value. Single-input states
//! patch exactly one attribute; the status toggle and the field sub-wizard
//! act immediately without a value state.

use crate::models::{Service, ServiceEdit, User};
use crate::platform::message::MAX_LIST_ROWS;
use crate::platform::{ListMenu, ListRow, ListSection, OutboundMessage};
use crate::state::{EditField, EditStep, Flow};
use crate::tr_params;
use crate::utils::errors::{ChatCartError, Result};
use crate::utils::logging::log_admin_action;

use crate::flows::{parse_price, select_indexed, service_listing, FlowContext, FlowInput, Outcome};

use super::fields;

/// Entry point from the admin menu. Small catalogs get an interactive list
/// (`edit:<id>` rows); larger ones fall back to a numbered text selection.
pub async fn start(ctx: &FlowContext) -> Result<(Option<Flow>, OutboundMessage)> {
    let services = ctx.services.list_all().await?;
    if services.is_empty() {
        return Ok((None, ctx.msg("edit_service.empty")));
    }

    if services.len() > MAX_LIST_ROWS {
        let flow = Flow::EditService {
            step: EditStep::SelectService,
        };
        let reply = ctx.msg_with(
            "edit_service.select_prompt",
            &tr_params!("listing" => service_listing(&services)),
        );
        return Ok((Some(flow), reply));
    }

    let rows = services
        .iter()
        .map(|s| ListRow {
            id: format!("edit:{}", s.id),
            title: s.name.clone(),
            description: Some(s.description.clone()),
        })
        .collect();
    let reply = OutboundMessage::List(ListMenu {
        header: Some(ctx.text("edit_service.pick_header")),
        body: ctx.text("edit_service.pick_body"),
        button_text: ctx.text("edit_service.pick_button"),
        sections: vec![ListSection {
            title: ctx.text("menu.section"),
            rows,
        }],
    });
    Ok((None, reply))
}

/// Entry point from an `edit:<id>` list row
pub async fn enter(
    ctx: &FlowContext,
    service_id: &str,
) -> Result<Option<(Flow, OutboundMessage)>> {
    let Some(service) = ctx.services.find(service_id).await? else {
        return Ok(None);
    };
    let flow = Flow::EditService {
        step: EditStep::SelectOption {
            service_id: service.id.clone(),
        },
    };
    Ok(Some((flow, options_menu(ctx, &service))))
}

/// The attribute-selection menu for one service
pub fn options_menu(ctx: &FlowContext, service: &Service) -> OutboundMessage {
    let option_row = |id: &str, key: &str| ListRow {
        id: id.to_string(),
        title: ctx.text(key),
        description: None,
    };
    OutboundMessage::List(ListMenu {
        header: Some(ctx.text_with(
            "edit_service.option_header",
            &tr_params!("name" => service.name),
        )),
        body: ctx.text("edit_service.option_body"),
        button_text: ctx.text("edit_service.option_button"),
        sections: vec![ListSection {
            title: ctx.text("menu.section"),
            rows: vec![
                option_row("edit_name", "edit_service.options.name"),
                option_row("edit_description", "edit_service.options.description"),
                option_row("edit_price", "edit_service.options.price"),
                option_row("edit_instructions", "edit_service.options.instructions"),
                option_row("edit_status", "edit_service.options.status"),
                option_row("edit_fields", "edit_service.options.fields"),
            ],
        }],
    })
}

pub async fn handle(
    ctx: &FlowContext,
    user: &User,
    step: &EditStep,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    match step {
        EditStep::SelectService => {
            let services = ctx.services.list_all().await?;
            match select_indexed(input.value(), &services) {
                Some(service) => Ok(Outcome::Next(
                    Flow::EditService {
                        step: EditStep::SelectOption {
                            service_id: service.id.clone(),
                        },
                    },
                    options_menu(ctx, service),
                )),
                None => Ok(Outcome::Stay(ctx.msg("edit_service.select_invalid"))),
            }
        }
        EditStep::SelectOption { service_id } => {
            handle_option(ctx, user, service_id, input).await
        }
        EditStep::EditValue { service_id, field } => {
            handle_value(ctx, user, service_id, *field, input).await
        }
        EditStep::FieldMenu { .. }
        | EditStep::FieldAdd { .. }
        | EditStep::FieldEditSelect { .. }
        | EditStep::FieldDeleteSelect { .. } => fields::handle(ctx, user, step, input).await,
    }
}

async fn handle_option(
    ctx: &FlowContext,
    user: &User,
    service_id: &str,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    let Some(service) = ctx.services.find(service_id).await? else {
        return Ok(Outcome::Abort(ctx.msg("errors.service_missing")));
    };

    let choice = input.value().trim().to_lowercase();
    let choice = choice.strip_prefix("edit_").unwrap_or(&choice);

    let value_state = |field: EditField, prompt_key: &str| {
        Outcome::Next(
            Flow::EditService {
                step: EditStep::EditValue {
                    service_id: service_id.to_string(),
                    field,
                },
            },
            ctx.msg(prompt_key),
        )
    };

    match choice {
        "name" | "1" => Ok(value_state(EditField::Name, "edit_service.value_prompt.name")),
        "description" | "2" => Ok(value_state(
            EditField::Description,
            "edit_service.value_prompt.description",
        )),
        "price" | "3" => Ok(value_state(EditField::Price, "edit_service.value_prompt.price")),
        "instructions" | "4" => Ok(value_state(
            EditField::Instructions,
            "edit_service.value_prompt.instructions",
        )),
        "status" | "5" => {
            let updated = match ctx
                .services
                .apply_edit(service_id, ServiceEdit::Active(!service.active))
                .await
            {
                Ok(updated) => updated,
                Err(ChatCartError::ServiceNotFound { .. }) => {
                    return Ok(Outcome::Abort(ctx.msg("errors.service_missing")))
                }
                Err(e) => return Err(e),
            };
            log_admin_action(&user.phone, "service_status_toggled", Some(service_id));
            let key = if updated.active {
                "edit_service.status_on"
            } else {
                "edit_service.status_off"
            };
            Ok(Outcome::Stay(ctx.msg_with(
                key,
                &tr_params!("name" => updated.name),
            )))
        }
        "fields" | "6" => Ok(Outcome::Next(
            Flow::EditService {
                step: EditStep::FieldMenu {
                    service_id: service_id.to_string(),
                },
            },
            fields::menu(ctx, &service),
        )),
        _ => Ok(Outcome::Stay(ctx.msg("edit_service.option_invalid"))),
    }
}

async fn handle_value(
    ctx: &FlowContext,
    user: &User,
    service_id: &str,
    field: EditField,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    let text = input.value().trim();

    let edit = match field {
        EditField::Name | EditField::Description if text.is_empty() => {
            return Ok(Outcome::Stay(ctx.msg("edit_service.value_empty")));
        }
        EditField::Name => ServiceEdit::Name(text.to_string()),
        EditField::Description => ServiceEdit::Description(text.to_string()),
        EditField::Price => match parse_price(text) {
            Some(price) => ServiceEdit::Price(price),
            None => return Ok(Outcome::Stay(ctx.msg("edit_service.price_invalid"))),
        },
        EditField::Instructions => {
            if text.eq_ignore_ascii_case("skip") || text.is_empty() {
                ServiceEdit::Instructions(None)
            } else {
                ServiceEdit::Instructions(Some(text.to_string()))
            }
        }
    };

    let updated = match ctx.services.apply_edit(service_id, edit).await {
        Ok(updated) => updated,
        Err(ChatCartError::ServiceNotFound { .. }) => {
            return Ok(Outcome::Abort(ctx.msg("errors.service_missing")))
        }
        Err(e) => return Err(e),
    };
    log_admin_action(&user.phone, "service_edited", Some(service_id));

    Ok(Outcome::Done(vec![ctx.msg_with(
        "edit_service.updated",
        &tr_params!("name" => updated.name),
    )]))
}
