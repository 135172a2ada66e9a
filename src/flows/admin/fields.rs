//! Field-management sub-wizard
//!
//! Reached from the edit-service wizard. Adds, lists and deletes the custom
//! input fields of one service; editing an existing field is acknowledged as
//! not available.

use crate::models::{FieldKind, Service, ServiceEdit, ServiceField, User};
use crate::platform::{ListMenu, ListRow, ListSection, OutboundMessage};
use crate::state::{EditStep, FieldAddStep, FieldDraft, Flow};
use crate::tr_params;
use crate::utils::errors::{ChatCartError, Result};
use crate::utils::helpers::{normalize_field_name, split_options};
use crate::utils::logging::log_admin_action;

use crate::flows::{FlowContext, FlowInput, Outcome};

use super::edit_service;

/// The field-action menu for one service
pub fn menu(ctx: &FlowContext, service: &Service) -> OutboundMessage {
    let row = |id: &str, key: &str| ListRow {
        id: id.to_string(),
        title: ctx.text(key),
        description: None,
    };
    OutboundMessage::List(ListMenu {
        header: Some(ctx.text_with(
            "fields.menu_header",
            &tr_params!("name" => service.name),
        )),
        body: ctx.text("fields.menu_body"),
        button_text: ctx.text("fields.menu_button"),
        sections: vec![ListSection {
            title: ctx.text("menu.section"),
            rows: vec![
                row("field_add", "fields.rows.add"),
                row("field_view", "fields.rows.view"),
                row("field_edit", "fields.rows.edit"),
                row("field_delete", "fields.rows.delete"),
                row("field_back", "fields.rows.back"),
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
        EditStep::FieldMenu { service_id } => handle_menu(ctx, service_id, input).await,
        EditStep::FieldAdd {
            service_id,
            step,
            draft,
        } => handle_add(ctx, user, service_id, *step, draft, input).await,
        EditStep::FieldEditSelect { service_id } => {
            handle_edit_select(ctx, service_id, input).await
        }
        EditStep::FieldDeleteSelect { service_id } => {
            handle_delete_select(ctx, user, service_id, input).await
        }
        _ => Ok(Outcome::Abort(ctx.msg("errors.generic"))),
    }
}

async fn handle_menu(
    ctx: &FlowContext,
    service_id: &str,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    let Some(service) = ctx.services.find(service_id).await? else {
        return Ok(Outcome::Abort(ctx.msg("errors.service_missing")));
    };

    let choice = input.value().trim().to_lowercase();
    let choice = choice.strip_prefix("field_").unwrap_or(&choice);

    match choice {
        "add" | "1" => Ok(Outcome::Next(
            Flow::EditService {
                step: EditStep::FieldAdd {
                    service_id: service_id.to_string(),
                    step: FieldAddStep::Name,
                    draft: FieldDraft::default(),
                },
            },
            ctx.msg("fields.name_prompt"),
        )),
        "view" | "2" => Ok(Outcome::Stay(render_fields(ctx, &service))),
        "edit" | "3" => {
            if service.fields.0.is_empty() {
                return Ok(Outcome::Stay(ctx.msg("fields.none")));
            }
            Ok(Outcome::Next(
                Flow::EditService {
                    step: EditStep::FieldEditSelect {
                        service_id: service_id.to_string(),
                    },
                },
                ctx.msg_with(
                    "fields.edit_select_prompt",
                    &tr_params!("listing" => field_listing(&service.fields.0)),
                ),
            ))
        }
        "delete" | "4" => {
            if service.fields.0.is_empty() {
                return Ok(Outcome::Stay(ctx.msg("fields.none")));
            }
            Ok(Outcome::Next(
                Flow::EditService {
                    step: EditStep::FieldDeleteSelect {
                        service_id: service_id.to_string(),
                    },
                },
                ctx.msg_with(
                    "fields.delete_prompt",
                    &tr_params!("listing" => field_listing(&service.fields.0)),
                ),
            ))
        }
        "back" | "5" => Ok(Outcome::Next(
            Flow::EditService {
                step: EditStep::SelectOption {
                    service_id: service_id.to_string(),
                },
            },
            edit_service::options_menu(ctx, &service),
        )),
        _ => Ok(Outcome::Stay(ctx.msg("fields.menu_invalid"))),
    }
}

async fn handle_add(
    ctx: &FlowContext,
    user: &User,
    service_id: &str,
    step: FieldAddStep,
    draft: &FieldDraft,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    let text = input.value().trim();
    let mut draft = draft.clone();

    let next = |step: FieldAddStep, draft: FieldDraft, reply: OutboundMessage| {
        Outcome::Next(
            Flow::EditService {
                step: EditStep::FieldAdd {
                    service_id: service_id.to_string(),
                    step,
                    draft,
                },
            },
            reply,
        )
    };

    match step {
        FieldAddStep::Name => {
            let name = normalize_field_name(text);
            if name.is_empty() {
                return Ok(Outcome::Stay(ctx.msg("fields.name_empty")));
            }
            draft.name = Some(name);
            Ok(next(FieldAddStep::Label, draft, ctx.msg("fields.label_prompt")))
        }
        FieldAddStep::Label => {
            if text.is_empty() {
                return Ok(Outcome::Stay(ctx.msg("fields.label_empty")));
            }
            draft.label = Some(text.to_string());
            Ok(next(FieldAddStep::Kind, draft, kind_menu(ctx)))
        }
        FieldAddStep::Kind => {
            let raw = text.strip_prefix("kind:").unwrap_or(text);
            let Some(kind) = FieldKind::parse(raw) else {
                return Ok(Outcome::Stay(ctx.msg("fields.kind_invalid")));
            };
            draft.kind = Some(kind);
            if kind == FieldKind::Select {
                Ok(next(
                    FieldAddStep::Options,
                    draft,
                    ctx.msg("fields.options_prompt"),
                ))
            } else {
                let prompt = confirm_prompt(ctx, &draft);
                Ok(next(FieldAddStep::Confirm, draft, prompt))
            }
        }
        FieldAddStep::Options => {
            let options = split_options(text);
            if options.is_empty() {
                return Ok(Outcome::Stay(ctx.msg("fields.options_empty")));
            }
            draft.options = options;
            let prompt = confirm_prompt(ctx, &draft);
            Ok(next(FieldAddStep::Confirm, draft, prompt))
        }
        FieldAddStep::Confirm => {
            if !text.eq_ignore_ascii_case("confirm") {
                return Ok(Outcome::Stay(ctx.msg("fields.confirm_invalid")));
            }

            let (Some(name), Some(label), Some(kind)) =
                (draft.name.clone(), draft.label.clone(), draft.kind)
            else {
                return Ok(Outcome::Abort(ctx.msg("errors.generic")));
            };

            let Some(service) = ctx.services.find(service_id).await? else {
                return Ok(Outcome::Abort(ctx.msg("errors.service_missing")));
            };
            let mut all_fields = service.fields.0.clone();
            all_fields.push(ServiceField {
                name,
                label: label.clone(),
                kind,
                options: draft.options.clone(),
            });

            match ctx
                .services
                .apply_edit(service_id, ServiceEdit::Fields(all_fields))
                .await
            {
                Ok(_) => {}
                Err(ChatCartError::ServiceNotFound { .. }) => {
                    return Ok(Outcome::Abort(ctx.msg("errors.service_missing")))
                }
                Err(e) => return Err(e),
            }
            log_admin_action(&user.phone, "field_added", Some(service_id));

            Ok(Outcome::Done(vec![ctx.msg_with(
                "fields.added",
                &tr_params!("label" => label),
            )]))
        }
    }
}

async fn handle_edit_select(
    ctx: &FlowContext,
    service_id: &str,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    let Some(service) = ctx.services.find(service_id).await? else {
        return Ok(Outcome::Abort(ctx.msg("errors.service_missing")));
    };

    // Selection is validated, then acknowledged as not available.
    match crate::flows::select_indexed(input.value(), &service.fields.0) {
        Some(_) => Ok(Outcome::Done(vec![ctx.msg("fields.edit_stub")])),
        None => Ok(Outcome::Stay(ctx.msg("fields.edit_invalid"))),
    }
}

async fn handle_delete_select(
    ctx: &FlowContext,
    user: &User,
    service_id: &str,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    let Some(service) = ctx.services.find(service_id).await? else {
        return Ok(Outcome::Abort(ctx.msg("errors.service_missing")));
    };

    let fields = &service.fields.0;
    let index: Option<usize> = input.value().trim().parse().ok();
    let Some(index) = index.filter(|i| (1..=fields.len()).contains(i)) else {
        return Ok(Outcome::Stay(ctx.msg("fields.delete_invalid")));
    };

    let mut remaining = fields.clone();
    let removed = remaining.remove(index - 1);

    match ctx
        .services
        .apply_edit(service_id, ServiceEdit::Fields(remaining))
        .await
    {
        Ok(_) => {}
        Err(ChatCartError::ServiceNotFound { .. }) => {
            return Ok(Outcome::Abort(ctx.msg("errors.service_missing")))
        }
        Err(e) => return Err(e),
    }
    log_admin_action(&user.phone, "field_deleted", Some(service_id));

    Ok(Outcome::Done(vec![ctx.msg_with(
        "fields.deleted",
        &tr_params!("label" => removed.label),
    )]))
}

fn kind_menu(ctx: &FlowContext) -> OutboundMessage {
    let row = |kind: FieldKind, title: &str| ListRow {
        id: format!("kind:{}", kind.as_str()),
        title: title.to_string(),
        description: None,
    };
    OutboundMessage::List(ListMenu {
        header: None,
        body: ctx.text("fields.kind_prompt"),
        button_text: ctx.text("fields.menu_button"),
        sections: vec![ListSection {
            title: ctx.text("menu.section"),
            rows: vec![
                row(FieldKind::Text, "Text"),
                row(FieldKind::Number, "Number"),
                row(FieldKind::Select, "Select"),
                row(FieldKind::File, "File"),
            ],
        }],
    })
}

fn confirm_prompt(ctx: &FlowContext, draft: &FieldDraft) -> OutboundMessage {
    let options = if draft.options.is_empty() {
        String::new()
    } else {
        format!("\nOptions: {}", draft.options.join(", "))
    };
    let summary = ctx.text_with(
        "fields.summary",
        &tr_params!(
            "name" => draft.name.as_deref().unwrap_or("?"),
            "label" => draft.label.as_deref().unwrap_or("?"),
            "kind" => draft.kind.map(|k| k.as_str()).unwrap_or("?"),
            "options" => options,
        ),
    );
    ctx.msg_with("fields.confirm_prompt", &tr_params!("summary" => summary))
}

fn render_fields(ctx: &FlowContext, service: &Service) -> OutboundMessage {
    if service.fields.0.is_empty() {
        return ctx.msg("fields.none");
    }

    let mut lines = vec![ctx.text_with(
        "fields.view_header",
        &tr_params!("name" => service.name),
    )];
    for (i, field) in service.fields.0.iter().enumerate() {
        let options = if field.options.is_empty() {
            String::new()
        } else {
            format!(" [{}]", field.options.join(", "))
        };
        lines.push(ctx.text_with(
            "fields.view_line",
            &tr_params!(
                "index" => i + 1,
                "label" => field.label,
                "name" => field.name,
                "kind" => field.kind.as_str(),
                "options" => options,
            ),
        ));
    }
    OutboundMessage::text(lines.join("\n"))
}

fn field_listing(fields: &[ServiceField]) -> String {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. {} ({})", i + 1, f.label, f.kind.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}
