//! Add-service wizard
//!
//! Collects name, description, price and optional instructions step by step,
//! then creates the service on an explicit confirm. The id is a slug derived
//! from the name at confirm time.

use crate::models::{NewService, ServiceDraft, User};
use crate::platform::OutboundMessage;
use crate::state::{AddServiceStep, Flow};
use crate::tr_params;
use crate::utils::errors::Result;
use crate::utils::helpers::slugify;
use crate::utils::logging::log_admin_action;

use crate::flows::{fmt_amount, parse_price, FlowContext, FlowInput, Outcome};

pub fn start(ctx: &FlowContext) -> (Flow, OutboundMessage) {
    let flow = Flow::AddService {
        step: AddServiceStep::Name,
        draft: ServiceDraft::default(),
    };
    (flow, ctx.msg("add_service.name_prompt"))
}

pub async fn handle(
    ctx: &FlowContext,
    user: &User,
    step: AddServiceStep,
    draft: &ServiceDraft,
    input: FlowInput<'_>,
) -> Result<Outcome> {
    let text = input.value().trim();
    let mut draft = draft.clone();

    match step {
        AddServiceStep::Name => {
            if text.is_empty() {
                return Ok(Outcome::Stay(ctx.msg("add_service.name_empty")));
            }
            draft.name = Some(text.to_string());
            Ok(next(AddServiceStep::Description, draft, ctx.msg("add_service.description_prompt")))
        }
        AddServiceStep::Description => {
            if text.is_empty() {
                return Ok(Outcome::Stay(ctx.msg("add_service.description_empty")));
            }
            draft.description = Some(text.to_string());
            Ok(next(AddServiceStep::Price, draft, ctx.msg("add_service.price_prompt")))
        }
        AddServiceStep::Price => {
            let Some(price) = parse_price(text) else {
                return Ok(Outcome::Stay(ctx.msg("add_service.price_invalid")));
            };
            draft.price = Some(price);
            Ok(next(
                AddServiceStep::Instructions,
                draft,
                ctx.msg("add_service.instructions_prompt"),
            ))
        }
        AddServiceStep::Instructions => {
            draft.instructions = if text.eq_ignore_ascii_case("skip") {
                None
            } else if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            };
            let prompt = ctx.msg_with(
                "add_service.confirm_prompt",
                &tr_params!("summary" => summary(ctx, &draft)),
            );
            Ok(next(AddServiceStep::Confirm, draft, prompt))
        }
        AddServiceStep::Confirm => {
            if !text.eq_ignore_ascii_case("confirm") {
                return Ok(Outcome::Stay(ctx.msg("add_service.confirm_invalid")));
            }

            let (Some(name), Some(description), Some(price)) =
                (draft.name.clone(), draft.description.clone(), draft.price)
            else {
                return Ok(Outcome::Abort(ctx.msg("errors.generic")));
            };

            let service = ctx
                .services
                .create(NewService {
                    id: slugify(&name),
                    name: name.clone(),
                    description,
                    price,
                    instructions: draft.instructions.clone(),
                    active: true,
                })
                .await?;
            log_admin_action(&user.phone, "service_created", Some(&service.id));

            ctx.notifier
                .notify(&ctx.text_with(
                    "admin.notify_service",
                    &tr_params!(
                        "name" => service.name,
                        "id" => service.id,
                        "price" => fmt_amount(service.price),
                    ),
                ))
                .await;

            Ok(Outcome::Done(vec![ctx.msg_with(
                "add_service.created",
                &tr_params!("name" => service.name, "id" => service.id),
            )]))
        }
    }
}

fn next(step: AddServiceStep, draft: ServiceDraft, reply: OutboundMessage) -> Outcome {
    Outcome::Next(Flow::AddService { step, draft }, reply)
}

fn summary(ctx: &FlowContext, draft: &ServiceDraft) -> String {
    ctx.text_with(
        "add_service.summary",
        &tr_params!(
            "name" => draft.name.as_deref().unwrap_or("?"),
            "description" => draft.description.as_deref().unwrap_or("?"),
            "price" => draft.price.map(fmt_amount).unwrap_or_else(|| "?".to_string()),
            "instructions" => draft
                .instructions
                .as_deref()
                .map(str::to_string)
                .unwrap_or_else(|| ctx.text("add_service.no_instructions")),
        ),
    )
}
