//! End-to-end dispatch tests for the admin wizards

mod common;

use assert_matches::assert_matches;

use chatcart::models::FieldKind;
use chatcart::state::{AddServiceStep, DeleteStep, EditStep, Flow};

use common::{field, harness, service, ADMIN, USER};

#[tokio::test]
async fn non_admin_cannot_open_admin_actions() {
    let h = harness();

    h.list_reply(USER, "admin_add").await;

    assert!(h.flow_of(USER).await.is_none());
    assert!(h
        .messenger
        .last_to(USER)
        .unwrap()
        .contains("only available to the store admin"));
}

#[tokio::test]
async fn admin_menu_includes_admin_section() {
    let h = harness();

    h.text(ADMIN, "hello").await;

    assert!(h.messenger.last_to(ADMIN).unwrap().contains("Add service"));
}

#[tokio::test]
async fn add_service_wizard_end_to_end() {
    let h = harness();

    h.list_reply(ADMIN, "admin_add").await;
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::AddService {
            step: AddServiceStep::Name,
            ..
        })
    );

    h.text(ADMIN, "Netflix Premium").await;
    h.text(ADMIN, "Shared account, 4K").await;

    // A bad price re-prompts without advancing
    h.text(ADMIN, "a lot").await;
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::AddService {
            step: AddServiceStep::Price,
            ..
        })
    );
    assert!(h
        .messenger
        .last_to(ADMIN)
        .unwrap()
        .contains("not a valid price"));

    h.text(ADMIN, "150").await;
    h.text(ADMIN, "skip").await;

    let confirm = h.messenger.last_to(ADMIN).unwrap();
    assert!(confirm.contains("Netflix Premium"));
    assert!(confirm.contains("150.00"));

    h.text(ADMIN, "confirm").await;

    let created = h.catalog.get("netflix-premium").expect("service created");
    assert_eq!(created.name, "Netflix Premium");
    assert_eq!(created.description, "Shared account, 4K");
    assert_eq!(created.price, 150.0);
    assert_eq!(created.instructions, None);
    assert!(created.active);
    assert!(h.flow_of(ADMIN).await.is_none());
}

#[tokio::test]
async fn add_service_keeps_instructions_text() {
    let h = harness();

    h.list_reply(ADMIN, "admin_add").await;
    h.text(ADMIN, "VPN Yearly").await;
    h.text(ADMIN, "12 months of VPN").await;
    h.text(ADMIN, "99.99").await;
    h.text(ADMIN, "We will email your credentials within 24h").await;
    h.text(ADMIN, "confirm").await;

    let created = h.catalog.get("vpn-yearly").expect("service created");
    assert_eq!(
        created.instructions.as_deref(),
        Some("We will email your credentials within 24h")
    );
}

#[tokio::test]
async fn edit_price_patches_exactly_one_attribute() {
    let h = harness();
    h.catalog.seed(service("vpn", "VPN Monthly", 40.0));

    h.list_reply(ADMIN, "edit:vpn").await;
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::EditService {
            step: EditStep::SelectOption { .. }
        })
    );

    h.list_reply(ADMIN, "edit_price").await;
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::EditService {
            step: EditStep::EditValue { .. }
        })
    );

    // Invalid value re-prompts in place
    h.text(ADMIN, "cheap").await;
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::EditService {
            step: EditStep::EditValue { .. }
        })
    );

    h.text(ADMIN, "75").await;

    let edited = h.catalog.get("vpn").unwrap();
    assert_eq!(edited.price, 75.0);
    assert_eq!(edited.name, "VPN Monthly");
    assert_eq!(edited.description, "VPN Monthly description");
    assert!(h.flow_of(ADMIN).await.is_none());
}

#[tokio::test]
async fn status_toggle_acts_immediately() {
    let h = harness();
    h.catalog.seed(service("vpn", "VPN Monthly", 40.0));

    h.list_reply(ADMIN, "edit:vpn").await;
    h.list_reply(ADMIN, "edit_status").await;

    assert!(!h.catalog.get("vpn").unwrap().active);
    assert!(h.messenger.last_to(ADMIN).unwrap().contains("inactive"));
    // Still at the option menu, so it can be toggled right back
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::EditService {
            step: EditStep::SelectOption { .. }
        })
    );

    h.list_reply(ADMIN, "edit_status").await;
    assert!(h.catalog.get("vpn").unwrap().active);
}

#[tokio::test]
async fn field_add_wizard_appends_select_field() {
    let h = harness();
    h.catalog.seed(service("vpn", "VPN Monthly", 40.0));

    h.list_reply(ADMIN, "edit:vpn").await;
    h.list_reply(ADMIN, "edit_fields").await;
    h.text(ADMIN, "1").await; // add
    h.text(ADMIN, "Plan Type").await;
    h.text(ADMIN, "Which plan?").await;
    h.list_reply(ADMIN, "kind:select").await;
    h.text(ADMIN, "basic, premium,, ultra ").await;
    h.text(ADMIN, "confirm").await;

    let fields = h.catalog.get("vpn").unwrap().fields.0;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "plan_type");
    assert_eq!(fields[0].label, "Which plan?");
    assert_eq!(fields[0].kind, FieldKind::Select);
    assert_eq!(fields[0].options, vec!["basic", "premium", "ultra"]);
    assert!(h.flow_of(ADMIN).await.is_none());
}

#[tokio::test]
async fn field_delete_removes_exactly_the_selected_index() {
    let h = harness();
    let mut svc = service("vpn", "VPN Monthly", 40.0);
    svc.fields.0 = vec![
        field("username", "Username", FieldKind::Text),
        field("region", "Region", FieldKind::Text),
        field("devices", "Devices", FieldKind::Number),
    ];
    h.catalog.seed(svc);

    h.list_reply(ADMIN, "edit:vpn").await;
    h.list_reply(ADMIN, "edit_fields").await;
    h.text(ADMIN, "4").await; // delete

    // Out-of-range index re-prompts without touching anything
    h.text(ADMIN, "9").await;
    assert_eq!(h.catalog.get("vpn").unwrap().fields.0.len(), 3);
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::EditService {
            step: EditStep::FieldDeleteSelect { .. }
        })
    );

    h.text(ADMIN, "2").await;

    let remaining = h.catalog.get("vpn").unwrap().fields.0;
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].name, "username");
    assert_eq!(remaining[1].name, "devices");
    assert!(h
        .messenger
        .texts_to(ADMIN)
        .iter()
        .any(|t| t.contains("Region")));
}

#[tokio::test]
async fn field_edit_is_acknowledged_but_not_implemented() {
    let h = harness();
    let mut svc = service("vpn", "VPN Monthly", 40.0);
    svc.fields.0 = vec![field("username", "Username", FieldKind::Text)];
    h.catalog.seed(svc);

    h.list_reply(ADMIN, "edit:vpn").await;
    h.list_reply(ADMIN, "edit_fields").await;
    h.text(ADMIN, "3").await; // edit

    // An out-of-range selection re-prompts in place
    h.text(ADMIN, "9").await;
    assert!(h
        .messenger
        .last_to(ADMIN)
        .unwrap()
        .contains("not one of the listed fields"));
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::EditService {
            step: EditStep::FieldEditSelect { .. }
        })
    );

    h.text(ADMIN, "1").await;

    assert!(h
        .messenger
        .texts_to(ADMIN)
        .iter()
        .any(|t| t.contains("isn't available yet")));
    // No mutation
    assert_eq!(h.catalog.get("vpn").unwrap().fields.0.len(), 1);
}

#[tokio::test]
async fn delete_service_requires_exact_phrase() {
    let h = harness();
    h.catalog.seed(service("vpn", "VPN Monthly", 40.0));

    h.list_reply(ADMIN, "del:vpn").await;
    assert_matches!(
        h.flow_of(ADMIN).await,
        Some(Flow::DeleteService {
            step: DeleteStep::Confirm { .. }
        })
    );

    // A plain "confirm" is not enough
    h.text(ADMIN, "confirm").await;
    assert_eq!(h.catalog.count(), 1);
    assert_matches!(h.flow_of(ADMIN).await, Some(Flow::DeleteService { .. }));

    h.text(ADMIN, "Confirm Delete").await;

    assert_eq!(h.catalog.count(), 0);
    assert!(h.flow_of(ADMIN).await.is_none());
    assert!(h
        .messenger
        .texts_to(ADMIN)
        .iter()
        .any(|t| t.contains("deleted")));
}

#[tokio::test]
async fn broadcast_reports_success_and_failure_counts() {
    let h = harness();
    h.users.seed("8801711000001", 0.0);
    h.users.seed("8801711000002", 0.0);
    h.users.seed("8801711000003", 0.0);
    h.messenger.fail_for("8801711000002");

    h.list_reply(ADMIN, "admin_broadcast").await;
    assert_matches!(h.flow_of(ADMIN).await, Some(Flow::Broadcast));

    h.text(ADMIN, "Big weekend sale!").await;

    // Three seeded users plus the admin record created on first contact
    let texts = h.messenger.texts_to(ADMIN);
    assert!(texts
        .iter()
        .any(|t| t.contains("3 delivered, 1 failed out of 4")));
    assert!(h
        .messenger
        .texts_to("8801711000001")
        .iter()
        .any(|t| t == "Big weekend sale!"));
    assert!(h.messenger.texts_to("8801711000002").is_empty());
    assert!(h.flow_of(ADMIN).await.is_none());
}

#[tokio::test]
async fn empty_broadcast_text_reprompts() {
    let h = harness();

    h.list_reply(ADMIN, "admin_broadcast").await;
    h.text(ADMIN, "   ").await;

    assert_matches!(h.flow_of(ADMIN).await, Some(Flow::Broadcast));
    assert!(h
        .messenger
        .last_to(ADMIN)
        .unwrap()
        .contains("can't be empty"));
}
