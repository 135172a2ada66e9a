//! Typed dialog flows
//!
//! Every multi-step dialog a user can be in is a variant of [`Flow`], each
//! carrying its own typed sub-state and draft data. Handlers return the whole
//! next state, so a transition can never silently drop sibling fields the way
//! a keyed-bag merge can.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::service::{FieldKind, ServiceDraft};

/// The active multi-step dialog of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum Flow {
    /// Awaiting the external payment transaction id
    Recharge,
    /// Service chosen, awaiting the explicit "confirm" keyword
    ServiceOrder { service_id: String, price: f64 },
    /// Admin add-service wizard
    AddService {
        step: AddServiceStep,
        draft: ServiceDraft,
    },
    /// Admin edit-service wizard, including the field-management sub-wizard
    EditService { step: EditStep },
    /// Admin delete-service confirmation
    DeleteService { step: DeleteStep },
    /// Awaiting the broadcast message text
    Broadcast,
}

/// Steps of the add-service wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddServiceStep {
    Name,
    Description,
    Price,
    Instructions,
    Confirm,
}

/// Steps of the edit-service wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum EditStep {
    /// Awaiting a numbered service selection
    SelectService,
    /// Awaiting an edit-option selection for the chosen service
    SelectOption { service_id: String },
    /// Awaiting the single replacement value for one field
    EditValue {
        service_id: String,
        field: EditField,
    },
    /// Field-management sub-wizard menu
    FieldMenu { service_id: String },
    /// Field-add sub-wizard
    FieldAdd {
        service_id: String,
        step: FieldAddStep,
        draft: FieldDraft,
    },
    /// Awaiting a field selection to edit (acknowledged, not implemented)
    FieldEditSelect { service_id: String },
    /// Awaiting a 1-based field index to delete
    FieldDeleteSelect { service_id: String },
}

/// Which single service attribute an EditValue step patches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    Name,
    Description,
    Price,
    Instructions,
}

/// Steps of the field-add sub-wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAddStep {
    Name,
    Label,
    Kind,
    Options,
    Confirm,
}

/// Draft accumulated by the field-add sub-wizard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDraft {
    pub name: Option<String>,
    pub label: Option<String>,
    pub kind: Option<FieldKind>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Steps of the delete-service flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum DeleteStep {
    SelectService,
    /// Awaiting the exact phrase "confirm delete"
    Confirm { service_id: String },
}

impl Flow {
    /// Flow name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Flow::Recharge => "recharge",
            Flow::ServiceOrder { .. } => "service_order",
            Flow::AddService { .. } => "add_service",
            Flow::EditService { .. } => "edit_service",
            Flow::DeleteService { .. } => "delete_service",
            Flow::Broadcast => "broadcast",
        }
    }

    /// Whether an interactive list reply is meaningful mid-flow.
    ///
    /// Everywhere else a list reply is treated as fresh navigation: the
    /// dialog state is cleared before the selection is routed.
    pub fn accepts_list_replies(&self) -> bool {
        matches!(
            self,
            Flow::EditService {
                step: EditStep::SelectOption { .. }
                    | EditStep::FieldMenu { .. }
                    | EditStep::FieldAdd {
                        step: FieldAddStep::Kind,
                        ..
                    }
            }
        )
    }
}

/// The persisted dialog record: one per user, replaced wholesale at each
/// transition, deleted on completion, cancellation or error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogState {
    /// Normalized phone identity
    pub user_id: String,
    pub flow: Flow,
    pub updated_at: DateTime<Utc>,
    /// Abandoned flows expire rather than occupying a record forever
    pub expires_at: DateTime<Utc>,
}

impl DialogState {
    /// Start a dialog in the given flow with a TTL in seconds
    pub fn new(user_id: &str, flow: Flow, ttl_seconds: u64) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            flow,
            updated_at: now,
            expires_at: now + Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Replace the flow state, refreshing the update timestamp and keeping
    /// the original expiry window
    pub fn advance(&self, flow: Flow) -> Self {
        Self {
            user_id: self.user_id.clone(),
            flow,
            updated_at: Utc::now(),
            expires_at: self.expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
