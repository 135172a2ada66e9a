//! Service catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A purchasable digital service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    /// Slug id derived from the name
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Post-purchase delivery instructions shown to the buyer
    pub instructions: Option<String>,
    pub active: bool,
    /// Extra inputs collected from the buyer at order time
    pub fields: Json<Vec<ServiceField>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One custom input field attached to a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceField {
    /// Machine name: lower-cased, whitespace replaced by underscores
    pub name: String,
    /// Human-readable prompt label
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Choices for `select` fields, empty otherwise
    #[serde(default)]
    pub options: Vec<String>,
}

/// Input kind of a service field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    File,
}

impl FieldKind {
    /// Parse a user-supplied kind name
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "text" => Some(FieldKind::Text),
            "number" => Some(FieldKind::Number),
            "select" => Some(FieldKind::Select),
            "file" => Some(FieldKind::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Select => "select",
            FieldKind::File => "file",
        }
    }
}

/// Draft accumulated by the add-service wizard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub instructions: Option<String>,
}

/// New service record ready for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub instructions: Option<String>,
    pub active: bool,
}

/// A single-field patch applied by the edit wizard
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEdit {
    Name(String),
    Description(String),
    Price(f64),
    Instructions(Option<String>),
    Active(bool),
    Fields(Vec<ServiceField>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_parse() {
        assert_eq!(FieldKind::parse("text"), Some(FieldKind::Text));
        assert_eq!(FieldKind::parse(" Select "), Some(FieldKind::Select));
        assert_eq!(FieldKind::parse("NUMBER"), Some(FieldKind::Number));
        assert_eq!(FieldKind::parse("image"), None);
    }

    #[test]
    fn test_service_field_serde_shape() {
        let field = ServiceField {
            name: "account_email".to_string(),
            label: "Account Email".to_string(),
            kind: FieldKind::Text,
            options: vec![],
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "text");
    }
}
