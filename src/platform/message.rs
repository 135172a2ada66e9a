//! Outbound message shapes
//!
//! The three shapes the engine produces, with the platform's size limits.
//! Oversized fields are truncated silently, never rejected; every rich shape
//! knows how to render itself as plain text for the delivery-degrade path.

use serde::{Deserialize, Serialize};

use crate::utils::helpers::truncate_chars;

/// Platform size limits
pub const MAX_BODY_LEN: usize = 1024;
pub const MAX_HEADER_LEN: usize = 60;
pub const MAX_BUTTONS: usize = 3;
pub const MAX_BUTTON_TITLE_LEN: usize = 20;
pub const MAX_LIST_ROWS: usize = 10;
pub const MAX_ROW_TITLE_LEN: usize = 24;
pub const MAX_ROW_DESCRIPTION_LEN: usize = 72;
pub const MAX_SECTION_TITLE_LEN: usize = 24;
pub const MAX_LIST_BUTTON_LEN: usize = 20;

/// A message the engine hands to the presentation adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutboundMessage {
    Text(String),
    Buttons(ButtonMenu),
    List(ListMenu),
}

/// Button-menu shape: up to three reply buttons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonMenu {
    pub header: Option<String>,
    pub body: String,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub title: String,
}

/// List-menu shape: sections of selectable rows behind one button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMenu {
    pub header: Option<String>,
    pub body: String,
    pub button_text: String,
    pub sections: Vec<ListSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

impl OutboundMessage {
    pub fn text(body: impl Into<String>) -> Self {
        OutboundMessage::Text(body.into())
    }

    /// Clamp every field to the platform limits
    pub fn sanitize(self) -> Self {
        match self {
            OutboundMessage::Text(body) => {
                OutboundMessage::Text(truncate_chars(&body, MAX_BODY_LEN))
            }
            OutboundMessage::Buttons(menu) => OutboundMessage::Buttons(menu.sanitize()),
            OutboundMessage::List(menu) => OutboundMessage::List(menu.sanitize()),
        }
    }

    /// Equivalent plain-text rendering used when a rich send fails
    pub fn to_text_fallback(&self) -> String {
        match self {
            OutboundMessage::Text(body) => body.clone(),
            OutboundMessage::Buttons(menu) => menu.to_text_fallback(),
            OutboundMessage::List(menu) => menu.to_text_fallback(),
        }
    }
}

impl ButtonMenu {
    fn sanitize(mut self) -> Self {
        self.header = self.header.map(|h| truncate_chars(&h, MAX_HEADER_LEN));
        self.body = truncate_chars(&self.body, MAX_BODY_LEN);
        self.buttons.truncate(MAX_BUTTONS);
        for button in &mut self.buttons {
            button.title = truncate_chars(&button.title, MAX_BUTTON_TITLE_LEN);
        }
        self
    }

    fn to_text_fallback(&self) -> String {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(header);
            out.push_str("\n\n");
        }
        out.push_str(&self.body);
        out.push_str("\n\nReply \"cancel\" to cancel.");
        out
    }
}

impl ListMenu {
    fn sanitize(mut self) -> Self {
        self.header = self.header.map(|h| truncate_chars(&h, MAX_HEADER_LEN));
        self.body = truncate_chars(&self.body, MAX_BODY_LEN);
        self.button_text = truncate_chars(&self.button_text, MAX_LIST_BUTTON_LEN);

        let mut remaining = MAX_LIST_ROWS;
        for section in &mut self.sections {
            section.title = truncate_chars(&section.title, MAX_SECTION_TITLE_LEN);
            section.rows.truncate(remaining);
            remaining -= section.rows.len();
            for row in &mut section.rows {
                row.title = truncate_chars(&row.title, MAX_ROW_TITLE_LEN);
                row.description = row
                    .description
                    .as_ref()
                    .map(|d| truncate_chars(d, MAX_ROW_DESCRIPTION_LEN));
            }
        }
        self.sections.retain(|s| !s.rows.is_empty());
        self
    }

    fn to_text_fallback(&self) -> String {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(header);
            out.push_str("\n\n");
        }
        out.push_str(&self.body);
        let mut index = 1;
        for section in &self.sections {
            out.push_str("\n\n");
            out.push_str(&section.title);
            for row in &section.rows {
                out.push_str(&format!("\n{}. {}", index, row.title));
                if let Some(description) = &row.description {
                    out.push_str(&format!(" - {}", description));
                }
                index += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_body_truncated() {
        let long = "x".repeat(2000);
        let OutboundMessage::Text(body) = OutboundMessage::text(long).sanitize() else {
            panic!("expected text");
        };
        assert_eq!(body.chars().count(), MAX_BODY_LEN);
    }

    #[test]
    fn test_button_menu_clamped() {
        let menu = ButtonMenu {
            header: Some("h".repeat(100)),
            body: "body".to_string(),
            buttons: (0..5)
                .map(|i| Button {
                    id: format!("b{}", i),
                    title: "t".repeat(40),
                })
                .collect(),
        };

        let OutboundMessage::Buttons(sanitized) = OutboundMessage::Buttons(menu).sanitize() else {
            panic!("expected buttons");
        };
        assert_eq!(sanitized.buttons.len(), MAX_BUTTONS);
        assert_eq!(sanitized.header.unwrap().chars().count(), MAX_HEADER_LEN);
        for button in &sanitized.buttons {
            assert_eq!(button.title.chars().count(), MAX_BUTTON_TITLE_LEN);
        }
    }

    #[test]
    fn test_list_rows_capped_across_sections() {
        let section = |n: usize| ListSection {
            title: "section".to_string(),
            rows: (0..n)
                .map(|i| ListRow {
                    id: format!("r{}", i),
                    title: "row".to_string(),
                    description: None,
                })
                .collect(),
        };
        let menu = ListMenu {
            header: None,
            body: "body".to_string(),
            button_text: "Open".to_string(),
            sections: vec![section(7), section(7)],
        };

        let OutboundMessage::List(sanitized) = OutboundMessage::List(menu).sanitize() else {
            panic!("expected list");
        };
        let total: usize = sanitized.sections.iter().map(|s| s.rows.len()).sum();
        assert_eq!(total, MAX_LIST_ROWS);
    }

    #[test]
    fn test_list_fallback_numbers_options() {
        let menu = ListMenu {
            header: None,
            body: "Pick one".to_string(),
            button_text: "Open".to_string(),
            sections: vec![ListSection {
                title: "Services".to_string(),
                rows: vec![
                    ListRow {
                        id: "a".to_string(),
                        title: "Alpha".to_string(),
                        description: Some("first".to_string()),
                    },
                    ListRow {
                        id: "b".to_string(),
                        title: "Beta".to_string(),
                        description: None,
                    },
                ],
            }],
        };

        let text = OutboundMessage::List(menu).to_text_fallback();
        assert!(text.contains("1. Alpha - first"));
        assert!(text.contains("2. Beta"));
    }

    #[test]
    fn test_button_fallback_mentions_cancel() {
        let menu = ButtonMenu {
            header: None,
            body: "Are you sure?".to_string(),
            buttons: vec![Button {
                id: "cancel".to_string(),
                title: "Cancel".to_string(),
            }],
        };
        let text = OutboundMessage::Buttons(menu).to_text_fallback();
        assert!(text.contains("cancel"));
    }
}
