//! # Domain Model: Boxes, Thoughts and Keywords
//!
//! Three record types make up the whole data model:
//!
//! - [`BoxNode`]: a foldable container. Boxes form a forest through
//!   `parent_box_id` (`None` = top level) and never contain cycles.
//! - [`Thought`]: a note that belongs to exactly one box.
//! - [`Keyword`]: a tag holding an ordered list of thought ids. The
//!   keyword↔thought relation is stored only on the keyword side; the reverse
//!   direction is computed by scanning.
//!
//! ## On-disk Field Names
//!
//! Field names are camelCase and are part of the file format:
//!
//! ```text
//! Box:     id, name, updateDate, parentBoxId, color, expanded
//! Thought: id, boxId, title, body, formattedBody, updateDate, status
//! Keyword: id, name, color, thoughtIds
//! ```
//!
//! `expanded` and `formattedBody` are optional when reading, so files written
//! before those fields existed still load.
//!
//! ## Name Normalization
//!
//! Renaming a box or thought to an empty (or whitespace-only) string is not an
//! error: the stored name falls back to [`DEFAULT_BOX_NAME`] /
//! [`DEFAULT_THOUGHT_TITLE`]. Keyword names have no fallback; an empty keyword
//! name is rejected by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::color::{BoxColor, KeywordColor};
use crate::text::plain_text;

pub const DEFAULT_BOX_NAME: &str = "New Box";
pub const DEFAULT_THOUGHT_TITLE: &str = "New Thought";
pub const DEFAULT_THOUGHT_BODY: &str = "Handle your thought";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxNode {
    pub id: Uuid,
    pub name: String,
    pub update_date: DateTime<Utc>,
    pub parent_box_id: Option<Uuid>,
    pub color: BoxColor,
    /// UI fold state; persisted but carries no meaning for the store.
    #[serde(default)]
    pub expanded: bool,
}

impl BoxNode {
    pub fn new(id: Uuid, update_date: DateTime<Utc>, parent_box_id: Option<Uuid>) -> Self {
        Self {
            id,
            name: DEFAULT_BOX_NAME.to_string(),
            update_date,
            parent_box_id,
            color: BoxColor::default(),
            expanded: false,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_box_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtStatus {
    Active,
    Archived,
    Custom(String),
}

impl Default for ThoughtStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl ThoughtStatus {
    /// An empty custom label means "no custom status".
    pub fn normalized(self) -> Self {
        match self {
            ThoughtStatus::Custom(label) if label.trim().is_empty() => ThoughtStatus::Active,
            ThoughtStatus::Custom(label) => ThoughtStatus::Custom(label.trim().to_string()),
            other => other,
        }
    }

    /// Parses user input: `active`, `archived`, anything else is a custom label.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("active") {
            ThoughtStatus::Active
        } else if trimmed.eq_ignore_ascii_case("archived") {
            ThoughtStatus::Archived
        } else {
            ThoughtStatus::Custom(trimmed.to_string()).normalized()
        }
    }
}

impl fmt::Display for ThoughtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThoughtStatus::Active => write!(f, "ACTIVE"),
            ThoughtStatus::Archived => write!(f, "ARCHIVED"),
            ThoughtStatus::Custom(label) => write!(f, "{}", label.to_uppercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub id: Uuid,
    pub box_id: Uuid,
    pub title: String,
    /// Plain-text projection of `formatted_body`. Never written directly.
    pub body: String,
    #[serde(default)]
    pub formatted_body: String,
    pub update_date: DateTime<Utc>,
    #[serde(default)]
    pub status: ThoughtStatus,
}

impl Thought {
    pub fn new(id: Uuid, box_id: Uuid, update_date: DateTime<Utc>) -> Self {
        let mut thought = Self {
            id,
            box_id,
            title: DEFAULT_THOUGHT_TITLE.to_string(),
            body: String::new(),
            formatted_body: String::new(),
            update_date,
            status: ThoughtStatus::Active,
        };
        thought.set_formatted_body(DEFAULT_THOUGHT_BODY);
        thought
    }

    /// Replaces the rich body and recomputes the plain-text projection.
    pub fn set_formatted_body(&mut self, formatted: &str) {
        self.formatted_body = formatted.to_string();
        self.body = plain_text(formatted);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: Uuid,
    pub name: String,
    pub color: KeywordColor,
    #[serde(default)]
    pub thought_ids: Vec<Uuid>,
}

impl Keyword {
    pub fn new(id: Uuid, name: String, color: KeywordColor) -> Self {
        Self {
            id,
            name,
            color,
            thought_ids: Vec::new(),
        }
    }

    pub fn tags(&self, thought_id: Uuid) -> bool {
        self.thought_ids.contains(&thought_id)
    }
}

/// Applies the empty-name fallback used for box names and thought titles.
///
/// A blank name takes the fallback; anything else is stored exactly as typed.
pub fn normalize_name(input: &str, fallback: &str) -> String {
    if input.trim().is_empty() {
        fallback.to_string()
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Gold;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 30, 0).unwrap()
    }

    #[test]
    fn new_box_uses_defaults() {
        let b = BoxNode::new(Uuid::from_u128(1), at(), None);
        assert_eq!(b.name, "New Box");
        assert_eq!(b.color.hex(), "#EADFB4");
        assert!(b.is_top_level());
        assert!(!b.expanded);
    }

    #[test]
    fn new_thought_projects_default_body() {
        let t = Thought::new(Uuid::from_u128(10), Uuid::from_u128(1), at());
        assert_eq!(t.title, "New Thought");
        assert_eq!(t.formatted_body, "Handle your thought");
        assert_eq!(t.body, "Handle your thought");
        assert_eq!(t.status, ThoughtStatus::Active);
    }

    #[test]
    fn body_tracks_formatted_body() {
        let mut t = Thought::new(Uuid::from_u128(10), Uuid::from_u128(1), at());
        t.set_formatted_body("## Plan\n\n*ship* it");
        assert_eq!(t.body, "Plan\nship it");
    }

    #[test]
    fn box_json_uses_camel_case_fields() {
        let mut b = BoxNode::new(Uuid::from_u128(2), at(), Some(Uuid::from_u128(1)));
        b.color = BoxColor::Gold(Gold::MidnightDream);
        let value = serde_json::to_value(&b).unwrap();
        assert_eq!(value["parentBoxId"], Uuid::from_u128(1).to_string());
        assert_eq!(value["color"], "#5F0F40");
        assert!(value.get("updateDate").is_some());
        assert!(value.get("parent_box_id").is_none());
    }

    #[test]
    fn box_without_expanded_field_still_loads() {
        let json = format!(
            r##"{{"id":"{}","name":"Inbox","updateDate":"2024-05-20T09:30:00Z","parentBoxId":null,"color":"#9BB0C1"}}"##,
            Uuid::from_u128(3)
        );
        let b: BoxNode = serde_json::from_str(&json).unwrap();
        assert_eq!(b.name, "Inbox");
        assert!(!b.expanded);
    }

    #[test]
    fn status_serialization() {
        assert_eq!(
            serde_json::to_string(&ThoughtStatus::Archived).unwrap(),
            "\"archived\""
        );
        assert_eq!(
            serde_json::to_string(&ThoughtStatus::Custom("draft".into())).unwrap(),
            r#"{"custom":"draft"}"#
        );
    }

    #[test]
    fn status_parse_and_display() {
        assert_eq!(ThoughtStatus::parse("Archived"), ThoughtStatus::Archived);
        assert_eq!(ThoughtStatus::parse("  "), ThoughtStatus::Active);
        let custom = ThoughtStatus::parse("waiting");
        assert_eq!(custom, ThoughtStatus::Custom("waiting".into()));
        assert_eq!(custom.to_string(), "WAITING");
    }

    #[test]
    fn normalize_name_falls_back_on_blank() {
        assert_eq!(normalize_name("", DEFAULT_BOX_NAME), "New Box");
        assert_eq!(normalize_name("   ", DEFAULT_THOUGHT_TITLE), "New Thought");
        assert_eq!(normalize_name(" Work ", DEFAULT_BOX_NAME), " Work ");
        assert_eq!(normalize_name("Launch plan", DEFAULT_THOUGHT_TITLE), "Launch plan");
    }
}
