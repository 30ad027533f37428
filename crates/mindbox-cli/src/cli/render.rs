//! # Rendering Module
//!
//! Turns library records into terminal strings. Nothing here prints; the
//! handlers in `commands.rs` do, which keeps every function testable.
//!
//! Layout math (widths, truncation, padding) is Unicode-aware via
//! `unicode-width`. Colors come from `colored`; box and keyword colors are
//! drawn as a truecolor swatch so the terminal shows the real theme color.
//!
//! ## Thought List Layout
//!
//! ```text
//! 00000000  Launch plan ························  WAITING      2 hours ago
//! └─ id ─┘  └─ title (fill, truncated) ──────┘  └ status ┘  └─ time ──┘
//! ```

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use mindbox::model::{BoxNode, Keyword, Thought, ThoughtStatus};
use mindbox::store::{CascadeReport, DoctorReport};
use std::collections::HashMap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use uuid::Uuid;

pub const LINE_WIDTH: usize = 100;
pub const ID_WIDTH: usize = 8;
pub const STATUS_WIDTH: usize = 12;
pub const TIME_WIDTH: usize = 14;
pub const SWATCH: &str = "●";

pub fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(ID_WIDTH).collect()
}

fn swatch(hex: &str) -> ColoredString {
    match hex_to_rgb(hex) {
        Some((r, g, b)) => SWATCH.truecolor(r, g, b),
        None => SWATCH.normal(),
    }
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn status_label(status: &ThoughtStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        ThoughtStatus::Active => text.green(),
        ThoughtStatus::Archived => text.dimmed(),
        ThoughtStatus::Custom(_) => text.yellow(),
    }
}

/// The whole box forest, children indented under parents, with thought counts.
pub fn box_tree(boxes: &[BoxNode], thoughts: &[Thought]) -> String {
    if boxes.is_empty() {
        return "No boxes yet. Create one with `mindbox box add`.".to_string();
    }

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for thought in thoughts {
        *counts.entry(thought.box_id).or_default() += 1;
    }
    let mut children: HashMap<Option<Uuid>, Vec<&BoxNode>> = HashMap::new();
    for node in boxes {
        children.entry(node.parent_box_id).or_default().push(node);
    }

    let mut lines = Vec::new();
    let mut stack: Vec<(&BoxNode, usize)> = children
        .get(&None)
        .map(|roots| roots.iter().rev().map(|b| (*b, 0)).collect())
        .unwrap_or_default();

    while let Some((node, depth)) = stack.pop() {
        let count = counts.get(&node.id).copied().unwrap_or(0);
        lines.push(format!(
            "{}{} {}  {}  {}",
            "  ".repeat(depth),
            swatch(node.color.hex()),
            short_id(node.id).dimmed(),
            node.name.bold(),
            format!("({})", count).dimmed()
        ));
        if let Some(kids) = children.get(&Some(node.id)) {
            for kid in kids.iter().rev() {
                stack.push((kid, depth + 1));
            }
        }
    }

    lines.join("\n")
}

pub fn thought_list(thoughts: &[Thought], now: DateTime<Utc>) -> String {
    if thoughts.is_empty() {
        return "No thoughts in this box.".to_string();
    }

    let fixed = ID_WIDTH + 2 + 2 + STATUS_WIDTH + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);

    thoughts
        .iter()
        .map(|t| {
            let title = truncate_to_width(&t.title, available);
            let padding = available.saturating_sub(title.width());
            let status = t.status.to_string();
            let status_pad = STATUS_WIDTH.saturating_sub(status.width());
            format!(
                "{}  {}{}  {}{}{}",
                short_id(t.id).dimmed(),
                title,
                " ".repeat(padding),
                status_label(&t.status),
                " ".repeat(status_pad),
                format_time_ago(t.update_date, now).dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full view: breadcrumb, title, keywords, body.
pub fn thought_detail(thought: &Thought, path: &[BoxNode], keywords: &[Keyword]) -> String {
    let crumbs: Vec<&str> = path.iter().map(|b| b.name.as_str()).collect();
    let mut out = vec![
        crumbs.join(" / ").dimmed().to_string(),
        format!(
            "{} {}  {}",
            short_id(thought.id).yellow(),
            thought.title.bold(),
            status_label(&thought.status)
        ),
    ];

    if !keywords.is_empty() {
        let tags: Vec<String> = keywords
            .iter()
            .map(|k| format!("{} {}", swatch(k.color.hex()), k.name))
            .collect();
        out.push(tags.join("  "));
    }

    out.push("--------------------------------".to_string());
    out.push(thought.formatted_body.clone());
    out.join("\n")
}

pub fn keyword_list(keywords: &[Keyword]) -> String {
    if keywords.is_empty() {
        return "No keywords found.".to_string();
    }
    keywords
        .iter()
        .map(|k| {
            let count = k.thought_ids.len();
            let noun = if count == 1 { "thought" } else { "thoughts" };
            format!(
                "{} {}  {}  {}",
                swatch(k.color.hex()),
                short_id(k.id).dimmed(),
                k.name.bold(),
                format!("{} {}", count, noun).dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn create_hint(candidate: &str) -> String {
    format!(
        "No keyword named '{}'. Create it with: mindbox keyword add \"{}\"",
        candidate, candidate
    )
    .dimmed()
    .to_string()
}

pub fn cascade_summary(report: &CascadeReport) -> String {
    let mut parts = Vec::new();
    if !report.removed_boxes.is_empty() {
        parts.push(plural(report.removed_boxes.len(), "box", "boxes"));
    }
    if !report.removed_thoughts.is_empty() {
        parts.push(plural(report.removed_thoughts.len(), "thought", "thoughts"));
    }
    if !report.removed_keywords.is_empty() {
        parts.push(plural(report.removed_keywords.len(), "keyword", "keywords"));
    }

    let mut line = if parts.is_empty() {
        "Nothing removed".to_string()
    } else {
        format!("Removed {}", parts.join(", "))
    };
    if !report.updated_keywords.is_empty() {
        line.push_str(&format!(
            "; untagged from {}",
            plural(report.updated_keywords.len(), "keyword", "keywords")
        ));
    }
    line.green().to_string()
}

pub fn doctor_summary(report: &DoctorReport) -> String {
    if report.is_clean() {
        return "All good: nothing to repair.".green().to_string();
    }
    let lines = [
        (report.reparented_boxes, "box(es) moved to the top level"),
        (report.removed_orphan_thoughts, "orphaned thought(s) removed"),
        (report.removed_dangling_refs, "dangling keyword reference(s) removed"),
        (report.collapsed_duplicate_refs, "duplicate keyword reference(s) collapsed"),
    ];
    lines
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, what)| format!("{} {}", n, what).yellow().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use mindbox::color::{BoxColor, Gold, KeywordColor};

    fn plain() {
        colored::control::set_override(false);
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn node(n: u128, name: &str, parent: Option<u128>) -> BoxNode {
        let mut b = BoxNode::new(Uuid::from_u128(n), at(), parent.map(Uuid::from_u128));
        b.name = name.to_string();
        b
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#5F0F40"), Some((0x5f, 0x0f, 0x40)));
        assert_eq!(hex_to_rgb("5F0F40"), None);
        assert_eq!(hex_to_rgb("#5F0F"), None);
    }

    #[test]
    fn test_tree_indents_children_under_parents() {
        plain();
        let mut gold = node(3, "Gold", None);
        gold.color = BoxColor::Gold(Gold::AgateBrown);
        let boxes = vec![node(1, "Work", None), node(2, "Launch", Some(1)), gold];
        let thoughts = vec![Thought::new(Uuid::from_u128(10), Uuid::from_u128(2), at())];

        let out = box_tree(&boxes, &thoughts);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(SWATCH) && lines[0].contains("Work"));
        assert!(lines[1].starts_with("  ") && lines[1].contains("Launch  (1)"));
        assert!(lines[2].contains("Gold  (0)"));
    }

    #[test]
    fn test_empty_tree_has_a_hint() {
        assert!(box_tree(&[], &[]).contains("mindbox box add"));
    }

    #[test]
    fn test_thought_list_columns() {
        plain();
        let mut t = Thought::new(Uuid::from_u128(10), Uuid::from_u128(1), at());
        t.title = "Groceries".to_string();
        t.status = ThoughtStatus::Archived;

        let out = thought_list(&[t], at() + Duration::hours(2));
        assert!(out.starts_with("00000000  Groceries"));
        assert!(out.contains("ARCHIVED"));
        assert!(out.ends_with("2 hours ago"));
        assert_eq!(out.width(), LINE_WIDTH);
    }

    #[test]
    fn test_thought_detail_shows_path_and_keywords() {
        plain();
        let path = vec![node(1, "Work", None), node(2, "Launch", Some(1))];
        let mut t = Thought::new(Uuid::from_u128(10), Uuid::from_u128(2), at());
        t.set_formatted_body("**ship** it");
        let k = Keyword::new(Uuid::from_u128(20), "urgent".into(), KeywordColor::SunsetCoral);

        let out = thought_detail(&t, &path, &[k]);
        assert!(out.starts_with("Work / Launch"));
        assert!(out.contains("urgent"));
        assert!(out.ends_with("**ship** it"));
    }

    #[test]
    fn test_keyword_list_counts() {
        plain();
        let mut k = Keyword::new(Uuid::from_u128(20), "work".into(), KeywordColor::default());
        k.thought_ids.push(Uuid::from_u128(10));
        let out = keyword_list(&[k]);
        assert!(out.contains("work"));
        assert!(out.contains("1 thought"));
        assert!(!out.contains("1 thoughts"));
    }

    #[test]
    fn test_cascade_summary() {
        plain();
        let report = CascadeReport {
            removed_boxes: vec![Uuid::from_u128(2), Uuid::from_u128(1)],
            removed_thoughts: vec![Uuid::from_u128(10)],
            removed_keywords: vec![],
            updated_keywords: vec![Uuid::from_u128(20)],
        };
        assert_eq!(
            cascade_summary(&report),
            "Removed 2 boxes, 1 thought; untagged from 1 keyword"
        );
        assert_eq!(cascade_summary(&CascadeReport::default()), "Nothing removed");
    }

    #[test]
    fn test_doctor_summary() {
        plain();
        assert!(doctor_summary(&DoctorReport::default()).starts_with("All good"));
        let report = DoctorReport {
            removed_orphan_thoughts: 2,
            ..Default::default()
        };
        assert_eq!(doctor_summary(&report), "2 orphaned thought(s) removed");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a longer title", 8), "a longe…");
        assert_eq!(truncate_to_width("日本語のタイトル", 7).width(), 7);
    }
}
