//! Heuristic formatter for plain-text fields.
//!
//! Simpler loaders (service highlights, career requirements, achievement
//! panels) store newline-delimited text rather than rich-editor content.
//! Blank lines split the text into groups; a group whose every line leads
//! with a list marker renders as a checklist or card grid, anything else
//! as paragraphs. The marker pattern is pluggable so the heuristic can be
//! tuned without touching the renderer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::render::types::BlockStyle;

use super::convert::escape_text;
use super::rewrite::PARAGRAPH_STYLE;

const CHECKLIST_STYLE: &str = "list-style:none; margin:0 0 1rem; padding:0";
const CHECKLIST_ITEM_STYLE: &str = "display:flex; gap:0.5rem; margin:0.4rem 0";
const CARD_GRID_STYLE: &str =
    "display:grid; grid-template-columns:repeat(auto-fit,minmax(240px,1fr)); gap:1rem; margin:0 0 1rem";
const CARD_STYLE: &str =
    "padding:1rem; border:1px solid #e5e7eb; border-radius:8px; background:#ffffff";

static DEFAULT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\d+[.)]|[•*-])\s+").expect("marker pattern is valid"));

/// Decides whether a line is a list entry and strips its leading marker.
#[derive(Debug, Clone)]
pub struct ListPredicate {
    pattern: Regex,
}

impl Default for ListPredicate {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_MARKER.clone(),
        }
    }
}

impl ListPredicate {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// The line's text with the leading marker removed.
    pub fn strip<'a>(&self, line: &'a str) -> &'a str {
        match self.pattern.find(line) {
            Some(found) if found.start() == 0 => line[found.end()..].trim(),
            _ => line.trim(),
        }
    }
}

/// Render newline-delimited plain text as HTML blocks.
pub fn format_blocks(text: &str, style: BlockStyle, predicate: &ListPredicate) -> String {
    let mut out = String::new();

    for group in split_groups(text) {
        if group.iter().all(|line| predicate.matches(line)) {
            let entries = group.iter().map(|line| predicate.strip(line));
            match style {
                BlockStyle::Checklist => render_checklist(&mut out, entries),
                BlockStyle::Cards => render_cards(&mut out, entries),
            }
        } else {
            out.push_str(&format!(
                "<p style=\"{PARAGRAPH_STYLE}\">{}</p>",
                escape_text(&group.join(" ")),
            ));
        }
    }

    out
}

fn split_groups(text: &str) -> Vec<Vec<&str>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

fn render_checklist<'a>(out: &mut String, entries: impl Iterator<Item = &'a str>) {
    out.push_str(&format!("<ul data-role=\"checklist\" style=\"{CHECKLIST_STYLE}\">"));
    for entry in entries {
        out.push_str(&format!(
            "<li style=\"{CHECKLIST_ITEM_STYLE}\"><span data-role=\"check-icon\" aria-hidden=\"true\">\u{2713}</span><span>{}</span></li>",
            escape_text(entry),
        ));
    }
    out.push_str("</ul>");
}

fn render_cards<'a>(out: &mut String, entries: impl Iterator<Item = &'a str>) {
    out.push_str(&format!("<div data-role=\"card-grid\" style=\"{CARD_GRID_STYLE}\">"));
    for entry in entries {
        out.push_str(&format!(
            "<div data-role=\"card\" style=\"{CARD_STYLE}\">{}</div>",
            escape_text(entry),
        ));
    }
    out.push_str("</div>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_markers_are_stripped() {
        let html = format_blocks("1. First\n2. Second", BlockStyle::Checklist, &ListPredicate::default());
        assert!(html.contains("<span>First</span>"));
        assert!(html.contains("<span>Second</span>"));
        assert!(!html.contains("1."));
    }

    #[test]
    fn bullet_and_paren_markers_match() {
        let predicate = ListPredicate::default();
        for line in ["- dash", "* star", "• bullet", "3) paren"] {
            assert!(predicate.matches(line), "expected match for {line:?}");
        }
        assert_eq!(predicate.strip("• bullet"), "bullet");
    }

    #[test]
    fn mixed_group_renders_as_paragraph() {
        let html = format_blocks(
            "intro text\n- not every line matches",
            BlockStyle::Checklist,
            &ListPredicate::default(),
        );
        assert!(html.starts_with("<p"));
        assert!(!html.contains("checklist"));
    }

    #[test]
    fn blank_lines_split_groups() {
        let html = format_blocks(
            "Plain paragraph.\n\n- one\n- two",
            BlockStyle::Cards,
            &ListPredicate::default(),
        );
        assert!(html.contains("<p"));
        assert_eq!(html.matches("data-role=\"card\"").count(), 2);
    }

    #[test]
    fn entry_text_is_escaped() {
        let html = format_blocks("- a <b> & c", BlockStyle::Cards, &ListPredicate::default());
        assert!(html.contains("a &lt;b&gt; &amp; c"));
    }

    #[test]
    fn custom_predicate_overrides_default() {
        let predicate = ListPredicate::new(Regex::new(r"^>>\s*").expect("pattern"));
        let html = format_blocks(">> custom", BlockStyle::Checklist, &predicate);
        assert!(html.contains("<span>custom</span>"));
    }
}
