//! End-to-end rendering pipeline behavior over the public API.
#![deny(clippy::all, clippy::pedantic)]

use girder::application::render::{
    BlockStyle, ContentRenderer, ListPredicate, convert_document, format_blocks,
};
use girder::domain::content::{ContentField, parse_content_field};

fn renderer() -> ContentRenderer {
    ContentRenderer::without_math()
}

#[test]
fn op_log_content_renders_styled_list_with_correct_boundaries() {
    let raw = r#"{"ops":[
        {"insert":"a","attributes":{"list":"bullet"}},
        {"insert":"b","attributes":{"list":"bullet"}},
        {"insert":"c"}
    ]}"#;
    let rendered = renderer().render(raw);

    assert_eq!(rendered.html.matches("<ul").count(), 1);
    assert_eq!(rendered.html.matches("<li").count(), 2);
    let after_list = rendered.html.split("</ul>").nth(1).expect("tail");
    assert!(after_list.contains('c'));
}

#[test]
fn escaping_survives_the_whole_pipeline() {
    let raw = r#"{"ops":[{"insert":"<script>alert('x')</script> & more"}]}"#;
    let rendered = renderer().render(raw);
    assert!(!rendered.html.contains("<script"));
    assert!(rendered.html.contains("&lt;script&gt;"));
    assert!(rendered.html.contains("&amp; more"));
}

#[test]
fn header_clamp_holds_end_to_end() {
    let rendered = renderer().render(r#"{"ops":[{"insert":"x","attributes":{"header":9}}]}"#);
    assert!(rendered.html.contains("<h6"));
    assert!(!rendered.html.contains("<h9"));
}

#[test]
fn fixed_table_gets_styled_cells_and_one_wrapper() {
    let raw = "<table>\
        <thead><tr><th>Name</th><th>Role</th></tr></thead>\
        <tbody><tr><td>Ada</td><td>Engineer</td></tr><tr><td>Sam</td><td>Foreman</td></tr></tbody>\
        </table>";
    let rendered = renderer().render(raw);

    assert_eq!(rendered.html.matches("data-role=\"table-scroll\"").count(), 1);
    assert_eq!(rendered.html.matches("<th style=").count(), 2);
    assert_eq!(rendered.html.matches("<td style=").count(), 4);
    assert!(!rendered.html.contains("<th>"));
    assert!(!rendered.html.contains("<td>"));
    assert_eq!(rendered.metrics.tables_count, 1);
}

#[test]
fn render_is_idempotent() {
    let raw = r#"{"ops":[
        {"insert":"Heading","attributes":{"header":2}},
        {"insert":"Body text with a "},
        {"insert":"link","attributes":{"link":"https://example.com"}},
        {"insert":"."}
    ]}"#;
    let renderer = renderer();
    let first = renderer.render(raw);
    let second = renderer.render(&first.html);
    assert_eq!(first.html, second.html);
}

#[test]
fn bad_json_falls_back_to_escaped_text() {
    let rendered = renderer().render("{not valid json");
    assert!(rendered.html.contains("{not valid json"));
}

#[test]
fn formula_marker_is_typeset_when_math_is_available() {
    let raw = r#"{"ops":[{"insert":{"formula":"c^2 = a^2 + b^2"}}]}"#;
    let rendered = ContentRenderer::new().render(raw);
    assert!(rendered.html.contains("katex"));
    assert_eq!(rendered.metrics.formulas_count, 1);
}

#[test]
fn formula_marker_keeps_fallback_without_math() {
    let raw = r#"{"ops":[{"insert":{"formula":"c^2"}}]}"#;
    let rendered = renderer().render(raw);
    assert!(rendered.html.contains("data-role=\"content-formula\""));
    assert!(rendered.html.contains("c^2"));
    assert!(!rendered.html.contains("katex"));
}

#[test]
fn content_field_classification_is_explicit() {
    assert!(matches!(
        parse_content_field(r#"{"ops":[{"insert":"a"}]}"#),
        ContentField::Ops(_)
    ));
    assert!(matches!(
        parse_content_field("<p>b</p>"),
        ContentField::Html(_)
    ));
    assert!(matches!(parse_content_field(""), ContentField::Empty));
}

#[test]
fn converter_is_reachable_standalone() {
    let doc = serde_json::from_str(r#"{"ops":[{"insert":"solo"}]}"#).expect("ops");
    assert_eq!(convert_document(&doc), "<p>solo</p>");
}

#[test]
fn heuristic_formatter_strips_markers() {
    let html = format_blocks(
        "1. First\n2. Second",
        BlockStyle::Checklist,
        &ListPredicate::default(),
    );
    assert!(html.contains("<span>First</span>"));
    assert!(html.contains("<span>Second</span>"));
}

#[test]
fn external_links_open_in_new_context() {
    let rendered = renderer().render("<p><a href=\"https://example.com\">out</a></p>");
    assert!(rendered.html.contains("target=\"_blank\""));
    assert!(rendered.html.contains("noopener"));
    assert_eq!(rendered.metrics.external_links_count, 1);
}

#[test]
fn reading_time_reflects_word_count() {
    let body = "word ".repeat(500);
    let rendered = renderer().render(&format!("<p>{body}</p>"));
    assert_eq!(rendered.metrics.word_count, 500);
    assert_eq!(rendered.metrics.reading_time_minutes, 3);
}
