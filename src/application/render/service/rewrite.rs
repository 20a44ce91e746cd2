//! Presentation pass over sanitized HTML.
//!
//! One streaming rewrite applies every per-element treatment: KaTeX
//! typesetting of formula marker spans, responsive table wrapping with
//! header/body cell styling and row striping, the non-destructive inline
//! styling overlay, external-link hardening, and metric accumulation.
//! Inline styles are only written to elements that carry none, so running
//! the pass over already-processed HTML changes nothing.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use lol_html::{
    HandlerResult, RewriteStrSettings, element,
    html_content::{ContentType, Element},
    rewrite_str, text,
};
use tracing::warn;

use crate::application::render::types::{ContentMetrics, RenderError};

use super::math::MathRenderer;

const HEADING_COLOR: &str = "#1f2937";
pub(crate) const PARAGRAPH_STYLE: &str = "margin:0 0 1rem; line-height:1.7";
const QUOTE_STYLE: &str =
    "margin:1rem 0; padding:0.5rem 1rem; border-left:4px solid #f59e0b; background:#fffbeb";
const PRE_STYLE: &str =
    "background:#1f2937; color:#f9fafb; padding:1rem; border-radius:6px; overflow-x:auto; margin:1rem 0";
const PRE_CODE_STYLE: &str = "background:transparent; padding:0; color:inherit";
const CODE_STYLE: &str = "background:#f3f4f6; padding:0.15rem 0.4rem; border-radius:4px; font-size:0.95em";
const LIST_STYLE: &str = "margin:0 0 1rem; padding-left:1.5rem";
const LIST_ITEM_STYLE: &str = "margin:0.25rem 0";
const IMAGE_STYLE: &str = "max-width:100%; height:auto; display:block; margin:1rem 0";
const TABLE_STYLE: &str = "width:100%; border-collapse:collapse; margin:1rem 0";
const TH_STYLE: &str =
    "padding:0.6rem 0.75rem; border:1px solid #e5e7eb; background:#1f2937; color:#f9fafb; text-align:left";
const TD_STYLE: &str = "padding:0.6rem 0.75rem; border:1px solid #e5e7eb";
const STRIPE_STYLE: &str = "background:#f9fafb";
const TABLE_WRAPPER_OPEN: &str =
    "<div data-role=\"table-scroll\" style=\"overflow-x:auto; -webkit-overflow-scrolling:touch\">";
const WORDS_PER_MINUTE: f32 = 225.0;

pub(crate) struct RewriteOutcome {
    pub(crate) html: String,
    pub(crate) metrics: ContentMetrics,
}

#[derive(Default, Clone)]
struct RewriteState {
    images: u32,
    tables: u32,
    formulas: u32,
    external_links: u32,
    word_count: u32,
    /// 0-based body-row index within the current table; even rows shaded.
    row_index: u32,
}

pub(crate) fn apply_presentation_pass(
    html: &str,
    math: Option<&MathRenderer>,
) -> Result<RewriteOutcome, RenderError> {
    let state = Rc::new(RefCell::new(RewriteState::default()));
    let math = math.copied();

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("span[data-role=\"content-formula\"]", {
                    let state = Rc::clone(&state);
                    move |el| {
                        {
                            let mut state = state.borrow_mut();
                            state.formulas = state.formulas.saturating_add(1);
                        }
                        typeset_formula(el, math.as_ref())
                    }
                }),
                element!("table", {
                    let state = Rc::clone(&state);
                    move |el| {
                        {
                            let mut state = state.borrow_mut();
                            state.tables = state.tables.saturating_add(1);
                            state.row_index = 0;
                        }

                        if el.get_attribute("data-role").as_deref() != Some("content-table") {
                            el.set_attribute("data-role", "content-table")?;
                            el.before(TABLE_WRAPPER_OPEN, ContentType::Html);
                            el.after("</div>", ContentType::Html);
                        }
                        apply_style(el, TABLE_STYLE)
                    }
                }),
                element!("th", |el| apply_style(el, TH_STYLE)),
                element!("td", |el| apply_style(el, TD_STYLE)),
                element!("tbody > tr, table > tr", {
                    let state = Rc::clone(&state);
                    move |el| {
                        let shaded = {
                            let mut state = state.borrow_mut();
                            let index = state.row_index;
                            state.row_index = state.row_index.saturating_add(1);
                            index % 2 == 0
                        };
                        if shaded {
                            apply_style(el, STRIPE_STYLE)?;
                        }
                        Ok(())
                    }
                }),
                element!("h1, h2, h3, h4, h5, h6", |el| {
                    let style = heading_style(&el.tag_name());
                    apply_style(el, &style)
                }),
                element!("p", |el| apply_style(el, PARAGRAPH_STYLE)),
                element!("blockquote", |el| apply_style(el, QUOTE_STYLE)),
                element!("pre code", |el| apply_style(el, PRE_CODE_STYLE)),
                element!("pre", |el| apply_style(el, PRE_STYLE)),
                element!("code", |el| apply_style(el, CODE_STYLE)),
                element!("ul, ol", |el| apply_style(el, LIST_STYLE)),
                element!("li", |el| apply_style(el, LIST_ITEM_STYLE)),
                element!("img", {
                    let state = Rc::clone(&state);
                    move |el| {
                        {
                            let mut state = state.borrow_mut();
                            state.images = state.images.saturating_add(1);
                        }
                        if el.get_attribute("alt").is_none() {
                            el.set_attribute("alt", "")?;
                        }
                        if el.get_attribute("loading").is_none() {
                            el.set_attribute("loading", "lazy")?;
                        }
                        if el.get_attribute("decoding").is_none() {
                            el.set_attribute("decoding", "async")?;
                        }
                        apply_style(el, IMAGE_STYLE)
                    }
                }),
                element!("a", {
                    let state = Rc::clone(&state);
                    move |el| {
                        let Some(href) = el.get_attribute("href") else {
                            return Ok(());
                        };
                        if href.is_empty() || href.starts_with('#') {
                            return Ok(());
                        }

                        {
                            let mut state = state.borrow_mut();
                            state.external_links = state.external_links.saturating_add(1);
                        }

                        el.set_attribute("target", "_blank")?;
                        let rel_value =
                            merge_rel(el.get_attribute("rel"), &["noopener", "noreferrer"]);
                        el.set_attribute("rel", &rel_value)?;
                        Ok(())
                    }
                }),
                text!("*", {
                    let state = Rc::clone(&state);
                    move |t| {
                        let words = t
                            .as_str()
                            .split_whitespace()
                            .filter(|segment| !segment.is_empty())
                            .count() as u32;
                        if words > 0 {
                            let mut state = state.borrow_mut();
                            state.word_count = state.word_count.saturating_add(words);
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::document(err.to_string()))?;

    let state = Rc::try_unwrap(state)
        .map(|cell| cell.into_inner())
        .unwrap_or_else(|rc| rc.borrow().clone());

    Ok(RewriteOutcome {
        html: rewritten,
        metrics: build_metrics(&state),
    })
}

fn typeset_formula(el: &mut Element, math: Option<&MathRenderer>) -> HandlerResult {
    let Some(renderer) = math else {
        return Ok(());
    };
    let Some(expression) = el.get_attribute("data-expression") else {
        return Ok(());
    };

    match renderer.typeset(&expression) {
        Ok(html) => {
            el.set_inner_content(&html, ContentType::Html);
        }
        Err(err) => {
            // Escaped literal stays in place as the visible fallback.
            warn!(
                target = "application::render::math",
                expression = expression.as_str(),
                "formula typesetting failed: {err}"
            );
        }
    }
    Ok(())
}

fn apply_style(el: &mut Element, style: &str) -> HandlerResult {
    if el.get_attribute("style").is_none() {
        el.set_attribute("style", style)?;
    }
    Ok(())
}

fn heading_style(tag_name: &str) -> String {
    let (top, bottom) = match tag_name {
        "h1" => ("1.75rem", "1rem"),
        "h2" => ("1.5rem", "0.875rem"),
        "h3" => ("1.25rem", "0.75rem"),
        _ => ("1rem", "0.5rem"),
    };
    format!("margin:{top} 0 {bottom}; color:{HEADING_COLOR}")
}

fn merge_rel(existing: Option<String>, required: &[&str]) -> String {
    let mut tokens: BTreeSet<String> = existing
        .unwrap_or_default()
        .split_whitespace()
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect();
    for &token in required {
        tokens.insert(token.to_string());
    }
    tokens.into_iter().collect::<Vec<_>>().join(" ")
}

fn build_metrics(state: &RewriteState) -> ContentMetrics {
    let reading_time_minutes = if state.word_count == 0 {
        0
    } else {
        let minutes = (state.word_count as f32 / WORDS_PER_MINUTE).ceil() as u32;
        minutes.max(1)
    };

    ContentMetrics {
        reading_time_minutes,
        external_links_count: state.external_links,
        images_count: state.images,
        tables_count: state.tables,
        formulas_count: state.formulas,
        word_count: state.word_count,
    }
}
