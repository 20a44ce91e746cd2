pub(crate) mod blocks;
pub(crate) mod config;
pub(crate) mod convert;
pub(crate) mod math;
pub(crate) mod rewrite;

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::application::render::types::{RenderError, RenderedContent};
use crate::domain::content::{ContentField, parse_content_field};

use config::build_content_sanitizer;
use convert::{convert_document, escape_text};
use math::MathRenderer;
use rewrite::apply_presentation_pass;

/// Default rendering pipeline: format detection, op-log conversion,
/// Ammonia sanitisation, KaTeX typesetting, and the lol_html presentation
/// pass. Rendering never fails; any internal error degrades to an escaped
/// fallback block so the hosting page keeps working.
pub struct ContentRenderer {
    sanitizer: ammonia::Builder<'static>,
    math: Option<MathRenderer>,
}

impl ContentRenderer {
    pub fn new() -> Self {
        Self {
            sanitizer: build_content_sanitizer(),
            math: Some(MathRenderer),
        }
    }

    /// A pipeline without the typesetting collaborator; formula markers
    /// keep their escaped literal text.
    pub fn without_math() -> Self {
        Self {
            math: None,
            ..Self::new()
        }
    }

    pub fn render(&self, raw: &str) -> RenderedContent {
        match self.try_render(raw) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    target = "application::render",
                    "content rendering failed, serving fallback: {err}"
                );
                metrics::counter!("girder_render_fallback_total").increment(1);
                fallback_block(raw)
            }
        }
    }

    fn try_render(&self, raw: &str) -> Result<RenderedContent, RenderError> {
        let html = match parse_content_field(raw) {
            ContentField::Empty => return Ok(RenderedContent::empty()),
            ContentField::Ops(doc) => convert_document(&doc),
            ContentField::Html(html) => html,
        };

        let sanitized = self.sanitizer.clean(&html).to_string();
        let outcome = apply_presentation_pass(&sanitized, self.math.as_ref())?;

        Ok(RenderedContent {
            html: outcome.html,
            metrics: outcome.metrics,
        })
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn fallback_block(raw: &str) -> RenderedContent {
    RenderedContent {
        html: format!(
            "<div data-role=\"render-fallback\">{}</div>",
            escape_text(raw)
        ),
        metrics: Default::default(),
    }
}

static CONTENT_RENDERER: Lazy<Arc<ContentRenderer>> =
    Lazy::new(|| Arc::new(ContentRenderer::new()));

/// Access the shared renderer instance, initialised on first use.
pub fn content_renderer() -> Arc<ContentRenderer> {
    Arc::clone(&CONTENT_RENDERER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_content_is_detected_and_converted() {
        let renderer = ContentRenderer::without_math();
        let rendered = renderer.render(r#"{"ops":[{"insert":"hello"}]}"#);
        assert!(rendered.html.contains(">hello</p>"));
    }

    #[test]
    fn html_content_passes_through_the_same_pipeline() {
        let renderer = ContentRenderer::without_math();
        let rendered = renderer.render("<p>already html</p>");
        assert!(rendered.html.contains("already html"));
        assert!(rendered.html.contains("style="));
    }

    #[test]
    fn invalid_json_renders_as_escaped_text_not_an_error() {
        let renderer = ContentRenderer::without_math();
        let rendered = renderer.render("{not valid json");
        assert!(rendered.html.contains("{not valid json"));
        assert!(!rendered.html.contains("<script"));
    }

    #[test]
    fn empty_input_renders_empty() {
        let renderer = ContentRenderer::without_math();
        assert_eq!(renderer.render("   ").html, "");
    }

    #[test]
    fn hostile_html_is_sanitized() {
        let renderer = ContentRenderer::without_math();
        let rendered = renderer.render("<p onclick=\"evil()\">x</p><script>evil()</script>");
        assert!(!rendered.html.contains("onclick"));
        assert!(!rendered.html.contains("script"));
    }

    #[test]
    fn render_is_idempotent_over_its_own_output() {
        let renderer = ContentRenderer::without_math();
        let first = renderer.render("<h2>Title</h2><p>Body</p>");
        let second = renderer.render(&first.html);
        assert_eq!(first.html, second.html);
    }
}
