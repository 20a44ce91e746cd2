use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deterministic rendering result returned to callers. Regenerated on
/// every content update; never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedContent {
    /// Sanitised HTML fragment ready for insertion into a page.
    pub html: String,
    pub metrics: ContentMetrics,
}

impl RenderedContent {
    pub fn empty() -> Self {
        Self {
            html: String::new(),
            metrics: ContentMetrics::default(),
        }
    }
}

/// Content-level metrics surfaced alongside rendered HTML; the dashboard
/// uses these for reading-time badges and media audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentMetrics {
    pub reading_time_minutes: u32,
    pub external_links_count: u32,
    pub images_count: u32,
    pub tables_count: u32,
    pub formulas_count: u32,
    pub word_count: u32,
}

/// Block style used by the heuristic plain-text formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Icon-and-text line per entry.
    Checklist,
    /// One visual card per entry.
    Cards,
}

/// Internal pipeline failure. Never escapes `ContentRenderer::render`,
/// which degrades to an escaped fallback block instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document rewrite failed: {message}")]
    Document { message: String },
    #[error("math typesetting failed: {message}")]
    Math { message: String },
}

impl RenderError {
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    pub fn math(message: impl Into<String>) -> Self {
        Self::Math {
            message: message.into(),
        }
    }
}
