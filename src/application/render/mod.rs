//! Content rendering pipeline.
//!
//! `ContentRenderer` takes a record's body field (raw HTML or a
//! JSON-encoded op-log), and produces a sanitized, styled HTML fragment
//! together with content metrics. The heuristic `format_blocks` helper
//! covers the plain-text fields that never see the rich editor.

mod service;
pub mod types;

pub use service::blocks::{ListPredicate, format_blocks};
pub use service::convert::convert_document;
pub use service::{ContentRenderer, content_renderer};
pub use types::{BlockStyle, ContentMetrics, RenderedContent};
