//! Op-log to HTML conversion.
//!
//! Single left-to-right pass over the operations. Inline attributes wrap
//! each operation's own text (bold outermost, link innermost); block
//! attributes are run-length merged: the wrapping tag opens on the first
//! operation of a contiguous run and closes after the last, with the open
//! block tracked explicitly so switching list kinds closes the old
//! wrapper before opening the new one.

use crate::domain::delta::{Attributes, DeltaDocument, Embed, Insert, ListKind, Operation};

/// Convert an op-log into an HTML fragment. Operations with an
/// unrecognized payload contribute nothing; an empty document converts to
/// the empty string. This function has no failure path.
pub fn convert_document(doc: &DeltaDocument) -> String {
    let mut converter = Converter::default();
    for op in &doc.ops {
        converter.push_op(op);
    }
    converter.finish()
}

/// Block-level construct an operation belongs to, in fixed priority
/// order: header, blockquote, code block, list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Paragraph,
    Header(u8),
    Quote,
    Code,
    List(ListKind),
}

fn block_of(attrs: &Attributes) -> Block {
    if let Some(level) = attrs.header_level() {
        Block::Header(level)
    } else if attrs.blockquote {
        Block::Quote
    } else if attrs.code_block {
        Block::Code
    } else if let Some(kind) = attrs.list {
        Block::List(kind)
    } else {
        Block::Paragraph
    }
}

#[derive(Default)]
struct Converter {
    out: String,
    open: Option<Block>,
    /// Pending paragraph content; flushed as `<p>…</p>` when the
    /// paragraph run ends or the text carries a newline.
    para: String,
}

impl Converter {
    fn push_op(&mut self, op: &Operation) {
        match &op.insert {
            Insert::Text(text) => self.push_text(text, &op.attributes),
            Insert::Embed(embed) => self.push_embed(embed, &op.attributes),
            Insert::Unsupported(_) => {}
        }
    }

    fn push_text(&mut self, text: &str, attrs: &Attributes) {
        let block = block_of(attrs);
        self.ensure_block(block);

        match block {
            Block::Paragraph => {
                for (index, segment) in text.split('\n').enumerate() {
                    if index > 0 {
                        self.flush_paragraph();
                    }
                    self.para.push_str(&inline_markup(attrs, &escape_text(segment)));
                }
            }
            Block::Code => {
                let escaped = escape_text(text);
                self.out.push_str(&inline_markup(attrs, &escaped));
                if !escaped.ends_with('\n') {
                    self.out.push('\n');
                }
            }
            Block::List(_) => {
                self.out.push_str("<li>");
                self.out.push_str(&inline_markup(attrs, &escape_text(text)));
                self.out.push_str("</li>");
            }
            Block::Header(_) | Block::Quote => {
                self.out.push_str(&inline_markup(attrs, &escape_text(text)));
            }
        }
    }

    fn push_embed(&mut self, embed: &Embed, attrs: &Attributes) {
        if let Some(expression) = &embed.formula {
            let span = format!(
                "<span data-role=\"content-formula\" data-expression=\"{}\">{}</span>",
                escape_attribute(expression),
                escape_text(expression),
            );
            match self.open {
                Some(Block::Paragraph) | None => {
                    self.ensure_block(Block::Paragraph);
                    self.para.push_str(&span);
                }
                _ => self.out.push_str(&span),
            }
        } else if let Some(src) = &embed.image {
            let img = format!(
                "<img data-role=\"content-image\" src=\"{}\" alt=\"\">",
                escape_attribute(src),
            );
            if let Some(kind) = attrs.list {
                self.ensure_block(Block::List(kind));
                self.out.push_str("<li>");
                self.out.push_str(&img);
                self.out.push_str("</li>");
            } else {
                self.close_open();
                self.out.push_str(&img);
            }
        }
    }

    /// Open `target` if it is not already the open block, closing whatever
    /// was open first. Equal block values (same header level, same list
    /// kind) continue the current run.
    fn ensure_block(&mut self, target: Block) {
        if self.open == Some(target) {
            return;
        }
        self.close_open();
        match target {
            Block::Paragraph => {}
            Block::Header(level) => {
                self.out.push_str(&format!("<h{level}>"));
            }
            Block::Quote => self.out.push_str("<blockquote>"),
            Block::Code => self.out.push_str("<pre><code>"),
            Block::List(ListKind::Bullet) => self.out.push_str("<ul>"),
            Block::List(ListKind::Ordered) => self.out.push_str("<ol>"),
        }
        self.open = Some(target);
    }

    fn close_open(&mut self) {
        match self.open.take() {
            None => {}
            Some(Block::Paragraph) => self.flush_paragraph(),
            Some(Block::Header(level)) => {
                self.out.push_str(&format!("</h{level}>"));
            }
            Some(Block::Quote) => self.out.push_str("</blockquote>"),
            Some(Block::Code) => self.out.push_str("</code></pre>"),
            Some(Block::List(ListKind::Bullet)) => self.out.push_str("</ul>"),
            Some(Block::List(ListKind::Ordered)) => self.out.push_str("</ol>"),
        }
    }

    fn flush_paragraph(&mut self) {
        if self.para.is_empty() {
            return;
        }
        self.out.push_str("<p>");
        self.out.push_str(&self.para);
        self.out.push_str("</p>");
        self.para.clear();
    }

    fn finish(mut self) -> String {
        self.close_open();
        self.out
    }
}

/// Wrap escaped text in the operation's inline tags. Evaluation order is
/// fixed (bold, italic, underline, strike, inline code, link) with each
/// later attribute nesting inside the earlier ones.
fn inline_markup(attrs: &Attributes, escaped: &str) -> String {
    if escaped.is_empty() {
        return String::new();
    }

    let mut opens = String::new();
    let mut closes = String::new();
    let mut wrap = |open: &str, close: &str| {
        opens.push_str(open);
        closes.insert_str(0, close);
    };

    if attrs.bold {
        wrap("<strong>", "</strong>");
    }
    if attrs.italic {
        wrap("<em>", "</em>");
    }
    if attrs.underline {
        wrap("<u>", "</u>");
    }
    if attrs.strike {
        wrap("<s>", "</s>");
    }
    if attrs.code {
        wrap("<code>", "</code>");
    }
    if let Some(url) = &attrs.link {
        let open = format!("<a href=\"{}\">", escape_attribute(url));
        opens.push_str(&open);
        closes.insert_str(0, "</a>");
    }

    format!("{opens}{escaped}{closes}")
}

pub(crate) fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub(crate) fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}
