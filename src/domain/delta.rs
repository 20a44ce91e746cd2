//! Op-log document model produced by the CMS rich-text editor.
//!
//! A document is an ordered sequence of insert operations, each carrying a
//! payload (text or embed) and a set of formatting attributes. Adjacency
//! between consecutive operations determines where multi-operation
//! constructs (headers, quotes, code blocks, lists) open and close their
//! wrapping tags; the converter in `application::render` performs that
//! merge.

use serde::{Deserialize, Deserializer};

/// Wire shape `{"ops": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeltaDocument {
    #[serde(default)]
    pub ops: Vec<Operation>,
}

/// One unit of the op-log. Never mutated after deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operation {
    pub insert: Insert,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Operation payload. Editors occasionally emit payloads this crate does
/// not understand (video embeds, mentions); those deserialize as
/// `Unsupported` and contribute nothing to the rendered output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Text(String),
    Embed(Embed),
    Unsupported(serde_json::Value),
}

/// Tagged embed payload: exactly one of the keys is expected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub formula: Option<String>,
}

/// Formatting attributes. Absent key means the attribute is not applied;
/// unknown keys from newer editors are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strike: bool,
    /// Inline code, distinct from the block-level `code-block`.
    #[serde(default)]
    pub code: bool,
    pub header: Option<i64>,
    #[serde(default)]
    pub blockquote: bool,
    #[serde(default, rename = "code-block")]
    pub code_block: bool,
    #[serde(default, deserialize_with = "lenient_list")]
    pub list: Option<ListKind>,
    pub link: Option<String>,
}

impl Attributes {
    /// Header level clamped to the levels HTML actually has.
    pub fn header_level(&self) -> Option<u8> {
        self.header.map(|level| level.clamp(1, 6) as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Bullet,
}

/// Unknown list kinds (e.g. an editor's checklist extension) degrade to
/// "no list" instead of failing the whole document parse.
fn lenient_list<'de, D>(deserializer: D) -> Result<Option<ListKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|kind| match kind {
        "ordered" => Some(ListKind::Ordered),
        "bullet" => Some(ListKind::Bullet),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_op_with_stacked_attributes() {
        let op: Operation =
            serde_json::from_str(r#"{"insert":"hi","attributes":{"bold":true,"link":"https://example.com"}}"#)
                .expect("decode");
        assert!(op.attributes.bold);
        assert_eq!(op.attributes.link.as_deref(), Some("https://example.com"));
        assert!(matches!(op.insert, Insert::Text(ref t) if t == "hi"));
    }

    #[test]
    fn embed_ops_decode_by_key() {
        let doc: DeltaDocument = serde_json::from_str(
            r#"{"ops":[{"insert":{"image":"/media/a.png"}},{"insert":{"formula":"a^2"}}]}"#,
        )
        .expect("decode");
        assert!(matches!(&doc.ops[0].insert, Insert::Embed(e) if e.image.as_deref() == Some("/media/a.png")));
        assert!(matches!(&doc.ops[1].insert, Insert::Embed(e) if e.formula.as_deref() == Some("a^2")));
    }

    #[test]
    fn unrecognized_insert_is_tolerated() {
        let doc: DeltaDocument =
            serde_json::from_str(r#"{"ops":[{"insert":42},{"insert":"ok"}]}"#).expect("decode");
        assert!(matches!(doc.ops[0].insert, Insert::Unsupported(_)));
    }

    #[test]
    fn unknown_list_kind_degrades_to_none() {
        let op: Operation =
            serde_json::from_str(r#"{"insert":"x","attributes":{"list":"checked"}}"#)
                .expect("decode");
        assert!(op.attributes.list.is_none());
    }

    #[test]
    fn header_level_clamps() {
        let mut attrs = Attributes::default();
        attrs.header = Some(9);
        assert_eq!(attrs.header_level(), Some(6));
        attrs.header = Some(-3);
        assert_eq!(attrs.header_level(), Some(1));
    }
}
