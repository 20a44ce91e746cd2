use std::{borrow::Cow, collections::HashSet};

use ammonia::Builder as AmmoniaBuilder;

/// Sanitizer for every rendering path: converter output and raw CMS HTML
/// get identical treatment. Inline `style` attributes survive only after
/// passing the declaration filter below.
pub(crate) fn build_content_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "abbr",
        "blockquote",
        "br",
        "code",
        "div",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "i",
        "img",
        "ins",
        "kbd",
        "li",
        "mark",
        "ol",
        "p",
        "pre",
        "s",
        "section",
        "span",
        "strong",
        "sub",
        "sup",
        "u",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "ul",
        "dl",
        "dt",
        "dd",
        "del",
    ]);
    builder.tags(tags);

    let generic: HashSet<&'static str> = HashSet::from([
        "class",
        "id",
        "title",
        "lang",
        "dir",
        "aria-hidden",
        "aria-label",
        "role",
    ]);
    builder.generic_attributes(generic);
    builder.add_generic_attribute_prefixes(&["data-"]);
    builder.add_generic_attributes(&["style"]);

    // Link hardening (target/rel) is owned by the presentation pass, so
    // the attributes must survive sanitisation unchanged.
    builder.add_tag_attributes("a", &["target", "rel"]);
    builder.link_rel(None);
    builder.add_tag_attributes(
        "img",
        &["title", "width", "height", "alt", "loading", "decoding"],
    );
    builder.add_tag_attributes("th", &["align", "colspan", "rowspan", "scope"]);
    builder.add_tag_attributes("td", &["align", "colspan", "rowspan"]);

    builder.add_url_schemes(["http", "https", "mailto", "tel"].iter().copied());

    builder.attribute_filter(|_element, attribute, value| {
        if attribute.eq_ignore_ascii_case("style") {
            sanitize_style_attribute(value).map(Cow::Owned)
        } else {
            Some(Cow::Borrowed(value))
        }
    });

    builder
}

fn sanitize_style_attribute(value: &str) -> Option<String> {
    let mut sanitized = Vec::new();

    for declaration in value.split(';') {
        let decl = declaration.trim();
        if decl.is_empty() {
            continue;
        }

        if is_safe_style_declaration(decl) {
            sanitized.push(decl);
        }
    }

    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized.join("; "))
    }
}

fn is_safe_style_declaration(decl: &str) -> bool {
    let lower = decl.to_ascii_lowercase();

    const FORBIDDEN_SUBSTRINGS: [&str; 6] = [
        "expression(",
        "javascript:",
        "vbscript:",
        "-moz-binding",
        "behavior:",
        "behaviour:",
    ];

    if FORBIDDEN_SUBSTRINGS
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return false;
    }

    if lower.contains("@import") {
        return false;
    }

    !contains_unsafe_url(&lower)
}

fn contains_unsafe_url(lower_decl: &str) -> bool {
    let mut offset = 0;

    while let Some(start) = lower_decl[offset..].find("url(") {
        let open = offset + start + 4; // skip "url("
        let rest = &lower_decl[open..];
        if let Some(close_rel) = rest.find(')') {
            let close = open + close_rel;
            let target = &lower_decl[open..close];
            let trimmed = target.trim_matches(|c: char| c.is_whitespace() || c == '\'');
            let trimmed = trimmed.trim_matches('"');

            if is_unsafe_url(trimmed) {
                return true;
            }

            offset = close + 1;
        } else {
            // malformed url, treat as unsafe
            return true;
        }
    }

    false
}

fn is_unsafe_url(url: &str) -> bool {
    if url.starts_with("data:image/") {
        return false;
    }

    url.starts_with("javascript:")
        || url.starts_with("vbscript:")
        || url.starts_with("data:")
        || url.starts_with("file:")
        || url.contains("javascript:")
        || url.contains("vbscript:")
}

#[cfg(test)]
mod tests {
    use super::{build_content_sanitizer, contains_unsafe_url, sanitize_style_attribute};

    #[test]
    fn sanitize_style_attribute_preserves_safe_rules() {
        let input = "color: red; padding: 4px;";
        let output = sanitize_style_attribute(input);
        assert_eq!(output.unwrap(), "color: red; padding: 4px");
    }

    #[test]
    fn sanitize_style_attribute_drops_unsafe_rules() {
        let input = "color: red; background: url('javascript:alert(1)'); expression(test);";
        let output = sanitize_style_attribute(input);
        assert_eq!(output.unwrap(), "color: red");
    }

    #[test]
    fn script_tags_are_stripped() {
        let sanitizer = build_content_sanitizer();
        let html = sanitizer
            .clean("<p>ok</p><script>alert(1)</script>")
            .to_string();
        assert!(html.contains("<p>ok</p>"));
        assert!(!html.contains("script"));
    }

    #[test]
    fn formula_marker_attributes_survive() {
        let sanitizer = build_content_sanitizer();
        let html = sanitizer
            .clean("<span data-role=\"content-formula\" data-expression=\"a^2\">a^2</span>")
            .to_string();
        assert!(html.contains("data-role"));
        assert!(html.contains("data-expression"));
    }

    #[test]
    fn detects_unsafe_urls() {
        assert!(contains_unsafe_url("background:url(javascript:alert(1))"));
        assert!(!contains_unsafe_url(
            "background:url('https://example.com/bg.png')"
        ));
    }
}
