// SPDX-License-Identifier: PMPL-1.0-or-later
//! Tag scanning and text predicates used by every analyzer.
//!
//! No DOM is built anywhere in this crate. These utilities reconstruct tag
//! boundaries, attributes, and element extents directly from raw text with a
//! quote-aware scanner, so template markup (namespaced tags such as
//! `<f:section>`, control-flow pseudo-elements) is handled the same as plain
//! HTML. All functions are total: malformed input degrades to a conservative
//! answer (`None`, `false`, end-of-text), never a panic.

use crate::diagnostic::Span;
use regex::Regex;
use std::sync::LazyLock;

/// A located tag occurrence in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Offset of the `<`
    pub start: usize,
    /// Offset just past the `>`
    pub end: usize,
    /// The raw tag text, including delimiters
    pub raw: &'a str,
}

impl<'a> Tag<'a> {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Lowercased tag name, `None` if the tag is malformed.
    pub fn name(&self) -> Option<String> {
        extract_tag_name(self.raw)
    }

    pub fn is_closing(&self) -> bool {
        self.raw.starts_with("</")
    }

    pub fn is_self_closing(&self) -> bool {
        self.raw.trim_end().ends_with("/>")
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        get_attribute_value(self.raw, name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        has_attribute(self.raw, name)
    }
}

/// Iterator over all tags in a text, in document order.
///
/// Comments (`<!-- -->`), doctype/processing-instruction constructs, and
/// stray `<` characters are skipped. Quoted attribute values may contain
/// `<` and `>` without confusing the scan.
pub struct TagIter<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for TagIter<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let Some(rel) = self.text[self.pos..].find('<') else {
                self.pos = bytes.len();
                return None;
            };
            let start = self.pos + rel;

            // Comments: skip to the terminator, or to end of text if unterminated
            if self.text[start..].starts_with("<!--") {
                match self.text[start + 4..].find("-->") {
                    Some(close) => {
                        self.pos = start + 4 + close + 3;
                        continue;
                    }
                    None => {
                        self.pos = bytes.len();
                        return None;
                    }
                }
            }

            // Doctype, CDATA, processing instructions: not element tags
            let after = bytes.get(start + 1).copied();
            let tag_head = match after {
                Some(b'/') => bytes.get(start + 2).copied(),
                other => other,
            };
            if !matches!(tag_head, Some(c) if c.is_ascii_alphabetic()) {
                self.pos = start + 1;
                continue;
            }

            // Scan to the closing '>' honoring quote state
            let mut quote: Option<u8> = None;
            let mut i = start + 1;
            while i < bytes.len() {
                let c = bytes[i];
                match quote {
                    Some(q) => {
                        if c == q {
                            quote = None;
                        }
                    }
                    None => match c {
                        b'"' | b'\'' => quote = Some(c),
                        b'>' => {
                            let end = i + 1;
                            self.pos = end;
                            return Some(Tag { start, end, raw: &self.text[start..end] });
                        }
                        _ => {}
                    },
                }
                i += 1;
            }
            // Unterminated tag: give up on the rest of the text
            self.pos = bytes.len();
            return None;
        }
        None
    }
}

/// Iterate over all tags in `text`.
pub fn tags(text: &str) -> TagIter<'_> {
    TagIter { text, pos: 0 }
}

/// Iterate over tags starting at or after `offset`.
pub fn tags_from(text: &str, offset: usize) -> TagIter<'_> {
    TagIter { text, pos: offset.min(text.len()) }
}

/// Extract the lowercased tag name from raw tag text.
///
/// Strips `<`, `>`, and a leading `/`; returns the first
/// whitespace-delimited token. `None` on malformed input.
pub fn extract_tag_name(raw_tag: &str) -> Option<String> {
    let inner = raw_tag.trim().strip_prefix('<')?;
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    let inner = inner.strip_prefix('/').unwrap_or(inner).trim_start();

    let name: String = inner
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .collect();
    if name.is_empty() || !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

/// Look up a quoted attribute value in raw tag text, case-insensitively.
///
/// Returns the first match. Unquoted attribute values are not handled and
/// yield `None`.
pub fn get_attribute_value(raw_tag: &str, attr_name: &str) -> Option<String> {
    let lower = raw_tag.to_ascii_lowercase();
    let needle = attr_name.to_ascii_lowercase();
    let bytes = raw_tag.as_bytes();

    let mut search = 0;
    while let Some(rel) = lower[search..].find(&needle) {
        let at = search + rel;
        search = at + 1;

        // Name must start at a token boundary so "name" does not match
        // inside "data-name". A tag-name position (right after '<') is not
        // an attribute.
        if at == 0 {
            continue;
        }
        let prev = bytes[at - 1];
        if !(prev.is_ascii_whitespace() || prev == b'"' || prev == b'\'') {
            continue;
        }
        let mut i = at + needle.len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let quote = match bytes.get(i) {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => continue,
        };
        i += 1;
        let value_start = i;
        while i < bytes.len() && bytes[i] != quote {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        return Some(raw_tag[value_start..i].to_string());
    }
    None
}

/// Whether the attribute token appears in raw tag text.
///
/// The token must be followed by `=`, whitespace, `>`, or `/`, so searching
/// for `name` does not match `data-name` or `name-suffix`.
pub fn has_attribute(raw_tag: &str, attr_name: &str) -> bool {
    let lower = raw_tag.to_ascii_lowercase();
    let needle = attr_name.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    let mut search = 0;
    while let Some(rel) = lower[search..].find(&needle) {
        let at = search + rel;
        search = at + 1;

        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }
        match bytes.get(at + needle.len()) {
            None => return false,
            Some(b'=') | Some(b'>') | Some(b'/') => return true,
            Some(c) if c.is_ascii_whitespace() => return true,
            _ => continue,
        }
    }
    false
}

/// Find the start of the tag enclosing or preceding `offset`.
///
/// Scans backwards for a `<` that begins a tag. `None` if there is none.
pub fn find_element_start(text: &str, offset: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = offset.min(text.len());
    while i > 0 {
        i -= 1;
        if bytes[i] == b'<' {
            let head = match bytes.get(i + 1) {
                Some(b'/') => bytes.get(i + 2),
                other => other,
            };
            if matches!(head, Some(c) if c.is_ascii_alphabetic()) {
                return Some(i);
            }
        }
    }
    None
}

/// Find the end of the element whose opening tag starts at `start_offset`.
///
/// Returns the offset just past the `>` of the matching close tag, honoring
/// nested same-name tags (case-insensitive) and self-closing syntax. Quoted
/// attribute values may contain `<`/`>` and do not confuse the scan. On
/// malformed or unterminated input, returns `text.len()`.
pub fn find_element_end(text: &str, start_offset: usize) -> usize {
    let mut iter = tags_from(text, start_offset);
    let Some(open) = iter.next() else {
        return text.len();
    };
    if open.start != start_offset {
        return text.len();
    }
    let Some(name) = open.name() else {
        return text.len();
    };
    if open.is_self_closing() {
        return open.end;
    }

    let mut depth: usize = 1;
    for tag in iter {
        if tag.name().as_deref() != Some(name.as_str()) {
            continue;
        }
        if tag.is_closing() {
            depth -= 1;
            if depth == 0 {
                return tag.end;
            }
        } else if !tag.is_self_closing() {
            depth += 1;
        }
    }
    text.len()
}

/// Inner content span of the element opening at `start_offset`.
///
/// For self-closing tags the span is empty. Degrades to
/// `open.end..text.len()` when no matching close tag exists.
pub fn element_content_span(text: &str, start_offset: usize) -> Span {
    let Some(open) = tags_from(text, start_offset).next() else {
        return Span::new(start_offset, start_offset);
    };
    if open.is_self_closing() {
        return Span::new(open.end, open.end);
    }
    let end = find_element_end(text, start_offset);
    // `end` is just past the close tag; content ends at that tag's '<'.
    // When the element is unterminated, the remainder of the text counts.
    let content_end = text[open.end..end]
        .rfind('<')
        .filter(|_| end > open.end && text[..end].ends_with('>'))
        .map(|i| open.end + i)
        .unwrap_or(end);
    Span::new(open.end, content_end.max(open.end))
}

/// Strip all `<...>` spans (tags, comments, doctype, processing
/// instructions) and collapse whitespace runs to single spaces.
///
/// A `<` not followed by markup (as in prose like "a < b") is kept.
pub fn strip_tags(html: &str) -> String {
    let bytes = html.as_bytes();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while pos < html.len() {
        let Some(rel) = html[pos..].find('<') else {
            out.push_str(&html[pos..]);
            break;
        };
        let lt = pos + rel;
        out.push_str(&html[pos..lt]);

        let head = bytes.get(lt + 1).copied();
        if !matches!(head, Some(c) if c.is_ascii_alphanumeric() || c == b'/' || c == b'!' || c == b'?') {
            out.push('<');
            pos = lt + 1;
            continue;
        }

        if html[lt..].starts_with("<!--") {
            match html[lt + 4..].find("-->") {
                Some(close) => pos = lt + 4 + close + 3,
                None => break,
            }
            continue;
        }

        // Scan to the closing '>' honoring quote state
        let mut quote: Option<u8> = None;
        let mut i = lt + 1;
        let mut end = None;
        while i < bytes.len() {
            let c = bytes[i];
            match quote {
                Some(q) => {
                    if c == q {
                        quote = None;
                    }
                }
                None => match c {
                    b'"' | b'\'' => quote = Some(c),
                    b'>' => {
                        end = Some(i + 1);
                        break;
                    }
                    _ => {}
                },
            }
            i += 1;
        }
        match end {
            Some(e) => pos = e,
            None => break,
        }
    }

    let mut collapsed = String::with_capacity(out.len());
    let mut last_space = false;
    for c in out.chars() {
        if c.is_whitespace() {
            if !last_space {
                collapsed.push(' ');
            }
            last_space = true;
        } else {
            collapsed.push(c);
            last_space = false;
        }
    }
    collapsed.trim().to_string()
}

/// Generic placeholder phrases that carry no information on their own.
const GENERIC_PHRASES: &[&str] = &[
    "click here",
    "click",
    "here",
    "read more",
    "learn more",
    "see more",
    "more",
    "more info",
    "details",
    "link",
    "button",
    "submit",
    "go",
    "this",
    "this page",
    "title",
    "heading",
    "header",
    "text",
    "label",
    "placeholder",
    "untitled",
    "lorem ipsum",
    "todo",
    "tbd",
    "n/a",
    "test",
    "image",
    "icon",
];

/// Whether `text` is a generic placeholder phrase with no information value.
pub fn is_generic_placeholder_text(text: &str) -> bool {
    let normalized = text.trim().trim_end_matches(['.', '!', '…', '>', '»']).trim().to_lowercase();
    if normalized.is_empty() {
        return false;
    }
    GENERIC_PHRASES.contains(&normalized.as_str()) || normalized.starts_with("lorem ipsum")
}

static BCP47_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid regex"));

/// Whether `code` is shaped like a BCP 47 language tag (e.g. `en`, `en-US`).
///
/// Shape check only; subtags are not validated against the IANA registry.
pub fn is_valid_bcp47_language_code(code: &str) -> bool {
    BCP47_RE.is_match(code.trim())
}

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://|ftp://|www\.)\S+$|^\S+\.(com|org|net|edu|gov|io|de|co|uk|info)(/\S*)?$")
        .expect("valid regex")
});

/// Whether `text` looks like a bare URL or domain rather than prose.
pub fn is_url_like_text(text: &str) -> bool {
    URL_RE.is_match(text.trim())
}

/// Class-name fragments indicating icon fonts or icon sprites.
const ICON_CLASS_FRAGMENTS: &[&str] =
    &["icon-", "icon ", "fa-", "fas ", "far ", "fab ", "glyphicon", "material-icons", "mdi-"];

/// Whether a `class` attribute value indicates an icon-only element.
pub fn is_icon_class(class_value: &str) -> bool {
    let lower = format!("{} ", class_value.to_lowercase());
    ICON_CLASS_FRAGMENTS.iter().any(|frag| lower.contains(frag)) || lower.trim() == "icon"
}

/// Whether stripped text content consists only of icon glyphs or symbols
/// (private-use-area characters, dingbats, arrows, common symbol glyphs).
pub fn is_icon_glyph_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 3 {
        return false;
    }
    trimmed.chars().all(|c| {
        let cp = c as u32;
        (0xE000..=0xF8FF).contains(&cp)       // private use area (icon fonts)
            || (0x2190..=0x21FF).contains(&cp) // arrows
            || (0x2500..=0x27BF).contains(&cp) // box drawing through dingbats
            || (0x1F300..=0x1FAFF).contains(&cp) // pictographs
            || matches!(c, '×' | '✕' | '✖' | '☰' | '⋮' | '⋯' | '+' | '›' | '‹' | '»' | '«')
    })
}

/// Slice `text` over roughly `[start, end)`, nudging both offsets forward
/// to the nearest char boundaries. Keyword-window checks use byte distances
/// that may land inside a multi-byte character.
pub fn window(text: &str, start: usize, end: usize) -> &str {
    let mut s = start.min(text.len());
    while !text.is_char_boundary(s) {
        s += 1;
    }
    let mut e = end.min(text.len());
    while !text.is_char_boundary(e) {
        e += 1;
    }
    &text[s..e.max(s)]
}

/// HTML void elements: never have a closing tag even without `/>`.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Whether `name` is an HTML void element.
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.contains(&name)
}

/// 1-indexed line and column of a byte offset. Used by report renderers.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map(|i| offset - i).unwrap_or(offset + 1);
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tag_name() {
        assert_eq!(extract_tag_name("<div>"), Some("div".to_string()));
        assert_eq!(extract_tag_name("</div>"), Some("div".to_string()));
        assert_eq!(extract_tag_name("<DIV CLASS=\"a\">"), Some("div".to_string()));
        assert_eq!(extract_tag_name("<f:section name=\"main\">"), Some("f:section".to_string()));
        assert_eq!(extract_tag_name("<br/>"), Some("br".to_string()));
        assert_eq!(extract_tag_name("<>"), None);
        assert_eq!(extract_tag_name("< >"), None);
        assert_eq!(extract_tag_name("not a tag"), None);
    }

    #[test]
    fn test_get_attribute_value() {
        assert_eq!(get_attribute_value("<a href=\"/x\">", "href"), Some("/x".to_string()));
        assert_eq!(get_attribute_value("<a HREF='/x'>", "href"), Some("/x".to_string()));
        assert_eq!(get_attribute_value("<a href = \"/x\">", "href"), Some("/x".to_string()));
        assert_eq!(get_attribute_value("<a href=\"/x\">", "title"), None);
        // Unquoted values are explicitly unsupported
        assert_eq!(get_attribute_value("<a href=/x>", "href"), None);
    }

    #[test]
    fn test_get_attribute_value_order_independent() {
        let a = "<input type=\"text\" id=\"a\" name=\"n\">";
        let b = "<input name=\"n\" id=\"a\" type=\"text\">";
        assert_eq!(get_attribute_value(a, "id"), get_attribute_value(b, "id"));
        assert_eq!(get_attribute_value(a, "type"), get_attribute_value(b, "type"));
    }

    #[test]
    fn test_get_attribute_value_no_prefix_match() {
        // "name" must not match inside "data-name"
        assert_eq!(get_attribute_value("<x data-name=\"d\">", "name"), None);
        assert_eq!(
            get_attribute_value("<x data-name=\"d\" name=\"real\">", "name"),
            Some("real".to_string())
        );
    }

    #[test]
    fn test_has_attribute() {
        assert!(has_attribute("<input required>", "required"));
        assert!(has_attribute("<input required/>", "required"));
        assert!(has_attribute("<input required >", "required"));
        assert!(has_attribute("<input required=\"true\">", "required"));
        assert!(!has_attribute("<input data-required=\"x\">", "required"));
        assert!(!has_attribute("<input requiredish>", "required"));
    }

    #[test]
    fn test_tag_iter_skips_comments() {
        let html = "<div><!-- <span>hidden</span> --><p>x</p></div>";
        let names: Vec<_> = tags(html).filter_map(|t| t.name()).collect();
        assert_eq!(names, vec!["div", "p", "p", "div"]);
    }

    #[test]
    fn test_tag_iter_quoted_angle_brackets() {
        let html = r#"<a title="a > b" href="/x">link</a>"#;
        let collected: Vec<_> = tags(html).collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].attr("href"), Some("/x".to_string()));
        assert_eq!(collected[0].attr("title"), Some("a > b".to_string()));
    }

    #[test]
    fn test_tag_iter_skips_doctype() {
        let html = "<!DOCTYPE html><html lang=\"en\"></html>";
        let names: Vec<_> = tags(html).filter_map(|t| t.name()).collect();
        assert_eq!(names, vec!["html", "html"]);
    }

    #[test]
    fn test_find_element_end_simple() {
        let html = "<div><p>x</p></div>";
        assert_eq!(find_element_end(html, 0), html.len());
        let p_start = html.find("<p>").unwrap();
        assert_eq!(find_element_end(html, p_start), html.find("</p>").unwrap() + 4);
    }

    #[test]
    fn test_find_element_end_nested_same_name() {
        let html = "<div><div>inner</div></div><div>after</div>";
        let end = find_element_end(html, 0);
        assert_eq!(&html[..end], "<div><div>inner</div></div>");
    }

    #[test]
    fn test_find_element_end_self_closing() {
        let html = "<x attr=\"v\"/><y></y>";
        assert_eq!(find_element_end(html, 0), html.find("/>").unwrap() + 2);
    }

    #[test]
    fn test_find_element_end_unterminated() {
        let html = "<div><p>never closed";
        assert_eq!(find_element_end(html, 0), html.len());
        assert_eq!(find_element_end("", 0), 0);
        // Offset not at a tag start degrades to end-of-text
        assert_eq!(find_element_end(html, 2), html.len());
    }

    #[test]
    fn test_find_element_end_in_bounds() {
        let samples = ["<a><b></a>", "plain", "<", "<x y=\"<\">"];
        for t in samples {
            for s in 0..=t.len() {
                let e = find_element_end(t, s);
                assert!(e <= t.len(), "offset {} of {:?} gave {}", s, t, e);
            }
        }
    }

    #[test]
    fn test_find_element_start() {
        let html = "<div><span>x</span></div>";
        let x = html.find('x').unwrap();
        assert_eq!(find_element_start(html, x), Some(html.find("<span").unwrap()));
        assert_eq!(find_element_start("no tags", 4), None);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("  a \n\n b  "), "a b");
        assert_eq!(strip_tags("<br/>"), "");
        assert_eq!(strip_tags("x <!-- c --> y"), "x y");
    }

    #[test]
    fn test_generic_placeholder() {
        assert!(is_generic_placeholder_text("Click here"));
        assert!(is_generic_placeholder_text("  READ MORE  "));
        assert!(is_generic_placeholder_text("read more..."));
        assert!(!is_generic_placeholder_text("Quarterly report 2025"));
        assert!(!is_generic_placeholder_text(""));
    }

    #[test]
    fn test_bcp47() {
        assert!(is_valid_bcp47_language_code("en"));
        assert!(is_valid_bcp47_language_code("en-US"));
        assert!(is_valid_bcp47_language_code("de-CH-1901"));
        assert!(is_valid_bcp47_language_code("zh-Hant"));
        assert!(!is_valid_bcp47_language_code(""));
        assert!(!is_valid_bcp47_language_code("english"));
        assert!(!is_valid_bcp47_language_code("e"));
        assert!(!is_valid_bcp47_language_code("en_US"));
    }

    #[test]
    fn test_url_like() {
        assert!(is_url_like_text("https://example.com/page"));
        assert!(is_url_like_text("www.example.com"));
        assert!(is_url_like_text("example.com/path"));
        assert!(!is_url_like_text("Read the report"));
    }

    #[test]
    fn test_icon_detection() {
        assert!(is_icon_class("icon-close"));
        assert!(is_icon_class("fa-times ml-2"));
        assert!(is_icon_class("material-icons"));
        assert!(!is_icon_class("btn btn-primary"));
        assert!(is_icon_glyph_text("×"));
        assert!(is_icon_glyph_text("☰"));
        assert!(!is_icon_glyph_text("Close"));
    }

    #[test]
    fn test_line_col() {
        let text = "ab\ncd\nef";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 3), (2, 1));
        assert_eq!(line_col(text, 7), (3, 2));
    }
}
