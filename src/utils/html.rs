//! Markup helpers used by the template composer and the email channel.

use pulldown_cmark::{Options, Parser, html as md_html};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Anything shaped like an opening or closing tag.
static TAG_PROBE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[a-z][\s\S]*>").unwrap());

/// Single tag, non-greedy.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<.*?>").unwrap());

/// Hexadecimal, decimal or basic named character reference.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|(lt|gt|quot|apos|amp|nbsp));").unwrap()
});

/// Returns `true` when `content` contains a tag-like substring.
///
/// A structural probe, not a parser: `a < b` is not markup, `<p>` is.
pub fn looks_like_markup(content: &str) -> bool {
    TAG_PROBE.is_match(content)
}

/// Converts lightweight markup (CommonMark plus tables and strikethrough) to HTML.
///
/// The output is NOT sanitized.
pub fn markdown_to_html(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options);
    let mut out = String::with_capacity(content.len() * 3 / 2);
    md_html::push_html(&mut out, parser);
    out
}

/// Allow-list sanitizer for untrusted markup.
///
/// Drops `<script>` and `<style>` elements including their content, strips event
/// handler attributes and restricts link schemes to http, https and mailto. Common
/// formatting tags (paragraphs, emphasis, lists, headings, tables, links) survive.
pub fn sanitize(content: &str) -> String {
    ammonia::Builder::default()
        .url_schemes(HashSet::from(["http", "https", "mailto"]))
        .clean(content)
        .to_string()
}

/// Resolves character references in a single pass, so `&#38;lt;` becomes the
/// literal `&lt;`. References to invalid code points are left untouched.
fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    Some("amp") => Some('&'),
                    Some("nbsp") => Some(' '),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Plain-text alternative of a rendered document.
///
/// Tags are stripped, character references decoded, every line trimmed and runs
/// of blank lines collapsed to one.
pub fn to_plain_text(html: &str) -> String {
    let stripped = TAG.replace_all(html, "");
    let decoded = decode_entities(&stripped);

    let mut out = String::with_capacity(decoded.len());
    let mut blank_run = true;
    for line in decoded.lines().map(str::trim) {
        if line.is_empty() {
            if !blank_run {
                out.push('\n');
            }
            blank_run = true;
            continue;
        }
        out.push_str(line);
        out.push('\n');
        blank_run = false;
    }
    out.trim_end().to_string()
}

/// Escapes text for inclusion in an HTML element or quoted attribute.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_markup() {
        assert!(looks_like_markup("<p>hello</p>"));
        assert!(looks_like_markup("text with <br> inside"));
        assert!(looks_like_markup("</div>"));
        assert!(!looks_like_markup("plain text"));
        assert!(!looks_like_markup("2 < 3 and 5 > 4"));
        assert!(!looks_like_markup("**bold** and _italic_"));
    }

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("# Title\n\nSome **bold** text");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_sanitize_removes_script_and_handlers() {
        let dirty = r#"<p onclick="steal()">Hi</p><script>alert('x')</script><style>p{}</style>"#;
        let clean = sanitize(dirty);

        assert!(clean.contains("<p>Hi</p>"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("alert"));
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("style"));
    }

    #[test]
    fn test_sanitize_keeps_formatting_and_safe_links() {
        let clean = sanitize(
            r#"<strong>a</strong><em>b</em><a href="https://example.com">ok</a><a href="javascript:alert(1)">bad</a>"#,
        );

        assert!(clean.contains("<strong>a</strong>"));
        assert!(clean.contains("<em>b</em>"));
        assert!(clean.contains("https://example.com"));
        assert!(!clean.contains("javascript"));
    }

    #[test]
    fn test_to_plain_text() {
        let html = "<html>\n  <body>\n    <h1>Title</h1>\n\n\n\n    <p>Tom &amp; Jerry</p>\n  </body>\n</html>\n";
        assert_eq!(to_plain_text(html), "Title\n\nTom & Jerry");
    }

    #[test]
    fn test_to_plain_text_decodes_numeric_references() {
        let html = "<p>Re: &#34;quote&#34; it&#x27;s &#39;ok&#39; &#X41;</p>";
        assert_eq!(to_plain_text(html), "Re: \"quote\" it's 'ok' A");
    }

    #[test]
    fn test_to_plain_text_keeps_escaped_references_literal() {
        assert_eq!(to_plain_text("<p>&amp;#34; &#38;lt; &#1114112;</p>"), "&#34; &lt; &#1114112;");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(
            escape_text(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }
}
