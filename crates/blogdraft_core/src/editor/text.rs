//! Text helpers over rich-text paragraph content.
//!
//! Paragraph bodies come from an HTML-emitting widget, so "empty" must be
//! judged on rendered output rather than raw length: `<p></p>` is empty, an
//! image-only `<p><img src="a.png"></p>` is not.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static HTML_ENTITY_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(nbsp|#160|#xA0);").expect("valid entity regex"));
static EMBEDDED_MEDIA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(img|video|audio|iframe|embed|object|picture|svg)\b")
        .expect("valid media regex")
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const PREVIEW_MAX_CHARS: usize = 80;

/// Visible text with tags removed and whitespace collapsed.
pub fn visible_text(content: &str) -> String {
    let without_tags = HTML_TAG_RE.replace_all(content, " ");
    let without_nbsp = HTML_ENTITY_SPACE_RE.replace_all(&without_tags, " ");
    WHITESPACE_RE
        .replace_all(&without_nbsp, " ")
        .trim()
        .to_string()
}

/// Returns whether content renders any visible text.
pub fn has_visible_text(content: &str) -> bool {
    !visible_text(content).is_empty()
}

/// Returns whether content renders anything: text or embedded media.
pub fn has_rendered_content(content: &str) -> bool {
    EMBEDDED_MEDIA_RE.is_match(content) || has_visible_text(content)
}

/// Short single-line summary for structure panels.
pub fn preview_text(content: &str) -> String {
    let text = visible_text(content);
    if text.chars().count() <= PREVIEW_MAX_CHARS {
        return text;
    }
    let mut truncated: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{has_rendered_content, has_visible_text, preview_text, visible_text};

    #[test]
    fn empty_widget_markup_has_no_visible_text() {
        assert!(!has_visible_text("<p></p>"));
        assert!(!has_visible_text("<p>&nbsp;</p>\n"));
        assert!(has_visible_text("<p>Hello</p>"));
    }

    #[test]
    fn embedded_media_counts_as_content() {
        assert!(has_rendered_content(r#"<p><img src="a.png"></p>"#));
        assert!(has_rendered_content("<VIDEO controls></VIDEO>"));
        assert!(!has_rendered_content("<p><br></p>"));
        assert!(!has_rendered_content("<imgx>"));
    }

    #[test]
    fn visible_text_collapses_whitespace() {
        assert_eq!(visible_text("<h2>Title</h2>\n<p>a   b</p>"), "Title a b");
    }

    #[test]
    fn preview_text_truncates_long_content() {
        let long = "word ".repeat(40);
        let preview = preview_text(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 83);
    }
}
