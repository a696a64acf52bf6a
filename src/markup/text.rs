//! Slide text preparation for markup: whitespace collapsing, word-boundary
//! shortening and HTML escaping.

/// Marker appended to shortened text.
pub const ELLIPSIS: &str = "...";

/// Collapse runs of whitespace (including newlines) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `width` characters, ellipsis included.
///
/// Whitespace is collapsed first.  Text that fits is returned unchanged;
/// otherwise whole words are kept while `words + "..."` still fits.  A word
/// is never cut: if not even the first word fits, only the ellipsis is
/// returned.
///
/// ```
/// use web_story::markup::text::shorten;
///
/// assert_eq!(shorten("Hello   world", 20), "Hello world");
/// assert_eq!(shorten("Hello world again", 14), "Hello world...");
/// ```
pub fn shorten(text: &str, width: usize) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(ELLIPSIS.len());
    let mut kept = String::new();
    let mut kept_chars = 0;

    for word in collapsed.split(' ') {
        let word_chars = word.chars().count();
        let needed = if kept.is_empty() { word_chars } else { word_chars + 1 };
        if kept_chars + needed > budget {
            break;
        }
        if !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(word);
        kept_chars += needed;
    }

    kept.push_str(ELLIPSIS);
    kept
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Shorten then escape, in that order, so escapes never count toward the
/// visible width and are never cut in half.
pub fn display_text(text: &str, width: usize) -> String {
    escape_html(&shorten(text, width))
}
