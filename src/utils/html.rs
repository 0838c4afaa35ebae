//! HTML escaping for text spliced into generated pages.

use std::borrow::Cow;

/// Escape `<`, `>`, `&`, `"` and `'`. Borrows when nothing needs escaping.
///
/// ```ignore
/// assert_eq!(escape("a<b"), "a&lt;b");
/// ```
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
