//! HTML escaping for user-supplied text.
//!
//! Patient names, phone numbers, e-mail addresses and visit reasons come from
//! the public booking form and are displayed verbatim on the admin dashboard.
//! They must pass through [`escape_html`] before being placed in markup.

/// Escapes the five HTML-significant characters `& < > " '`.
///
/// ```rust
/// use clinic_core::escape_html;
///
/// assert_eq!(escape_html("<script>"), "&lt;script&gt;");
/// ```
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
