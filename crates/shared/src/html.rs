//! HTML helpers: escaping, placeholder cards and the page shell.
//!
//! Everything that reaches markup from a user or a remote API goes through
//! [`escape`] first, both as element text and as quoted attribute values.

use std::fmt::Write;

/// Text shown while a search is in flight
pub const SEARCHING: &str = "Searching...";

/// Text shown when a search (or its filter) matched nothing
pub const NO_RESULTS: &str = "No results found";

/// Text shown when the search request failed
pub const LOAD_ERROR: &str = "Error loading results";

/// Escape the five reserved characters `& < > " '`
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A single card carrying only a status message
pub fn placeholder_card(message: &str) -> String {
    format!(
        "<div class=\"result-card\">\n  <div class=\"result-title\">{}</div>\n</div>\n",
        escape(message)
    )
}

/// Wrap a page body in a complete HTML document
pub fn document(title: &str, body: &str) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"en\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "  <meta charset=\"utf-8\">");
    let _ = writeln!(html, "  <title>{}</title>", escape(title));
    let _ = writeln!(html, "  <link rel=\"stylesheet\" href=\"style.css\">");
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    html.push_str(body);
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}
