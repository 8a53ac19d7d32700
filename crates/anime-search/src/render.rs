//! Card renderer and search page document.
//!
//! Rendering is purely presentational: cards carry a `data-card-id` and the
//! controller keeps the structured record for each id.

use shared::html::{document, escape};
use shared::{Modal, RecordView, SearchResult};
use std::fmt::Write;

/// Render one card per record; the card id is the record's position
pub fn render_cards(records: &[SearchResult]) -> String {
    let mut html = String::new();

    for (card_id, record) in records.iter().enumerate() {
        let title = escape(record.title());
        let _ = writeln!(html, "<div class=\"result-card\" data-card-id=\"{card_id}\">");
        let _ = writeln!(html, "  <div class=\"result-image-wrapper\">");
        let _ = writeln!(
            html,
            "    <img src=\"{}\" class=\"result-image\" alt=\"{title}\">",
            escape(record.image_url())
        );
        let _ = writeln!(html, "  </div>");
        let _ = writeln!(html, "  <div class=\"result-title\">{title}</div>");
        let _ = writeln!(html, "  <div class=\"result-info\">{}</div>", escape(&record.info_line()));
        let _ = writeln!(html, "</div>");
    }

    html
}

/// Inputs of the search bar, echoed back into the page
#[derive(Debug, Clone, Copy)]
pub struct SearchForm<'a> {
    pub query: &'a str,
    pub category: Option<&'a str>,
    pub categories: &'a [String],
}

/// The complete search page document
pub fn search_page(form: SearchForm<'_>, results: &str, modal: &Modal) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<header class=\"search-header\">");
    let _ = writeln!(body, "  <h1>Anime Search</h1>");
    let _ = writeln!(
        body,
        "  <a href=\"{}\" class=\"watchlist-link\">My Watchlist</a>",
        shared::paths::WATCHLIST_PAGE
    );
    let _ = writeln!(body, "</header>");
    let _ = writeln!(body, "<div class=\"search-bar\">");
    let _ = writeln!(
        body,
        "  <input id=\"searchInput\" type=\"text\" placeholder=\"Search anime...\" value=\"{}\">",
        escape(form.query)
    );
    let _ = writeln!(body, "  <select id=\"genreFilter\">");
    let _ = writeln!(
        body,
        "    <option value=\"\"{}>Pick a vibe</option>",
        if form.category.is_none() { " selected" } else { "" }
    );
    for category in form.categories {
        let selected = if form.category == Some(category.as_str()) {
            " selected"
        } else {
            ""
        };
        let value = escape(category);
        let _ = writeln!(body, "    <option value=\"{value}\"{selected}>{value}</option>");
    }
    let _ = writeln!(body, "  </select>");
    let _ = writeln!(body, "  <button id=\"searchButton\">Search</button>");
    let _ = writeln!(body, "</div>");
    let _ = writeln!(body, "<div id=\"results\" class=\"results-grid\">");
    body.push_str(results);
    let _ = writeln!(body, "</div>");
    body.push_str(&modal.render());

    document("Anime Search", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, synopsis: &str) -> SearchResult {
        SearchResult {
            id: 1,
            title: title.to_string(),
            kind: None,
            episode_count: None,
            score: None,
            cover_image_url: Some("https://cdn.example/a.jpg?x=1&y=\"2\"".to_string()),
            synopsis: Some(synopsis.to_string()),
            genres: Default::default(),
        }
    }

    #[test]
    fn test_one_card_per_record() {
        let records = vec![record("A", ""), record("B", ""), record("C", "")];
        let html = render_cards(&records);
        assert_eq!(html.matches("class=\"result-card\"").count(), 3);
        assert!(html.contains("data-card-id=\"2\""));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let records = vec![record("A", "x"), record("B", "y")];
        assert_eq!(render_cards(&records), render_cards(&records));
    }

    #[test]
    fn test_script_never_rendered_raw() {
        let html = render_cards(&[record("<script>alert('x')</script>", "")]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
    }

    #[test]
    fn test_attribute_values_escaped() {
        let html = render_cards(&[record("A", "")]);
        assert!(html.contains("src=\"https://cdn.example/a.jpg?x=1&amp;y=&quot;2&quot;\""));
    }

    #[test]
    fn test_missing_fields_render_placeholders() {
        let html = render_cards(&[record("A", "")]);
        assert!(html.contains("Type: Unknown · Episodes: Unknown · Score: N/A"));
        assert!(!html.contains("null"));
        assert!(!html.contains("undefined"));
    }

    #[test]
    fn test_search_page_marks_selected_category() {
        let categories = vec!["Action".to_string(), "Drama".to_string()];
        let html = search_page(
            SearchForm {
                query: "\"naruto\"",
                category: Some("Drama"),
                categories: &categories,
            },
            "",
            &Modal::new(),
        );

        assert!(html.contains("value=\"&quot;naruto&quot;\""));
        assert!(html.contains("<option value=\"Drama\" selected>Drama</option>"));
        assert!(html.contains("<option value=\"Action\">Action</option>"));
        assert!(html.contains("id=\"results\""));
        assert!(html.contains("id=\"mangaModal\""));
    }
}
