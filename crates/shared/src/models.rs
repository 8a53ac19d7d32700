//! Data models shared by the search and watchlist pages.
//!
//! `SearchResult` is what a provider returns for one record, `WatchlistEntry`
//! is the snapshot persisted when the user saves a record. Both render through
//! the `RecordView` trait so cards and the modal never care which one they got.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Placeholder for a missing type or episode count
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing score
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a missing synopsis
pub const NO_DESCRIPTION: &str = "No description available.";

/// Storage key holding the serialized watchlist
pub const WATCHLIST_KEY: &str = "watchlist";

/// One record returned by a search provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Provider-side identifier
    pub id: u64,
    pub title: String,
    /// TV, Movie, OVA, ...
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub episode_count: Option<u32>,
    /// Score on a 0-10 scale
    pub score: Option<f64>,
    pub cover_image_url: Option<String>,
    pub synopsis: Option<String>,
    pub genres: BTreeSet<String>,
}

impl SearchResult {
    /// Exact, case-sensitive category match against the genre set or the type
    pub fn matches_category(&self, category: &str) -> bool {
        self.genres.contains(category) || self.kind.as_deref() == Some(category)
    }
}

/// Persisted snapshot of a record at save time
///
/// Deserialization is lenient so lists written with display placeholders
/// (`"Unknown"`, `"N/A"`) or numbers stored as strings still load. Such
/// content is normalized the next time the list is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub episodes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_synopsis")]
    pub synopsis: Option<String>,
}

impl From<&SearchResult> for WatchlistEntry {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.title.clone(),
            image: result.cover_image_url.clone(),
            kind: result.kind.clone(),
            episodes: result.episode_count,
            score: result.score,
            synopsis: result.synopsis.clone(),
        }
    }
}

/// The record currently shown in the detail modal
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedRecord {
    Search(SearchResult),
    Saved(WatchlistEntry),
}

impl SelectedRecord {
    /// Snapshot to persist when the user saves this record
    pub fn to_entry(&self) -> WatchlistEntry {
        match self {
            SelectedRecord::Search(result) => WatchlistEntry::from(result),
            SelectedRecord::Saved(entry) => entry.clone(),
        }
    }

    fn view(&self) -> &dyn RecordView {
        match self {
            SelectedRecord::Search(result) => result,
            SelectedRecord::Saved(entry) => entry,
        }
    }
}

/// Display accessors shared by everything that renders a record
///
/// Every label falls back to a placeholder, never to an empty string.
pub trait RecordView {
    fn title(&self) -> &str;
    fn image(&self) -> Option<&str>;
    fn kind(&self) -> Option<&str>;
    fn episodes(&self) -> Option<u32>;
    fn score(&self) -> Option<f64>;
    fn synopsis(&self) -> Option<&str>;

    fn image_url(&self) -> &str {
        self.image().unwrap_or("")
    }

    fn kind_label(&self) -> String {
        self.kind().unwrap_or(UNKNOWN).to_string()
    }

    fn episodes_label(&self) -> String {
        match self.episodes() {
            Some(n) if n > 0 => n.to_string(),
            _ => UNKNOWN.to_string(),
        }
    }

    fn score_label(&self) -> String {
        match self.score() {
            Some(s) if s > 0.0 => s.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    fn synopsis_label(&self) -> &str {
        self.synopsis().unwrap_or(NO_DESCRIPTION)
    }

    /// `Type: X · Episodes: Y · Score: Z`
    fn info_line(&self) -> String {
        format!(
            "Type: {} · Episodes: {} · Score: {}",
            self.kind_label(),
            self.episodes_label(),
            self.score_label()
        )
    }
}

impl RecordView for SearchResult {
    fn title(&self) -> &str {
        &self.title
    }
    fn image(&self) -> Option<&str> {
        self.cover_image_url.as_deref()
    }
    fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
    fn episodes(&self) -> Option<u32> {
        self.episode_count
    }
    fn score(&self) -> Option<f64> {
        self.score
    }
    fn synopsis(&self) -> Option<&str> {
        self.synopsis.as_deref()
    }
}

impl RecordView for WatchlistEntry {
    fn title(&self) -> &str {
        &self.title
    }
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
    fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
    fn episodes(&self) -> Option<u32> {
        self.episodes
    }
    fn score(&self) -> Option<f64> {
        self.score
    }
    fn synopsis(&self) -> Option<&str> {
        self.synopsis.as_deref()
    }
}

impl RecordView for SelectedRecord {
    fn title(&self) -> &str {
        self.view().title()
    }
    fn image(&self) -> Option<&str> {
        self.view().image()
    }
    fn kind(&self) -> Option<&str> {
        self.view().kind()
    }
    fn episodes(&self) -> Option<u32> {
        self.view().episodes()
    }
    fn score(&self) -> Option<f64> {
        self.view().score()
    }
    fn synopsis(&self) -> Option<&str> {
        self.view().synopsis()
    }
}

/// Text field that reads as missing when empty or equal to `placeholder`
fn text_unless<'de, D: Deserializer<'de>>(
    deserializer: D,
    placeholder: Option<&str>,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || Some(trimmed) == placeholder {
                None
            } else {
                Some(s)
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    text_unless(deserializer, None)
}

fn lenient_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    text_unless(deserializer, Some(UNKNOWN))
}

fn lenient_synopsis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    text_unless(deserializer, Some(NO_DESCRIPTION))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SearchResult {
        SearchResult {
            id: 20,
            title: "Naruto".to_string(),
            kind: Some("TV".to_string()),
            episode_count: Some(220),
            score: Some(8.0),
            cover_image_url: Some("https://cdn.example/naruto.jpg".to_string()),
            synopsis: Some("Ninja stuff.".to_string()),
            genres: ["Action", "Adventure"].iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_matches_category_is_exact() {
        let result = sample_result();
        assert!(result.matches_category("Action"));
        assert!(result.matches_category("TV"));
        assert!(!result.matches_category("action"));
        assert!(!result.matches_category("Romance"));
    }

    #[test]
    fn test_entry_snapshot_from_result() {
        let entry = WatchlistEntry::from(&sample_result());
        assert_eq!(entry.title, "Naruto");
        assert_eq!(entry.image.as_deref(), Some("https://cdn.example/naruto.jpg"));
        assert_eq!(entry.episodes, Some(220));
    }

    #[test]
    fn test_info_line_with_placeholders() {
        let mut result = sample_result();
        assert_eq!(result.info_line(), "Type: TV · Episodes: 220 · Score: 8");

        result.kind = None;
        result.episode_count = None;
        result.score = None;
        result.synopsis = None;
        assert_eq!(result.info_line(), "Type: Unknown · Episodes: Unknown · Score: N/A");
        assert_eq!(result.synopsis_label(), NO_DESCRIPTION);
    }

    #[test]
    fn test_entry_serializes_type_key() {
        let entry = WatchlistEntry::from(&sample_result());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "TV");
        assert_eq!(json["episodes"], 220);
    }

    #[test]
    fn test_lenient_entry_parsing() {
        let json = r#"{
            "title": "Cowboy Bebop",
            "image": "",
            "type": "Unknown",
            "episodes": "26",
            "score": "N/A",
            "synopsis": "No description available."
        }"#;

        let entry: WatchlistEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.title, "Cowboy Bebop");
        assert_eq!(entry.image, None);
        assert_eq!(entry.kind, None);
        assert_eq!(entry.episodes, Some(26));
        assert_eq!(entry.score, None);
        assert_eq!(entry.synopsis, None);
    }

    #[test]
    fn test_entry_missing_fields_default_to_none() {
        let entry: WatchlistEntry = serde_json::from_str(r#"{"title":"Solo"}"#).unwrap();
        assert_eq!(entry.kind, None);
        assert_eq!(entry.episodes, None);
    }

    #[test]
    fn test_selected_record_to_entry() {
        let selected = SelectedRecord::Search(sample_result());
        assert_eq!(selected.title(), "Naruto");
        assert_eq!(selected.to_entry().kind.as_deref(), Some("TV"));
    }

    #[test]
    fn test_placeholders_only_collapse_in_their_own_field() {
        let json = r#"{
            "title": "Unknown",
            "image": "N/A",
            "type": "N/A",
            "episodes": "Unknown",
            "synopsis": "Unknown"
        }"#;

        let entry: WatchlistEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.title, "Unknown");
        assert_eq!(entry.image.as_deref(), Some("N/A"));
        assert_eq!(entry.kind.as_deref(), Some("N/A"));
        assert_eq!(entry.episodes, None);
        assert_eq!(entry.synopsis.as_deref(), Some("Unknown"));
    }
}
