//! Response types for the Jikan v4 and AniList GraphQL APIs.
//!
//! Both providers' records convert into the provider-neutral `SearchResult`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared::{SearchResult, UNKNOWN};

// ========== Jikan ==========

/// Simple data wrapper (`{ "data": [...] }`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Genre/Theme/Demographic item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryItem {
    pub mal_id: u32,
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

/// One record of `GET /anime`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeEntry {
    pub mal_id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f64>,
    pub images: Option<AnimeImages>,
    pub synopsis: Option<String>,
    #[serde(default)]
    pub genres: Vec<MalEntity>,
}

/// Anime images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeImages {
    pub jpg: Option<ImageSet>,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// MAL entity (genre, studio, producer, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub name: String,
}

/// Error response from Jikan API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanError {
    pub status: u16,
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

impl From<AnimeEntry> for SearchResult {
    fn from(entry: AnimeEntry) -> Self {
        let cover_image_url = entry
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| jpg.image_url)
            .filter(|url| !url.is_empty());

        Self {
            id: entry.mal_id,
            title: entry.title,
            kind: entry.anime_type,
            episode_count: entry.episodes,
            score: entry.score,
            cover_image_url,
            synopsis: entry.synopsis.filter(|s| !s.trim().is_empty()),
            genres: entry.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

// ========== AniList ==========

/// GraphQL envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` of the media search query
#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: MediaPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaPage {
    #[serde(default)]
    pub media: Vec<Media>,
}

/// `data` of the genre collection query
#[derive(Debug, Clone, Deserialize)]
pub struct GenreCollectionData {
    #[serde(rename = "GenreCollection", default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: u64,
    pub title: MediaTitle,
    pub format: Option<String>,
    pub episodes: Option<u32>,
    /// 0-100
    pub average_score: Option<u32>,
    pub cover_image: Option<CoverImage>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverImage {
    pub large: Option<String>,
    pub medium: Option<String>,
}

/// Map AniList's `MediaFormat` onto the type names Jikan uses
pub fn format_label(format: &str) -> String {
    match format {
        "TV" => "TV".to_string(),
        "TV_SHORT" => "TV Short".to_string(),
        "MOVIE" => "Movie".to_string(),
        "SPECIAL" => "Special".to_string(),
        "OVA" => "OVA".to_string(),
        "ONA" => "ONA".to_string(),
        "MUSIC" => "Music".to_string(),
        other => other.to_string(),
    }
}

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Reduce an AniList HTML description to plain text
pub fn plain_text(description: &str) -> String {
    let text = LINE_BREAK.replace_all(description, "\n");
    let text = TAG.replace_all(&text, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

impl From<Media> for SearchResult {
    fn from(media: Media) -> Self {
        let MediaTitle {
            romaji,
            english,
            native,
        } = media.title;
        let title = romaji
            .or(english)
            .or(native)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let cover_image_url = media
            .cover_image
            .and_then(|cover| cover.large.or(cover.medium))
            .filter(|url| !url.is_empty());

        Self {
            id: media.id,
            title,
            kind: media.format.as_deref().map(format_label),
            episode_count: media.episodes,
            score: media.average_score.map(|score| f64::from(score) / 10.0),
            cover_image_url,
            synopsis: media
                .description
                .map(|d| plain_text(&d))
                .filter(|d| !d.is_empty()),
            genres: media.genres.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jikan_entry_conversion() {
        let json = r#"{
            "mal_id": 20,
            "url": "https://myanimelist.net/anime/20/Naruto",
            "images": { "jpg": { "image_url": "https://cdn.myanimelist.net/images/anime/13/17405.jpg" } },
            "title": "Naruto",
            "type": "TV",
            "episodes": 220,
            "score": 8.0,
            "synopsis": "Moments prior to Naruto Uzumaki's birth...",
            "genres": [
                { "mal_id": 1, "type": "anime", "name": "Action", "url": "" },
                { "mal_id": 2, "type": "anime", "name": "Adventure", "url": "" }
            ]
        }"#;

        let entry: AnimeEntry = serde_json::from_str(json).unwrap();
        let result = SearchResult::from(entry);

        assert_eq!(result.id, 20);
        assert_eq!(result.kind.as_deref(), Some("TV"));
        assert_eq!(result.episode_count, Some(220));
        assert!(result.cover_image_url.unwrap().ends_with("17405.jpg"));
        assert!(result.genres.contains("Adventure"));
    }

    #[test]
    fn test_jikan_entry_with_nulls() {
        let json = r#"{
            "mal_id": 1,
            "title": "Upcoming",
            "type": null,
            "episodes": null,
            "score": null,
            "images": { "jpg": { "image_url": "" } },
            "synopsis": null
        }"#;

        let result = SearchResult::from(serde_json::from_str::<AnimeEntry>(json).unwrap());
        assert_eq!(result.kind, None);
        assert_eq!(result.cover_image_url, None);
        assert!(result.genres.is_empty());
    }

    #[test]
    fn test_missing_data_reads_as_empty() {
        let response: DataResponse<AnimeEntry> = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_anilist_media_conversion() {
        let json = r#"{
            "id": 1535,
            "title": { "romaji": "Death Note", "english": "Death Note", "native": "デスノート" },
            "format": "TV",
            "episodes": 37,
            "averageScore": 84,
            "coverImage": { "large": "https://s4.anilist.co/cover.jpg" },
            "description": "Light Yagami is an ace student.<br><br>Then <i>Ryuk</i> drops a notebook &amp; more.",
            "genres": ["Mystery", "Psychological", "Supernatural"]
        }"#;

        let result = SearchResult::from(serde_json::from_str::<Media>(json).unwrap());
        assert_eq!(result.title, "Death Note");
        assert_eq!(result.score, Some(8.4));
        assert_eq!(
            result.synopsis.as_deref(),
            Some("Light Yagami is an ace student.\n\nThen Ryuk drops a notebook & more.")
        );
        assert!(result.genres.contains("Psychological"));
    }

    #[test]
    fn test_anilist_title_fallback_and_format() {
        let json = r#"{
            "id": 5,
            "title": { "romaji": null, "english": "Only English", "native": null },
            "format": "MOVIE",
            "genres": []
        }"#;

        let result = SearchResult::from(serde_json::from_str::<Media>(json).unwrap());
        assert_eq!(result.title, "Only English");
        assert_eq!(result.kind.as_deref(), Some("Movie"));
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_plain_text_keeps_literal_angle_brackets_as_text() {
        assert_eq!(plain_text("a &lt;b&gt; c"), "a <b> c");
        assert_eq!(plain_text("line<br/>break"), "line\nbreak");
    }
}
