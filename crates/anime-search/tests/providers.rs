//! Provider tests against mock HTTP servers.
//!
//! These tests use wiremock to stand in for the Jikan and AniList APIs so the
//! request shape and response mapping are checked without network access.

use anime_search::{AniListClient, JikanClient, SearchController, SearchError, SearchOutcome, SearchProvider, SearchQuery};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jikan(server: &MockServer) -> JikanClient {
    JikanClient::new(server.uri(), Duration::from_secs(5), 0.0, 0).expect("client")
}

fn anilist(server: &MockServer) -> AniListClient {
    AniListClient::new(server.uri(), Duration::from_secs(5), 0.0, 0).expect("client")
}

fn jikan_page() -> serde_json::Value {
    json!({
        "pagination": { "last_visible_page": 1, "has_next_page": false },
        "data": [
            {
                "mal_id": 20,
                "title": "Naruto",
                "type": "TV",
                "episodes": 220,
                "score": 8.0,
                "images": { "jpg": { "image_url": "https://cdn.example/naruto.jpg" } },
                "synopsis": "Moments prior to Naruto Uzumaki's birth...",
                "genres": [{ "mal_id": 1, "type": "anime", "name": "Action", "url": "" }]
            },
            {
                "mal_id": 1735,
                "title": "Naruto: Shippuuden",
                "type": "TV",
                "episodes": 500,
                "score": 8.28,
                "images": { "jpg": { "image_url": "https://cdn.example/shippuden.jpg" } },
                "synopsis": null,
                "genres": [{ "mal_id": 2, "type": "anime", "name": "Adventure", "url": "" }]
            }
        ]
    })
}

// =============================================================================
// Jikan
// =============================================================================

mod jikan_provider {
    use super::*;

    #[tokio::test]
    async fn test_search_sends_query_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anime"))
            .and(query_param("q", "naruto"))
            .and(query_param("limit", "24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jikan_page()))
            .expect(1)
            .mount(&server)
            .await;

        let results = jikan(&server)
            .search(&SearchQuery::new("naruto", 24))
            .await
            .expect("search succeeds");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Naruto");
        assert_eq!(results[1].score, Some(8.28));
        assert!(results[1].genres.contains("Adventure"));
    }

    #[tokio::test]
    async fn test_empty_text_omits_q() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anime"))
            .and(|request: &wiremock::Request| !request.url.query_pairs().any(|(key, _)| key == "q"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let results = jikan(&server).search(&SearchQuery::new("  ", 24)).await.expect("search");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anime"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "status": 503,
                "type": "UpstreamException",
                "message": "MyAnimeList is down"
            })))
            .mount(&server)
            .await;

        let err = jikan(&server)
            .search(&SearchQuery::new("naruto", 24))
            .await
            .unwrap_err();

        match err {
            SearchError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "MyAnimeList is down");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anime"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = jikan(&server)
            .search(&SearchQuery::new("naruto", 24))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_categories_from_genres_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genres/anime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "mal_id": 1, "name": "Action", "url": "", "count": 5000 },
                    { "mal_id": 4, "name": "Comedy", "url": "", "count": 7000 }
                ]
            })))
            .mount(&server)
            .await;

        let categories = jikan(&server).categories().await.expect("categories");
        assert_eq!(categories, vec!["Action", "Comedy"]);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let client = JikanClient::new("http://127.0.0.1:9", Duration::from_secs(2), 0.0, 0).expect("client");
        let err = client.search(&SearchQuery::new("naruto", 24)).await.unwrap_err();
        assert!(matches!(err, SearchError::Request(_)));
    }
}

// =============================================================================
// AniList
// =============================================================================

mod anilist_provider {
    use super::*;

    #[tokio::test]
    async fn test_search_posts_graphql_variables() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(json!({ "variables": { "search": "death note", "perPage": 10 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "Page": { "media": [{
                    "id": 1535,
                    "title": { "romaji": "Death Note", "english": "Death Note", "native": null },
                    "format": "TV",
                    "episodes": 37,
                    "averageScore": 84,
                    "coverImage": { "large": "https://cdn.example/dn.jpg", "medium": null },
                    "description": "A notebook.<br>A god of death.",
                    "genres": ["Mystery", "Supernatural"]
                }] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = anilist(&server)
            .search(&SearchQuery::new("death note", 10))
            .await
            .expect("search succeeds");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, Some(8.4));
        assert_eq!(results[0].synopsis.as_deref(), Some("A notebook.\nA god of death."));
    }

    #[tokio::test]
    async fn test_graphql_errors_are_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Invalid query", "status": 400 }]
            })))
            .mount(&server)
            .await;

        let err = anilist(&server)
            .search(&SearchQuery::new("x", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Api(ref m) if m == "Invalid query"));
    }

    #[tokio::test]
    async fn test_rate_limited_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Too Many Requests.", "status": 429 }]
            })))
            .mount(&server)
            .await;

        let err = anilist(&server)
            .search(&SearchQuery::new("x", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_genre_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "GenreCollection": ["Action", "Drama"] }
            })))
            .mount(&server)
            .await;

        let categories = anilist(&server).categories().await.expect("categories");
        assert_eq!(categories, vec!["Action", "Drama"]);
    }
}

// =============================================================================
// Controller end to end
// =============================================================================

mod controller_with_provider {
    use super::*;

    #[tokio::test]
    async fn test_search_then_filter_against_mock() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jikan_page()))
            .mount(&server)
            .await;

        let provider = jikan(&server);
        let mut controller = SearchController::new(24);

        let outcome = controller.submit_search(&provider, "naruto", Some("Action")).await;
        assert_eq!(outcome, Ok(SearchOutcome::Rendered { fetched: 2, shown: 1 }));
        assert_eq!(controller.container().matches("class=\"result-card\"").count(), 1);
    }

    #[tokio::test]
    async fn test_zero_matches_renders_no_results_card() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let provider = jikan(&server);
        let mut controller = SearchController::new(24);

        let outcome = controller.submit_search(&provider, "naruto", None).await;
        assert_eq!(outcome, Ok(SearchOutcome::NoResults));
        assert_eq!(
            controller.container(),
            shared::html::placeholder_card(shared::html::NO_RESULTS)
        );
    }

    #[tokio::test]
    async fn test_server_error_renders_error_card() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = jikan(&server);
        let mut controller = SearchController::new(24);

        let outcome = controller.submit_search(&provider, "naruto", None).await;
        assert_eq!(outcome, Ok(SearchOutcome::Failed));
        assert!(controller.container().contains(shared::html::LOAD_ERROR));
    }

    #[tokio::test]
    async fn test_saved_record_appears_on_watchlist_page() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jikan_page()))
            .mount(&server)
            .await;

        let temp_dir = tempfile::TempDir::new()?;
        let storage = temp_dir.path().join("storage.db");

        let provider = jikan(&server);
        let mut controller = SearchController::new(24);
        controller.submit_search(&provider, "naruto", None).await.ok();
        assert!(controller.select_card(1));

        {
            let mut list = watchlist::Watchlist::new(shared::SqliteStore::open(&storage, "http://localhost")?);
            let notice = controller.save_selected(&mut list)?;
            assert_eq!(notice.to_string(), "\"Naruto: Shippuuden\" was added to your watchlist.");
        }

        let reopened = watchlist::Watchlist::new(shared::SqliteStore::open(&storage, "http://localhost")?);
        let page = watchlist::WatchlistPage::new(reopened);
        assert!(!page.is_empty());
        assert!(page.container().contains("Naruto: Shippuuden"));
        assert!(page.container().contains("Episodes: 500"));
        Ok(())
    }
}
