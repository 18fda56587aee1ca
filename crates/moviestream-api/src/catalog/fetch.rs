//! Endpoint selection and single-page catalog fetches.

use anyhow::{Context, Result};
use tracing::instrument;

use super::category::Category;
use super::item::CatalogItem;
use crate::tmdb::{ContentType, ListEndpoint, SearchParams, TmdbApi};

/// What to fetch: category, search string, and page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogQuery {
    /// Browsing category.
    pub category: Category,
    /// Raw search input (may be blank or padded).
    pub search_query: String,
    /// Page number, starting at 1.
    pub page: u32,
}

/// Upstream endpoint chosen for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogEndpoint {
    /// Listing endpoint (no search active).
    List(ListEndpoint),
    /// Search endpoint for the given content type.
    Search(ContentType),
}

impl CatalogEndpoint {
    /// Returns the path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::List(endpoint) => endpoint.path(),
            Self::Search(ContentType::Movie) => "search/movie",
            Self::Search(ContentType::Tv) => "search/tv",
        }
    }
}

impl CatalogQuery {
    /// Creates a query for page 1.
    pub fn new(category: Category, search_query: impl Into<String>) -> Self {
        Self {
            category,
            search_query: search_query.into(),
            page: 1,
        }
    }

    /// Sets the page number (values below 1 become 1).
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Returns the trimmed search string, or `None` when blank.
    #[must_use]
    pub fn trimmed_search(&self) -> Option<&str> {
        let trimmed = self.search_query.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Picks the endpoint: search for the category's content type when a
    /// search is active, otherwise the category's listing endpoint.
    #[must_use]
    pub fn endpoint(&self) -> CatalogEndpoint {
        if self.trimmed_search().is_some() {
            CatalogEndpoint::Search(self.category.content_type())
        } else {
            CatalogEndpoint::List(self.category.list_endpoint())
        }
    }
}

/// One page of normalized results.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogPage {
    /// Requested page number.
    pub page: u32,
    /// Upstream-reported total page count.
    pub total_pages: u32,
    /// Upstream-reported total result count.
    pub total_results: u32,
    /// Normalized items on this page.
    pub items: Vec<CatalogItem>,
}

impl CatalogPage {
    /// Whether a further page exists (`page < total_pages`).
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Fetches and normalizes one catalog page with a single request.
///
/// # Errors
///
/// Returns an error if the request fails or the response cannot be decoded.
#[instrument(skip_all, fields(category = %query.category, page = query.page))]
pub async fn fetch_catalog_page<A>(api: &A, query: &CatalogQuery) -> Result<CatalogPage>
where
    A: TmdbApi + Sync,
{
    let endpoint = query.endpoint();
    let response = match endpoint {
        CatalogEndpoint::List(list) => api.list(list, query.page).await,
        CatalogEndpoint::Search(content_type) => {
            let term = query.trimmed_search().unwrap_or_default();
            let params = SearchParams::new(content_type, term).page(query.page);
            api.search(&params).await
        }
    }
    .with_context(|| {
        format!(
            "failed to fetch {} (page {})",
            endpoint.path(),
            query.page
        )
    })?;

    let items: Vec<CatalogItem> = response
        .results
        .into_iter()
        .map(|record| CatalogItem::from_record(record, query.category))
        .collect();

    tracing::debug!(
        items = items.len(),
        total_pages = response.total_pages,
        "catalog page fetched"
    );

    Ok(CatalogPage {
        page: query.page,
        total_pages: response.total_pages,
        total_results: response.total_results,
        items,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;

    use anyhow::bail;

    use super::*;
    use crate::tmdb::{TmdbMediaRecord, TmdbPagedResponse, TmdbTvDetails, TmdbTvSeason};

    /// Request recorded by `RecordingApi`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List(ListEndpoint, u32),
        Search(SearchParams),
    }

    /// Records calls and answers with a fixed page count.
    struct RecordingApi {
        calls: Mutex<Vec<Call>>,
        total_pages: u32,
        fail: bool,
    }

    impl RecordingApi {
        fn new(total_pages: u32) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                total_pages,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0)
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, call: Call, page: u32) -> Result<TmdbPagedResponse> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                bail!("TMDB API error (HTTP 500 Internal Server Error): boom");
            }
            Ok(TmdbPagedResponse {
                page,
                results: vec![TmdbMediaRecord {
                    id: 1,
                    name: Some(String::from("Dark")),
                    first_air_date: Some(String::from("2017-12-01")),
                    ..TmdbMediaRecord::default()
                }],
                total_pages: self.total_pages,
                total_results: self.total_pages.saturating_mul(20),
            })
        }
    }

    impl TmdbApi for RecordingApi {
        async fn list(&self, endpoint: ListEndpoint, page: u32) -> Result<TmdbPagedResponse> {
            self.respond(Call::List(endpoint, page), page)
        }

        async fn search(&self, params: &SearchParams) -> Result<TmdbPagedResponse> {
            self.respond(Call::Search(params.clone()), params.page)
        }

        async fn tv_details(&self, _series_id: u64) -> Result<TmdbTvDetails> {
            bail!("not used")
        }

        async fn tv_season(&self, _series_id: u64, _season_number: u32) -> Result<TmdbTvSeason> {
            bail!("not used")
        }
    }

    #[test]
    fn test_listing_endpoint_per_category_without_search() {
        for (category, path) in [
            (Category::Popular, "movie/popular"),
            (Category::TopRated, "movie/top_rated"),
            (Category::TvShows, "tv/popular"),
        ] {
            // Arrange
            let query = CatalogQuery::new(category, "");

            // Act & Assert
            assert_eq!(query.endpoint().path(), path);
        }
    }

    #[test]
    fn test_search_endpoint_follows_content_type() {
        assert_eq!(
            CatalogQuery::new(Category::Popular, "batman").endpoint(),
            CatalogEndpoint::Search(ContentType::Movie)
        );
        assert_eq!(
            CatalogQuery::new(Category::TopRated, "batman").endpoint(),
            CatalogEndpoint::Search(ContentType::Movie)
        );
        assert_eq!(
            CatalogQuery::new(Category::TvShows, "office").endpoint(),
            CatalogEndpoint::Search(ContentType::Tv)
        );
    }

    #[test]
    fn test_whitespace_search_uses_listing() {
        // Arrange
        let query = CatalogQuery::new(Category::TopRated, "   \t");

        // Act & Assert
        assert_eq!(query.trimmed_search(), None);
        assert_eq!(
            query.endpoint(),
            CatalogEndpoint::List(ListEndpoint::MovieTopRated)
        );
    }

    #[test]
    fn test_page_is_at_least_one() {
        assert_eq!(CatalogQuery::new(Category::Popular, "").page(0).page, 1);
        assert_eq!(CatalogQuery::new(Category::Popular, "").page(4).page, 4);
    }

    #[tokio::test]
    async fn test_popular_first_page_reports_more() {
        // Arrange
        let api = RecordingApi::new(500);
        let query = CatalogQuery::new(Category::Popular, "");

        // Act
        let page = fetch_catalog_page(&api, &query).await.unwrap();

        // Assert
        assert_eq!(api.calls(), vec![Call::List(ListEndpoint::MoviePopular, 1)]);
        assert_eq!(page.total_pages, 500);
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_last_page_reports_no_more() {
        // Arrange
        let api = RecordingApi::new(3);
        let query = CatalogQuery::new(Category::TvShows, "").page(3);

        // Act
        let page = fetch_catalog_page(&api, &query).await.unwrap();

        // Assert
        assert_eq!(api.calls(), vec![Call::List(ListEndpoint::TvPopular, 3)]);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_search_sends_trimmed_query() {
        // Arrange
        let api = RecordingApi::new(1);
        let query = CatalogQuery::new(Category::Popular, "  batman ");

        // Act
        fetch_catalog_page(&api, &query).await.unwrap();

        // Assert
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            Call::Search(SearchParams::new(ContentType::Movie, "batman"))
        );
    }

    #[tokio::test]
    async fn test_items_take_category_media_type() {
        // Arrange
        let api = RecordingApi::new(1);
        let query = CatalogQuery::new(Category::TvShows, "dark");

        // Act
        let page = fetch_catalog_page(&api, &query).await.unwrap();

        // Assert
        assert_eq!(page.items[0].media_type, ContentType::Tv);
        assert_eq!(page.items[0].display_title(), "Dark");
    }

    #[tokio::test]
    async fn test_failure_propagates_upstream_message() {
        // Arrange
        let api = RecordingApi::failing();
        let query = CatalogQuery::new(Category::Popular, "");

        // Act
        let err = fetch_catalog_page(&api, &query).await.unwrap_err();

        // Assert
        let message = format!("{err:#}");
        assert!(message.contains("movie/popular"));
        assert!(message.contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_fetch_against_http_fixture() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let body = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "batman"))
            .and(wiremock::matchers::query_param("page", "1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = crate::tmdb::TmdbClient::builder()
            .base_url(format!("{}/3/", mock_server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(std::time::Duration::from_millis(0))
            .build()
            .unwrap();

        // Act
        let page = fetch_catalog_page(&client, &CatalogQuery::new(Category::Popular, "batman"))
            .await
            .unwrap();

        // Assert
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].display_title(), "The Batman");
        assert!(!page.has_more());
    }
}
