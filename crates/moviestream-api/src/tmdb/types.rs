//! TMDB API response types and request parameters.

use std::fmt;

use serde::Deserialize;

// --- Content type ---

/// Kind of content a TMDB endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// Feature films (`movie/*`, `search/movie`).
    #[default]
    Movie,
    /// Episodic series (`tv/*`, `search/tv`).
    Tv,
}

impl ContentType {
    /// Returns the TMDB path segment (`"movie"` or `"tv"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Listing endpoints ---

/// Listing endpoints that take only a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListEndpoint {
    /// `movie/popular`
    MoviePopular,
    /// `movie/top_rated`
    MovieTopRated,
    /// `tv/popular`
    TvPopular,
}

impl ListEndpoint {
    /// Returns the path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::MoviePopular => "movie/popular",
            Self::MovieTopRated => "movie/top_rated",
            Self::TvPopular => "tv/popular",
        }
    }
}

// --- Paged listing / search ---

/// Paged response shared by the listing and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPagedResponse {
    /// Current page number.
    pub page: u32,
    /// Records on this page.
    #[serde(default)]
    pub results: Vec<TmdbMediaRecord>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A movie or TV record as returned upstream.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`.
/// Both shapes deserialize into this one struct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMediaRecord {
    /// TMDB ID (unique per content type).
    pub id: u64,
    /// Movie title.
    pub title: Option<String>,
    /// Series name.
    pub name: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Movie release date (YYYY-MM-DD, may be empty).
    pub release_date: Option<String>,
    /// Series first air date (YYYY-MM-DD, may be empty).
    pub first_air_date: Option<String>,
    /// Vote average (0-10).
    pub vote_average: Option<f64>,
    /// Poster image path (e.g. `/abc.jpg`).
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Upstream-reported media type (only present on multi-type endpoints).
    pub media_type: Option<String>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Popularity score.
    pub popularity: Option<f64>,
}

// --- TV Details ---

/// Response from `tv/{series_id}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Overview text.
    pub overview: Option<String>,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Season summaries (season 0 holds specials).
    #[serde(default)]
    pub seasons: Vec<TmdbSeasonSummary>,
}

/// Season summary within TV details.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSeasonSummary {
    /// TMDB season ID.
    pub id: u64,
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Season name.
    pub name: String,
    /// Number of episodes in this season.
    #[serde(default)]
    pub episode_count: u32,
    /// Air date of this season.
    pub air_date: Option<String>,
}

// --- TV Season Details ---

/// Response from `tv/{series_id}/season/{season_number}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvSeason {
    /// TMDB season ID.
    pub id: u64,
    /// Season number.
    pub season_number: u32,
    /// Season name.
    pub name: Option<String>,
    /// Episodes in this season.
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
}

/// A single episode within a season.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbEpisode {
    /// TMDB episode ID.
    pub id: u64,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode name.
    pub name: String,
    /// Episode overview.
    pub overview: Option<String>,
    /// Still image path.
    pub still_path: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Search Parameters ---

/// Parameters for the `search/movie` and `search/tv` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Which search endpoint to hit.
    pub content_type: ContentType,
    /// Search query (required, sent as given).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content (default: false).
    pub include_adult: bool,
}

impl SearchParams {
    /// Creates new search params for the given content type and query.
    pub fn new(content_type: ContentType, query: impl Into<String>) -> Self {
        Self {
            content_type,
            query: query.into(),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Returns the endpoint path (`search/movie` or `search/tv`).
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self.content_type {
            ContentType::Movie => "search/movie",
            ContentType::Tv => "search/tv",
        }
    }
}
