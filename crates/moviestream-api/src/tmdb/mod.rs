//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 listing, search, and
//! TV season endpoints.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    ContentType, ListEndpoint, SearchParams, TmdbEpisode, TmdbErrorResponse, TmdbMediaRecord,
    TmdbPagedResponse, TmdbSeasonSummary, TmdbTvDetails, TmdbTvSeason,
};
