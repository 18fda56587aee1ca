//! Video-embed URL construction.
//!
//! The embed provider is an opaque external collaborator: this module
//! only builds the address that is handed to the system browser.

use crate::tmdb::ContentType;

/// Default embed provider base URL.
pub const DEFAULT_EMBED_BASE_URL: &str = "https://vidsrc.icu/embed";

/// What to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTarget {
    /// A movie by TMDB ID.
    Movie {
        /// TMDB movie ID.
        id: u64,
    },
    /// One episode of a series.
    Episode {
        /// TMDB series ID.
        id: u64,
        /// Season number.
        season: u32,
        /// Episode number within the season.
        episode: u32,
    },
}

impl EmbedTarget {
    /// Builds the target for a content type; TV defaults to S1E1 when
    /// no season/episode is given.
    #[must_use]
    pub fn new(
        content_type: ContentType,
        id: u64,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Self {
        match content_type {
            ContentType::Movie => Self::Movie { id },
            ContentType::Tv => Self::Episode {
                id,
                season: season.unwrap_or(1),
                episode: episode.unwrap_or(1),
            },
        }
    }
}

/// Returns the embed URL for `target` under `base_url`.
///
/// - movie: `{base}/movie/{id}`
/// - episode: `{base}/tv/{id}/{season}/{episode}`
#[must_use]
pub fn embed_url(base_url: &str, target: EmbedTarget) -> String {
    let base = base_url.trim_end_matches('/');
    match target {
        EmbedTarget::Movie { id } => format!("{base}/movie/{id}"),
        EmbedTarget::Episode {
            id,
            season,
            episode,
        } => format!("{base}/tv/{id}/{season}/{episode}"),
    }
}
