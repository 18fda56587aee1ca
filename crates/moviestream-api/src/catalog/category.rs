//! Browsing categories.

use std::fmt;
use std::str::FromStr;

use crate::tmdb::{ContentType, ListEndpoint};

/// A browsing category shown as a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Popular movies.
    #[default]
    Popular,
    /// Top rated movies.
    TopRated,
    /// Popular TV shows.
    TvShows,
}

impl Category {
    /// All categories in tab order.
    pub const ALL: [Self; 3] = [Self::Popular, Self::TopRated, Self::TvShows];

    /// Returns the content type this category browses.
    #[must_use]
    pub const fn content_type(self) -> ContentType {
        match self {
            Self::Popular | Self::TopRated => ContentType::Movie,
            Self::TvShows => ContentType::Tv,
        }
    }

    /// Returns the listing endpoint used when no search is active.
    #[must_use]
    pub const fn list_endpoint(self) -> ListEndpoint {
        match self {
            Self::Popular => ListEndpoint::MoviePopular,
            Self::TopRated => ListEndpoint::MovieTopRated,
            Self::TvShows => ListEndpoint::TvPopular,
        }
    }

    /// Returns the identifier (`popular`, `top_rated`, `tv_shows`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::TvShows => "tv_shows",
        }
    }

    /// Returns the tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Movies",
            Self::TopRated => "Top Rated",
            Self::TvShows => "TV Shows",
        }
    }

    /// Returns the category after this one, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Popular => Self::TopRated,
            Self::TopRated => Self::TvShows,
            Self::TvShows => Self::Popular,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown category '{}' (expected popular, top_rated, tv_shows)",
            self.0
        )
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "popular" | "movies" => Ok(Self::Popular),
            "top_rated" => Ok(Self::TopRated),
            "tv_shows" | "tv" => Ok(Self::TvShows),
            _ => Err(ParseCategoryError(String::from(s))),
        }
    }
}
