//! `CatalogItem` - one normalized movie or TV record.

use chrono::{Datelike, NaiveDate};

use super::category::Category;
use crate::tmdb::{ContentType, TmdbMediaRecord};

/// Title shown when a record carries neither `title` nor `name`.
pub const PLACEHOLDER_TITLE: &str = "Untitled";

/// Poster size prefix on the TMDB image CDN.
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Image shown for records without a poster.
pub const PLACEHOLDER_POSTER_URL: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcT9Ejk6aKUozkJpLOEUY5BVG-NWuBpnUfVwt9_aVOY_ATGtSv4IoUQsExieE6YTIxYJ93g&usqp=CAU";

/// Upper bound of the TMDB vote scale.
const MAX_RATING: f64 = 10.0;

/// A catalog entry, identical in shape for movies and TV shows.
///
/// Recreated on every fetch; never persisted.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogItem {
    /// TMDB ID (unique per content type).
    pub id: u64,
    /// Display title (`title`, else `name`, else [`PLACEHOLDER_TITLE`]).
    pub title: String,
    /// Overview text (empty when absent).
    pub overview: String,
    /// Display date (`release_date`, else `first_air_date`).
    pub release_date: Option<String>,
    /// Vote average in `[0, 10]`.
    pub rating: f64,
    /// Content type, decided by the browsing category.
    pub media_type: ContentType,
    /// Poster image path, if any.
    pub poster_path: Option<String>,
}

/// Coarse rating bucket used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    /// 7.0 and above.
    High,
    /// 5.0 up to 7.0.
    Mid,
    /// Below 5.0.
    Low,
}

/// Treats `None` and blank strings alike.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CatalogItem {
    /// Normalizes an upstream record fetched for `category`.
    ///
    /// The media type always follows the category; any upstream
    /// `media_type` is ignored.
    #[must_use]
    pub fn from_record(record: TmdbMediaRecord, category: Category) -> Self {
        let title = non_blank(record.title)
            .or_else(|| non_blank(record.name))
            .unwrap_or_else(|| String::from(PLACEHOLDER_TITLE));
        let release_date =
            non_blank(record.release_date).or_else(|| non_blank(record.first_air_date));
        let rating = record
            .vote_average
            .filter(|v| v.is_finite())
            .map_or(0.0, |v| v.clamp(0.0, MAX_RATING));

        Self {
            id: record.id,
            title,
            overview: record.overview.unwrap_or_default(),
            release_date,
            rating,
            media_type: category.content_type(),
            poster_path: non_blank(record.poster_path),
        }
    }

    /// Returns the display title.
    #[must_use]
    pub fn display_title(&self) -> &str {
        &self.title
    }

    /// Returns the display date, if known.
    #[must_use]
    pub fn display_date(&self) -> Option<&str> {
        self.release_date.as_deref()
    }

    /// Returns the year of the display date when it parses as `YYYY-MM-DD`.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Returns the poster URL, or the placeholder image when absent.
    #[must_use]
    pub fn poster_url(&self) -> String {
        self.poster_path.as_deref().map_or_else(
            || String::from(PLACEHOLDER_POSTER_URL),
            |path| format!("{POSTER_BASE_URL}{path}"),
        )
    }

    /// Returns the rating bucket.
    #[must_use]
    pub fn rating_band(&self) -> RatingBand {
        if self.rating >= 7.0 {
            RatingBand::High
        } else if self.rating >= 5.0 {
            RatingBand::Mid
        } else {
            RatingBand::Low
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use super::*;

    fn movie_record() -> TmdbMediaRecord {
        TmdbMediaRecord {
            id: 42,
            title: Some(String::from("Arrival")),
            release_date: Some(String::from("2016-11-10")),
            vote_average: Some(7.6),
            poster_path: Some(String::from("/x2FJsf1ElAgr63Y3PNPtJrcmpoe.jpg")),
            ..TmdbMediaRecord::default()
        }
    }

    fn tv_record() -> TmdbMediaRecord {
        TmdbMediaRecord {
            id: 42,
            name: Some(String::from("Arrival")),
            first_air_date: Some(String::from("2016-11-10")),
            vote_average: Some(7.6),
            poster_path: Some(String::from("/x2FJsf1ElAgr63Y3PNPtJrcmpoe.jpg")),
            ..TmdbMediaRecord::default()
        }
    }

    #[test]
    fn test_tv_shape_normalizes_like_movie_shape() {
        // Arrange & Act
        let movie = CatalogItem::from_record(movie_record(), Category::Popular);
        let tv = CatalogItem::from_record(tv_record(), Category::Popular);

        // Assert
        assert_eq!(movie, tv);
        assert_eq!(tv.display_title(), "Arrival");
        assert_eq!(tv.display_date(), Some("2016-11-10"));
    }

    #[test]
    fn test_title_wins_over_name() {
        // Arrange
        let record = TmdbMediaRecord {
            title: Some(String::from("Title")),
            name: Some(String::from("Name")),
            ..TmdbMediaRecord::default()
        };

        // Act
        let item = CatalogItem::from_record(record, Category::Popular);

        // Assert
        assert_eq!(item.display_title(), "Title");
    }

    #[test]
    fn test_missing_title_and_name_uses_placeholder() {
        // Arrange
        let record = TmdbMediaRecord {
            id: 7,
            title: Some(String::new()),
            ..TmdbMediaRecord::default()
        };

        // Act
        let item = CatalogItem::from_record(record, Category::TvShows);

        // Assert
        assert_eq!(item.display_title(), PLACEHOLDER_TITLE);
        assert_eq!(item.display_date(), None);
        assert_eq!(item.overview, "");
    }

    #[test]
    fn test_empty_release_date_falls_back_to_first_air_date() {
        // Arrange
        let record = TmdbMediaRecord {
            release_date: Some(String::new()),
            first_air_date: Some(String::from("2005-03-24")),
            ..TmdbMediaRecord::default()
        };

        // Act
        let item = CatalogItem::from_record(record, Category::TvShows);

        // Assert
        assert_eq!(item.display_date(), Some("2005-03-24"));
        assert_eq!(item.release_year(), Some(2005));
    }

    #[test]
    fn test_media_type_follows_category_not_upstream() {
        // Arrange
        let record = TmdbMediaRecord {
            media_type: Some(String::from("movie")),
            ..tv_record()
        };

        // Act
        let tv = CatalogItem::from_record(record.clone(), Category::TvShows);
        let movie = CatalogItem::from_record(record, Category::TopRated);

        // Assert
        assert_eq!(tv.media_type, ContentType::Tv);
        assert_eq!(movie.media_type, ContentType::Movie);
    }

    #[test]
    fn test_rating_defaults_and_clamps() {
        // Arrange
        let missing = TmdbMediaRecord::default();
        let too_high = TmdbMediaRecord {
            vote_average: Some(11.5),
            ..TmdbMediaRecord::default()
        };
        let negative = TmdbMediaRecord {
            vote_average: Some(-1.0),
            ..TmdbMediaRecord::default()
        };

        // Act & Assert
        assert_eq!(
            CatalogItem::from_record(missing, Category::Popular).rating,
            0.0
        );
        assert_eq!(
            CatalogItem::from_record(too_high, Category::Popular).rating,
            10.0
        );
        assert_eq!(
            CatalogItem::from_record(negative, Category::Popular).rating,
            0.0
        );
    }

    #[test]
    fn test_poster_url_uses_placeholder_when_missing() {
        // Arrange
        let with_poster = CatalogItem::from_record(movie_record(), Category::Popular);
        let without = CatalogItem::from_record(
            TmdbMediaRecord {
                poster_path: Some(String::new()),
                ..movie_record()
            },
            Category::Popular,
        );

        // Act & Assert
        assert_eq!(
            with_poster.poster_url(),
            "https://image.tmdb.org/t/p/w500/x2FJsf1ElAgr63Y3PNPtJrcmpoe.jpg"
        );
        assert_eq!(without.poster_url(), PLACEHOLDER_POSTER_URL);
        assert!(!without.poster_url().is_empty());
    }

    #[test]
    fn test_rating_band_boundaries() {
        // Arrange
        let mut item = CatalogItem::from_record(movie_record(), Category::Popular);

        // Act & Assert
        item.rating = 7.0;
        assert_eq!(item.rating_band(), RatingBand::High);
        item.rating = 5.0;
        assert_eq!(item.rating_band(), RatingBand::Mid);
        item.rating = 4.9;
        assert_eq!(item.rating_band(), RatingBand::Low);
    }

    #[test]
    fn test_release_year_ignores_malformed_dates() {
        // Arrange
        let record = TmdbMediaRecord {
            release_date: Some(String::from("sometime")),
            ..TmdbMediaRecord::default()
        };

        // Act
        let item = CatalogItem::from_record(record, Category::Popular);

        // Assert
        assert_eq!(item.display_date(), Some("sometime"));
        assert_eq!(item.release_year(), None);
    }
}
