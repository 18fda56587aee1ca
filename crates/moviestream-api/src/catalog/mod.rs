//! Normalized catalog model.
//!
//! Maps a `(category, search query, page)` triple onto one TMDB
//! request and folds the movie and TV record shapes into a single
//! `CatalogItem`.

mod category;
mod fetch;
mod item;

pub use category::{Category, ParseCategoryError};
#[allow(clippy::module_name_repetitions)]
pub use fetch::{CatalogEndpoint, CatalogPage, CatalogQuery, fetch_catalog_page};
#[allow(clippy::module_name_repetitions)]
pub use item::{CatalogItem, PLACEHOLDER_POSTER_URL, PLACEHOLDER_TITLE, RatingBand};

pub use crate::tmdb::ContentType;
