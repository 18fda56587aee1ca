//! In-process address bar: category/search routes and navigation history.

use std::fmt;

use moviestream_api::catalog::Category;
use url::form_urlencoded;

/// Navigable location for a category and search string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    /// Active category.
    pub category: Category,
    /// Search string as typed (may be empty).
    pub query: String,
}

impl Route {
    /// Creates a route.
    pub fn new(category: Category, query: impl Into<String>) -> Self {
        Self {
            category,
            query: query.into(),
        }
    }

    /// Path for a category.
    #[must_use]
    pub const fn path(category: Category) -> &'static str {
        match category {
            Category::Popular => "/movies",
            Category::TopRated => "/top-rated",
            Category::TvShows => "/tv-shows",
        }
    }

    /// Returns the location string, e.g. `/movies?q=the+batman`.
    #[must_use]
    pub fn location(&self) -> String {
        let path = Self::path(self.category);
        if self.query.is_empty() {
            return String::from(path);
        }
        let encoded: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("q", &self.query)
            .finish();
        format!("{path}?{encoded}")
    }

    /// Reads a location back. Unknown paths fall back to `popular`; only
    /// the `q` parameter is read.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let (path, query_string) = location.split_once('?').unwrap_or((location, ""));
        let category = match path.trim_end_matches('/') {
            "/top-rated" => Category::TopRated,
            "/tv-shows" => Category::TvShows,
            _ => Category::Popular,
        };
        let query = form_urlencoded::parse(query_string.as_bytes())
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        Self { category, query }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

/// Back/forward stack of visited routes.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    index: usize,
}

impl History {
    /// Starts a history at `initial`.
    #[must_use]
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Current entry.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn current(&self) -> &Route {
        // `index` always points into `entries`, which is never empty.
        &self.entries[self.index]
    }

    /// Pushes `route`, dropping forward entries. Returns `false` when
    /// `route` equals the current entry (nothing recorded).
    pub fn push(&mut self, route: Route) -> bool {
        if *self.current() == route {
            return false;
        }
        self.entries.truncate(self.index.saturating_add(1));
        self.entries.push(route);
        self.index = self.entries.len().saturating_sub(1);
        true
    }

    /// Moves back one entry.
    pub fn back(&mut self) -> Option<&Route> {
        self.index = self.index.checked_sub(1)?;
        Some(self.current())
    }

    /// Moves forward one entry.
    pub fn forward(&mut self) -> Option<&Route> {
        let next = self.index.saturating_add(1);
        if next >= self.entries.len() {
            return None;
        }
        self.index = next;
        Some(self.current())
    }
}
