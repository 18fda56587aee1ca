//! Pagination & search state machine.
//!
//! Pure state: the runtime decides when to call [`BrowseController::begin_fetch`]
//! (after the debounce) and feeds responses back through
//! [`BrowseController::apply`]. Every issued request carries a sequence
//! number; only the latest one is applied.

use moviestream_api::catalog::{CatalogItem, CatalogPage, CatalogQuery, Category};

/// How a response is merged into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Replace the list (category/search change).
    Replace,
    /// Append to the list (load more).
    Append,
}

/// A fetch the runtime must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence number to echo back into `apply`.
    pub seq: u64,
    /// What to fetch.
    pub query: CatalogQuery,
    /// How to merge the response.
    pub mode: FetchMode,
}

/// Mutually exclusive states of the result area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogView<'a> {
    /// First page in flight.
    Loading,
    /// The last fetch failed.
    Error(&'a str),
    /// Nothing to show.
    Empty {
        /// Whether a search is active (changes the message).
        searching: bool,
    },
    /// Results (a further page may be loading).
    Items(&'a [CatalogItem]),
}

/// Query state plus the current result list.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct BrowseController {
    category: Category,
    search_query: String,
    page: u32,
    has_more: bool,
    is_loading: bool,
    is_loading_more: bool,
    error: Option<String>,
    items: Vec<CatalogItem>,
    latest_seq: u64,
}

impl BrowseController {
    /// Starts loading `category` with `search_query`.
    pub fn new(category: Category, search_query: impl Into<String>) -> Self {
        Self {
            category,
            search_query: search_query.into(),
            page: 1,
            has_more: true,
            is_loading: true,
            is_loading_more: false,
            error: None,
            items: Vec::new(),
            latest_seq: 0,
        }
    }

    /// Active category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Search string as typed.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Current page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Whether another page exists according to the latest response.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether the first page is loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a further page is loading.
    #[must_use]
    pub const fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    /// Last error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current items.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Whether a trimmed, non-empty search is active.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        !self.search_query.trim().is_empty()
    }

    /// Switches category and clears the search. Returns `true` when a
    /// debounced fetch must be scheduled.
    pub fn set_category(&mut self, category: Category) -> bool {
        self.navigate(category, String::new())
    }

    /// Replaces the search string. Returns `true` when a debounced fetch
    /// must be scheduled.
    pub fn set_search(&mut self, query: impl Into<String>) -> bool {
        self.navigate(self.category, query.into())
    }

    /// Sets category and search together (history navigation). Returns
    /// `true` when either changed.
    pub fn navigate(&mut self, category: Category, query: String) -> bool {
        if category == self.category && query == self.search_query {
            return false;
        }
        self.category = category;
        self.search_query = query;
        self.reset();
        true
    }

    /// Issues the page-1 request once the debounce has elapsed.
    pub fn begin_fetch(&mut self) -> FetchRequest {
        self.page = 1;
        self.is_loading = true;
        self.is_loading_more = false;
        self.error = None;
        FetchRequest {
            seq: self.bump_seq(),
            query: self.query(),
            mode: FetchMode::Replace,
        }
    }

    /// Requests the next page. No-op (no request) unless a further page
    /// exists and nothing is loading.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if !self.has_more || self.is_loading || self.is_loading_more {
            return None;
        }
        self.page = self.page.saturating_add(1);
        self.is_loading_more = true;
        self.error = None;
        Some(FetchRequest {
            seq: self.bump_seq(),
            query: self.query(),
            mode: FetchMode::Append,
        })
    }

    /// Applies a response. Returns `false` when `seq` is stale and the
    /// response was discarded.
    ///
    /// A failed append clears the list and stops pagination; only a
    /// category or search change fetches again.
    pub fn apply(
        &mut self,
        seq: u64,
        mode: FetchMode,
        result: Result<CatalogPage, String>,
    ) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        match result {
            Ok(page) => {
                self.has_more = page.has_more();
                match mode {
                    FetchMode::Replace => self.items = page.items,
                    FetchMode::Append => self.items.extend(page.items),
                }
                self.error = None;
            }
            Err(message) => {
                if mode == FetchMode::Append {
                    self.page = self.page.saturating_sub(1).max(1);
                    self.has_more = false;
                }
                self.error = Some(message);
                self.items.clear();
            }
        }
        self.is_loading = false;
        self.is_loading_more = false;
        true
    }

    /// Returns the result area state.
    #[must_use]
    pub fn view(&self) -> CatalogView<'_> {
        if self.is_loading {
            CatalogView::Loading
        } else if let Some(message) = self.error.as_deref() {
            CatalogView::Error(message)
        } else if self.items.is_empty() {
            CatalogView::Empty {
                searching: self.is_searching(),
            }
        } else {
            CatalogView::Items(&self.items)
        }
    }

    /// Query for the current state.
    fn query(&self) -> CatalogQuery {
        CatalogQuery::new(self.category, self.search_query.clone()).page(self.page)
    }

    /// Resets pagination and invalidates in-flight requests.
    fn reset(&mut self) {
        self.page = 1;
        self.has_more = true;
        self.error = None;
        self.is_loading = true;
        self.is_loading_more = false;
        self.bump_seq();
    }

    fn bump_seq(&mut self) -> u64 {
        self.latest_seq = self.latest_seq.wrapping_add(1);
        self.latest_seq
    }
}

impl Default for BrowseController {
    fn default() -> Self {
        Self::new(Category::default(), String::new())
    }
}
