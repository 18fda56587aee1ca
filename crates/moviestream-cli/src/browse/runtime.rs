//! Binds the controller, debouncer, history, and player to a `TmdbApi`.
//!
//! User intents come in through methods; async results come back as
//! [`Message`]s on an unbounded channel and are fed to [`BrowseRuntime::handle`].

use std::sync::Arc;
use std::time::Duration;

use moviestream_api::catalog::{CatalogPage, Category, fetch_catalog_page};
use moviestream_api::tmdb::{TmdbApi, TmdbTvDetails, TmdbTvSeason};
use tokio::sync::mpsc::UnboundedSender;

use super::controller::{BrowseController, FetchMode, FetchRequest};
use super::debounce::Debouncer;
use super::player::{MISSING_API_KEY, PlayerFailure, PlayerRequest, PlayerState};
use super::route::{History, Route};

/// Result delivered back to the event loop.
#[derive(Debug)]
pub enum Message {
    /// The search/category debounce for `generation` has elapsed.
    DebounceElapsed(u64),
    /// A catalog page request finished.
    PageLoaded {
        /// Request sequence number.
        seq: u64,
        /// Merge mode.
        mode: FetchMode,
        /// Page or error message.
        result: Result<CatalogPage, String>,
    },
    /// The season list for the player finished.
    SeasonsLoaded {
        /// Request sequence number.
        seq: u64,
        /// Details or failure.
        result: Result<TmdbTvDetails, PlayerFailure>,
    },
    /// An episode list for the player finished.
    EpisodesLoaded {
        /// Request sequence number.
        seq: u64,
        /// Season or failure.
        result: Result<TmdbTvSeason, PlayerFailure>,
    },
}

/// Startup settings.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// Initial location.
    pub initial: Route,
    /// Search debounce.
    pub debounce: Duration,
    /// Embed provider base URL.
    pub embed_base_url: String,
}

/// Event-loop side of the browser.
#[derive(Debug)]
pub struct BrowseRuntime<A> {
    controller: BrowseController,
    history: History,
    player: Option<PlayerState>,
    player_seq: u64,
    api: Option<Arc<A>>,
    embed_base_url: String,
    debouncer: Debouncer,
    debounce_generation: u64,
    tx: UnboundedSender<Message>,
}

impl<A> BrowseRuntime<A>
where
    A: TmdbApi + Send + Sync + 'static,
{
    /// Creates the runtime. `api` is `None` when no API key is configured.
    pub fn new(
        api: Option<Arc<A>>,
        settings: RuntimeSettings,
        tx: UnboundedSender<Message>,
    ) -> Self {
        let controller =
            BrowseController::new(settings.initial.category, settings.initial.query.clone());
        Self {
            controller,
            history: History::new(settings.initial),
            player: None,
            player_seq: 0,
            api,
            embed_base_url: settings.embed_base_url,
            debouncer: Debouncer::new(settings.debounce),
            debounce_generation: 0,
            tx,
        }
    }

    /// Schedules the initial fetch.
    pub fn start(&mut self) {
        self.schedule_fetch();
    }

    /// Catalog state.
    #[must_use]
    pub const fn controller(&self) -> &BrowseController {
        &self.controller
    }

    /// Current location.
    #[must_use]
    pub fn location(&self) -> String {
        self.history.current().location()
    }

    /// Open player dialog, if any.
    #[must_use]
    pub const fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    /// Switches category (clears the search).
    pub fn select_category(&mut self, category: Category) {
        if self.controller.set_category(category) {
            self.schedule_fetch();
        }
    }

    /// Replaces the search string.
    pub fn set_search(&mut self, query: String) {
        if self.controller.set_search(query) {
            self.schedule_fetch();
        }
    }

    /// Appends one typed character to the search string.
    pub fn push_search_char(&mut self, c: char) {
        let mut query = self.controller.search_query().to_owned();
        query.push(c);
        self.set_search(query);
    }

    /// Removes the last character of the search string.
    pub fn pop_search_char(&mut self) {
        let mut query = self.controller.search_query().to_owned();
        if query.pop().is_some() {
            self.set_search(query);
        }
    }

    /// Requests the next page. Returns `false` when nothing was issued.
    pub fn load_more(&mut self) -> bool {
        let Some(request) = self.controller.load_more() else {
            return false;
        };
        self.spawn_fetch(request);
        true
    }

    /// Navigates one history entry back.
    pub fn back(&mut self) {
        if let Some(route) = self.history.back().cloned() {
            self.navigate(route);
        }
    }

    /// Navigates one history entry forward.
    pub fn forward(&mut self) {
        if let Some(route) = self.history.forward().cloned() {
            self.navigate(route);
        }
    }

    /// Opens the player for the item at `index`.
    pub fn open_player(&mut self, index: usize) {
        let Some(item) = self.controller.items().get(index).cloned() else {
            return;
        };
        self.close_player();
        tracing::debug!(id = item.id, media_type = %item.media_type, "opening player");
        let (state, request) =
            PlayerState::open(item, self.embed_base_url.clone(), self.player_seq);
        self.player = Some(state);
        if let Some(request) = request {
            self.spawn_player_fetch(request);
        }
    }

    /// Closes the player; in-flight player responses become stale.
    pub fn close_player(&mut self) {
        if let Some(player) = self.player.take() {
            self.player_seq = player.latest_seq();
        }
    }

    /// Selects the next season in the player.
    pub fn player_next_season(&mut self) {
        let request = self.player.as_mut().and_then(PlayerState::next_season);
        if let Some(request) = request {
            self.spawn_player_fetch(request);
        }
    }

    /// Selects the previous season in the player.
    pub fn player_prev_season(&mut self) {
        let request = self.player.as_mut().and_then(PlayerState::prev_season);
        if let Some(request) = request {
            self.spawn_player_fetch(request);
        }
    }

    /// Selects the next episode in the player.
    pub fn player_next_episode(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.next_episode();
        }
    }

    /// Selects the previous episode in the player.
    pub fn player_prev_episode(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.prev_episode();
        }
    }

    /// Applies one message from the channel.
    pub fn handle(&mut self, message: Message) {
        match message {
            Message::DebounceElapsed(generation) => {
                if generation != self.debounce_generation {
                    tracing::debug!(generation, "superseded debounce ignored");
                    return;
                }
                let request = self.controller.begin_fetch();
                let route = Route::new(self.controller.category(), self.controller.search_query());
                if self.history.push(route) {
                    tracing::debug!(location = %self.history.current(), "location updated");
                }
                self.spawn_fetch(request);
            }
            Message::PageLoaded { seq, mode, result } => {
                if let Err(e) = &result {
                    tracing::warn!(seq, "catalog fetch failed: {e}");
                }
                if !self.controller.apply(seq, mode, result) {
                    tracing::warn!(seq, "discarding stale catalog response");
                }
            }
            Message::SeasonsLoaded { seq, result } => {
                let request = self
                    .player
                    .as_mut()
                    .and_then(|player| player.apply_seasons(seq, result));
                if let Some(request) = request {
                    self.spawn_player_fetch(request);
                }
            }
            Message::EpisodesLoaded { seq, result } => {
                let applied = self
                    .player
                    .as_mut()
                    .is_some_and(|player| player.apply_episodes(seq, result));
                if !applied {
                    tracing::warn!(seq, "discarding stale episode response");
                }
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        if self.controller.navigate(route.category, route.query) {
            self.schedule_fetch();
        }
    }

    fn schedule_fetch(&mut self) {
        self.debounce_generation = self.debounce_generation.wrapping_add(1);
        let generation = self.debounce_generation;
        let tx = self.tx.clone();
        self.debouncer.schedule(async move {
            let _ = tx.send(Message::DebounceElapsed(generation));
        });
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let FetchRequest { seq, query, mode } = request;
        let tx = self.tx.clone();
        let Some(api) = self.api.clone() else {
            let _ = tx.send(Message::PageLoaded {
                seq,
                mode,
                result: Err(String::from(MISSING_API_KEY)),
            });
            return;
        };
        tokio::spawn(async move {
            let result = fetch_catalog_page(api.as_ref(), &query)
                .await
                .map_err(|e| format!("{e:#}"));
            let _ = tx.send(Message::PageLoaded { seq, mode, result });
        });
    }

    fn spawn_player_fetch(&self, request: PlayerRequest) {
        let tx = self.tx.clone();
        let api = self.api.clone();
        tokio::spawn(async move {
            let message = match request {
                PlayerRequest::Seasons { seq, series_id } => {
                    let result = match api {
                        Some(api) => api
                            .tv_details(series_id)
                            .await
                            .map_err(|e| PlayerFailure::Upstream(format!("{e:#}"))),
                        None => Err(PlayerFailure::MissingApiKey),
                    };
                    Message::SeasonsLoaded { seq, result }
                }
                PlayerRequest::Episodes {
                    seq,
                    series_id,
                    season,
                } => {
                    let result = match api {
                        Some(api) => api
                            .tv_season(series_id, season)
                            .await
                            .map_err(|e| PlayerFailure::Upstream(format!("{e:#}"))),
                        None => Err(PlayerFailure::MissingApiKey),
                    };
                    Message::EpisodesLoaded { seq, result }
                }
            };
            let _ = tx.send(message);
        });
    }
}
