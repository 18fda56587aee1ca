//! Player dialog state: season/episode selection and the embed address.

use moviestream_api::catalog::{CatalogItem, ContentType};
use moviestream_api::embed::{EmbedTarget, embed_url};
use moviestream_api::tmdb::{TmdbEpisode, TmdbSeasonSummary, TmdbTvDetails, TmdbTvSeason};

/// Shown when no TMDB API key is configured.
pub const MISSING_API_KEY: &str = "API key is missing";

/// Shown when the season list cannot be fetched.
pub const SEASONS_ERROR: &str = "Unable to load seasons. Please try again.";

/// Shown when an episode list cannot be fetched.
pub const EPISODES_ERROR: &str = "Unable to load episodes. Please try again.";

/// Why a season/episode fetch produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerFailure {
    /// No API key configured.
    MissingApiKey,
    /// Request or decode failure (detail is logged, not shown).
    Upstream(String),
}

/// A fetch the runtime must perform for the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRequest {
    /// `tv/{series_id}`.
    Seasons {
        /// Sequence number.
        seq: u64,
        /// Series ID.
        series_id: u64,
    },
    /// `tv/{series_id}/season/{season}`.
    Episodes {
        /// Sequence number.
        seq: u64,
        /// Series ID.
        series_id: u64,
        /// Season number.
        season: u32,
    },
}

/// State of the open player dialog.
#[derive(Debug, Clone)]
pub struct PlayerState {
    item: CatalogItem,
    embed_base_url: String,
    seasons: Vec<TmdbSeasonSummary>,
    episodes: Vec<TmdbEpisode>,
    season: u32,
    episode: u32,
    loading_seasons: bool,
    loading_episodes: bool,
    error: Option<String>,
    latest_seq: u64,
}

impl PlayerState {
    /// Opens the dialog for `item`. TV content also returns the season
    /// list request. Sequence numbers continue after `seq_floor`.
    #[must_use]
    pub fn open(
        item: CatalogItem,
        embed_base_url: impl Into<String>,
        seq_floor: u64,
    ) -> (Self, Option<PlayerRequest>) {
        let is_tv = item.media_type == ContentType::Tv;
        let mut state = Self {
            item,
            embed_base_url: embed_base_url.into(),
            seasons: Vec::new(),
            episodes: Vec::new(),
            season: 1,
            episode: 1,
            loading_seasons: is_tv,
            loading_episodes: false,
            error: None,
            latest_seq: seq_floor,
        };
        if !is_tv {
            return (state, None);
        }
        let request = PlayerRequest::Seasons {
            seq: state.bump_seq(),
            series_id: state.item.id,
        };
        (state, Some(request))
    }

    /// Item being played.
    #[must_use]
    pub const fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Content type of the item.
    #[must_use]
    pub const fn content_type(&self) -> ContentType {
        self.item.media_type
    }

    /// Seasons with `season_number > 0`.
    #[must_use]
    pub fn seasons(&self) -> &[TmdbSeasonSummary] {
        &self.seasons
    }

    /// Episodes of the selected season.
    #[must_use]
    pub fn episodes(&self) -> &[TmdbEpisode] {
        &self.episodes
    }

    /// Selected season number.
    #[must_use]
    pub const fn season(&self) -> u32 {
        self.season
    }

    /// Selected episode number.
    #[must_use]
    pub const fn episode(&self) -> u32 {
        self.episode
    }

    /// Inline error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether seasons are loading.
    #[must_use]
    pub const fn is_loading_seasons(&self) -> bool {
        self.loading_seasons
    }

    /// Whether episodes are loading.
    #[must_use]
    pub const fn is_loading_episodes(&self) -> bool {
        self.loading_episodes
    }

    /// Latest sequence number handed out.
    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Applies the season list. Returns the episode request for the first
    /// season, or `None` when the response is stale or failed.
    pub fn apply_seasons(
        &mut self,
        seq: u64,
        result: Result<TmdbTvDetails, PlayerFailure>,
    ) -> Option<PlayerRequest> {
        if seq != self.latest_seq {
            return None;
        }
        self.loading_seasons = false;
        match result {
            Ok(details) => {
                self.seasons = details
                    .seasons
                    .into_iter()
                    .filter(|s| s.season_number > 0)
                    .collect();
                let first = self.seasons.first()?.season_number;
                self.season = first;
                Some(self.request_episodes())
            }
            Err(failure) => {
                self.fail(failure, SEASONS_ERROR);
                None
            }
        }
    }

    /// Applies an episode list. Returns `false` when stale.
    pub fn apply_episodes(
        &mut self,
        seq: u64,
        result: Result<TmdbTvSeason, PlayerFailure>,
    ) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        self.loading_episodes = false;
        match result {
            Ok(season) => {
                self.episodes = season.episodes;
                self.episode = 1;
            }
            Err(failure) => self.fail(failure, EPISODES_ERROR),
        }
        true
    }

    /// Selects a season; fetches its episodes and resets the episode to 1.
    pub fn select_season(&mut self, season_number: u32) -> Option<PlayerRequest> {
        if self.content_type() != ContentType::Tv
            || self.loading_seasons
            || (season_number == self.season && self.error.is_none())
            || !self.has_season(season_number)
        {
            return None;
        }
        self.season = season_number;
        Some(self.request_episodes())
    }

    /// Moves to the next season in the list.
    pub fn next_season(&mut self) -> Option<PlayerRequest> {
        let idx = self.season_index()?;
        let next = self.seasons.get(idx.saturating_add(1))?.season_number;
        self.select_season(next)
    }

    /// Moves to the previous season in the list.
    pub fn prev_season(&mut self) -> Option<PlayerRequest> {
        let idx = self.season_index()?.checked_sub(1)?;
        let prev = self.seasons.get(idx)?.season_number;
        self.select_season(prev)
    }

    /// Selects an episode of the current season.
    pub fn select_episode(&mut self, episode_number: u32) -> bool {
        if self.loading_episodes || !self.has_episode(episode_number) {
            return false;
        }
        self.episode = episode_number;
        true
    }

    /// Moves to the next episode.
    pub fn next_episode(&mut self) -> bool {
        let Some(idx) = self.episode_index() else {
            return false;
        };
        let Some(next) = self.episodes.get(idx.saturating_add(1)) else {
            return false;
        };
        let next = next.episode_number;
        self.select_episode(next)
    }

    /// Moves to the previous episode.
    pub fn prev_episode(&mut self) -> bool {
        let Some(idx) = self.episode_index().and_then(|i| i.checked_sub(1)) else {
            return false;
        };
        let Some(prev) = self.episodes.get(idx).map(|e| e.episode_number) else {
            return false;
        };
        self.select_episode(prev)
    }

    /// Embed address, or `None` while loading or after an error.
    #[must_use]
    pub fn embed_url(&self) -> Option<String> {
        if self.error.is_some() || self.loading_seasons || self.loading_episodes {
            return None;
        }
        let target = EmbedTarget::new(
            self.content_type(),
            self.item.id,
            Some(self.season),
            Some(self.episode),
        );
        Some(embed_url(&self.embed_base_url, target))
    }

    fn request_episodes(&mut self) -> PlayerRequest {
        self.episodes.clear();
        self.episode = 1;
        self.loading_episodes = true;
        self.error = None;
        PlayerRequest::Episodes {
            seq: self.bump_seq(),
            series_id: self.item.id,
            season: self.season,
        }
    }

    fn fail(&mut self, failure: PlayerFailure, fallback: &str) {
        let message = match failure {
            PlayerFailure::MissingApiKey => String::from(MISSING_API_KEY),
            PlayerFailure::Upstream(detail) => {
                tracing::warn!(id = self.item.id, "player fetch failed: {detail}");
                String::from(fallback)
            }
        };
        self.error = Some(message);
    }

    fn has_season(&self, number: u32) -> bool {
        self.seasons.iter().any(|s| s.season_number == number)
    }

    fn has_episode(&self, number: u32) -> bool {
        self.episodes.iter().any(|e| e.episode_number == number)
    }

    fn season_index(&self) -> Option<usize> {
        self.seasons
            .iter()
            .position(|s| s.season_number == self.season)
    }

    fn episode_index(&self) -> Option<usize> {
        self.episodes
            .iter()
            .position(|e| e.episode_number == self.episode)
    }

    fn bump_seq(&mut self) -> u64 {
        self.latest_seq = self.latest_seq.wrapping_add(1);
        self.latest_seq
    }
}
