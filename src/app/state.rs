// src/app/state.rs
use std::sync::Arc;

use super::catalog::CatalogError;
use super::data::{Episode, EpisodeId, Show, ShowId};
use super::filters::{filter_episodes, filter_shows};

pub const LOADING_SHOWS: &str = "Loading shows, please wait...";
pub const LOADING_EPISODES: &str = "Loading episodes for selected show...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Initial,
    ShowsLoaded,
    EpisodesLoaded(ShowId),
    /// Message for the user; the failed operation is not retried.
    LoadFailed(String),
}

/// What the user is looking at. Episode lists are shared with the visit
/// cache and only ever read; filtered views are derived on demand.
pub struct BrowsingState {
    phase: Phase,
    shows: Arc<[Show]>,
    shows_ready: bool,
    current_show: Option<ShowId>,
    pending_show: Option<ShowId>,
    episodes: Arc<[Episode]>,
    search_term: String,
    jump_to: Option<EpisodeId>,
    loading: Option<&'static str>,
}

impl Default for BrowsingState {
    fn default() -> Self {
        Self {
            phase: Phase::Initial,
            shows: Arc::from(Vec::<Show>::new()),
            shows_ready: false,
            current_show: None,
            pending_show: None,
            episodes: Arc::from(Vec::<Episode>::new()),
            search_term: String::new(),
            jump_to: None,
            loading: None,
        }
    }
}

impl BrowsingState {
    // ---- reads ----
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn shows_ready(&self) -> bool {
        self.shows_ready
    }

    /// Show list loaded successfully but came back empty.
    pub fn catalog_empty(&self) -> bool {
        self.shows_ready && self.shows.is_empty()
    }

    pub fn current_show(&self) -> Option<ShowId> {
        self.current_show
    }

    pub fn current_show_name(&self) -> Option<&str> {
        let id = self.current_show?;
        self.shows.iter().find(|s| s.id == id).map(|s| s.name.as_str())
    }

    pub fn pending_show(&self) -> Option<ShowId> {
        self.pending_show
    }

    pub fn episodes(&self) -> &Arc<[Episode]> {
        &self.episodes
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn jump_target(&self) -> Option<EpisodeId> {
        self.jump_to
    }

    pub fn loading(&self) -> Option<&'static str> {
        self.loading
    }

    pub fn in_episode_view(&self) -> bool {
        matches!(self.phase, Phase::EpisodesLoaded(_))
    }

    pub fn visible_shows(&self) -> Vec<&Show> {
        filter_shows(&self.shows, &self.search_term)
    }

    /// Episodes matching the search, before any jump-to narrowing.
    pub fn listed_episodes(&self) -> Vec<&Episode> {
        filter_episodes(&self.episodes, &self.search_term)
    }

    pub fn visible_episodes(&self) -> Vec<&Episode> {
        let listed = self.listed_episodes();
        match self.jump_to {
            Some(id) => listed.into_iter().filter(|e| e.id == id).collect(),
            None => listed,
        }
    }

    // ---- show list ----
    pub fn await_shows(&mut self) {
        self.loading = Some(LOADING_SHOWS);
    }

    pub fn shows_loaded(&mut self, shows: Arc<[Show]>) {
        self.shows = shows;
        self.shows_ready = true;
        self.loading = None;
        self.enter_show_list();
    }

    pub fn shows_failed(&mut self, err: &CatalogError) {
        self.loading = None;
        self.phase = Phase::LoadFailed(format!("Failed to load shows: {err}"));
    }

    /// Back to the show list; an outstanding episode fetch becomes stale.
    pub fn show_all(&mut self) {
        if !self.shows_ready {
            return;
        }
        self.pending_show = None;
        self.loading = None;
        self.enter_show_list();
    }

    fn enter_show_list(&mut self) {
        self.phase = Phase::ShowsLoaded;
        self.current_show = None;
        self.episodes = Arc::from(Vec::<Episode>::new());
        self.search_term.clear();
        self.jump_to = None;
    }

    // ---- episodes ----
    pub fn await_episodes(&mut self, show_id: ShowId) {
        self.pending_show = Some(show_id);
        self.loading = Some(LOADING_EPISODES);
    }

    /// Apply a list for `show_id` unconditionally (cache hits).
    pub fn show_episodes(&mut self, show_id: ShowId, episodes: Arc<[Episode]>) {
        self.phase = Phase::EpisodesLoaded(show_id);
        self.current_show = Some(show_id);
        self.pending_show = None;
        self.loading = None;
        self.episodes = episodes;
        self.search_term.clear();
        self.jump_to = None;
    }

    /// Apply a fetched list if it answers the pending selection.
    /// Returns false for stale responses, which leave the state untouched.
    pub fn episodes_arrived(&mut self, show_id: ShowId, episodes: Arc<[Episode]>) -> bool {
        if self.pending_show != Some(show_id) {
            return false;
        }
        self.show_episodes(show_id, episodes);
        true
    }

    /// Same staleness rule as [`Self::episodes_arrived`].
    pub fn episodes_failed(&mut self, show_id: ShowId, err: &CatalogError) -> bool {
        if self.pending_show != Some(show_id) {
            return false;
        }
        self.pending_show = None;
        self.loading = None;
        self.current_show = Some(show_id);
        self.episodes = Arc::from(Vec::<Episode>::new());
        self.search_term.clear();
        self.jump_to = None;
        self.phase = Phase::LoadFailed(format!("Failed to load episodes for this show: {err}"));
        true
    }

    // ---- view controls ----
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.jump_to = None;
    }

    pub fn jump_to(&mut self, target: Option<EpisodeId>) {
        if !self.in_episode_view() {
            return;
        }
        self.jump_to = target.filter(|id| self.episodes.iter().any(|e| e.id == *id));
    }
}
