// src/app/browser.rs
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::cache::VisitCache;
use super::catalog::CatalogError;
use super::data::{Show, ShowId};
use super::state::BrowsingState;
use super::types::{Action, Command, FetchMsg};

/// Owns the visit cache and browsing state. Every input (user action or
/// fetch completion) goes through here and may yield one fetch for the
/// shell to run.
pub struct Browser {
    cache: VisitCache,
    state: BrowsingState,
    auto_select_first: bool,
}

impl Browser {
    pub fn new(auto_select_first: bool) -> Self {
        Self {
            cache: VisitCache::new(),
            state: BrowsingState::default(),
            auto_select_first,
        }
    }

    pub fn state(&self) -> &BrowsingState {
        &self.state
    }

    pub fn cache(&self) -> &VisitCache {
        &self.cache
    }

    /// Kick off the show list load (once per visit).
    pub fn start(&mut self) -> Option<Command> {
        if let Some(shows) = self.cache.shows() {
            return self.apply_shows(shows);
        }
        if !self.cache.begin_shows_fetch() {
            return None;
        }
        info!("loading show list");
        self.state.await_shows();
        Some(Command::FetchShows)
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::SelectShow(id) => self.select_show(id),
            Action::ShowAll => {
                self.state.show_all();
                None
            }
            Action::Search(term) => {
                self.state.set_search(term);
                None
            }
            Action::JumpTo(target) => {
                self.state.jump_to(target);
                None
            }
        }
    }

    pub fn handle(&mut self, msg: FetchMsg) -> Option<Command> {
        match msg {
            FetchMsg::Shows(result) => {
                self.cache.finish_shows_fetch();
                match result {
                    Ok(list) => {
                        let shows = self.cache.store_shows(list);
                        if shows.is_empty() {
                            warn!("{}", CatalogError::EmptyCatalog);
                        }
                        self.apply_shows(shows)
                    }
                    Err(e) => {
                        error!("show list load failed: {e}");
                        self.state.shows_failed(&e);
                        None
                    }
                }
            }
            FetchMsg::Episodes { show_id, result } => {
                self.cache.finish_episodes_fetch(show_id);
                match result {
                    Ok(list) => {
                        let episodes = self.cache.store_episodes(show_id, list);
                        if !self.state.episodes_arrived(show_id, episodes) {
                            debug!("discarding stale episode list for show {show_id} (kept in cache)");
                        }
                    }
                    Err(e) => {
                        if self.state.episodes_failed(show_id, &e) {
                            error!("episode load for show {show_id} failed: {e}");
                        } else {
                            debug!("ignoring stale failure for show {show_id}: {e}");
                        }
                    }
                }
                None
            }
        }
    }

    fn apply_shows(&mut self, shows: Arc<[Show]>) -> Option<Command> {
        self.state.shows_loaded(Arc::clone(&shows));
        let first = shows.first()?;
        if self.auto_select_first {
            return self.select_show(first.id);
        }
        None
    }

    fn select_show(&mut self, id: ShowId) -> Option<Command> {
        if !self.state.shows_ready() {
            warn!("show {id} selected before the show list loaded; ignoring");
            return None;
        }
        if let Some(episodes) = self.cache.episodes(id) {
            debug!("episode cache hit for show {id}");
            self.state.show_episodes(id, episodes);
            return None;
        }
        self.state.await_episodes(id);
        if self.cache.begin_episodes_fetch(id) {
            info!("loading episodes for show {id}");
            Some(Command::FetchEpisodes(id))
        } else {
            debug!("episodes for show {id} already in flight");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::testing::{episode, show, FakeCatalog};
    use crate::app::catalog::CatalogSource;
    use crate::app::state::Phase;

    /// Run commands synchronously against the fake, like the shell would.
    fn run(browser: &mut Browser, fake: &FakeCatalog, mut cmd: Option<Command>) {
        while let Some(c) = cmd.take() {
            let msg = match c {
                Command::FetchShows => FetchMsg::Shows(fake.fetch_shows()),
                Command::FetchEpisodes(id) => FetchMsg::Episodes {
                    show_id: id,
                    result: fake.fetch_episodes(id),
                },
            };
            cmd = browser.handle(msg);
        }
    }

    fn catalog() -> FakeCatalog {
        let fake = FakeCatalog::with_shows(vec![
            show(82, "Game of Thrones", &["Drama"], ""),
            show(1, "Arrow", &["Action"], ""),
        ]);
        fake.set_episodes(82, Ok(vec![episode(1, 1, 1, "Winter Is Coming", "")]));
        fake.set_episodes(1, Ok(vec![episode(2, 1, 1, "Pilot", "")]));
        fake
    }

    #[test]
    fn start_fetches_shows_once() {
        let fake = catalog();
        let mut b = Browser::new(false);
        let cmd = b.start();
        assert_eq!(cmd, Some(Command::FetchShows));
        assert!(b.start().is_none());
        run(&mut b, &fake, cmd);
        assert!(b.start().is_none());
        assert_eq!(fake.show_calls(), 1);
        assert_eq!(b.state().phase(), &Phase::ShowsLoaded);
        assert_eq!(b.state().shows()[0].name, "Arrow");
    }

    #[test]
    fn auto_select_opens_first_show_alphabetically() {
        let fake = catalog();
        let mut b = Browser::new(true);
        let cmd = b.start();
        run(&mut b, &fake, cmd);
        assert_eq!(b.state().phase(), &Phase::EpisodesLoaded(ShowId(1)));
    }

    #[test]
    fn second_visit_to_show_uses_cache() {
        let fake = catalog();
        let mut b = Browser::new(false);
        let cmd = b.start();
        run(&mut b, &fake, cmd);
        let cmd = b.dispatch(Action::SelectShow(ShowId(82)));
        run(&mut b, &fake, cmd);
        let cmd = b.dispatch(Action::SelectShow(ShowId(1)));
        run(&mut b, &fake, cmd);
        assert!(b.dispatch(Action::SelectShow(ShowId(82))).is_none());
        assert_eq!(fake.episode_calls(), 2);
        assert_eq!(b.state().phase(), &Phase::EpisodesLoaded(ShowId(82)));
    }

    #[test]
    fn reselect_while_in_flight_issues_no_second_request() {
        let fake = catalog();
        let mut b = Browser::new(false);
        let cmd = b.start();
        run(&mut b, &fake, cmd);
        assert_eq!(b.dispatch(Action::SelectShow(ShowId(82))), Some(Command::FetchEpisodes(ShowId(82))));
        assert!(b.dispatch(Action::SelectShow(ShowId(82))).is_none());
        assert!(b.cache().is_fetching_episodes(ShowId(82)));
    }

    /// Overlapping fetches: the response for a show that is no longer the
    /// pending selection must not replace the newer selection.
    #[test]
    fn stale_episode_response_is_cached_but_not_shown() {
        let fake = catalog();
        let mut b = Browser::new(false);
        let cmd = b.start();
        run(&mut b, &fake, cmd);

        let first = b.dispatch(Action::SelectShow(ShowId(82)));
        let second = b.dispatch(Action::SelectShow(ShowId(1)));
        assert!(first.is_some() && second.is_some());

        // Newer request resolves first, older one last.
        b.handle(FetchMsg::Episodes { show_id: ShowId(1), result: fake.fetch_episodes(ShowId(1)) });
        b.handle(FetchMsg::Episodes { show_id: ShowId(82), result: fake.fetch_episodes(ShowId(82)) });

        assert_eq!(b.state().phase(), &Phase::EpisodesLoaded(ShowId(1)));
        assert_eq!(b.state().visible_episodes()[0].name, "Pilot");
        assert!(b.cache().episodes(ShowId(82)).is_some());
        assert!(b.state().loading().is_none());
    }

    #[test]
    fn shows_failure_is_terminal_until_user_acts() {
        let fake = FakeCatalog::default();
        *fake.shows.lock().unwrap() = Some(Err(CatalogError::Network("Shows request failed (status 503)".into())));
        let mut b = Browser::new(false);
        let cmd = b.start();
        run(&mut b, &fake, cmd);
        match b.state().phase() {
            Phase::LoadFailed(msg) => assert_eq!(msg, "Failed to load shows: Shows request failed (status 503)"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(b.state().loading().is_none());
        assert!(b.dispatch(Action::SelectShow(ShowId(82))).is_none());
    }

    #[test]
    fn episode_failure_allows_reselect() {
        let fake = catalog();
        fake.set_episodes(82, Err(CatalogError::Network("Episodes request failed (status 500)".into())));
        let mut b = Browser::new(false);
        let cmd = b.start();
        run(&mut b, &fake, cmd);
        let cmd = b.dispatch(Action::SelectShow(ShowId(82)));
        run(&mut b, &fake, cmd);
        assert!(matches!(b.state().phase(), Phase::LoadFailed(_)));
        let cmd = b.dispatch(Action::SelectShow(ShowId(1)));
        run(&mut b, &fake, cmd);
        assert_eq!(b.state().phase(), &Phase::EpisodesLoaded(ShowId(1)));
    }
}
