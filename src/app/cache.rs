use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::catalog::{CatalogError, CatalogSource};
use super::data::{Episode, Show, ShowId};

/// Catalog data fetched during this run. Entries are written once and never
/// invalidated; the whole cache is dropped with the app.
#[derive(Default)]
pub struct VisitCache {
    shows: Option<Arc<[Show]>>,
    episodes: HashMap<ShowId, Arc<[Episode]>>,
    shows_in_flight: bool,
    episodes_in_flight: HashSet<ShowId>,
}

impl VisitCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- blocking accessors ----
    // For callers that fetch on their own thread. The UI loop cannot block,
    // so `Browser` splits the same steps into the helpers further down.

    pub fn get_shows(&mut self, source: &dyn CatalogSource) -> Result<Arc<[Show]>, CatalogError> {
        if let Some(shows) = &self.shows {
            debug!("show list cache hit");
            return Ok(Arc::clone(shows));
        }
        let fetched = source.fetch_shows()?;
        Ok(self.store_shows(fetched))
    }

    pub fn get_episodes(
        &mut self,
        source: &dyn CatalogSource,
        show_id: ShowId,
    ) -> Result<Arc<[Episode]>, CatalogError> {
        if let Some(eps) = self.episodes(show_id) {
            debug!("episode cache hit for show {show_id}");
            return Ok(eps);
        }
        let fetched = source.fetch_episodes(show_id)?;
        Ok(self.store_episodes(show_id, fetched))
    }

    // ---- non-blocking pieces used by the browser ----

    pub fn shows(&self) -> Option<Arc<[Show]>> {
        self.shows.clone()
    }

    pub fn episodes(&self, show_id: ShowId) -> Option<Arc<[Episode]>> {
        self.episodes.get(&show_id).cloned()
    }

    /// Keeps the first stored list if one is already present.
    pub fn store_shows(&mut self, shows: Vec<Show>) -> Arc<[Show]> {
        Arc::clone(self.shows.get_or_insert_with(|| shows.into()))
    }

    /// Keeps the first stored list for `show_id` if one is already present.
    pub fn store_episodes(&mut self, show_id: ShowId, episodes: Vec<Episode>) -> Arc<[Episode]> {
        Arc::clone(
            self.episodes
                .entry(show_id)
                .or_insert_with(|| episodes.into()),
        )
    }

    /// Returns false when the show list is cached or already being fetched.
    pub fn begin_shows_fetch(&mut self) -> bool {
        if self.shows.is_some() || self.shows_in_flight {
            return false;
        }
        self.shows_in_flight = true;
        true
    }

    pub fn finish_shows_fetch(&mut self) {
        self.shows_in_flight = false;
    }

    /// Returns false when `show_id` is cached or already being fetched.
    pub fn begin_episodes_fetch(&mut self, show_id: ShowId) -> bool {
        if self.episodes.contains_key(&show_id) {
            return false;
        }
        self.episodes_in_flight.insert(show_id)
    }

    pub fn finish_episodes_fetch(&mut self, show_id: ShowId) {
        self.episodes_in_flight.remove(&show_id);
    }

    pub fn is_fetching_episodes(&self, show_id: ShowId) -> bool {
        self.episodes_in_flight.contains(&show_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::testing::{episode, show, FakeCatalog};

    #[test]
    fn episodes_fetched_once_per_visit() {
        let fake = FakeCatalog::default();
        fake.set_episodes(82, Ok(vec![episode(1, 1, 1, "Winter Is Coming", "")]));
        let mut cache = VisitCache::new();

        let a = cache.get_episodes(&fake, ShowId(82)).unwrap();
        let b = cache.get_episodes(&fake, ShowId(82)).unwrap();
        assert_eq!(fake.episode_calls(), 1);
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn shows_fetched_once_even_after_unrelated_error() {
        let fake = FakeCatalog::with_shows(vec![show(1, "Arrow", &[], "")]);
        let mut cache = VisitCache::new();
        cache.get_shows(&fake).unwrap();
        assert!(cache.get_episodes(&fake, ShowId(5)).is_err());
        cache.get_shows(&fake).unwrap();
        assert_eq!(fake.show_calls(), 1);
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let fake = FakeCatalog::default();
        fake.set_episodes(7, Err(CatalogError::Network("boom".into())));
        let mut cache = VisitCache::new();
        assert!(cache.get_episodes(&fake, ShowId(7)).is_err());
        assert!(cache.episodes(ShowId(7)).is_none());
        assert!(cache.get_episodes(&fake, ShowId(7)).is_err());
        assert_eq!(fake.episode_calls(), 2);
    }

    #[test]
    fn in_flight_requests_are_deduplicated() {
        let mut cache = VisitCache::new();
        assert!(cache.begin_episodes_fetch(ShowId(3)));
        assert!(!cache.begin_episodes_fetch(ShowId(3)));
        assert!(cache.begin_episodes_fetch(ShowId(4)));
        cache.store_episodes(ShowId(3), vec![]);
        cache.finish_episodes_fetch(ShowId(3));
        assert!(!cache.begin_episodes_fetch(ShowId(3)));
        assert!(cache.is_fetching_episodes(ShowId(4)));

        assert!(cache.begin_shows_fetch());
        assert!(!cache.begin_shows_fetch());
    }

    #[test]
    fn first_stored_entry_wins() {
        let mut cache = VisitCache::new();
        cache.store_episodes(ShowId(1), vec![episode(1, 1, 1, "first", "")]);
        let kept = cache.store_episodes(ShowId(1), vec![episode(2, 1, 1, "second", "")]);
        assert_eq!(kept[0].name, "first");
        assert!(Arc::ptr_eq(&kept, &cache.episodes(ShowId(1)).unwrap()));
    }
}
