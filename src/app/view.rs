// src/app/view.rs
//! Immutable description of one full frame, derived from [`BrowsingState`].
//! The egui layer paints a `Page` and never reads the state directly.

use itertools::Itertools;

use super::data::{Episode, EpisodeId, Show, ShowId};
use regex::Regex;

use super::catalog::CatalogError;
use super::filters::{highlight_with, literal_matcher, Segment};
use super::state::{BrowsingState, Phase};
use super::utils::{format_airdate, format_rating, format_runtime, strip_html};

pub const SHOW_PLACEHOLDER: &str = "-- Select a show --";
pub const EPISODE_PLACEHOLDER: &str = "-- All episodes --";
pub const SEARCH_HINT_SHOWS: &str = "Search shows by name, genre or summary...";
pub const SEARCH_HINT_EPISODES: &str = "Search episodes by title or summary...";
pub const NO_EPISODES: &str = "No episodes to display.";
pub const NO_MATCHING_SHOWS: &str = "No shows match your search.";

#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption<K> {
    pub value: K,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub shows: Vec<SelectOption<ShowId>>,
    pub selected_show: Option<ShowId>,
    pub episodes: Vec<SelectOption<EpisodeId>>,
    pub selected_episode: Option<EpisodeId>,
    pub search: String,
    pub search_hint: &'static str,
    pub can_go_back: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardKey {
    Show(ShowId),
    Episode(EpisodeId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub key: CardKey,
    pub title: Vec<Segment>,
    pub link: String,
    pub image: Option<String>,
    pub image_alt: String,
    /// Catalog HTML, untouched.
    pub summary_html: String,
    /// Tag-stripped summary with search matches flagged.
    pub summary: Vec<Segment>,
    pub meta: Vec<String>,
}

impl Card {
    pub fn title_text(&self) -> String {
        self.title.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Main {
    Cards(Vec<Card>),
    Empty(String),
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attribution {
    pub prefix: &'static str,
    pub link_text: &'static str,
    pub url: &'static str,
}

pub const ATTRIBUTION: Attribution = Attribution {
    prefix: "Data originally from",
    link_text: "TVMaze.com",
    url: "https://www.tvmaze.com/",
};

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub heading: String,
    pub controls: Controls,
    pub count: Option<String>,
    pub loading: Option<&'static str>,
    pub main: Main,
    pub footer: Attribution,
}

pub fn episode_label(ep: &Episode) -> String {
    format!("{} - {}", ep.code(), ep.name)
}

pub fn episode_count_text(n: usize) -> String {
    format!("Displaying {n} episode(s)")
}

pub fn show_count_text(n: usize) -> String {
    format!("found {n} shows")
}

pub fn render(state: &BrowsingState) -> Page {
    let term = state.search_term();
    let matcher = literal_matcher(term);
    let matcher = matcher.as_ref();
    let in_episodes = state.in_episode_view();

    let show_options = state
        .shows()
        .iter()
        .map(|s| SelectOption { value: s.id, label: s.name.clone() })
        .collect();

    let (episode_options, count, main) = match state.phase() {
        Phase::Initial => (Vec::new(), None, Main::Cards(Vec::new())),
        Phase::LoadFailed(msg) => (Vec::new(), None, Main::Error(msg.clone())),
        Phase::ShowsLoaded if state.catalog_empty() => {
            (Vec::new(), None, Main::Empty(CatalogError::EmptyCatalog.to_string()))
        }
        Phase::ShowsLoaded => {
            let visible = state.visible_shows();
            let count = Some(show_count_text(visible.len()));
            let main = if visible.is_empty() {
                Main::Empty(NO_MATCHING_SHOWS.to_string())
            } else {
                Main::Cards(visible.into_iter().map(|s| show_card(s, matcher)).collect())
            };
            (Vec::new(), count, main)
        }
        Phase::EpisodesLoaded(_) => {
            let options = state
                .listed_episodes()
                .into_iter()
                .map(|e| SelectOption { value: e.id, label: episode_label(e) })
                .collect();
            let visible = state.visible_episodes();
            let count = Some(episode_count_text(visible.len()));
            let main = if visible.is_empty() {
                Main::Empty(NO_EPISODES.to_string())
            } else {
                Main::Cards(visible.into_iter().map(|e| episode_card(e, matcher)).collect())
            };
            (options, count, main)
        }
    };

    let heading = match state.current_show_name() {
        Some(name) if in_episodes => name.to_string(),
        _ => "TV Shows".to_string(),
    };

    Page {
        heading,
        controls: Controls {
            shows: show_options,
            selected_show: state.pending_show().or(state.current_show()),
            episodes: episode_options,
            selected_episode: state.jump_target(),
            search: term.to_string(),
            search_hint: if in_episodes { SEARCH_HINT_EPISODES } else { SEARCH_HINT_SHOWS },
            can_go_back: state.shows_ready() && !matches!(state.phase(), Phase::ShowsLoaded),
        },
        count,
        loading: state.loading(),
        main,
        footer: ATTRIBUTION,
    }
}

fn show_card(show: &Show, matcher: Option<&Regex>) -> Card {
    let mut meta = Vec::new();
    if !show.genres.is_empty() {
        meta.push(format!("Genres: {}", show.genres.iter().join(", ")));
    }
    if !show.status.is_empty() {
        meta.push(format!("Status: {}", show.status));
    }
    meta.push(format_rating(show.average_rating()));
    if let Some(rt) = format_runtime(show.runtime) {
        meta.push(format!("Runtime: {rt}"));
    }
    Card {
        key: CardKey::Show(show.id),
        title: highlight_with(matcher, &show.name),
        link: show.url.clone(),
        image: show.poster().map(str::to_string),
        image_alt: format!("{} poster", show.name),
        summary_html: show.summary.clone(),
        summary: highlight_with(matcher, &strip_html(&show.summary)),
        meta,
    }
}

fn episode_card(ep: &Episode, matcher: Option<&Regex>) -> Card {
    let mut title = highlight_with(matcher, &ep.name);
    title.push(Segment::plain(format!(" - {}", ep.code())));

    let mut meta = Vec::new();
    if let Some(date) = ep.airdate.as_deref().and_then(format_airdate) {
        meta.push(format!("Aired {date}"));
    }
    if let Some(rt) = format_runtime(ep.runtime) {
        meta.push(rt);
    }
    Card {
        key: CardKey::Episode(ep.id),
        title,
        link: ep.url.clone(),
        image: ep.still().map(str::to_string),
        image_alt: format!("{} still image", ep.name),
        summary_html: ep.summary.clone(),
        summary: highlight_with(matcher, &strip_html(&ep.summary)),
        meta,
    }
}
