use regex::{Regex, RegexBuilder};

use super::data::{Episode, Show};
use super::utils::strip_html;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// A run of text, flagged when it matched the search term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), highlighted: false }
    }
}

pub fn normalize_term(s: &str) -> String {
    s.trim().to_lowercase()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub fn show_matches(show: &Show, needle: &str) -> bool {
    contains_ci(&show.name, needle)
        || contains_ci(&show.genres.join(", "), needle)
        || contains_ci(&strip_html(&show.summary), needle)
}

pub fn episode_matches(ep: &Episode, needle: &str) -> bool {
    contains_ci(&ep.name, needle) || contains_ci(&strip_html(&ep.summary), needle)
}

pub fn filter_shows<'a>(shows: &'a [Show], term: &str) -> Vec<&'a Show> {
    let needle = normalize_term(term);
    if needle.is_empty() {
        return shows.iter().collect();
    }
    shows.iter().filter(|s| show_matches(s, &needle)).collect()
}

pub fn filter_episodes<'a>(episodes: &'a [Episode], term: &str) -> Vec<&'a Episode> {
    let needle = normalize_term(term);
    if needle.is_empty() {
        return episodes.iter().collect();
    }
    episodes.iter().filter(|e| episode_matches(e, &needle)).collect()
}

/// Case-insensitive matcher for `term` taken literally. `None` for a blank
/// term. Build it once and reuse it across every text of a frame.
pub fn literal_matcher(term: &str) -> Option<Regex> {
    let needle = term.trim();
    if needle.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Split `text` into plain and matched runs. An empty term yields the text
/// as one plain segment.
pub fn highlight(text: &str, term: &str) -> Vec<Segment> {
    highlight_with(literal_matcher(term).as_ref(), text)
}

/// [`highlight`] with a matcher from [`literal_matcher`].
pub fn highlight_with(matcher: Option<&Regex>, text: &str) -> Vec<Segment> {
    let Some(re) = matcher else {
        return if text.is_empty() { Vec::new() } else { vec![Segment::plain(text)] };
    };
    let mut out = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            out.push(Segment::plain(&text[last..m.start()]));
        }
        out.push(Segment { text: m.as_str().to_string(), highlighted: true });
        last = m.end();
    }
    if last < text.len() {
        out.push(Segment::plain(&text[last..]));
    }
    out
}

/// Same as [`highlight`] but as markup, each match wrapped in `<mark>`.
pub fn highlight_markup(text: &str, term: &str) -> String {
    highlight(text, term)
        .into_iter()
        .map(|seg| {
            if seg.highlighted {
                format!("{MARK_OPEN}{}{MARK_CLOSE}", seg.text)
            } else {
                seg.text
            }
        })
        .collect()
}
