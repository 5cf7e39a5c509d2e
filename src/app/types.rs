// src/app/types.rs
use super::catalog::CatalogError;
use super::data::{Episode, EpisodeId, Show, ShowId};

// ---- user intents (from the painted page) ----
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SelectShow(ShowId),
    ShowAll,
    Search(String),
    JumpTo(Option<EpisodeId>),
}

// ---- work the shell must run off the UI thread ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    FetchShows,
    FetchEpisodes(ShowId),
}

// ---- cross-thread messages / data ----
#[derive(Debug)]
pub enum FetchMsg {
    Shows(Result<Vec<Show>, CatalogError>),
    /// Tagged with the show the request was issued for.
    Episodes {
        show_id: ShowId,
        result: Result<Vec<Episode>, CatalogError>,
    },
}

pub struct ImageDone {
    pub url: String,
    /// (width, height, RGBA8 bytes)
    pub result: Result<(u32, u32, Vec<u8>), String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Failed,
}
