// src/app/catalog.rs
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

use super::data::{Episode, Show, ShowId};
use crate::config::AppConfig;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Transport failure, non-success status or an unreadable body.
    #[error("{0}")]
    Network(String),
    /// The show list loaded but holds no entries. Degraded, not failed: the
    /// page shows this message instead of cards.
    #[error("No shows found.")]
    EmptyCatalog,
    #[error("no episodes found for show {0}")]
    NotFound(ShowId),
}

/// Read-only access to the show catalog.
pub trait CatalogSource: Send + Sync {
    /// Every show, sorted by name (case-insensitive, ascending).
    fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError>;
    /// Episodes of one show in upstream (season, number) order.
    fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, CatalogError>;
}

pub fn sort_shows_by_name(shows: &mut [Show]) {
    shows.sort_by_cached_key(|s| s.name.to_lowercase());
}

pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(cfg: &AppConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!("tvx/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(ACCEPT, HeaderValue::from_static("application/json"));
                h
            })
            .build()
            .map_err(|e| CatalogError::Network(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_bytes(&self, what: &str, url: &str) -> Result<(StatusCode, Vec<u8>), CatalogError> {
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| CatalogError::Network(format!("{what} request failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Ok((status, Vec::new()));
        }
        let body = resp
            .bytes()
            .map_err(|e| CatalogError::Network(format!("{what} response unreadable: {e}")))?
            .to_vec();
        Ok((status, body))
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError> {
        let url = format!("{}/shows", self.base_url);
        let (status, body) = self.get_bytes("Shows", &url)?;
        if !status.is_success() {
            return Err(CatalogError::Network(format!(
                "Shows request failed (status {})",
                status.as_u16()
            )));
        }
        let mut shows: Vec<Show> = serde_json::from_slice(&body)
            .map_err(|e| CatalogError::Network(format!("Shows response malformed: {e}")))?;
        sort_shows_by_name(&mut shows);
        info!("fetched {} shows", shows.len());
        Ok(shows)
    }

    fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, CatalogError> {
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);
        let (status, body) = self.get_bytes("Episodes", &url)?;
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(show_id));
        }
        if !status.is_success() {
            return Err(CatalogError::Network(format!(
                "Episodes request failed (status {})",
                status.as_u16()
            )));
        }
        let episodes: Vec<Episode> = serde_json::from_slice(&body)
            .map_err(|e| CatalogError::Network(format!("Episodes response malformed: {e}")))?;
        info!("fetched {} episodes for show {show_id}", episodes.len());
        Ok(episodes)
    }
}


#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::testing::show;
    use super::*;

    /// Serve exactly one canned HTTP response on a local port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                let mut stream = stream;
                let _ = write!(
                    stream,
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.flush();
            }
        });
        format!("http://{addr}")
    }

    fn catalog_for(base: String) -> HttpCatalog {
        let cfg = AppConfig {
            api_base_url: base,
            request_timeout_secs: 5,
            ..AppConfig::default()
        };
        HttpCatalog::new(&cfg).unwrap()
    }

    #[test]
    fn shows_are_sorted_case_insensitively() {
        let base = serve_once(
            "200 OK",
            r#"[{"id":2,"name":"banshee"},{"id":1,"name":"Arrow"},{"id":3,"name":"Castle"},{"id":4,"name":"alf"}]"#,
        );
        let shows = catalog_for(base).fetch_shows().unwrap();
        let names: Vec<_> = shows.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["alf", "Arrow", "banshee", "Castle"]);
        for pair in shows.windows(2) {
            assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
        }
    }

    #[test]
    fn non_success_status_is_network_error() {
        let base = serve_once("500 Internal Server Error", "");
        let err = catalog_for(base).fetch_episodes(ShowId(82)).unwrap_err();
        assert_eq!(
            err,
            CatalogError::Network("Episodes request failed (status 500)".into())
        );
    }

    #[test]
    fn missing_show_is_not_found() {
        let base = serve_once("404 Not Found", "");
        let err = catalog_for(base).fetch_episodes(ShowId(999)).unwrap_err();
        assert_eq!(err, CatalogError::NotFound(ShowId(999)));
    }

    #[test]
    fn malformed_json_is_network_error() {
        let base = serve_once("200 OK", "{ nope");
        let err = catalog_for(base).fetch_shows().unwrap_err();
        assert!(matches!(err, CatalogError::Network(ref m) if m.starts_with("Shows response malformed")));
    }

    #[test]
    fn unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = catalog_for(format!("http://{addr}")).fetch_shows().unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
    }

    #[test]
    fn sort_is_stable_for_equal_names() {
        let mut shows = vec![show(1, "Lost", &[], ""), show(2, "lost", &[], ""), show(3, "Alias", &[], "")];
        sort_shows_by_name(&mut shows);
        let ids: Vec<u32> = shows.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, [3, 1, 2]);
    }
}
