use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://api.tvmaze.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_IMAGE_WORKERS: usize = 4;
pub const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub auto_select_first_show: bool,
    pub load_images: bool,
    pub image_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            auto_select_first_show: false,
            load_images: true,
            image_workers: DEFAULT_IMAGE_WORKERS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "api_base")]
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    auto_select_first_show: Option<bool>,
    load_images: Option<bool>,
    image_workers: Option<usize>,
}

pub fn load_config() -> AppConfig {
    load_config_from(&PathBuf::from(CONFIG_FILE))
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(url) = parsed.api_base_url {
                    let trimmed = url.trim().trim_end_matches('/');
                    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                        cfg.api_base_url = trimmed.to_string();
                    } else {
                        warn!(
                            "Ignoring api_base_url `{url}` in {}; expected an http(s) URL.",
                            cfg_path.display()
                        );
                    }
                }
                if let Some(secs) = parsed.request_timeout_secs {
                    cfg.request_timeout_secs = secs.max(1);
                }
                if let Some(auto) = parsed.auto_select_first_show {
                    cfg.auto_select_first_show = auto;
                }
                if let Some(images) = parsed.load_images {
                    cfg.load_images = images;
                }
                if let Some(n) = parsed.image_workers {
                    cfg.image_workers = n.clamp(1, 16);
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Using defaults.",
                    cfg_path.display(),
                    err
                );
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_cfg(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.json"));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn overlays_known_keys_and_ignores_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cfg(
            &dir,
            r#"{
                "api_base_url": "http://127.0.0.1:9000/",
                "auto_select_first_show": true,
                "image_workers": 99,
                "something_else": 1
            }"#,
        );
        let cfg = load_config_from(&path);
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:9000");
        assert!(cfg.auto_select_first_show);
        assert_eq!(cfg.image_workers, 16);
        assert_eq!(cfg.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(cfg.load_images);
    }

    #[test]
    fn invalid_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cfg(&dir, "{ not json");
        assert_eq!(load_config_from(&path), AppConfig::default());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cfg(&dir, r#"{ "api_base": "ftp://example.com", "request_timeout_secs": 0 }"#);
        let cfg = load_config_from(&path);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.request_timeout_secs, 1);
    }
}
