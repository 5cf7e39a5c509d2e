// src/app/images.rs
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui::{self as eg, TextureHandle};
use image::imageops::FilterType;
use image::GenericImageView;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use super::gfx::upload_rgba;
use super::types::{ImageDone, ImageState};
use super::utils::url_to_cache_key;
use crate::config::AppConfig;

// ---- Tunables ----
const RESIZE_MAX_W: u32 = 320;
const MAX_DONE_PER_FRAME: usize = 12;
const MAX_UPLOADS_PER_FRAME: usize = 4;

/// Poster/still textures for this run. Downloads run on a small worker pool
/// sharing one HTTP client; uploads happen on the UI thread in `poll`.
pub struct ImageLoader {
    work_tx: Option<Sender<String>>,
    done_rx: Receiver<ImageDone>,
    states: HashMap<String, ImageState>,
    textures: HashMap<String, TextureHandle>,
    ready: Vec<ImageDone>,
}

impl ImageLoader {
    pub fn new(cfg: &AppConfig, ctx: &eg::Context) -> Self {
        let (work_tx, work_rx) = mpsc::channel::<String>();
        let (done_tx, done_rx) = mpsc::channel::<ImageDone>();
        let mut loader = Self {
            work_tx: None,
            done_rx,
            states: HashMap::new(),
            textures: HashMap::new(),
            ready: Vec::new(),
        };

        // One shared client (connection pooling + keep-alive)
        let client = match Client::builder()
            .user_agent(concat!("tvx/", env!("CARGO_PKG_VERSION"), " images"))
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .pool_max_idle_per_host(cfg.image_workers)
            .build()
        {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("image client build failed, images disabled: {e}");
                return loader;
            }
        };

        let work_rx = Arc::new(Mutex::new(work_rx));
        for i in 0..cfg.image_workers {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            let ctx = ctx.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("tvx-img-{i}"))
                .spawn(move || loop {
                    let job = {
                        let Ok(rx) = work_rx.lock() else { break };
                        rx.recv()
                    };
                    let Ok(url) = job else { break };
                    let result = download_and_decode(&client, &url, RESIZE_MAX_W);
                    if done_tx.send(ImageDone { url, result }).is_err() {
                        break;
                    }
                    ctx.request_repaint();
                });
            if let Err(e) = spawned {
                warn!("image worker {i} failed to start: {e}");
            }
        }
        loader.work_tx = Some(work_tx);
        loader
    }

    /// Texture for `url` if uploaded; otherwise queues it (once).
    pub fn texture(&mut self, url: &str) -> Option<&TextureHandle> {
        if !self.textures.contains_key(url) {
            self.request(url);
        }
        self.textures.get(url)
    }

    pub fn is_failed(&self, url: &str) -> bool {
        matches!(self.states.get(url), Some(ImageState::Failed))
    }

    fn request(&mut self, url: &str) {
        if self.states.contains_key(url) {
            return;
        }
        let Some(tx) = &self.work_tx else {
            self.states.insert(url.to_string(), ImageState::Failed);
            return;
        };
        let state = if tx.send(url.to_string()).is_ok() {
            ImageState::Pending
        } else {
            ImageState::Failed
        };
        self.states.insert(url.to_string(), state);
    }

    /// Drain finished downloads and upload a bounded number per frame.
    pub fn poll(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;
        while drained < MAX_DONE_PER_FRAME {
            match self.done_rx.try_recv() {
                Ok(done) => {
                    drained += 1;
                    self.ready.push(done);
                }
                Err(_) => break,
            }
        }

        let take = self.ready.len().min(MAX_UPLOADS_PER_FRAME);
        for done in self.ready.drain(..take).collect::<Vec<_>>() {
            let uploaded = done
                .result
                .and_then(|(w, h, bytes)| upload_rgba(ctx, w, h, &bytes, &url_to_cache_key(&done.url)));
            match uploaded {
                Ok(tex) => {
                    self.states.remove(&done.url);
                    self.textures.insert(done.url, tex);
                }
                Err(e) => {
                    warn!("image {} failed: {e}", done.url);
                    self.states.insert(done.url, ImageState::Failed);
                }
            }
        }
        if !self.ready.is_empty() {
            ctx.request_repaint();
        }
    }
}

fn download_and_decode(client: &Client, url: &str, max_w: u32) -> Result<(u32, u32, Vec<u8>), String> {
    debug!("GET image {url}");
    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("download: {e}"))?;
    decode_and_fit(&bytes, max_w)
}

/// Decode and shrink to at most `max_w` wide, keeping aspect.
pub fn decode_and_fit(bytes: &[u8], max_w: u32) -> Result<(u32, u32, Vec<u8>), String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("decode: {e}"))?;
    let (w, h) = img.dimensions();
    let img = if w > max_w {
        let new_h = ((h as f32) * (max_w as f32 / w as f32)).round().max(1.0) as u32;
        img.resize_exact(max_w, new_h, FilterType::CatmullRom)
    } else {
        img
    };
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().into_raw()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, RgbaImage};

    use super::*;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, image::Rgba([200, 10, 10, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        out
    }

    #[test]
    fn wide_images_are_downscaled() {
        let (w, h, bytes) = decode_and_fit(&png(640, 960), 320).unwrap();
        assert_eq!((w, h), (320, 480));
        assert_eq!(bytes.len(), 320 * 480 * 4);
    }

    #[test]
    fn small_images_are_kept() {
        let (w, h, _) = decode_and_fit(&png(100, 60), 320).unwrap();
        assert_eq!((w, h), (100, 60));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_and_fit(b"not an image", 320).is_err());
    }
}
