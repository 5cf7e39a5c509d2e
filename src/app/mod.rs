// src/app/mod.rs — catalog browser shell: background fetches + full redraw per frame

// ---- Standard lib imports ----
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

// ---- Crates ----
use eframe::egui as eg;
use tracing::{error, info};

// ---- Local modules ----
pub mod browser;
pub mod cache;
pub mod catalog;
pub mod data;
pub mod fetch;
pub mod filters;
pub mod gfx;
pub mod images;
pub mod state;
pub mod types;
pub mod ui;
pub mod utils;
pub mod view;

use crate::config::AppConfig;
use browser::Browser;
use catalog::{CatalogError, CatalogSource, HttpCatalog};
use images::ImageLoader;
use types::{Action, Command, FetchMsg};
use view::Page;

// ---- Tunables ----
const MAX_MSGS_PER_FRAME: usize = 16;

pub struct TvxApp {
    browser: Browser,
    catalog: Result<Arc<dyn CatalogSource>, CatalogError>,
    fetch_tx: Sender<FetchMsg>,
    fetch_rx: Receiver<FetchMsg>,
    images: Option<ImageLoader>,

    // one-time init guard
    did_init: bool,

    // reset the card scroller on the next paint
    scroll_to_top: bool,

    // last rendered page; `None` after any state change
    page: Option<Page>,
}

impl TvxApp {
    pub fn new(cfg: AppConfig, ctx: &eg::Context) -> Self {
        let catalog = HttpCatalog::new(&cfg).map(|c| {
            info!("catalog at {}", c.base_url());
            Arc::new(c) as Arc<dyn CatalogSource>
        });
        Self::with_catalog(cfg, catalog, ctx)
    }

    pub fn with_catalog(
        cfg: AppConfig,
        catalog: Result<Arc<dyn CatalogSource>, CatalogError>,
        ctx: &eg::Context,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();
        let images = cfg.load_images.then(|| ImageLoader::new(&cfg, ctx));
        Self {
            browser: Browser::new(cfg.auto_select_first_show),
            catalog,
            fetch_tx,
            fetch_rx,
            images,
            did_init: false,
            scroll_to_top: false,
            page: None,
        }
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    fn execute(&mut self, cmd: Option<Command>, ctx: &eg::Context) {
        let Some(cmd) = cmd else { return };
        match &self.catalog {
            Ok(catalog) => {
                fetch::spawn_command(Arc::clone(catalog), cmd, self.fetch_tx.clone(), ctx.clone());
            }
            Err(e) => {
                error!("no catalog client: {e}");
                fetch::report_failure(cmd, e.clone(), &self.fetch_tx, ctx);
            }
        }
    }

    fn apply(&mut self, action: Action, ctx: &eg::Context) {
        if matches!(action, Action::SelectShow(_) | Action::ShowAll | Action::JumpTo(_)) {
            self.scroll_to_top = true;
        }
        self.page = None;
        let cmd = self.browser.dispatch(action);
        self.execute(cmd, ctx);
    }

    fn poll_fetches(&mut self, ctx: &eg::Context) {
        let mut processed = 0;
        while processed < MAX_MSGS_PER_FRAME {
            match self.fetch_rx.try_recv() {
                Ok(msg) => {
                    processed += 1;
                    self.page = None;
                    let cmd = self.browser.handle(msg);
                    self.execute(cmd, ctx);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if processed > 0 {
            ctx.request_repaint();
        }
    }
}

// ========== App impl ==========
impl eframe::App for TvxApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        // First frame
        if !self.did_init {
            self.did_init = true;
            self.page = None;
            let cmd = self.browser.start();
            self.execute(cmd, ctx);
        }

        self.poll_fetches(ctx);
        if let Some(images) = self.images.as_mut() {
            images.poll(ctx);
        }

        // Rebuilt only after the state changed; idle frames repaint the last one.
        let page = match self.page.take() {
            Some(page) => page,
            None => view::render(self.browser.state()),
        };
        let mut actions: Vec<Action> = Vec::new();

        eg::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.ui_render_topbar(ui, &page, &mut actions);
        });
        eg::TopBottomPanel::bottom("attribution").show(ctx, |ui| {
            Self::ui_render_footer(ui, &page.footer);
        });
        eg::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&page.heading);
            if let Some(text) = page.loading {
                Self::ui_render_loading(ui, text);
            }
            ui.separator();
            self.ui_render_main(ui, &page, &mut actions);
        });
        self.page = Some(page);

        for action in actions {
            self.apply(action, ctx);
        }
    }
}
