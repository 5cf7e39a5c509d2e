// src/main.rs
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn pick_renderer() -> eframe::Renderer {
    match env::var("TVX_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            { eframe::Renderer::Wgpu }
            #[cfg(not(target_os = "windows"))]
            { eframe::Renderer::Glow }
        }
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cfg = tvx::config::load_config();
    info!(
        "api={} auto_select_first_show={} images={}",
        cfg.api_base_url, cfg.auto_select_first_show, cfg.load_images
    );

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        viewport: egui::ViewportBuilder::default()
            .with_title("TV Show Explorer")
            .with_inner_size([1180.0, 820.0]),
        ..Default::default()
    };

    match eframe::run_native(
        "TV Show Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(tvx::app::TvxApp::new(cfg, &cc.egui_ctx)))),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try TVX_RENDERER=wgpu or TVX_RENDERER=glow.");
            Err(e)
        }
    }
}
