// src/app/ui.rs
pub mod grid;
pub mod topbar;

use eframe::egui::{self as eg, text::LayoutJob, Color32, FontId, TextFormat};

use super::filters::Segment;
use super::view::Attribution;

const MARK_BG: Color32 = Color32::from_rgb(250, 214, 92);

/// Lay out segments, painting matched runs with a marker background.
pub(crate) fn segments_job(ui: &eg::Ui, segments: &[Segment], size: f32, color: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    for seg in segments {
        let mut fmt = TextFormat {
            font_id: FontId::proportional(size),
            color,
            ..Default::default()
        };
        if seg.highlighted {
            fmt.background = MARK_BG;
            fmt.color = Color32::BLACK;
        }
        job.append(&seg.text, 0.0, fmt);
    }
    job.wrap.max_width = ui.available_width();
    job
}

impl crate::app::TvxApp {
    pub(crate) fn ui_render_loading(ui: &mut eg::Ui, text: &str) {
        ui.horizontal(|ui| {
            ui.add(eg::Spinner::new().size(14.0));
            ui.label(eg::RichText::new(text).italics());
        });
    }

    pub(crate) fn ui_render_footer(ui: &mut eg::Ui, footer: &Attribution) {
        ui.horizontal(|ui| {
            ui.label(eg::RichText::new(footer.prefix).weak());
            ui.hyperlink_to(footer.link_text, footer.url);
        });
    }
}
