// src/app/ui/grid.rs
use eframe::egui as eg;

use super::segments_job;
use crate::app::gfx::fit_width;
use crate::app::types::Action;
use crate::app::view::{Card, CardKey, Main, Page};

pub const CARD_W: f32 = 260.0;
pub const H_SPACING: f32 = 10.0;
pub const V_SPACING: f32 = 12.0;
const PLACEHOLDER_H: f32 = 146.0;

impl crate::app::TvxApp {
    pub(crate) fn ui_render_main(&mut self, ui: &mut eg::Ui, page: &Page, actions: &mut Vec<Action>) {
        match &page.main {
            Main::Error(msg) => {
                ui.add_space(12.0);
                ui.colored_label(ui.visuals().error_fg_color, msg);
            }
            Main::Empty(msg) => {
                ui.add_space(12.0);
                ui.label(eg::RichText::new(msg).italics());
            }
            Main::Cards(cards) => {
                let mut area = eg::ScrollArea::vertical().auto_shrink([false; 2]);
                if self.scroll_to_top {
                    area = area.vertical_scroll_offset(0.0);
                    self.scroll_to_top = false;
                }
                area.show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);
                        for card in cards {
                            self.ui_render_card(ui, card, actions);
                        }
                    });
                });
            }
        }
    }

    fn ui_render_card(&mut self, ui: &mut eg::Ui, card: &Card, actions: &mut Vec<Action>) {
        eg::Frame::group(ui.style())
            .inner_margin(eg::Margin::same(8.0))
            .show(ui, |ui| {
                ui.set_width(CARD_W);
                ui.vertical(|ui| {
                    // Title with external link
                    let title = segments_job(ui, &card.title, 16.0, ui.visuals().hyperlink_color);
                    if card.link.is_empty() {
                        ui.label(title);
                    } else {
                        ui.hyperlink_to(title, &card.link).on_hover_text(&card.link);
                    }

                    // Image (poster or still)
                    if let Some(url) = card.image.as_deref() {
                        let tex = self.images.as_mut().and_then(|img| img.texture(url).cloned());
                        match tex {
                            Some(tex) => {
                                let size = fit_width(&tex, CARD_W);
                                ui.add(eg::Image::new((tex.id(), size)))
                                    .on_hover_text(&card.image_alt);
                            }
                            None => {
                                let failed = self.images.as_ref().map_or(true, |img| img.is_failed(url));
                                let (rect, _) = ui.allocate_exact_size(
                                    eg::vec2(CARD_W, PLACEHOLDER_H),
                                    eg::Sense::hover(),
                                );
                                ui.painter().rect_filled(rect, 6.0, eg::Color32::from_gray(40));
                                ui.painter().text(
                                    rect.center(),
                                    eg::Align2::CENTER_CENTER,
                                    if failed { "No image" } else { "Loading image…" },
                                    eg::FontId::proportional(13.0),
                                    eg::Color32::GRAY,
                                );
                            }
                        }
                    }

                    for line in &card.meta {
                        ui.label(eg::RichText::new(line).small().weak());
                    }

                    if !card.summary.is_empty() {
                        ui.add_space(4.0);
                        let summary = segments_job(ui, &card.summary, 13.0, ui.visuals().text_color());
                        ui.label(summary);
                    }

                    if let CardKey::Show(id) = card.key {
                        ui.add_space(4.0);
                        if ui.button("View episodes").clicked() {
                            actions.push(Action::SelectShow(id));
                        }
                    }
                });
            });
    }
}
