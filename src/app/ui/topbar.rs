// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::types::Action;
use crate::app::view::{Page, EPISODE_PLACEHOLDER, SHOW_PLACEHOLDER};

impl crate::app::TvxApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&self, ui: &mut eg::Ui, page: &Page, actions: &mut Vec<Action>) {
        let controls = &page.controls;
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            // Show selector (empty until the catalog loads)
            ui.label("Show:");
            let selected_label = controls
                .selected_show
                .and_then(|id| controls.shows.iter().find(|o| o.value == id))
                .map(|o| o.label.as_str())
                .unwrap_or(SHOW_PLACEHOLDER);
            ui.add_enabled_ui(!controls.shows.is_empty(), |ui| {
                eg::ComboBox::from_id_source("show_selector")
                    .selected_text(selected_label)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for opt in &controls.shows {
                            let selected = controls.selected_show == Some(opt.value);
                            if ui.selectable_label(selected, &opt.label).clicked() {
                                actions.push(Action::SelectShow(opt.value));
                            }
                        }
                    });
            });

            if controls.can_go_back && ui.button("All shows").clicked() {
                actions.push(Action::ShowAll);
            }

            ui.separator();

            // Search
            ui.label("Search:");
            let mut term = controls.search.clone();
            let resp = ui.add(
                eg::TextEdit::singleline(&mut term)
                    .hint_text(controls.search_hint)
                    .desired_width(260.0),
            );
            if resp.changed() {
                actions.push(Action::Search(term));
            }

            // Jump to (episode view only)
            if !controls.episodes.is_empty() {
                ui.separator();
                ui.label("Jump to:");
                let jump_label = controls
                    .selected_episode
                    .and_then(|id| controls.episodes.iter().find(|o| o.value == id))
                    .map(|o| o.label.as_str())
                    .unwrap_or(EPISODE_PLACEHOLDER);
                eg::ComboBox::from_id_source("episode_selector")
                    .selected_text(jump_label)
                    .width(260.0)
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_label(controls.selected_episode.is_none(), EPISODE_PLACEHOLDER)
                            .clicked()
                        {
                            actions.push(Action::JumpTo(None));
                        }
                        for opt in &controls.episodes {
                            let selected = controls.selected_episode == Some(opt.value);
                            if ui.selectable_label(selected, &opt.label).clicked() {
                                actions.push(Action::JumpTo(Some(opt.value)));
                            }
                        }
                    });
            }
        });

        if let Some(count) = &page.count {
            ui.label(eg::RichText::new(count).weak());
        }
        ui.add_space(4.0);
    }
}
