use std::collections::HashSet;

use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::catalog::{Catalog, EntityKey};
use crate::magnetic::SelectionEvent;

use super::BubbleApp;

const MAX_SEARCH_ROWS: usize = 12;

impl BubbleApp {
    pub(super) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("bubble-magnet");
        ui.label(RichText::new("Tap a bubble to pull in its relatives, drag to stir.").weak());
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.reset();
            }
            if ui.button("Populate").clicked() {
                self.populate();
            }
            if ui.button("Add bubble").clicked() && !self.add_stray_bubble() {
                log::warn!("stray bubble was rejected by the scene");
            }
        });

        ui.checkbox(&mut self.scene.allows_multiple_selection, "Multiple selection");

        let mut speed = self.scene.speed();
        let slider = egui::Slider::new(&mut speed, 0.0..=2.0).text("Physics speed");
        if ui.add_enabled(!self.scene.is_resetting(), slider).changed() {
            self.scene.set_speed(speed);
        }

        ui.separator();
        ui.label("Add from dataset");
        ui.text_edit_singleline(&mut self.search);

        let matches = search_matches(
            self.provider.catalog(),
            self.provider.on_screen(),
            &self.search,
            MAX_SEARCH_ROWS,
        );
        if matches.is_empty() {
            ui.label(RichText::new("Nothing off screen matches.").weak());
        }
        egui::ScrollArea::vertical()
            .id_salt("search-results")
            .max_height(220.0)
            .show(ui, |ui| {
                for (key, label) in matches {
                    if ui.button(label).clicked() {
                        self.provider.add_entity(&mut self.scene, &key);
                    }
                }
            });

        ui.separator();
        ui.label(format!("bubbles: {}", self.scene.node_count()));
        ui.label(format!("selected: {}", self.scene.selected_nodes().len()));
        ui.label(format!(
            "dataset on screen: {} / {}",
            self.provider.on_screen().len(),
            self.provider.catalog().len()
        ));
        ui.label(format!("pending animations: {}", self.scene.timeline().len()));
        if let Some(text) = self.fps_display_text() {
            ui.label(RichText::new(text).monospace());
        }

        if !self.recent_events.is_empty() {
            ui.separator();
            ui.label("Recent selection");
            for event in &self.recent_events {
                let line = match event {
                    SelectionEvent::Selected(node) => format!("+ {node}"),
                    SelectionEvent::Deselected(node) => format!("- {node}"),
                };
                ui.label(RichText::new(line).monospace());
            }
        }
    }
}

/// Off-screen entities ranked by fuzzy score; an empty query lists them alphabetically.
pub(super) fn search_matches(
    catalog: &Catalog,
    on_screen: &HashSet<EntityKey>,
    query: &str,
    limit: usize,
) -> Vec<(EntityKey, String)> {
    let query = query.trim();
    let matcher = SkimMatcherV2::default();

    let mut scored = catalog
        .entities()
        .iter()
        .filter(|entity| !on_screen.contains(&entity.key))
        .filter_map(|entity| {
            if query.is_empty() {
                return Some((0, entity));
            }
            fuzzy_match_score(&matcher, &entity.label, query).map(|score| (score, entity))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.label.cmp(&b.1.label)));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, entity)| (entity.key.clone(), entity.label.clone()))
        .collect()
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}
