// src/app/ui/table.rs
use eframe::egui as eg;
use egui_extras::{Column, TableBuilder};

use super::super::types::LoadPhase;
use super::star_glyphs;

const ROW_HEIGHT: f32 = 26.0;

impl crate::app::SwexApp {
    pub(crate) fn ui_render_film_table(&mut self, ui: &mut eg::Ui, filtered: &[usize]) {
        if filtered.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                let msg = if self.films.is_empty() {
                    if self.phase == LoadPhase::Ready {
                        "No films loaded."
                    } else {
                        "Loading…"
                    }
                } else {
                    "No films match the filter."
                };
                ui.label(eg::RichText::new(msg).weak());
            });
            return;
        }

        // Clicks are applied after the table closure releases its borrows.
        let mut clicked: Option<String> = None;

        TableBuilder::new(ui)
            .striped(true)
            .sense(eg::Sense::click())
            .column(Column::auto().at_least(96.0)) // episode
            .column(Column::remainder()) // title
            .column(Column::auto().at_least(120.0)) // rating
            .column(Column::auto().at_least(88.0)) // year
            .body(|body| {
                body.rows(ROW_HEIGHT, filtered.len(), |mut row| {
                    let film = &self.films[filtered[row.index()]];
                    row.set_selected(self.selected_id.as_deref() == Some(film.id.as_str()));

                    row.col(|ui| {
                        ui.label(&film.episode);
                    });
                    row.col(|ui| {
                        ui.label(&film.title);
                    });
                    row.col(|ui| {
                        if let Some(avg) = film.average_rating {
                            ui.label(
                                eg::RichText::new(star_glyphs(avg))
                                    .color(eg::Color32::GOLD)
                                    .size(12.0),
                            );
                        }
                    });
                    row.col(|ui| {
                        ui.label(&film.year);
                    });

                    // Clicking always selects; re-clicking the selected row
                    // does not clear it.
                    if row.response().clicked() {
                        clicked = Some(film.id.clone());
                    }
                });
            });

        if let Some(id) = clicked {
            self.selected_id = Some(id);
        }
    }
}
