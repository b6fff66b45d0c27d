// src/app/ui/topbar.rs
use eframe::egui as eg;

use super::super::types::{LoadPhase, SortKey};

impl crate::app::SwexApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            // Sort menu: transient, closes after a key is picked.
            ui.menu_button("Sort By…", |ui| {
                ui.set_min_width(140.0);
                for key in SortKey::ALL {
                    if ui.button(key.label()).clicked() {
                        self.sort_by(key);
                        ui.close_menu();
                    }
                }
            });

            ui.separator();

            ui.add(
                eg::TextEdit::singleline(&mut self.filter)
                    .hint_text("Type to filter…")
                    .desired_width(ui.available_width() - 8.0),
            );
        });

        if self.phase != LoadPhase::Ready {
            ui.horizontal(|ui| {
                ui.add(eg::Spinner::new().size(12.0));
                ui.label(eg::RichText::new(&self.status_message).weak());
            });
        }
        ui.add_space(4.0);
    }
}
