// src/app/detail.rs
use eframe::egui as eg;

impl crate::app::SwexApp {
    pub(crate) fn ui_render_detail_panel(&mut self, ctx: &eg::Context) {
        let screen_w: f32 = ctx.input(|i| i.screen_rect().width());
        let max_w: f32 = (screen_w * 0.5).clamp(320.0, 560.0);

        eg::SidePanel::right("detail_panel")
            .resizable(true)
            .default_width(380.0)
            .min_width(280.0)
            .max_width(max_w)
            .show(ctx, |ui| {
                // Clone so the poster upload below can borrow self mutably.
                let Some(film) = self.selected_film().cloned() else {
                    let rect = ui.max_rect();
                    ui.painter().text(
                        rect.center(),
                        eg::Align2::CENTER_CENTER,
                        "No Movie Selected",
                        eg::FontId::proportional(16.0),
                        ui.visuals().strong_text_color(),
                    );
                    return;
                };

                ui.add_space(6.0);
                ui.heading(&film.title);
                ui.label(
                    eg::RichText::new(format!("{}  •  {}", film.episode, film.year)).weak(),
                );
                ui.add_space(8.0);

                ui.horizontal_top(|ui| {
                    if let Some(url) = &film.poster_url {
                        let poster_w = 150.0_f32.min(ui.available_width() * 0.4);
                        let poster_size = eg::vec2(poster_w, poster_w * 1.5);
                        if let Some(tex) = self.poster_texture(ui.ctx(), url) {
                            ui.image((tex.id(), poster_size));
                        } else {
                            let (rect, _resp) =
                                ui.allocate_exact_size(poster_size, eg::Sense::hover());
                            ui.painter()
                                .rect_filled(rect, 8.0, eg::Color32::from_gray(40));
                            ui.painter().text(
                                rect.center(),
                                eg::Align2::CENTER_CENTER,
                                "Poster loading…",
                                eg::FontId::proportional(13.0),
                                eg::Color32::WHITE,
                            );
                        }
                        ui.add_space(8.0);
                    }
                    ui.label(&film.opening_crawl);
                });

                ui.add_space(8.0);
                ui.label(format!("Directed by: {}", film.producer));

                if let Some(avg) = film.average_rating {
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        ui.label("Average rating:");
                        ui.label(
                            eg::RichText::new(super::ui::star_glyphs(avg))
                                .color(eg::Color32::GOLD),
                        );
                    });
                }

                if !film.ratings.is_empty() {
                    ui.add_space(6.0);
                    ui.horizontal_wrapped(|ui| {
                        for rating in &film.ratings {
                            ui.add(
                                eg::Label::new(
                                    eg::RichText::new(format!(
                                        "{}: {}%",
                                        rating.source, rating.value
                                    ))
                                    .color(eg::Color32::from_rgb(120, 180, 255)),
                                )
                                .wrap(),
                            );
                        }
                    });
                }
            });
    }
}
