// src/app/enrich.rs — concurrent per-film ratings fetch, gathered and merged once.
use std::sync::{mpsc, Arc, Mutex};

use eframe::egui as eg;
use tracing::{info, warn};

use super::api;
use super::types::{EnrichDone, LoadPhase};

const ENRICH_WORKERS: usize = 4;

impl crate::app::SwexApp {
    /// Queue one ratings request per film across a small worker pool.
    /// Results are staged until the whole batch has settled, then merged in
    /// a single publish; a failed request only costs that film its ratings.
    pub(crate) fn start_enrichment(&mut self) {
        if self.enrich_started {
            return;
        }
        if self.films.is_empty() {
            self.phase = LoadPhase::Ready;
            return;
        }
        let Some(api_key) = self.config.omdb_api_key.clone() else {
            info!("no ratings API key configured; skipping enrichment");
            self.phase = LoadPhase::Ready;
            self.set_status("Ratings unavailable (no API key).");
            return;
        };

        self.enrich_started = true;
        self.phase = LoadPhase::Enriching;
        self.enrich_total = self.films.len();
        self.enrich_completed = 0;
        self.enrich_failed = 0;
        self.set_status(format!("Fetching ratings for {} films…", self.enrich_total));

        let (work_tx, work_rx) = mpsc::channel::<(String, String)>(); // (film_id, title)
        let (done_tx, done_rx) = mpsc::channel::<EnrichDone>();
        self.enrich_rx = Some(done_rx);

        let work_rx = Arc::new(Mutex::new(work_rx));

        // One shared HTTP client.
        let client = match api::build_client("swex/ratings") {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("{e}");
                self.enrich_rx = None;
                self.enrich_failed = self.enrich_total;
                self.phase = LoadPhase::Ready;
                self.set_status("Ratings unavailable.");
                return;
            }
        };
        let ratings_url = self.config.ratings_url.clone();

        for _ in 0..ENRICH_WORKERS {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            let ratings_url = ratings_url.clone();
            let api_key = api_key.clone();

            std::thread::spawn(move || loop {
                let job = {
                    let rx = work_rx.lock().unwrap();
                    rx.recv()
                };
                let (film_id, title) = match job {
                    Ok(t) => t,
                    Err(_) => break,
                };
                let result = api::fetch_ratings(&client, &ratings_url, &api_key, &title);
                let _ = done_tx.send(EnrichDone { film_id, result });
            });
        }

        for film in &self.films {
            let _ = work_tx.send((film.id.clone(), film.title.clone()));
        }
    }

    /// Poll settled ratings requests and merge once the batch is complete.
    pub(crate) fn poll_enrichment(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;

        while drained < super::MAX_DONE_PER_FRAME {
            let Some(rx) = &self.enrich_rx else { break };

            match rx.try_recv() {
                Ok(done) => {
                    drained += 1;
                    match &done.result {
                        Ok(_) => self.enrich_completed += 1,
                        Err(e) => {
                            self.enrich_failed += 1;
                            warn!("ratings fetch failed for film {}: {e}", done.film_id);
                        }
                    }
                    self.enrich_staged.push(done);
                    self.set_status(format!(
                        "Ratings: {}/{} fetched ({} failed).",
                        self.enrich_completed, self.enrich_total, self.enrich_failed
                    ));
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.enrich_rx = None;
                    break;
                }
            }
        }

        if self.enrich_rx.is_some()
            && self.enrich_completed + self.enrich_failed >= self.enrich_total
        {
            self.apply_enrichment();
            self.start_poster_prefetch();
        }

        if drained > 0 {
            ctx.request_repaint();
        }
    }

    /// Single merge of all staged results into the film list. Failures were
    /// already counted; their films simply stay unenriched.
    pub(crate) fn apply_enrichment(&mut self) {
        self.enrich_rx = None;
        let staged = std::mem::take(&mut self.enrich_staged);

        let mut merged = 0usize;
        for done in staged {
            let Ok(enrichment) = done.result else { continue };
            if let Some(film) = self.films.iter_mut().find(|f| f.id == done.film_id) {
                film.ratings = enrichment.ratings;
                film.average_rating = enrichment.average_rating;
                film.poster_url = enrichment.poster_url;
                merged += 1;
            }
        }

        self.phase = LoadPhase::Ready;
        self.set_status(format!(
            "Ratings ready for {merged}/{} films ({} failed).",
            self.enrich_total, self.enrich_failed
        ));
    }
}
