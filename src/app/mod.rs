// src/app/mod.rs — one-shot catalog load, ratings enrichment, filter/sort/selection glue.

pub mod api;
pub mod cache;
pub mod detail;
pub mod enrich;
pub mod filters;
pub mod prefetch;
pub mod types;
pub mod ui;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use eframe::egui::{self as eg, TextureHandle};
use itertools::Itertools;
use tracing::{info, warn};

use crate::config::{load_config, AppConfig};
use types::{CatalogMsg, EnrichDone, LoadPhase, PosterDone};
pub use types::{Film, Rating, SortKey};

// ---- Tunables ----
const MAX_DONE_PER_FRAME: usize = 12;
const STATUS_EMIT_EVERY_MS: u64 = 120;
const POLL_REPAINT_MS: u64 = 100;

pub struct SwexApp {
    pub(crate) config: AppConfig,

    // data — list order IS the current sort order
    pub(crate) films: Vec<Film>,

    // view state
    pub(crate) filter: String,
    pub(crate) selected_id: Option<String>,

    // load phase
    pub(crate) phase: LoadPhase,
    did_init: bool,

    // catalog plumbing
    catalog_started: bool,
    catalog_rx: Option<Receiver<CatalogMsg>>,

    // enrichment plumbing
    pub(crate) enrich_started: bool,
    pub(crate) enrich_rx: Option<Receiver<EnrichDone>>,
    pub(crate) enrich_staged: Vec<EnrichDone>,
    pub(crate) enrich_total: usize,
    pub(crate) enrich_completed: usize,
    pub(crate) enrich_failed: usize,

    // poster plumbing
    pub(crate) poster_started: bool,
    pub(crate) poster_total: usize,
    pub(crate) poster_rx: Option<Receiver<PosterDone>>,
    pub(crate) poster_paths: HashMap<String, PathBuf>,
    pub(crate) poster_failed: HashSet<String>,
    pub(crate) poster_tex: HashMap<String, TextureHandle>,

    // status line
    pub(crate) status_message: String,
    status_last_emit: Instant,
}

impl Default for SwexApp {
    fn default() -> Self {
        Self {
            config: load_config(),
            films: Vec::new(),
            filter: String::new(),
            selected_id: None,
            phase: LoadPhase::Loading,
            did_init: false,
            catalog_started: false,
            catalog_rx: None,
            enrich_started: false,
            enrich_rx: None,
            enrich_staged: Vec::new(),
            enrich_total: 0,
            enrich_completed: 0,
            enrich_failed: 0,
            poster_started: false,
            poster_total: 0,
            poster_rx: None,
            poster_paths: HashMap::new(),
            poster_failed: HashSet::new(),
            poster_tex: HashMap::new(),
            status_message: String::new(),
            status_last_emit: Instant::now(),
        }
    }
}

// ---------- methods ----------
impl SwexApp {
    pub(crate) fn set_status<S: Into<String>>(&mut self, s: S) {
        let s = s.into();
        let due = self.status_last_emit.elapsed() >= Duration::from_millis(STATUS_EMIT_EVERY_MS);
        let changed = self.status_message != s;
        if changed || due {
            self.status_message = s;
            self.status_last_emit = Instant::now();
        }
    }

    /// One-shot catalog fetch on app launch. No polling, no retry.
    fn start_catalog_load(&mut self) {
        if self.catalog_started {
            return;
        }
        self.catalog_started = true;
        self.phase = LoadPhase::Loading;
        self.set_status("Loading films…");

        let (tx, rx) = mpsc::channel::<CatalogMsg>();
        self.catalog_rx = Some(rx);
        let films_url = self.config.films_url.clone();

        std::thread::spawn(move || {
            let msg = match api::build_client("swex/films")
                .and_then(|client| api::fetch_films(&client, &films_url))
            {
                Ok(films) => CatalogMsg::Loaded(films),
                Err(err) => CatalogMsg::Failed(err),
            };
            let _ = tx.send(msg);
        });
    }

    fn poll_catalog(&mut self, ctx: &eg::Context) {
        let Some(rx) = &self.catalog_rx else { return };
        match rx.try_recv() {
            Ok(CatalogMsg::Loaded(films)) => {
                self.catalog_rx = None;
                info!(
                    "loaded {} films: {}",
                    films.len(),
                    films.iter().map(|f| f.title.as_str()).join(", ")
                );
                self.films = films;
                self.set_status(format!("Loaded {} films.", self.films.len()));
                self.start_enrichment();
                ctx.request_repaint();
            }
            Ok(CatalogMsg::Failed(err)) => {
                // Degrade to an empty list; the status line is the only notice.
                self.catalog_rx = None;
                warn!("film catalog fetch failed: {err}");
                self.phase = LoadPhase::Ready;
                self.set_status("Film list unavailable.");
                ctx.request_repaint();
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.catalog_rx = None;
                self.phase = LoadPhase::Ready;
            }
        }
    }

    /// Reorders the canonical film list. Selection is carried by id, so it
    /// survives the reorder and is reconciled against the filtered subset on
    /// the next recompute.
    pub(crate) fn sort_by(&mut self, key: SortKey) {
        filters::sort_films(&mut self.films, key);
    }

    /// Clears the selection when its film is absent from the filtered subset.
    pub(crate) fn reconcile_selection(&mut self, filtered: &[usize]) {
        if let Some(id) = &self.selected_id {
            let present = filtered.iter().any(|&i| self.films[i].id == *id);
            if !present {
                self.selected_id = None;
            }
        }
    }

    pub(crate) fn selected_film(&self) -> Option<&Film> {
        let id = self.selected_id.as_deref()?;
        self.films.iter().find(|f| f.id == id)
    }
}

// ========== App impl ==========
impl eframe::App for SwexApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        if !self.did_init {
            self.did_init = true;
            self.start_catalog_load();
        }

        self.poll_catalog(ctx);
        self.poll_enrichment(ctx);
        self.poll_posters(ctx);

        // Channels are drained once per frame, so keep frames coming while
        // anything is still in flight.
        if self.phase != LoadPhase::Ready || self.poster_rx.is_some() {
            ctx.request_repaint_after(Duration::from_millis(POLL_REPAINT_MS));
        }

        eg::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.ui_render_topbar(ui);
        });

        // Derived view state: recomputed every frame from the list + filter,
        // then the selection is reconciled against it.
        let filtered = filters::filtered_indices(&self.films, &self.filter);
        self.reconcile_selection(&filtered);

        self.ui_render_detail_panel(ctx);

        eg::CentralPanel::default().show(ctx, |ui| {
            self.ui_render_film_table(ui, &filtered);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(id: &str, title: &str, year: &str) -> Film {
        Film {
            id: id.into(),
            episode: format!("EPISODE {id}"),
            title: title.into(),
            year: year.into(),
            opening_crawl: String::new(),
            producer: String::new(),
            ratings: Vec::new(),
            average_rating: None,
            poster_url: None,
        }
    }

    fn app_with_films(films: Vec<Film>) -> SwexApp {
        let mut app = SwexApp::default();
        app.films = films;
        app
    }

    #[test]
    fn unfiltered_subset_is_full_list_in_source_order() {
        let app = app_with_films(vec![
            film("4", "A New Hope", "1977-05-25"),
            film("5", "The Empire Strikes Back", "1980-05-17"),
            film("6", "Return of the Jedi", "1983-05-25"),
        ]);
        let filtered = filters::filtered_indices(&app.films, &app.filter);
        assert_eq!(filtered, vec![0, 1, 2]);
    }

    #[test]
    fn selection_cleared_when_film_leaves_filtered_subset() {
        let mut app = app_with_films(vec![
            film("4", "A New Hope", "1977-05-25"),
            film("5", "The Empire Strikes Back", "1980-05-17"),
        ]);
        app.selected_id = Some("4".into());
        app.filter = "empire".into();

        let filtered = filters::filtered_indices(&app.films, &app.filter);
        app.reconcile_selection(&filtered);
        assert!(app.selected_id.is_none());
    }

    #[test]
    fn selection_survives_sort_while_still_visible() {
        let mut app = app_with_films(vec![
            film("5", "The Empire Strikes Back", "1980-05-17"),
            film("4", "A New Hope", "1977-05-25"),
        ]);
        app.selected_id = Some("5".into());

        app.sort_by(SortKey::Year);
        let filtered = filters::filtered_indices(&app.films, &app.filter);
        app.reconcile_selection(&filtered);

        assert_eq!(app.films[0].id, "4");
        assert_eq!(app.selected_id.as_deref(), Some("5"));
        assert_eq!(
            app.selected_film().map(|f| f.title.as_str()),
            Some("The Empire Strikes Back")
        );
    }

    #[test]
    fn selection_kept_when_filter_still_matches() {
        let mut app = app_with_films(vec![
            film("4", "A New Hope", "1977-05-25"),
            film("5", "The Empire Strikes Back", "1980-05-17"),
        ]);
        app.selected_id = Some("4".into());
        app.filter = "hope".into();

        let filtered = filters::filtered_indices(&app.films, &app.filter);
        app.reconcile_selection(&filtered);
        assert_eq!(app.selected_id.as_deref(), Some("4"));
    }
}
