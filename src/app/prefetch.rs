// src/app/prefetch.rs — background poster downloads + lazy texture upload.
use std::sync::{mpsc, Arc, Mutex};

use eframe::egui::{self as eg, TextureHandle};
use tracing::warn;

use super::types::PosterDone;
use super::{api, cache};

const POSTER_WORKERS: usize = 4;

impl crate::app::SwexApp {
    /// Queue poster downloads for every enriched film. Workers reuse files
    /// the cache already holds.
    pub(crate) fn start_poster_prefetch(&mut self) {
        if self.poster_started {
            return;
        }
        let mut targets: Vec<String> = self
            .films
            .iter()
            .filter_map(|f| f.poster_url.clone())
            .collect();
        targets.sort();
        targets.dedup();
        if targets.is_empty() {
            return;
        }
        self.poster_started = true;
        self.poster_total = targets.len();

        let (work_tx, work_rx) = mpsc::channel::<String>();
        let (done_tx, done_rx) = mpsc::channel::<PosterDone>();
        self.poster_rx = Some(done_rx);

        let work_rx = Arc::new(Mutex::new(work_rx));

        let client = match api::build_client("swex/posters") {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("{e}");
                self.poster_rx = None;
                return;
            }
        };

        for _ in 0..POSTER_WORKERS {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);

            std::thread::spawn(move || loop {
                let job = {
                    let rx = work_rx.lock().unwrap();
                    rx.recv()
                };
                let url = match job {
                    Ok(u) => u,
                    Err(_) => break,
                };
                let key = cache::url_to_cache_key(&url);
                let result = match cache::find_any_by_key(&key) {
                    Some(path) => Ok(path),
                    None => cache::download_and_store(&client, &url, &key),
                };
                let _ = done_tx.send(PosterDone { url, result });
            });
        }

        for url in targets {
            let _ = work_tx.send(url);
        }
    }

    /// Poll poster completions; textures are uploaded lazily at paint time.
    pub(crate) fn poll_posters(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;

        while drained < super::MAX_DONE_PER_FRAME {
            let Some(rx) = &self.poster_rx else { break };

            match rx.try_recv() {
                Ok(done) => {
                    drained += 1;
                    match done.result {
                        Ok(path) => {
                            self.poster_paths.insert(done.url, path);
                        }
                        Err(err) => {
                            warn!("poster download failed: {err}");
                            self.poster_failed.insert(done.url);
                        }
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.poster_rx = None;
                    break;
                }
            }
        }

        if self.poster_rx.is_some()
            && self.poster_paths.len() + self.poster_failed.len() >= self.poster_total
        {
            self.poster_rx = None;
        }

        if drained > 0 {
            ctx.request_repaint();
        }
    }

    /// Texture for a poster URL, uploading from the cached file on first use.
    /// UI thread only.
    pub(crate) fn poster_texture(
        &mut self,
        ctx: &eg::Context,
        url: &str,
    ) -> Option<TextureHandle> {
        if let Some(tex) = self.poster_tex.get(url) {
            return Some(tex.clone());
        }
        if self.poster_failed.contains(url) {
            return None;
        }
        let path = self.poster_paths.get(url)?.clone();

        match cache::load_rgba_image(&path) {
            Ok((w, h, bytes)) => {
                let img = eg::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &bytes);
                let tex = ctx.load_texture(
                    cache::url_to_cache_key(url),
                    img,
                    eg::TextureOptions::LINEAR,
                );
                self.poster_tex.insert(url.to_string(), tex.clone());
                Some(tex)
            }
            Err(err) => {
                warn!("poster decode failed: {err}");
                self.poster_failed.insert(url.to_string());
                None
            }
        }
    }
}
