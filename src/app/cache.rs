// src/app/cache.rs — on-disk poster artwork cache.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::{GenericImageView, ImageFormat};
use reqwest::blocking::Client;
use tracing::warn;

use crate::config::load_config;

// Chosen once on first call
static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let cfg = load_config();
            let path = PathBuf::from(cfg.cache_dir.unwrap_or_else(|| ".swex_cache".into()));
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create cache dir {}: {e}", path.display());
            }
            path
        })
        .clone()
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub fn find_any_by_key(key: &str) -> Option<PathBuf> {
    find_any_by_key_in(&cache_dir(), key)
}

pub(crate) fn find_any_by_key_in(dir: &Path, key: &str) -> Option<PathBuf> {
    for ext in ["png", "jpg", "jpeg", "webp"] {
        let p = dir.join(format!("{key}.{ext}"));
        if p.exists() {
            return Some(p);
        }
    }
    None
}

/// Download, normalize to PNG and store in cache. Returns the stored path.
pub fn download_and_store(client: &Client, url: &str, key: &str) -> Result<PathBuf, String> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| format!("GET {url}: {e}"))?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {} for {url}", resp.status()));
    }
    let body = resp
        .bytes()
        .map_err(|e| format!("read body: {e}"))?
        .to_vec();
    store_png_in(&cache_dir(), key, &body)
}

pub(crate) fn store_png_in(dir: &Path, key: &str, body: &[u8]) -> Result<PathBuf, String> {
    let img = image::load_from_memory(body).map_err(|e| format!("decode image: {e}"))?;
    let out = dir.join(format!("{key}.png"));
    let mut png_bytes: Vec<u8> = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| format!("encode png: {e}"))?;
    fs::write(&out, &png_bytes).map_err(|e| format!("write {}: {e}", out.display()))?;
    Ok(out)
}

/// Return (width, height, RGBA8 bytes) decoded from a cached image file.
pub fn load_rgba_image(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 3));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn cache_keys_are_stable_md5_hex() {
        let key = url_to_cache_key("https://example.com/poster.jpg");
        assert_eq!(key.len(), 32);
        assert_eq!(key, url_to_cache_key("https://example.com/poster.jpg"));
        assert_ne!(key, url_to_cache_key("https://example.com/other.jpg"));
    }

    #[test]
    fn stored_poster_is_found_and_decodable() {
        let dir = tempfile::tempdir().unwrap();
        let body = tiny_png();

        assert!(find_any_by_key_in(dir.path(), "k1").is_none());
        let stored = store_png_in(dir.path(), "k1", &body).unwrap();
        assert_eq!(find_any_by_key_in(dir.path(), "k1"), Some(stored.clone()));

        let (w, h, rgba) = load_rgba_image(&stored).unwrap();
        assert_eq!((w, h), (2, 3));
        assert_eq!(rgba.len(), 2 * 3 * 4);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_png_in(dir.path(), "k2", b"not an image").is_err());
        assert!(find_any_by_key_in(dir.path(), "k2").is_none());
    }
}
