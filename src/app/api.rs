// src/app/api.rs — the two read-only HTTP collaborators.
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::warn;

use super::types::{Enrichment, Film, Rating};

const HTTP_TIMEOUT_SECS: u64 = 20;

pub(crate) fn build_client(user_agent: &str) -> Result<Client, String> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .pool_max_idle_per_host(16)
        .build()
        .map_err(|e| format!("http client: {e}"))
}

// ---- films source ----

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Num(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FilmRecord {
    id: RawId,
    fields: FilmFields,
}

#[derive(Debug, Deserialize)]
struct FilmFields {
    release_date: String,
    title: String,
    episode_id: i64,
    opening_crawl: String,
    producer: String,
}

fn film_from_record(rec: FilmRecord) -> Film {
    Film {
        id: rec.id.into_string(),
        episode: format!("EPISODE {}", rec.fields.episode_id),
        // Cosmetic glyph substitution: first '1' becomes the roman numeral.
        title: rec.fields.title.replacen('1', "I", 1),
        year: rec.fields.release_date,
        opening_crawl: rec.fields.opening_crawl,
        producer: rec.fields.producer,
        ratings: Vec::new(),
        average_rating: None,
        poster_url: None,
    }
}

/// One GET against the films source. Records that fail to deserialize are
/// skipped individually so a single odd entry cannot empty the whole list.
pub(crate) fn fetch_films(client: &Client, url: &str) -> Result<Vec<Film>, String> {
    let resp = client.get(url).send().map_err(|e| format!("GET {url}: {e}"))?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {} for {url}", resp.status()));
    }
    let raw: Vec<serde_json::Value> = resp.json().map_err(|e| format!("parse films: {e}"))?;
    Ok(films_from_payload(raw))
}

fn films_from_payload(raw: Vec<serde_json::Value>) -> Vec<Film> {
    let mut films = Vec::with_capacity(raw.len());
    for item in raw {
        match serde_json::from_value::<FilmRecord>(item) {
            Ok(rec) => films.push(film_from_record(rec)),
            Err(err) => warn!("skipping malformed film record: {err}"),
        }
    }
    films
}

// ---- ratings source ----

#[derive(Debug, Deserialize)]
struct RatingsResponse {
    #[serde(rename = "Ratings", default)]
    ratings: Vec<RatingEntry>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RatingEntry {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

static RATING_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.|%|/\d+)").expect("rating punctuation pattern"));

/// "86%" -> "86", "8.1/10" -> "81". Keeps the value a bare digit string.
pub(crate) fn normalize_rating_value(raw: &str) -> String {
    RATING_PUNCT_RE.replace_all(raw, "").into_owned()
}

/// floor(sum / count / 10), clamped into the 0..=10 star range. Values that
/// fail to parse count as zero rather than poisoning the whole average.
pub(crate) fn calc_average(ratings: &[Rating]) -> Option<u8> {
    if ratings.is_empty() {
        return None;
    }
    let sum: f64 = ratings
        .iter()
        .map(|r| r.value.parse::<f64>().unwrap_or(0.0))
        .sum();
    let avg = (sum / ratings.len() as f64 / 10.0).floor();
    Some(avg.clamp(0.0, 10.0) as u8)
}

/// One GET against the ratings source for a single title.
pub(crate) fn fetch_ratings(
    client: &Client,
    base_url: &str,
    api_key: &str,
    title: &str,
) -> Result<Enrichment, String> {
    let url = format!("{base_url}?t={}&apikey={api_key}", urlencoding::encode(title));
    let resp = client
        .get(&url)
        .send()
        .map_err(|e| format!("GET {base_url}: {e}"))?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {} from {base_url}", resp.status()));
    }
    let parsed: RatingsResponse = resp.json().map_err(|e| format!("parse ratings: {e}"))?;
    Ok(enrichment_from_response(parsed))
}

fn enrichment_from_response(parsed: RatingsResponse) -> Enrichment {
    let ratings: Vec<Rating> = parsed
        .ratings
        .into_iter()
        .map(|e| Rating {
            source: e.source,
            value: normalize_rating_value(&e.value),
        })
        .collect();
    let average_rating = calc_average(&ratings);
    // The ratings source reports "N/A" instead of omitting the poster field.
    let poster_url = parsed
        .poster
        .filter(|p| p.starts_with("http://") || p.starts_with("https://"));
    Enrichment {
        ratings,
        average_rating,
        poster_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(source: &str, value: &str) -> Rating {
        Rating {
            source: source.into(),
            value: value.into(),
        }
    }

    #[test]
    fn films_payload_maps_fields_into_display_model() {
        let raw: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"id": 4, "fields": {
                    "release_date": "1977-05-25",
                    "title": "A New Hope",
                    "episode_id": 4,
                    "opening_crawl": "It is a period of civil war.",
                    "producer": "Gary Kurtz, Rick McCallum"
                }}
            ]"#,
        )
        .unwrap();
        let films = films_from_payload(raw);
        assert_eq!(films.len(), 1);
        let film = &films[0];
        assert_eq!(film.id, "4");
        assert_eq!(film.episode, "EPISODE 4");
        assert_eq!(film.title, "A New Hope");
        assert_eq!(film.year, "1977-05-25");
        assert_eq!(film.producer, "Gary Kurtz, Rick McCallum");
        assert!(film.ratings.is_empty());
        assert!(film.average_rating.is_none());
    }

    #[test]
    fn title_digit_one_becomes_roman_numeral() {
        let raw: Vec<serde_json::Value> = serde_json::from_str(
            r#"[{"id": "1", "fields": {
                "release_date": "1999-05-19",
                "title": "Episode 1 - The Phantom Menace",
                "episode_id": 1,
                "opening_crawl": "...",
                "producer": "Rick McCallum"
            }}]"#,
        )
        .unwrap();
        let films = films_from_payload(raw);
        assert_eq!(films[0].title, "Episode I - The Phantom Menace");
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let raw: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"id": 1, "fields": {"title": "missing the rest"}},
                {"id": 5, "fields": {
                    "release_date": "1980-05-17",
                    "title": "The Empire Strikes Back",
                    "episode_id": 5,
                    "opening_crawl": "...",
                    "producer": "Gary Kurtz"
                }}
            ]"#,
        )
        .unwrap();
        let films = films_from_payload(raw);
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].id, "5");
    }

    #[test]
    fn rating_values_are_stripped_of_punctuation() {
        assert_eq!(normalize_rating_value("86%"), "86");
        assert_eq!(normalize_rating_value("8.1/10"), "81");
        assert_eq!(normalize_rating_value("90/100"), "90");
        assert_eq!(normalize_rating_value("74"), "74");
    }

    #[test]
    fn average_is_floored_sum_over_count_over_ten() {
        let ratings = vec![rating("a", "86"), rating("b", "81"), rating("c", "90")];
        // (86 + 81 + 90) / 3 / 10 = 8.566…
        assert_eq!(calc_average(&ratings), Some(8));
        assert_eq!(calc_average(&[]), None);
    }

    #[test]
    fn unparseable_rating_value_counts_as_zero() {
        let ratings = vec![rating("a", "80"), rating("b", "not-a-number")];
        assert_eq!(calc_average(&ratings), Some(4));
    }

    #[test]
    fn ratings_response_is_normalized_and_poster_filtered() {
        let parsed: RatingsResponse = serde_json::from_str(
            r#"{
                "Ratings": [
                    {"Source": "Internet Movie Database", "Value": "8.6/10"},
                    {"Source": "Rotten Tomatoes", "Value": "93%"}
                ],
                "Poster": "https://example.com/poster.jpg"
            }"#,
        )
        .unwrap();
        let enrichment = enrichment_from_response(parsed);
        assert_eq!(
            enrichment.ratings,
            vec![rating("Internet Movie Database", "86"), rating("Rotten Tomatoes", "93")]
        );
        assert_eq!(enrichment.average_rating, Some(8));
        assert_eq!(
            enrichment.poster_url.as_deref(),
            Some("https://example.com/poster.jpg")
        );
    }

    #[test]
    fn missing_ratings_and_na_poster_yield_empty_enrichment() {
        let parsed: RatingsResponse =
            serde_json::from_str(r#"{"Poster": "N/A"}"#).unwrap();
        let enrichment = enrichment_from_response(parsed);
        assert!(enrichment.ratings.is_empty());
        assert_eq!(enrichment.average_rating, None);
        assert_eq!(enrichment.poster_url, None);
    }
}
