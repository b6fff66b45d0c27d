// src/app/types.rs
use std::path::PathBuf;

// ---- cross-thread messages / data ----
pub enum CatalogMsg {
    Loaded(Vec<Film>),
    Failed(String),
}

/// One settled ratings request, success or failure, keyed back to its film.
pub struct EnrichDone {
    pub film_id: String,
    pub result: Result<Enrichment, String>,
}

#[derive(Clone, Debug)]
pub struct Enrichment {
    pub ratings: Vec<Rating>,
    pub average_rating: Option<u8>,
    pub poster_url: Option<String>,
}

pub struct PosterDone {
    pub url: String,
    pub result: Result<PathBuf, String>,
}

// ---- core records ----

/// One rating from a single review source. `value` is the numeric-as-string
/// form with `.`/`%`/`/N` punctuation already stripped (so "8.1/10" is "81").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rating {
    pub source: String,
    pub value: String,
}

/// Display record backing one list row. List order IS the current sort order.
#[derive(Clone, Debug)]
pub struct Film {
    pub id: String,
    pub episode: String,
    pub title: String,
    pub year: String,
    pub opening_crawl: String,
    pub producer: String,
    pub ratings: Vec<Rating>,
    pub average_rating: Option<u8>,
    pub poster_url: Option<String>,
}

// ---- app phases ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Enriching,
    Ready,
}

// ---- UI controls ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Episode,
    Year,
    AverageRating,
}

impl SortKey {
    pub const ALL: [Self; 3] = [Self::Episode, Self::Year, Self::AverageRating];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Episode => "Episode",
            Self::Year => "Year",
            Self::AverageRating => "Rating",
        }
    }
}
