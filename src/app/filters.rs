// src/app/filters.rs — derived view state: filtering and list ordering.
use regex::{Regex, RegexBuilder};
use tracing::warn;

use super::types::{Film, SortKey};

/// Case-insensitive matcher over titles. User text is escaped so pattern
/// metacharacters match themselves ("a.b" matches only a literal "a.b").
fn build_title_filter(filter: &str) -> Option<Regex> {
    if filter.is_empty() {
        return None;
    }
    match RegexBuilder::new(&regex::escape(filter))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            warn!("filter pattern build failed: {err}");
            None
        }
    }
}

/// Indices of films whose title matches the filter, in list order.
/// An empty (or unbuildable) filter passes everything through.
pub(crate) fn filtered_indices(films: &[Film], filter: &str) -> Vec<usize> {
    match build_title_filter(filter) {
        Some(re) => films
            .iter()
            .enumerate()
            .filter(|(_, f)| re.is_match(&f.title))
            .map(|(i, _)| i)
            .collect(),
        None => (0..films.len()).collect(),
    }
}

fn sort_field(film: &Film, key: SortKey) -> String {
    match key {
        SortKey::Episode => film.episode.clone(),
        SortKey::Year => film.year.clone(),
        SortKey::AverageRating => film
            .average_rating
            .map(|n| n.to_string())
            .unwrap_or_default(),
    }
}

/// Reorders the canonical list in place: lexicographic on the string form of
/// the key, ascending, then reversed for the rating key. The comparison is on
/// strings, not numbers, so "10" sorts before "2".
pub(crate) fn sort_films(films: &mut Vec<Film>, key: SortKey) {
    films.sort_by_key(|f| sort_field(f, key));
    if key == SortKey::AverageRating {
        films.reverse();
    }
}
