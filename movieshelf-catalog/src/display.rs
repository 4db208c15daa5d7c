//! Display defaults for movie cards.
//!
//! Every optional field of a [`MovieRecord`] maps to a printable value here,
//! so the presentation layer never has to deal with missing data itself.

use chrono::{DateTime, Datelike, NaiveDate};

use crate::types::MovieRecord;

/// Placeholder for values a record does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Cast members shown on an expanded card.
pub const MAX_CARD_CAST: usize = 6;

/// Printable card for one movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    /// Record id
    pub id: String,
    /// Movie title
    pub title: String,
    /// Release year, or `N/A`
    pub year: String,
    /// Rating with one decimal, or `N/A`
    pub rating: String,
    /// Plot summary, empty when absent
    pub overview: String,
    /// Empty when the record has no poster; the image loader shows its own placeholder
    pub poster_url: String,
    /// Up to [`MAX_CARD_CAST`] cast names, in billing order
    pub cast: Vec<String>,
    /// Genre names joined with `, `
    pub genres: String,
}

impl MovieCard {
    /// Builds a card, filling in display defaults for missing fields.
    pub fn from_record(record: &MovieRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            year: release_year(record.release_date.as_deref())
                .map(|year| year.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: record
                .vote_average
                .map(|rating| format!("{rating:.1}"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            overview: record.overview.clone().unwrap_or_default(),
            poster_url: record.poster_path.clone().unwrap_or_default(),
            cast: record
                .casts
                .iter()
                .flatten()
                .take(MAX_CARD_CAST)
                .map(|member| member.name.clone())
                .collect(),
            genres: record
                .genres
                .iter()
                .flatten()
                .map(|genre| genre.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&MovieRecord> for MovieCard {
    fn from(record: &MovieRecord) -> Self {
        Self::from_record(record)
    }
}

/// Year of a release date: ISO date, RFC 3339 timestamp, or a leading year.
pub fn release_year(release_date: Option<&str>) -> Option<i32> {
    let raw = release_date?.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.year());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.year());
    }

    raw.get(..4)
        .filter(|prefix| prefix.chars().all(|c| c.is_ascii_digit()))
        .and_then(|prefix| prefix.parse().ok())
}

/// Message for an empty result list.
pub fn empty_state_message(query: &str) -> &'static str {
    if query.is_empty() {
        "No movies available."
    } else {
        "No movies found matching your search."
    }
}
