//! Data types for the movie catalog.

use serde::{Deserialize, Deserializer, Serialize};

/// A single catalog entry as served by the paging endpoint.
///
/// Only `id` and `title` are required. Everything else is optional on the
/// wire and falls back to a display default in [`crate::display::MovieCard`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Stable identifier, the dedup and display key
    pub id: String,
    /// Secondary numeric identifier, carried for compatibility only
    #[serde(default)]
    pub movie_id: Option<u64>,
    /// Display title, `original_title` on the wire
    #[serde(rename = "original_title")]
    pub title: String,
    /// Absolute poster image URL
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release date, usually `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average rating; `None` means unrated
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Plot summary
    #[serde(default)]
    pub overview: Option<String>,
    /// Cast in billing order
    #[serde(default)]
    pub casts: Option<Vec<CastMember>>,
    /// Genre tags
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Marketing tagline
    #[serde(default)]
    pub tagline: Option<String>,
    /// Release status, e.g. `Released`
    #[serde(default)]
    pub status: Option<String>,
    /// Absolute backdrop image URL
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Endpoint popularity score
    #[serde(default)]
    pub popularity: Option<f64>,
    /// Number of votes behind `vote_average`
    #[serde(default)]
    pub vote_count: Option<u64>,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: Option<String>,
    /// Whether the entry is a video release
    #[serde(default)]
    pub video: Option<bool>,
    /// Adult content flag
    #[serde(default)]
    pub adult: Option<bool>,
}

impl MovieRecord {
    /// Creates a record with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            movie_id: None,
            title: title.into(),
            poster_path: None,
            release_date: None,
            vote_average: None,
            overview: None,
            casts: None,
            genres: None,
            runtime: None,
            tagline: None,
            status: None,
            backdrop_path: None,
            popularity: None,
            vote_count: None,
            original_language: None,
            video: None,
            adult: None,
        }
    }

    /// Case-insensitive substring match on the title.
    ///
    /// `needle_folded` must already be lowercased.
    pub fn title_contains(&self, needle_folded: &str) -> bool {
        self.title.to_lowercase().contains(needle_folded)
    }
}

/// Cast member attached to a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Cast member identifier
    pub id: String,
    /// Performer name
    pub name: String,
    /// Character played, when known
    #[serde(default)]
    pub character: Option<String>,
}

/// Genre tag attached to a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre identifier, when known
    #[serde(default)]
    pub id: Option<u64>,
    /// Genre name
    pub name: String,
}

/// One page of the paginated catalog response.
///
/// The counters are optional so a sparse page still decodes. A missing or
/// malformed `data` field decodes as an empty page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Page number as reported by the endpoint
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Records on this page
    #[serde(default, deserialize_with = "lenient_records")]
    pub data: Vec<MovieRecord>,
    /// Last available page; `None` when not reported
    #[serde(default)]
    pub last_page: Option<u32>,
    /// Total records across all pages
    #[serde(default)]
    pub total: Option<u64>,
    /// Records per page
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Index of the first record on this page
    #[serde(default)]
    pub from: Option<u64>,
    /// Index of the last record on this page
    #[serde(default)]
    pub to: Option<u64>,
    /// URL of the next page
    #[serde(default)]
    pub next_page_url: Option<String>,
    /// URL of the previous page
    #[serde(default)]
    pub prev_page_url: Option<String>,
}

impl CatalogPage {
    /// Builds a page around `data`, as a paging endpoint would report it.
    pub fn new(current_page: u32, last_page: u32, data: Vec<MovieRecord>) -> Self {
        let per_page = data.len() as u32;
        Self {
            current_page: Some(current_page),
            per_page: Some(per_page),
            last_page: Some(last_page),
            data,
            ..Default::default()
        }
    }

    /// Whether the page carries no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Decodes `data` record by record, dropping entries that do not decode.
///
/// Anything other than an array (null, object, string) yields no records.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<MovieRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    let serde_json::Value::Array(items) = value else {
        tracing::debug!("Page data is not an array, treating as empty");
        return Ok(Vec::new());
    };

    let records = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<MovieRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping undecodable movie record: {e}");
                None
            }
        })
        .collect();

    Ok(records)
}

/// Where the records of a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogSource {
    /// No requested page failed
    Remote,
    /// At least one page succeeded before a later page failed or the load was cancelled
    Partial,
    /// No page succeeded; the bundled dataset was used
    Fallback,
}
