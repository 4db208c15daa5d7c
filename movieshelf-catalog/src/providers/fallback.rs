//! Bundled static catalog used when the remote endpoint is unreachable.

use async_trait::async_trait;

use super::CatalogPageSource;
use crate::errors::CatalogError;
use crate::types::{CatalogPage, MovieRecord};

const BUNDLED_DOCUMENT: &str = include_str!("../../data/fallback_movies.json");

/// Static fallback dataset.
///
/// Shares the record shape of the remote endpoint. Also usable as an
/// offline page source that serves everything as a single page.
#[derive(Debug, Clone, Default)]
pub struct FallbackDataset {
    movies: Vec<MovieRecord>,
}

impl FallbackDataset {
    /// Dataset compiled into the crate.
    ///
    /// A bundled document that fails to decode yields an empty dataset.
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_DOCUMENT) {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!("Bundled fallback dataset unusable: {e}");
                Self::empty()
            }
        }
    }

    /// Decode a `{ "data": [...] }` document.
    ///
    /// # Errors
    /// - `CatalogError::FallbackDecode` - Document is not valid JSON or not an object
    pub fn from_json(document: &str) -> Result<Self, CatalogError> {
        let page: CatalogPage =
            serde_json::from_str(document).map_err(|e| CatalogError::FallbackDecode {
                reason: e.to_string(),
            })?;

        Ok(Self { movies: page.data })
    }

    /// A dataset with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an in-memory record list.
    pub fn from_movies(movies: Vec<MovieRecord>) -> Self {
        Self { movies }
    }

    /// The fallback records, in order.
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    /// Number of fallback records.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[async_trait]
impl CatalogPageSource for FallbackDataset {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        if page == 1 {
            Ok(CatalogPage::new(1, 1, self.movies.clone()))
        } else {
            Ok(CatalogPage::new(page, 1, Vec::new()))
        }
    }
}
