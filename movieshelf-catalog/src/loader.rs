//! Remote catalog loader
//!
//! Fetches the catalog page by page, strictly in sequence, up to a fixed page
//! ceiling. A failed page ends the sequence; when nothing at all was fetched
//! the bundled fallback dataset takes over. The loader never fails outwardly.

use std::collections::HashSet;

use movieshelf_core::MovieshelfConfig;
use tokio_util::sync::CancellationToken;

use crate::errors::CatalogError;
use crate::providers::{CatalogPageSource, FallbackDataset, RemoteCatalogSource};
use crate::types::{CatalogSource, MovieRecord};

/// Default maximum number of pages fetched per load.
pub const DEFAULT_PAGE_CEILING: u32 = 5;

/// Why a fetch sequence stopped.
#[derive(Debug)]
pub enum LoadTermination {
    /// The next page would exceed the reported `last_page`
    LastPage,
    /// A page came back with zero records
    EmptyPage,
    /// The page ceiling was reached
    PageCeiling,
    /// A page request failed
    PageFailed {
        /// The page that failed
        page: u32,
        /// The failure itself
        error: CatalogError,
    },
    /// The cancellation token fired
    Cancelled,
}

/// Outcome of one fetch sequence.
#[derive(Debug)]
pub struct CatalogLoad {
    /// Accumulated records, deduplicated by id
    pub movies: Vec<MovieRecord>,
    /// Pages that contributed records
    pub pages_fetched: u32,
    /// Why the sequence stopped
    pub termination: LoadTermination,
    /// Where the records came from
    pub source: CatalogSource,
}

impl CatalogLoad {
    /// Whether the cancellation token ended the sequence.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.termination, LoadTermination::Cancelled)
    }

    /// Whether the records came from the fallback dataset.
    pub fn used_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }
}

/// Sequential catalog loader with a page ceiling and a static fallback.
#[derive(Debug)]
pub struct CatalogLoader {
    source: Box<dyn CatalogPageSource>,
    fallback: FallbackDataset,
    page_ceiling: u32,
}

impl CatalogLoader {
    /// Creates a loader over any page source.
    pub fn new(source: impl CatalogPageSource + 'static, fallback: FallbackDataset) -> Self {
        Self {
            source: Box::new(source),
            fallback,
            page_ceiling: DEFAULT_PAGE_CEILING,
        }
    }

    /// Creates a loader for the configured remote endpoint with the bundled fallback.
    ///
    /// # Errors
    /// - `CatalogError::InvalidConfig` - Configuration fails validation
    /// - `CatalogError::InvalidBaseUrl` - Configured base URL does not parse
    /// - `CatalogError::ClientSetup` - HTTP client could not be built
    pub fn from_config(config: &MovieshelfConfig) -> Result<Self, CatalogError> {
        config
            .validate()
            .map_err(|e| CatalogError::InvalidConfig {
                reason: e.to_string(),
            })?;
        let source = RemoteCatalogSource::new(&config.remote)?;
        Ok(Self::new(source, FallbackDataset::bundled())
            .with_page_ceiling(config.paging.page_ceiling))
    }

    /// Overrides the maximum number of pages requested per load.
    pub fn with_page_ceiling(mut self, page_ceiling: u32) -> Self {
        self.page_ceiling = page_ceiling;
        self
    }

    /// Maximum number of pages requested per load.
    pub fn page_ceiling(&self) -> u32 {
        self.page_ceiling
    }

    /// Load the whole catalog. Always returns a sequence, possibly empty.
    pub async fn load_full_catalog(&self) -> Vec<MovieRecord> {
        self.load_with_report(&CancellationToken::new())
            .await
            .movies
    }

    /// Load the whole catalog and report how the sequence ended.
    ///
    /// `cancel` is checked before every page request and raced against the
    /// request in flight. A cancelled load keeps what it accumulated and
    /// never switches to the fallback dataset.
    pub async fn load_with_report(&self, cancel: &CancellationToken) -> CatalogLoad {
        tracing::info!("Starting catalog load (page ceiling {})", self.page_ceiling);

        let mut movies = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut pages_fetched = 0;
        let mut page = 1;

        let termination = loop {
            if page > self.page_ceiling {
                break LoadTermination::PageCeiling;
            }
            if cancel.is_cancelled() {
                break LoadTermination::Cancelled;
            }

            tracing::debug!("Fetching page {page}");
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.source.fetch_page(page) => Some(result),
            };

            let catalog_page = match result {
                None => break LoadTermination::Cancelled,
                Some(Ok(catalog_page)) => catalog_page,
                Some(Err(error)) => {
                    tracing::warn!("Page {page} failed, stopping: {error}");
                    break LoadTermination::PageFailed { page, error };
                }
            };

            if catalog_page.is_empty() {
                tracing::debug!("Page {page} is empty, end of catalog");
                break LoadTermination::EmptyPage;
            }

            pages_fetched += 1;
            let received = catalog_page.data.len();
            append_unique(&mut movies, &mut seen_ids, catalog_page.data);
            tracing::debug!(
                "Page {page}: {received} records, {} accumulated",
                movies.len()
            );

            page += 1;
            if let Some(last_page) = catalog_page.last_page
                && page > last_page
            {
                break LoadTermination::LastPage;
            }
        };

        let source = match &termination {
            LoadTermination::PageFailed { .. } if movies.is_empty() => {
                tracing::warn!(
                    "No page could be fetched, using fallback dataset ({} movies)",
                    self.fallback.len()
                );
                append_unique(&mut movies, &mut seen_ids, self.fallback.movies().to_vec());
                CatalogSource::Fallback
            }
            LoadTermination::PageFailed { .. } | LoadTermination::Cancelled
                if !movies.is_empty() =>
            {
                CatalogSource::Partial
            }
            _ => CatalogSource::Remote,
        };

        tracing::info!(
            "Fetched {} movies total ({pages_fetched} pages, {source:?}, {termination:?})",
            movies.len()
        );

        CatalogLoad {
            movies,
            pages_fetched,
            termination,
            source,
        }
    }
}

/// Appends records whose id has not been seen yet; first occurrence wins.
fn append_unique(
    movies: &mut Vec<MovieRecord>,
    seen_ids: &mut HashSet<String>,
    incoming: Vec<MovieRecord>,
) {
    for record in incoming {
        if seen_ids.insert(record.id.clone()) {
            movies.push(record);
        } else {
            tracing::debug!("Dropping duplicate movie id {}", record.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::providers::mock::movie;
    use crate::providers::{ScriptedPage, ScriptedSource};
    use crate::types::CatalogPage;

    fn fallback_of(count: usize) -> FallbackDataset {
        FallbackDataset::from_movies((1000..1000 + count).map(movie).collect())
    }

    #[tokio::test]
    async fn test_loads_until_last_page() {
        let source = Arc::new(ScriptedSource::with_page_sizes(&[20, 20, 5]));
        let loader = CatalogLoader::new(source.clone(), fallback_of(3));

        let load = loader.load_with_report(&CancellationToken::new()).await;

        assert_eq!(load.movies.len(), 45);
        assert_eq!(load.pages_fetched, 3);
        assert!(matches!(load.termination, LoadTermination::LastPage));
        assert_eq!(load.source, CatalogSource::Remote);
        assert_eq!(source.requested_pages(), vec![1, 2, 3]);
        assert_eq!(load.movies[0].id, "movie-1");
        assert_eq!(load.movies[44].id, "movie-45");
    }

    #[tokio::test]
    async fn test_first_page_failure_uses_fallback() {
        let source = ScriptedSource::new(vec![ScriptedPage::Status(500)]);
        let loader = CatalogLoader::new(source, fallback_of(7));

        let load = loader.load_with_report(&CancellationToken::new()).await;

        assert_eq!(load.movies.len(), 7);
        assert!(load.used_fallback());
        assert!(matches!(
            load.termination,
            LoadTermination::PageFailed { page: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_partial_success_skips_fallback() {
        let script = vec![
            ScriptedPage::Page(CatalogPage::new(1, 4, (1..=20).map(movie).collect())),
            ScriptedPage::Status(502),
        ];
        let loader = CatalogLoader::new(ScriptedSource::new(script), fallback_of(7));

        let load = loader.load_with_report(&CancellationToken::new()).await;

        assert_eq!(load.movies.len(), 20);
        assert_eq!(load.source, CatalogSource::Partial);
        assert!(!load.movies.iter().any(|m| m.id == "movie-1000"));
    }

    #[tokio::test]
    async fn test_total_failure_with_empty_fallback_is_empty() {
        let loader = CatalogLoader::new(
            ScriptedSource::new(vec![ScriptedPage::Status(404)]),
            FallbackDataset::empty(),
        );

        assert!(loader.load_full_catalog().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_is_natural_end() {
        let script = vec![
            ScriptedPage::Page(CatalogPage::new(1, 9, (1..=20).map(movie).collect())),
            ScriptedPage::Page(CatalogPage::new(2, 9, Vec::new())),
        ];
        let source = Arc::new(ScriptedSource::new(script));
        let loader = CatalogLoader::new(source.clone(), fallback_of(7));

        let load = loader.load_with_report(&CancellationToken::new()).await;

        assert_eq!(load.movies.len(), 20);
        assert!(matches!(load.termination, LoadTermination::EmptyPage));
        assert_eq!(load.source, CatalogSource::Remote);
        assert_eq!(source.requested_pages(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_empty_first_page_does_not_fall_back() {
        let loader = CatalogLoader::new(
            ScriptedSource::new(vec![ScriptedPage::Page(CatalogPage::default())]),
            fallback_of(7),
        );

        let load = loader.load_with_report(&CancellationToken::new()).await;

        assert!(load.movies.is_empty());
        assert!(!load.used_fallback());
    }

    #[tokio::test]
    async fn test_page_ceiling_truncates() {
        let source = Arc::new(ScriptedSource::with_page_sizes(&[20; 8]));
        let loader = CatalogLoader::new(source.clone(), fallback_of(1));

        let load = loader.load_with_report(&CancellationToken::new()).await;

        assert_eq!(load.movies.len(), 100);
        assert!(matches!(load.termination, LoadTermination::PageCeiling));
        assert_eq!(source.requested_pages(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_custom_page_ceiling() {
        let source = Arc::new(ScriptedSource::with_page_sizes(&[10; 4]));
        let loader = CatalogLoader::new(source.clone(), fallback_of(1)).with_page_ceiling(2);

        assert_eq!(loader.load_full_catalog().await.len(), 20);
        assert_eq!(source.requested_pages(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_missing_last_page_runs_to_ceiling() {
        let script = (1..=6)
            .map(|n| {
                let mut page = CatalogPage::new(n, 0, vec![movie(n as usize)]);
                page.last_page = None;
                ScriptedPage::Page(page)
            })
            .collect();
        let loader = CatalogLoader::new(ScriptedSource::new(script), fallback_of(1));

        assert_eq!(loader.load_full_catalog().await.len(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_dropped() {
        let script = vec![
            ScriptedPage::Page(CatalogPage::new(1, 2, vec![movie(1), movie(2)])),
            ScriptedPage::Page(CatalogPage::new(2, 2, vec![movie(2), movie(3)])),
        ];
        let loader = CatalogLoader::new(ScriptedSource::new(script), fallback_of(1));

        let ids: Vec<_> = loader
            .load_full_catalog()
            .await
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(ids, vec!["movie-1", "movie-2", "movie-3"]);
    }

    #[tokio::test]
    async fn test_cancel_before_start_fetches_nothing() {
        let source = Arc::new(ScriptedSource::with_page_sizes(&[20, 20]));
        let loader = CatalogLoader::new(source.clone(), fallback_of(7));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let load = loader.load_with_report(&cancel).await;

        assert!(load.is_cancelled());
        assert!(load.movies.is_empty());
        assert!(!load.used_fallback());
        assert_eq!(load.source, CatalogSource::Remote);
        assert!(source.requested_pages().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_first_page_is_not_partial() {
        let loader = Arc::new(CatalogLoader::new(
            ScriptedSource::new(vec![ScriptedPage::Hang]),
            fallback_of(7),
        ));
        let cancel = CancellationToken::new();

        let task = {
            let loader = loader.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { loader.load_with_report(&cancel).await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        cancel.cancel();
        let load = task.await.unwrap();

        assert!(load.is_cancelled());
        assert!(load.movies.is_empty());
        assert_eq!(load.source, CatalogSource::Remote);
    }

    #[test]
    fn test_from_config_rejects_invalid_paging() {
        let mut config = MovieshelfConfig::for_testing("http://127.0.0.1:9/movies");
        config.paging.page_ceiling = 0;

        assert!(matches!(
            CatalogLoader::from_config(&config),
            Err(CatalogError::InvalidConfig { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_hanging_page() {
        let script = vec![
            ScriptedPage::Page(CatalogPage::new(1, 3, (1..=20).map(movie).collect())),
            ScriptedPage::Hang,
        ];
        let loader = Arc::new(CatalogLoader::new(ScriptedSource::new(script), fallback_of(7)));
        let cancel = CancellationToken::new();

        let task = {
            let loader = loader.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { loader.load_with_report(&cancel).await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        cancel.cancel();
        let load = task.await.unwrap();

        assert!(load.is_cancelled());
        assert_eq!(load.movies.len(), 20);
        assert_eq!(load.source, CatalogSource::Partial);
    }
}
