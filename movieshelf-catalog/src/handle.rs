//! Shared session handle for the presentation layer.
//!
//! The application root creates one [`CatalogHandle`] and passes clones of it
//! to whatever needs to read or drive the catalog. Locks are never held
//! across an await.

use std::sync::Arc;

use movieshelf_core::{MovieshelfConfig, MovieshelfError};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::errors::SessionError;
use crate::loader::CatalogLoader;
use crate::session::CatalogSession;
use crate::types::{CatalogSource, MovieRecord};

/// Snapshot of the consumer-facing contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    /// Records currently displayed
    pub movies: Vec<MovieRecord>,
    /// Whether a load is in flight
    pub loading: bool,
    /// Whether `load_more_movies` would add anything
    pub has_more: bool,
}

/// Cloneable handle to one catalog session.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    session: Arc<RwLock<CatalogSession>>,
    load_cancel: Arc<Mutex<CancellationToken>>,
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new(CatalogSession::default())
    }
}

impl CatalogHandle {
    /// Wraps an existing session.
    pub fn new(session: CatalogSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            load_cancel: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Creates a handle over a fresh session sized by the configuration.
    ///
    /// # Errors
    /// - `MovieshelfError::Configuration` - The configuration fails validation
    pub fn from_config(config: &MovieshelfConfig) -> Result<Self, MovieshelfError> {
        Ok(Self::new(CatalogSession::from_config(config)?))
    }

    /// Run the one-time catalog load.
    ///
    /// Calling this while an earlier load is still running cancels that load;
    /// only the newest call installs its result.
    ///
    /// # Errors
    /// - `SessionError::AlreadyInitialized` - The catalog was already loaded
    /// - `SessionError::LoadCancelled` - A newer load or `shutdown` cancelled this one
    pub async fn initialize(&self, loader: &CatalogLoader) -> Result<CatalogSource, SessionError> {
        let token = {
            let mut session = self.session.write();
            session.begin_loading()?;

            let mut current = self.load_cancel.lock();
            current.cancel();
            *current = CancellationToken::new();
            current.clone()
        };

        let load = loader.load_with_report(&token).await;

        let mut session = self.session.write();
        if token.is_cancelled() {
            tracing::debug!("Discarding cancelled catalog load");
            return Err(SessionError::LoadCancelled);
        }

        let source = load.source;
        session.install_catalog(load.movies, source)?;
        Ok(source)
    }

    /// Cancel any load in flight. Used on session teardown.
    ///
    /// A session that was loading goes back to `Uninitialized`, so it no
    /// longer reports loading. A ready session keeps its catalog.
    pub fn shutdown(&self) {
        let mut session = self.session.write();
        self.load_cancel.lock().cancel();
        session.abandon_loading();
    }

    /// Apply a (debounced) search query.
    pub fn search_movies(&self, query: &str) {
        self.session.write().set_query(query);
    }

    /// Show the next window of results; returns how many were added.
    pub fn load_more_movies(&self) -> usize {
        self.session.write().load_more()
    }

    /// Records currently displayed.
    pub fn movies(&self) -> Vec<MovieRecord> {
        self.session.read().movies().to_vec()
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.session.read().is_loading()
    }

    /// Whether `load_more_movies` would add anything.
    pub fn has_more(&self) -> bool {
        self.session.read().has_more()
    }

    /// The active query, as typed.
    pub fn query(&self) -> String {
        self.session.read().query().to_string()
    }

    /// Origin of the installed catalog, once ready.
    pub fn source(&self) -> Option<CatalogSource> {
        self.session.read().source()
    }

    /// Consistent snapshot of movies, loading and has-more.
    pub fn view(&self) -> CatalogView {
        let session = self.session.read();
        CatalogView {
            movies: session.movies().to_vec(),
            loading: session.is_loading(),
            has_more: session.has_more(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::providers::mock::movie;
    use crate::providers::{FallbackDataset, ScriptedPage, ScriptedSource};
    use crate::types::CatalogPage;

    #[tokio::test]
    async fn test_handle_contract() {
        let handle = CatalogHandle::default();
        let loader = CatalogLoader::new(
            ScriptedSource::with_page_sizes(&[20, 20, 5]),
            FallbackDataset::empty(),
        );

        assert_eq!(handle.initialize(&loader).await, Ok(CatalogSource::Remote));

        let view = handle.view();
        assert_eq!(view.movies.len(), 20);
        assert!(!view.loading);
        assert!(view.has_more);

        assert_eq!(handle.load_more_movies(), 20);
        assert_eq!(handle.load_more_movies(), 5);
        assert!(!handle.has_more());
        assert_eq!(handle.load_more_movies(), 0);

        handle.search_movies("Movie 4");
        assert_eq!(handle.query(), "Movie 4");
        // "Movie 4" and "Movie 40" - "Movie 45"
        assert_eq!(handle.movies().len(), 7);
        assert_eq!(handle.source(), Some(CatalogSource::Remote));
    }

    #[tokio::test]
    async fn test_loading_flag_visible_during_load() {
        let handle = CatalogHandle::default();
        let loader = Arc::new(CatalogLoader::new(
            ScriptedSource::new(vec![ScriptedPage::Hang]),
            FallbackDataset::empty(),
        ));

        let task = {
            let handle = handle.clone();
            let loader = loader.clone();
            tokio::spawn(async move { handle.initialize(&loader).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.is_loading());
        assert!(handle.view().loading);

        handle.shutdown();
        assert_eq!(task.await.unwrap(), Err(SessionError::LoadCancelled));
        assert!(handle.movies().is_empty());
        assert!(!handle.is_loading());
        assert!(!handle.view().loading);
    }

    #[tokio::test]
    async fn test_shutdown_keeps_ready_catalog() {
        let handle = CatalogHandle::default();
        let loader = CatalogLoader::new(
            ScriptedSource::with_page_sizes(&[4]),
            FallbackDataset::empty(),
        );
        handle.initialize(&loader).await.unwrap();

        handle.shutdown();

        assert_eq!(handle.movies().len(), 4);
        assert!(!handle.is_loading());
        assert_eq!(
            handle.initialize(&loader).await,
            Err(SessionError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_paging() {
        let mut config = MovieshelfConfig::default();
        config.paging.page_size = 0;

        assert!(CatalogHandle::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_new_initialize_supersedes_hung_load() {
        let handle = CatalogHandle::default();
        let hung = Arc::new(CatalogLoader::new(
            ScriptedSource::new(vec![ScriptedPage::Hang]),
            FallbackDataset::empty(),
        ));

        let first = {
            let handle = handle.clone();
            let hung = hung.clone();
            tokio::spawn(async move { handle.initialize(&hung).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let healthy = CatalogLoader::new(
            ScriptedSource::new(vec![ScriptedPage::Page(CatalogPage::new(
                1,
                1,
                (1..=3).map(movie).collect(),
            ))]),
            FallbackDataset::empty(),
        );
        assert_eq!(handle.initialize(&healthy).await, Ok(CatalogSource::Remote));

        assert_eq!(first.await.unwrap(), Err(SessionError::LoadCancelled));
        assert_eq!(handle.movies().len(), 3);
        assert!(!handle.is_loading());
    }

    #[tokio::test]
    async fn test_second_initialize_after_ready_is_rejected() {
        let handle = CatalogHandle::default();
        let loader = CatalogLoader::new(
            ScriptedSource::with_page_sizes(&[2]),
            FallbackDataset::empty(),
        );

        handle.initialize(&loader).await.unwrap();
        assert_eq!(
            handle.initialize(&loader).await,
            Err(SessionError::AlreadyInitialized)
        );
        assert_eq!(handle.movies().len(), 2);
    }
}
