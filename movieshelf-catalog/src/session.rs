//! Catalog session controller
//!
//! Owns the full catalog once it is loaded, the current query and the
//! display cursor. The displayed subset is always derived from those three
//! through [`derive_display`]; nothing touches the network after loading.

use movieshelf_core::{MovieshelfConfig, MovieshelfError};
use tokio_util::sync::CancellationToken;

use crate::errors::SessionError;
use crate::loader::CatalogLoader;
use crate::types::{CatalogSource, MovieRecord};

/// Default number of records per display window.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Lifecycle of a session: `Uninitialized -> Loading -> Ready`.
///
/// An abandoned load returns the session to `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No catalog and no load in flight
    Uninitialized,
    /// A load is in flight
    Loading,
    /// The catalog is installed; terminal
    Ready,
}

/// Records of `catalog` matching `query`, in catalog order.
///
/// A query that is empty after trimming matches everything. Otherwise the
/// untrimmed query is matched case-insensitively as a title substring.
pub fn matching_movies<'a>(
    catalog: &'a [MovieRecord],
    query: &str,
) -> impl Iterator<Item = &'a MovieRecord> + 'a {
    let needle = (!query.trim().is_empty()).then(|| query.to_lowercase());
    catalog
        .iter()
        .filter(move |movie| needle.as_deref().is_none_or(|n| movie.title_contains(n)))
}

/// The first `count` records of `catalog` matching `query`.
pub fn derive_display(catalog: &[MovieRecord], query: &str, count: usize) -> Vec<MovieRecord> {
    matching_movies(catalog, query)
        .take(count)
        .cloned()
        .collect()
}

/// Per-session catalog state.
#[derive(Debug)]
pub struct CatalogSession {
    catalog: Vec<MovieRecord>,
    query: String,
    displayed: Vec<MovieRecord>,
    /// Display windows currently exposed
    display_page: usize,
    page_size: usize,
    phase: SessionPhase,
    source: Option<CatalogSource>,
}

impl Default for CatalogSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CatalogSession {
    /// Creates an empty session showing `page_size` records per window.
    ///
    /// A `page_size` of zero yields a session that never shows anything;
    /// [`CatalogSession::from_config`] rejects it.
    pub fn new(page_size: usize) -> Self {
        Self {
            catalog: Vec::new(),
            query: String::new(),
            displayed: Vec::new(),
            display_page: 0,
            page_size,
            phase: SessionPhase::Uninitialized,
            source: None,
        }
    }

    /// Creates a session sized by the paging configuration.
    ///
    /// # Errors
    /// - `MovieshelfError::Configuration` - The configuration fails validation
    pub fn from_config(config: &MovieshelfConfig) -> Result<Self, MovieshelfError> {
        config.validate()?;
        Ok(Self::new(config.paging.page_size))
    }

    /// Load the catalog through `loader` and show the first window.
    ///
    /// # Errors
    /// - `SessionError::AlreadyInitialized` - The catalog was already loaded
    pub async fn initialize(&mut self, loader: &CatalogLoader) -> Result<(), SessionError> {
        self.begin_loading()?;
        let load = loader.load_with_report(&CancellationToken::new()).await;
        self.install_catalog(load.movies, load.source)
    }

    /// Enter `Loading`. Restarting an unfinished load is allowed.
    ///
    /// # Errors
    /// - `SessionError::AlreadyInitialized` - The session is already `Ready`
    pub fn begin_loading(&mut self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Ready {
            return Err(SessionError::AlreadyInitialized);
        }
        self.phase = SessionPhase::Loading;
        Ok(())
    }

    /// Leave `Loading` without a catalog, e.g. when the load was cancelled.
    ///
    /// Returns whether the session was loading. Other phases are untouched.
    pub fn abandon_loading(&mut self) -> bool {
        if self.phase != SessionPhase::Loading {
            return false;
        }
        self.phase = SessionPhase::Uninitialized;
        tracing::debug!("Catalog load abandoned");
        true
    }

    /// Take ownership of a loaded catalog and leave `Loading` for good.
    ///
    /// The first window is derived against whatever query is active, so a
    /// search typed while loading is honoured.
    ///
    /// # Errors
    /// - `SessionError::NotLoading` - No load is in progress
    pub fn install_catalog(
        &mut self,
        movies: Vec<MovieRecord>,
        source: CatalogSource,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(SessionError::NotLoading);
        }

        self.catalog = movies;
        self.source = Some(source);
        self.reset_display();
        self.phase = SessionPhase::Ready;

        tracing::info!(
            "Session ready: {} movies ({source:?}), showing {}",
            self.catalog.len(),
            self.displayed.len()
        );
        Ok(())
    }

    /// Replace the query and restart the display at the first window.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.reset_display();
        tracing::debug!(
            "Query set to {:?}: showing {} movies",
            self.query,
            self.displayed.len()
        );
    }

    /// Append the next window of the current source. Returns how many records
    /// were added; zero leaves the session untouched.
    pub fn load_more(&mut self) -> usize {
        let next: Vec<MovieRecord> = matching_movies(&self.catalog, &self.query)
            .skip(self.displayed.len())
            .take(self.page_size)
            .cloned()
            .collect();

        if next.is_empty() {
            return 0;
        }

        let added = next.len();
        self.displayed.extend(next);
        self.display_page += 1;
        tracing::debug!(
            "Loaded {added} more movies (window {}, {} shown)",
            self.display_page,
            self.displayed.len()
        );
        added
    }

    /// Whether `load_more` would add anything, recomputed on every call.
    pub fn has_more(&self) -> bool {
        self.page_size > 0
            && self.displayed.len() < matching_movies(&self.catalog, &self.query).count()
    }

    fn reset_display(&mut self) {
        self.displayed = derive_display(&self.catalog, &self.query, self.page_size);
        self.display_page = 1;
    }

    /// Records currently displayed.
    pub fn movies(&self) -> &[MovieRecord] {
        &self.displayed
    }

    /// The full loaded catalog.
    pub fn catalog(&self) -> &[MovieRecord] {
        &self.catalog
    }

    /// The active query, as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Origin of the installed catalog, once ready.
    pub fn source(&self) -> Option<CatalogSource> {
        self.source
    }

    /// Number of display windows currently exposed.
    pub fn display_page(&self) -> usize {
        self.display_page
    }

    /// Records per display window.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}
