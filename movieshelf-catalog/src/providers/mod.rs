//! Page source implementations for catalog loading.

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::types::CatalogPage;

pub mod fallback;
#[cfg(test)]
pub mod mock;
pub mod remote;

pub use fallback::FallbackDataset;
#[cfg(test)]
pub use mock::{ScriptedPage, ScriptedSource};
pub use remote::RemoteCatalogSource;

/// Trait for paginated catalog sources.
///
/// Implementations serve one page of the catalog at a time, numbered from 1
/// (remote endpoint, bundled dataset, scripted sources for testing).
#[async_trait]
pub trait CatalogPageSource: Send + Sync + std::fmt::Debug {
    /// Fetch a single catalog page.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Transport failure
    /// - `CatalogError::HttpStatus` - Non-success response status
    /// - `CatalogError::ParseError` - Response body is not a catalog page
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError>;
}

#[async_trait]
impl<T: CatalogPageSource + ?Sized> CatalogPageSource for std::sync::Arc<T> {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        (**self).fetch_page(page).await
    }
}
