//! Scripted page source for testing.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CatalogPageSource;
use crate::errors::CatalogError;
use crate::types::{CatalogPage, MovieRecord};

/// Scripted response for one page number.
#[derive(Debug, Clone)]
pub enum ScriptedPage {
    /// Serve this page
    Page(CatalogPage),
    /// Answer with a non-success status
    Status(u16),
    /// Never answer
    Hang,
}

/// Page source replaying a fixed script; page `n` maps to entry `n - 1`.
///
/// Pages past the end of the script answer with HTTP 404.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Vec<ScriptedPage>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedSource {
    /// Script serving `script[n - 1]` for page `n`.
    pub fn new(script: Vec<ScriptedPage>) -> Self {
        Self {
            script,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Script serving `sizes.len()` pages with `last_page` set to the page count.
    pub fn with_page_sizes(sizes: &[usize]) -> Self {
        let last_page = sizes.len() as u32;
        let mut next_id = 0;
        let script = sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                let movies = (0..size)
                    .map(|_| {
                        next_id += 1;
                        movie(next_id)
                    })
                    .collect();
                ScriptedPage::Page(CatalogPage::new(index as u32 + 1, last_page, movies))
            })
            .collect();
        Self::new(script)
    }

    /// Page numbers requested so far, in order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().clone()
    }
}

/// Test record with a title derived from its number.
pub fn movie(n: usize) -> MovieRecord {
    MovieRecord::new(format!("movie-{n}"), format!("Movie {n}"))
}

#[async_trait]
impl CatalogPageSource for ScriptedSource {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.requested.lock().push(page);

        match self.script.get(page as usize - 1) {
            Some(ScriptedPage::Page(catalog_page)) => Ok(catalog_page.clone()),
            Some(ScriptedPage::Status(status)) => Err(CatalogError::HttpStatus {
                page,
                status: *status,
            }),
            Some(ScriptedPage::Hang) => std::future::pending().await,
            None => Err(CatalogError::HttpStatus { page, status: 404 }),
        }
    }
}
