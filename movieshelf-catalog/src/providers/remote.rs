//! HTTP page source for the remote paginated movie endpoint.

use async_trait::async_trait;
use movieshelf_core::RemoteConfig;
use url::Url;

use super::CatalogPageSource;
use crate::errors::CatalogError;
use crate::types::CatalogPage;

/// Remote catalog source requesting `GET <base_url>?page=<n>`.
///
/// Transport failures, non-success statuses and undecodable bodies are all
/// reported as page errors. No retries.
#[derive(Debug, Clone)]
pub struct RemoteCatalogSource {
    client: reqwest::Client,
    base_url: Url,
}

impl RemoteCatalogSource {
    /// Create a remote source from configuration.
    ///
    /// # Errors
    /// - `CatalogError::InvalidBaseUrl` - Base URL does not parse
    /// - `CatalogError::ClientSetup` - HTTP client could not be built
    pub fn new(config: &RemoteConfig) -> Result<Self, CatalogError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| CatalogError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| CatalogError::ClientSetup {
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Endpoint the page parameter is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for a given page, keeping any query the base URL already carries.
    fn page_url(&self, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }
}

#[async_trait]
impl CatalogPageSource for RemoteCatalogSource {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        let url = self.page_url(page);
        tracing::debug!("Requesting {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError {
                page,
                reason: format!("request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus {
                page,
                status: response.status().as_u16(),
            });
        }

        response
            .json::<CatalogPage>()
            .await
            .map_err(|e| CatalogError::ParseError {
                page,
                reason: format!("JSON parsing failed: {e}"),
            })
    }
}
