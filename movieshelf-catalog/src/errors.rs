//! Error types for catalog loading and session control.

use thiserror::Error;

/// Errors that can occur while fetching or decoding catalog data.
///
/// None of these escape the loader: a failed page ends the fetch sequence
/// and is recorded in the load report instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure while requesting a page.
    #[error("Network error on page {page}: {reason}")]
    NetworkError {
        /// The page being requested
        page: u32,
        /// The reason for the network error
        reason: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("Page {page} returned HTTP {status}")]
    HttpStatus {
        /// The page being requested
        page: u32,
        /// Status code returned by the endpoint
        status: u16,
    },

    /// The response body could not be decoded as a catalog page.
    #[error("Parse error on page {page}: {reason}")]
    ParseError {
        /// The page being decoded
        page: u32,
        /// The reason for the parse error
        reason: String,
    },

    /// The bundled fallback document could not be decoded.
    #[error("Fallback dataset decode failed: {reason}")]
    FallbackDecode {
        /// The reason for the decode failure
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {reason}")]
    ClientSetup {
        /// The reason the client could not be built
        reason: String,
    },

    /// Configured base URL is not a valid absolute URL.
    #[error("Invalid catalog base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// The reason the URL was rejected
        reason: String,
    },

    /// Configuration failed validation.
    #[error("Invalid catalog configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration was rejected
        reason: String,
    },
}

impl CatalogError {
    /// Page the error belongs to, for page-level failures.
    pub fn page(&self) -> Option<u32> {
        match self {
            CatalogError::NetworkError { page, .. }
            | CatalogError::HttpStatus { page, .. }
            | CatalogError::ParseError { page, .. } => Some(*page),
            CatalogError::FallbackDecode { .. }
            | CatalogError::ClientSetup { .. }
            | CatalogError::InvalidBaseUrl { .. }
            | CatalogError::InvalidConfig { .. } => None,
        }
    }
}

/// Errors from driving the session state machine out of order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The catalog was already loaded for this session.
    #[error("Session catalog is already loaded")]
    AlreadyInitialized,

    /// A catalog was handed over while no load was in progress.
    #[error("Session is not loading")]
    NotLoading,

    /// The load was cancelled before it finished.
    #[error("Catalog load was cancelled")]
    LoadCancelled,
}
