//! Movieshelf Core - configuration, logging and shared errors
//!
//! Holds the pieces every other Movieshelf crate leans on: the central
//! `MovieshelfConfig`, tracing setup, and the top-level error type.

pub mod config;
pub mod tracing_setup;

pub use config::{MovieshelfConfig, PagingConfig, RemoteConfig, SearchConfig};

/// Errors raised while setting up Movieshelf itself.
#[derive(Debug, thiserror::Error)]
pub enum MovieshelfError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tracing setup failed: {reason}")]
    Tracing { reason: String },
}

impl MovieshelfError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MovieshelfError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            MovieshelfError::Io(_) => "File system error occurred".to_string(),
            MovieshelfError::Tracing { .. } => "Logging could not be initialized".to_string(),
        }
    }

    /// Checks if this error comes from user-supplied settings.
    pub fn is_user_error(&self) -> bool {
        matches!(self, MovieshelfError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, MovieshelfError>;
