//! Movieshelf Catalog - movie catalog loading, search and pagination

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Loads a paginated remote movie catalog once per session, falling back to
//! a bundled dataset when the endpoint is unreachable, then serves title
//! search and windowed "load more" pagination from memory.

pub mod debounce;
pub mod display;
pub mod errors;
pub mod handle;
pub mod loader;
pub mod providers;
pub mod session;
pub mod types;

// Re-export main types
pub use debounce::QueryDebouncer;
pub use display::{MovieCard, empty_state_message};
pub use errors::{CatalogError, SessionError};
pub use handle::{CatalogHandle, CatalogView};
pub use loader::{CatalogLoad, CatalogLoader, LoadTermination};
pub use providers::{CatalogPageSource, FallbackDataset, RemoteCatalogSource};
pub use session::{CatalogSession, SessionPhase, derive_display, matching_movies};
pub use types::{CastMember, CatalogPage, CatalogSource, Genre, MovieRecord};
