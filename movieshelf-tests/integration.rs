//! Integration tests for Movieshelf
//!
//! These tests run the catalog loader and session controller against a
//! mocked paging endpoint, covering the full path from HTTP response to the
//! displayed movie list.

#[path = "integration/common.rs"]
mod common;

#[path = "integration/remote_loading.rs"]
mod remote_loading;

#[path = "integration/session_flow.rs"]
mod session_flow;
