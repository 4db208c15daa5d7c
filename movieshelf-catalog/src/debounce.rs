//! Search input debouncing.
//!
//! Raw keystroke strings go in; a query comes out only once the input has
//! been quiet for the configured period. The session controller applies
//! every query it receives, so this sits in front of it.

use std::time::Duration;

use movieshelf_core::SearchConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::handle::CatalogHandle;

const CHANNEL_CAPACITY: usize = 32;

/// Trailing-edge debouncer for search input.
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    quiet_period: Duration,
}

impl QueryDebouncer {
    /// Creates a debouncer that waits `quiet_period` after the last input.
    pub fn new(quiet_period: Duration) -> Self {
        Self { quiet_period }
    }

    /// Creates a debouncer with the configured quiet period.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.debounce)
    }

    /// Forward settled queries from `input` to `output`.
    ///
    /// Emits the latest value once `quiet_period` passes without newer input,
    /// skipping a value equal to the last one emitted. When `input` closes,
    /// a pending value is flushed first. Returns when either side closes.
    pub async fn run(self, mut input: mpsc::Receiver<String>, output: mpsc::Sender<String>) {
        let mut pending: Option<String> = None;
        let mut last_emitted: Option<String> = None;

        loop {
            let settled = match pending.take() {
                None => match input.recv().await {
                    Some(raw) => {
                        pending = Some(raw);
                        continue;
                    }
                    None => break,
                },
                Some(candidate) => tokio::select! {
                    next = input.recv() => match next {
                        Some(raw) => {
                            pending = Some(raw);
                            continue;
                        }
                        None => {
                            pending = Some(candidate);
                            break;
                        }
                    },
                    _ = tokio::time::sleep(self.quiet_period) => candidate,
                },
            };

            if last_emitted.as_ref() == Some(&settled) {
                continue;
            }
            if output.send(settled.clone()).await.is_err() {
                return;
            }
            last_emitted = Some(settled);
        }

        if let Some(candidate) = pending
            && last_emitted.as_ref() != Some(&candidate)
        {
            let _ = output.send(candidate).await;
        }
    }

    /// Spawn the debouncer; returns the settled-query receiver and the task.
    pub fn spawn(self, input: mpsc::Receiver<String>) -> (mpsc::Receiver<String>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(self.run(input, tx));
        (rx, task)
    }
}

/// Apply every settled query to the session until the channel closes.
pub async fn apply_queries(handle: CatalogHandle, mut queries: mpsc::Receiver<String>) {
    while let Some(query) = queries.recv().await {
        tracing::debug!("Applying search {query:?}");
        handle.search_movies(&query);
    }
}
