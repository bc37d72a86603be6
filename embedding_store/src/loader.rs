// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-shot background corpus load with a readiness flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::error::{EmbeddingError, Result};
use crate::source::{load_first_available, CorpusSource, LoadedCorpus};
use crate::store::VectorStore;

#[derive(Default)]
struct LoadState {
    loaded: AtomicBool,
    corpus: RwLock<Option<LoadedCorpus>>,
}

/// Owns the single embedding load of a process.
///
/// [`start`](Self::start) may succeed once; later calls are rejected. Until
/// the background task finishes, [`is_loaded`](Self::is_loaded) is false
/// and [`store`](Self::store) returns `None`. A failed load leaves it that
/// way for good.
#[derive(Default)]
pub struct EmbeddingLoader {
    started: AtomicBool,
    state: Arc<LoadState>,
}

/// Handle to a running load.
pub struct LoadTask {
    handle: JoinHandle<Result<LoadedCorpus>>,
}

impl EmbeddingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin loading from `sources` on a blocking worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, sources: Vec<Box<dyn CorpusSource>>) -> Result<LoadTask> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(EmbeddingError::LoadAlreadyStarted);
        }

        let state = Arc::clone(&self.state);
        let handle = tokio::task::spawn_blocking(move || {
            let result = load_first_available(&sources);
            if let Ok(corpus) = &result {
                *state.corpus.write() = Some(corpus.clone());
                state.loaded.store(true, Ordering::Release);
            }
            result
        });

        Ok(LoadTask { handle })
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// True once a store is available for gameplay.
    pub fn is_loaded(&self) -> bool {
        self.state.loaded.load(Ordering::Acquire)
    }

    pub fn store(&self) -> Option<Arc<VectorStore>> {
        self.state
            .corpus
            .read()
            .as_ref()
            .map(|c| Arc::clone(&c.store))
    }

    pub fn corpus(&self) -> Option<LoadedCorpus> {
        self.state.corpus.read().clone()
    }
}

impl LoadTask {
    /// Wait for the load to finish.
    pub async fn wait(self) -> Result<LoadedCorpus> {
        self.handle
            .await
            .map_err(|e| EmbeddingError::LoadFailed(e.to_string()))?
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
