// SPDX-License-Identifier: MIT OR Apache-2.0
//! Corpus sources and the first-available loading policy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::corpus::{parse_corpus, LoadReport};
use crate::error::{EmbeddingError, Result};
use crate::store::VectorStore;

/// Corpus file names tried in priority order.
pub const DEFAULT_CORPUS_FILES: [&str; 3] = [
    "glove.6B.50d.95MB.txt",
    "glove.6B.50d.txt",
    "improved_supercompact.txt",
];

/// Somewhere corpus text can come from.
pub trait CorpusSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the full corpus text.
    ///
    /// `Ok(None)` means the source is not present. An error means it exists
    /// but could not be read.
    fn fetch(&self) -> Result<Option<String>>;
}

/// A corpus file on local disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EmbeddingError::Fetch {
                corpus: self.name.clone(),
                cause: e.to_string(),
            }),
        }
    }
}

/// Corpus text already held in memory.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl CorpusSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Option<String>> {
        Ok(Some(self.text.clone()))
    }
}

/// The default corpus files under `assets_dir`, in priority order.
pub fn default_sources(assets_dir: impl AsRef<Path>) -> Vec<Box<dyn CorpusSource>> {
    let dir = assets_dir.as_ref();
    DEFAULT_CORPUS_FILES
        .iter()
        .map(|file| Box::new(FileSource::new(dir.join(file))) as Box<dyn CorpusSource>)
        .collect()
}

/// A parsed corpus and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    pub source: String,
    pub store: Arc<VectorStore>,
    pub report: LoadReport,
}

/// Load from the first source that is present.
///
/// Sources are tried in order. Missing or unreadable sources are logged and
/// skipped. The first source that returns text is used exclusively: a parse
/// failure there fails the whole load rather than falling through.
#[instrument(skip(sources), fields(candidates = sources.len()))]
pub fn load_first_available(sources: &[Box<dyn CorpusSource>]) -> Result<LoadedCorpus> {
    let mut tried = Vec::with_capacity(sources.len());

    for source in sources {
        let name = source.name();
        tried.push(name.to_string());

        let text = match source.fetch() {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!(corpus = name, "corpus source not present");
                continue;
            },
            Err(e) => {
                warn!(corpus = name, error = %e, "corpus source failed");
                continue;
            },
        };

        let (store, report) = parse_corpus(name, &text)?;
        info!(
            corpus = name,
            words = report.words,
            dimension = store.dimension(),
            skipped = report.skipped.len(),
            "embeddings loaded"
        );
        return Ok(LoadedCorpus {
            source: name.to_string(),
            store: Arc::new(store),
            report,
        });
    }

    error!(tried = ?tried, "no embeddings file found");
    Err(EmbeddingError::NoSourceAvailable { tried })
}
