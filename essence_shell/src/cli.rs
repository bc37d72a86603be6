// SPDX-License-Identifier: MIT OR Apache-2.0
// Command-line argument parsing for the essence shell.

use std::path::PathBuf;

use clap::Parser;
use embedding_store::{default_sources, CorpusSource, FileSource};
use essence_game::PARAMETERS_FILE;

/// Essence: collect words, steer towards the target, away from the avoid word.
#[derive(Parser, Debug)]
#[command(name = "essence")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the corpus files and GameParameters.json
    #[arg(long = "assets-dir", env = "ESSENCE_ASSETS_DIR", default_value = "StreamingAssets")]
    pub assets_dir: PathBuf,

    /// Load this corpus file instead of the default priority list
    #[arg(long = "corpus")]
    pub corpus: Option<PathBuf>,

    /// Game parameters JSON (defaults to <assets-dir>/GameParameters.json)
    #[arg(short = 'c', long = "config", env = "ESSENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for target/avoid selection
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Quiet mode: suppress the banner and per-word status
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Corpus sources in the order they should be tried.
    pub fn corpus_sources(&self) -> Vec<Box<dyn CorpusSource>> {
        match &self.corpus {
            Some(path) => vec![Box::new(FileSource::new(path))],
            None => default_sources(&self.assets_dir),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.assets_dir.join(PARAMETERS_FILE))
    }
}
