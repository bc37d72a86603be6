// SPDX-License-Identifier: MIT OR Apache-2.0
//! Essence CLI entry point.

use anyhow::{bail, Result};
use clap::Parser;
use embedding_store::EmbeddingLoader;
use essence_game::{GameParameters, ScoringSession, WordSelector};
use essence_shell::cli::Cli;
use essence_shell::{load_failure_message, Shell};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("essence_shell=info".parse()?)
                .add_directive("embedding_store=info".parse()?)
                .add_directive("essence_game=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let loader = EmbeddingLoader::new();
    let task = loader.start(cli.corpus_sources())?;
    let params = GameParameters::load_or_default(cli.config_path());

    let corpus = match task.wait().await {
        Ok(corpus) => corpus,
        Err(e) => {
            tracing::error!(error = %e, "embedding load failed, gameplay disabled");
            bail!(load_failure_message(&e));
        },
    };
    tracing::info!(source = %corpus.source, words = corpus.report.words, "ready to play");

    let selector = cli.seed.map_or_else(WordSelector::new, WordSelector::seeded);
    let session = ScoringSession::new(corpus.store, params, selector)?;

    let mut shell = Shell::new(session).with_quiet(cli.quiet);
    tokio::task::block_in_place(|| shell.run())?;

    Ok(())
}
