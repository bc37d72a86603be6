// SPDX-License-Identifier: MIT OR Apache-2.0
//! Essence shell - line-oriented driver for a scoring session.
//!
//! Each input line is either a word to collect or a `:`-prefixed command.

pub mod cli;

use std::fmt::Write as _;

use embedding_store::EmbeddingError;
use essence_game::{CollectOutcome, GameError, GameOver, ScoringSession};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

/// Defaults for `:similar`.
pub const DEFAULT_SIMILAR_COUNT: usize = 5;
pub const DEFAULT_SIMILAR_THRESHOLD: f32 = 0.1;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to initialize line editor: {0}")]
    Init(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// User-facing text for a corpus load that left no embeddings.
pub fn load_failure_message(error: &EmbeddingError) -> String {
    match error {
        EmbeddingError::NoSourceAvailable { tried } => format!(
            "no embeddings available: none of {} found",
            tried.join(", ")
        ),
        other => format!("no embeddings available: {other}"),
    }
}

/// Result of executing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command executed successfully with output.
    Output(String),
    /// Energy ran out; the summary to display.
    GameOver(String),
    /// Shell should exit.
    Exit,
    /// Help text to display.
    Help(String),
    /// Empty input (no-op).
    Empty,
    /// Error occurred.
    Error(String),
}

/// Action the read loop should take after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Exit,
}

/// Interactive front end over a [`ScoringSession`].
pub struct Shell {
    session: ScoringSession,
    quiet: bool,
}

impl Shell {
    pub fn new(session: ScoringSession) -> Self {
        Self {
            session,
            quiet: false,
        }
    }

    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn session(&self) -> &ScoringSession {
        &self.session
    }

    /// Execute a single input line.
    pub fn execute(&mut self, input: &str) -> CommandResult {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CommandResult::Empty;
        }

        let Some(command) = trimmed.strip_prefix(':') else {
            return self.collect(trimmed);
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        match name.as_str() {
            "q" | "quit" | "exit" => CommandResult::Exit,
            "h" | "help" => CommandResult::Help(Self::help_text()),
            "status" => CommandResult::Output(self.status_line()),
            "words" => CommandResult::Output(self.session.collected_words_text()),
            "similar" => self.similar(&args),
            "tick" => self.tick(&args),
            "reset" => match self.session.reset() {
                Ok(()) => CommandResult::Output(format!("New game. {}", self.status_line())),
                Err(e) => CommandResult::Error(e.to_string()),
            },
            other => CommandResult::Error(format!("Unknown command: :{other}")),
        }
    }

    fn collect(&mut self, word: &str) -> CommandResult {
        if self.session.is_game_over() {
            return CommandResult::Error("Game over. Type :reset to play again.".to_string());
        }

        match self.session.collect_word(word) {
            Ok(CollectOutcome::Collected { points }) => {
                if self.quiet {
                    CommandResult::Output(format!("{points:+}"))
                } else {
                    CommandResult::Output(format!("{points:+} {word}  ({})", self.status_line()))
                }
            },
            Ok(CollectOutcome::Duplicate) => {
                CommandResult::Output(format!("{word} already collected"))
            },
            Ok(CollectOutcome::Unknown) => {
                CommandResult::Error(format!("{word} is not in the vocabulary"))
            },
            Ok(CollectOutcome::Empty) => CommandResult::Empty,
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn similar(&self, args: &[&str]) -> CommandResult {
        let Some(word) = args.first() else {
            return CommandResult::Error("Usage: :similar <word> [count] [threshold]".to_string());
        };
        let count = match args.get(1).map(|s| s.parse::<usize>()) {
            None => DEFAULT_SIMILAR_COUNT,
            Some(Ok(n)) => n,
            Some(Err(_)) => return CommandResult::Error(format!("Invalid count: {}", args[1])),
        };
        let threshold = match args.get(2).map(|s| s.parse::<f32>()) {
            None => DEFAULT_SIMILAR_THRESHOLD,
            Some(Ok(t)) => t,
            Some(Err(_)) => {
                return CommandResult::Error(format!("Invalid threshold: {}", args[2]))
            },
        };

        let store = self.session.store();
        if !store.contains(word) {
            return CommandResult::Error(format!("{word} is not in the vocabulary"));
        }

        let neighbors = store.nearest_neighbors_scored(word, count, threshold);
        if neighbors.is_empty() {
            return CommandResult::Output(format!("No words similar to {word}"));
        }
        let mut out = String::new();
        for n in neighbors {
            let _ = writeln!(out, "{:<20} {:.3}", n.word, n.similarity);
        }
        CommandResult::Output(out.trim_end().to_string())
    }

    fn tick(&mut self, args: &[&str]) -> CommandResult {
        let seconds = match args.first().map(|s| s.parse::<f32>()) {
            Some(Ok(s)) if s.is_finite() && s >= 0.0 => s,
            _ => return CommandResult::Error("Usage: :tick <seconds>".to_string()),
        };

        match self.session.tick(seconds, true) {
            Some(over) => CommandResult::GameOver(Self::game_over_text(&over)),
            None => CommandResult::Output(self.status_line()),
        }
    }

    fn status_line(&self) -> String {
        format!(
            "target: {}  avoid: {}  score: {}  energy: {:.1}/{:.1}",
            self.session.target_word(),
            self.session.avoid_word(),
            self.session.score(),
            self.session.current_energy(),
            self.session.params().max_energy,
        )
    }

    fn game_over_text(over: &GameOver) -> String {
        let essence = over.final_essence.as_deref().unwrap_or("(nothing collected)");
        format!(
            "GAME OVER\nScore: {}\nWords collected: {}\nYour essence: {essence}",
            over.score,
            over.collected.len()
        )
    }

    fn help_text() -> String {
        [
            "Type a word to collect it.",
            "",
            "Commands:",
            "  :similar <word> [count] [threshold]  Nearest words (defaults 5, 0.1)",
            "  :tick <seconds>                      Let energy drain",
            "  :status                              Target, avoid, score and energy",
            "  :words                               Collected words",
            "  :reset                               Start a new game",
            "  :help                                This text",
            "  :quit                                Exit",
        ]
        .join("\n")
    }

    /// Print a command result and decide whether to keep reading.
    pub fn process_result(result: &CommandResult) -> LoopAction {
        match result {
            CommandResult::Output(text) | CommandResult::Help(text) => {
                println!("{text}");
                LoopAction::Continue
            },
            CommandResult::GameOver(text) => {
                println!("{text}");
                LoopAction::Continue
            },
            CommandResult::Error(text) => {
                eprintln!("{text}");
                LoopAction::Continue
            },
            CommandResult::Exit => LoopAction::Exit,
            CommandResult::Empty => LoopAction::Continue,
        }
    }

    /// Run the read loop until `:quit` or end of input.
    pub fn run(&mut self) -> Result<(), ShellError> {
        let mut editor = DefaultEditor::new().map_err(|e| ShellError::Init(e.to_string()))?;

        if !self.quiet {
            println!("Essence v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", self.status_line());
            println!("Type :help for commands.\n");
        }

        loop {
            match editor.readline("essence> ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if Self::process_result(&self.execute(&line)) == LoopAction::Exit {
                        break;
                    }
                },
                Err(ReadlineError::Interrupted) => println!("^C"),
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                },
            }
        }

        Ok(())
    }
}
