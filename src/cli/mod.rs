//! CLI module for I.R.I.S
//!
//! Provides command-line interface parsing and handling for the iris binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// I.R.I.S - Iterative Research & Intelligent Synthesis
///
/// A sufficiency-driven research loop: search, merge near-duplicate
/// findings, judge coverage, and issue bounded follow-up queries until the
/// topic is covered.
#[derive(Parser, Debug)]
#[command(
    name = "iris",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "I.R.I.S - Iterative Research & Intelligent Synthesis",
    long_about = "A sufficiency-driven research loop: search the web, merge near-duplicate\n\
                  findings into representative results, judge knowledge coverage, and issue\n\
                  bounded follow-up queries until the topic is sufficiently covered.",
    after_help = "EXAMPLES:\n    \
                  iris init                           # Write an annotated iris.toml\n    \
                  iris run \"solid-state batteries\"    # Research a topic\n    \
                  iris run --preset quality \"...\"     # Override the active preset\n    \
                  iris config --validate              # Validate iris.toml"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "iris.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a research session over a topic
    Run {
        /// The research topic or question
        topic: String,

        /// Skip web search and run against an empty offline provider
        #[arg(long)]
        offline: bool,

        /// Override the active preset (balanced, conservative, aggressive,
        /// performance, quality)
        #[arg(long)]
        preset: Option<String>,

        /// Emit the session outcome as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show or validate configuration
    Config {
        /// Show the full resolved configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Write an annotated iris.toml into a directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing iris.toml
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
