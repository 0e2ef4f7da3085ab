// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # banker
//!
//! Command-line harness for the Banker's Algorithm safety engine.
//!
//! ## Usage
//! ```bash
//! # Run a scripted scenario
//! banker run --scenario ./demos/textbook.toml
//!
//! # Check only whether the initial state is safe
//! banker check --scenario ./demos/textbook.toml
//!
//! # Walk through the built-in textbook example
//! banker demo
//!
//! # Hammer a shared processor from many workers
//! banker stress --workers 16 --rounds 5000
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "banker",
    about = "Deadlock-avoidance safety engine (Banker's Algorithm)",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every step of a scenario file and print the outcomes.
    Run {
        /// Path to the scenario TOML file.
        #[arg(short, long)]
        scenario: std::path::PathBuf,

        /// Override the checker named in the file (restart-scan, continue-scan).
        #[arg(long)]
        checker: Option<String>,

        /// Print the full report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Check whether the initial state of a scenario is safe.
    Check {
        /// Path to the scenario TOML file.
        #[arg(short, long)]
        scenario: std::path::PathBuf,

        /// Override the checker named in the file.
        #[arg(long)]
        checker: Option<String>,
    },

    /// Run the built-in five-process textbook example.
    Demo {
        /// Safety checker to use.
        #[arg(long, default_value = "restart-scan")]
        checker: String,
    },

    /// Run concurrent request/release workers against one shared processor.
    Stress {
        /// Optional scenario whose initial state is used (defaults to the textbook state).
        #[arg(short, long)]
        scenario: Option<std::path::PathBuf>,

        /// Number of concurrent workers.
        #[arg(short, long, default_value_t = 8)]
        workers: usize,

        /// Request/release rounds per worker.
        #[arg(short, long, default_value_t = 1000)]
        rounds: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            scenario,
            checker,
            json,
        } => commands::run::execute(scenario, checker, json),
        Commands::Check { scenario, checker } => commands::check::execute(scenario, checker),
        Commands::Demo { checker } => commands::demo::execute(checker),
        Commands::Stress {
            scenario,
            workers,
            rounds,
        } => commands::stress::execute(scenario, workers, rounds).await,
    }
}
