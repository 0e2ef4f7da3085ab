// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared output helpers.

pub mod check;
pub mod demo;
pub mod run;
pub mod stress;

use banker::AllocationState;
use scenario::ScenarioConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialises the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads a scenario file and applies an optional checker override.
pub fn load_scenario(path: &Path, checker: Option<String>) -> anyhow::Result<ScenarioConfig> {
    let mut config = ScenarioConfig::from_file(path)?;
    if let Some(checker) = checker {
        config.checker = checker;
    }
    Ok(config)
}

/// Prints the Max / Allocation / Need matrices and the free vector.
pub fn print_state(state: &AllocationState) {
    println!("   {:<6} {:<16} {:<16} {:<16}", "Proc", "Max", "Allocation", "Need");
    for pid in 0..state.num_processes() {
        println!(
            "   {:<6} {:<16} {:<16} {:<16}",
            format!("P{pid}"),
            state.max(pid).to_string(),
            state.allocated(pid).to_string(),
            state.need(pid).to_string(),
        );
    }
    println!("   Available: {}", state.available());
    println!("   Total:     {}", state.total());
}

/// Prints the banner used by every subcommand.
pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║ {:^52} ║", title);
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
