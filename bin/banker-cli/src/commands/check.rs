// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `banker check` command: report whether a scenario's initial state is safe.
//!
//! Exits with an error when the state is unsafe, so the command can be used
//! in scripts.

use banker::SafetyVerdict;
use std::path::PathBuf;

pub fn execute(path: PathBuf, checker: Option<String>) -> anyhow::Result<()> {
    let config = super::load_scenario(&path, checker)?;
    let mut processor = config.build_processor()?;

    super::banner("banker · Safety Check");
    println!("  Scenario: {} ({})", config.display_name(), path.display());
    println!("  Checker:  {}", processor.checker_name());
    println!();
    super::print_state(processor.state());
    println!();

    match processor.check_safety() {
        SafetyVerdict::Safe { sequence } => {
            println!("  SAFE: {sequence}");
            Ok(())
        }
        SafetyVerdict::Unsafe { finished, blocked } => {
            println!("  UNSAFE");
            println!("   Could finish: {finished:?}");
            println!("   Blocked:      {blocked:?}");
            anyhow::bail!("initial state of '{}' is unsafe", config.display_name())
        }
    }
}
