// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `banker demo` command: the built-in textbook walkthrough.

use scenario::{ScenarioConfig, ScenarioRunner};

pub fn execute(checker: String) -> anyhow::Result<()> {
    let config = ScenarioConfig {
        checker,
        ..ScenarioConfig::textbook()
    };

    super::banner("banker · Textbook Walkthrough");
    println!("  Initial state");
    super::print_state(&config.build_state()?);
    println!();

    let report = ScenarioRunner::new().run(&config)?;
    super::run::print_steps(&report);

    println!("  Final state");
    super::print_state(&report.final_state);
    println!();
    println!("{}", report.summary());

    Ok(())
}
