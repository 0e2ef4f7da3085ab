// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `banker run` command: execute a scenario file step by step.

use scenario::{Outcome, ScenarioReport, ScenarioRunner};
use std::path::PathBuf;

pub fn execute(path: PathBuf, checker: Option<String>, json: bool) -> anyhow::Result<()> {
    let config = super::load_scenario(&path, checker)?;
    let report = ScenarioRunner::new().run(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    super::banner("banker · Scenario Runner");
    println!("  Scenario: {}", path.display());
    println!("  Checker:  {}", report.checker);
    println!(
        "  Initial:  {}",
        match report.initial_verdict.sequence() {
            Some(seq) => format!("safe ({seq})"),
            None => "UNSAFE".to_string(),
        }
    );
    println!();

    print_steps(&report);

    println!("  Final state");
    super::print_state(&report.final_state);
    println!();
    println!("{}", report.stats.summary());
    println!("{}", report.summary());

    Ok(())
}

/// Prints one line per step.
pub fn print_steps(report: &ScenarioReport) {
    println!("  Steps");
    for step in &report.steps {
        let resources = if step.resources.is_empty() {
            String::new()
        } else {
            format!("{:?}", step.resources)
        };
        let outcome = match &step.outcome {
            Outcome::Granted { sequence } => format!("GRANTED   safe sequence {sequence}"),
            Outcome::Released { resources } => format!("RELEASED  {resources}"),
            Outcome::Rejected { kind, message } => format!("REJECTED  {kind}: {message}"),
        };
        println!(
            "   {:>2}. {:<8} P{:<3} {:<12} {outcome}",
            step.index,
            format!("{:?}", step.action).to_lowercase(),
            step.pid,
            resources,
        );
    }
    println!();
}
