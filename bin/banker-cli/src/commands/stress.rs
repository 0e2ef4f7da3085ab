// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `banker stress` command: concurrent workers against one shared processor.

use banker::SharedProcessor;
use scenario::{stress, ScenarioConfig, StressConfig};
use std::path::PathBuf;

pub async fn execute(
    scenario: Option<PathBuf>,
    workers: usize,
    rounds: usize,
) -> anyhow::Result<()> {
    let config = match scenario {
        Some(path) => super::load_scenario(&path, None)?,
        None => ScenarioConfig::textbook(),
    };

    super::banner("banker · Concurrent Stress");
    println!("  Scenario: {}", config.display_name());
    println!("  Workers:  {workers}");
    println!("  Rounds:   {rounds}");
    println!();

    let shared = SharedProcessor::from_processor(config.build_processor()?);
    let report = stress::run(shared, StressConfig { workers, rounds }).await?;

    let s = &report.stats;
    println!("  Results");
    println!("   Requests:      {}", s.total_requests);
    println!("   Granted:       {} ({:.1}%)", s.granted, s.grant_ratio() * 100.0);
    println!("   Insufficient:  {}", s.rejected_insufficient);
    println!("   Unsafe:        {}", s.rejected_unsafe);
    println!("   Over need:     {}", s.rejected_exceeds_need);
    println!("   Releases:      {}", s.releases);
    println!("   Total:         {} (conserved)", report.total);
    println!(
        "   Throughput:    {:.0} requests/s",
        s.total_requests as f64 / report.elapsed.as_secs_f64().max(1e-9)
    );
    println!();
    println!("{}", report.summary());

    Ok(())
}
