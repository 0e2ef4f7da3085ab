// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Concurrent stress driver.
//!
//! Spawns `workers` blocking tasks on the tokio runtime. Each worker is
//! bound to process `worker % n` and, for `rounds` iterations, requests one
//! unit of a rotating resource class and immediately releases it again if
//! the request was granted. All workers share one [`SharedProcessor`], so
//! every request is evaluated under its lock.
//!
//! After all workers finish, the driver checks that resources were
//! conserved, the need invariant holds, and the final state is safe.

use crate::ScenarioError;
use banker::{RequestStats, ResourceVector, SharedProcessor};
use std::time::{Duration, Instant};

/// Parameters for a stress run.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct StressConfig {
    pub workers: usize,
    pub rounds: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            rounds: 1_000,
        }
    }
}

/// Outcome of a stress run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StressReport {
    pub workers: usize,
    pub rounds: usize,
    /// Processor statistics accumulated during the run.
    pub stats: RequestStats,
    /// System totals before and after (always equal on success).
    pub total: ResourceVector,
    pub elapsed: Duration,
}

impl StressReport {
    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Stress: {} workers x {} rounds in {:.2}ms, total {} conserved; {}",
            self.workers,
            self.rounds,
            self.elapsed.as_secs_f64() * 1000.0,
            self.total,
            self.stats.summary(),
        )
    }
}

/// Unit request for resource class `j` out of `m`.
fn unit(m: usize, j: usize) -> ResourceVector {
    let mut values = vec![0; m];
    if m > 0 {
        values[j % m] = 1;
    }
    ResourceVector::new(values)
}

/// Runs the stress workload against `processor`.
pub async fn run(
    processor: SharedProcessor,
    config: StressConfig,
) -> Result<StressReport, ScenarioError> {
    let initial = processor.snapshot();
    let n = initial.num_processes();
    let m = initial.num_resources();
    let total = initial.total();

    if n == 0 {
        return Err(ScenarioError::Config(
            "stress run needs at least one process".into(),
        ));
    }
    if !processor.check_safety().is_safe() {
        return Err(ScenarioError::Config(
            "stress run needs a safe initial state".into(),
        ));
    }

    tracing::info!(
        "stress: {} workers x {} rounds over {n} processes and {m} resource classes",
        config.workers,
        config.rounds,
    );

    let start = Instant::now();
    let handles: Vec<_> = (0..config.workers)
        .map(|worker| {
            let processor = processor.clone();
            let rounds = config.rounds;
            tokio::task::spawn_blocking(move || -> Result<(), ScenarioError> {
                let pid = worker % n;
                for round in 0..rounds {
                    let request = unit(m, worker + round);
                    if processor.submit(pid, &request).is_ok() {
                        processor.release(pid, &request)?;
                    }
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .await
            .map_err(|e| ScenarioError::Worker(e.to_string()))??;
    }
    let elapsed = start.elapsed();

    let end = processor.snapshot();
    if end.total() != total {
        return Err(ScenarioError::InvariantViolation(format!(
            "total changed from {total} to {}",
            end.total()
        )));
    }
    end.check_invariants()
        .map_err(|e| ScenarioError::InvariantViolation(e.to_string()))?;
    if !processor.check_safety().is_safe() {
        return Err(ScenarioError::InvariantViolation(
            "final state is unsafe".into(),
        ));
    }

    let report = StressReport {
        workers: config.workers,
        rounds: config.rounds,
        stats: processor.stats(),
        total,
        elapsed,
    };
    tracing::info!("{}", report.summary());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_vector() {
        assert_eq!(unit(3, 4).as_slice(), &[0, 1, 0]);
        assert!(unit(0, 2).is_empty());
    }

    #[test]
    fn test_default_config() {
        let c = StressConfig::default();
        assert_eq!(c.workers, 8);
        assert_eq!(c.rounds, 1_000);
    }
}
