// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sequential scenario execution.
//!
//! The runner submits each step to a [`RequestProcessor`] once, in order,
//! and records the outcome. Rejections are recorded and the run continues;
//! only a malformed initial state or an unknown checker aborts the run.

use crate::config::{Action, ScenarioConfig, Step};
use crate::report::{Outcome, ScenarioReport, StepRecord};
use crate::ScenarioError;
use banker::{RequestError, RequestProcessor, ResourceVector};
use std::time::Instant;

/// Executes scenarios step by step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioRunner;

impl ScenarioRunner {
    pub fn new() -> Self {
        Self
    }

    /// Builds the processor described by `config` and runs all its steps.
    pub fn run(&self, config: &ScenarioConfig) -> Result<ScenarioReport, ScenarioError> {
        let mut processor = config.build_processor()?;
        tracing::info!(
            "scenario '{}': {} processes, {} resource classes, checker '{}'",
            config.display_name(),
            processor.state().num_processes(),
            processor.state().num_resources(),
            processor.checker_name(),
        );

        let initial_verdict = processor.check_safety();
        if !initial_verdict.is_safe() {
            tracing::warn!("initial state is unsafe: {initial_verdict:?}");
        }

        let start = Instant::now();
        let steps = self.run_steps(&mut processor, &config.steps);
        let elapsed = start.elapsed();

        let report = ScenarioReport {
            name: config.display_name().to_string(),
            checker: processor.checker_name().to_string(),
            initial_verdict,
            steps,
            stats: processor.stats().clone(),
            final_state: processor.into_state(),
            elapsed,
        };
        tracing::info!("{}", report.summary());
        Ok(report)
    }

    /// Runs `steps` against an existing processor.
    pub fn run_steps(&self, processor: &mut RequestProcessor, steps: &[Step]) -> Vec<StepRecord> {
        steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let outcome = match execute(processor, step) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::info!("step {index} rejected ({}): {e}", e.kind());
                        Outcome::Rejected {
                            kind: e.kind(),
                            message: e.to_string(),
                        }
                    }
                };
                tracing::debug!("step {index}: {:?} P{} -> {outcome:?}", step.action, step.pid);
                StepRecord {
                    index,
                    action: step.action,
                    pid: step.pid,
                    resources: step.resources.clone(),
                    outcome,
                }
            })
            .collect()
    }
}

fn execute(processor: &mut RequestProcessor, step: &Step) -> Result<Outcome, RequestError> {
    match step.action {
        Action::Request => {
            let grant = processor.submit_signed(step.pid, &step.resources)?;
            Ok(Outcome::Granted {
                sequence: grant.sequence,
            })
        }
        Action::Release => {
            processor.release_signed(step.pid, &step.resources)?;
            Ok(Outcome::Released {
                resources: ResourceVector::from_signed(&step.resources)?,
            })
        }
        Action::Finish => {
            let resources = processor.finish_signed(step.pid)?;
            Ok(Outcome::Released { resources })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker::RejectionKind;

    #[test]
    fn test_textbook_run() {
        let report = ScenarioRunner::new().run(&ScenarioConfig::textbook()).unwrap();

        assert!(report.initial_verdict.is_safe());
        assert_eq!(report.steps.len(), 6);

        assert_eq!(report.steps[0].outcome.sequence().unwrap().as_slice(), &[1, 3, 0, 2, 4]);
        assert!(matches!(
            report.steps[1].outcome,
            Outcome::Rejected { kind: RejectionKind::InsufficientResources, .. }
        ));
        assert!(matches!(
            report.steps[2].outcome,
            Outcome::Rejected { kind: RejectionKind::WouldCauseUnsafeState, .. }
        ));
        assert!(matches!(
            report.steps[3].outcome,
            Outcome::Rejected { kind: RejectionKind::ExceedsDeclaredNeed, .. }
        ));
        assert_eq!(
            report.steps[4].outcome,
            Outcome::Released {
                resources: ResourceVector::from_slice(&[3, 0, 2])
            }
        );
        assert_eq!(report.steps[5].outcome.sequence().unwrap().as_slice(), &[4, 1, 3, 0, 2]);

        assert_eq!(report.final_state.available().as_slice(), &[2, 0, 2]);
        assert_eq!(report.stats.granted, 2);
        assert_eq!(report.granted(), 2);
        assert_eq!(report.rejected(), 3);
    }

    #[test]
    fn test_negative_inputs_are_rejections() {
        let config = ScenarioConfig {
            steps: vec![
                Step::request(-1, &[0, 0, 0]),
                Step::request(0, &[0, -2, 0]),
                Step::release(0, &[-1, 0, 0]),
            ],
            ..ScenarioConfig::textbook()
        };
        let report = ScenarioRunner::new().run(&config).unwrap();
        assert_eq!(report.rejected_with(RejectionKind::InvalidRequest), 3);
        assert_eq!(report.final_state, config.build_state().unwrap());
        assert_eq!(report.stats.rejected_invalid, 2);
        assert_eq!(report.stats.rejected_releases, 1);
        assert_eq!(
            report.stats.rejected() + report.stats.rejected_releases,
            report.rejected() as u64
        );
    }

    #[test]
    fn test_stats_agree_with_step_records() {
        let config = ScenarioConfig {
            steps: vec![
                Step::request(-1, &[0, 0, 0]),
                Step::request(0, &[0, -2, 0]),
                Step::finish(-4),
            ],
            ..ScenarioConfig::textbook()
        };
        let report = ScenarioRunner::new().run(&config).unwrap();
        assert_eq!(report.stats.total_requests, 2);
        assert_eq!(report.stats.rejected(), 2);
        assert_eq!(report.stats.rejected_releases, 1);
        assert_eq!(report.rejected(), 3);
    }

    #[test]
    fn test_release_step() {
        let config = ScenarioConfig {
            steps: vec![Step::release(2, &[1, 0, 2]), Step::release(2, &[5, 0, 0])],
            ..ScenarioConfig::textbook()
        };
        let report = ScenarioRunner::new().run(&config).unwrap();
        assert_eq!(
            report.steps[0].outcome,
            Outcome::Released {
                resources: ResourceVector::from_slice(&[1, 0, 2])
            }
        );
        assert!(matches!(
            report.steps[1].outcome,
            Outcome::Rejected { kind: RejectionKind::ExceedsAllocation, .. }
        ));
        assert_eq!(report.final_state.allocated(2).as_slice(), &[2, 0, 0]);
    }

    #[test]
    fn test_construction_error_aborts() {
        let config = ScenarioConfig {
            available: vec![1, 1],
            ..ScenarioConfig::textbook()
        };
        assert!(matches!(
            ScenarioRunner::new().run(&config),
            Err(ScenarioError::State(banker::StateError::DimensionMismatch { .. }))
        ));
    }
}
