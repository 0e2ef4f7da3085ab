// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scenario run reports.
//!
//! A [`ScenarioReport`] records what happened to each step, plus the final
//! state and request statistics. It serialises to JSON for tooling and has
//! a one-line [`summary`](ScenarioReport::summary) for the CLI.

use crate::config::Action;
use banker::{
    AllocationState, RejectionKind, RequestStats, ResourceVector, SafeSequence, SafetyVerdict,
};
use std::time::Duration;

/// What happened to a single step.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The request was committed; `sequence` proves the new state safe.
    Granted { sequence: SafeSequence },
    /// A release or finish returned `resources` to the pool.
    Released { resources: ResourceVector },
    /// The step was rejected and the state left unchanged.
    Rejected { kind: RejectionKind, message: String },
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The safe sequence of a granted request.
    pub fn sequence(&self) -> Option<&SafeSequence> {
        match self {
            Self::Granted { sequence } => Some(sequence),
            _ => None,
        }
    }
}

/// Record of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub action: Action,
    pub pid: i64,
    pub resources: Vec<i64>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Result of running a full scenario.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub checker: String,
    /// Safety of the initial state, before any step ran.
    pub initial_verdict: SafetyVerdict,
    pub steps: Vec<StepRecord>,
    pub final_state: AllocationState,
    pub stats: RequestStats,
    /// Wall-clock time spent executing steps.
    pub elapsed: Duration,
}

impl ScenarioReport {
    pub fn granted(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, Outcome::Granted { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_rejected()).count()
    }

    /// Number of rejected steps of the given kind.
    pub fn rejected_with(&self, kind: RejectionKind) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(&s.outcome, Outcome::Rejected { kind: k, .. } if *k == kind))
            .count()
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Scenario '{}' ({}): {} steps, {} granted, {} rejected, \
             initial state {}, final available {}, {:.3}ms",
            self.name,
            self.checker,
            self.steps.len(),
            self.granted(),
            self.rejected(),
            if self.initial_verdict.is_safe() { "safe" } else { "UNSAFE" },
            self.final_state.available(),
            self.elapsed.as_secs_f64() * 1000.0,
        )
    }
}
