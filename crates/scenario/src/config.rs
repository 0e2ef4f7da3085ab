// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scenario files: an initial allocation state plus a list of steps.
//!
//! # TOML Format
//! ```toml
//! name = "textbook"
//! checker = "restart-scan"
//! available = [3, 3, 2]
//! max = [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]
//! allocated = [[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]
//!
//! [[steps]]
//! action = "request"
//! pid = 1
//! resources = [1, 0, 2]
//!
//! [[steps]]
//! action = "finish"
//! pid = 1
//! ```
//!
//! Counts are read as signed integers so that a negative entry is reported
//! as a rejected request (or a configuration error for the initial
//! matrices) instead of a parse failure.

use crate::ScenarioError;
use banker::{checker_by_name, AllocationState, RequestProcessor, ResourceVector};
use std::path::Path;

/// What a step asks the processor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Request `resources` for `pid`.
    Request,
    /// Return `resources` held by `pid`.
    Release,
    /// `pid` completes and returns everything it holds.
    Finish,
}

/// One scripted operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    pub action: Action,
    pub pid: i64,
    /// Ignored for [`Action::Finish`].
    #[serde(default)]
    pub resources: Vec<i64>,
}

impl Step {
    pub fn request(pid: i64, resources: &[i64]) -> Self {
        Self {
            action: Action::Request,
            pid,
            resources: resources.to_vec(),
        }
    }

    pub fn release(pid: i64, resources: &[i64]) -> Self {
        Self {
            action: Action::Release,
            pid,
            resources: resources.to_vec(),
        }
    }

    pub fn finish(pid: i64) -> Self {
        Self {
            action: Action::Finish,
            pid,
            resources: Vec::new(),
        }
    }
}

/// A complete scenario: initial matrices, checker choice and steps.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioConfig {
    /// Optional label used in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Safety checker name: `"restart-scan"` or `"continue-scan"`.
    #[serde(default = "default_checker")]
    pub checker: String,
    /// Free resources per class; its length fixes the number of classes.
    pub available: Vec<i64>,
    /// Declared maximum per process.
    pub max: Vec<Vec<i64>>,
    /// Current allocation per process.
    pub allocated: Vec<Vec<i64>>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_checker() -> String {
    "restart-scan".to_string()
}

impl ScenarioConfig {
    /// Loads a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScenarioError::Config(format!("cannot read scenario '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses a scenario from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ScenarioError> {
        toml::from_str(toml_str)
            .map_err(|e| ScenarioError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises the scenario to TOML.
    pub fn to_toml(&self) -> Result<String, ScenarioError> {
        toml::to_string_pretty(self)
            .map_err(|e| ScenarioError::Config(format!("TOML serialise error: {e}")))
    }

    /// Display name, falling back to `"unnamed"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Builds the initial [`AllocationState`].
    pub fn build_state(&self) -> Result<AllocationState, ScenarioError> {
        let available = to_vector("available", &self.available)?;
        let max = self
            .max
            .iter()
            .enumerate()
            .map(|(i, row)| to_vector(&format!("max[{i}]"), row))
            .collect::<Result<Vec<_>, _>>()?;
        let allocated = self
            .allocated
            .iter()
            .enumerate()
            .map(|(i, row)| to_vector(&format!("allocated[{i}]"), row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AllocationState::new(max, allocated, available)?)
    }

    /// Builds a processor over the initial state with the configured checker.
    pub fn build_processor(&self) -> Result<RequestProcessor, ScenarioError> {
        let checker = checker_by_name(&self.checker).ok_or_else(|| {
            ScenarioError::Config(format!(
                "unknown checker '{}'; expected 'restart-scan' or 'continue-scan'",
                self.checker
            ))
        })?;
        Ok(RequestProcessor::with_checker(self.build_state()?, checker))
    }

    /// The classic five-process, three-resource example.
    ///
    /// Steps cover one grant, each kind of rejection, a completion, and a
    /// request that only becomes safe after that completion.
    pub fn textbook() -> Self {
        Self {
            name: Some("textbook".to_string()),
            checker: default_checker(),
            available: vec![3, 3, 2],
            max: vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            allocated: vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
            steps: vec![
                Step::request(1, &[1, 0, 2]),
                Step::request(4, &[3, 3, 0]),
                Step::request(0, &[0, 2, 0]),
                Step::request(0, &[8, 0, 0]),
                Step::finish(1),
                Step::request(4, &[3, 3, 0]),
            ],
        }
    }
}

fn to_vector(what: &str, values: &[i64]) -> Result<ResourceVector, ScenarioError> {
    ResourceVector::from_signed(values).map_err(|e| ScenarioError::Config(format!("{what}: {e}")))
}
