// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # scenario
//!
//! Drives the `banker` engine from the outside: scripted scenario files,
//! a step-by-step runner, and a concurrent stress driver.
//!
//! The scenario layer holds no allocation logic of its own. Each step is a
//! single call into [`banker::RequestProcessor`]; the runner records what
//! came back.
//!
//! # Example
//! ```
//! use scenario::{ScenarioConfig, ScenarioRunner};
//!
//! let report = ScenarioRunner::new().run(&ScenarioConfig::textbook()).unwrap();
//! assert_eq!(report.granted(), 2);
//! println!("{}", report.summary());
//! ```

mod config;
mod error;
mod report;
mod runner;
pub mod stress;

pub use config::{Action, ScenarioConfig, Step};
pub use error::ScenarioError;
pub use report::{Outcome, ScenarioReport, StepRecord};
pub use runner::ScenarioRunner;
pub use stress::{StressConfig, StressReport};
