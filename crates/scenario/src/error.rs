// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for scenario loading and execution.

/// Errors that can occur while loading or running a scenario.
///
/// Request rejections during a scenario run are *not* errors: they are
/// recorded in the report. Only problems that prevent the run from
/// happening, or that indicate a broken invariant, surface here.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The scenario file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The initial matrices are malformed.
    #[error("invalid initial state: {0}")]
    State(#[from] banker::StateError),

    /// A request that should always succeed was rejected.
    #[error("unexpected rejection: {0}")]
    Request(#[from] banker::RequestError),

    /// A post-run check found a broken invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A stress worker panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}
