// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Restart-from-zero safety scan.
//!
//! The canonical checker. Processes are tested in ascending index order;
//! the first one whose need fits in `work` finishes, and the scan starts
//! over at index 0, because the released allocation may unblock a
//! lower-indexed process that failed earlier. The check is unsafe as soon
//! as a full pass finds nobody who can finish.
//!
//! Worst case O(n² · m): up to `n` successful passes, each testing up to
//! `n` processes over `m` resource classes.

use super::{SafetyChecker, SafetyVerdict, Scan};
use crate::AllocationState;

/// Ascending-index scan that restarts from process 0 after every release.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestartScan;

impl RestartScan {
    pub fn new() -> Self {
        Self
    }
}

impl SafetyChecker for RestartScan {
    fn name(&self) -> &str {
        "restart-scan"
    }

    fn check(&self, state: &AllocationState) -> SafetyVerdict {
        let mut scan = Scan::new(state);
        let n = scan.num_processes();

        while !scan.is_complete() {
            match (0..n).find(|&pid| scan.can_finish(pid)) {
                Some(pid) => scan.finish(pid),
                None => break,
            }
        }

        scan.into_verdict()
    }
}
