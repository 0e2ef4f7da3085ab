// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Continue-scanning safety check.
//!
//! Same decision as [`RestartScan`](super::RestartScan), different
//! tie-break: after a process finishes the pass continues with the next
//! index instead of jumping back to 0. A new pass begins at 0 whenever the
//! previous one made progress. This reproduces the order found in most
//! textbooks (`[1, 3, 4, 0, 2]` for the classic 5×3 example).

use super::{SafetyChecker, SafetyVerdict, Scan};
use crate::AllocationState;

/// Pass-based scan that keeps going after each release.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueScan;

impl ContinueScan {
    pub fn new() -> Self {
        Self
    }
}

impl SafetyChecker for ContinueScan {
    fn name(&self) -> &str {
        "continue-scan"
    }

    fn check(&self, state: &AllocationState) -> SafetyVerdict {
        let mut scan = Scan::new(state);
        let n = scan.num_processes();

        while !scan.is_complete() {
            let mut progressed = false;
            for pid in 0..n {
                if scan.can_finish(pid) {
                    scan.finish(pid);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        scan.into_verdict()
    }
}
