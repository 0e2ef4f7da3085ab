// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`SafetyChecker`] trait and checker implementations.
//!
//! A state is *safe* when there is an order in which every process can
//! obtain its remaining need from the free pool, finish, and hand its
//! allocation back. Checkers differ only in tie-breaking, i.e. in which of
//! several valid orders they report.
//!
//! | Checker | After a release | Textbook order |
//! |---|---|---|
//! | [`RestartScan`] | rescan from process 0 | `[1, 3, 0, 2, 4]` |
//! | [`ContinueScan`] | continue from the next index | `[1, 3, 4, 0, 2]` |

pub mod continue_scan;
pub mod restart;

use crate::{AllocationState, ProcessId, ResourceVector};
use std::fmt;

pub use continue_scan::ContinueScan;
pub use restart::RestartScan;

/// Trait for safety checkers.
///
/// Checkers are pure: no I/O, no randomness, and identical input always
/// yields an identical verdict.
pub trait SafetyChecker: Send + Sync {
    /// Human-readable name of this checker.
    fn name(&self) -> &str;

    /// Decides whether `state` is safe.
    fn check(&self, state: &AllocationState) -> SafetyVerdict;

    /// `(is_safe, safe_sequence)` view of [`check`](Self::check).
    fn is_safe(&self, state: &AllocationState) -> (bool, Option<SafeSequence>) {
        self.check(state).into_parts()
    }
}

/// Looks up a checker by its configuration name.
///
/// Accepts `"restart-scan"` (or `"restart"`) and `"continue-scan"`
/// (or `"continue"`), case-insensitively.
pub fn checker_by_name(name: &str) -> Option<Box<dyn SafetyChecker>> {
    match name.to_lowercase().as_str() {
        "restart-scan" | "restart" => Some(Box::new(RestartScan::new())),
        "continue-scan" | "continue" => Some(Box::new(ContinueScan::new())),
        _ => None,
    }
}

/// An order in which all processes can run to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct SafeSequence(Vec<ProcessId>);

impl SafeSequence {
    pub fn as_slice(&self) -> &[ProcessId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessId> {
        self.0.iter()
    }

    /// Whether this sequence lists each of `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.0.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &pid in &self.0 {
            if pid >= n || seen[pid] {
                return false;
            }
            seen[pid] = true;
        }
        true
    }

    pub fn into_inner(self) -> Vec<ProcessId> {
        self.0
    }
}

impl fmt::Display for SafeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<empty>");
        }
        for (k, pid) in self.0.iter().enumerate() {
            if k > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "P{pid}")?;
        }
        Ok(())
    }
}

/// Outcome of a safety check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SafetyVerdict {
    /// Every process can finish, in this order.
    Safe { sequence: SafeSequence },
    /// The scan stalled: `finished` could complete, `blocked` could not.
    Unsafe {
        finished: Vec<ProcessId>,
        blocked: Vec<ProcessId>,
    },
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe { .. })
    }

    pub fn sequence(&self) -> Option<&SafeSequence> {
        match self {
            Self::Safe { sequence } => Some(sequence),
            Self::Unsafe { .. } => None,
        }
    }

    pub fn into_parts(self) -> (bool, Option<SafeSequence>) {
        match self {
            Self::Safe { sequence } => (true, Some(sequence)),
            Self::Unsafe { .. } => (false, None),
        }
    }
}

/// Shared bookkeeping for the scan-based checkers: the `work` vector, the
/// `finish` flags and the order in which processes completed.
pub(crate) struct Scan<'a> {
    state: &'a AllocationState,
    work: ResourceVector,
    finished: Vec<bool>,
    order: Vec<ProcessId>,
}

impl<'a> Scan<'a> {
    pub(crate) fn new(state: &'a AllocationState) -> Self {
        let n = state.num_processes();
        Self {
            state,
            work: state.available().clone(),
            finished: vec![false; n],
            order: Vec::with_capacity(n),
        }
    }

    pub(crate) fn num_processes(&self) -> usize {
        self.finished.len()
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.order.len() == self.finished.len()
    }

    /// Whether unfinished process `pid` can obtain its full need from `work`.
    pub(crate) fn can_finish(&self, pid: ProcessId) -> bool {
        !self.finished[pid] && self.state.need(pid).fits_within(&self.work)
    }

    /// Lets `pid` run to completion and return its allocation to `work`.
    pub(crate) fn finish(&mut self, pid: ProcessId) {
        self.work.add_assign(self.state.allocated(pid));
        self.finished[pid] = true;
        self.order.push(pid);
        tracing::trace!("safety scan: P{pid} finishes, work = {}", self.work);
    }

    pub(crate) fn into_verdict(self) -> SafetyVerdict {
        if self.is_complete() {
            SafetyVerdict::Safe {
                sequence: SafeSequence(self.order),
            }
        } else {
            let blocked = self
                .finished
                .iter()
                .enumerate()
                .filter(|(_, &done)| !done)
                .map(|(pid, _)| pid)
                .collect();
            SafetyVerdict::Unsafe {
                finished: self.order,
                blocked,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_by_name() {
        assert_eq!(checker_by_name("restart-scan").unwrap().name(), "restart-scan");
        assert_eq!(checker_by_name("Continue").unwrap().name(), "continue-scan");
        assert!(checker_by_name("bogus").is_none());
    }

    #[test]
    fn test_is_permutation_of() {
        assert!(SafeSequence(vec![1, 3, 0, 2, 4]).is_permutation_of(5));
        assert!(!SafeSequence(vec![1, 1, 0, 2, 4]).is_permutation_of(5));
        assert!(!SafeSequence(vec![1, 3, 0, 2]).is_permutation_of(5));
        assert!(!SafeSequence(vec![0, 5]).is_permutation_of(2));
        assert!(SafeSequence::default().is_permutation_of(0));
    }

    #[test]
    fn test_sequence_display() {
        assert_eq!(SafeSequence(vec![1, 3, 0]).to_string(), "P1 -> P3 -> P0");
        assert_eq!(SafeSequence::default().to_string(), "<empty>");
    }

    #[test]
    fn test_verdict_parts() {
        let safe = SafetyVerdict::Safe {
            sequence: SafeSequence(vec![0]),
        };
        assert!(safe.is_safe());
        assert_eq!(safe.into_parts(), (true, Some(SafeSequence(vec![0]))));

        let unsafe_ = SafetyVerdict::Unsafe {
            finished: vec![],
            blocked: vec![0],
        };
        assert!(unsafe_.sequence().is_none());
        assert_eq!(unsafe_.into_parts(), (false, None));
    }

    #[test]
    fn test_verdict_serialises_with_tag() {
        let v = SafetyVerdict::Safe {
            sequence: SafeSequence(vec![1, 0]),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["verdict"], "safe");
        assert_eq!(json["sequence"], serde_json::json!([1, 0]));
    }
}
