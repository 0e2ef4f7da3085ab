// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The authoritative allocation snapshot.
//!
//! [`AllocationState`] holds the Max, Allocation, Need and Available
//! matrices for `n` processes over `m` resource classes. It upholds two
//! invariants for its whole lifetime:
//!
//! - `need[i] == max[i] - allocated[i]` for every process `i`;
//! - `available[j] + Σ allocated[i][j]` is the same total for every class `j`.
//!
//! Need is always derived, never accepted as input. The only ways to move
//! from one state to another are the crate-private `tentative_*` builders
//! (which return a fresh value) followed by `commit`.

use crate::{ProcessId, ResourceVector, StateError};

/// Max/Allocation/Need/Available for a fixed set of processes and resources.
///
/// # Example
/// ```
/// use banker::AllocationState;
///
/// let state = AllocationState::from_rows(
///     &[vec![7, 5, 3], vec![3, 2, 2]],
///     &[vec![0, 1, 0], vec![2, 0, 0]],
///     &[3, 3, 2],
/// )
/// .unwrap();
///
/// assert_eq!(state.num_processes(), 2);
/// assert_eq!(state.need(0).as_slice(), &[7, 4, 3]);
/// assert_eq!(state.total().as_slice(), &[5, 4, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AllocationState {
    max: Vec<ResourceVector>,
    allocated: Vec<ResourceVector>,
    need: Vec<ResourceVector>,
    available: ResourceVector,
}

impl AllocationState {
    /// Builds a state from the declared maxima, current allocations and
    /// free resources. `m` is taken from `available.len()`.
    ///
    /// # Errors
    /// - [`StateError::DimensionMismatch`] if the row counts of `max` and
    ///   `allocated` differ or any row is not of length `m`.
    /// - [`StateError::NegativeNeed`] if any allocation exceeds its maximum.
    /// - [`StateError::CapacityOverflow`] if a system total exceeds `u32::MAX`.
    pub fn new(
        max: Vec<ResourceVector>,
        allocated: Vec<ResourceVector>,
        available: ResourceVector,
    ) -> Result<Self, StateError> {
        let m = available.len();
        let n = max.len();

        if allocated.len() != n {
            return Err(StateError::DimensionMismatch {
                what: "allocation matrix rows".into(),
                expected: n,
                found: allocated.len(),
            });
        }
        check_row_lengths("max", &max, m)?;
        check_row_lengths("allocation", &allocated, m)?;

        let mut need = Vec::with_capacity(n);
        for (pid, (max_row, alloc_row)) in max.iter().zip(allocated.iter()).enumerate() {
            if let Some(resource) = alloc_row.first_exceeding(max_row) {
                return Err(StateError::NegativeNeed {
                    pid,
                    resource,
                    max: max_row.as_slice()[resource],
                    allocated: alloc_row.as_slice()[resource],
                });
            }
            need.push(max_row.minus(alloc_row));
        }

        for resource in 0..m {
            let total = available.as_slice()[resource] as u64
                + allocated
                    .iter()
                    .map(|row| row.as_slice()[resource] as u64)
                    .sum::<u64>();
            if total > u32::MAX as u64 {
                return Err(StateError::CapacityOverflow { resource, total });
            }
        }

        Ok(Self {
            max,
            allocated,
            need,
            available,
        })
    }

    /// Convenience constructor from plain rows.
    pub fn from_rows(
        max: &[Vec<u32>],
        allocated: &[Vec<u32>],
        available: &[u32],
    ) -> Result<Self, StateError> {
        Self::new(
            max.iter().map(|r| ResourceVector::from_slice(r)).collect(),
            allocated.iter().map(|r| ResourceVector::from_slice(r)).collect(),
            ResourceVector::from_slice(available),
        )
    }

    /// Number of processes (`n`).
    pub fn num_processes(&self) -> usize {
        self.max.len()
    }

    /// Number of resource classes (`m`).
    pub fn num_resources(&self) -> usize {
        self.available.len()
    }

    /// Declared maximum of process `pid`.
    ///
    /// # Panics
    /// Panics if `pid >= num_processes()`.
    pub fn max(&self, pid: ProcessId) -> &ResourceVector {
        &self.max[pid]
    }

    /// Current allocation of process `pid`.
    ///
    /// # Panics
    /// Panics if `pid >= num_processes()`.
    pub fn allocated(&self, pid: ProcessId) -> &ResourceVector {
        &self.allocated[pid]
    }

    /// Remaining need of process `pid` (`max - allocated`).
    ///
    /// # Panics
    /// Panics if `pid >= num_processes()`.
    pub fn need(&self, pid: ProcessId) -> &ResourceVector {
        &self.need[pid]
    }

    /// Free resources.
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    pub fn max_rows(&self) -> &[ResourceVector] {
        &self.max
    }

    pub fn allocated_rows(&self) -> &[ResourceVector] {
        &self.allocated
    }

    pub fn need_rows(&self) -> &[ResourceVector] {
        &self.need
    }

    /// Whether `pid` names a process in this state.
    pub fn contains(&self, pid: ProcessId) -> bool {
        pid < self.num_processes()
    }

    /// System-wide total per resource class: `available + Σ allocated`.
    ///
    /// Never stored; recomputed on demand. Conservation means this value is
    /// the same for every state reachable from the initial one.
    pub fn total(&self) -> ResourceVector {
        self.allocated
            .iter()
            .fold(self.available.clone(), |acc, row| acc.plus(row))
    }

    /// Re-verifies shape and the need invariant.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        let m = self.num_resources();
        let n = self.num_processes();
        for (what, rows) in [("allocation", &self.allocated), ("need", &self.need)] {
            if rows.len() != n {
                return Err(StateError::DimensionMismatch {
                    what: format!("{what} matrix rows"),
                    expected: n,
                    found: rows.len(),
                });
            }
        }
        check_row_lengths("max", &self.max, m)?;
        check_row_lengths("allocation", &self.allocated, m)?;
        check_row_lengths("need", &self.need, m)?;

        for pid in 0..n {
            if let Some(resource) = self.allocated[pid].first_exceeding(&self.max[pid]) {
                return Err(StateError::NegativeNeed {
                    pid,
                    resource,
                    max: self.max[pid].as_slice()[resource],
                    allocated: self.allocated[pid].as_slice()[resource],
                });
            }
            let derived = self.max[pid].minus(&self.allocated[pid]);
            if let Some(resource) = derived
                .iter()
                .zip(self.need[pid].iter())
                .position(|(d, s)| d != s)
            {
                return Err(StateError::NeedOutOfSync {
                    pid,
                    resource,
                    expected: derived.as_slice()[resource],
                    found: self.need[pid].as_slice()[resource],
                });
            }
        }
        Ok(())
    }

    /// Candidate state after granting `request` to `pid`.
    ///
    /// Pure: `self` is not touched. The caller must already have checked
    /// `request <= need[pid]` and `request <= available`.
    pub(crate) fn tentative_apply(&self, pid: ProcessId, request: &ResourceVector) -> Self {
        debug_assert!(request.fits_within(&self.need[pid]));
        debug_assert!(request.fits_within(&self.available));

        let mut next = self.clone();
        next.available = self.available.minus(request);
        next.allocated[pid] = self.allocated[pid].plus(request);
        next.need[pid] = self.need[pid].minus(request);
        next
    }

    /// Candidate state after `pid` hands `release` back to the pool.
    ///
    /// The caller must already have checked `release <= allocated[pid]`.
    pub(crate) fn tentative_release(&self, pid: ProcessId, release: &ResourceVector) -> Self {
        debug_assert!(release.fits_within(&self.allocated[pid]));

        let mut next = self.clone();
        next.available = self.available.plus(release);
        next.allocated[pid] = self.allocated[pid].minus(release);
        next.need[pid] = self.need[pid].plus(release);
        next
    }

    /// Replaces the live state with a checked candidate.
    pub(crate) fn commit(&mut self, tentative: AllocationState) {
        debug_assert_eq!(self.total(), tentative.total(), "commit must conserve resources");
        debug_assert_eq!(self.max, tentative.max, "max is immutable");
        *self = tentative;
    }
}

fn check_row_lengths(what: &str, rows: &[ResourceVector], m: usize) -> Result<(), StateError> {
    match rows.iter().enumerate().find(|(_, row)| row.len() != m) {
        Some((pid, row)) => Err(StateError::DimensionMismatch {
            what: format!("{what} row {pid}"),
            expected: m,
            found: row.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> AllocationState {
        AllocationState::from_rows(
            &[
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            &[
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
            &[3, 3, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_need_is_derived() {
        let s = textbook();
        assert_eq!(s.need(0).as_slice(), &[7, 4, 3]);
        assert_eq!(s.need(1).as_slice(), &[1, 2, 2]);
        assert_eq!(s.need(2).as_slice(), &[6, 0, 0]);
        assert_eq!(s.need(3).as_slice(), &[0, 1, 1]);
        assert_eq!(s.need(4).as_slice(), &[4, 3, 1]);
        s.check_invariants().unwrap();
    }

    #[test]
    fn test_need_out_of_sync_detected() {
        let mut s = textbook();
        s.need[4] = ResourceVector::from_slice(&[4, 3, 0]);
        assert_eq!(
            s.check_invariants().unwrap_err(),
            StateError::NeedOutOfSync {
                pid: 4,
                resource: 2,
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn test_total() {
        assert_eq!(textbook().total().as_slice(), &[10, 5, 7]);
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = AllocationState::from_rows(&[vec![1], vec![1]], &[vec![0]], &[1]).unwrap_err();
        assert!(matches!(
            err,
            StateError::DimensionMismatch { expected: 2, found: 1, .. }
        ));
    }

    #[test]
    fn test_row_length_mismatch() {
        let err =
            AllocationState::from_rows(&[vec![1, 1]], &[vec![0, 0, 0]], &[1, 1]).unwrap_err();
        match err {
            StateError::DimensionMismatch { what, expected, found } => {
                assert!(what.contains("allocation row 0"));
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_available_length_defines_m() {
        let err = AllocationState::from_rows(&[vec![1, 1]], &[vec![0, 0]], &[1]).unwrap_err();
        assert!(matches!(err, StateError::DimensionMismatch { expected: 1, found: 2, .. }));
    }

    #[test]
    fn test_negative_need() {
        let err = AllocationState::from_rows(&[vec![2, 2]], &[vec![1, 3]], &[0, 0]).unwrap_err();
        assert_eq!(
            err,
            StateError::NegativeNeed {
                pid: 0,
                resource: 1,
                max: 2,
                allocated: 3
            }
        );
    }

    #[test]
    fn test_capacity_overflow() {
        let err = AllocationState::from_rows(
            &[vec![u32::MAX], vec![u32::MAX]],
            &[vec![u32::MAX], vec![1]],
            &[0],
        )
        .unwrap_err();
        assert!(matches!(err, StateError::CapacityOverflow { resource: 0, .. }));
    }

    #[test]
    fn test_empty_state() {
        let s = AllocationState::from_rows(&[], &[], &[]).unwrap();
        assert_eq!(s.num_processes(), 0);
        assert_eq!(s.num_resources(), 0);
        assert!(s.total().is_empty());
    }

    #[test]
    fn test_tentative_apply_is_pure() {
        let s = textbook();
        let before = s.clone();
        let next = s.tentative_apply(1, &ResourceVector::from_slice(&[1, 0, 2]));

        assert_eq!(s, before);
        assert_eq!(next.available().as_slice(), &[2, 3, 0]);
        assert_eq!(next.allocated(1).as_slice(), &[3, 0, 2]);
        assert_eq!(next.need(1).as_slice(), &[0, 2, 0]);
        assert_eq!(next.total(), s.total());
        next.check_invariants().unwrap();
    }

    #[test]
    fn test_tentative_release_inverts_apply() {
        let s = textbook();
        let r = ResourceVector::from_slice(&[1, 0, 2]);
        let back = s.tentative_apply(1, &r).tentative_release(1, &r);
        assert_eq!(back, s);
    }

    #[test]
    fn test_commit_replaces_state() {
        let mut s = textbook();
        let next = s.tentative_apply(3, &ResourceVector::from_slice(&[0, 1, 1]));
        s.commit(next.clone());
        assert_eq!(s, next);
        assert!(s.need(3).is_zero());
    }

    #[test]
    fn test_serialize_includes_need() {
        let json = serde_json::to_value(textbook()).unwrap();
        assert_eq!(json["need"][0], serde_json::json!([7, 4, 3]));
        assert_eq!(json["available"], serde_json::json!([3, 3, 2]));
    }
}
