// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Request validation, tentative application and commit.
//!
//! Every request goes through the same state machine:
//!
//! ```text
//! validate shape ──► validate need ──► validate available
//!       │                  │                   │
//!  InvalidRequest   ExceedsDeclaredNeed  InsufficientResources
//!                                              │
//!                               tentative_apply + safety check
//!                                      │               │
//!                                    safe           unsafe
//!                                      │               │
//!                                   commit   WouldCauseUnsafeState
//! ```
//!
//! The candidate state is a separate value. It is either moved into the live
//! slot in one assignment or dropped, so a rejected request leaves the live
//! state exactly as it was.

use crate::safety::{RestartScan, SafeSequence, SafetyChecker, SafetyVerdict};
use crate::{AllocationState, ProcessId, RequestError, RequestStats, ResourceVector};

fn signed_pid(pid: i64) -> Result<ProcessId, RequestError> {
    ProcessId::try_from(pid).map_err(|_| RequestError::InvalidRequest {
        reason: format!("process id {pid} is negative"),
    })
}

/// A committed request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Grant {
    pub pid: ProcessId,
    pub request: ResourceVector,
    /// A completion order that proves the new state is safe.
    pub sequence: SafeSequence,
}

/// Checks the shape of a request or release against `state`.
fn validate_shape(
    state: &AllocationState,
    pid: ProcessId,
    vector: &ResourceVector,
) -> Result<(), RequestError> {
    if !state.contains(pid) {
        return Err(RequestError::InvalidRequest {
            reason: format!(
                "process {pid} does not exist ({} processes)",
                state.num_processes()
            ),
        });
    }
    if vector.len() != state.num_resources() {
        return Err(RequestError::InvalidRequest {
            reason: format!(
                "vector has {} components, expected {}",
                vector.len(),
                state.num_resources()
            ),
        });
    }
    Ok(())
}

/// Runs the three validation steps of a request, in order.
pub fn validate_request(
    state: &AllocationState,
    pid: ProcessId,
    request: &ResourceVector,
) -> Result<(), RequestError> {
    validate_shape(state, pid, request)?;

    let need = state.need(pid);
    if let Some(resource) = request.first_exceeding(need) {
        return Err(RequestError::ExceedsDeclaredNeed {
            pid,
            resource,
            requested: request.as_slice()[resource],
            need: need.as_slice()[resource],
        });
    }

    let available = state.available();
    if let Some(resource) = request.first_exceeding(available) {
        return Err(RequestError::InsufficientResources {
            pid,
            resource,
            requested: request.as_slice()[resource],
            available: available.as_slice()[resource],
        });
    }

    Ok(())
}

/// Validates a release: the process must hold at least what it returns.
pub fn validate_release(
    state: &AllocationState,
    pid: ProcessId,
    release: &ResourceVector,
) -> Result<(), RequestError> {
    validate_shape(state, pid, release)?;

    let held = state.allocated(pid);
    if let Some(resource) = release.first_exceeding(held) {
        return Err(RequestError::ExceedsAllocation {
            pid,
            resource,
            released: release.as_slice()[resource],
            held: held.as_slice()[resource],
        });
    }
    Ok(())
}

/// Evaluates a request against `state` without touching it.
///
/// Returns the state that would result from granting the request, together
/// with its safe sequence. The caller decides whether to commit it.
pub fn submit(
    state: &AllocationState,
    checker: &dyn SafetyChecker,
    pid: ProcessId,
    request: &ResourceVector,
) -> Result<(AllocationState, SafeSequence), RequestError> {
    validate_request(state, pid, request)?;
    evaluate(state, checker, pid, request)
}

/// Safety-checks the candidate state of an already validated request.
fn evaluate(
    state: &AllocationState,
    checker: &dyn SafetyChecker,
    pid: ProcessId,
    request: &ResourceVector,
) -> Result<(AllocationState, SafeSequence), RequestError> {
    let tentative = state.tentative_apply(pid, request);
    match checker.check(&tentative) {
        SafetyVerdict::Safe { sequence } => Ok((tentative, sequence)),
        SafetyVerdict::Unsafe { blocked, .. } => Err(RequestError::WouldCauseUnsafeState {
            pid,
            request: request.clone(),
            blocked,
        }),
    }
}

/// Owns the live [`AllocationState`] and the only path that mutates it.
///
/// # Example
/// ```
/// use banker::{AllocationState, RequestError, RequestProcessor, ResourceVector};
///
/// let state = AllocationState::from_rows(
///     &[vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]],
///     &[vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]],
///     &[3, 3, 2],
/// )
/// .unwrap();
/// let mut processor = RequestProcessor::new(state);
///
/// let grant = processor.submit(1, &ResourceVector::from_slice(&[1, 0, 2])).unwrap();
/// assert!(grant.sequence.is_permutation_of(5));
/// assert_eq!(processor.state().available().as_slice(), &[2, 3, 0]);
///
/// let err = processor.submit(0, &ResourceVector::from_slice(&[8, 0, 0])).unwrap_err();
/// assert!(matches!(err, RequestError::ExceedsDeclaredNeed { .. }));
/// ```
pub struct RequestProcessor {
    state: AllocationState,
    checker: Box<dyn SafetyChecker>,
    stats: RequestStats,
}

impl RequestProcessor {
    /// Creates a processor using the canonical [`RestartScan`] checker.
    pub fn new(state: AllocationState) -> Self {
        Self::with_checker(state, Box::new(RestartScan::new()))
    }

    pub fn with_checker(state: AllocationState, checker: Box<dyn SafetyChecker>) -> Self {
        Self {
            state,
            checker,
            stats: RequestStats::default(),
        }
    }

    /// Read-only view of the live state.
    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    pub fn checker_name(&self) -> &str {
        self.checker.name()
    }

    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }

    /// Consumes the processor, returning the live state.
    pub fn into_state(self) -> AllocationState {
        self.state
    }

    /// Submits a request from `pid`.
    ///
    /// On success the new state is committed and the grant carries the safe
    /// sequence that justified it. On failure nothing changes.
    pub fn submit(
        &mut self,
        pid: ProcessId,
        request: &ResourceVector,
    ) -> Result<Grant, RequestError> {
        // Validation failures never reach the checker.
        if let Err(e) = validate_request(&self.state, pid, request) {
            self.stats.record_rejection(e.kind());
            return Err(e);
        }

        self.stats.record_safety_check();
        match evaluate(&self.state, self.checker.as_ref(), pid, request) {
            Ok((tentative, sequence)) => {
                self.state.commit(tentative);
                self.stats.record_grant();
                tracing::debug!("granted {request} to P{pid}; safe sequence {sequence}");
                Ok(Grant {
                    pid,
                    request: request.clone(),
                    sequence,
                })
            }
            Err(e) => {
                self.stats.record_rejection(e.kind());
                Err(e)
            }
        }
    }

    /// Submits a request given as signed integers, rejecting a negative
    /// process id or component with [`RequestError::InvalidRequest`].
    pub fn submit_signed(&mut self, pid: i64, request: &[i64]) -> Result<Grant, RequestError> {
        match signed_pid(pid).and_then(|pid| Ok((pid, ResourceVector::from_signed(request)?))) {
            Ok((pid, request)) => self.submit(pid, &request),
            Err(e) => {
                self.stats.record_rejection(e.kind());
                Err(e)
            }
        }
    }

    /// Returns part of `pid`'s allocation to the free pool.
    ///
    /// Releasing from a safe state always yields a safe state, so no safety
    /// check is needed.
    pub fn release(&mut self, pid: ProcessId, release: &ResourceVector) -> Result<(), RequestError> {
        if let Err(e) = validate_release(&self.state, pid, release) {
            self.stats.record_rejected_release();
            return Err(e);
        }

        let tentative = self.state.tentative_release(pid, release);
        self.state.commit(tentative);
        self.stats.record_release();
        tracing::debug!("P{pid} released {release}");
        Ok(())
    }

    /// Signed counterpart of [`release`](Self::release).
    pub fn release_signed(&mut self, pid: i64, release: &[i64]) -> Result<(), RequestError> {
        match signed_pid(pid).and_then(|pid| Ok((pid, ResourceVector::from_signed(release)?))) {
            Ok((pid, release)) => self.release(pid, &release),
            Err(e) => {
                self.stats.record_rejected_release();
                Err(e)
            }
        }
    }

    /// Process `pid` completes and returns its whole allocation.
    ///
    /// Returns what was released. The declared maximum is unchanged, so the
    /// process may start requesting again.
    pub fn finish(&mut self, pid: ProcessId) -> Result<ResourceVector, RequestError> {
        if !self.state.contains(pid) {
            self.stats.record_rejected_release();
            return Err(RequestError::InvalidRequest {
                reason: format!(
                    "process {pid} does not exist ({} processes)",
                    self.state.num_processes()
                ),
            });
        }
        let held = self.state.allocated(pid).clone();
        self.release(pid, &held)?;
        Ok(held)
    }

    /// Signed counterpart of [`finish`](Self::finish).
    pub fn finish_signed(&mut self, pid: i64) -> Result<ResourceVector, RequestError> {
        match signed_pid(pid) {
            Ok(pid) => self.finish(pid),
            Err(e) => {
                self.stats.record_rejected_release();
                Err(e)
            }
        }
    }

    /// Runs the configured checker on the live state.
    pub fn check_safety(&mut self) -> SafetyVerdict {
        self.stats.record_safety_check();
        self.checker.check(&self.state)
    }
}

impl std::fmt::Debug for RequestProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestProcessor")
            .field("checker", &self.checker.name())
            .field("processes", &self.state.num_processes())
            .field("resources", &self.state.num_resources())
            .field("available", self.state.available())
            .finish()
    }
}
