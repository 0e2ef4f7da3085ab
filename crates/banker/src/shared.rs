// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Thread-safe handle around a [`RequestProcessor`].
//!
//! The safety decision is only valid if nothing changes the state between
//! validation and commit, so every operation holds one lock for its whole
//! validate → apply → check → commit sequence. Readers take the same lock
//! and therefore only ever observe committed states.
//!
//! # Thread Safety
//! `SharedProcessor` is `Send + Sync` and cheap to clone; clones share the
//! same underlying processor.

use crate::safety::SafetyVerdict;
use crate::{
    AllocationState, Grant, ProcessId, RequestError, RequestProcessor, RequestStats,
    ResourceVector,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A cloneable, lock-protected request processor.
///
/// # Example
/// ```
/// use banker::{AllocationState, ResourceVector, SharedProcessor};
///
/// let state = AllocationState::from_rows(&[vec![2, 1]], &[vec![0, 0]], &[2, 1]).unwrap();
/// let shared = SharedProcessor::new(state);
///
/// let worker = shared.clone();
/// std::thread::spawn(move || {
///     worker.submit(0, &ResourceVector::from_slice(&[1, 1])).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(shared.snapshot().available().as_slice(), &[1, 0]);
/// ```
#[derive(Clone)]
pub struct SharedProcessor {
    inner: Arc<Mutex<RequestProcessor>>,
}

impl SharedProcessor {
    /// Wraps a new processor using the default checker.
    pub fn new(state: AllocationState) -> Self {
        Self::from_processor(RequestProcessor::new(state))
    }

    pub fn from_processor(processor: RequestProcessor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(processor)),
        }
    }

    /// Acquires the processor lock.
    ///
    /// A poisoned lock is recovered: commits are single assignments, so a
    /// panic in another holder cannot leave a half-applied state behind.
    fn lock(&self) -> MutexGuard<'_, RequestProcessor> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn submit(&self, pid: ProcessId, request: &ResourceVector) -> Result<Grant, RequestError> {
        self.lock().submit(pid, request)
    }

    pub fn submit_signed(&self, pid: i64, request: &[i64]) -> Result<Grant, RequestError> {
        self.lock().submit_signed(pid, request)
    }

    pub fn release(&self, pid: ProcessId, release: &ResourceVector) -> Result<(), RequestError> {
        self.lock().release(pid, release)
    }

    pub fn finish(&self, pid: ProcessId) -> Result<ResourceVector, RequestError> {
        self.lock().finish(pid)
    }

    pub fn check_safety(&self) -> SafetyVerdict {
        self.lock().check_safety()
    }

    /// A copy of the current committed state.
    pub fn snapshot(&self) -> AllocationState {
        self.lock().state().clone()
    }

    pub fn stats(&self) -> RequestStats {
        self.lock().stats().clone()
    }

    /// Runs `f` with exclusive access to the processor.
    ///
    /// Useful for multi-step operations that must not interleave with other
    /// callers, e.g. "request, then release on failure of a later step".
    pub fn with<R>(&self, f: impl FnOnce(&mut RequestProcessor) -> R) -> R {
        f(&mut *self.lock())
    }
}

impl std::fmt::Debug for SharedProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedProcessor")
            .field("processor", &*self.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn rv(values: &[u32]) -> ResourceVector {
        ResourceVector::from_slice(values)
    }

    #[test]
    fn test_clones_share_state() {
        let state = AllocationState::from_rows(&[vec![3]], &[vec![0]], &[3]).unwrap();
        let a = SharedProcessor::new(state);
        let b = a.clone();

        a.submit(0, &rv(&[2])).unwrap();
        assert_eq!(b.snapshot().allocated(0).as_slice(), &[2]);
        assert_eq!(b.stats().granted, 1);
    }

    #[test]
    fn test_concurrent_requests_conserve_resources() {
        let state = AllocationState::from_rows(
            &[vec![4, 4], vec![4, 4], vec![4, 4], vec![4, 4]],
            &[vec![0, 0], vec![0, 0], vec![0, 0], vec![0, 0]],
            &[6, 6],
        )
        .unwrap();
        let total = state.total();
        let shared = SharedProcessor::new(state);

        let handles: Vec<_> = (0..4)
            .map(|pid| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        if shared.submit(pid, &rv(&[1, 1])).is_ok() {
                            shared.release(pid, &rv(&[1, 1])).unwrap();
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let end = shared.snapshot();
        assert_eq!(end.total(), total);
        end.check_invariants().unwrap();
        assert!(shared.check_safety().is_safe());
    }

    #[test]
    fn test_with_exclusive_access() {
        let state = AllocationState::from_rows(&[vec![2]], &[vec![0]], &[2]).unwrap();
        let shared = SharedProcessor::new(state);
        let held = shared.with(|p| {
            p.submit(0, &rv(&[1])).unwrap();
            p.state().allocated(0).clone()
        });
        assert_eq!(held.as_slice(), &[1]);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedProcessor>();
    }
}
