// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # banker
//!
//! A deadlock-avoidance engine implementing the Banker's Algorithm: it
//! decides whether a process's resource request can be granted without
//! leaving the system in a state from which some processes could never
//! finish.
//!
//! # Key Components
//!
//! - [`AllocationState`] — the Max/Allocation/Need/Available matrices.
//!   Need is always derived, and the only mutation path is
//!   tentative-apply followed by commit.
//! - [`SafetyChecker`] — pure safety decision over a state snapshot, with
//!   the canonical [`RestartScan`] and the textbook-order [`ContinueScan`].
//! - [`RequestProcessor`] — validates a request, builds the candidate state,
//!   checks it, then commits or discards it.
//! - [`SharedProcessor`] — `Arc<Mutex<_>>` handle that serialises whole
//!   request evaluations across threads.
//! - [`RequestStats`] — grant/rejection counters.
//!
//! # Request Lifecycle
//!
//! ```text
//! submit(pid, request)
//!       │  validate (shape, need, available)
//!       ▼
//!   state.tentative_apply()  ──► candidate (private copy)
//!       │
//!       ▼
//!   checker.check(candidate)
//!       │ safe               │ unsafe
//!       ▼                    ▼
//!   state.commit()      drop candidate, Err(WouldCauseUnsafeState)
//! ```
//!
//! # Example
//! ```
//! use banker::{AllocationState, RequestError, RequestProcessor, ResourceVector};
//!
//! let state = AllocationState::from_rows(
//!     &[vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]],
//!     &[vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]],
//!     &[3, 3, 2],
//! )
//! .unwrap();
//! let mut processor = RequestProcessor::new(state);
//!
//! // Granting [3, 3, 0] to P4 would leave nobody able to finish.
//! let err = processor.submit(4, &ResourceVector::from_slice(&[3, 3, 0])).unwrap_err();
//! assert!(matches!(err, RequestError::WouldCauseUnsafeState { .. }));
//! assert_eq!(processor.state().available().as_slice(), &[3, 3, 2]);
//! ```

mod error;
pub mod processor;
pub mod safety;
mod shared;
mod state;
mod stats;
mod vector;

pub use error::{RejectionKind, RequestError, StateError};
pub use processor::{Grant, RequestProcessor};
pub use safety::{
    checker_by_name, ContinueScan, RestartScan, SafeSequence, SafetyChecker, SafetyVerdict,
};
pub use shared::SharedProcessor;
pub use state::AllocationState;
pub use stats::RequestStats;
pub use vector::{ProcessId, ResourceVector};
