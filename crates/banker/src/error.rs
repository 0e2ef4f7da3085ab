// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for state construction and request processing.
//!
//! Construction failures ([`StateError`]) are fatal: the input matrices are
//! malformed and no engine can be built from them. Request failures
//! ([`RequestError`]) always leave the live state untouched.

use crate::{ProcessId, ResourceVector};
use std::fmt;

/// Errors raised while building an [`AllocationState`](crate::AllocationState).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// A matrix or vector does not have the expected shape.
    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// A process already holds more of a resource than its declared maximum.
    #[error("process {pid} holds {allocated} of resource {resource}, above its declared maximum of {max}")]
    NegativeNeed {
        pid: ProcessId,
        resource: usize,
        max: u32,
        allocated: u32,
    },

    /// A stored need entry no longer equals `max - allocated`.
    #[error("need[{pid}][{resource}] is {found}, expected max - allocated = {expected}")]
    NeedOutOfSync {
        pid: ProcessId,
        resource: usize,
        expected: u32,
        found: u32,
    },

    /// The system-wide total of a resource class does not fit in a `u32`.
    #[error("total of resource {resource} is {total}, which exceeds the supported maximum of {}", u32::MAX)]
    CapacityOverflow { resource: usize, total: u64 },
}

/// Errors returned when a request or release is rejected.
///
/// Every variant guarantees that the live state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Malformed request: unknown process, wrong length or a negative count.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The process asked for more than it declared it could ever need.
    #[error("process {pid} requested {requested} of resource {resource}, exceeding its remaining need of {need}")]
    ExceedsDeclaredNeed {
        pid: ProcessId,
        resource: usize,
        requested: u32,
        need: u32,
    },

    /// Not enough free resources right now; the caller may retry later.
    #[error("insufficient resources: process {pid} requested {requested} of resource {resource}, only {available} available")]
    InsufficientResources {
        pid: ProcessId,
        resource: usize,
        requested: u32,
        available: u32,
    },

    /// Granting the request would leave no safe completion order.
    #[error("granting {request} to process {pid} would leave the system unsafe; blocked processes: {blocked:?}")]
    WouldCauseUnsafeState {
        pid: ProcessId,
        request: ResourceVector,
        blocked: Vec<ProcessId>,
    },

    /// A release asked to return more than the process holds.
    #[error("process {pid} tried to release {released} of resource {resource} but holds only {held}")]
    ExceedsAllocation {
        pid: ProcessId,
        resource: usize,
        released: u32,
        held: u32,
    },
}

impl RequestError {
    /// The category of this rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::InvalidRequest { .. } => RejectionKind::InvalidRequest,
            Self::ExceedsDeclaredNeed { .. } => RejectionKind::ExceedsDeclaredNeed,
            Self::InsufficientResources { .. } => RejectionKind::InsufficientResources,
            Self::WouldCauseUnsafeState { .. } => RejectionKind::WouldCauseUnsafeState,
            Self::ExceedsAllocation { .. } => RejectionKind::ExceedsAllocation,
        }
    }

    /// Whether the same request may succeed later without any change by
    /// the caller (only a resource shortage qualifies).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::InsufficientResources { .. })
    }
}

/// Fieldless tag for [`RequestError`] variants, used by stats and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidRequest,
    ExceedsDeclaredNeed,
    InsufficientResources,
    WouldCauseUnsafeState,
    ExceedsAllocation,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::ExceedsDeclaredNeed => "exceeds_declared_need",
            Self::InsufficientResources => "insufficient_resources",
            Self::WouldCauseUnsafeState => "would_cause_unsafe_state",
            Self::ExceedsAllocation => "exceeds_allocation",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let e = RequestError::InsufficientResources {
            pid: 2,
            resource: 0,
            requested: 6,
            available: 3,
        };
        assert_eq!(e.kind(), RejectionKind::InsufficientResources);
        assert!(e.is_transient());

        let e = RequestError::ExceedsDeclaredNeed {
            pid: 0,
            resource: 0,
            requested: 8,
            need: 7,
        };
        assert_eq!(e.kind(), RejectionKind::ExceedsDeclaredNeed);
        assert!(!e.is_transient());
    }

    #[test]
    fn test_messages() {
        let e = StateError::NegativeNeed {
            pid: 1,
            resource: 2,
            max: 1,
            allocated: 3,
        };
        assert!(e.to_string().contains("process 1"));

        let e = RequestError::WouldCauseUnsafeState {
            pid: 4,
            request: ResourceVector::from_slice(&[3, 3, 0]),
            blocked: vec![0, 1],
        };
        let msg = e.to_string();
        assert!(msg.contains("[3, 3, 0]"));
        assert!(msg.contains("[0, 1]"));
    }

    #[test]
    fn test_kind_serde_name() {
        let json = serde_json::to_string(&RejectionKind::WouldCauseUnsafeState).unwrap();
        assert_eq!(json, "\"would_cause_unsafe_state\"");
        assert_eq!(RejectionKind::WouldCauseUnsafeState.to_string(), "would_cause_unsafe_state");
    }
}
