// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Request statistics for diagnostics.
//!
//! [`RequestStats`] counts how a [`RequestProcessor`](crate::RequestProcessor)
//! has been used: grants, rejections by kind, releases and safety checks.

use crate::RejectionKind;

/// Cumulative counters for a request processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RequestStats {
    /// Total number of `submit` calls.
    pub total_requests: u64,
    /// Requests that were committed.
    pub granted: u64,
    /// Rejected as malformed (bad pid, wrong length, negative component).
    pub rejected_invalid: u64,
    /// Rejected for exceeding the declared need.
    pub rejected_exceeds_need: u64,
    /// Rejected for lack of free resources.
    pub rejected_insufficient: u64,
    /// Rejected because the result would be unsafe.
    pub rejected_unsafe: u64,
    /// Successful releases (including process completions).
    pub releases: u64,
    /// Releases rejected for any reason.
    pub rejected_releases: u64,
    /// Number of safety checks run.
    pub safety_checks: u64,
}

impl RequestStats {
    /// Fraction of requests that were granted, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` if no requests have been made.
    pub fn grant_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.granted as f64 / self.total_requests as f64
    }

    /// Total number of rejected requests (releases not included).
    pub fn rejected(&self) -> u64 {
        self.rejected_invalid
            + self.rejected_exceeds_need
            + self.rejected_insufficient
            + self.rejected_unsafe
    }

    pub(crate) fn record_grant(&mut self) {
        self.total_requests += 1;
        self.granted += 1;
    }

    pub(crate) fn record_rejection(&mut self, kind: RejectionKind) {
        let counter = match kind {
            RejectionKind::InvalidRequest => &mut self.rejected_invalid,
            RejectionKind::ExceedsDeclaredNeed => &mut self.rejected_exceeds_need,
            RejectionKind::InsufficientResources => &mut self.rejected_insufficient,
            RejectionKind::WouldCauseUnsafeState => &mut self.rejected_unsafe,
            // Only releases are rejected this way; they are not requests.
            RejectionKind::ExceedsAllocation => {
                self.rejected_releases += 1;
                return;
            }
        };
        *counter += 1;
        self.total_requests += 1;
    }

    pub(crate) fn record_release(&mut self) {
        self.releases += 1;
    }

    pub(crate) fn record_rejected_release(&mut self) {
        self.rejected_releases += 1;
    }

    pub(crate) fn record_safety_check(&mut self) {
        self.safety_checks += 1;
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Requests: {} total ({} granted, {:.0}% grant rate), rejected: \
             {} invalid, {} over need, {} insufficient, {} unsafe; \
             {} releases ({} rejected), {} safety checks",
            self.total_requests,
            self.granted,
            self.grant_ratio() * 100.0,
            self.rejected_invalid,
            self.rejected_exceeds_need,
            self.rejected_insufficient,
            self.rejected_unsafe,
            self.releases,
            self.rejected_releases,
            self.safety_checks,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let s = RequestStats::default();
        assert_eq!(s.total_requests, 0);
        assert_eq!(s.grant_ratio(), 0.0);
        assert_eq!(s.rejected(), 0);
    }

    #[test]
    fn test_grant_ratio() {
        let mut s = RequestStats::default();
        s.record_grant();
        s.record_rejection(RejectionKind::WouldCauseUnsafeState);
        s.record_rejection(RejectionKind::InsufficientResources);
        s.record_grant();
        assert_eq!(s.total_requests, 4);
        assert!((s.grant_ratio() - 0.5).abs() < 1e-9);
        assert_eq!(s.rejected(), 2);
    }

    #[test]
    fn test_rejections_by_kind() {
        let mut s = RequestStats::default();
        s.record_rejection(RejectionKind::InvalidRequest);
        s.record_rejection(RejectionKind::ExceedsDeclaredNeed);
        s.record_rejection(RejectionKind::ExceedsDeclaredNeed);
        assert_eq!(s.rejected_invalid, 1);
        assert_eq!(s.rejected_exceeds_need, 2);
        assert_eq!(s.rejected_insufficient, 0);
    }

    #[test]
    fn test_exceeds_allocation_counts_as_release() {
        let mut s = RequestStats::default();
        s.record_rejection(RejectionKind::ExceedsAllocation);
        assert_eq!(s.rejected_releases, 1);
        assert_eq!(s.total_requests, 0);
        assert_eq!(s.rejected(), 0);
    }

    #[test]
    fn test_summary() {
        let mut s = RequestStats::default();
        s.record_grant();
        s.record_rejection(RejectionKind::WouldCauseUnsafeState);
        s.record_release();
        s.record_safety_check();
        let summary = s.summary();
        assert!(summary.contains("2 total"));
        assert!(summary.contains("1 granted"));
        assert!(summary.contains("1 unsafe"));
        assert!(summary.contains("1 releases"));
    }
}
