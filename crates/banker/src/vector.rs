// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resource vectors: one non-negative count per resource class.
//!
//! A [`ResourceVector`] is used for requests, availability snapshots and
//! individual rows of the max/allocation/need matrices. Components are
//! `u32`, so a negative count cannot be represented; signed input coming
//! from files or other outer layers goes through [`ResourceVector::from_signed`].

use crate::RequestError;
use std::fmt;

/// Index of a process (a row in the allocation matrices).
pub type ProcessId = usize;

/// An ordered sequence of resource counts, one per resource class.
///
/// # Examples
/// ```
/// use banker::ResourceVector;
///
/// let request = ResourceVector::from_slice(&[1, 0, 2]);
/// let available = ResourceVector::from_slice(&[3, 3, 2]);
/// assert!(request.fits_within(&available));
/// assert_eq!(request.to_string(), "[1, 0, 2]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u32>);

impl ResourceVector {
    /// Wraps a vector of counts.
    pub fn new(values: Vec<u32>) -> Self {
        Self(values)
    }

    /// Copies counts from a slice.
    pub fn from_slice(values: &[u32]) -> Self {
        Self(values.to_vec())
    }

    /// A vector of `m` zeros.
    pub fn zeros(m: usize) -> Self {
        Self(vec![0; m])
    }

    /// Converts signed input, rejecting negative or oversized components.
    ///
    /// This is the boundary at which "all components non-negative" is
    /// enforced for untyped input.
    pub fn from_signed(values: &[i64]) -> Result<Self, RequestError> {
        values
            .iter()
            .enumerate()
            .map(|(j, &v)| {
                u32::try_from(v).map_err(|_| RequestError::InvalidRequest {
                    reason: format!("component {j} is {v}; counts must be in 0..={}", u32::MAX),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Number of resource classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }

    /// Returns the count for resource class `j`, if it exists.
    pub fn get(&self, j: usize) -> Option<u32> {
        self.0.get(j).copied()
    }

    /// Returns `true` when every component is zero (vacuously for `m == 0`).
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    /// Element-wise `self <= bound` for every resource class.
    ///
    /// Vectors of different lengths never fit.
    pub fn fits_within(&self, bound: &ResourceVector) -> bool {
        self.first_exceeding(bound).is_none() && self.len() == bound.len()
    }

    /// Returns the first resource class where `self[j] > bound[j]`.
    pub fn first_exceeding(&self, bound: &ResourceVector) -> Option<usize> {
        self.0
            .iter()
            .zip(bound.0.iter())
            .position(|(&have, &limit)| have > limit)
    }

    /// Element-wise sum.
    ///
    /// Callers guarantee the result stays within the system total, which
    /// `AllocationState` bounds to `u32` at construction.
    pub(crate) fn plus(&self, other: &ResourceVector) -> ResourceVector {
        debug_assert_eq!(self.len(), other.len());
        Self(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(&a, &b)| a.saturating_add(b))
                .collect(),
        )
    }

    /// Element-wise difference. Callers validate `other <= self` first.
    pub(crate) fn minus(&self, other: &ResourceVector) -> ResourceVector {
        debug_assert!(other.fits_within(self), "{other} does not fit within {self}");
        Self(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(&a, &b)| a.saturating_sub(b))
                .collect(),
        )
    }

    pub(crate) fn add_assign(&mut self, other: &ResourceVector) {
        for (a, &b) in self.0.iter_mut().zip(other.0.iter()) {
            *a = a.saturating_add(b);
        }
    }
}

impl From<Vec<u32>> for ResourceVector {
    fn from(values: Vec<u32>) -> Self {
        Self(values)
    }
}

impl From<&[u32]> for ResourceVector {
    fn from(values: &[u32]) -> Self {
        Self::from_slice(values)
    }
}

impl<const N: usize> From<[u32; N]> for ResourceVector {
    fn from(values: [u32; N]) -> Self {
        Self(values.to_vec())
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (j, v) in self.0.iter().enumerate() {
            if j > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}
