// SPDX-License-Identifier: AGPL-3.0-only

//! Family matcher — greedy assignment of queue requests onto families.
//!
//! Requests are processed in list order. For each one, every family is a
//! candidate if its flag set covers the requested flags, it has a slot
//! left, and (when the request names a presentation target) it can present
//! there. Among candidates the family with the fewest capability bits wins
//! — the most specific match — with catalog order breaking ties. A
//! dedicated transfer family therefore beats a do-everything graphics
//! family for a transfer request, even when the latter has spare slots.
//!
//! Capacity bookkeeping lives in a working copy local to one [`assign`]
//! call; the shared catalog is never touched. Requests that find no family
//! stay unassigned in the returned table — whether that is acceptable is
//! the caller's call, via [`AssignmentTable::require_complete`].

use crate::catalog::DeviceCatalog;
use crate::error::AssayError;
use crate::requirements::QueueRequest;
use serde::{Deserialize, Serialize};

/// One resolved request: which family, which slot within it, and the
/// priority echoed from the request for queue construction downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueAssignment {
    /// Family identifier (ordinal position in the catalog).
    pub family: usize,
    /// Slot index within the family: the count of prior assignments to
    /// that family in this run.
    pub slot: u32,
    pub priority: f32,
}

/// Assignment results keyed by request index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentTable {
    entries: Vec<Option<QueueAssignment>>,
}

impl AssignmentTable {
    /// Number of requests this table answers (assigned or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The assignment for request `index`, if one was found.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QueueAssignment> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Whether every request was assigned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }

    /// Indices of requests that found no family.
    #[must_use]
    pub fn unassigned(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of assignments made against family `family`.
    #[must_use]
    pub fn family_load(&self, family: usize) -> u32 {
        let count = self
            .entries
            .iter()
            .flatten()
            .filter(|a| a.family == family)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// `(request index, assignment)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&QueueAssignment>)> {
        self.entries.iter().enumerate().map(|(i, e)| (i, e.as_ref()))
    }

    /// Enforce the caller policy that partial results are fatal.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::PartialAssignment`] listing the unassigned
    /// request indices if any request found no family.
    pub fn require_complete(self) -> Result<Self, AssayError> {
        let unassigned = self.unassigned();
        if unassigned.is_empty() {
            Ok(self)
        } else {
            Err(AssayError::PartialAssignment { unassigned })
        }
    }
}

/// Greedily assign `requests` onto the catalog's families.
///
/// Operates on a private copy of the family capacities; the catalog is
/// read-only. Partial results are returned as-is — see
/// [`AssignmentTable::require_complete`].
#[must_use]
pub fn assign(catalog: &DeviceCatalog, requests: &[QueueRequest]) -> AssignmentTable {
    // Working capacity and slot counters, local to this run.
    let mut remaining: Vec<u32> = catalog.families.iter().map(|f| f.capacity).collect();
    let mut next_slot: Vec<u32> = vec![0; catalog.families.len()];

    let mut entries = Vec::with_capacity(requests.len());
    for request in requests {
        let mut best: Option<(usize, u32)> = None;

        for (index, family) in catalog.families.iter().enumerate() {
            if !family.flags.contains(request.flags) {
                continue;
            }
            if remaining[index] == 0 {
                continue;
            }
            if let Some(target) = request.present_target {
                if !family.supports_present(target) {
                    continue;
                }
            }

            // Fewest set bits wins; strict `<` keeps the first-seen
            // family on ties.
            let bits = family.flags.bit_count();
            if best.is_none_or(|(_, b)| bits < b) {
                best = Some((index, bits));
            }
        }

        entries.push(best.map(|(family, _)| {
            remaining[family] -= 1;
            let slot = next_slot[family];
            next_slot[family] += 1;
            QueueAssignment { family, slot, priority: request.priority }
        }));
    }

    AssignmentTable { entries }
}
