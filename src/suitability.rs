// SPDX-License-Identifier: AGPL-3.0-only

//! Constraint checker — first-failure classification of a candidate.
//!
//! Categories are evaluated in a fixed order (queues, formats, features,
//! limits) and the first unmet one is the verdict; later categories are
//! not inspected. The queue check runs the real family matcher rather
//! than a weaker per-request test, because a device can look queue-capable
//! until earlier requests consume a family's slots.
//!
//! Boundary semantics are inclusive throughout: a reported maximum exactly
//! equal to a requested minimum passes. See DESIGN.md for the decision
//! record.

use crate::assign::assign;
use crate::catalog::DeviceCatalog;
use crate::requirements::{DeviceRequirements, FormatRequirement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical result of checking one device against a requirement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suitability {
    Suitable,
    UnsatisfiedQueues,
    UnsatisfiedFormats,
    UnsatisfiedFeatures,
    UnsatisfiedLimits,
}

impl Suitability {
    #[must_use]
    pub const fn is_suitable(self) -> bool {
        matches!(self, Self::Suitable)
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suitable => write!(f, "suitable"),
            Self::UnsatisfiedQueues => write!(f, "does not satisfy queue requirements"),
            Self::UnsatisfiedFormats => write!(f, "does not satisfy format requirements"),
            Self::UnsatisfiedFeatures => write!(f, "does not satisfy feature requirements"),
            Self::UnsatisfiedLimits => write!(f, "does not satisfy limit requirements"),
        }
    }
}

/// Check one device catalog against a requirement set.
///
/// Returns the first unmet category, or [`Suitability::Suitable`] when all
/// four pass. Never aggregates multiple failures.
#[must_use]
pub fn check_device(catalog: &DeviceCatalog, requirements: &DeviceRequirements) -> Suitability {
    if !queues_satisfied(catalog, requirements) {
        return Suitability::UnsatisfiedQueues;
    }
    if !formats_satisfied(catalog, &requirements.formats) {
        return Suitability::UnsatisfiedFormats;
    }
    if !catalog.features.supports(&requirements.features) {
        return Suitability::UnsatisfiedFeatures;
    }
    if !requirements.limits.satisfied_by(&catalog.limits) {
        return Suitability::UnsatisfiedLimits;
    }
    Suitability::Suitable
}

/// Every queue request finds a family once capacities are accounted for.
/// Same matching logic the selector later uses for the winner.
fn queues_satisfied(catalog: &DeviceCatalog, requirements: &DeviceRequirements) -> bool {
    assign(catalog, &requirements.queues).is_complete()
}

fn formats_satisfied(catalog: &DeviceCatalog, requirements: &[FormatRequirement]) -> bool {
    requirements.iter().all(|req| {
        let Some(caps) = catalog.format_caps(&req.query()) else {
            return false;
        };
        caps.sample_counts.contains(req.min_samples)
            && req.min_extent.fits_within(&caps.max_extent)
            && req.min_mip_levels <= caps.max_mip_levels
            && req.min_array_layers <= caps.max_array_layers
            && req.min_resource_size <= caps.max_resource_size
    })
}
