// SPDX-License-Identifier: AGPL-3.0-only

//! Selector — filter candidates, score survivors, pick the winner.
//!
//! Rejected candidates are recorded with their verdicts (and logged at
//! debug level) so a failed selection explains itself. The winner is the
//! first-seen maximum score: the reduction uses a strictly-greater
//! comparison, so equal-scoring candidates resolve to enumeration order
//! and the result is deterministic.
//!
//! ## Device override
//!
//! Explicit device targeting mirrors the GPU adapter convention used
//! across hotSpring. Set `ASSAY_DEVICE` to pin the choice:
//!
//! | Value | Behavior |
//! |-------|----------|
//! | `0`, `1`, … | Select candidate by enumeration index |
//! | substring | Case-insensitive name match (e.g. `"titan"`, `"4070"`) |
//! | `auto` / *(unset)* | Scored auto-selection |
//!
//! An override target must still pass the constraint checker; pinning an
//! unsuitable device is an error, not a silent fallback.

use crate::assign::{assign, AssignmentTable};
use crate::catalog::DeviceCatalog;
use crate::error::AssayError;
use crate::requirements::DeviceRequirements;
use crate::score::score_device;
use crate::suitability::{check_device, Suitability};
use serde::Serialize;

/// Environment variable consulted for explicit device targeting.
pub const DEVICE_OVERRIDE_ENV: &str = "ASSAY_DEVICE";

/// Why a candidate was filtered out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Candidate device name.
    pub device: String,
    pub verdict: Suitability,
}

/// A completed selection: the winning device and everything the
/// downstream construction step needs.
#[derive(Debug, Clone, Serialize)]
pub struct Selection<'a> {
    /// Position of the winner in the candidate list.
    pub index: usize,
    pub device: &'a DeviceCatalog,
    pub score: u64,
    /// Completed request→(family, slot) table for the winner.
    pub assignments: AssignmentTable,
    /// Extension names echoed from the requirements.
    pub extensions: Vec<String>,
    /// Validation toggle echoed from the requirements.
    pub validation: bool,
}

/// Select the best device from `candidates` for `requirements`.
///
/// Filters through the constraint checker, scores the survivors, and
/// returns the first-seen maximum with its completed assignment table.
/// Honors [`DEVICE_OVERRIDE_ENV`].
///
/// # Errors
///
/// - [`AssayError::NoSuitableDevice`] when no candidate (or the override
///   target) passes the checker; carries per-candidate verdicts.
/// - [`AssayError::Enumeration`] when an override names no candidate.
/// - [`AssayError::PartialAssignment`] if the winner's table comes back
///   incomplete (cannot happen for a `Suitable` device; kept as a guard
///   rather than an assumption).
pub fn select_device<'a>(
    candidates: &'a [DeviceCatalog],
    requirements: &DeviceRequirements,
) -> Result<Selection<'a>, AssayError> {
    if let Some(selector) = device_override() {
        return select_by_override(candidates, requirements, &selector);
    }

    let mut rejections = Vec::new();
    let mut best: Option<(usize, u64)> = None;

    for (index, catalog) in candidates.iter().enumerate() {
        let verdict = check_device(catalog, requirements);
        if !verdict.is_suitable() {
            tracing::debug!(device = %catalog.name, %verdict, "candidate rejected");
            rejections.push(Rejection { device: catalog.name.clone(), verdict });
            continue;
        }

        let score = score_device(catalog);
        tracing::debug!(device = %catalog.name, score, "candidate suitable");

        // Strictly greater: the first-seen maximum is retained, so ties
        // resolve to enumeration order.
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((index, score));
        }
    }

    let Some((index, score)) = best else {
        return Err(AssayError::NoSuitableDevice { rejections });
    };
    finish(candidates, requirements, index, score)
}

/// Resolve an explicit `ASSAY_DEVICE` selector: index first, then
/// case-insensitive name substring.
fn select_by_override<'a>(
    candidates: &'a [DeviceCatalog],
    requirements: &DeviceRequirements,
    selector: &str,
) -> Result<Selection<'a>, AssayError> {
    let index = selector
        .parse::<usize>()
        .ok()
        .filter(|i| *i < candidates.len())
        .or_else(|| {
            candidates
                .iter()
                .position(|c| c.name.to_lowercase().contains(selector))
        })
        .ok_or_else(|| {
            AssayError::Enumeration(format!(
                "{DEVICE_OVERRIDE_ENV}={selector} matches none of {} candidates",
                candidates.len()
            ))
        })?;

    let catalog = &candidates[index];
    let verdict = check_device(catalog, requirements);
    if !verdict.is_suitable() {
        tracing::debug!(device = %catalog.name, %verdict, "override target rejected");
        return Err(AssayError::NoSuitableDevice {
            rejections: vec![Rejection { device: catalog.name.clone(), verdict }],
        });
    }
    finish(candidates, requirements, index, score_device(catalog))
}

fn finish<'a>(
    candidates: &'a [DeviceCatalog],
    requirements: &DeviceRequirements,
    index: usize,
    score: u64,
) -> Result<Selection<'a>, AssayError> {
    let device = &candidates[index];
    let assignments = assign(device, &requirements.queues).require_complete()?;
    tracing::debug!(device = %device.name, score, "device selected");
    Ok(Selection {
        index,
        device,
        score,
        assignments,
        extensions: requirements.extensions.clone(),
        validation: requirements.validation,
    })
}

fn device_override() -> Option<String> {
    std::env::var(DEVICE_OVERRIDE_ENV)
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && s != "auto")
}
