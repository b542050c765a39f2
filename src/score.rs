// SPDX-License-Identifier: AGPL-3.0-only

//! Additive desirability score for devices that already passed checking.
//!
//! Pure function over the catalog snapshot. Each term is monotonic
//! non-decreasing in its input; the divisors only keep the dimension terms
//! on a comparable footing with the class bonuses. The absolute value
//! means nothing — only the ordering between candidates does.

use crate::catalog::{DeviceCatalog, DeviceClass};

/// Discrete cards outrank everything else by a wide margin.
const DISCRETE_BONUS: u64 = 500;
/// Integrated parts outrank software and virtual devices.
const INTEGRATED_BONUS: u64 = 50;
/// Image and framebuffer dimensions count per 100 texels.
const DIMENSION_DIVISOR: u64 = 100;
/// Work-group counts are huge on every real device; count per 1000.
const WORK_GROUP_DIVISOR: u64 = 1000;
/// Shared memory counts per KiB.
const SHARED_MEMORY_DIVISOR: u64 = 1024;
/// Descriptor-set limits are small integers; weight them up.
const DESCRIPTOR_SET_WEIGHT: u64 = 4;
/// Each distinct capability bit across the families.
const QUEUE_DIVERSITY_WEIGHT: u64 = 10;

/// Score one device catalog.
#[must_use]
pub fn score_device(catalog: &DeviceCatalog) -> u64 {
    let mut score = match catalog.device_class {
        DeviceClass::DiscreteGpu => DISCRETE_BONUS,
        DeviceClass::IntegratedGpu => INTEGRATED_BONUS,
        DeviceClass::VirtualGpu | DeviceClass::Cpu | DeviceClass::Other => 0,
    };

    let limits = &catalog.limits;
    score += u64::from(limits.max_image_dimension_2d) / DIMENSION_DIVISOR;
    score += u64::from(limits.max_image_dimension_3d) / DIMENSION_DIVISOR;
    score += u64::from(limits.max_framebuffer_width) / DIMENSION_DIVISOR;
    score += u64::from(limits.max_framebuffer_height) / DIMENSION_DIVISOR;
    score += u64::from(limits.max_bound_descriptor_sets) * DESCRIPTOR_SET_WEIGHT;
    for axis in limits.max_compute_work_group_count {
        score += u64::from(axis) / WORK_GROUP_DIVISOR;
    }
    score += u64::from(limits.max_compute_shared_memory_size) / SHARED_MEMORY_DIVISOR;
    score += u64::from(catalog.queue_diversity()) * QUEUE_DIVERSITY_WEIGHT;

    score
}
