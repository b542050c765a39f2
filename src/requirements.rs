// SPDX-License-Identifier: AGPL-3.0-only

//! Declarative requirement sets for device selection.
//!
//! A requirement set says what the caller needs — queue capabilities,
//! format support, features, minimum limits — without naming a device.
//! The checker and matcher consume it; `extensions` and `validation` ride
//! along untouched for the downstream device-construction step.
//!
//! `profiles` ships canned requirement sets for the workloads hotSpring
//! actually runs, the same way forge ships dispatch profiles.

use crate::catalog::{DeviceFeatures, DeviceLimits, Extent3d, Format, FormatQuery, ImageKind, SurfaceId, Tiling};
use crate::flags::{ImageUsage, QueueFlags, SampleCounts};
use serde::{Deserialize, Serialize};

/// A request for one queue with a given capability set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueRequest {
    /// Capabilities the assigned family must cover.
    pub flags: QueueFlags,
    /// When set, the assigned family must be able to present to this
    /// target.
    pub present_target: Option<SurfaceId>,
    /// Scheduling priority, passed through to queue construction.
    /// Matching never consults it.
    pub priority: f32,
}

impl QueueRequest {
    /// Request with default priority and no presentation target.
    #[must_use]
    pub const fn new(flags: QueueFlags) -> Self {
        Self { flags, present_target: None, priority: 1.0 }
    }

    /// Require presentation support for `target`.
    #[must_use]
    pub const fn present_to(mut self, target: SurfaceId) -> Self {
        self.present_target = Some(target);
        self
    }

    /// Set the queue priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }
}

/// A required format configuration with its minimum capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRequirement {
    pub format: Format,
    pub kind: ImageKind,
    pub tiling: Tiling,
    pub usage: ImageUsage,
    /// Sample counts that must all be supported.
    pub min_samples: SampleCounts,
    pub min_extent: Extent3d,
    pub min_mip_levels: u32,
    pub min_array_layers: u32,
    pub min_resource_size: u64,
}

impl FormatRequirement {
    /// Requirement with single-sample minimum and zero size minimums.
    #[must_use]
    pub const fn new(format: Format, kind: ImageKind, tiling: Tiling, usage: ImageUsage) -> Self {
        Self {
            format,
            kind,
            tiling,
            usage,
            min_samples: SampleCounts::X1,
            min_extent: Extent3d::new(0, 0, 0),
            min_mip_levels: 0,
            min_array_layers: 0,
            min_resource_size: 0,
        }
    }

    /// The snapshot lookup key for this requirement.
    #[must_use]
    pub const fn query(&self) -> FormatQuery {
        FormatQuery { format: self.format, kind: self.kind, tiling: self.tiling, usage: self.usage }
    }
}

/// Minimum numeric limits a device must reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitRequirements {
    pub minimum_1d_texture_size: u32,
    pub minimum_2d_texture_size: u32,
    pub minimum_3d_texture_size: u32,
}

impl LimitRequirements {
    /// Inclusive check: a reported limit exactly equal to the requested
    /// minimum satisfies it.
    #[must_use]
    pub const fn satisfied_by(&self, limits: &DeviceLimits) -> bool {
        self.minimum_1d_texture_size <= limits.max_image_dimension_1d
            && self.minimum_2d_texture_size <= limits.max_image_dimension_2d
            && self.minimum_3d_texture_size <= limits.max_image_dimension_3d
    }
}

/// Everything the caller demands of a device, in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRequirements {
    /// Queue requests, matched in list order.
    pub queues: Vec<QueueRequest>,
    pub formats: Vec<FormatRequirement>,
    /// Features that must be reported `true`. A `false` here means
    /// "don't care", not "must be absent".
    pub features: DeviceFeatures,
    pub limits: LimitRequirements,
    /// Extension names for the downstream device-construction step.
    /// Not part of any suitability check.
    pub extensions: Vec<String>,
    /// Whether the caller wants validation/diagnostic instrumentation
    /// downstream. Not part of any suitability check.
    pub validation: bool,
}

/// Canned requirement sets for common hotSpring workloads.
pub mod profiles {
    use super::{
        DeviceFeatures, DeviceRequirements, Format, FormatRequirement, ImageKind, ImageUsage,
        LimitRequirements, QueueFlags, QueueRequest, SurfaceId, Tiling,
    };

    /// Headless f64 compute: one compute queue, one transfer queue.
    #[must_use]
    pub fn headless_compute() -> DeviceRequirements {
        DeviceRequirements {
            queues: vec![
                QueueRequest::new(QueueFlags::COMPUTE),
                QueueRequest::new(QueueFlags::TRANSFER).with_priority(0.5),
            ],
            features: DeviceFeatures { shader_float64: true, ..DeviceFeatures::default() },
            ..DeviceRequirements::default()
        }
    }

    /// On-screen rendering: a graphics queue that can present to
    /// `target`, an sRGB swapchain-class color format, and anisotropic
    /// sampling.
    #[must_use]
    pub fn presentation(target: SurfaceId) -> DeviceRequirements {
        DeviceRequirements {
            queues: vec![QueueRequest::new(QueueFlags::GRAPHICS).present_to(target)],
            formats: vec![FormatRequirement::new(
                Format::Bgra8Srgb,
                ImageKind::D2,
                Tiling::Optimal,
                ImageUsage::COLOR_ATTACHMENT,
            )],
            features: DeviceFeatures { sampler_anisotropy: true, ..DeviceFeatures::default() },
            limits: LimitRequirements {
                minimum_2d_texture_size: 4096,
                ..LimitRequirements::default()
            },
            ..DeviceRequirements::default()
        }
    }

    /// Bulk upload/readback streaming: two transfer queues.
    #[must_use]
    pub fn transfer_streaming() -> DeviceRequirements {
        DeviceRequirements {
            queues: vec![
                QueueRequest::new(QueueFlags::TRANSFER),
                QueueRequest::new(QueueFlags::TRANSFER).with_priority(0.5),
            ],
            ..DeviceRequirements::default()
        }
    }
}
