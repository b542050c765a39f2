// SPDX-License-Identifier: AGPL-3.0-only

//! Capability catalog — a read-only snapshot of one candidate device.
//!
//! A catalog is plain data: queue families with their capacities, the
//! boolean feature vector, numeric limits, and the answers to the format
//! queries the caller cared about at snapshot time. It is produced once by
//! the probe layer (or deserialized from a saved snapshot) and never
//! mutated afterward — the matcher works on its own private capacity copy.
//!
//! Catalogs serialize to JSON so a selection run can be replayed offline,
//! the same way benchmark reports are persisted elsewhere in hotSpring.

use crate::flags::{ImageUsage, QueueFlags, SampleCounts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad device class, used only by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    DiscreteGpu,
    IntegratedGpu,
    VirtualGpu,
    Cpu,
    Other,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscreteGpu => write!(f, "discrete"),
            Self::IntegratedGpu => write!(f, "integrated"),
            Self::VirtualGpu => write!(f, "virtual"),
            Self::Cpu => write!(f, "cpu"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Opaque identifier for a presentation target (window surface).
///
/// The catalog records which families can present to which targets; the
/// surface handle itself never enters the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// One queue family: what it can do, and how many slots it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyInfo {
    /// Capability flag set for every slot in this family.
    pub flags: QueueFlags,
    /// Slot count as reported by the device. Never mutated here; the
    /// matcher decrements a working copy.
    pub capacity: u32,
    /// Presentation targets this family can present to.
    pub present_targets: Vec<SurfaceId>,
}

impl FamilyInfo {
    /// Family with no presentation support.
    #[must_use]
    pub const fn new(flags: QueueFlags, capacity: u32) -> Self {
        Self { flags, capacity, present_targets: Vec::new() }
    }

    /// Whether this family can present to `target`.
    #[must_use]
    pub fn supports_present(&self, target: SurfaceId) -> bool {
        self.present_targets.contains(&target)
    }
}

/// Fixed, enumerable feature vector.
///
/// The same type describes both what a device reports and what a
/// requirement set demands; a demanded `true` must be reported `true`,
/// and a demanded `false` is not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct DeviceFeatures {
    pub robust_buffer_access: bool,
    pub full_draw_index_uint32: bool,
    pub geometry_shader: bool,
    pub tessellation_shader: bool,
    pub sampler_anisotropy: bool,
    pub texture_compression_bc: bool,
    pub shader_float64: bool,
    pub shader_int64: bool,
    pub multi_viewport: bool,
    pub fill_mode_non_solid: bool,
    pub wide_lines: bool,
    pub independent_blend: bool,
}

impl DeviceFeatures {
    /// The feature vector as named entries, in declaration order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, bool); 12] {
        [
            ("robust_buffer_access", self.robust_buffer_access),
            ("full_draw_index_uint32", self.full_draw_index_uint32),
            ("geometry_shader", self.geometry_shader),
            ("tessellation_shader", self.tessellation_shader),
            ("sampler_anisotropy", self.sampler_anisotropy),
            ("texture_compression_bc", self.texture_compression_bc),
            ("shader_float64", self.shader_float64),
            ("shader_int64", self.shader_int64),
            ("multi_viewport", self.multi_viewport),
            ("fill_mode_non_solid", self.fill_mode_non_solid),
            ("wide_lines", self.wide_lines),
            ("independent_blend", self.independent_blend),
        ]
    }

    /// Whether this (reported) vector satisfies a required vector: every
    /// feature the requirement sets `true` must be `true` here.
    #[must_use]
    pub fn supports(&self, required: &Self) -> bool {
        self.first_missing(required).is_none()
    }

    /// Name of the first required feature this vector lacks, if any.
    #[must_use]
    pub fn first_missing(&self, required: &Self) -> Option<&'static str> {
        let have = self.entries();
        required
            .entries()
            .iter()
            .zip(have.iter())
            .find(|((_, wanted), (_, got))| *wanted && !*got)
            .map(|((name, _), _)| *name)
    }
}

/// Numeric limits consumed by the constraint checker and the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLimits {
    pub max_image_dimension_1d: u32,
    pub max_image_dimension_2d: u32,
    pub max_image_dimension_3d: u32,
    pub max_framebuffer_width: u32,
    pub max_framebuffer_height: u32,
    pub max_bound_descriptor_sets: u32,
    pub max_compute_work_group_count: [u32; 3],
    pub max_compute_shared_memory_size: u32,
}

impl Default for DeviceLimits {
    /// Baseline limits every conformant device must reach.
    fn default() -> Self {
        Self {
            max_image_dimension_1d: 4096,
            max_image_dimension_2d: 4096,
            max_image_dimension_3d: 256,
            max_framebuffer_width: 4096,
            max_framebuffer_height: 4096,
            max_bound_descriptor_sets: 4,
            max_compute_work_group_count: [65_535, 65_535, 65_535],
            max_compute_shared_memory_size: 16_384,
        }
    }
}

/// Image extent in texels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent3d {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent3d {
    #[must_use]
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self { width, height, depth }
    }

    /// Inclusive per-axis containment: an extent exactly equal to the
    /// maximum fits.
    #[must_use]
    pub const fn fits_within(&self, max: &Self) -> bool {
        self.width <= max.width && self.height <= max.height && self.depth <= max.depth
    }
}

/// Dimensionality of an image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKind {
    D1,
    D2,
    D3,
}

/// Memory layout of an image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tiling {
    Optimal,
    Linear,
}

/// Pixel formats the snapshot layer knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    R8Unorm,
    Rgba8Unorm,
    Rgba8Srgb,
    Bgra8Unorm,
    Bgra8Srgb,
    Rgba16Sfloat,
    Rgba32Sfloat,
    R32Sfloat,
    R32Uint,
    D16Unorm,
    D32Sfloat,
    D24UnormS8Uint,
}

/// Key identifying one format-support question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatQuery {
    pub format: Format,
    pub kind: ImageKind,
    pub tiling: Tiling,
    pub usage: ImageUsage,
}

/// What the device reported for one supported format configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFormatCaps {
    pub max_extent: Extent3d,
    pub max_mip_levels: u32,
    pub max_array_layers: u32,
    pub sample_counts: SampleCounts,
    pub max_resource_size: u64,
}

/// A format configuration the device supports, with its capabilities.
///
/// `usage` is the supported usage set; a query matches when format, kind,
/// and tiling are equal and the queried usage is a subset of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatProfile {
    pub format: Format,
    pub kind: ImageKind,
    pub tiling: Tiling,
    pub usage: ImageUsage,
    pub caps: ImageFormatCaps,
}

/// Read-only capability snapshot of one candidate device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCatalog {
    /// Device name as reported by the driver.
    pub name: String,
    pub device_class: DeviceClass,
    /// Queue families in enumeration order; the ordinal position is the
    /// family identifier everywhere else in the crate.
    pub families: Vec<FamilyInfo>,
    pub features: DeviceFeatures,
    pub limits: DeviceLimits,
    /// Answers to the format queries captured at snapshot time. An absent
    /// entry means the device rejected the query.
    pub formats: Vec<FormatProfile>,
}

impl DeviceCatalog {
    /// Look up the snapshot's answer to a format-support question.
    ///
    /// Returns `None` when the configuration was unsupported (or never
    /// queried), which the checker treats as a format failure.
    #[must_use]
    pub fn format_caps(&self, query: &FormatQuery) -> Option<&ImageFormatCaps> {
        self.formats
            .iter()
            .find(|p| {
                p.format == query.format
                    && p.kind == query.kind
                    && p.tiling == query.tiling
                    && p.usage.contains(query.usage)
            })
            .map(|p| &p.caps)
    }

    /// Count of distinct capability bits exposed across all families.
    ///
    /// The scorer's queue-diversity term: a device whose families together
    /// cover graphics, compute, and transfer scores higher than one
    /// exposing graphics alone.
    #[must_use]
    pub fn queue_diversity(&self) -> u32 {
        self.families
            .iter()
            .fold(QueueFlags::empty(), |acc, f| acc | f.flags)
            .bit_count()
    }

    /// Serialize to pretty JSON for snapshot persistence.
    ///
    /// # Errors
    ///
    /// Returns `Err` if JSON serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot produced by [`Self::to_json`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not a valid catalog snapshot.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for DeviceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} families",
            self.name,
            self.device_class,
            self.families.len()
        )
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn color_profile() -> FormatProfile {
        FormatProfile {
            format: Format::Bgra8Srgb,
            kind: ImageKind::D2,
            tiling: Tiling::Optimal,
            usage: ImageUsage::COLOR_ATTACHMENT | ImageUsage::SAMPLED,
            caps: ImageFormatCaps {
                max_extent: Extent3d::new(16_384, 16_384, 1),
                max_mip_levels: 15,
                max_array_layers: 2048,
                sample_counts: SampleCounts::X1 | SampleCounts::X4,
                max_resource_size: 1 << 31,
            },
        }
    }

    fn test_catalog() -> DeviceCatalog {
        DeviceCatalog {
            name: String::from("Test GPU"),
            device_class: DeviceClass::DiscreteGpu,
            families: vec![
                FamilyInfo::new(QueueFlags::GRAPHICS | QueueFlags::COMPUTE, 2),
                FamilyInfo::new(QueueFlags::TRANSFER, 1),
            ],
            features: DeviceFeatures::default(),
            limits: DeviceLimits::default(),
            formats: vec![color_profile()],
        }
    }

    #[test]
    fn format_lookup_requires_usage_subset() {
        let catalog = test_catalog();
        let mut query = FormatQuery {
            format: Format::Bgra8Srgb,
            kind: ImageKind::D2,
            tiling: Tiling::Optimal,
            usage: ImageUsage::COLOR_ATTACHMENT,
        };
        assert!(catalog.format_caps(&query).is_some());

        query.usage = ImageUsage::COLOR_ATTACHMENT | ImageUsage::STORAGE;
        assert!(catalog.format_caps(&query).is_none(), "STORAGE is not in the profile");
    }

    #[test]
    fn format_lookup_is_exact_on_tiling() {
        let catalog = test_catalog();
        let query = FormatQuery {
            format: Format::Bgra8Srgb,
            kind: ImageKind::D2,
            tiling: Tiling::Linear,
            usage: ImageUsage::SAMPLED,
        };
        assert!(catalog.format_caps(&query).is_none());
    }

    #[test]
    fn queue_diversity_counts_distinct_bits() {
        let catalog = test_catalog();
        // graphics | compute | transfer across both families.
        assert_eq!(catalog.queue_diversity(), 3);
    }

    #[test]
    fn feature_vector_true_only_semantics() {
        let reported = DeviceFeatures { shader_float64: true, ..DeviceFeatures::default() };
        let wants_f64 = DeviceFeatures { shader_float64: true, ..DeviceFeatures::default() };
        let wants_geometry = DeviceFeatures { geometry_shader: true, ..DeviceFeatures::default() };

        assert!(reported.supports(&wants_f64));
        assert!(reported.supports(&DeviceFeatures::default()), "nothing demanded");
        assert!(!reported.supports(&wants_geometry));
        assert_eq!(reported.first_missing(&wants_geometry), Some("geometry_shader"));
    }

    #[test]
    fn extent_containment_is_inclusive() {
        let max = Extent3d::new(4096, 4096, 1);
        assert!(Extent3d::new(4096, 4096, 1).fits_within(&max));
        assert!(Extent3d::new(0, 0, 0).fits_within(&max));
        assert!(!Extent3d::new(4097, 1, 1).fits_within(&max));
    }

    #[test]
    fn display_shows_name_class_and_family_count() {
        let s = test_catalog().to_string();
        assert!(s.contains("Test GPU"));
        assert!(s.contains("discrete"));
        assert!(s.contains("2 families"));
    }

    #[test]
    fn json_round_trip() {
        let catalog = test_catalog();
        let json = catalog.to_json().expect("serialize");
        let back = DeviceCatalog::from_json(&json).expect("deserialize");
        assert_eq!(catalog, back);
    }
}
