// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: constraint checker ordering and boundary pins.
//!
//! The boundary tests pin the inclusive-comparison decision recorded in
//! DESIGN.md: a reported maximum exactly equal to a requested minimum is
//! accepted, for format capabilities and numeric limits alike.

use hotspring_assay::catalog::{
    DeviceCatalog, DeviceClass, DeviceFeatures, DeviceLimits, Extent3d, FamilyInfo, Format,
    FormatProfile, ImageFormatCaps, ImageKind, Tiling,
};
use hotspring_assay::flags::{ImageUsage, QueueFlags, SampleCounts};
use hotspring_assay::requirements::{
    DeviceRequirements, FormatRequirement, LimitRequirements, QueueRequest,
};
use hotspring_assay::suitability::{check_device, Suitability};

const MAX_EXTENT: Extent3d = Extent3d { width: 8192, height: 8192, depth: 1 };
const MAX_MIPS: u32 = 14;
const MAX_LAYERS: u32 = 256;
const MAX_RESOURCE: u64 = 1 << 30;

fn fixture_catalog() -> DeviceCatalog {
    DeviceCatalog {
        name: String::from("fixture"),
        device_class: DeviceClass::DiscreteGpu,
        families: vec![FamilyInfo::new(
            QueueFlags::GRAPHICS | QueueFlags::COMPUTE | QueueFlags::TRANSFER,
            2,
        )],
        features: DeviceFeatures { sampler_anisotropy: true, ..DeviceFeatures::default() },
        limits: DeviceLimits {
            max_image_dimension_1d: 4096,
            max_image_dimension_2d: 8192,
            max_image_dimension_3d: 512,
            ..DeviceLimits::default()
        },
        formats: vec![FormatProfile {
            format: Format::Rgba8Unorm,
            kind: ImageKind::D2,
            tiling: Tiling::Optimal,
            usage: ImageUsage::SAMPLED,
            caps: ImageFormatCaps {
                max_extent: MAX_EXTENT,
                max_mip_levels: MAX_MIPS,
                max_array_layers: MAX_LAYERS,
                sample_counts: SampleCounts::X1 | SampleCounts::X4,
                max_resource_size: MAX_RESOURCE,
            },
        }],
    }
}

fn sampled_format() -> FormatRequirement {
    FormatRequirement::new(Format::Rgba8Unorm, ImageKind::D2, Tiling::Optimal, ImageUsage::SAMPLED)
}

#[test]
fn queue_category_masks_all_later_failures() {
    // Queues, formats, features, and limits are all unsatisfiable; only
    // the queue category may be reported.
    let requirements = DeviceRequirements {
        queues: vec![QueueRequest::new(QueueFlags::GRAPHICS); 3],
        formats: vec![FormatRequirement::new(
            Format::R32Uint,
            ImageKind::D3,
            Tiling::Linear,
            ImageUsage::STORAGE,
        )],
        features: DeviceFeatures { wide_lines: true, ..DeviceFeatures::default() },
        limits: LimitRequirements { minimum_1d_texture_size: u32::MAX, ..LimitRequirements::default() },
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::UnsatisfiedQueues);
}

#[test]
fn format_category_masks_feature_and_limit_failures() {
    let requirements = DeviceRequirements {
        formats: vec![FormatRequirement::new(
            Format::R32Uint,
            ImageKind::D3,
            Tiling::Linear,
            ImageUsage::STORAGE,
        )],
        features: DeviceFeatures { wide_lines: true, ..DeviceFeatures::default() },
        limits: LimitRequirements { minimum_1d_texture_size: u32::MAX, ..LimitRequirements::default() },
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::UnsatisfiedFormats);
}

#[test]
fn feature_category_masks_limit_failures() {
    let requirements = DeviceRequirements {
        features: DeviceFeatures { wide_lines: true, ..DeviceFeatures::default() },
        limits: LimitRequirements { minimum_1d_texture_size: u32::MAX, ..LimitRequirements::default() },
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::UnsatisfiedFeatures);
}

#[test]
fn exact_equal_format_maxima_are_accepted() {
    let requirements = DeviceRequirements {
        formats: vec![FormatRequirement {
            min_extent: MAX_EXTENT,
            min_mip_levels: MAX_MIPS,
            min_array_layers: MAX_LAYERS,
            min_resource_size: MAX_RESOURCE,
            ..sampled_format()
        }],
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::Suitable);
}

#[test]
fn one_past_each_format_maximum_is_rejected() {
    let past_maximum: [FormatRequirement; 4] = [
        FormatRequirement {
            min_extent: Extent3d::new(MAX_EXTENT.width + 1, 1, 1),
            ..sampled_format()
        },
        FormatRequirement { min_mip_levels: MAX_MIPS + 1, ..sampled_format() },
        FormatRequirement { min_array_layers: MAX_LAYERS + 1, ..sampled_format() },
        FormatRequirement { min_resource_size: MAX_RESOURCE + 1, ..sampled_format() },
    ];
    for requirement in past_maximum {
        let requirements = DeviceRequirements {
            formats: vec![requirement],
            ..DeviceRequirements::default()
        };
        assert_eq!(
            check_device(&fixture_catalog(), &requirements),
            Suitability::UnsatisfiedFormats
        );
    }
}

#[test]
fn exact_equal_limits_are_accepted() {
    let requirements = DeviceRequirements {
        limits: LimitRequirements {
            minimum_1d_texture_size: 4096,
            minimum_2d_texture_size: 8192,
            minimum_3d_texture_size: 512,
        },
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::Suitable);
}

#[test]
fn one_past_a_limit_is_rejected() {
    let requirements = DeviceRequirements {
        limits: LimitRequirements { minimum_3d_texture_size: 513, ..LimitRequirements::default() },
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::UnsatisfiedLimits);
}

#[test]
fn requesting_a_feature_the_device_has_passes() {
    let requirements = DeviceRequirements {
        features: DeviceFeatures { sampler_anisotropy: true, ..DeviceFeatures::default() },
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::Suitable);
}

#[test]
fn extra_device_features_never_hurt() {
    // The device reports anisotropy, the requirements leave it false:
    // "don't care", not "must be absent".
    assert_eq!(
        check_device(&fixture_catalog(), &DeviceRequirements::default()),
        Suitability::Suitable
    );
}

#[test]
fn unqueried_format_configuration_fails_formats() {
    let requirements = DeviceRequirements {
        formats: vec![FormatRequirement::new(
            Format::Rgba8Unorm,
            ImageKind::D2,
            Tiling::Linear, // profile is Optimal
            ImageUsage::SAMPLED,
        )],
        ..DeviceRequirements::default()
    };
    assert_eq!(check_device(&fixture_catalog(), &requirements), Suitability::UnsatisfiedFormats);
}
