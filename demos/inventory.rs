// SPDX-License-Identifier: AGPL-3.0-only

//! Judge a reference fleet of device snapshots: verdicts, scores, and the
//! winning queue assignment.
//!
//! The fleet here is hand-written plain data so the demo runs anywhere;
//! live snapshots come from `probe::enumerate_catalogs` against a
//! caller-owned Vulkan instance and feed the exact same pipeline.

use hotspring_assay::catalog::{
    DeviceCatalog, DeviceClass, DeviceFeatures, DeviceLimits, Extent3d, FamilyInfo, Format,
    FormatProfile, ImageFormatCaps, ImageKind, SurfaceId, Tiling,
};
use hotspring_assay::flags::{ImageUsage, QueueFlags, SampleCounts};
use hotspring_assay::requirements::profiles;
use hotspring_assay::score::score_device;
use hotspring_assay::select::select_device;
use hotspring_assay::suitability::check_device;

const WINDOW: SurfaceId = SurfaceId(1);

fn swapchain_profile() -> FormatProfile {
    FormatProfile {
        format: Format::Bgra8Srgb,
        kind: ImageKind::D2,
        tiling: Tiling::Optimal,
        usage: ImageUsage::COLOR_ATTACHMENT | ImageUsage::TRANSFER_DST,
        caps: ImageFormatCaps {
            max_extent: Extent3d::new(16_384, 16_384, 1),
            max_mip_levels: 15,
            max_array_layers: 2048,
            sample_counts: SampleCounts::X1 | SampleCounts::X4 | SampleCounts::X8,
            max_resource_size: 1 << 32,
        },
    }
}

fn discrete_card() -> DeviceCatalog {
    let mut graphics = FamilyInfo::new(
        QueueFlags::GRAPHICS | QueueFlags::COMPUTE | QueueFlags::TRANSFER,
        16,
    );
    graphics.present_targets.push(WINDOW);
    DeviceCatalog {
        name: String::from("Titan V"),
        device_class: DeviceClass::DiscreteGpu,
        families: vec![
            graphics,
            FamilyInfo::new(QueueFlags::TRANSFER, 2),
            FamilyInfo::new(QueueFlags::COMPUTE | QueueFlags::TRANSFER, 8),
        ],
        features: DeviceFeatures {
            sampler_anisotropy: true,
            shader_float64: true,
            geometry_shader: true,
            ..DeviceFeatures::default()
        },
        limits: DeviceLimits {
            max_image_dimension_2d: 32_768,
            max_image_dimension_3d: 16_384,
            max_framebuffer_width: 32_768,
            max_framebuffer_height: 32_768,
            max_bound_descriptor_sets: 32,
            max_compute_shared_memory_size: 49_152,
            ..DeviceLimits::default()
        },
        formats: vec![swapchain_profile()],
    }
}

fn integrated_part() -> DeviceCatalog {
    let mut unified = FamilyInfo::new(
        QueueFlags::GRAPHICS | QueueFlags::COMPUTE | QueueFlags::TRANSFER,
        1,
    );
    unified.present_targets.push(WINDOW);
    DeviceCatalog {
        name: String::from("Iris Xe"),
        device_class: DeviceClass::IntegratedGpu,
        families: vec![unified],
        features: DeviceFeatures { sampler_anisotropy: true, ..DeviceFeatures::default() },
        limits: DeviceLimits::default(),
        formats: vec![swapchain_profile()],
    }
}

fn software_rasterizer() -> DeviceCatalog {
    DeviceCatalog {
        name: String::from("llvmpipe"),
        device_class: DeviceClass::Cpu,
        families: vec![FamilyInfo::new(QueueFlags::GRAPHICS | QueueFlags::COMPUTE | QueueFlags::TRANSFER, 1)],
        features: DeviceFeatures::default(),
        limits: DeviceLimits::default(),
        formats: vec![],
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let fleet = vec![discrete_card(), integrated_part(), software_rasterizer()];
    let requirements = profiles::presentation(WINDOW);

    println!("═══ Device Inventory ═══════════════════════════════════════");
    for (i, device) in fleet.iter().enumerate() {
        println!("  [{i}] {device}");
        for (f, family) in device.families.iter().enumerate() {
            println!(
                "      family {f}: {:?} ×{}  present: {}",
                family.flags,
                family.capacity,
                if family.present_targets.is_empty() { "no" } else { "yes" }
            );
        }
    }

    println!();
    println!("═══ Suitability & Scores ═══════════════════════════════════");
    for device in &fleet {
        let verdict = check_device(device, &requirements);
        if verdict.is_suitable() {
            println!("  ✓ {:20} score {}", device.name, score_device(device));
        } else {
            println!("  ✗ {:20} {verdict}", device.name);
        }
    }

    println!();
    println!("═══ Selection ══════════════════════════════════════════════");
    match select_device(&fleet, &requirements) {
        Ok(selection) => {
            println!("  winner: {} (score {})", selection.device.name, selection.score);
            for (request, assignment) in selection.assignments.iter() {
                match assignment {
                    Some(a) => println!(
                        "    request {request} → family {} slot {} (priority {})",
                        a.family, a.slot, a.priority
                    ),
                    None => println!("    request {request} → UNASSIGNED"),
                }
            }

            println!();
            println!("═══ Snapshot JSON ══════════════════════════════════════════");
            match selection.device.to_json() {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("  snapshot serialization failed: {e}"),
            }
        }
        Err(e) => eprintln!("  selection failed: {e}"),
    }
}
