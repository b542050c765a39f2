// SPDX-License-Identifier: AGPL-3.0-only

//! Native snapshot layer — build catalogs from a live Vulkan instance.
//!
//! This is the seam to the external API: read-only queries against an
//! instance the CALLER created and owns (instance lifecycle, device
//! creation, and surface plumbing all stay outside this crate). Each
//! physical device becomes a plain-data [`DeviceCatalog`]; everything
//! after the snapshot runs without touching the driver again.
//!
//! Format support is captured for the queries the caller names — a
//! snapshot answers exactly the questions it was asked at probe time.
//! Per-family presentation support is captured when the caller hands in
//! its surface handles with the surface extension loader.

use crate::catalog::{
    DeviceCatalog, DeviceClass, DeviceFeatures, DeviceLimits, Extent3d, FamilyInfo, Format,
    FormatProfile, FormatQuery, ImageFormatCaps, ImageKind, SurfaceId, Tiling,
};
use crate::error::AssayError;
use crate::flags::{QueueFlags, SampleCounts};
use ash::vk;

/// Presentation targets to capture per-family support for.
///
/// Pairs each opaque [`SurfaceId`] (the identifier requirements refer to)
/// with the live surface handle, plus the surface extension loader needed
/// to query it.
pub struct PresentProbe<'a> {
    pub loader: &'a ash::khr::surface::Instance,
    pub surfaces: &'a [(SurfaceId, vk::SurfaceKHR)],
}

/// Snapshot every physical device visible to `instance`.
///
/// # Errors
///
/// Returns [`AssayError::Enumeration`] when the native enumeration call
/// fails.
pub fn enumerate_catalogs(
    instance: &ash::Instance,
    format_queries: &[FormatQuery],
    present: Option<&PresentProbe<'_>>,
) -> Result<Vec<DeviceCatalog>, AssayError> {
    // SAFETY: `instance` is a live instance handle owned by the caller.
    let devices = unsafe { instance.enumerate_physical_devices() }
        .map_err(|e| AssayError::Enumeration(e.to_string()))?;

    let catalogs = devices
        .iter()
        .map(|&device| snapshot_device(instance, device, format_queries, present))
        .collect::<Vec<_>>();
    for catalog in &catalogs {
        tracing::debug!(device = %catalog, "snapshot captured");
    }
    Ok(catalogs)
}

/// Snapshot one physical device.
#[must_use]
pub fn snapshot_device(
    instance: &ash::Instance,
    device: vk::PhysicalDevice,
    format_queries: &[FormatQuery],
    present: Option<&PresentProbe<'_>>,
) -> DeviceCatalog {
    // SAFETY: `device` was enumerated from this live instance.
    let properties = unsafe { instance.get_physical_device_properties(device) };
    // SAFETY: same.
    let features = unsafe { instance.get_physical_device_features(device) };
    // SAFETY: same.
    let family_properties = unsafe { instance.get_physical_device_queue_family_properties(device) };

    let families = family_properties
        .iter()
        .enumerate()
        .map(|(index, props)| FamilyInfo {
            flags: QueueFlags::from_bits_truncate(props.queue_flags.as_raw()),
            capacity: props.queue_count,
            present_targets: present_targets(device, index, present),
        })
        .collect();

    DeviceCatalog {
        name: cstr_to_string(&properties.device_name),
        device_class: device_class(properties.device_type),
        families,
        features: convert_features(&features),
        limits: convert_limits(&properties.limits),
        formats: query_formats(instance, device, format_queries),
    }
}

/// Which of the probe's surfaces this family can present to.
fn present_targets(
    device: vk::PhysicalDevice,
    family_index: usize,
    present: Option<&PresentProbe<'_>>,
) -> Vec<SurfaceId> {
    let Some(probe) = present else {
        return Vec::new();
    };
    let family = u32::try_from(family_index).unwrap_or(u32::MAX);
    probe
        .surfaces
        .iter()
        .filter(|(_, surface)| {
            // SAFETY: surface handles and loader are alive for the probe;
            // a query error just means "not presentable here".
            unsafe {
                probe
                    .loader
                    .get_physical_device_surface_support(device, family, *surface)
            }
            .unwrap_or(false)
        })
        .map(|(id, _)| *id)
        .collect()
}

fn query_formats(
    instance: &ash::Instance,
    device: vk::PhysicalDevice,
    queries: &[FormatQuery],
) -> Vec<FormatProfile> {
    queries
        .iter()
        .filter_map(|query| {
            // SAFETY: read-only support query on an enumerated device. An
            // unsupported configuration returns an error, which becomes an
            // absent profile in the snapshot.
            let caps = unsafe {
                instance.get_physical_device_image_format_properties(
                    device,
                    vk_format(query.format),
                    vk_image_type(query.kind),
                    vk_tiling(query.tiling),
                    vk::ImageUsageFlags::from_raw(query.usage.bits()),
                    vk::ImageCreateFlags::empty(),
                )
            }
            .ok()?;

            Some(FormatProfile {
                format: query.format,
                kind: query.kind,
                tiling: query.tiling,
                usage: query.usage,
                caps: ImageFormatCaps {
                    max_extent: Extent3d::new(
                        caps.max_extent.width,
                        caps.max_extent.height,
                        caps.max_extent.depth,
                    ),
                    max_mip_levels: caps.max_mip_levels,
                    max_array_layers: caps.max_array_layers,
                    sample_counts: SampleCounts::from_bits_truncate(caps.sample_counts.as_raw()),
                    max_resource_size: caps.max_resource_size,
                },
            })
        })
        .collect()
}

fn device_class(device_type: vk::PhysicalDeviceType) -> DeviceClass {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => DeviceClass::DiscreteGpu,
        vk::PhysicalDeviceType::INTEGRATED_GPU => DeviceClass::IntegratedGpu,
        vk::PhysicalDeviceType::VIRTUAL_GPU => DeviceClass::VirtualGpu,
        vk::PhysicalDeviceType::CPU => DeviceClass::Cpu,
        _ => DeviceClass::Other,
    }
}

fn convert_features(f: &vk::PhysicalDeviceFeatures) -> DeviceFeatures {
    DeviceFeatures {
        robust_buffer_access: f.robust_buffer_access != vk::FALSE,
        full_draw_index_uint32: f.full_draw_index_uint32 != vk::FALSE,
        geometry_shader: f.geometry_shader != vk::FALSE,
        tessellation_shader: f.tessellation_shader != vk::FALSE,
        sampler_anisotropy: f.sampler_anisotropy != vk::FALSE,
        texture_compression_bc: f.texture_compression_bc != vk::FALSE,
        shader_float64: f.shader_float64 != vk::FALSE,
        shader_int64: f.shader_int64 != vk::FALSE,
        multi_viewport: f.multi_viewport != vk::FALSE,
        fill_mode_non_solid: f.fill_mode_non_solid != vk::FALSE,
        wide_lines: f.wide_lines != vk::FALSE,
        independent_blend: f.independent_blend != vk::FALSE,
    }
}

fn convert_limits(l: &vk::PhysicalDeviceLimits) -> DeviceLimits {
    DeviceLimits {
        max_image_dimension_1d: l.max_image_dimension1_d,
        max_image_dimension_2d: l.max_image_dimension2_d,
        max_image_dimension_3d: l.max_image_dimension3_d,
        max_framebuffer_width: l.max_framebuffer_width,
        max_framebuffer_height: l.max_framebuffer_height,
        max_bound_descriptor_sets: l.max_bound_descriptor_sets,
        max_compute_work_group_count: l.max_compute_work_group_count,
        max_compute_shared_memory_size: l.max_compute_shared_memory_size,
    }
}

fn vk_format(format: Format) -> vk::Format {
    match format {
        Format::R8Unorm => vk::Format::R8_UNORM,
        Format::Rgba8Unorm => vk::Format::R8G8B8A8_UNORM,
        Format::Rgba8Srgb => vk::Format::R8G8B8A8_SRGB,
        Format::Bgra8Unorm => vk::Format::B8G8R8A8_UNORM,
        Format::Bgra8Srgb => vk::Format::B8G8R8A8_SRGB,
        Format::Rgba16Sfloat => vk::Format::R16G16B16A16_SFLOAT,
        Format::Rgba32Sfloat => vk::Format::R32G32B32A32_SFLOAT,
        Format::R32Sfloat => vk::Format::R32_SFLOAT,
        Format::R32Uint => vk::Format::R32_UINT,
        Format::D16Unorm => vk::Format::D16_UNORM,
        Format::D32Sfloat => vk::Format::D32_SFLOAT,
        Format::D24UnormS8Uint => vk::Format::D24_UNORM_S8_UINT,
    }
}

fn vk_image_type(kind: ImageKind) -> vk::ImageType {
    match kind {
        ImageKind::D1 => vk::ImageType::TYPE_1D,
        ImageKind::D2 => vk::ImageType::TYPE_2D,
        ImageKind::D3 => vk::ImageType::TYPE_3D,
    }
}

fn vk_tiling(tiling: Tiling) -> vk::ImageTiling {
    match tiling {
        Tiling::Optimal => vk::ImageTiling::OPTIMAL,
        Tiling::Linear => vk::ImageTiling::LINEAR,
    }
}

/// NUL-terminated driver string to owned `String`, lossily.
fn cstr_to_string(raw: &[core::ffi::c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    if bytes.is_empty() {
        String::from("Unknown device")
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
