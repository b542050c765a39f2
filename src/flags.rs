// SPDX-License-Identifier: AGPL-3.0-only

//! Typed capability sets for queue families, image usage, and sample counts.
//!
//! Bit values mirror the native Vulkan encodings exactly, so a snapshot
//! round-trips through the probe layer without translation loss. Set
//! comparisons go through named operations (`contains` for the superset
//! test, `intersection`, [`QueueFlags::bit_count`]) rather than raw
//! integer arithmetic.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Operation classes a queue family can perform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct QueueFlags: u32 {
        const GRAPHICS       = 0x1;
        const COMPUTE        = 0x2;
        const TRANSFER       = 0x4;
        const SPARSE_BINDING = 0x8;
    }
}

bitflags::bitflags! {
    /// Ways an image may be used, matching the native usage encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ImageUsage: u32 {
        const TRANSFER_SRC             = 0x01;
        const TRANSFER_DST             = 0x02;
        const SAMPLED                  = 0x04;
        const STORAGE                  = 0x08;
        const COLOR_ATTACHMENT         = 0x10;
        const DEPTH_STENCIL_ATTACHMENT = 0x20;
    }
}

bitflags::bitflags! {
    /// Supported (or requested) multisample counts, one bit per count.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SampleCounts: u32 {
        const X1  = 0x01;
        const X2  = 0x02;
        const X4  = 0x04;
        const X8  = 0x08;
        const X16 = 0x10;
        const X32 = 0x20;
        const X64 = 0x40;
    }
}

impl QueueFlags {
    /// Number of set capability bits.
    ///
    /// The family matcher prefers the candidate with the fewest set bits
    /// (the most specific family), so this is its ranking key.
    #[must_use]
    pub const fn bit_count(self) -> u32 {
        self.bits().count_ones()
    }
}
