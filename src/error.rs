// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for device selection and assignment.
//!
//! Every failure is a value callers can pattern-match on; nothing in this
//! crate panics or retries. `DeviceCreation` is the designated wrapper for
//! the downstream collaborator's device-construction failure — assay never
//! constructs a device itself, so callers `map_err` their creation error
//! into it and get one error type for the whole initialization path.

use crate::select::Rejection;
use std::fmt;

/// Errors arising from device enumeration, selection, or assignment.
#[derive(Debug)]
pub enum AssayError {
    /// No candidate device passed the constraint checker. Carries the
    /// per-candidate verdicts for diagnostics.
    NoSuitableDevice {
        rejections: Vec<Rejection>,
    },

    /// One or more queue requests found no viable family. Carries the
    /// request indices left unassigned.
    PartialAssignment {
        unassigned: Vec<usize>,
    },

    /// Downstream device construction failed after selection (wraps the
    /// underlying error message, propagated opaquely).
    DeviceCreation(String),

    /// Candidate enumeration or lookup failed (native query error, or an
    /// override naming no enumerated device).
    Enumeration(String),
}

impl fmt::Display for AssayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuitableDevice { rejections } => {
                write!(f, "No device satisfies the requirements")?;
                for r in rejections {
                    write!(f, "; {}: {}", r.device, r.verdict)?;
                }
                Ok(())
            }
            Self::PartialAssignment { unassigned } => {
                write!(f, "Queue requests left unassigned: {unassigned:?}")
            }
            Self::DeviceCreation(e) => write!(f, "Failed to create device: {e}"),
            Self::Enumeration(e) => write!(f, "Device enumeration failed: {e}"),
        }
    }
}

impl std::error::Error for AssayError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suitability::Suitability;

    #[test]
    fn display_no_suitable_device_lists_rejections() {
        let err = AssayError::NoSuitableDevice {
            rejections: vec![Rejection {
                device: String::from("llvmpipe"),
                verdict: Suitability::UnsatisfiedFeatures,
            }],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("No device satisfies the requirements"));
        assert!(msg.contains("llvmpipe"));
        assert!(msg.contains("feature requirements"));
    }

    #[test]
    fn display_no_suitable_device_without_candidates() {
        let err = AssayError::NoSuitableDevice { rejections: vec![] };
        assert_eq!(err.to_string(), "No device satisfies the requirements");
    }

    #[test]
    fn display_partial_assignment() {
        let err = AssayError::PartialAssignment { unassigned: vec![2] };
        assert_eq!(err.to_string(), "Queue requests left unassigned: [2]");
    }

    #[test]
    fn display_device_creation() {
        let err = AssayError::DeviceCreation("out of host memory".into());
        assert_eq!(err.to_string(), "Failed to create device: out of host memory");
    }

    #[test]
    fn display_enumeration() {
        let err = AssayError::Enumeration("initialization failed".into());
        assert_eq!(err.to_string(), "Device enumeration failed: initialization failed");
    }

    #[test]
    fn error_trait_works() {
        let err = AssayError::DeviceCreation("lost".into());
        let dyn_err: &dyn std::error::Error = &err;
        assert!(dyn_err.to_string().contains("lost"));
    }
}
