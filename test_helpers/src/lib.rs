//! Test doubles shared across crates in the workspace.
//!
//! The [`recording`] module provides targets that record every call a commit
//! makes; [`probes`] provides deterministic platform and directory probes.

pub mod probes;
pub mod recording;

pub use probes::{FixedDirectories, FixedPlatform};
pub use recording::{Call, RecordingProvisioner, RecordingTarget};
