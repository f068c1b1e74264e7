//! Metadata and value model for volumetric datasets.
//!
//! This crate describes a 3-D scalar volume (CT, MRI, simulation output)
//! after a loader has read its header and before a renderer uploads it:
//! - [`VoxelFormat`] and the [`StorageFormat`] each encoding is promoted to
//! - [`WindowingParameters`] for the initial display window
//! - [`VolumeInfo`], with voxel counts, byte sizes, and value normalization
//! - [`VolumeInfoBuilder`] for validated construction
//!
//! # Example
//!
//! ```
//! use volume_info::*;
//!
//! fn main() -> Result<()> {
//!     let info = VolumeInfoBuilder::new("head.raw")
//!         .format(VoxelFormat::SignedShort16)
//!         .dimensions(IVec3::new(512, 512, 300))
//!         .spacing(Vec3::new(0.5, 0.5, 1.0))
//!         .value_range(-1000.0, 3000.0)
//!         .build()?;
//!
//!     assert_eq!(info.byte_size(), 512 * 512 * 300 * 2);
//!     assert_eq!(info.normalize_value(1000.0), 0.5);
//!     Ok(())
//! }
//! ```

// Documentation lints - accessors don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
// VolumeInfo carries one flag per header property
#![allow(clippy::struct_excessive_bools)]

pub mod builder;
pub mod error;
pub mod volume;
pub mod voxel_format;
pub mod windowing;

pub use builder::VolumeInfoBuilder;
pub use error::{Result, VolumeInfoError};
pub use volume::{VolumeInfo, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE};
pub use voxel_format::{
    is_voxel_format_signed, voxel_format_byte_size, voxel_format_to_storage_format,
    StorageFormat, VoxelFormat,
};
pub use windowing::{WindowingParameters, WindowingUniforms};

// Re-export glam types for convenience
pub use glam::{IVec3, Vec3, Vec4};
