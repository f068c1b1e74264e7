//! Error types for volume-info.

use thiserror::Error;

/// The main error type for volume metadata construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolumeInfoError {
    /// A voxel format tag outside the known range.
    #[error("unknown voxel format tag {0}")]
    UnknownVoxelFormat(u8),

    /// The loader never supplied a required field.
    #[error("volume info field '{0}' was not set")]
    MissingField(&'static str),

    /// A voxel count below zero.
    #[error("dimension along {axis} is negative: {value}")]
    NegativeDimension { axis: char, value: i32 },

    /// A voxel spacing that is negative or not finite.
    #[error("spacing along {axis} is invalid: {value}")]
    InvalidSpacing { axis: char, value: f32 },

    /// Value range bounds that are NaN or infinite.
    #[error("value range [{min}, {max}] is not finite")]
    NonFiniteValueRange { min: f32, max: f32 },

    /// Value range with the minimum above the maximum.
    #[error("value range is inverted: min {min} > max {max}")]
    InvertedValueRange { min: f32, max: f32 },

    /// A compressed payload size below zero.
    #[error("compressed byte size is negative: {0}")]
    InvalidCompressedSize(i32),
}

/// A specialized Result type for volume-info operations.
pub type Result<T> = std::result::Result<T, VolumeInfoError>;
