//! Voxel encodings and the GPU storage formats they are promoted to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VolumeInfoError};

/// Encoding of a single voxel as stored on disk or held in memory.
///
/// The discriminants are the tags loaders read from volume headers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VoxelFormat {
    /// 8-bit unsigned integer.
    #[default]
    UnsignedChar8 = 0,
    /// 8-bit signed integer.
    SignedChar8 = 1,
    /// 16-bit unsigned integer.
    UnsignedShort16 = 2,
    /// 16-bit signed integer.
    SignedShort16 = 3,
    /// 32-bit unsigned integer.
    UnsignedInt32 = 4,
    /// 32-bit signed integer.
    SignedInt32 = 5,
    /// 32-bit IEEE float.
    Float32 = 6,
}

impl VoxelFormat {
    /// Every voxel format, in tag order.
    pub const ALL: [VoxelFormat; 7] = [
        VoxelFormat::UnsignedChar8,
        VoxelFormat::SignedChar8,
        VoxelFormat::UnsignedShort16,
        VoxelFormat::SignedShort16,
        VoxelFormat::UnsignedInt32,
        VoxelFormat::SignedInt32,
        VoxelFormat::Float32,
    ];

    /// Number of bytes one voxel occupies in this encoding.
    pub const fn byte_size(self) -> usize {
        match self {
            VoxelFormat::UnsignedChar8 | VoxelFormat::SignedChar8 => 1,
            VoxelFormat::UnsignedShort16 | VoxelFormat::SignedShort16 => 2,
            VoxelFormat::UnsignedInt32 | VoxelFormat::SignedInt32 | VoxelFormat::Float32 => 4,
        }
    }

    /// Whether the encoding can represent negative values.
    pub const fn is_signed(self) -> bool {
        match self {
            VoxelFormat::SignedChar8
            | VoxelFormat::SignedShort16
            | VoxelFormat::SignedInt32
            | VoxelFormat::Float32 => true,
            VoxelFormat::UnsignedChar8
            | VoxelFormat::UnsignedShort16
            | VoxelFormat::UnsignedInt32 => false,
        }
    }

    /// Whether the encoding is floating point.
    pub const fn is_float(self) -> bool {
        matches!(self, VoxelFormat::Float32)
    }

    /// The texture format a volume in this encoding is allocated as.
    ///
    /// There is no 32-bit integer texture path, so both 32-bit integer
    /// encodings are promoted to float storage.
    pub const fn storage_format(self) -> StorageFormat {
        match self {
            VoxelFormat::UnsignedChar8 | VoxelFormat::SignedChar8 => StorageFormat::R8Unorm,
            VoxelFormat::UnsignedShort16 | VoxelFormat::SignedShort16 => StorageFormat::R16Unorm,
            VoxelFormat::UnsignedInt32 | VoxelFormat::SignedInt32 | VoxelFormat::Float32 => {
                StorageFormat::R32Float
            }
        }
    }

    /// Header tag of this format.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Variant name, used by `Display`.
    pub const fn name(self) -> &'static str {
        match self {
            VoxelFormat::UnsignedChar8 => "UnsignedChar8",
            VoxelFormat::SignedChar8 => "SignedChar8",
            VoxelFormat::UnsignedShort16 => "UnsignedShort16",
            VoxelFormat::SignedShort16 => "SignedShort16",
            VoxelFormat::UnsignedInt32 => "UnsignedInt32",
            VoxelFormat::SignedInt32 => "SignedInt32",
            VoxelFormat::Float32 => "Float32",
        }
    }
}

// ALL must list every variant; the last tag closes the range.
const _: () = assert!(VoxelFormat::ALL.len() == VoxelFormat::Float32 as usize + 1);

impl TryFrom<u8> for VoxelFormat {
    type Error = VolumeInfoError;

    fn try_from(tag: u8) -> Result<Self> {
        VoxelFormat::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or(VolumeInfoError::UnknownVoxelFormat(tag))
    }
}

impl fmt::Display for VoxelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-channel texture formats a volume can be stored in on the GPU.
///
/// Names follow the wgpu texture formats of the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageFormat {
    /// 8-bit normalized unsigned.
    R8Unorm,
    /// 16-bit normalized unsigned.
    R16Unorm,
    /// 32-bit float.
    R32Float,
}

impl StorageFormat {
    /// Bytes one texel takes in this format.
    pub const fn bytes_per_texel(self) -> usize {
        match self {
            StorageFormat::R8Unorm => 1,
            StorageFormat::R16Unorm => 2,
            StorageFormat::R32Float => 4,
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageFormat::R8Unorm => "R8Unorm",
            StorageFormat::R16Unorm => "R16Unorm",
            StorageFormat::R32Float => "R32Float",
        };
        f.write_str(name)
    }
}

/// Bytes per voxel of `format`.
pub fn voxel_format_byte_size(format: VoxelFormat) -> usize {
    format.byte_size()
}

/// Whether `format` is signed. Float counts as signed.
pub fn is_voxel_format_signed(format: VoxelFormat) -> bool {
    format.is_signed()
}

/// Storage format `format` is promoted to on upload.
pub fn voxel_format_to_storage_format(format: VoxelFormat) -> StorageFormat {
    format.storage_format()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_sizes() {
        assert_eq!(VoxelFormat::UnsignedChar8.byte_size(), 1);
        assert_eq!(VoxelFormat::SignedChar8.byte_size(), 1);
        assert_eq!(VoxelFormat::UnsignedShort16.byte_size(), 2);
        assert_eq!(VoxelFormat::SignedShort16.byte_size(), 2);
        assert_eq!(VoxelFormat::UnsignedInt32.byte_size(), 4);
        assert_eq!(VoxelFormat::SignedInt32.byte_size(), 4);
        assert_eq!(VoxelFormat::Float32.byte_size(), 4);
    }

    #[test]
    fn test_signedness() {
        assert!(!VoxelFormat::UnsignedChar8.is_signed());
        assert!(!VoxelFormat::UnsignedShort16.is_signed());
        assert!(!VoxelFormat::UnsignedInt32.is_signed());
        assert!(VoxelFormat::SignedChar8.is_signed());
        assert!(VoxelFormat::SignedShort16.is_signed());
        assert!(VoxelFormat::SignedInt32.is_signed());
        assert!(VoxelFormat::Float32.is_signed());
    }

    #[test]
    fn test_float32_traits() {
        assert_eq!(voxel_format_byte_size(VoxelFormat::Float32), 4);
        assert!(is_voxel_format_signed(VoxelFormat::Float32));
        assert!(VoxelFormat::Float32.is_float());
        assert!(!VoxelFormat::SignedInt32.is_float());
    }

    #[test]
    fn test_storage_format_policy() {
        use StorageFormat::{R16Unorm, R32Float, R8Unorm};

        let expected = [R8Unorm, R8Unorm, R16Unorm, R16Unorm, R32Float, R32Float, R32Float];
        for (format, storage) in VoxelFormat::ALL.into_iter().zip(expected) {
            assert_eq!(voxel_format_to_storage_format(format), storage, "{format}");
        }
    }

    #[test]
    fn test_storage_never_narrower_than_source() {
        for format in VoxelFormat::ALL {
            assert!(format.storage_format().bytes_per_texel() >= format.byte_size());
        }
    }

    #[test]
    fn test_tag_conversion() {
        for format in VoxelFormat::ALL {
            assert_eq!(VoxelFormat::try_from(format.tag()), Ok(format));
        }
        assert_eq!(
            VoxelFormat::try_from(7),
            Err(VolumeInfoError::UnknownVoxelFormat(7))
        );
        assert_eq!(
            VoxelFormat::try_from(255),
            Err(VolumeInfoError::UnknownVoxelFormat(255))
        );
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(VoxelFormat::default(), VoxelFormat::UnsignedChar8);
        assert_eq!(VoxelFormat::SignedShort16.to_string(), "SignedShort16");
        assert_eq!(StorageFormat::R16Unorm.to_string(), "R16Unorm");
    }
}
