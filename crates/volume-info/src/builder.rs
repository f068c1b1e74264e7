//! Validated construction of [`VolumeInfo`] records.
//!
//! Loaders fill a [`VolumeInfoBuilder`] while reading a header. Every field
//! that describes the voxel data must be set explicitly, so a header that
//! was only partly understood fails in [`build`](VolumeInfoBuilder::build)
//! instead of producing a record full of zero defaults.

use glam::{IVec3, Vec3};

use crate::error::{Result, VolumeInfoError};
use crate::volume::{validate_dimensions, validate_spacing, validate_value_range, VolumeInfo};
use crate::voxel_format::VoxelFormat;
use crate::windowing::WindowingParameters;

/// Builder for a successfully parsed [`VolumeInfo`].
///
/// Required: original format, actual format, dimensions, spacing, and value
/// range. Optional: default windowing, normalization flag, compression.
#[derive(Debug, Clone)]
pub struct VolumeInfoBuilder {
    data_file_name: String,
    original_format: Option<VoxelFormat>,
    actual_format: Option<VoxelFormat>,
    dimensions: Option<IVec3>,
    spacing: Option<Vec3>,
    value_range: Option<(f32, f32)>,
    default_windowing_parameters: WindowingParameters,
    is_normalized: bool,
    compressed_byte_size: Option<i32>,
}

impl VolumeInfoBuilder {
    /// Starts a record for the named file.
    pub fn new(data_file_name: impl Into<String>) -> Self {
        Self {
            data_file_name: data_file_name.into(),
            original_format: None,
            actual_format: None,
            dimensions: None,
            spacing: None,
            value_range: None,
            default_windowing_parameters: WindowingParameters::default(),
            is_normalized: false,
            compressed_byte_size: None,
        }
    }

    /// Sets the on-disk voxel format.
    pub fn original_format(mut self, format: VoxelFormat) -> Self {
        self.original_format = Some(format);
        self
    }

    /// Sets the in-memory voxel format after conversion.
    pub fn actual_format(mut self, format: VoxelFormat) -> Self {
        self.actual_format = Some(format);
        self
    }

    /// Sets both formats when no conversion happens on load.
    pub fn format(self, format: VoxelFormat) -> Self {
        self.original_format(format).actual_format(format)
    }

    /// Sets the voxel counts per axis.
    pub fn dimensions(mut self, dimensions: IVec3) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Sets the voxel size in millimeters.
    pub fn spacing(mut self, spacing: Vec3) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Sets the original (pre-normalization) value range.
    pub fn value_range(mut self, min: f32, max: f32) -> Self {
        self.value_range = Some((min, max));
        self
    }

    /// Sets the windowing shown when the volume is first displayed.
    pub fn default_windowing(mut self, params: WindowingParameters) -> Self {
        self.default_windowing_parameters = params;
        self
    }

    /// Records whether voxel values were already rescaled to `[0, 1]`.
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.is_normalized = normalized;
        self
    }

    /// Marks the payload as compressed to `byte_size` bytes.
    pub fn compressed(mut self, byte_size: i32) -> Self {
        self.compressed_byte_size = Some(byte_size);
        self
    }

    /// Validates the collected fields and produces the record.
    pub fn build(self) -> Result<VolumeInfo> {
        let file_name = self.data_file_name.clone();
        self.try_build().map_err(|err| {
            log::warn!("rejected volume info for '{file_name}': {err}");
            err
        })
    }

    fn try_build(self) -> Result<VolumeInfo> {
        let original_format = self
            .original_format
            .ok_or(VolumeInfoError::MissingField("original_format"))?;
        let actual_format = self
            .actual_format
            .ok_or(VolumeInfoError::MissingField("actual_format"))?;
        let dimensions = self
            .dimensions
            .ok_or(VolumeInfoError::MissingField("dimensions"))?;
        let spacing = self
            .spacing
            .ok_or(VolumeInfoError::MissingField("spacing"))?;
        let (min_value, max_value) = self
            .value_range
            .ok_or(VolumeInfoError::MissingField("value_range"))?;

        validate_dimensions(dimensions)?;
        validate_spacing(spacing)?;
        validate_value_range(min_value, max_value)?;

        let compressed_byte_size = match self.compressed_byte_size {
            Some(size) if size < 0 => return Err(VolumeInfoError::InvalidCompressedSize(size)),
            Some(size) => size,
            None => 0,
        };

        let info = VolumeInfo {
            parse_succeeded: true,
            data_file_name: self.data_file_name,
            original_format,
            actual_format,
            dimensions,
            spacing,
            world_dimensions: dimensions.as_vec3() * spacing,
            default_windowing_parameters: self.default_windowing_parameters,
            is_normalized: self.is_normalized,
            min_value,
            max_value,
            is_compressed: self.compressed_byte_size.is_some(),
            compressed_byte_size,
        };
        log::debug!("assembled {info}");
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> VolumeInfoBuilder {
        VolumeInfoBuilder::new("knee.raw")
            .format(VoxelFormat::UnsignedShort16)
            .dimensions(IVec3::new(256, 256, 128))
            .spacing(Vec3::new(0.4, 0.4, 1.2))
            .value_range(0.0, 4095.0)
    }

    #[test]
    fn test_build_complete() {
        let info = complete().build().unwrap();
        assert!(info.is_usable());
        assert_eq!(info.data_file_name(), "knee.raw");
        assert_eq!(info.original_format(), VoxelFormat::UnsignedShort16);
        assert_eq!(info.actual_format(), VoxelFormat::UnsignedShort16);
        assert_eq!(
            info.world_dimensions(),
            Vec3::new(256.0 * 0.4, 256.0 * 0.4, 128.0 * 1.2)
        );
        assert_eq!(info.default_windowing_parameters(), WindowingParameters::default());
        assert!(!info.is_normalized());
        assert!(!info.is_compressed());
        assert_eq!(info.byte_size(), 256 * 256 * 128 * 2);
    }

    #[test]
    fn test_build_reports_missing_field() {
        let err = VolumeInfoBuilder::new("a.raw")
            .format(VoxelFormat::Float32)
            .dimensions(IVec3::ONE)
            .value_range(0.0, 1.0)
            .build()
            .unwrap_err();
        assert_eq!(err, VolumeInfoError::MissingField("spacing"));

        let err = VolumeInfoBuilder::new("a.raw")
            .actual_format(VoxelFormat::Float32)
            .build()
            .unwrap_err();
        assert_eq!(err, VolumeInfoError::MissingField("original_format"));
    }

    #[test]
    fn test_build_validates() {
        assert_eq!(
            complete().dimensions(IVec3::new(1, 1, -1)).build(),
            Err(VolumeInfoError::NegativeDimension { axis: 'z', value: -1 })
        );
        assert_eq!(
            complete().spacing(Vec3::new(-0.1, 1.0, 1.0)).build(),
            Err(VolumeInfoError::InvalidSpacing { axis: 'x', value: -0.1 })
        );
        assert_eq!(
            complete().value_range(10.0, 2.0).build(),
            Err(VolumeInfoError::InvertedValueRange { min: 10.0, max: 2.0 })
        );
        assert!(matches!(
            complete().value_range(0.0, f32::INFINITY).build(),
            Err(VolumeInfoError::NonFiniteValueRange { .. })
        ));
        // Finite bounds whose extent overflows f32.
        assert_eq!(
            complete().value_range(-3.0e38, 3.0e38).build(),
            Err(VolumeInfoError::NonFiniteValueRange {
                min: -3.0e38,
                max: 3.0e38
            })
        );
        assert_eq!(
            complete().compressed(-5).build(),
            Err(VolumeInfoError::InvalidCompressedSize(-5))
        );
    }

    #[test]
    fn test_build_optional_fields() {
        let windowing = WindowingParameters::new().with_center(40.0).with_width(400.0);
        let info = complete()
            .actual_format(VoxelFormat::Float32)
            .default_windowing(windowing)
            .normalized(true)
            .compressed(1024)
            .build()
            .unwrap();
        assert_eq!(info.original_format(), VoxelFormat::UnsignedShort16);
        assert_eq!(info.actual_format(), VoxelFormat::Float32);
        assert_eq!(info.default_windowing_parameters(), windowing);
        assert!(info.is_normalized());
        assert!(info.is_compressed());
        assert_eq!(info.byte_size(), 1024);
    }

    #[test]
    fn test_degenerate_range_is_accepted() {
        let info = complete().value_range(500.0, 500.0).build().unwrap();
        assert!(info.has_degenerate_range());
    }
}
