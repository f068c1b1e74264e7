//! The volume metadata record produced by loaders and read by renderers.

use std::fmt;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VolumeInfoError};
use crate::voxel_format::{StorageFormat, VoxelFormat};
use crate::windowing::WindowingParameters;

/// Default lower bound of the value range, in original units.
pub const DEFAULT_MIN_VALUE: f32 = -1000.0;
/// Default upper bound of the value range, in original units.
pub const DEFAULT_MAX_VALUE: f32 = 3000.0;

/// Metadata of a volume loaded from a volumetric data file.
///
/// Built by a loader through [`VolumeInfoBuilder`](crate::VolumeInfoBuilder),
/// or with [`VolumeInfo::failed`] when the header could not be parsed. Once
/// handed to rendering code the record is treated as read-only.
///
/// `world_dimensions` always equals `dimensions * spacing`; the setters for
/// either recompute it. Signedness and bytes per voxel are derived from
/// `actual_format`, never stored.
///
/// Deserialized records pass the same validation as the builder, and
/// `world_dimensions` is recomputed rather than read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VolumeInfoRecord")]
pub struct VolumeInfo {
    pub(crate) parse_succeeded: bool,
    pub(crate) data_file_name: String,
    pub(crate) original_format: VoxelFormat,
    pub(crate) actual_format: VoxelFormat,
    pub(crate) dimensions: IVec3,
    pub(crate) spacing: Vec3,
    pub(crate) world_dimensions: Vec3,
    pub(crate) default_windowing_parameters: WindowingParameters,
    pub(crate) is_normalized: bool,
    pub(crate) min_value: f32,
    pub(crate) max_value: f32,
    pub(crate) is_compressed: bool,
    pub(crate) compressed_byte_size: i32,
}

impl VolumeInfo {
    /// Creates the partial record for a file whose header failed to parse.
    ///
    /// Every field other than the file name holds its default and must not
    /// be used; check [`is_usable`](Self::is_usable) first.
    pub fn failed(data_file_name: impl Into<String>) -> Self {
        let data_file_name = data_file_name.into();
        log::warn!("failed to parse volume header of '{data_file_name}'");
        Self {
            parse_succeeded: false,
            data_file_name,
            original_format: VoxelFormat::default(),
            actual_format: VoxelFormat::default(),
            dimensions: IVec3::ZERO,
            spacing: Vec3::ZERO,
            world_dimensions: Vec3::ZERO,
            default_windowing_parameters: WindowingParameters::default(),
            is_normalized: false,
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            is_compressed: false,
            compressed_byte_size: 0,
        }
    }

    /// Whether parsing succeeded.
    pub fn parse_succeeded(&self) -> bool {
        self.parse_succeeded
    }

    /// Whether the record may be used. Same as [`parse_succeeded`](Self::parse_succeeded).
    pub fn is_usable(&self) -> bool {
        self.parse_succeeded
    }

    /// Name of the loaded file, including extension.
    pub fn data_file_name(&self) -> &str {
        &self.data_file_name
    }

    /// Voxel format as stored on disk.
    ///
    /// This need not match the texture the volume ends up in, so don't use
    /// it for size calculations.
    pub fn original_format(&self) -> VoxelFormat {
        self.original_format
    }

    /// Voxel format held in memory after load-time conversion.
    pub fn actual_format(&self) -> VoxelFormat {
        self.actual_format
    }

    /// Sets the in-memory format, e.g. after promoting voxels to float.
    pub fn set_actual_format(&mut self, format: VoxelFormat) {
        self.actual_format = format;
    }

    /// Number of voxels along each axis.
    pub fn dimensions(&self) -> IVec3 {
        self.dimensions
    }

    /// Sets the voxel counts and recomputes the world dimensions.
    pub fn set_dimensions(&mut self, dimensions: IVec3) -> Result<()> {
        validate_dimensions(dimensions)?;
        self.dimensions = dimensions;
        self.update_world_dimensions();
        Ok(())
    }

    /// Size of one voxel in millimeters.
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// Sets the voxel spacing and recomputes the world dimensions.
    pub fn set_spacing(&mut self, spacing: Vec3) -> Result<()> {
        validate_spacing(spacing)?;
        self.spacing = spacing;
        self.update_world_dimensions();
        Ok(())
    }

    /// Size of the whole volume in millimeters.
    pub fn world_dimensions(&self) -> Vec3 {
        self.world_dimensions
    }

    fn update_world_dimensions(&mut self) {
        self.world_dimensions = self.dimensions.as_vec3() * self.spacing;
    }

    /// Windowing applied when the volume is first displayed.
    pub fn default_windowing_parameters(&self) -> WindowingParameters {
        self.default_windowing_parameters
    }

    /// Sets the initial windowing.
    pub fn set_default_windowing_parameters(&mut self, params: WindowingParameters) {
        self.default_windowing_parameters = params;
    }

    /// Whether stored values were rescaled from `[min_value, max_value]` to `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        self.is_normalized
    }

    /// Records whether the voxel data has been normalized.
    pub fn set_normalized(&mut self, normalized: bool) {
        self.is_normalized = normalized;
    }

    /// Lowest voxel value before normalization.
    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    /// Highest voxel value before normalization.
    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    /// Returns `(min_value, max_value)`.
    pub fn value_range(&self) -> (f32, f32) {
        (self.min_value, self.max_value)
    }

    /// Sets the original value range.
    pub fn set_value_range(&mut self, min: f32, max: f32) -> Result<()> {
        validate_value_range(min, max)?;
        self.min_value = min;
        self.max_value = max;
        Ok(())
    }

    /// Width of the value range, `max_value - min_value`.
    pub fn value_extent(&self) -> f32 {
        self.max_value - self.min_value
    }

    /// Whether min and max coincide.
    pub fn has_degenerate_range(&self) -> bool {
        self.value_extent() == 0.0
    }

    /// Whether the stored payload is compressed.
    pub fn is_compressed(&self) -> bool {
        self.is_compressed
    }

    /// Size of the compressed payload. Meaningful only when compressed.
    pub fn compressed_byte_size(&self) -> i32 {
        self.compressed_byte_size
    }

    /// Marks the payload as compressed to `byte_size` bytes.
    pub fn set_compression(&mut self, byte_size: i32) -> Result<()> {
        if byte_size < 0 {
            return Err(VolumeInfoError::InvalidCompressedSize(byte_size));
        }
        self.is_compressed = true;
        self.compressed_byte_size = byte_size;
        Ok(())
    }

    /// Marks the payload as uncompressed.
    pub fn clear_compression(&mut self) {
        self.is_compressed = false;
        self.compressed_byte_size = 0;
    }

    /// Whether the actual format is signed.
    pub fn is_signed(&self) -> bool {
        self.actual_format.is_signed()
    }

    /// Bytes per voxel of the actual format.
    pub fn bytes_per_voxel(&self) -> usize {
        self.actual_format.byte_size()
    }

    /// Texture format the actual format is stored as on the GPU.
    pub fn storage_format(&self) -> StorageFormat {
        self.actual_format.storage_format()
    }

    /// Number of voxels in the volume.
    pub fn total_voxels(&self) -> i64 {
        i64::from(self.dimensions.x) * i64::from(self.dimensions.y) * i64::from(self.dimensions.z)
    }

    /// Bytes needed to store the volume.
    ///
    /// The compressed size when compressed, otherwise voxel count times
    /// bytes per voxel of the actual format.
    #[allow(clippy::cast_possible_wrap)]
    pub fn byte_size(&self) -> i64 {
        if self.is_compressed {
            i64::from(self.compressed_byte_size)
        } else {
            self.total_voxels() * self.bytes_per_voxel() as i64
        }
    }

    /// Bytes the uncompressed volume occupies once uploaded as a texture.
    #[allow(clippy::cast_possible_wrap)]
    pub fn gpu_byte_size(&self) -> i64 {
        self.total_voxels() * self.storage_format().bytes_per_texel() as i64
    }

    /// Maps a value from `[min_value, max_value]` to `[0, 1]`.
    ///
    /// Values outside the range extrapolate: `min - (max - min)` maps to
    /// `-1`. With a degenerate range every value maps to `0`.
    pub fn normalize_value(&self, value: f32) -> f32 {
        let extent = self.value_extent();
        if extent == 0.0 {
            return 0.0;
        }
        (value - self.min_value) / extent
    }

    /// Maps a `[0, 1]` value back to `[min_value, max_value]`.
    pub fn denormalize_value(&self, value: f32) -> f32 {
        value * self.value_extent() + self.min_value
    }

    /// Scales a distance in original units to the normalized range.
    ///
    /// Returns `0` for a degenerate range.
    pub fn normalize_range(&self, range: f32) -> f32 {
        let extent = self.value_extent();
        if extent == 0.0 {
            return 0.0;
        }
        range / extent
    }

    /// Scales a normalized distance to original units, so `1` becomes
    /// `max_value - min_value`.
    pub fn denormalize_range(&self, range: f32) -> f32 {
        range * self.value_extent()
    }

    /// Diagnostic rendering of every field.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VolumeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let windowing = &self.default_windowing_parameters;
        write!(
            f,
            "VolumeInfo {{ file: \"{}\", parsed: {}, original: {}, actual: {}, \
             dimensions: {}, spacing: {}, world: {}, normalized: {}, \
             range: [{}, {}], signed: {}, bytes_per_voxel: {}, \
             compressed: {}, compressed_bytes: {}, \
             windowing: {{ center: {}, width: {}, low_cutoff: {}, high_cutoff: {} }} }}",
            self.data_file_name,
            self.parse_succeeded,
            self.original_format,
            self.actual_format,
            self.dimensions,
            self.spacing,
            self.world_dimensions,
            self.is_normalized,
            self.min_value,
            self.max_value,
            self.is_signed(),
            self.bytes_per_voxel(),
            self.is_compressed,
            self.compressed_byte_size,
            windowing.center,
            windowing.width,
            windowing.low_cutoff,
            windowing.high_cutoff,
        )
    }
}

pub(crate) fn validate_dimensions(dimensions: IVec3) -> Result<()> {
    for (axis, value) in ['x', 'y', 'z'].into_iter().zip(dimensions.to_array()) {
        if value < 0 {
            return Err(VolumeInfoError::NegativeDimension { axis, value });
        }
    }
    Ok(())
}

pub(crate) fn validate_spacing(spacing: Vec3) -> Result<()> {
    for (axis, value) in ['x', 'y', 'z'].into_iter().zip(spacing.to_array()) {
        if !value.is_finite() || value < 0.0 {
            return Err(VolumeInfoError::InvalidSpacing { axis, value });
        }
    }
    Ok(())
}

pub(crate) fn validate_value_range(min: f32, max: f32) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(VolumeInfoError::NonFiniteValueRange { min, max });
    }
    if min > max {
        return Err(VolumeInfoError::InvertedValueRange { min, max });
    }
    // The extent divides every normalization.
    if !(max - min).is_finite() {
        return Err(VolumeInfoError::NonFiniteValueRange { min, max });
    }
    Ok(())
}

/// Serialized form of [`VolumeInfo`], validated on the way in.
#[derive(Deserialize)]
struct VolumeInfoRecord {
    parse_succeeded: bool,
    data_file_name: String,
    original_format: VoxelFormat,
    actual_format: VoxelFormat,
    dimensions: IVec3,
    spacing: Vec3,
    default_windowing_parameters: WindowingParameters,
    is_normalized: bool,
    min_value: f32,
    max_value: f32,
    is_compressed: bool,
    compressed_byte_size: i32,
}

impl TryFrom<VolumeInfoRecord> for VolumeInfo {
    type Error = VolumeInfoError;

    fn try_from(record: VolumeInfoRecord) -> Result<Self> {
        validate_dimensions(record.dimensions)?;
        validate_spacing(record.spacing)?;
        validate_value_range(record.min_value, record.max_value)?;
        if record.compressed_byte_size < 0 {
            return Err(VolumeInfoError::InvalidCompressedSize(
                record.compressed_byte_size,
            ));
        }
        Ok(Self {
            parse_succeeded: record.parse_succeeded,
            data_file_name: record.data_file_name,
            original_format: record.original_format,
            actual_format: record.actual_format,
            dimensions: record.dimensions,
            spacing: record.spacing,
            world_dimensions: record.dimensions.as_vec3() * record.spacing,
            default_windowing_parameters: record.default_windowing_parameters,
            is_normalized: record.is_normalized,
            min_value: record.min_value,
            max_value: record.max_value,
            is_compressed: record.is_compressed,
            compressed_byte_size: record.compressed_byte_size,
        })
    }
}
