//! Display windowing parameters.
//!
//! Windowing works the same way as a DICOM window: values inside
//! `[center - width / 2, center + width / 2]` are mapped to the visible
//! intensity ramp, and the cutoff flags decide whether values outside the
//! window are hidden or clamped to the ends of the ramp.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Window center/width with optional cutoffs.
///
/// This is a plain carrier; no range checking happens here. A zero or
/// negative width is passed through unchanged to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowingParameters {
    /// Center of the window.
    pub center: f32,
    /// Width of the window.
    pub width: f32,
    /// Whether values below the window are cut off.
    pub low_cutoff: bool,
    /// Whether values above the window are cut off.
    pub high_cutoff: bool,
}

impl Default for WindowingParameters {
    fn default() -> Self {
        Self {
            center: 0.5,
            width: 1.0,
            low_cutoff: true,
            high_cutoff: true,
        }
    }
}

impl WindowingParameters {
    /// Creates windowing parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window center.
    pub fn with_center(mut self, center: f32) -> Self {
        self.center = center;
        self
    }

    /// Sets the window width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Sets both cutoff flags.
    pub fn with_cutoffs(mut self, low_cutoff: bool, high_cutoff: bool) -> Self {
        self.low_cutoff = low_cutoff;
        self.high_cutoff = high_cutoff;
        self
    }

    /// Packs the parameters as `(center, width, low_cutoff, high_cutoff)`,
    /// with each flag as `0.0` or `1.0`.
    pub fn encode(&self) -> Vec4 {
        Vec4::from_array(self.to_array())
    }

    /// Same as [`encode`](Self::encode), as a plain array.
    pub fn to_array(&self) -> [f32; 4] {
        [
            self.center,
            self.width,
            flag_to_f32(self.low_cutoff),
            flag_to_f32(self.high_cutoff),
        ]
    }

    /// Inverse of [`encode`](Self::encode). A flag component of `0.5` or
    /// more reads as `true`.
    pub fn decode(packed: Vec4) -> Self {
        Self {
            center: packed.x,
            width: packed.y,
            low_cutoff: packed.z >= 0.5,
            high_cutoff: packed.w >= 0.5,
        }
    }

    /// Lower and upper edges of the window.
    pub fn window_bounds(&self) -> (f32, f32) {
        let half = self.width * 0.5;
        (self.center - half, self.center + half)
    }
}

fn flag_to_f32(flag: bool) -> f32 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// GPU-compatible windowing uniforms, laid out in encode order.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WindowingUniforms {
    pub center: f32,
    pub width: f32,
    /// 1.0 if enabled, 0.0 otherwise.
    pub low_cutoff: f32,
    /// 1.0 if enabled, 0.0 otherwise.
    pub high_cutoff: f32,
}

impl From<&WindowingParameters> for WindowingUniforms {
    fn from(params: &WindowingParameters) -> Self {
        let [center, width, low_cutoff, high_cutoff] = params.to_array();
        Self {
            center,
            width,
            low_cutoff,
            high_cutoff,
        }
    }
}

impl Default for WindowingUniforms {
    fn default() -> Self {
        Self::from(&WindowingParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windowing_default() {
        let params = WindowingParameters::default();
        assert_eq!(params.center, 0.5);
        assert_eq!(params.width, 1.0);
        assert!(params.low_cutoff);
        assert!(params.high_cutoff);
    }

    #[test]
    fn test_encode_order() {
        let params = WindowingParameters::new()
            .with_center(40.0)
            .with_width(400.0)
            .with_cutoffs(false, true);
        assert_eq!(params.encode(), Vec4::new(40.0, 400.0, 0.0, 1.0));
        assert_eq!(params.to_array(), [40.0, 400.0, 0.0, 1.0]);
    }

    #[test]
    fn test_encode_does_not_clamp() {
        let params = WindowingParameters::new()
            .with_center(-3.5)
            .with_width(-2.0)
            .with_cutoffs(false, false);
        assert_eq!(params.encode(), Vec4::new(-3.5, -2.0, 0.0, 0.0));
    }

    #[test]
    fn test_decode_inverts_encode() {
        for (low, high) in [(false, false), (false, true), (true, false), (true, true)] {
            let params = WindowingParameters::new()
                .with_center(0.25)
                .with_width(0.0)
                .with_cutoffs(low, high);
            assert_eq!(WindowingParameters::decode(params.encode()), params);
        }
    }

    #[test]
    fn test_window_bounds() {
        let params = WindowingParameters::new().with_center(40.0).with_width(400.0);
        assert_eq!(params.window_bounds(), (-160.0, 240.0));
    }

    #[test]
    fn test_uniforms() {
        let params = WindowingParameters::new()
            .with_center(0.3)
            .with_width(0.6)
            .with_cutoffs(true, false);
        let uniforms = WindowingUniforms::from(&params);
        assert_eq!(bytemuck::cast::<_, [f32; 4]>(uniforms), params.to_array());
        assert_eq!(std::mem::size_of::<WindowingUniforms>(), 16);
    }
}
