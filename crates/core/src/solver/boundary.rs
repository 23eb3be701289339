//! Boundary-aware sampling shared by every kernel
//!
//! The domain is periodic horizontally and closed vertically: x indices wrap
//! around, y indices clamp to the ground and top rows. Every stencil and every
//! semi-Lagrangian lookup goes through this module so edge behaviour stays
//! identical across kernels.

use super::fields::{FieldData, MomentumCell, ScalarCell};
use bytemuck::Pod;

/// Cells that can be linearly interpolated channel by channel
pub trait Lerp: Pod {
    /// `self * (1 - t) + other * t`, exact at `t = 0` and `t = 1`
    #[must_use]
    fn lerp(self, other: Self, t: f32) -> Self;
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

impl Lerp for MomentumCell {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            vx: mix(self.vx, other.vx, t),
            vy: mix(self.vy, other.vy, t),
            divergence: mix(self.divergence, other.divergence, t),
            pressure: mix(self.pressure, other.pressure, t),
        }
    }
}

impl Lerp for ScalarCell {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            temperature: mix(self.temperature, other.temperature, t),
            rain: mix(self.rain, other.rain, t),
            humidity: mix(self.humidity, other.humidity, t),
            mist: mix(self.mist, other.mist, t),
        }
    }
}

/// Wrap a column index into `0..size`
#[inline]
#[must_use]
pub fn wrap_x(x: isize, size: usize) -> usize {
    x.rem_euclid(size as isize) as usize
}

/// Clamp a row index into `0..size`
#[inline]
#[must_use]
pub fn clamp_y(y: isize, size: usize) -> usize {
    y.clamp(0, size as isize - 1) as usize
}

/// Fetch a cell with periodic x and clamped y
#[inline]
#[must_use]
pub fn sample_wrap_x_clamp_y<C: Pod>(field: &FieldData<C>, x: isize, y: isize) -> C {
    let size = field.size;
    field.data[clamp_y(y, size) * size + wrap_x(x, size)]
}

/// Bilinearly interpolate the field at a continuous position in cell units
///
/// Cell centres sit at integer coordinates. The position wraps in x and is
/// clamped to `[0, size - 1]` in y before interpolation. A non-finite x
/// samples column 0.
#[must_use]
pub fn sample_bilinear<C: Lerp>(field: &FieldData<C>, px: f32, py: f32) -> C {
    let px = if px.is_finite() {
        px.rem_euclid(field.size as f32)
    } else {
        0.0
    };
    let py = py.clamp(0.0, (field.size - 1) as f32);
    let x0 = px.floor();
    let y0 = py.floor();
    let tx = px - x0;
    let ty = py - y0;
    let xi = x0 as isize;
    let yi = y0 as isize;

    let bottom =
        sample_wrap_x_clamp_y(field, xi, yi).lerp(sample_wrap_x_clamp_y(field, xi + 1, yi), tx);
    let top = sample_wrap_x_clamp_y(field, xi, yi + 1)
        .lerp(sample_wrap_x_clamp_y(field, xi + 1, yi + 1), tx);
    bottom.lerp(top, ty)
}
