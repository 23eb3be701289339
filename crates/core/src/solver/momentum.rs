//! Momentum stencils
//!
//! Diffusion, advection, forcing and the three projection stages. Each
//! function computes one destination cell from the current buffers in a
//! [`StencilInput`]; none of them mutate anything.
//!
//! # Projection discretization
//!
//! ```text
//! div = ½(vx[x+1] − vx[x−1]) + ½(vy[y+1] − vy[y−1])
//! p'  = (p[x−1] + p[x+1] + p[y−1] + p[y+1] − div) / 4
//! v  −= ½(p[+1] − p[−1])   per axis
//! ```
//!
//! Velocities are in cells per tick, so the grid spacing and timestep are both 1.

use super::boundary::{sample_bilinear, sample_wrap_x_clamp_y};
use super::fields::MomentumCell;
use super::kernels::StencilInput;

/// Fraction of the gap to `globalWind` closed per tick
pub const WIND_RELAXATION: f32 = 0.01;

/// The four direct neighbours of a cell: left, right, below, above
struct Neighbours {
    left: MomentumCell,
    right: MomentumCell,
    down: MomentumCell,
    up: MomentumCell,
}

#[inline]
fn neighbours(input: &StencilInput<'_>, x: usize, y: usize) -> Neighbours {
    let (x, y) = (x as isize, y as isize);
    let field = input.momentum;
    Neighbours {
        left: sample_wrap_x_clamp_y(field, x - 1, y),
        right: sample_wrap_x_clamp_y(field, x + 1, y),
        down: sample_wrap_x_clamp_y(field, x, y - 1),
        up: sample_wrap_x_clamp_y(field, x, y + 1),
    }
}

/// Relax vx and vy toward their 4-neighbour average by `diffusion`
#[inline]
pub fn diffuse(input: &StencilInput<'_>, x: usize, y: usize) -> MomentumCell {
    let c = input.momentum.get(x, y);
    let n = neighbours(input, x, y);
    let rate = input.coefficients.diffusion;
    let avg_vx = (n.left.vx + n.right.vx + n.down.vx + n.up.vx) * 0.25;
    let avg_vy = (n.left.vy + n.right.vy + n.down.vy + n.up.vy) * 0.25;
    MomentumCell {
        vx: c.vx + rate * (avg_vx - c.vx),
        vy: c.vy + rate * (avg_vy - c.vy),
        ..c
    }
}

/// Backtrace one tick along the cell's own velocity and sample velocity there
#[inline]
pub fn advect(input: &StencilInput<'_>, x: usize, y: usize) -> MomentumCell {
    let c = input.momentum.get(x, y);
    let origin = sample_bilinear(input.momentum, x as f32 - c.vx, y as f32 - c.vy);
    MomentumCell {
        vx: origin.vx,
        vy: origin.vy,
        ..c
    }
}

/// Central-difference divergence; resets the pressure estimate
#[inline]
pub fn divergence(input: &StencilInput<'_>, x: usize, y: usize) -> MomentumCell {
    let c = input.momentum.get(x, y);
    let n = neighbours(input, x, y);
    MomentumCell {
        divergence: 0.5 * (n.right.vx - n.left.vx) + 0.5 * (n.up.vy - n.down.vy),
        pressure: 0.0,
        ..c
    }
}

/// One Jacobi relaxation of `∇²p = div`
#[inline]
pub fn pressure_jacobi(input: &StencilInput<'_>, x: usize, y: usize) -> MomentumCell {
    let c = input.momentum.get(x, y);
    let n = neighbours(input, x, y);
    let sum = n.left.pressure + n.right.pressure + n.down.pressure + n.up.pressure;
    MomentumCell {
        pressure: (sum - c.divergence) * 0.25,
        ..c
    }
}

/// Subtract the pressure gradient from velocity
#[inline]
pub fn velocity_correction(input: &StencilInput<'_>, x: usize, y: usize) -> MomentumCell {
    let c = input.momentum.get(x, y);
    let n = neighbours(input, x, y);
    MomentumCell {
        vx: c.vx - 0.5 * (n.right.pressure - n.left.pressure),
        vy: c.vy - 0.5 * (n.up.pressure - n.down.pressure),
        ..c
    }
}

/// Buoyancy, wind bias and ground heating
///
/// The temperature channel is already the excess over the ambient profile,
/// so neutral air feels no force; the profile acts through the displacement
/// term in [`super::atmosphere::update`].
#[inline]
pub fn add_forces(input: &StencilInput<'_>, x: usize, y: usize) -> MomentumCell {
    let c = input.momentum.get(x, y);
    let k = input.coefficients;
    let temperature = input.scalar.get(x, y).temperature;

    let mut vy = c.vy + k.buoyancy_factor * temperature;
    if y == 0 {
        vy += k.buoyancy_factor * input.ground[x].temperature;
    }
    MomentumCell {
        vx: c.vx + (k.global_wind - c.vx) * WIND_RELAXATION,
        vy,
        ..c
    }
}
