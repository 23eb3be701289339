//! Pressure projection
//!
//! Fixed-cost incompressibility pass: divergence, `pressureSolveSteps` Jacobi
//! sweeps, velocity correction. There is no convergence check, so residual
//! divergence shrinks with the iteration count but is generally nonzero.

use super::boundary::sample_wrap_x_clamp_y;
use super::dispatch::FieldStore;
use super::fields::{FieldData, MomentumCell};
use super::ground::GroundBoundary;
use super::kernels::Kernel;
use crate::Coefficients;

/// Make the current momentum field approximately divergence-free
pub fn project(store: &mut FieldStore, ground: &GroundBoundary, coefficients: &Coefficients) {
    store.dispatch(Kernel::Divergence, ground, coefficients);
    for _ in 0..coefficients.pressure_solve_steps {
        store.dispatch(Kernel::PressureJacobi, ground, coefficients);
    }
    store.dispatch(Kernel::VelocityCorrection, ground, coefficients);
}

/// Mean absolute central-difference divergence of the velocity channels
#[must_use]
pub fn mean_abs_divergence(field: &FieldData<MomentumCell>) -> f32 {
    let size = field.size as isize;
    let mut total = 0.0_f64;
    for y in 0..size {
        for x in 0..size {
            let right = sample_wrap_x_clamp_y(field, x + 1, y).vx;
            let left = sample_wrap_x_clamp_y(field, x - 1, y).vx;
            let up = sample_wrap_x_clamp_y(field, x, y + 1).vy;
            let down = sample_wrap_x_clamp_y(field, x, y - 1).vy;
            let div = 0.5 * (right - left) + 0.5 * (up - down);
            total += f64::from(div.abs());
        }
    }
    (total / (size * size) as f64) as f32
}
