//! Point probe over the display snapshots

use crate::solver::{FieldData, MomentumCell, ScalarCell};
use nalgebra::Vector2;

/// Field values at one grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    /// Wind (cells per tick)
    pub velocity: Vector2<f32>,
    /// Temperature offset
    pub temperature: f32,
    /// Water vapour
    pub humidity: f32,
    /// Cloud water
    pub mist: f32,
    /// Rain water
    pub rain: f32,
}

impl ProbeSample {
    fn from_cells(momentum: MomentumCell, scalar: ScalarCell) -> Self {
        Self {
            velocity: Vector2::new(momentum.vx, momentum.vy),
            temperature: scalar.temperature,
            humidity: scalar.humidity,
            mist: scalar.mist,
            rain: scalar.rain,
        }
    }
}

/// Two-line readout: wind and temperature, then water content
impl std::fmt::Display for ProbeSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            " vx: {:.2}, vy: {:.2}, t: {:.3}",
            self.velocity.x, self.velocity.y, self.temperature
        )?;
        write!(
            f,
            " h: {:.3}, m: {:.3}, r: {:.3}",
            self.humidity, self.mist, self.rain
        )
    }
}

/// Grid cell under a normalized coordinate, clamped into the grid
#[must_use]
pub fn cell_index(coord: f32, size: usize) -> usize {
    let scaled = (coord * size as f32).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(size - 1)
    }
}

/// Sample both snapshots at normalized `(x, y)`, row 0 being the ground
#[must_use]
pub fn sample(
    momentum: &FieldData<MomentumCell>,
    scalar: &FieldData<ScalarCell>,
    x: f32,
    y: f32,
) -> ProbeSample {
    let size = momentum.size;
    let (cx, cy) = (cell_index(x, size), cell_index(y, size));
    ProbeSample::from_cells(momentum.get(cx, cy), scalar.get(cx, cy))
}
