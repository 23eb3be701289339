//! Ground boundary forcing
//!
//! A short row of per-column heat and moisture sources along the bottom of the
//! domain. The driver rewrites columns between ticks; kernels only read it.
//! Columns are stretched across the grid width and linearly interpolated,
//! wrapping horizontally like the rest of the domain.

use crate::SimError;

/// Number of columns in the default boundary
pub const DEFAULT_COLUMNS: usize = 16;

/// Forcing values for one ground column
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundCell {
    /// Surface temperature offset (heat source when > 0)
    pub temperature: f32,
    /// Surface moisture supply (when > 0)
    pub humidity: f32,
}

/// Column-indexed ground forcing array
#[derive(Debug, Clone, PartialEq)]
pub struct GroundBoundary {
    cells: Vec<GroundCell>,
}

impl Default for GroundBoundary {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS)
    }
}

impl GroundBoundary {
    /// Create a boundary with `columns` zeroed columns (at least one)
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self {
            cells: vec![GroundCell::default(); columns.max(1)],
        }
    }

    /// Demo terrain: two heated patches with hot cores and a moist strip
    ///
    /// Levels are 8-bit texture values normalized to `[0, 1]`.
    #[must_use]
    pub fn reference_terrain() -> Self {
        const LEVELS: [(usize, u8, u8); 8] = [
            (2, 70, 0),
            (3, 70, 10),
            (4, 170, 10),
            (5, 70, 10),
            (8, 170, 10),
            (9, 70, 0),
            (12, 0, 50),
            (13, 0, 50),
        ];
        let mut ground = Self::default();
        for (column, temperature, humidity) in LEVELS {
            ground.cells[column] = GroundCell {
                temperature: f32::from(temperature) / 255.0,
                humidity: f32::from(humidity) / 255.0,
            };
        }
        ground
    }

    /// Number of columns
    #[must_use]
    pub fn columns(&self) -> usize {
        self.cells.len()
    }

    /// Column values
    #[must_use]
    pub fn as_slice(&self) -> &[GroundCell] {
        &self.cells
    }

    /// Overwrite one column
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BoundaryColumnOutOfRange`] if `column >= columns()`.
    pub fn set(&mut self, column: usize, temperature: f32, humidity: f32) -> Result<(), SimError> {
        let columns = self.cells.len();
        let cell = self
            .cells
            .get_mut(column)
            .ok_or(SimError::BoundaryColumnOutOfRange { column, columns })?;
        *cell = GroundCell {
            temperature,
            humidity,
        };
        Ok(())
    }

    /// Get one column, `None` if out of range
    #[must_use]
    pub fn get(&self, column: usize) -> Option<GroundCell> {
        self.cells.get(column).copied()
    }

    /// Zero every column
    pub fn clear(&mut self) {
        self.cells.fill(GroundCell::default());
    }

    /// Forcing under grid column `x` of a `size`-wide grid
    ///
    /// Column centres are spread evenly over the grid width; between centres
    /// the values are linearly interpolated with horizontal wrap-around.
    #[must_use]
    pub fn at_grid_column(&self, x: usize, size: usize) -> GroundCell {
        let columns = self.cells.len();
        let u = (x as f32 + 0.5) / size as f32;
        let pos = u * columns as f32 - 0.5;
        let base = pos.floor();
        let t = pos - base;
        let left = self.cells[(base as isize).rem_euclid(columns as isize) as usize];
        let right = self.cells[(base as isize + 1).rem_euclid(columns as isize) as usize];
        GroundCell {
            temperature: left.temperature * (1.0 - t) + right.temperature * t,
            humidity: left.humidity * (1.0 - t) + right.humidity * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_set_and_get() {
        let mut ground = GroundBoundary::default();
        assert_eq!(ground.columns(), DEFAULT_COLUMNS);
        ground.set(3, 0.5, 0.25).unwrap();
        assert_eq!(
            ground.get(3),
            Some(GroundCell {
                temperature: 0.5,
                humidity: 0.25
            })
        );
    }

    #[test]
    fn test_set_out_of_range_rejected() {
        let mut ground = GroundBoundary::default();
        let err = ground.set(16, 1.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            SimError::BoundaryColumnOutOfRange {
                column: 16,
                columns: 16
            }
        );
        assert!(ground.as_slice().iter().all(|c| *c == GroundCell::default()));
    }

    #[test]
    fn test_uniform_boundary_is_uniform_on_grid() {
        let mut ground = GroundBoundary::default();
        for column in 0..ground.columns() {
            ground.set(column, 0.3, 0.1).unwrap();
        }
        for x in 0..64 {
            let cell = ground.at_grid_column(x, 64);
            assert_relative_eq!(cell.temperature, 0.3, epsilon = 1e-6);
            assert_relative_eq!(cell.humidity, 0.1, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_column_centre_hits_exact_value() {
        let mut ground = GroundBoundary::default();
        ground.set(4, 1.0, 0.0).unwrap();
        // 64 cells / 16 columns: column 4 is centred between grid columns 17 and 18
        let peak = ground.at_grid_column(17, 64).temperature;
        assert!(peak > 0.8);
        assert_eq!(ground.at_grid_column(40, 64).temperature, 0.0);
    }

    #[test]
    fn test_interpolation_wraps_at_edges() {
        let mut ground = GroundBoundary::default();
        ground.set(15, 1.0, 0.0).unwrap();
        // Grid column 0 sits between boundary columns 15 and 0
        let first = ground.at_grid_column(0, 64).temperature;
        assert!(first > 0.0 && first < 1.0);
    }

    #[test]
    fn test_reference_terrain_levels() {
        let ground = GroundBoundary::reference_terrain();
        assert_relative_eq!(ground.get(4).unwrap().temperature, 170.0 / 255.0);
        assert_relative_eq!(ground.get(12).unwrap().humidity, 50.0 / 255.0);
        assert_eq!(ground.get(0), Some(GroundCell::default()));
    }
}
