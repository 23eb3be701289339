//! Field data structures and ping-pong buffer roles
//!
//! Every field is a square grid of 4-channel `f32` cells stored row-major,
//! with row 0 at the ground. Cells are plain-old-data so a whole buffer can be
//! handed to a renderer as a flat `&[f32]` without copying.

use super::resolution::Resolution;
use bytemuck::{Pod, Zeroable};

/// One cell of the momentum field
///
/// `divergence` and `pressure` are scratch channels owned by the pressure
/// projection; outside a projection they hold the last solve's values.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MomentumCell {
    /// Horizontal velocity (cells per tick, positive = east)
    pub vx: f32,
    /// Vertical velocity (cells per tick, positive = up)
    pub vy: f32,
    /// Velocity divergence written by the divergence stage
    pub divergence: f32,
    /// Pressure estimate written by the Jacobi stage
    pub pressure: f32,
}

/// One cell of the scalar field
///
/// Channel order is the RGBA texture layout: temperature, rain, humidity, mist.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ScalarCell {
    /// Signed offset from the ambient temperature profile
    pub temperature: f32,
    /// Rain water content (≥ 0)
    pub rain: f32,
    /// Water vapour content (≥ 0)
    pub humidity: f32,
    /// Cloud water content (≥ 0)
    pub mist: f32,
}

/// Field data container
///
/// Stores a `size × size` grid of cells in row-major order (`y * size + x`).
#[derive(Debug, Clone)]
pub struct FieldData<C> {
    /// Cells in row-major order, row 0 is the ground row
    pub data: Vec<C>,
    /// Cells per side
    pub size: usize,
}

impl<C: Pod> FieldData<C> {
    /// Create a new zero-initialized field
    #[must_use]
    pub fn new(resolution: Resolution) -> Self {
        Self::with_value(resolution, C::zeroed())
    }

    /// Create a new field with every cell set to `value`
    #[must_use]
    pub fn with_value(resolution: Resolution, value: C) -> Self {
        let size = resolution.cells();
        Self {
            data: vec![value; size * size],
            size,
        }
    }

    /// Get reference to the cells
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Get mutable reference to the cells
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }

    /// View the buffer as interleaved `f32` channels (4 per cell)
    #[must_use]
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.data)
    }

    /// Get cell at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> C {
        assert!(x < self.size && y < self.size, "Coordinates out of bounds");
        self.data[y * self.size + x]
    }

    /// Set cell at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: C) {
        assert!(x < self.size && y < self.size, "Coordinates out of bounds");
        self.data[y * self.size + x] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: C) {
        self.data.fill(value);
    }
}

/// Double-buffered field: one readable `current` buffer and one `staging` target
///
/// A kernel reads `current` and writes all of `staging`; [`PingPong::swap`]
/// then promotes the written buffer. [`PingPong::split`] hands out both
/// roles at once so the borrow checker rules out in-place updates.
#[derive(Debug, Clone)]
pub struct PingPong<C> {
    current: FieldData<C>,
    staging: FieldData<C>,
}

impl<C: Pod> PingPong<C> {
    /// Allocate both buffers zero-initialized
    #[must_use]
    pub fn new(resolution: Resolution) -> Self {
        Self {
            current: FieldData::new(resolution),
            staging: FieldData::new(resolution),
        }
    }

    /// Readable buffer
    #[must_use]
    pub fn current(&self) -> &FieldData<C> {
        &self.current
    }

    /// Mutable access to the readable buffer, for seeding state between kernels
    pub fn current_mut(&mut self) -> &mut FieldData<C> {
        &mut self.current
    }

    /// Write target of the next kernel
    pub fn staging(&mut self) -> &mut FieldData<C> {
        &mut self.staging
    }

    /// Borrow the readable buffer and the write target together
    pub fn split(&mut self) -> (&FieldData<C>, &mut FieldData<C>) {
        (&self.current, &mut self.staging)
    }

    /// Promote the staging buffer to current
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.staging);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field: FieldData<ScalarCell> = FieldData::new(Resolution::R64);
        assert_eq!(field.size, 64);
        assert_eq!(field.data.len(), 64 * 64);
        assert!(field.data.iter().all(|c| *c == ScalarCell::default()));
    }

    #[test]
    fn test_field_get_set() {
        let mut field: FieldData<MomentumCell> = FieldData::new(Resolution::R64);
        let cell = MomentumCell {
            vx: 1.5,
            vy: -2.0,
            ..Default::default()
        };
        field.set(3, 4, cell);
        assert_eq!(field.get(3, 4), cell);

        // Verify row-major indexing
        assert_eq!(field.data[4 * 64 + 3], cell);
    }

    #[test]
    fn test_f32_view_is_interleaved() {
        let mut field: FieldData<ScalarCell> = FieldData::new(Resolution::R64);
        field.set(
            1,
            0,
            ScalarCell {
                temperature: 1.0,
                rain: 2.0,
                humidity: 3.0,
                mist: 4.0,
            },
        );
        let flat = field.as_f32_slice();
        assert_eq!(flat.len(), 64 * 64 * 4);
        assert_eq!(&flat[4..8], &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ping_pong_swap() {
        let mut buffers: PingPong<ScalarCell> = PingPong::new(Resolution::R64);
        let marker = ScalarCell {
            humidity: 0.25,
            ..Default::default()
        };
        buffers.staging().fill(marker);
        assert_eq!(buffers.current().get(0, 0), ScalarCell::default());

        buffers.swap();
        assert_eq!(buffers.current().get(10, 10), marker);

        let (current, staging) = buffers.split();
        assert_eq!(current.get(0, 0), marker);
        assert_eq!(staging.get(0, 0), ScalarCell::default());
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_field_bounds_check() {
        let field: FieldData<ScalarCell> = FieldData::new(Resolution::R64);
        let _ = field.get(64, 5);
    }
}
