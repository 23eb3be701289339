//! Field store and kernel dispatcher
//!
//! [`FieldStore`] owns both double-buffered fields and their display
//! snapshots. [`FieldStore::dispatch`] evaluates one [`Kernel`] over every cell
//! of its target field in parallel (one rayon task per row), reading only the
//! current buffers and writing only the staging buffer, then swaps roles.

use super::atmosphere;
use super::fields::{FieldData, MomentumCell, PingPong, ScalarCell};
use super::ground::GroundBoundary;
use super::kernels::{FieldKind, Kernel, StencilInput};
use super::momentum;
use super::resolution::Resolution;
use crate::Coefficients;
use bytemuck::Pod;
use rayon::prelude::*;
use tracing::trace;

/// Per-cell stencil producing one destination cell
pub type Stencil<C> = fn(&StencilInput<'_>, usize, usize) -> C;

/// Both simulation fields, their buffer roles and display snapshots
#[derive(Debug, Clone)]
pub struct FieldStore {
    resolution: Resolution,
    momentum: PingPong<MomentumCell>,
    scalar: PingPong<ScalarCell>,
    momentum_snapshot: FieldData<MomentumCell>,
    scalar_snapshot: FieldData<ScalarCell>,
}

impl FieldStore {
    /// Allocate zero-initialized fields and snapshots
    #[must_use]
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            momentum: PingPong::new(resolution),
            scalar: PingPong::new(resolution),
            momentum_snapshot: FieldData::new(resolution),
            scalar_snapshot: FieldData::new(resolution),
        }
    }

    /// Grid resolution shared by both fields
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Current momentum buffer
    #[must_use]
    pub fn momentum(&self) -> &FieldData<MomentumCell> {
        self.momentum.current()
    }

    /// Current scalar buffer
    #[must_use]
    pub fn scalar(&self) -> &FieldData<ScalarCell> {
        self.scalar.current()
    }

    /// Writable current momentum buffer, for seeding state between kernels
    pub fn momentum_mut(&mut self) -> &mut FieldData<MomentumCell> {
        self.momentum.current_mut()
    }

    /// Writable current scalar buffer, for seeding state between kernels
    pub fn scalar_mut(&mut self) -> &mut FieldData<ScalarCell> {
        self.scalar.current_mut()
    }

    /// Momentum as of the last copy-momentum dispatch
    #[must_use]
    pub fn momentum_snapshot(&self) -> &FieldData<MomentumCell> {
        &self.momentum_snapshot
    }

    /// Scalars as of the last copy-scalar dispatch
    #[must_use]
    pub fn scalar_snapshot(&self) -> &FieldData<ScalarCell> {
        &self.scalar_snapshot
    }

    /// Evaluate one kernel over the whole grid
    ///
    /// Ping-pong kernels write the staging buffer of their target field and
    /// promote it; copy kernels write the display snapshot and leave the
    /// buffer roles alone.
    pub fn dispatch(
        &mut self,
        kernel: Kernel,
        ground: &GroundBoundary,
        coefficients: &Coefficients,
    ) {
        trace!(kernel = kernel.name(), resolution = %self.resolution, "dispatch");

        match (kernel.target(), kernel.is_snapshot()) {
            (FieldKind::Momentum, true) => self
                .momentum_snapshot
                .as_mut_slice()
                .copy_from_slice(self.momentum.current().as_slice()),
            (FieldKind::Scalar, true) => self
                .scalar_snapshot
                .as_mut_slice()
                .copy_from_slice(self.scalar.current().as_slice()),
            (FieldKind::Momentum, false) => {
                if let Some(stencil) = momentum_stencil(kernel) {
                    self.apply_momentum(stencil, ground, coefficients);
                }
            }
            (FieldKind::Scalar, false) => {
                if let Some(stencil) = scalar_stencil(kernel) {
                    self.apply_scalar(stencil, ground, coefficients);
                }
            }
        }
    }

    fn apply_momentum(
        &mut self,
        stencil: Stencil<MomentumCell>,
        ground: &GroundBoundary,
        coefficients: &Coefficients,
    ) {
        let (current, staging) = self.momentum.split();
        let input = StencilInput::new(current, self.scalar.current(), ground, coefficients);
        fill_rows(staging, |x, y| stencil(&input, x, y));
        self.momentum.swap();
    }

    fn apply_scalar(
        &mut self,
        stencil: Stencil<ScalarCell>,
        ground: &GroundBoundary,
        coefficients: &Coefficients,
    ) {
        let (current, staging) = self.scalar.split();
        let input = StencilInput::new(self.momentum.current(), current, ground, coefficients);
        fill_rows(staging, |x, y| stencil(&input, x, y));
        self.scalar.swap();
    }
}

/// Stencil body of a ping-pong kernel that writes momentum
fn momentum_stencil(kernel: Kernel) -> Option<Stencil<MomentumCell>> {
    let stencil: Stencil<MomentumCell> = match kernel {
        Kernel::DiffuseMomentum => momentum::diffuse,
        Kernel::AdvectMomentum => momentum::advect,
        Kernel::Divergence => momentum::divergence,
        Kernel::PressureJacobi => momentum::pressure_jacobi,
        Kernel::VelocityCorrection => momentum::velocity_correction,
        Kernel::AddForces => momentum::add_forces,
        _ => return None,
    };
    Some(stencil)
}

/// Stencil body of a ping-pong kernel that writes scalars
fn scalar_stencil(kernel: Kernel) -> Option<Stencil<ScalarCell>> {
    let stencil: Stencil<ScalarCell> = match kernel {
        Kernel::DiffuseScalar => atmosphere::diffuse,
        Kernel::AdvectScalar => atmosphere::advect,
        Kernel::AtmosphereUpdate => atmosphere::update,
        Kernel::AtmosphereInitialize => atmosphere::initialize,
        _ => return None,
    };
    Some(stencil)
}

/// Overwrite every cell of `dst`, one parallel task per row
fn fill_rows<C, F>(dst: &mut FieldData<C>, stencil: F)
where
    C: Pod + Send,
    F: Fn(usize, usize) -> C + Sync,
{
    let size = dst.size;
    dst.as_mut_slice()
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = stencil(x, y);
            }
        });
}
