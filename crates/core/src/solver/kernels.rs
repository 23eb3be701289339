//! Kernel catalogue
//!
//! Every stage of a timestep is one [`Kernel`]: a pure per-cell function of
//! the current momentum buffer, the current scalar buffer, the ground forcing
//! and the coefficients. A kernel writes exactly one destination buffer, in
//! full. The stencil bodies live in [`super::momentum`] and
//! [`super::atmosphere`]; this module only names them and bundles their
//! read-only inputs.

use super::fields::{FieldData, MomentumCell, ScalarCell};
use super::ground::{GroundBoundary, GroundCell};
use crate::Coefficients;

/// Field a kernel writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Velocity plus projection scratch channels
    Momentum,
    /// Temperature, rain, humidity, mist
    Scalar,
}

/// Closed set of simulation kernels
///
/// Discriminants follow the order in which a timestep first uses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kernel {
    /// Snapshot momentum for display
    CopyMomentum = 0,
    /// Snapshot scalars for display
    CopyScalar = 1,
    /// Relax velocity toward its 4-neighbour average
    DiffuseMomentum = 2,
    /// Semi-Lagrangian velocity transport
    AdvectMomentum = 3,
    /// Central-difference divergence into the scratch channel
    Divergence = 4,
    /// One Jacobi relaxation of the pressure Poisson equation
    PressureJacobi = 5,
    /// Subtract the pressure gradient from velocity
    VelocityCorrection = 6,
    /// Per-channel scalar diffusion
    DiffuseScalar = 7,
    /// Semi-Lagrangian scalar transport, rain falls
    AdvectScalar = 8,
    /// Buoyancy, wind bias and ground heating
    AddForces = 9,
    /// Ground supply, heat loss and water phase changes
    AtmosphereUpdate = 10,
    /// Seed the scalar field
    AtmosphereInitialize = 11,
}

impl Kernel {
    /// Every kernel in id order
    pub const ALL: [Kernel; 12] = [
        Kernel::CopyMomentum,
        Kernel::CopyScalar,
        Kernel::DiffuseMomentum,
        Kernel::AdvectMomentum,
        Kernel::Divergence,
        Kernel::PressureJacobi,
        Kernel::VelocityCorrection,
        Kernel::DiffuseScalar,
        Kernel::AdvectScalar,
        Kernel::AddForces,
        Kernel::AtmosphereUpdate,
        Kernel::AtmosphereInitialize,
    ];

    /// Numeric identity
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Field whose buffer this kernel writes
    #[must_use]
    pub const fn target(self) -> FieldKind {
        match self {
            Kernel::CopyMomentum
            | Kernel::DiffuseMomentum
            | Kernel::AdvectMomentum
            | Kernel::Divergence
            | Kernel::PressureJacobi
            | Kernel::VelocityCorrection
            | Kernel::AddForces => FieldKind::Momentum,
            Kernel::CopyScalar
            | Kernel::DiffuseScalar
            | Kernel::AdvectScalar
            | Kernel::AtmosphereUpdate
            | Kernel::AtmosphereInitialize => FieldKind::Scalar,
        }
    }

    /// Copy kernels write the display snapshot instead of the ping-pong pair
    #[must_use]
    pub const fn is_snapshot(self) -> bool {
        matches!(self, Kernel::CopyMomentum | Kernel::CopyScalar)
    }

    /// Kebab-case name used in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kernel::CopyMomentum => "copy-momentum",
            Kernel::CopyScalar => "copy-scalar",
            Kernel::DiffuseMomentum => "diffuse-momentum",
            Kernel::AdvectMomentum => "advect-momentum",
            Kernel::Divergence => "divergence",
            Kernel::PressureJacobi => "pressure-jacobi",
            Kernel::VelocityCorrection => "velocity-correction",
            Kernel::DiffuseScalar => "diffuse-scalar",
            Kernel::AdvectScalar => "advect-scalar",
            Kernel::AddForces => "add-forces",
            Kernel::AtmosphereUpdate => "atmosphere-update",
            Kernel::AtmosphereInitialize => "atmosphere-initialize",
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only inputs shared by every cell of one kernel invocation
pub struct StencilInput<'a> {
    /// Current momentum buffer
    pub momentum: &'a FieldData<MomentumCell>,
    /// Current scalar buffer
    pub scalar: &'a FieldData<ScalarCell>,
    /// Ground forcing resolved per grid column
    pub ground: Vec<GroundCell>,
    /// Tuning parameters for this step
    pub coefficients: &'a Coefficients,
}

impl<'a> StencilInput<'a> {
    /// Bundle the inputs, resolving the ground boundary onto grid columns once
    #[must_use]
    pub fn new(
        momentum: &'a FieldData<MomentumCell>,
        scalar: &'a FieldData<ScalarCell>,
        ground: &GroundBoundary,
        coefficients: &'a Coefficients,
    ) -> Self {
        let size = momentum.size;
        Self {
            momentum,
            scalar,
            ground: (0..size).map(|x| ground.at_grid_column(x, size)).collect(),
            coefficients,
        }
    }

    /// Cells per side
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.momentum.size
    }

    /// Normalized altitude of the centre of row `y`
    #[inline]
    #[must_use]
    pub fn altitude(&self, y: usize) -> f32 {
        (y as f32 + 0.5) / self.size() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::resolution::Resolution;

    #[test]
    fn test_ids_match_catalogue_order() {
        for (i, kernel) in Kernel::ALL.iter().enumerate() {
            assert_eq!(usize::from(kernel.id()), i);
        }
    }

    #[test]
    fn test_targets() {
        assert_eq!(Kernel::AddForces.target(), FieldKind::Momentum);
        assert_eq!(Kernel::AtmosphereUpdate.target(), FieldKind::Scalar);
        assert_eq!(Kernel::AdvectScalar.target(), FieldKind::Scalar);
        assert_eq!(Kernel::PressureJacobi.target(), FieldKind::Momentum);
        let snapshots: Vec<_> = Kernel::ALL.iter().filter(|k| k.is_snapshot()).collect();
        assert_eq!(snapshots, [&Kernel::CopyMomentum, &Kernel::CopyScalar]);
    }

    #[test]
    fn test_altitude_of_rows() {
        let momentum = FieldData::new(Resolution::R64);
        let scalar = FieldData::new(Resolution::R64);
        let coefficients = Coefficients::default();
        let input = StencilInput::new(&momentum, &scalar, &GroundBoundary::default(), &coefficients);
        assert_eq!(input.size(), 64);
        assert_eq!(input.ground.len(), 64);
        assert_eq!(input.altitude(0), 0.5 / 64.0);
        assert_eq!(input.altitude(63), 63.5 / 64.0);
    }
}
