//! Step driver
//!
//! [`WeatherSimulation`] owns the field store, the ground boundary and the
//! coefficients, and runs the fixed stage sequence once per
//! [`advance_one_step`](WeatherSimulation::advance_one_step) call.

use super::totals::FieldTotals;
use crate::presets::Preset;
use crate::probe::{self, ProbeSample};
use crate::solver::{
    project, FieldData, FieldStore, GroundBoundary, Kernel, MomentumCell, Resolution, ScalarCell,
};
use crate::{Coefficients, SimError};
use tracing::{debug, info, warn};

/// One entry of the per-tick sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A single kernel dispatch
    Dispatch(Kernel),
    /// Divergence, Jacobi sweeps and velocity correction
    Project,
}

/// Stage order of one timestep
///
/// Forcing and phase change come first so injected heat and moisture are
/// transported in the same tick; projection follows both diffusion and
/// advection; the copies publish the finished state.
pub const STEP_SEQUENCE: [Stage; 10] = [
    Stage::Dispatch(Kernel::AddForces),
    Stage::Dispatch(Kernel::AtmosphereUpdate),
    Stage::Dispatch(Kernel::DiffuseMomentum),
    Stage::Dispatch(Kernel::DiffuseScalar),
    Stage::Project,
    Stage::Dispatch(Kernel::AdvectMomentum),
    Stage::Dispatch(Kernel::AdvectScalar),
    Stage::Project,
    Stage::Dispatch(Kernel::CopyMomentum),
    Stage::Dispatch(Kernel::CopyScalar),
];

/// Boundary-layer weather simulation
///
/// Single owner of all mutable simulation state. Readers only ever see the
/// display snapshots, which change as a whole at the end of a tick.
#[derive(Debug, Clone)]
pub struct WeatherSimulation {
    fields: FieldStore,
    ground: GroundBoundary,
    coefficients: Coefficients,
    tick: u64,
}

impl WeatherSimulation {
    /// Create a seeded simulation at a supported resolution
    pub fn new(resolution: Resolution, coefficients: Coefficients) -> Self {
        info!(
            "Creating weather simulation: {} grid, {} pressure steps",
            resolution, coefficients.pressure_solve_steps
        );
        let mut sim = Self {
            fields: FieldStore::new(resolution),
            ground: GroundBoundary::default(),
            coefficients,
            tick: 0,
        };
        sim.seed();
        sim
    }

    /// Create a seeded simulation from a raw side length
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidResolution`] if `resolution` is not a supported size.
    pub fn initialize(resolution: u32, coefficients: Coefficients) -> Result<Self, SimError> {
        let resolution = Resolution::try_from(resolution).inspect_err(|e| warn!("{e}"))?;
        Ok(Self::new(resolution, coefficients))
    }

    /// Run atmosphere-initialize over freshly allocated fields and publish them
    fn seed(&mut self) {
        self.fields
            .dispatch(Kernel::AtmosphereInitialize, &self.ground, &self.coefficients);
        self.fields
            .dispatch(Kernel::CopyMomentum, &self.ground, &self.coefficients);
        self.fields
            .dispatch(Kernel::CopyScalar, &self.ground, &self.coefficients);
        self.tick = 0;
    }

    /// Grid resolution
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.fields.resolution()
    }

    /// Number of completed ticks since the last seed
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Active coefficients
    #[must_use]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Replace the coefficients used from the next tick on
    pub fn set_coefficients(&mut self, coefficients: Coefficients) {
        self.coefficients = coefficients;
    }

    /// Adopt a preset's coefficients
    ///
    /// A pinned resolution that differs from the current one reallocates and
    /// reseeds; otherwise the fields are kept and the new coefficients apply
    /// from the next tick.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.coefficients = preset.coefficients;
        match preset.resolution {
            Some(resolution) if resolution != self.resolution() => {
                self.set_resolution(resolution);
            }
            _ => {}
        }
    }

    /// Set one coefficient by its preset key
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownParameter`] for unknown keys.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), SimError> {
        self.coefficients
            .set_parameter(name, value)
            .inspect_err(|e| warn!("{e}"))
    }

    /// Ground forcing read by the next tick
    #[must_use]
    pub fn ground(&self) -> &GroundBoundary {
        &self.ground
    }

    /// Mutable ground forcing, rewritten by drivers between ticks
    pub fn ground_mut(&mut self) -> &mut GroundBoundary {
        &mut self.ground
    }

    /// Overwrite one ground column
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BoundaryColumnOutOfRange`] if `column` is past the boundary.
    pub fn set_ground_boundary(
        &mut self,
        column: usize,
        temperature: f32,
        humidity: f32,
    ) -> Result<(), SimError> {
        self.ground
            .set(column, temperature, humidity)
            .inspect_err(|e| warn!("{e}"))
    }

    /// Replace the whole ground boundary
    pub fn set_ground(&mut self, ground: GroundBoundary) {
        self.ground = ground;
    }

    /// Run one complete timestep
    pub fn advance_one_step(&mut self) {
        for stage in STEP_SEQUENCE {
            match stage {
                Stage::Dispatch(kernel) => {
                    self.fields.dispatch(kernel, &self.ground, &self.coefficients);
                }
                Stage::Project => project(&mut self.fields, &self.ground, &self.coefficients),
            }
        }
        self.tick += 1;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("Tick {}: {}", self.tick, self.totals());
        }
    }

    /// Probe the display snapshots at normalized `(x, y)`, clamped into the grid
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> ProbeSample {
        probe::sample(
            self.fields.momentum_snapshot(),
            self.fields.scalar_snapshot(),
            x,
            y,
        )
    }

    /// Reallocate at a new side length and reseed
    ///
    /// State is discarded even if the size is unchanged. On error nothing is
    /// touched and the old resolution stays active.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidResolution`] if `resolution` is not a supported size.
    pub fn change_resolution(&mut self, resolution: u32) -> Result<(), SimError> {
        let resolution = Resolution::try_from(resolution).inspect_err(|e| {
            warn!("{e}; keeping {}", self.resolution());
        })?;
        self.set_resolution(resolution);
        Ok(())
    }

    /// Reallocate at a new resolution and reseed
    pub fn set_resolution(&mut self, resolution: Resolution) {
        info!("Changing resolution {} -> {}", self.resolution(), resolution);
        self.fields = FieldStore::new(resolution);
        self.seed();
    }

    /// Reseed at the current resolution
    pub fn reset(&mut self) {
        info!("Resetting weather simulation at {}", self.resolution());
        self.fields = FieldStore::new(self.resolution());
        self.seed();
    }

    /// Momentum published at the end of the last tick
    #[must_use]
    pub fn momentum_snapshot(&self) -> &FieldData<MomentumCell> {
        self.fields.momentum_snapshot()
    }

    /// Scalars published at the end of the last tick
    #[must_use]
    pub fn scalar_snapshot(&self) -> &FieldData<ScalarCell> {
        self.fields.scalar_snapshot()
    }

    /// Underlying field store
    #[must_use]
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// Diagnostics over the display snapshots
    #[must_use]
    pub fn totals(&self) -> FieldTotals {
        FieldTotals::measure(self.momentum_snapshot(), self.scalar_snapshot())
    }
}
