//! Weather Tank Core Library
//!
//! A 2-D boundary-layer weather simulation. Wind, pressure, temperature,
//! humidity, cloud (mist) and rain evolve on a square grid that wraps
//! horizontally and is closed at the ground and the top. Each tick runs a
//! fixed sequence of per-cell stencil kernels over double-buffered fields:
//!
//! 1. forcing (buoyancy, wind bias, ground heating)
//! 2. phase change (condensation, evaporation, rain formation)
//! 3. diffusion, then pressure projection
//! 4. semi-Lagrangian advection, then pressure projection
//! 5. publication of display snapshots
//!
//! ## Usage
//!
//! ```rust
//! use weather_tank_core::{Coefficients, GroundBoundary, Resolution, WeatherSimulation};
//!
//! let mut sim = WeatherSimulation::new(Resolution::R64, Coefficients::default());
//! sim.set_ground(GroundBoundary::reference_terrain());
//! sim.advance_one_step();
//! println!("{}", sim.sample(0.25, 0.1));
//! ```
//!
//! Kernels run row-parallel on the rayon thread pool. All state lives in a
//! single [`WeatherSimulation`]; callers that share one across threads wrap it
//! in a lock and step it only at tick boundaries.

pub mod coefficients;
pub mod error;
pub mod presets;
pub mod probe;
pub mod simulation;
pub mod solver;

pub use coefficients::{Coefficients, ParameterRange, PARAMETER_RANGES};
pub use error::SimError;
pub use presets::{Preset, PresetBook, DEFAULT_PRESET};
pub use probe::ProbeSample;
pub use simulation::{FieldTotals, Stage, WeatherSimulation, STEP_SEQUENCE};
pub use solver::{
    FieldData, FieldStore, GroundBoundary, GroundCell, Kernel, MomentumCell, Resolution,
    ScalarCell,
};
