//! Staged stencil solver
//!
//! The numerical core: two double-buffered 4-channel fields, a closed set of
//! per-cell kernels, a data-parallel dispatcher and the pressure projection
//! built on top of it.
//!
//! # Example
//!
//! ```rust
//! use weather_tank_core::solver::{project, FieldStore, GroundBoundary, Kernel, Resolution};
//! use weather_tank_core::Coefficients;
//!
//! let mut store = FieldStore::new(Resolution::R64);
//! let ground = GroundBoundary::default();
//! let coefficients = Coefficients::default();
//! store.dispatch(Kernel::AtmosphereInitialize, &ground, &coefficients);
//! store.dispatch(Kernel::AddForces, &ground, &coefficients);
//! project(&mut store, &ground, &coefficients);
//! ```

pub mod atmosphere;
pub mod boundary;
mod dispatch;
mod fields;
mod ground;
mod kernels;
pub mod momentum;
mod projection;
mod resolution;

pub use boundary::{sample_bilinear, sample_wrap_x_clamp_y, Lerp};
pub use dispatch::{FieldStore, Stencil};
pub use fields::{FieldData, MomentumCell, PingPong, ScalarCell};
pub use ground::{GroundBoundary, GroundCell, DEFAULT_COLUMNS};
pub use kernels::{FieldKind, Kernel, StencilInput};
pub use momentum::WIND_RELAXATION;
pub use projection::{mean_abs_divergence, project};
pub use resolution::Resolution;
