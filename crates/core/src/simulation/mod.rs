//! Simulation driver and diagnostics

mod totals;
mod weather_simulation;

pub use totals::FieldTotals;
pub use weather_simulation::{Stage, WeatherSimulation, STEP_SEQUENCE};
