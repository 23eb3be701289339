//! Physical tuning coefficients
//!
//! One flat bundle of every tunable parameter the kernels read. Field names
//! serialize to the same camelCase keys the preset documents use, so a preset
//! entry deserializes straight into [`Coefficients`]; display-only keys in a
//! preset are ignored.

use crate::SimError;
use serde::{Deserialize, Serialize};

/// Physical tuning parameters, immutable for the duration of a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Coefficients {
    // Buoyancy
    /// Vertical acceleration per unit of temperature excess
    pub buoyancy_factor: f32,
    /// Downward speed of rain relative to the air (cells per tick)
    pub rain_falling_factor: f32,

    // Stability
    /// Target horizontal wind the flow is relaxed toward
    pub global_wind: f32,
    /// Ambient temperature gain per unit altitude
    pub global_stability: f32,
    /// Normalized altitude where the upper inversion starts
    pub inversion_altitude: f32,
    /// Ambient temperature gain across the upper inversion
    pub inversion_temperature: f32,
    /// Normalized depth of the ground inversion layer
    pub ground_inversion_depth: f32,
    /// Ambient temperature gain across the ground inversion layer
    pub ground_inversion_temperature: f32,
    /// Fraction of temperature anomaly lost per tick
    #[serde(rename = "heatDisipationRate")]
    pub heat_dissipation_rate: f32,

    // Water content
    /// Diffusion rate of temperature
    pub temperature_diffusion: f32,
    /// Diffusion rate of humidity
    pub humidity_diffusion: f32,
    /// Fraction of supersaturation condensed per tick
    pub condensation_factor: f32,
    /// Diffusion rate of mist
    pub mist_diffusion: f32,
    /// Fraction of mist converted to rain per tick
    pub mist_to_rain_factor: f32,
    /// Diffusion rate of rain
    pub rain_fall_diffusion: f32,
    /// Fraction of ground-level rain evaporated per tick
    pub rain_evaporation: f32,
    /// Humidity seeded by atmosphere initialization
    pub initial_humidity: f32,
    /// Saturation humidity at ground level and neutral temperature
    pub condensation_level: f32,
    /// Temperature released per unit of condensed water
    pub latent_heat: f32,

    // Solver settings
    /// Jacobi iterations per pressure projection
    pub pressure_solve_steps: u32,
    /// Momentum diffusion rate
    pub diffusion: f32,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            buoyancy_factor: 0.01,
            rain_falling_factor: 0.01,
            global_wind: 0.05,
            global_stability: 0.02,
            inversion_altitude: 0.9,
            inversion_temperature: 0.8,
            ground_inversion_depth: 0.1,
            ground_inversion_temperature: 0.3,
            heat_dissipation_rate: 0.0001,
            temperature_diffusion: 0.01,
            humidity_diffusion: 0.01,
            condensation_factor: 1.0,
            mist_diffusion: 0.01,
            mist_to_rain_factor: 0.001,
            rain_fall_diffusion: 0.2,
            rain_evaporation: 0.00008,
            initial_humidity: 0.0,
            condensation_level: 0.6,
            latent_heat: 1.0,
            pressure_solve_steps: 10,
            diffusion: 0.01,
        }
    }
}

/// Tested range of one parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    /// Preset key
    pub name: &'static str,
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

const fn range(name: &'static str, min: f32, max: f32) -> ParameterRange {
    ParameterRange { name, min, max }
}

/// Tested ranges of every parameter, keyed by preset name
pub const PARAMETER_RANGES: [ParameterRange; 21] = [
    range("buoyancyFactor", 0.0, 0.1),
    range("rainFallingFactor", 0.0, 0.1),
    range("globalWind", -1.0, 1.0),
    range("globalStability", 0.0, 0.5),
    range("inversionAltitude", 0.5, 1.0),
    range("inversionTemperature", 0.5, 1.5),
    range("groundInversionDepth", 0.0, 0.5),
    range("groundInversionTemperature", 0.0, 0.5),
    range("heatDisipationRate", 0.0, 0.005),
    range("temperatureDiffusion", 0.0, 0.1),
    range("humidityDiffusion", 0.0, 0.1),
    range("condensationFactor", 0.0, 1.0),
    range("mistDiffusion", 0.0, 0.1),
    range("mistToRainFactor", 0.0, 0.01),
    range("rainFallDiffusion", 0.0, 1.0),
    range("rainEvaporation", 0.0, 0.001),
    range("initialHumidity", 0.0, 1.0),
    range("condensationLevel", 0.0, 1.0),
    range("latentHeat", 0.0, 5.0),
    range("pressureSolveSteps", 1.0, 30.0),
    range("diffusion", 0.0, 1.0),
];

impl Coefficients {
    /// Every physical effect switched off, one Jacobi iteration
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            buoyancy_factor: 0.0,
            rain_falling_factor: 0.0,
            global_wind: 0.0,
            global_stability: 0.0,
            inversion_altitude: 0.0,
            inversion_temperature: 0.0,
            ground_inversion_depth: 0.0,
            ground_inversion_temperature: 0.0,
            heat_dissipation_rate: 0.0,
            temperature_diffusion: 0.0,
            humidity_diffusion: 0.0,
            condensation_factor: 0.0,
            mist_diffusion: 0.0,
            mist_to_rain_factor: 0.0,
            rain_fall_diffusion: 0.0,
            rain_evaporation: 0.0,
            initial_humidity: 0.0,
            condensation_level: 0.0,
            latent_heat: 0.0,
            pressure_solve_steps: 1,
            diffusion: 0.0,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut f32> {
        let slot = match name {
            "buoyancyFactor" => &mut self.buoyancy_factor,
            "rainFallingFactor" => &mut self.rain_falling_factor,
            "globalWind" => &mut self.global_wind,
            "globalStability" => &mut self.global_stability,
            "inversionAltitude" => &mut self.inversion_altitude,
            "inversionTemperature" => &mut self.inversion_temperature,
            "groundInversionDepth" => &mut self.ground_inversion_depth,
            "groundInversionTemperature" => &mut self.ground_inversion_temperature,
            "heatDisipationRate" => &mut self.heat_dissipation_rate,
            "temperatureDiffusion" => &mut self.temperature_diffusion,
            "humidityDiffusion" => &mut self.humidity_diffusion,
            "condensationFactor" => &mut self.condensation_factor,
            "mistDiffusion" => &mut self.mist_diffusion,
            "mistToRainFactor" => &mut self.mist_to_rain_factor,
            "rainFallDiffusion" => &mut self.rain_fall_diffusion,
            "rainEvaporation" => &mut self.rain_evaporation,
            "initialHumidity" => &mut self.initial_humidity,
            "condensationLevel" => &mut self.condensation_level,
            "latentHeat" => &mut self.latent_heat,
            "diffusion" => &mut self.diffusion,
            _ => return None,
        };
        Some(slot)
    }

    /// Read a parameter by its preset key
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownParameter`] for keys outside [`PARAMETER_RANGES`].
    pub fn parameter(&self, name: &str) -> Result<f32, SimError> {
        if name == "pressureSolveSteps" {
            return Ok(self.pressure_solve_steps as f32);
        }
        let mut copy = *self;
        copy.slot(name)
            .map(|v| *v)
            .ok_or_else(|| SimError::UnknownParameter(name.to_string()))
    }

    /// Write a parameter by its preset key
    ///
    /// `pressureSolveSteps` is rounded to the nearest whole number of
    /// iterations and never drops below one.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownParameter`] for keys outside [`PARAMETER_RANGES`].
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), SimError> {
        if name == "pressureSolveSteps" {
            self.pressure_solve_steps = value.round().max(1.0) as u32;
            return Ok(());
        }
        let slot = self
            .slot(name)
            .ok_or_else(|| SimError::UnknownParameter(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    /// Check every parameter against its tested range
    ///
    /// The kernel never calls this; it is for drivers that want to stay inside
    /// the combinations known to be numerically stable.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ParameterOutOfRange`] for the first offending parameter.
    pub fn validate(&self) -> Result<(), SimError> {
        for r in &PARAMETER_RANGES {
            let value = self.parameter(r.name)?;
            if !(r.min..=r.max).contains(&value) {
                return Err(SimError::ParameterOutOfRange {
                    name: r.name,
                    value,
                    min: r.min,
                    max: r.max,
                });
            }
        }
        Ok(())
    }

    /// Ambient temperature profile at normalized altitude `h`
    ///
    /// Sum of a linear stable gradient, a ground inversion that ramps up over
    /// `ground_inversion_depth`, and an upper inversion that ramps up from
    /// `inversion_altitude` to the top of the domain. The temperature channel
    /// stores the excess over this profile; air displaced vertically gains or
    /// loses excess by the profile difference along its path.
    #[must_use]
    pub fn ambient_temperature(&self, h: f32) -> f32 {
        let mut ambient = self.global_stability * h;
        if self.ground_inversion_depth > 0.0 {
            ambient += self.ground_inversion_temperature * (h / self.ground_inversion_depth).min(1.0);
        }
        let span = 1.0 - self.inversion_altitude;
        if span > 0.0 && h > self.inversion_altitude {
            ambient += self.inversion_temperature * ((h - self.inversion_altitude) / span).min(1.0);
        }
        ambient
    }

    /// Saturation humidity at normalized altitude `h` for air at `temperature`
    #[must_use]
    pub fn saturation_humidity(&self, h: f32, temperature: f32) -> f32 {
        (self.condensation_level * (1.0 - h + temperature)).max(0.0)
    }
}
