//! Whole-field diagnostics

use crate::solver::{mean_abs_divergence, FieldData, MomentumCell, ScalarCell};
use serde::Serialize;

/// Summed scalar channels and flow statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTotals {
    /// Sum of temperature offsets
    pub temperature: f64,
    /// Sum of rain content
    pub rain: f64,
    /// Sum of humidity
    pub humidity: f64,
    /// Sum of mist content
    pub mist: f64,
    /// Mean absolute velocity divergence
    pub mean_abs_divergence: f32,
    /// Largest wind speed in the grid
    pub max_speed: f32,
}

impl FieldTotals {
    /// Measure a pair of buffers
    #[must_use]
    pub fn measure(momentum: &FieldData<MomentumCell>, scalar: &FieldData<ScalarCell>) -> Self {
        let mut totals = scalar
            .as_slice()
            .iter()
            .fold(Self::default(), |mut acc, c| {
                acc.temperature += f64::from(c.temperature);
                acc.rain += f64::from(c.rain);
                acc.humidity += f64::from(c.humidity);
                acc.mist += f64::from(c.mist);
                acc
            });
        totals.max_speed = momentum
            .as_slice()
            .iter()
            .map(|c| c.vx.hypot(c.vy))
            .fold(0.0, f32::max);
        totals.mean_abs_divergence = mean_abs_divergence(momentum);
        totals
    }

    /// Total water in all three phases
    #[must_use]
    pub fn water(&self) -> f64 {
        self.humidity + self.mist + self.rain
    }
}

impl std::fmt::Display for FieldTotals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T={:.3} hum={:.3} mist={:.3} rain={:.3} |div|={:.2e} max|v|={:.3}",
            self.temperature,
            self.humidity,
            self.mist,
            self.rain,
            self.mean_abs_divergence,
            self.max_speed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Resolution;

    #[test]
    fn test_measure_sums_channels() {
        let momentum = FieldData::with_value(
            Resolution::R64,
            MomentumCell {
                vx: 0.3,
                vy: 0.4,
                ..Default::default()
            },
        );
        let scalar = FieldData::with_value(
            Resolution::R64,
            ScalarCell {
                temperature: -1.0,
                rain: 0.25,
                humidity: 0.5,
                mist: 0.125,
            },
        );
        let totals = FieldTotals::measure(&momentum, &scalar);
        let cells = 64.0 * 64.0;
        assert_eq!(totals.temperature, -cells);
        assert_eq!(totals.humidity, 0.5 * cells);
        assert_eq!(totals.water(), 0.875 * cells);
        assert!((totals.max_speed - 0.5).abs() < 1e-6);
        assert_eq!(totals.mean_abs_divergence, 0.0);
    }
}
