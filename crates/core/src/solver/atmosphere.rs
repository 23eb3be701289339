//! Scalar stencils: transport and water-phase physics
//!
//! Temperature, rain, humidity and mist are diffused with independent rates
//! and carried by the momentum field. Rain additionally falls through the air
//! at `rainFallingFactor` cells per tick. The update stencil moves water
//! between vapour, cloud and rain with latent-heat bookkeeping, and applies the
//! ambient stability profile to vertically displaced air.

use super::boundary::{sample_bilinear, sample_wrap_x_clamp_y};
use super::fields::ScalarCell;
use super::kernels::StencilInput;

#[inline]
fn relax(
    value: f32,
    neighbours: &[ScalarCell; 4],
    channel: fn(&ScalarCell) -> f32,
    rate: f32,
) -> f32 {
    let avg = neighbours.iter().map(channel).sum::<f32>() * 0.25;
    value + rate * (avg - value)
}

/// Per-channel `c + rate·(avg4(c) − c)`
#[inline]
pub fn diffuse(input: &StencilInput<'_>, x: usize, y: usize) -> ScalarCell {
    let field = input.scalar;
    let k = input.coefficients;
    let c = field.get(x, y);
    let (xi, yi) = (x as isize, y as isize);
    let n = [
        sample_wrap_x_clamp_y(field, xi - 1, yi),
        sample_wrap_x_clamp_y(field, xi + 1, yi),
        sample_wrap_x_clamp_y(field, xi, yi - 1),
        sample_wrap_x_clamp_y(field, xi, yi + 1),
    ];
    ScalarCell {
        temperature: relax(c.temperature, &n, |s| s.temperature, k.temperature_diffusion),
        rain: relax(c.rain, &n, |s| s.rain, k.rain_fall_diffusion),
        humidity: relax(c.humidity, &n, |s| s.humidity, k.humidity_diffusion),
        mist: relax(c.mist, &n, |s| s.mist, k.mist_diffusion),
    }
}

/// Semi-Lagrangian transport along the momentum field; rain also falls
#[inline]
pub fn advect(input: &StencilInput<'_>, x: usize, y: usize) -> ScalarCell {
    let v = input.momentum.get(x, y);
    let (px, py) = (x as f32 - v.vx, y as f32 - v.vy);
    let carried = sample_bilinear(input.scalar, px, py);
    let falling = sample_bilinear(input.scalar, px, py + input.coefficients.rain_falling_factor);
    ScalarCell {
        rain: falling.rain,
        ..carried
    }
}

/// Ground supply, stratification, heat loss, phase change, rain formation
#[inline]
pub fn update(input: &StencilInput<'_>, x: usize, y: usize) -> ScalarCell {
    let k = input.coefficients;
    let mut s = input.scalar.get(x, y);

    if y == 0 {
        let ground = input.ground[x];
        if ground.temperature > 0.0 {
            s.temperature = s.temperature.max(ground.temperature);
        }
        if ground.humidity > 0.0 {
            s.humidity = s.humidity.max(ground.humidity);
        }
    }

    // Air that moved vertically keeps its own temperature, so its offset from
    // the ambient profile changes by the profile difference along the path.
    let h = input.altitude(y);
    let lift = input.momentum.get(x, y).vy / input.size() as f32;
    s.temperature -= k.ambient_temperature(h) - k.ambient_temperature(h - lift);

    s.temperature -= k.heat_dissipation_rate * s.temperature;

    let saturation = k.saturation_humidity(h, s.temperature);
    if s.humidity > saturation {
        let condensed = (k.condensation_factor * (s.humidity - saturation)).min(s.humidity);
        s.humidity -= condensed;
        s.mist += condensed;
        s.temperature += k.latent_heat * condensed;
    } else {
        let evaporated = (k.condensation_factor * (saturation - s.humidity)).min(s.mist);
        s.humidity += evaporated;
        s.mist -= evaporated;
        s.temperature -= k.latent_heat * evaporated;
    }

    let formed = k.mist_to_rain_factor * s.mist;
    s.mist -= formed;
    s.rain += formed;

    if y == 0 {
        let evaporated = k.rain_evaporation * s.rain;
        s.rain -= evaporated;
        s.humidity += evaporated;
    }

    ScalarCell {
        humidity: s.humidity.max(0.0),
        mist: s.mist.max(0.0),
        rain: s.rain.max(0.0),
        ..s
    }
}

/// Seed value: `initialHumidity`, everything else zero
#[inline]
pub fn initialize(input: &StencilInput<'_>, _x: usize, _y: usize) -> ScalarCell {
    ScalarCell {
        humidity: input.coefficients.initial_humidity,
        ..ScalarCell::default()
    }
}
