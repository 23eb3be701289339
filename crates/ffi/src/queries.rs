//! Read-only queries (read lock)

use std::slice;

use weather_tank_core::{FieldTotals, ProbeSample};

use crate::error::{DefaultWeatherTankError, WeatherTankErrorCode};
use crate::helpers::{instance_from_ptr, track_result, with_sim};
use crate::instance::WeatherTankInstance;

/// C-compatible probe readout at one cell of the display snapshots.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherTankSample {
    /// Horizontal velocity (cells per tick, positive = east)
    pub vx: f32,
    /// Vertical velocity (cells per tick, positive = up)
    pub vy: f32,
    /// Temperature offset from the ambient profile
    pub temperature: f32,
    pub humidity: f32,
    pub mist: f32,
    pub rain: f32,
}

impl From<ProbeSample> for WeatherTankSample {
    fn from(sample: ProbeSample) -> Self {
        Self {
            vx: sample.velocity.x,
            vy: sample.velocity.y,
            temperature: sample.temperature,
            humidity: sample.humidity,
            mist: sample.mist,
            rain: sample.rain,
        }
    }
}

/// C-compatible field diagnostics.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherTankTotals {
    pub tick: u64,
    pub temperature: f64,
    pub humidity: f64,
    pub mist: f64,
    pub rain: f64,
    pub mean_abs_divergence: f32,
    pub max_speed: f32,
}

impl WeatherTankTotals {
    fn new(tick: u64, totals: FieldTotals) -> Self {
        Self {
            tick,
            temperature: totals.temperature,
            humidity: totals.humidity,
            mist: totals.mist,
            rain: totals.rain,
            mean_abs_divergence: totals.mean_abs_divergence,
            max_speed: totals.max_speed,
        }
    }
}

/// Which display snapshot to copy.
///
/// Crosses the boundary as a plain `u32`, checked on the Rust side.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherTankField {
    /// Four floats per cell: vx, vy, divergence, pressure
    Momentum = 0,
    /// Four floats per cell: temperature, rain, humidity, mist
    Scalar = 1,
}

impl WeatherTankField {
    /// Map a raw selector from C, rejecting values outside the enum.
    fn from_raw(value: u32) -> Result<Self, DefaultWeatherTankError> {
        match value {
            0 => Ok(Self::Momentum),
            1 => Ok(Self::Scalar),
            other => Err(DefaultWeatherTankError::invalid_parameter(format!(
                "Unknown field {other} (expected 0 = momentum or 1 = scalar)"
            ))),
        }
    }
}

/// Write a `*mut T` out-parameter after a null check.
fn write_out<T>(out: *mut T, value: T, param_name: &str) -> Result<(), DefaultWeatherTankError> {
    if out.is_null() {
        return Err(DefaultWeatherTankError::null_pointer(param_name));
    }
    // SAFETY: non-null; callers promise the pointer is writable.
    unsafe {
        *out = value;
    }
    Ok(())
}

/// Probe the display snapshots at normalized `(x, y)` in `[0, 1]`.
///
/// Out-of-range coordinates clamp to the nearest edge cell.
///
/// # Safety
/// - `ptr` must be a live pointer returned by `weather_tank_new`.
/// - `out_sample` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_sample(
    ptr: *const WeatherTankInstance,
    x: f32,
    y: f32,
    out_sample: *mut WeatherTankSample,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let sample = with_sim(instance, |sim| sim.sample(x, y))?;
        write_out(out_sample, sample.into(), "out_sample")
    })
}

/// Current grid side length.
///
/// # Safety
/// - `ptr` must be a live pointer returned by `weather_tank_new`.
/// - `out_resolution` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_get_resolution(
    ptr: *const WeatherTankInstance,
    out_resolution: *mut u32,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let resolution = with_sim(instance, |sim| u32::from(sim.resolution()))?;
        write_out(out_resolution, resolution, "out_resolution")
    })
}

/// Tick counter and channel totals of the display snapshots.
///
/// # Safety
/// - `ptr` must be a live pointer returned by `weather_tank_new`.
/// - `out_totals` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_get_totals(
    ptr: *const WeatherTankInstance,
    out_totals: *mut WeatherTankTotals,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let totals = with_sim(instance, |sim| WeatherTankTotals::new(sim.tick(), sim.totals()))?;
        write_out(out_totals, totals, "out_totals")
    })
}

/// Copy a display snapshot into a caller buffer of `capacity` floats.
///
/// Layout is row-major from the ground row up, four floats per cell, so a
/// full copy needs `4 * resolution * resolution` floats. `out_written`
/// receives the number of floats required even when the buffer is too small,
/// letting callers size their buffer with a first call using `capacity = 0`.
///
/// `field` is a [`WeatherTankField`] value; anything else is `InvalidParameter`.
///
/// # Safety
/// - `ptr` must be a live pointer returned by `weather_tank_new`.
/// - `buffer` must point to `capacity` writable floats (may be null if `capacity` is 0).
/// - `out_written` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_copy_snapshot(
    ptr: *const WeatherTankInstance,
    field: u32,
    buffer: *mut f32,
    capacity: usize,
    out_written: *mut usize,
) -> WeatherTankErrorCode {
    track_result(|| {
        if out_written.is_null() {
            return Err(DefaultWeatherTankError::null_pointer("out_written"));
        }
        let field = WeatherTankField::from_raw(field)?;
        let instance = instance_from_ptr(ptr)?;
        with_sim(instance, |sim| {
            let source = match field {
                WeatherTankField::Momentum => sim.momentum_snapshot().as_f32_slice(),
                WeatherTankField::Scalar => sim.scalar_snapshot().as_f32_slice(),
            };
            write_out(out_written, source.len(), "out_written")?;
            if capacity < source.len() {
                return Err(DefaultWeatherTankError::buffer_too_small(source.len(), capacity));
            }
            if buffer.is_null() {
                return Err(DefaultWeatherTankError::null_pointer("buffer"));
            }
            // SAFETY: non-null and the caller promises `capacity` writable floats.
            let target = unsafe { slice::from_raw_parts_mut(buffer, capacity) };
            target[..source.len()].copy_from_slice(source);
            Ok(())
        })?
    })
}
