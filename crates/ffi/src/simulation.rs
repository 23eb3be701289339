//! Stepping and configuration entry points (write lock)

use std::os::raw::c_char;

use weather_tank_core::{GroundBoundary, PresetBook, SimError, WeatherSimulation};

use crate::error::{DefaultWeatherTankError, WeatherTankErrorCode};
use crate::helpers::{instance_from_ptr, str_from_ptr, track_result, with_sim, with_sim_mut};
use crate::instance::WeatherTankInstance;

/// Advance the tank by `ticks` full timesteps.
///
/// Takes the write lock once for all ticks.
///
/// # Safety
/// `ptr` must be a live pointer returned by `weather_tank_new`.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_step(
    ptr: *const WeatherTankInstance,
    ticks: u32,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        with_sim_mut(instance, |sim| {
            for _ in 0..ticks {
                sim.advance_one_step();
            }
        })
    })
}

/// Set one coefficient by its preset key (e.g. `"buoyancyFactor"`).
///
/// Returns `InvalidParameter` for unknown keys. Takes effect on the next tick;
/// `initialHumidity` only matters at the next reseed.
///
/// # Safety
/// - `ptr` must be a live pointer returned by `weather_tank_new`.
/// - `name` must be a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_set_coefficient(
    ptr: *const WeatherTankInstance,
    name: *const c_char,
    value: f32,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let name = str_from_ptr(name, "name")?;
        with_sim_mut(instance, |sim| sim.set_parameter(name, value))??;
        Ok(())
    })
}

/// Read one coefficient by its preset key.
///
/// # Safety
/// - `ptr` must be a live pointer returned by `weather_tank_new`.
/// - `name` must be a NUL-terminated string.
/// - `out_value` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_get_coefficient(
    ptr: *const WeatherTankInstance,
    name: *const c_char,
    out_value: *mut f32,
) -> WeatherTankErrorCode {
    track_result(|| {
        if out_value.is_null() {
            return Err(DefaultWeatherTankError::null_pointer("out_value"));
        }
        let instance = instance_from_ptr(ptr)?;
        let name = str_from_ptr(name, "name")?;
        let value = with_sim(instance, |sim| sim.coefficients().parameter(name))??;
        // SAFETY: checked non-null above.
        unsafe {
            *out_value = value;
        }
        Ok(())
    })
}

/// Load a preset document and apply one of its entries.
///
/// `preset_name` may be null to use the document's selected preset. A preset
/// that pins a different resolution reseeds the tank at that size.
///
/// # Safety
/// - `ptr` must be a live pointer returned by `weather_tank_new`.
/// - `json` must be a NUL-terminated string; `preset_name` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_load_preset_json(
    ptr: *const WeatherTankInstance,
    json: *const c_char,
    preset_name: *const c_char,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let json = str_from_ptr(json, "json")?;
        let book = PresetBook::from_json(json)?;
        let preset = if preset_name.is_null() {
            *book.selected().ok_or_else(|| {
                SimError::Preset("document does not select an existing preset".to_string())
            })?
        } else {
            *book.get(str_from_ptr(preset_name, "preset_name")?)?
        };
        with_sim_mut(instance, |sim| sim.apply_preset(&preset))
    })
}

/// Overwrite one ground column (`0..16`) with temperature and humidity forcing.
///
/// # Safety
/// `ptr` must be a live pointer returned by `weather_tank_new`.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_set_ground(
    ptr: *const WeatherTankInstance,
    column: u32,
    temperature: f32,
    humidity: f32,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        with_sim_mut(instance, |sim| {
            sim.set_ground_boundary(column as usize, temperature, humidity)
        })??;
        Ok(())
    })
}

/// Replace the ground boundary with the built-in reference pattern.
///
/// # Safety
/// `ptr` must be a live pointer returned by `weather_tank_new`.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_set_reference_terrain(
    ptr: *const WeatherTankInstance,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        with_sim_mut(instance, |sim| sim.set_ground(GroundBoundary::reference_terrain()))
    })
}

/// Reallocate at a new resolution and reseed.
///
/// On `InvalidResolution` the tank keeps its old resolution and state.
///
/// # Safety
/// `ptr` must be a live pointer returned by `weather_tank_new`.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_change_resolution(
    ptr: *const WeatherTankInstance,
    resolution: u32,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        with_sim_mut(instance, |sim| sim.change_resolution(resolution))??;
        Ok(())
    })
}

/// Reseed at the current resolution.
///
/// # Safety
/// `ptr` must be a live pointer returned by `weather_tank_new`.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_reset(
    ptr: *const WeatherTankInstance,
) -> WeatherTankErrorCode {
    track_result(|| {
        let instance = instance_from_ptr(ptr)?;
        with_sim_mut(instance, WeatherSimulation::reset)
    })
}
