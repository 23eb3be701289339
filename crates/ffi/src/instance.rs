use std::ptr;
use std::sync::RwLock;

use weather_tank_core::{Coefficients, Resolution, WeatherSimulation};

use crate::error::{DefaultWeatherTankError, WeatherTankErrorCode};
use crate::helpers::{clear_last_error, track_error};

/// Opaque handle owning one weather tank.
///
/// # Thread Safety
/// The simulation sits behind an `RwLock`: probes and snapshot copies take
/// the read lock and may run concurrently, while stepping and configuration
/// take the write lock. A reader never sees a tick half-published.
///
/// ## Example (C)
/// ```c
/// WeatherTankInstance* tank = NULL;
/// if (weather_tank_new(256, &tank) != Ok) {
///     fprintf(stderr, "%s\n", weather_tank_get_last_error());
///     return;
/// }
/// weather_tank_set_reference_terrain(tank);
/// weather_tank_step(tank, 1);
/// WeatherTankSample s;
/// weather_tank_sample(tank, 0.5f, 0.1f, &s);
/// weather_tank_destroy(tank);
/// ```
pub struct WeatherTankInstance {
    pub(crate) sim: RwLock<WeatherSimulation>,
}

impl WeatherTankInstance {
    /// Creates a seeded tank with default coefficients.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` if `resolution` is not a supported side length.
    pub(crate) fn new(resolution: u32) -> Result<Box<Self>, DefaultWeatherTankError> {
        let resolution = Resolution::try_from(resolution)?;
        Ok(Box::new(Self {
            sim: RwLock::new(WeatherSimulation::new(resolution, Coefficients::default())),
        }))
    }
}

/// Create a new tank and return it via out-parameter.
///
/// Returns
/// - `Ok` (0) with `*out_instance` set to the new instance
/// - `NullPointer` if `out_instance` is null
/// - `InvalidResolution` if `resolution` is not one of 64..4096 (powers of two);
///   `*out_instance` is set to null
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the instance and MUST call `weather_tank_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_new(
    resolution: u32,
    out_instance: *mut *mut WeatherTankInstance,
) -> WeatherTankErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultWeatherTankError::null_pointer("out_instance"));
    }

    match WeatherTankInstance::new(resolution) {
        Ok(instance) => {
            // SAFETY: checked non-null above; caller guarantees it is writable.
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            clear_last_error();
            WeatherTankErrorCode::Ok
        }
        Err(error) => {
            // SAFETY: as above.
            unsafe {
                *out_instance = ptr::null_mut();
            }
            track_error(&error)
        }
    }
}

/// Destroy a tank created by `weather_tank_new`. Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `weather_tank_new` and not freed already.
/// - The pointer must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn weather_tank_destroy(ptr: *mut WeatherTankInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: the pointer came from `Box::into_raw` in `weather_tank_new`.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
