use crate::error::{
    with_last_error_mut, DefaultWeatherTankError, WeatherTankError, WeatherTankErrorCode,
};
use crate::instance::WeatherTankInstance;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use tracing::warn;
use weather_tank_core::WeatherSimulation;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl WeatherTankError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error and return its code.
#[inline]
pub(crate) fn track_error(error: &impl WeatherTankError) -> WeatherTankErrorCode {
    warn!(code = ?error.code(), "{}", error.msg());
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WeatherTankErrorCode::Ok;
    });
}

/// Collapse an FFI body into a return code, recording the error or clearing it.
pub(crate) fn track_result<F>(body: F) -> WeatherTankErrorCode
where
    F: FnOnce() -> Result<(), DefaultWeatherTankError>,
{
    match body() {
        Ok(()) => {
            clear_last_error();
            WeatherTankErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow an instance from a caller pointer.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const WeatherTankInstance,
) -> Result<&'a WeatherTankInstance, DefaultWeatherTankError> {
    // SAFETY: callers promise the pointer came from `weather_tank_new` and is live.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultWeatherTankError::null_pointer("instance"))
}

/// Borrow a C string argument as UTF-8.
pub(crate) fn str_from_ptr<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultWeatherTankError> {
    if ptr.is_null() {
        return Err(DefaultWeatherTankError::null_pointer(param_name));
    }
    // SAFETY: non-null and the caller promises a NUL-terminated string.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| DefaultWeatherTankError::invalid_string(param_name))
}

/// Run `f` under the simulation read lock.
pub(crate) fn with_sim<F, R>(
    instance: &WeatherTankInstance,
    f: F,
) -> Result<R, DefaultWeatherTankError>
where
    F: FnOnce(&WeatherSimulation) -> R,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultWeatherTankError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` under the simulation write lock.
pub(crate) fn with_sim_mut<F, R>(
    instance: &WeatherTankInstance,
    f: F,
) -> Result<R, DefaultWeatherTankError>
where
    F: FnOnce(&mut WeatherSimulation) -> R,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultWeatherTankError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}
