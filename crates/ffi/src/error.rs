use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use weather_tank_core::SimError;

/// Common interface for errors crossing the C boundary.
///
/// - `code()` is what the C caller receives as a return value
/// - `msg()` is stored for `weather_tank_get_last_error`
pub(crate) trait WeatherTankError {
    fn code(&self) -> WeatherTankErrorCode;

    fn msg(&self) -> &str;
}

/// Error raised by the FFI layer itself (bad pointers, bad strings, lock failures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultWeatherTankError {
    code: WeatherTankErrorCode,
    msg: String,
}

impl DefaultWeatherTankError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: WeatherTankErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Lock poisoned by a panic on another thread.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: WeatherTankErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// String argument that is not valid UTF-8.
    pub fn invalid_string(param_name: &str) -> Self {
        Self {
            code: WeatherTankErrorCode::InvalidParameter,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }

    /// Output buffer shorter than the snapshot being copied.
    pub fn buffer_too_small(required: usize, capacity: usize) -> Self {
        Self {
            code: WeatherTankErrorCode::BufferTooSmall,
            msg: format!("Buffer holds {capacity} floats, {required} required"),
        }
    }

    /// Unknown enum discriminant or otherwise unusable argument.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: WeatherTankErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl WeatherTankError for DefaultWeatherTankError {
    fn code(&self) -> WeatherTankErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<SimError> for DefaultWeatherTankError {
    fn from(error: SimError) -> Self {
        let code = match error {
            SimError::InvalidResolution(_) => WeatherTankErrorCode::InvalidResolution,
            SimError::BoundaryColumnOutOfRange { .. } => WeatherTankErrorCode::ColumnOutOfRange,
            SimError::UnknownParameter(_) | SimError::ParameterOutOfRange { .. } => {
                WeatherTankErrorCode::InvalidParameter
            }
            SimError::Preset(_) | SimError::UnknownPreset(_) => WeatherTankErrorCode::InvalidPreset,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by weather tank functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherTankErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// Internal lock was poisoned by a panic.
    LockPoisoned = 2,

    /// Resolution is not one of 64, 128, 256, 512, 1024, 2048, 4096.
    InvalidResolution = 3,

    /// Ground column index past the end of the boundary.
    ColumnOutOfRange = 4,

    /// Unknown coefficient name, bad string or bad enum value.
    InvalidParameter = 5,

    /// Preset document could not be parsed or names an unknown preset.
    InvalidPreset = 6,

    /// Caller-provided buffer is too small.
    BufferTooSmall = 7,
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is kept here so pointers handed out stay valid until the next call.
    static LAST_ERROR: RefCell<(Option<CString>, WeatherTankErrorCode)> =
        const { RefCell::new((None, WeatherTankErrorCode::Ok)) };
}

pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, WeatherTankErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, WeatherTankErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns null if the last call on this thread succeeded.
///
/// # Lifetime
/// The pointer is valid until the next FFI call on this thread.
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// WeatherTankInstance* tank = NULL;
/// if (weather_tank_new(300, &tank) != Ok) {
///     fprintf(stderr, "%s\n", weather_tank_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn weather_tank_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn weather_tank_get_last_error_code() -> WeatherTankErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
