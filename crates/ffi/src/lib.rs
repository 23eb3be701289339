//! C ABI for the weather tank
//!
//! Every function returns a [`WeatherTankErrorCode`] (0 = success) and
//! records a message retrievable with [`weather_tank_get_last_error`] on
//! failure. Instances are opaque heap objects owned by the caller between
//! [`weather_tank_new`] and [`weather_tank_destroy`].
//!
//! The header `WeatherTankFFI.h` is generated by `build.rs`.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{
    weather_tank_get_last_error, weather_tank_get_last_error_code, WeatherTankErrorCode,
};
pub use instance::{weather_tank_destroy, weather_tank_new, WeatherTankInstance};
pub use queries::{
    weather_tank_copy_snapshot, weather_tank_get_resolution, weather_tank_get_totals,
    weather_tank_sample, WeatherTankField, WeatherTankSample, WeatherTankTotals,
};
pub use simulation::{
    weather_tank_change_resolution, weather_tank_get_coefficient, weather_tank_load_preset_json,
    weather_tank_reset, weather_tank_set_coefficient, weather_tank_set_ground,
    weather_tank_set_reference_terrain, weather_tank_step,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};
    use std::ptr;

    fn new_tank(resolution: u32) -> *mut WeatherTankInstance {
        let mut tank = ptr::null_mut();
        let code = unsafe { weather_tank_new(resolution, &mut tank) };
        assert_eq!(code, WeatherTankErrorCode::Ok);
        assert!(!tank.is_null());
        tank
    }

    fn last_error() -> String {
        let msg = weather_tank_get_last_error();
        assert!(!msg.is_null());
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }

    #[test]
    fn test_new_rejects_unsupported_resolution() {
        let mut tank: *mut WeatherTankInstance = std::ptr::NonNull::dangling().as_ptr();
        let code = unsafe { weather_tank_new(100, &mut tank) };
        assert_eq!(code, WeatherTankErrorCode::InvalidResolution);
        assert!(tank.is_null());
        assert_eq!(weather_tank_get_last_error_code(), WeatherTankErrorCode::InvalidResolution);
        assert!(last_error().contains("100"));

        let code = unsafe { weather_tank_new(64, ptr::null_mut()) };
        assert_eq!(code, WeatherTankErrorCode::NullPointer);
    }

    #[test]
    fn test_step_and_sample() {
        let tank = new_tank(64);
        unsafe {
            assert_eq!(weather_tank_set_reference_terrain(tank), WeatherTankErrorCode::Ok);
            assert_eq!(weather_tank_step(tank, 3), WeatherTankErrorCode::Ok);
            assert!(weather_tank_get_last_error().is_null());

            let mut sample = WeatherTankSample::default();
            assert_eq!(weather_tank_sample(tank, 0.5, 0.0, &mut sample), WeatherTankErrorCode::Ok);
            assert!(sample.humidity.is_finite());

            let mut totals = WeatherTankTotals::default();
            assert_eq!(weather_tank_get_totals(tank, &mut totals), WeatherTankErrorCode::Ok);
            assert_eq!(totals.tick, 3);

            assert_eq!(
                weather_tank_sample(tank, 0.5, 0.5, ptr::null_mut()),
                WeatherTankErrorCode::NullPointer
            );
            weather_tank_destroy(tank);
        }
    }

    #[test]
    fn test_null_instance_is_reported() {
        let code = unsafe { weather_tank_step(ptr::null(), 1) };
        assert_eq!(code, WeatherTankErrorCode::NullPointer);
        assert_eq!(last_error(), "Parameter 'instance' cannot be null");
        unsafe { weather_tank_destroy(ptr::null_mut()) };
    }

    #[test]
    fn test_coefficients_by_name() {
        let tank = new_tank(64);
        let name = CString::new("globalWind").unwrap();
        let bogus = CString::new("windiness").unwrap();
        unsafe {
            assert_eq!(
                weather_tank_set_coefficient(tank, name.as_ptr(), 0.3),
                WeatherTankErrorCode::Ok
            );
            let mut value = 0.0_f32;
            assert_eq!(
                weather_tank_get_coefficient(tank, name.as_ptr(), &mut value),
                WeatherTankErrorCode::Ok
            );
            assert_eq!(value, 0.3);

            assert_eq!(
                weather_tank_set_coefficient(tank, bogus.as_ptr(), 1.0),
                WeatherTankErrorCode::InvalidParameter
            );
            assert_eq!(last_error(), "Unknown parameter 'windiness'");
            weather_tank_destroy(tank);
        }
    }

    #[test]
    fn test_ground_column_range() {
        let tank = new_tank(64);
        unsafe {
            assert_eq!(weather_tank_set_ground(tank, 15, 0.5, 0.2), WeatherTankErrorCode::Ok);
            assert_eq!(
                weather_tank_set_ground(tank, 16, 0.5, 0.2),
                WeatherTankErrorCode::ColumnOutOfRange
            );
            weather_tank_destroy(tank);
        }
    }

    #[test]
    fn test_resolution_change_and_snapshot_copy() {
        let tank = new_tank(64);
        unsafe {
            assert_eq!(
                weather_tank_change_resolution(tank, 1000),
                WeatherTankErrorCode::InvalidResolution
            );
            assert_eq!(weather_tank_change_resolution(tank, 128), WeatherTankErrorCode::Ok);
            let mut resolution = 0_u32;
            weather_tank_get_resolution(tank, &mut resolution);
            assert_eq!(resolution, 128);

            // Size query first, then the real copy
            let mut written = 0_usize;
            let code = weather_tank_copy_snapshot(
                tank,
                WeatherTankField::Scalar as u32,
                ptr::null_mut(),
                0,
                &mut written,
            );
            assert_eq!(code, WeatherTankErrorCode::BufferTooSmall);
            assert_eq!(written, 4 * 128 * 128);

            let mut buffer = vec![-1.0_f32; written];
            let code = weather_tank_copy_snapshot(
                tank,
                WeatherTankField::Scalar as u32,
                buffer.as_mut_ptr(),
                buffer.len(),
                &mut written,
            );
            assert_eq!(code, WeatherTankErrorCode::Ok);
            // temperature, rain, humidity, mist of the first cell
            let humidity = weather_tank_core::Coefficients::default().initial_humidity;
            assert_eq!(&buffer[..4], &[0.0, 0.0, humidity, 0.0]);

            // Field selectors outside the enum are rejected before any copy
            buffer.fill(-1.0);
            let code = weather_tank_copy_snapshot(
                tank,
                2,
                buffer.as_mut_ptr(),
                buffer.len(),
                &mut written,
            );
            assert_eq!(code, WeatherTankErrorCode::InvalidParameter);
            assert!(last_error().contains("Unknown field 2"));
            assert!(buffer.iter().all(|&v| v == -1.0));
            weather_tank_destroy(tank);
        }
    }

    #[test]
    fn test_load_preset_document() {
        let tank = new_tank(64);
        let json = CString::new(
            r#"{"preset": "Foggy", "remembered": {
                "Foggy": {"0": {"initialHumidity": 0.8, "resolution": "128"}},
                "Dry": {"0": {"initialHumidity": 0.1}}
            }}"#,
        )
        .unwrap();
        let dry = CString::new("Dry").unwrap();
        let missing = CString::new("Tornado").unwrap();
        unsafe {
            assert_eq!(
                weather_tank_load_preset_json(tank, json.as_ptr(), ptr::null()),
                WeatherTankErrorCode::Ok
            );
            let mut sample = WeatherTankSample::default();
            weather_tank_sample(tank, 0.5, 0.5, &mut sample);
            assert_eq!(sample.humidity, 0.8);

            assert_eq!(
                weather_tank_load_preset_json(tank, json.as_ptr(), dry.as_ptr()),
                WeatherTankErrorCode::Ok
            );
            assert_eq!(
                weather_tank_load_preset_json(tank, json.as_ptr(), missing.as_ptr()),
                WeatherTankErrorCode::InvalidPreset
            );

            let broken = CString::new("{not json").unwrap();
            assert_eq!(
                weather_tank_load_preset_json(tank, broken.as_ptr(), ptr::null()),
                WeatherTankErrorCode::InvalidPreset
            );
            weather_tank_destroy(tank);
        }
    }
}
