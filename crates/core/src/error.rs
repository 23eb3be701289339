//! Error type for the simulation kernel
//!
//! The kernel is total over well-formed grids; the only failures are rejected
//! requests from the driver (bad resolution, bad boundary column) and malformed
//! configuration input.

/// Errors returned by driver-facing operations
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Requested grid size is not one of the supported resolutions
    InvalidResolution(u32),
    /// Ground boundary write outside the column range
    BoundaryColumnOutOfRange {
        /// Requested column
        column: usize,
        /// Number of columns in the boundary
        columns: usize,
    },
    /// Parameter name not known to [`crate::Coefficients`]
    UnknownParameter(String),
    /// Parameter outside its tested range
    ParameterOutOfRange {
        /// Preset key of the parameter
        name: &'static str,
        /// Offending value
        value: f32,
        /// Lower bound of the tested range
        min: f32,
        /// Upper bound of the tested range
        max: f32,
    },
    /// Preset document could not be parsed or emitted
    Preset(String),
    /// Named preset is not present in the preset book
    UnknownPreset(String),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidResolution(value) => write!(
                f,
                "Invalid resolution {value}: expected one of 64, 128, 256, 512, 1024, 2048, 4096"
            ),
            SimError::BoundaryColumnOutOfRange { column, columns } => write!(
                f,
                "Ground boundary column {column} out of range (boundary has {columns} columns)"
            ),
            SimError::UnknownParameter(name) => write!(f, "Unknown parameter '{name}'"),
            SimError::ParameterOutOfRange {
                name,
                value,
                min,
                max,
            } => write!(
                f,
                "Parameter '{name}' = {value} outside tested range [{min}, {max}]"
            ),
            SimError::Preset(msg) => write!(f, "Preset error: {msg}"),
            SimError::UnknownPreset(name) => write!(f, "Unknown preset '{name}'"),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SimError::UnknownParameter("foo".into()).to_string(),
            "Unknown parameter 'foo'"
        );
        let err = SimError::BoundaryColumnOutOfRange {
            column: 16,
            columns: 16,
        };
        assert!(err.to_string().contains("column 16"));
        assert!(SimError::InvalidResolution(100)
            .to_string()
            .starts_with("Invalid resolution 100"));
    }
}
