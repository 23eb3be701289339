//! Named coefficient presets
//!
//! Presets are stored in the document layout written by the browser control
//! panel:
//!
//! ```json
//! {
//!   "preset": "Thunderstorm",
//!   "remembered": {
//!     "Thunderstorm": { "0": { "buoyancyFactor": 0.02, "resolution": 256 } }
//!   }
//! }
//! ```
//!
//! Every entry is a flat key → value map. Keys that are not coefficients
//! (colors, opacities, display toggles) are ignored on load and not written
//! back.

use crate::solver::Resolution;
use crate::{Coefficients, SimError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Name the control panel gives its built-in entry
pub const DEFAULT_PRESET: &str = "Default";

/// One named configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Preset {
    /// Physical coefficients
    pub coefficients: Coefficients,
    /// Grid resolution, if the preset pins one
    pub resolution: Option<Resolution>,
}

#[derive(Deserialize)]
struct PresetDocument {
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    remembered: FxHashMap<String, FxHashMap<String, Map<String, Value>>>,
}

#[derive(Serialize)]
struct PresetDocumentOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    preset: Option<&'a str>,
    remembered: BTreeMap<&'a str, BTreeMap<&'static str, Map<String, Value>>>,
}

/// Collection of named presets plus the currently selected name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetBook {
    selected: Option<String>,
    presets: FxHashMap<String, Preset>,
}

/// Resolution stored either as a number or as the string a dropdown writes
fn parse_resolution(value: &Value) -> Result<Resolution, SimError> {
    let side = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .and_then(|v| u32::try_from(v).ok())
    .ok_or_else(|| SimError::Preset(format!("resolution {value} is not an integer")))?;
    Resolution::try_from(side)
}

impl PresetBook {
    /// A book holding only [`DEFAULT_PRESET`] with default coefficients
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut book = Self::default();
        book.insert(
            DEFAULT_PRESET,
            Preset {
                coefficients: Coefficients::default(),
                resolution: Some(Resolution::default()),
            },
        );
        book.selected = Some(DEFAULT_PRESET.to_string());
        book
    }

    /// Parse a preset document
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Preset`] for malformed JSON or wrongly typed
    /// coefficient values, [`SimError::InvalidResolution`] for an unsupported
    /// resolution entry.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let document: PresetDocument =
            serde_json::from_str(json).map_err(|e| SimError::Preset(e.to_string()))?;

        let mut presets = FxHashMap::default();
        for (name, groups) in document.remembered {
            let Some(values) = groups.get("0").or_else(|| groups.values().next()) else {
                continue;
            };
            let resolution = values.get("resolution").map(parse_resolution).transpose()?;
            let coefficients: Coefficients = serde_json::from_value(Value::Object(values.clone()))
                .map_err(|e| SimError::Preset(format!("preset '{name}': {e}")))?;
            presets.insert(
                name,
                Preset {
                    coefficients,
                    resolution,
                },
            );
        }
        debug!("Loaded {} presets", presets.len());

        Ok(Self {
            selected: document.preset,
            presets,
        })
    }

    /// Emit the preset document, entries sorted by name
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Preset`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SimError> {
        let mut remembered = BTreeMap::new();
        for (name, preset) in &self.presets {
            let mut values = match serde_json::to_value(preset.coefficients) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(SimError::Preset(format!(
                        "coefficients serialized as {other}"
                    )))
                }
                Err(e) => return Err(SimError::Preset(e.to_string())),
            };
            if let Some(resolution) = preset.resolution {
                values.insert("resolution".into(), Value::from(u32::from(resolution)));
            }
            remembered.insert(name.as_str(), BTreeMap::from([("0", values)]));
        }
        let document = PresetDocumentOut {
            preset: self.selected.as_deref(),
            remembered,
        };
        serde_json::to_string_pretty(&document).map_err(|e| SimError::Preset(e.to_string()))
    }

    /// Look up a preset by name
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPreset`] if the book has no such entry.
    pub fn get(&self, name: &str) -> Result<&Preset, SimError> {
        self.presets
            .get(name)
            .ok_or_else(|| SimError::UnknownPreset(name.to_string()))
    }

    /// Add or replace a preset
    pub fn insert(&mut self, name: impl Into<String>, preset: Preset) {
        self.presets.insert(name.into(), preset);
    }

    /// Name recorded as selected in the document
    #[must_use]
    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected preset, if it exists in the book
    #[must_use]
    pub fn selected(&self) -> Option<&Preset> {
        self.selected.as_deref().and_then(|n| self.presets.get(n))
    }

    /// Mark a preset as selected
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPreset`] if the book has no such entry.
    pub fn select(&mut self, name: &str) -> Result<(), SimError> {
        self.get(name)?;
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Preset names in alphabetical order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of presets
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
