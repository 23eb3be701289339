//! Supported grid resolutions
//!
//! Both fields share one square resolution. Only power-of-two sizes between
//! 64 and 4096 cells per side are supported; anything else is rejected before
//! any buffer is touched.

use crate::SimError;
use serde::{Deserialize, Serialize};

/// Grid resolution (cells per side)
///
/// Serializes as the bare side length so presets can store `"resolution": 256`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum Resolution {
    /// 64×64
    R64,
    /// 128×128
    R128,
    /// 256×256
    #[default]
    R256,
    /// 512×512
    R512,
    /// 1024×1024
    R1024,
    /// 2048×2048
    R2048,
    /// 4096×4096
    R4096,
}

impl Resolution {
    /// All supported resolutions in ascending order
    pub const ALL: [Resolution; 7] = [
        Resolution::R64,
        Resolution::R128,
        Resolution::R256,
        Resolution::R512,
        Resolution::R1024,
        Resolution::R2048,
        Resolution::R4096,
    ];

    /// Cells per side
    #[must_use]
    pub const fn cells(&self) -> usize {
        match self {
            Self::R64 => 64,
            Self::R128 => 128,
            Self::R256 => 256,
            Self::R512 => 512,
            Self::R1024 => 1024,
            Self::R2048 => 2048,
            Self::R4096 => 4096,
        }
    }

    /// Total number of cells in one buffer
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cells() * self.cells()
    }
}

impl TryFrom<u32> for Resolution {
    type Error = SimError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.cells() == value as usize)
            .ok_or(SimError::InvalidResolution(value))
    }
}

impl From<Resolution> for u32 {
    fn from(value: Resolution) -> Self {
        value.cells() as u32
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.cells(), self.cells())
    }
}
