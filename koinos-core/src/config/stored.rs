//! Complete driver configuration blob
//!
//! The host may keep this in flash next to its own settings. A magic
//! number and version guard against loading stale or foreign data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{CaptureConfig, ChipSelectConfig, DisplayConfig};

/// Magic number identifying a Koinos configuration blob
pub const CONFIG_MAGIC: u32 = 0x4B4F_494E; // "KOIN"

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Errors from loading or storing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Data could not be decoded
    Deserialize,
    /// Data is not a Koinos configuration
    BadMagic,
    /// Data was written by an incompatible version
    UnsupportedVersion(u8),
}

/// Configuration of both bus consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverConfig {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Camera chip-select line (active-low)
    pub camera_cs: ChipSelectConfig,
    /// Camera capture settings
    pub camera: CaptureConfig,
    /// Memory display settings
    pub display: DisplayConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            camera_cs: ChipSelectConfig::active_low(16),
            camera: CaptureConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Check magic and version
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.magic != CONFIG_MAGIC {
            return Err(ConfigError::BadMagic);
        }
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
