//! Group editing session settings
//!
//! [`GroupSettings`] captures the world-specific baselines an editing session
//! starts from: the start shift (the caller-controlled world-space origin
//! offset), the start center used when converting absolute reposition targets
//! into shift deltas, and the initial Y/Z basis-flip flag. Settings are plain
//! serde data and can be loaded from or saved to TOML and RON files.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Baselines for one group editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSettings {
    /// World-space origin offset at session start
    pub start_shift: Vec3,

    /// Center baseline added to reposition deltas
    pub start_center: Vec3,

    /// Whether the Y/Z basis flip is active at session start
    pub flip_zy: bool,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            start_shift: Vec3::zeros(),
            start_center: Vec3::zeros(),
            flip_zy: false,
        }
    }
}

impl GroupSettings {
    /// Create settings with all baselines at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start shift baseline
    #[must_use]
    pub fn with_start_shift(mut self, start_shift: Vec3) -> Self {
        self.start_shift = start_shift;
        self
    }

    /// Set the center baseline
    #[must_use]
    pub fn with_start_center(mut self, start_center: Vec3) -> Self {
        self.start_center = start_center;
        self
    }

    /// Set the initial basis-flip flag
    #[must_use]
    pub fn with_flip_zy(mut self, flip_zy: bool) -> Self {
        self.flip_zy = flip_zy;
        self
    }

    /// Load settings from a `.toml` or `.ron` file
    pub fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(SettingsError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))
        } else {
            Err(SettingsError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save settings to a `.toml` or `.ron` file
    pub fn save_to_file(&self, path: &str) -> Result<(), SettingsError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| SettingsError::Serialize(e.to_string()))?
        } else {
            return Err(SettingsError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(SettingsError::Io)
    }
}

/// Settings errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
