use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{InputError, Result};

const CONFIG_DIR_NAME: &str = "strata-input";
const CONFIG_FILE_NAME: &str = "input.toml";

/// Tunables for the input core, loadable from a TOML file.
///
/// Every field has a default, so a partial file (or no file at all) is valid.
///
/// ```toml
/// gamepad_deadzone = 0.2
///
/// [bindings]
/// jump = ["Space", "KeyJ"]
/// ```
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputSettings {
    /// Stick deadzone as a fraction of full range (0.0-1.0)
    ///
    /// Axis magnitudes at or below this value read as exactly zero.
    pub gamepad_deadzone: f32,

    /// Maximum number of physical inputs kept per action
    pub max_bindings_per_action: usize,

    /// Binding identifiers must be strictly shorter than this
    pub max_binding_length: usize,

    /// Upper clamp for explicit single-pulse durations
    pub max_haptic_duration_ms: u64,

    /// Duration used by `vibrate` when the caller gives none
    pub vibrate_default_ms: u64,

    /// Initial binding overrides, validated like caller-supplied bindings
    pub bindings: BTreeMap<String, Vec<String>>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            gamepad_deadzone: 0.15,
            max_bindings_per_action: 5,
            max_binding_length: 32,
            max_haptic_duration_ms: 10_000,
            vibrate_default_ms: 100,
            bindings: BTreeMap::new(),
        }
    }
}

impl InputSettings {
    /// Location of the settings file, `<config_dir>/strata-input/input.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parses settings from TOML text and validates them.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)
            .map_err(|e| InputError::config(format!("invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from `path`, falling back to defaults if the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Rejects values the rest of the crate cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.gamepad_deadzone) {
            return Err(InputError::config(format!(
                "gamepad_deadzone must be in [0, 1), got {}",
                self.gamepad_deadzone
            )));
        }
        if self.max_bindings_per_action == 0 {
            return Err(InputError::config("max_bindings_per_action must be positive"));
        }
        if self.max_binding_length == 0 {
            return Err(InputError::config("max_binding_length must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = InputSettings::from_toml_str("gamepad_deadzone = 0.2\n").unwrap();
        assert_eq!(settings.gamepad_deadzone, 0.2);
        assert_eq!(settings.max_bindings_per_action, 5);
        assert_eq!(settings.max_haptic_duration_ms, 10_000);
    }

    #[test]
    fn rejects_deadzone_of_full_range() {
        let err = InputSettings::from_toml_str("gamepad_deadzone = 1.0\n").unwrap_err();
        assert!(matches!(err, InputError::Config { .. }));
    }

    #[test]
    fn reads_binding_table() {
        let text = "[bindings]\njump = [\"Space\", \"KeyJ\"]\n";
        let settings = InputSettings::from_toml_str(text).unwrap();
        assert_eq!(
            settings.bindings.get("jump"),
            Some(&vec!["Space".to_string(), "KeyJ".to_string()])
        );
    }
}
