//! Error types for the edges of the input core.
//!
//! None of the aggregator operations return errors to their callers. Errors
//! only exist where the crate touches the outside world, namely loading
//! settings and starting a hardware backend. Haptic actuator failures are
//! logged by [`Haptics`](crate::haptics::Haptics) and never surface.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or wiring up the input core.
#[derive(Debug, Error)]
pub enum InputError {
    /// Settings file could not be parsed or holds out-of-range values
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Settings file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hardware backend failed to start
    #[error("Backend error: {0}")]
    Backend(String),
}

impl InputError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Failures reported by a [`HapticActuator`](crate::haptics::HapticActuator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapticsError {
    #[error("Actuator unavailable: {0}")]
    Unavailable(String),

    #[error("Command rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, InputError>;
