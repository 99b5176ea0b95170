//! Haptic feedback requests and their translation into actuator commands
//!
//! Requests come in two mutually exclusive forms: a waveform pattern of
//! durations, or a single pulse described by an intensity and an optional
//! duration. Every request resolves successfully. A missing actuator, a
//! malformed pattern or a failing actuator is logged, never reported back.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::InputSettings;
use crate::error::HapticsError;

const AMPLITUDE_LIGHT: u8 = 50;
const AMPLITUDE_MEDIUM: u8 = 150;
const AMPLITUDE_HEAVY: u8 = 255;

const DURATION_SHORT_MS: u64 = 10;
const DURATION_MEDIUM_MS: u64 = 25;
const DURATION_LONG_MS: u64 = 50;

/// Capability sink that drives the vibration hardware.
pub trait HapticActuator: Send + Sync {
    fn has_actuator(&self) -> bool;

    /// Plays `timings` once (alternating on/off durations in ms, no repeat).
    fn play_waveform(&self, timings: &[u64]) -> Result<(), HapticsError>;

    /// Plays one pulse; `amplitude` of `None` means the device default.
    fn play_one_shot(&self, duration_ms: u64, amplitude: Option<u8>) -> Result<(), HapticsError>;
}

/// Sink for devices without vibration hardware
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl HapticActuator for NoHaptics {
    fn has_actuator(&self) -> bool {
        false
    }

    fn play_waveform(&self, _timings: &[u64]) -> Result<(), HapticsError> {
        Err(HapticsError::Unavailable("no actuator".to_string()))
    }

    fn play_one_shot(&self, _duration_ms: u64, _amplitude: Option<u8>) -> Result<(), HapticsError> {
        Err(HapticsError::Unavailable("no actuator".to_string()))
    }
}

/// Sink that only logs commands, for headless runs
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingActuator;

impl HapticActuator for LoggingActuator {
    fn has_actuator(&self) -> bool {
        true
    }

    fn play_waveform(&self, timings: &[u64]) -> Result<(), HapticsError> {
        info!("Haptic waveform: {:?}", timings);
        Ok(())
    }

    fn play_one_shot(&self, duration_ms: u64, amplitude: Option<u8>) -> Result<(), HapticsError> {
        info!("Haptic pulse: {}ms at amplitude {:?}", duration_ms, amplitude);
        Ok(())
    }
}

/// Named intensity preset. Any unrecognised name means medium.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HapticIntensity {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl HapticIntensity {
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => HapticIntensity::Light,
            "heavy" => HapticIntensity::Heavy,
            _ => HapticIntensity::Medium,
        }
    }

    pub const fn amplitude(self) -> u8 {
        match self {
            HapticIntensity::Light => AMPLITUDE_LIGHT,
            HapticIntensity::Medium => AMPLITUDE_MEDIUM,
            HapticIntensity::Heavy => AMPLITUDE_HEAVY,
        }
    }
}

/// One loosely typed pattern entry as it arrives from a transport
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Flag(bool),
    /// null, arrays, objects; never a duration
    #[serde(skip_serializing)]
    Other(IgnoredAny),
}

impl PatternValue {
    /// Duration in ms, or `None` if the entry is not a non-negative number.
    fn as_millis(&self) -> Option<u64> {
        let value = match self {
            PatternValue::Integer(n) => return u64::try_from(*n).ok(),
            PatternValue::Float(f) => *f,
            PatternValue::Text(s) => s.trim().parse::<f64>().ok()?,
            PatternValue::Flag(_) | PatternValue::Other(_) => return None,
        };
        (value.is_finite() && value >= 0.0).then_some(value as u64)
    }
}

impl From<u64> for PatternValue {
    fn from(ms: u64) -> Self {
        PatternValue::Integer(ms as i64)
    }
}

/// Caller-facing haptics request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HapticsRequest {
    /// Alternating vibrate/pause durations; overrides everything else
    pub pattern: Option<Vec<PatternValue>>,
    /// `"light"`, `"medium"` or `"heavy"`
    pub intensity: Option<String>,
    /// 0.0-1.0, takes precedence over `intensity`
    pub custom_intensity: Option<f64>,
    /// Pulse length in ms
    pub duration: Option<i64>,
}

impl HapticsRequest {
    pub fn pattern<I: IntoIterator<Item = u64>>(timings: I) -> Self {
        Self {
            pattern: Some(timings.into_iter().map(PatternValue::from).collect()),
            ..Default::default()
        }
    }

    pub fn intensity(name: impl Into<String>) -> Self {
        Self {
            intensity: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn custom(custom_intensity: f64, duration: Option<i64>) -> Self {
        Self {
            custom_intensity: Some(custom_intensity),
            duration,
            ..Default::default()
        }
    }
}

/// Normalized command handed to the actuator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HapticCommand {
    Waveform { timings: Vec<u64> },
    OneShot { duration_ms: u64, amplitude: Option<u8> },
}

/// What happened to a request. Every variant counts as success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HapticOutcome {
    NoActuator,
    Played(HapticCommand),
    ActuatorFailed(HapticCommand),
}

/// Maps a preset or custom intensity onto the 1-255 amplitude range.
pub fn amplitude_for(request: &HapticsRequest) -> u8 {
    match request.custom_intensity {
        Some(custom) => {
            let scaled = (custom.clamp(0.0, 1.0) * 255.0) as i64;
            scaled.clamp(1, 255) as u8
        }
        None => request
            .intensity
            .as_deref()
            .map(HapticIntensity::from_name)
            .unwrap_or_default()
            .amplitude(),
    }
}

/// Duration tier for a pulse without an explicit duration
pub fn default_duration_for(amplitude: u8) -> u64 {
    if amplitude <= AMPLITUDE_LIGHT {
        DURATION_SHORT_MS
    } else if amplitude >= 200 {
        DURATION_LONG_MS
    } else {
        DURATION_MEDIUM_MS
    }
}

/// Resolves a request into the command the actuator should play.
pub fn resolve(request: &HapticsRequest, max_duration_ms: u64) -> HapticCommand {
    if let Some(pattern) = request.pattern.as_ref().filter(|p| !p.is_empty()) {
        match pattern.iter().map(PatternValue::as_millis).collect::<Option<Vec<_>>>() {
            Some(timings) => return HapticCommand::Waveform { timings },
            None => warn!(
                "Malformed haptic pattern {:?}, falling back to single pulse",
                pattern
            ),
        }
    }

    let amplitude = amplitude_for(request);
    let duration_ms = match request.duration {
        Some(duration) => duration.clamp(0, max_duration_ms as i64) as u64,
        None => default_duration_for(amplitude),
    };

    HapticCommand::OneShot {
        duration_ms,
        amplitude: Some(amplitude),
    }
}

/// Front end over a [`HapticActuator`] applying the configured bounds.
pub struct Haptics {
    actuator: Arc<dyn HapticActuator>,
    max_duration_ms: u64,
    vibrate_default_ms: u64,
}

impl std::fmt::Debug for Haptics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Haptics")
            .field("has_actuator", &self.actuator.has_actuator())
            .field("max_duration_ms", &self.max_duration_ms)
            .field("vibrate_default_ms", &self.vibrate_default_ms)
            .finish()
    }
}

impl Haptics {
    pub fn new(actuator: Arc<dyn HapticActuator>, settings: &InputSettings) -> Self {
        Self {
            actuator,
            max_duration_ms: settings.max_haptic_duration_ms,
            vibrate_default_ms: settings.vibrate_default_ms,
        }
    }

    pub fn trigger(&self, request: &HapticsRequest) -> HapticOutcome {
        if !self.actuator.has_actuator() {
            debug!("No haptic actuator, skipping request");
            return HapticOutcome::NoActuator;
        }
        self.play(resolve(request, self.max_duration_ms))
    }

    /// Plain pulse at the device's default amplitude.
    pub fn vibrate(&self, duration_ms: Option<i64>) -> HapticOutcome {
        if !self.actuator.has_actuator() {
            debug!("No haptic actuator, skipping vibrate");
            return HapticOutcome::NoActuator;
        }
        let duration_ms = duration_ms
            .map(|d| d.clamp(0, self.max_duration_ms as i64) as u64)
            .unwrap_or(self.vibrate_default_ms);
        self.play(HapticCommand::OneShot {
            duration_ms,
            amplitude: None,
        })
    }

    fn play(&self, command: HapticCommand) -> HapticOutcome {
        let result = match &command {
            HapticCommand::Waveform { timings } => self.actuator.play_waveform(timings),
            HapticCommand::OneShot {
                duration_ms,
                amplitude,
            } => self.actuator.play_one_shot(*duration_ms, *amplitude),
        };

        match result {
            Ok(()) => {
                debug!("Played haptic command {:?}", command);
                HapticOutcome::Played(command)
            }
            Err(e) => {
                warn!("Haptic actuator failed on {:?}: {}", command, e);
                HapticOutcome::ActuatorFailed(command)
            }
        }
    }
}
