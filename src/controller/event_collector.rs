//! gilrs-backed producer feeding motion events into an [`InputAggregator`]
//!
//! ```text
//! gilrs ──► EventCollector<Collecting> ──► InputAggregator::ingest_motion
//!              │ connect/disconnect
//!              └──► ControllerRoster + InputNotice
//! ```

use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use parking_lot::RwLock;
use statum::{machine, state};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::axis::{AxisReadings, InputSource, MotionEvent};
use super::selection::{ControllerDevice, ControllerProbe, DeviceId};
use crate::aggregator::InputAggregator;
use crate::error::InputError;

const POLL_INTERVAL: Duration = Duration::from_micros(500);

/// Controllers currently attached, kept current by the collector.
#[derive(Debug, Default)]
pub struct ControllerRoster {
    devices: RwLock<Vec<ControllerDevice>>,
}

impl ControllerRoster {
    fn refresh(&self, gilrs: &Gilrs) {
        let devices: Vec<ControllerDevice> = gilrs
            .gamepads()
            .map(|(id, gamepad)| ControllerDevice::new(device_id(id).0, gamepad.name()))
            .collect();
        debug!("Controller roster now has {} entries", devices.len());
        *self.devices.write() = devices;
    }

    fn index_of(&self, id: DeviceId) -> Option<usize> {
        self.devices.read().iter().position(|d| d.device_id == id)
    }
}

impl ControllerProbe for ControllerRoster {
    fn controllers(&self) -> Vec<ControllerDevice> {
        self.devices.read().clone()
    }
}

fn device_id(id: GamepadId) -> DeviceId {
    DeviceId(usize::from(id) as u32)
}

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
#[derive(Debug)]
pub struct EventCollector<S: CollectionState> {
    gilrs: Gilrs,

    aggregator: Arc<InputAggregator>,

    roster: Arc<ControllerRoster>,

    // Last readings per pad; each gilrs event carries only one axis
    readings: HashMap<GamepadId, AxisReadings>,
}

impl EventCollector<Initializing> {
    pub fn create(
        aggregator: Arc<InputAggregator>,
        roster: Arc<ControllerRoster>,
    ) -> Result<Self, InputError> {
        info!("Initializing gilrs controller interface");
        let gilrs = Gilrs::new().map_err(|e| {
            error!("Failed to initialize gilrs: {}", e);
            InputError::Backend(e.to_string())
        })?;

        Ok(Self::new(gilrs, aggregator, roster, HashMap::new()))
    }

    pub fn initialize(self) -> EventCollector<Collecting> {
        self.roster.refresh(&self.gilrs);
        let controllers = self.roster.controllers();
        if controllers.is_empty() {
            warn!("No gamepad connected, waiting for one");
        } else {
            info!("Found {} gamepads:", controllers.len());
            for (idx, device) in controllers.iter().enumerate() {
                info!("  [{}] ID: {:?}, Name: {}", idx, device.device_id, device.name);
            }
        }
        self.transition()
    }
}

impl EventCollector<Collecting> {
    /// Handles at most one pending gilrs event; returns whether one was found.
    pub fn collect_next_event(&mut self) -> bool {
        let Some(Event { id, event, .. }) = self.gilrs.next_event() else {
            return false;
        };

        match event {
            EventType::Connected => {
                self.roster.refresh(&self.gilrs);
                let name = self.gilrs.gamepad(id).name().to_string();
                if let Some(index) = self.roster.index_of(device_id(id)) {
                    self.aggregator.notify_gamepad_connected(index, name);
                }
            }
            EventType::Disconnected => {
                let index = self.roster.index_of(device_id(id));
                self.readings.remove(&id);
                self.roster.refresh(&self.gilrs);
                if let Some(index) = index {
                    self.aggregator.notify_gamepad_disconnected(index);
                }
            }
            other => {
                if !self.aggregator.accepts_motion_from(device_id(id)) {
                    debug!("Skipping event from non-selected gamepad: {:?}", id);
                    return true;
                }
                let readings = self.readings.entry(id).or_default();
                if apply_event(readings, other) {
                    self.aggregator.ingest_motion(&MotionEvent {
                        source: InputSource::GAMEPAD,
                        axes: *readings,
                    });
                }
            }
        }
        true
    }

    pub fn run_collection_loop(&mut self, cancel: &CancellationToken) {
        info!("Starting event collector loop");
        while !cancel.is_cancelled() {
            if !self.collect_next_event() {
                std::thread::sleep(POLL_INTERVAL);
            }
        }
        info!("Event collector stopped");
    }
}

/// Folds one gilrs event into `readings`; false if it carried no axis.
fn apply_event(readings: &mut AxisReadings, event: EventType) -> bool {
    match event {
        EventType::AxisChanged(axis, value, _) => apply_axis(readings, axis, value),
        EventType::ButtonChanged(button, value, _) => apply_trigger(readings, button, value),
        _ => false,
    }
}

/// gilrs reports stick-up as positive, so Y axes are negated back to the
/// device convention expected by the aggregator.
fn apply_axis(readings: &mut AxisReadings, axis: Axis, value: f32) -> bool {
    match axis {
        Axis::LeftStickX => readings.x = value,
        Axis::LeftStickY => readings.y = -value,
        Axis::RightStickX => readings.z = value,
        Axis::RightStickY => readings.rz = -value,
        Axis::LeftZ => readings.brake = value,
        Axis::RightZ => readings.gas = value,
        _ => {
            debug!("Ignoring unsupported axis: {:?}", axis);
            return false;
        }
    }
    true
}

fn apply_trigger(readings: &mut AxisReadings, button: Button, value: f32) -> bool {
    match button {
        Button::LeftTrigger2 => readings.ltrigger = value,
        Button::RightTrigger2 => readings.rtrigger = value,
        _ => return false,
    }
    true
}

/// Runs an [`EventCollector`] on the blocking pool until cancelled.
pub struct CollectorHandle {
    task: tokio::task::JoinHandle<()>,
}

impl CollectorHandle {
    pub fn spawn(
        aggregator: Arc<InputAggregator>,
        roster: Arc<ControllerRoster>,
        cancel: CancellationToken,
    ) -> Result<Self, InputError> {
        let collector = EventCollector::create(aggregator, roster)?;

        let task = tokio::task::spawn_blocking(move || {
            let mut collecting = collector.initialize();
            collecting.run_collection_loop(&cancel);
        });
        info!("Event collector started");

        Ok(Self { task })
    }

    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Collector task terminated abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_y_is_returned_to_device_convention() {
        let mut readings = AxisReadings::default();
        assert!(apply_axis(&mut readings, Axis::LeftStickY, 0.8));
        assert_eq!(readings.y, -0.8);
    }

    #[test]
    fn analog_triggers_fill_dedicated_axes() {
        let mut readings = AxisReadings::default();
        assert!(apply_trigger(&mut readings, Button::RightTrigger2, 0.4));
        assert_eq!(readings.rtrigger, 0.4);
        assert!(!apply_trigger(&mut readings, Button::South, 1.0));
    }
}
