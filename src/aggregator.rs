//! Composition root tying touch, gamepad, bindings and haptics together
//!
//! Producers call [`InputAggregator::ingest_touch`] and
//! [`InputAggregator::ingest_motion`]; readers call
//! [`InputAggregator::query_snapshot`] and the controller/haptics surface.
//! All operations are synchronous and bounded. Each component is read on its
//! own, so a snapshot's touches and axes may come from instants a few
//! microseconds apart, but neither is ever a mix of two updates.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::config::InputSettings;
use crate::controller::{
    filter_deadzone, AxisSnapshot, ControllerList, ControllerProbe, ControllerSelection, DeviceId,
    GamepadStateHolder, MotionEvent, NoControllers, SelectedController,
};
use crate::device::{ControlHints, DeviceProfile, HeadlessPlatform, PlatformProbe};
use crate::haptics::{HapticActuator, HapticOutcome, Haptics, HapticsRequest, NoHaptics};
use crate::mapping::{Action, ActionBindingTable, BindingLimits};
use crate::touch::{Position, TouchEvent, TouchPhase, TouchPoint, TouchRegistry};

const NOTICE_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// Discrete button states. Nothing drives these yet; they always read false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    pub jump: bool,
    pub action: bool,
    pub cancel: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Triggers {
    pub left: f32,
    pub right: f32,
}

/// One reading of the full input state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSnapshot {
    /// Capture time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Deadzone-filtered, up is positive
    pub left_stick: Vector2,
    /// Deadzone-filtered, up is positive
    pub right_stick: Vector2,
    pub buttons: Buttons,
    pub triggers: Triggers,
    pub touches: Vec<TouchPoint>,
}

impl InputSnapshot {
    /// Equality ignoring the capture timestamp.
    pub fn same_state(&self, other: &InputSnapshot) -> bool {
        let mut ours = self.touches.clone();
        let mut theirs = other.touches.clone();
        ours.sort_by_key(|t| t.id);
        theirs.sort_by_key(|t| t.id);

        self.left_stick == other.left_stick
            && self.right_stick == other.right_stick
            && self.buttons == other.buttons
            && self.triggers == other.triggers
            && ours == theirs
    }
}

/// Device-level events pushed to subscribers
#[derive(Clone, Debug, PartialEq)]
pub enum InputNotice {
    GamepadConnected { index: usize, id: String },
    GamepadDisconnected { index: usize },
    DeviceChanged(DeviceProfile),
}

/// External collaborators the aggregator queries on demand
#[derive(Clone)]
pub struct Capabilities {
    pub controllers: Arc<dyn ControllerProbe>,
    pub haptics: Arc<dyn HapticActuator>,
    pub platform: Arc<dyn PlatformProbe>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            controllers: Arc::new(NoControllers),
            haptics: Arc::new(NoHaptics),
            platform: Arc::new(HeadlessPlatform::default()),
        }
    }
}

/// Owns every piece of input state for one session.
pub struct InputAggregator {
    deadzone: f32,
    touches: TouchRegistry,
    gamepad: GamepadStateHolder,
    bindings: ActionBindingTable,
    selected: SelectedController,
    haptics: Haptics,
    controllers: Arc<dyn ControllerProbe>,
    platform: Arc<dyn PlatformProbe>,
    notice_sender: broadcast::Sender<InputNotice>,
}

impl std::fmt::Debug for InputAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputAggregator")
            .field("deadzone", &self.deadzone)
            .field("touches", &self.touches)
            .field("gamepad", &self.gamepad)
            .field("bindings", &self.bindings)
            .field("selected", &self.selected)
            .field("haptics", &self.haptics)
            .finish_non_exhaustive()
    }
}

impl Default for InputAggregator {
    fn default() -> Self {
        Self::new(None, Capabilities::default())
    }
}

impl InputAggregator {
    pub fn new(settings: Option<InputSettings>, capabilities: Capabilities) -> Self {
        let settings = settings.unwrap_or_default();
        info!("Initializing input aggregator with settings: {:?}", settings);

        let bindings = ActionBindingTable::new(BindingLimits::from(&settings));
        bindings.set_mapping(
            settings
                .bindings
                .iter()
                .map(|(action, inputs)| (action.as_str(), inputs.as_slice())),
        );

        let (notice_sender, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            deadzone: settings.gamepad_deadzone,
            touches: TouchRegistry::new(),
            gamepad: GamepadStateHolder::new(),
            bindings,
            selected: SelectedController::default(),
            haptics: Haptics::new(capabilities.haptics, &settings),
            controllers: capabilities.controllers,
            platform: capabilities.platform,
            notice_sender,
        }
    }

    /// Assembles the current input state. Never mutates anything.
    pub fn query_snapshot(&self) -> InputSnapshot {
        let timestamp = Utc::now().timestamp_millis();
        let axes = self.gamepad.read();

        let (left_stick, right_stick, triggers) = match axes.as_deref() {
            Some(axes) => (
                self.stick(axes.left_stick_x, axes.left_stick_y),
                self.stick(axes.right_stick_x, axes.right_stick_y),
                Triggers {
                    left: axes.left_trigger,
                    right: axes.right_trigger,
                },
            ),
            None => Default::default(),
        };

        InputSnapshot {
            timestamp,
            left_stick,
            right_stick,
            buttons: Buttons::default(),
            triggers,
            touches: self.touches.snapshot(),
        }
    }

    fn stick(&self, x: f32, y: f32) -> Vector2 {
        let y = filter_deadzone(y, self.deadzone);
        Vector2 {
            x: filter_deadzone(x, self.deadzone),
            // device reports up as negative
            y: if y == 0.0 { 0.0 } else { -y },
        }
    }

    /// Folds one touch event into the registry.
    pub fn ingest_touch(&self, event: &TouchEvent) {
        match event {
            TouchEvent::Begin { id, position } => {
                debug!("Touch {} began at ({:.1}, {:.1})", id, position.x, position.y);
                self.touches.upsert(*id, *position, TouchPhase::Began);
            }
            TouchEvent::Move { pointers } => {
                let updated = self.touches.apply_moves(pointers);
                debug!("Touch move updated {}/{} pointers", updated, pointers.len());
            }
            TouchEvent::End { id } => {
                debug!("Touch {} ended", id);
                self.touches.remove(*id);
            }
            TouchEvent::Cancel => {
                debug!("Touch gesture cancelled, clearing all contacts");
                self.touches.clear();
            }
        }
    }

    /// Publishes a new axis snapshot for controller-class motion events.
    pub fn ingest_motion(&self, event: &MotionEvent) {
        if !event.source.is_controller() {
            debug!("Ignoring motion event from source {:#x}", event.source.bits());
            return;
        }
        self.gamepad.publish(AxisSnapshot::from_readings(&event.axes));
    }

    pub fn set_bindings<S: AsRef<str>>(&self, action: &str, inputs: &[S]) {
        self.bindings.set_bindings(action, inputs);
    }

    /// Applies a partial action → inputs mapping; unknown keys are skipped.
    pub fn set_input_mapping<'a, I, S>(&self, mapping: I)
    where
        I: IntoIterator<Item = (&'a str, &'a [S])>,
        S: AsRef<str> + 'a,
    {
        self.bindings.set_mapping(mapping);
    }

    pub fn get_bindings(&self, action: Action) -> Vec<String> {
        self.bindings.get_bindings(action)
    }

    pub fn select_controller(&self, index: i64) -> ControllerSelection {
        let controllers = self.controllers.controllers();
        self.selected.select(&controllers, index)
    }

    /// Device recorded by the last successful selection, if any.
    pub fn selected_device(&self) -> Option<DeviceId> {
        self.selected.get()
    }

    /// Whether motion from `device` should be ingested under the current selection.
    pub fn accepts_motion_from(&self, device: DeviceId) -> bool {
        let controllers = self.controllers.controllers();
        self.selected.accepts(&controllers, device)
    }

    pub fn list_controllers(&self) -> ControllerList {
        let controllers = self.controllers.controllers();
        self.selected.list(&controllers)
    }

    pub fn trigger_haptics(&self, request: &HapticsRequest) -> HapticOutcome {
        self.haptics.trigger(request)
    }

    /// Older name for [`Self::trigger_haptics`].
    pub fn haptics(&self, request: &HapticsRequest) -> HapticOutcome {
        self.trigger_haptics(request)
    }

    pub fn vibrate(&self, duration_ms: Option<i64>) -> HapticOutcome {
        self.haptics.vibrate(duration_ms)
    }

    pub fn device_profile(&self) -> DeviceProfile {
        DeviceProfile::build(self.platform.as_ref(), self.controllers.controllers().len())
    }

    pub fn control_hints(&self) -> ControlHints {
        ControlHints::for_mode(self.device_profile().input_mode)
    }

    /// Receiver woken whenever a new axis snapshot is published.
    pub fn subscribe_gamepad(&self) -> watch::Receiver<Option<Arc<AxisSnapshot>>> {
        self.gamepad.subscribe()
    }

    /// Normalized snapshots, one per gamepad publication.
    pub fn subscribe_snapshots(&self) -> SnapshotReceiver<'_> {
        SnapshotReceiver {
            aggregator: self,
            gamepad: self.gamepad.subscribe(),
        }
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<InputNotice> {
        self.notice_sender.subscribe()
    }

    pub fn notify_gamepad_connected(&self, index: usize, id: impl Into<String>) {
        let id = id.into();
        info!("Gamepad connected: [{}] {}", index, id);
        self.notify(InputNotice::GamepadConnected { index, id });
    }

    pub fn notify_gamepad_disconnected(&self, index: usize) {
        info!("Gamepad disconnected: [{}]", index);
        self.notify(InputNotice::GamepadDisconnected { index });
    }

    pub fn notify_device_change(&self) {
        self.notify(InputNotice::DeviceChanged(self.device_profile()));
    }

    fn notify(&self, notice: InputNotice) {
        if self.notice_sender.send(notice).is_err() {
            debug!("No notice subscribers");
        }
    }

    /// Releases gamepad and touch state at the end of a session.
    pub fn teardown(&self) {
        info!("Tearing down input aggregator");
        self.gamepad.clear();
        self.touches.clear();
    }

    /// Current touch contact position, if `id` is live.
    pub fn contact(&self, id: i32) -> Option<Position> {
        self.touches.get(id).map(|contact| contact.position)
    }
}

/// Waits for gamepad publications and hands out full [`InputSnapshot`]s,
/// with deadzone and stick orientation already applied.
#[derive(Debug)]
pub struct SnapshotReceiver<'a> {
    aggregator: &'a InputAggregator,
    gamepad: watch::Receiver<Option<Arc<AxisSnapshot>>>,
}

impl SnapshotReceiver<'_> {
    /// Next snapshot after a publication or clear, or `None` once the
    /// gamepad state has been dropped.
    pub async fn changed(&mut self) -> Option<InputSnapshot> {
        self.gamepad.changed().await.ok()?;
        Some(self.aggregator.query_snapshot())
    }
}
