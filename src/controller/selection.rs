use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, info, warn};

const NONE_SELECTED: i64 = -1;

/// Platform identifier of an attached input device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

/// One attached game controller as reported by a [`ControllerProbe`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerDevice {
    pub device_id: DeviceId,
    pub name: String,
}

impl ControllerDevice {
    pub fn new(device_id: u32, name: impl Into<String>) -> Self {
        Self {
            device_id: DeviceId(device_id),
            name: name.into(),
        }
    }
}

/// Live enumeration of attached controller-class devices.
///
/// Queried on every selection or listing call; the input core never keeps
/// the returned list.
pub trait ControllerProbe: Send + Sync {
    fn controllers(&self) -> Vec<ControllerDevice>;
}

/// Probe for platforms without controller support
#[derive(Clone, Copy, Debug, Default)]
pub struct NoControllers;

impl ControllerProbe for NoControllers {
    fn controllers(&self) -> Vec<ControllerDevice> {
        Vec::new()
    }
}

impl ControllerProbe for Vec<ControllerDevice> {
    fn controllers(&self) -> Vec<ControllerDevice> {
        self.clone()
    }
}

/// Result of a selection request. Failures are values, never errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerSelection {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ControllerSelection {
    fn selected(index: usize, controller_id: String) -> Self {
        Self {
            success: true,
            selected_index: Some(index),
            controller_id: Some(controller_id),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            selected_index: None,
            controller_id: None,
            error: Some(error),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerEntry {
    pub index: usize,
    pub id: String,
    pub is_selected: bool,
    pub has_extended_gamepad: bool,
    pub has_micro_gamepad: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerList {
    pub controllers: Vec<ControllerEntry>,
    pub selected_index: usize,
}

/// The user's chosen controller, or none.
///
/// Stored as a single atomic with a negative sentinel for "none selected".
#[derive(Debug)]
pub struct SelectedController {
    device_id: AtomicI64,
}

impl Default for SelectedController {
    fn default() -> Self {
        Self {
            device_id: AtomicI64::new(NONE_SELECTED),
        }
    }
}

impl SelectedController {
    pub fn get(&self) -> Option<DeviceId> {
        let raw = self.device_id.load(Ordering::Acquire);
        u32::try_from(raw).ok().map(DeviceId)
    }

    pub fn set(&self, device_id: DeviceId) {
        self.device_id.store(i64::from(device_id.0), Ordering::Release);
    }

    pub fn reset(&self) {
        self.device_id.store(NONE_SELECTED, Ordering::Release);
    }

    /// Recorded device, if it is still among `controllers`.
    pub fn attached(&self, controllers: &[ControllerDevice]) -> Option<DeviceId> {
        self.get().filter(|id| controllers.iter().any(|c| c.device_id == *id))
    }

    /// Whether motion from `device` should reach the gamepad state.
    ///
    /// Only an attached selection filters; once the selected pad is gone,
    /// every pad is accepted again until the next selection.
    pub fn accepts(&self, controllers: &[ControllerDevice], device: DeviceId) -> bool {
        self.attached(controllers).map_or(true, |selected| selected == device)
    }

    /// Validates `index` against `controllers` and records the choice.
    pub fn select(&self, controllers: &[ControllerDevice], index: i64) -> ControllerSelection {
        if controllers.is_empty() {
            warn!("Controller selection requested but none are connected");
            self.reset();
            return ControllerSelection::failed("No controllers connected".to_string());
        }

        let device = usize::try_from(index)
            .ok()
            .and_then(|i| controllers.get(i).map(|device| (i, device)));

        match device {
            Some((i, device)) => {
                self.set(device.device_id);
                info!(
                    "Selected controller [{}] {} ({:?})",
                    i, device.name, device.device_id
                );
                ControllerSelection::selected(i, device.name.clone())
            }
            None => {
                warn!(
                    "Controller index {} out of range for {} controllers",
                    index,
                    controllers.len()
                );
                ControllerSelection::failed(format!(
                    "Controller index {} out of range. Available: 0-{}",
                    index,
                    controllers.len() - 1
                ))
            }
        }
    }

    /// Marks exactly one entry selected when `controllers` is non-empty.
    ///
    /// The recorded device wins if it is still attached; otherwise the first
    /// controller in enumeration order is shown as selected.
    pub fn list(&self, controllers: &[ControllerDevice]) -> ControllerList {
        let selected_index = self
            .attached(controllers)
            .and_then(|id| controllers.iter().position(|c| c.device_id == id))
            .unwrap_or(0);
        debug!(
            "Listing {} controllers, selected index {}",
            controllers.len(),
            selected_index
        );

        let controllers = controllers
            .iter()
            .enumerate()
            .map(|(index, device)| ControllerEntry {
                index,
                id: device.name.clone(),
                is_selected: index == selected_index,
                has_extended_gamepad: true,
                has_micro_gamepad: false,
            })
            .collect();

        ControllerList {
            controllers,
            selected_index,
        }
    }
}
