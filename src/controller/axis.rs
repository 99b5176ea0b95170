use serde::{Deserialize, Serialize};

/// Source-class bitmask attached to every motion event.
///
/// Values follow the platform input-device source constants; a mask
/// qualifies as a controller when it fully contains the gamepad or the
/// joystick class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct InputSource(pub u32);

impl InputSource {
    pub const GAMEPAD: InputSource = InputSource(0x0000_0401);
    pub const JOYSTICK: InputSource = InputSource(0x0100_0010);
    pub const TOUCHSCREEN: InputSource = InputSource(0x0000_1002);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: InputSource) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether events from this source carry gamepad axes.
    pub const fn is_controller(self) -> bool {
        self.contains(Self::GAMEPAD) || self.contains(Self::JOYSTICK)
    }
}

impl std::ops::BitOr for InputSource {
    type Output = InputSource;

    fn bitor(self, rhs: Self) -> Self::Output {
        InputSource(self.0 | rhs.0)
    }
}

/// Raw axis values read off one motion event, in native device range.
///
/// Stick Y axes follow the device convention: pushing up is negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisReadings {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rz: f32,
    pub ltrigger: f32,
    pub rtrigger: f32,
    pub brake: f32,
    pub gas: f32,
}

/// Raw motion event as delivered by the event source
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionEvent {
    pub source: InputSource,
    pub axes: AxisReadings,
}

/// Immutable capture of all analog gamepad axes at one instant.
///
/// A new motion event always produces a new snapshot; published snapshots
/// are never edited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSnapshot {
    pub left_stick_x: f32,
    pub left_stick_y: f32,
    pub right_stick_x: f32,
    pub right_stick_y: f32,
    pub left_trigger: f32,
    pub right_trigger: f32,
}

impl AxisSnapshot {
    /// Copies the readings out of a raw event.
    ///
    /// Controllers that only populate the brake/gas axes report exactly zero
    /// on the dedicated trigger axes, so zero falls back to the alternate axis.
    pub fn from_readings(axes: &AxisReadings) -> Self {
        let left_trigger = if axes.ltrigger == 0.0 {
            axes.brake
        } else {
            axes.ltrigger
        };
        let right_trigger = if axes.rtrigger == 0.0 {
            axes.gas
        } else {
            axes.rtrigger
        };

        Self {
            left_stick_x: axes.x,
            left_stick_y: axes.y,
            right_stick_x: axes.z,
            right_stick_y: axes.rz,
            left_trigger,
            right_trigger,
        }
    }
}

/// Reports `value` as exactly zero when its magnitude is within the deadzone.
///
/// Values outside the deadzone pass through unscaled.
pub fn filter_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() <= deadzone {
        0.0
    } else {
        value
    }
}
