//! Gamepad state and controller selection
//!
//! 1. [`axis`] - Raw motion readings and the immutable [`AxisSnapshot`]
//! 2. [`gamepad_state`] - Construct-then-swap holder for the latest snapshot
//! 3. [`selection`] - Controller enumeration and the user's selected device
//! 4. `event_collector` - gilrs-backed producer (feature `gilrs`)
//!
//! ```text
//! MotionEvent ──► AxisSnapshot::from_readings ──► GamepadStateHolder::publish
//!                 (trigger fallback)              (wholesale swap)
//! ```

pub mod axis;
#[cfg(feature = "gilrs")]
pub mod event_collector;
pub mod gamepad_state;
pub mod selection;

pub use axis::{filter_deadzone, AxisReadings, AxisSnapshot, InputSource, MotionEvent};
pub use gamepad_state::GamepadStateHolder;
pub use selection::{
    ControllerDevice, ControllerEntry, ControllerList, ControllerProbe, ControllerSelection,
    DeviceId, NoControllers, SelectedController,
};
