//! Device profile and control hints, recomputed on every request.

use serde::{Deserialize, Serialize};

/// Broad class of the host device as reported by the platform
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Foldable,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Windows,
    Macos,
    Linux,
    Web,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Dominant way the user is expected to provide input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Touch,
    Keyboard,
    Gamepad,
    Hybrid,
}

impl InputMode {
    pub fn detect(has_gamepad: bool, has_touch: bool) -> Self {
        match (has_gamepad, has_touch) {
            (true, true) => InputMode::Hybrid,
            (true, false) => InputMode::Gamepad,
            (false, true) => InputMode::Touch,
            (false, false) => InputMode::Keyboard,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Screen size in density-independent units plus the density itself
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

/// Live platform queries consumed by [`DeviceProfile::build`].
pub trait PlatformProbe: Send + Sync {
    fn platform(&self) -> Platform;
    fn device_type(&self) -> DeviceType;
    fn orientation(&self) -> Orientation;
    fn has_touch(&self) -> bool;
    fn has_pointer(&self) -> bool;
    fn screen(&self) -> ScreenMetrics;
    fn safe_area_insets(&self) -> SafeAreaInsets;
}

/// Probe for desktop hosts without a touch screen
#[derive(Clone, Copy, Debug)]
pub struct HeadlessPlatform {
    pub platform: Platform,
    pub screen: ScreenMetrics,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self {
            platform: Platform::Linux,
            screen: ScreenMetrics {
                width: 1920.0,
                height: 1080.0,
                pixel_ratio: 1.0,
            },
        }
    }
}

impl PlatformProbe for HeadlessPlatform {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Desktop
    }

    fn orientation(&self) -> Orientation {
        if self.screen.height > self.screen.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    fn has_touch(&self) -> bool {
        false
    }

    fn has_pointer(&self) -> bool {
        true
    }

    fn screen(&self) -> ScreenMetrics {
        self.screen
    }

    fn safe_area_insets(&self) -> SafeAreaInsets {
        SafeAreaInsets::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    pub device_type: DeviceType,
    pub platform: Platform,
    pub input_mode: InputMode,
    pub orientation: Orientation,
    pub has_touch: bool,
    pub has_pointer: bool,
    pub has_gamepad: bool,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_foldable: bool,
    pub is_desktop: bool,
    pub screen_width: f32,
    pub screen_height: f32,
    pub pixel_ratio: f32,
    pub safe_area_insets: SafeAreaInsets,
}

impl DeviceProfile {
    pub fn build(platform: &dyn PlatformProbe, controller_count: usize) -> Self {
        let device_type = platform.device_type();
        let has_touch = platform.has_touch();
        let has_gamepad = controller_count > 0;
        let screen = platform.screen();

        Self {
            device_type,
            platform: platform.platform(),
            input_mode: InputMode::detect(has_gamepad, has_touch),
            orientation: platform.orientation(),
            has_touch,
            has_pointer: platform.has_pointer(),
            has_gamepad,
            is_mobile: device_type == DeviceType::Mobile,
            is_tablet: device_type == DeviceType::Tablet,
            is_foldable: device_type == DeviceType::Foldable,
            is_desktop: device_type == DeviceType::Desktop,
            screen_width: screen.width,
            screen_height: screen.height,
            pixel_ratio: screen.pixel_ratio,
            safe_area_insets: platform.safe_area_insets(),
        }
    }
}

/// Short user-facing prompts for the current input mode
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlHints {
    pub movement: String,
    pub action: String,
    pub camera: String,
}

impl ControlHints {
    pub fn for_mode(mode: InputMode) -> Self {
        let (movement, action, camera) = match mode {
            InputMode::Gamepad => ("Left stick to move", "A / X to interact", "Right stick to look"),
            InputMode::Hybrid => (
                "Touch or stick to move",
                "Tap or A to interact",
                "Swipe or right stick",
            ),
            // keyboard shares the touch prompts
            InputMode::Touch | InputMode::Keyboard => {
                ("Drag to move", "Tap to interact", "Pinch to zoom")
            }
        };

        Self {
            movement: movement.to_string(),
            action: action.to_string(),
            camera: camera.to_string(),
        }
    }
}
