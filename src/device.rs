//! Fixed description of the machine a headless driver pretends to run on.

use serde::{Deserialize, Serialize};

/// How the device is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Portrait.
    Vertical,
    /// Portrait, upside down.
    VerticalUpsideDown,
    /// Landscape, rotated left.
    Left,
    /// Landscape, rotated right.
    Right,
}

/// Capabilities reported by a headless driver. They never change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessDevice;

impl HeadlessDevice {
    /// Always [`Orientation::Vertical`].
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        Orientation::Vertical
    }

    /// No hardware keyboard is attached.
    #[must_use]
    pub const fn has_keyboard(&self) -> bool {
        false
    }

    /// Scale the system asks for, always `1`.
    #[must_use]
    pub const fn system_scale(&self) -> f32 {
        1.0
    }

    /// Scale for a particular window, always the system scale.
    #[must_use]
    pub const fn system_scale_for_window(&self, _window: &crate::window::Window) -> f32 {
        self.system_scale()
    }

    /// Not running inside a browser.
    #[must_use]
    pub const fn is_browser(&self) -> bool {
        false
    }

    /// Not a mobile device.
    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_desktop_capabilities() {
        let device = HeadlessDevice;
        assert_eq!(device.orientation(), Orientation::Vertical);
        assert!(!device.has_keyboard());
        assert!((device.system_scale() - 1.0).abs() < f32::EPSILON);
        assert!(!device.is_browser());
        assert!(!device.is_mobile());
    }
}
