//! Input state tracking.
//!
//! The [`InputTracker`] turns raw device state into hold-duration counters:
//! `0` means idle, `N > 0` means held for `N` consecutive frames. Counters
//! advance exactly once per [`InputTracker::update`] call, so they measure
//! frames held rather than events received.
//!
//! The tracker never talks to the windowing library directly. Once per frame
//! the host polls the devices into an [`InputSample`] and feeds it in; key
//! presses and releases arrive through [`InputTracker::key_down`] and
//! [`InputTracker::key_up`] because the underlying API reports them as
//! events, not state.

mod joystick;
mod tracker;

pub use joystick::{AxisDirection, Joystick, JoystickInfo, normalize_axis, normalize_name};
pub use tracker::InputTracker;

/// Polled mouse state in physical window coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseSample {
    pub x: i32,
    pub y: i32,
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

/// Polled state of one joystick, index-aligned with the tracker's devices.
#[derive(Debug, Clone, Default)]
pub struct JoystickSample {
    pub buttons: Vec<bool>,
    /// Raw axis values as reported by the device.
    pub axes: Vec<i16>,
}

/// Everything the tracker polls in one frame.
#[derive(Debug, Clone, Default)]
pub struct InputSample {
    /// Physical window size in pixels.
    pub window_width: i32,
    pub window_height: i32,
    /// Logical resolution the mouse position is mapped into.
    pub screen_width: i32,
    pub screen_height: i32,
    pub mouse: MouseSample,
    pub joysticks: Vec<JoystickSample>,
}
