//! Per-joystick hold counters and axis normalization.

use super::JoystickSample;

/// Axis values with a magnitude at or below this are treated as centered
/// for the directional counters.
pub const AXIS_DEADZONE: f32 = 0.333;

/// Which end of an axis a directional counter watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    Negative = 0,
    Positive = 1,
}

/// A connected device as discovered at startup.
#[derive(Debug, Clone)]
pub struct JoystickInfo {
    /// Display name as reported by the device.
    pub display_name: String,
    pub buttons: usize,
    pub axes: usize,
}

/// Hold counters and normalized axis values for one device.
#[derive(Debug, Clone)]
pub struct Joystick {
    display_name: String,
    buttons: Vec<u32>,
    axes: Vec<f32>,
    /// Two directional counters per axis: negative then positive.
    daxis: Vec<u32>,
}

impl Joystick {
    pub fn new(info: &JoystickInfo) -> Self {
        Joystick {
            display_name: info.display_name.clone(),
            buttons: vec![0; info.buttons],
            axes: vec![0.0; info.axes],
            daxis: vec![0; info.axes * 2],
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Frames the button has been held, 0 if idle or out of range.
    pub fn button(&self, index: usize) -> u32 {
        self.buttons.get(index).copied().unwrap_or(0)
    }

    /// Normalized axis value in `[-1, 1]`, 0.0 if out of range.
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Frames the axis has been pushed past the deadzone in `direction`.
    pub fn axis_hold(&self, index: usize, direction: AxisDirection) -> u32 {
        if index >= self.axes.len() {
            return 0;
        }
        self.daxis[index * 2 + direction as usize]
    }

    /// Advance counters from this frame's polled state.
    pub fn update(&mut self, sample: &JoystickSample) {
        for (index, counter) in self.buttons.iter_mut().enumerate() {
            let held = sample.buttons.get(index).copied().unwrap_or(false);
            *counter = if held { *counter + 1 } else { 0 };
        }

        for index in 0..self.axes.len() {
            let raw = sample.axes.get(index).copied().unwrap_or(0);
            let value = normalize_axis(raw, index);

            let negative = &mut self.daxis[index * 2];
            *negative = if value < -AXIS_DEADZONE { *negative + 1 } else { 0 };
            let positive = &mut self.daxis[index * 2 + 1];
            *positive = if value > AXIS_DEADZONE { *positive + 1 } else { 0 };

            self.axes[index] = value;
        }
    }
}

/// Normalize a raw 16-bit axis value into `[-1, 1]`.
///
/// Negative readings divide by 32768 and non-negative by 32767 so both
/// extremes land exactly on -1 and 1. Axis 1 is the vertical stick axis and
/// is inverted so that up is positive; the inversion would otherwise turn
/// a centered reading into negative zero.
pub fn normalize_axis(raw: i16, axis: usize) -> f32 {
    let mut value = if raw < 0 {
        raw as f32 / 32768.0
    } else {
        raw as f32 / 32767.0
    };
    if axis == 1 {
        value = -value;
        if value == 0.0 {
            value = 0.0;
        }
    }
    value
}

/// Canonical joystick identifier from a device display name: lowercased
/// with everything except ASCII letters and digits removed. A name with
/// nothing left falls back to `joystick`.
pub fn normalize_name(display_name: &str) -> String {
    let name: String = display_name
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if name.is_empty() { "joystick".into() } else { name }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(buttons: usize, axes: usize) -> Joystick {
        Joystick::new(&JoystickInfo {
            display_name: "Test Pad".into(),
            buttons,
            axes,
        })
    }

    #[test]
    fn axis_extremes_normalize_to_unit_range() {
        assert_eq!(normalize_axis(i16::MIN, 0), -1.0);
        assert_eq!(normalize_axis(i16::MAX, 0), 1.0);
        assert_eq!(normalize_axis(0, 0), 0.0);
    }

    #[test]
    fn vertical_axis_is_inverted_without_negative_zero() {
        assert_eq!(normalize_axis(i16::MAX, 1), -1.0);
        assert_eq!(normalize_axis(i16::MIN, 1), 1.0);
        let centered = normalize_axis(0, 1);
        assert_eq!(centered, 0.0);
        assert!(centered.is_sign_positive());
    }

    #[test]
    fn deadzone_resets_directional_counters() {
        let mut stick = pad(0, 1);
        let weak = JoystickSample {
            buttons: vec![],
            axes: vec![(0.2 * 32767.0) as i16],
        };
        stick.update(&weak);
        assert_eq!(stick.axis_hold(0, AxisDirection::Positive), 0);
        assert_eq!(stick.axis_hold(0, AxisDirection::Negative), 0);
    }

    #[test]
    fn sustained_push_counts_frames() {
        let mut stick = pad(0, 1);
        let push = JoystickSample {
            buttons: vec![],
            axes: vec![(0.5 * 32767.0) as i16],
        };
        for expected in 1..=3 {
            stick.update(&push);
            assert_eq!(stick.axis_hold(0, AxisDirection::Positive), expected);
            assert_eq!(stick.axis_hold(0, AxisDirection::Negative), 0);
        }
    }

    #[test]
    fn button_counters_track_hold_and_release() {
        let mut stick = pad(2, 0);
        let held = JoystickSample {
            buttons: vec![true, false],
            axes: vec![],
        };
        stick.update(&held);
        stick.update(&held);
        assert_eq!(stick.button(0), 2);
        assert_eq!(stick.button(1), 0);

        let released = JoystickSample {
            buttons: vec![false, false],
            axes: vec![],
        };
        stick.update(&released);
        assert_eq!(stick.button(0), 0);
    }

    #[test]
    fn out_of_range_queries_read_zero() {
        let stick = pad(1, 1);
        assert_eq!(stick.button(5), 0);
        assert_eq!(stick.axis(5), 0.0);
        assert_eq!(stick.axis_hold(5, AxisDirection::Positive), 0);
    }

    #[test]
    fn display_names_normalize_to_identifiers() {
        assert_eq!(normalize_name("Generic Gamepad"), "genericgamepad");
        assert_eq!(normalize_name("8BitDo SN30 Pro+"), "8bitdosn30pro");
        assert_eq!(normalize_name("***"), "joystick");
    }
}
