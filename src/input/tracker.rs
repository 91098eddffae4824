//! The per-frame input state machine.

use rustc_hash::FxHashMap;

use super::joystick::{AxisDirection, Joystick, JoystickInfo, normalize_name};
use super::InputSample;
use crate::error::MicroError;

/// Hold-duration counters for keys, mouse and joysticks, plus the mouse
/// position mapped into logical screen coordinates.
pub struct InputTracker {
    /// Keys currently held, by canonical name. Absent means idle.
    keys: FxHashMap<String, u32>,
    /// Joysticks by canonical identifier, discovered once at startup.
    joysticks: FxHashMap<String, Joystick>,
    /// Identifier of the first joystick discovered, used when a query does
    /// not name one.
    default_joystick: Option<String>,
    /// Startup order of the joysticks, aligning samples with devices.
    order: Vec<String>,
    mouse: (i32, i32),
    mouse_prev: Option<(i32, i32)>,
    mouse_rel: (i32, i32),
    mouse_left: u32,
    mouse_middle: u32,
    mouse_right: u32,
}

impl InputTracker {
    /// Build a tracker over the joysticks connected at startup.
    ///
    /// Devices with the same display name get numeric suffixes: two
    /// "Generic Gamepad" devices become `genericgamepad` and
    /// `genericgamepad2`.
    pub fn new(devices: &[JoystickInfo]) -> Self {
        let mut joysticks = FxHashMap::default();
        let mut order = Vec::with_capacity(devices.len());
        let mut default_joystick = None;

        for info in devices {
            let base = normalize_name(&info.display_name);
            let mut candidate = base.clone();
            let mut index = 2;
            while joysticks.contains_key(&candidate) {
                candidate = format!("{base}{index}");
                index += 1;
            }
            log::debug!("joystick `{candidate}` ({})", info.display_name);
            joysticks.insert(candidate.clone(), Joystick::new(info));
            if default_joystick.is_none() {
                default_joystick = Some(candidate.clone());
            }
            order.push(candidate);
        }

        InputTracker {
            keys: FxHashMap::default(),
            joysticks,
            default_joystick,
            order,
            mouse: (0, 0),
            mouse_prev: None,
            mouse_rel: (0, 0),
            mouse_left: 0,
            mouse_middle: 0,
            mouse_right: 0,
        }
    }

    /// Record a key press. A repeat notification while the key is already
    /// held leaves the counter alone.
    pub fn key_down(&mut self, name: &str) {
        self.keys.entry(name.trim().to_ascii_lowercase()).or_insert(1);
    }

    /// Record a key release, resetting the key to idle.
    pub fn key_up(&mut self, name: &str) {
        self.keys.remove(&name.trim().to_ascii_lowercase());
    }

    /// Advance all counters one frame and recompute the mouse mapping.
    ///
    /// Call exactly once per frame, before feeding this frame's key events:
    /// every held key gains one frame, then fresh presses land at 1.
    pub fn update(&mut self, sample: &InputSample) {
        for counter in self.keys.values_mut() {
            *counter += 1;
        }

        for (index, name) in self.order.iter().enumerate() {
            if let (Some(joystick), Some(polled)) =
                (self.joysticks.get_mut(name), sample.joysticks.get(index))
            {
                joystick.update(polled);
            }
        }

        self.mouse_left = hold(self.mouse_left, sample.mouse.left);
        self.mouse_middle = hold(self.mouse_middle, sample.mouse.middle);
        self.mouse_right = hold(self.mouse_right, sample.mouse.right);

        self.mouse = map_mouse(sample);
        let prev = self.mouse_prev.unwrap_or(self.mouse);
        self.mouse_rel = (self.mouse.0 - prev.0, self.mouse.1 - prev.1);
        self.mouse_prev = Some(self.mouse);
    }

    /// Frames the key has been held, 0 if idle.
    pub fn key(&self, name: &str) -> u32 {
        self.keys
            .get(&name.trim().to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Names of all keys currently held.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Mouse position in logical screen coordinates (center origin, y up).
    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    /// Mouse movement since the previous frame.
    pub fn mouse_movement(&self) -> (i32, i32) {
        self.mouse_rel
    }

    /// Frames a mouse button has been held: `left`, `middle` or `right`.
    /// Any other name reads as idle.
    pub fn mouse_button(&self, name: &str) -> u32 {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => self.mouse_left,
            "middle" => self.mouse_middle,
            "right" => self.mouse_right,
            _ => 0,
        }
    }

    /// Identifiers of the connected joysticks, in discovery order.
    pub fn joystick_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Frames a joystick button has been held. `None` queries the default
    /// joystick; with no joystick connected every query reads 0.
    pub fn joystick_button(&self, index: usize, name: Option<&str>) -> Result<u32, MicroError> {
        Ok(self.joystick(name)?.map_or(0, |j| j.button(index)))
    }

    pub fn joystick_button_count(&self, name: Option<&str>) -> Result<usize, MicroError> {
        Ok(self.joystick(name)?.map_or(0, Joystick::button_count))
    }

    /// Normalized axis value in `[-1, 1]`.
    pub fn joystick_axis(&self, index: usize, name: Option<&str>) -> Result<f32, MicroError> {
        Ok(self.joystick(name)?.map_or(0.0, |j| j.axis(index)))
    }

    pub fn joystick_axis_count(&self, name: Option<&str>) -> Result<usize, MicroError> {
        Ok(self.joystick(name)?.map_or(0, Joystick::axis_count))
    }

    /// Frames an axis has been pushed past the deadzone in `direction`.
    pub fn joystick_axis_hold(
        &self,
        index: usize,
        direction: AxisDirection,
        name: Option<&str>,
    ) -> Result<u32, MicroError> {
        Ok(self
            .joystick(name)?
            .map_or(0, |j| j.axis_hold(index, direction)))
    }

    /// Resolve a joystick query: a named lookup must match a connected
    /// device, an unnamed one falls back to the default joystick if any.
    fn joystick(&self, name: Option<&str>) -> Result<Option<&Joystick>, MicroError> {
        match name {
            Some(name) => {
                let key = name.trim().to_ascii_lowercase();
                self.joysticks
                    .get(&key)
                    .map(Some)
                    .ok_or(MicroError::NotFound {
                        kind: "joystick",
                        name: key,
                    })
            }
            None => Ok(self
                .default_joystick
                .as_ref()
                .and_then(|id| self.joysticks.get(id))),
        }
    }
}

fn hold(counter: u32, active: bool) -> u32 {
    if active { counter + 1 } else { 0 }
}

/// Map a physical mouse position into logical screen coordinates.
///
/// The logical screen is scaled uniformly to fit the window and centered,
/// so the mapping undoes the letterbox offset and the scale, then moves the
/// origin to the screen center with y pointing up.
fn map_mouse(sample: &InputSample) -> (i32, i32) {
    if sample.screen_width <= 0 || sample.screen_height <= 0 {
        return (0, 0);
    }
    let scale = (sample.window_width as f32 / sample.screen_width as f32)
        .min(sample.window_height as f32 / sample.screen_height as f32);
    if scale <= 0.0 {
        return (0, 0);
    }
    let scaled_w = (sample.screen_width as f32 * scale) as i32;
    let scaled_h = (sample.screen_height as f32 * scale) as i32;
    let corner_x = (sample.window_width - scaled_w) / 2;
    let corner_y = (sample.window_height - scaled_h) / 2;

    let x = ((sample.mouse.x - corner_x) as f32 / scale) as i32 - sample.screen_width / 2;
    let y = sample.screen_height / 2 - ((sample.mouse.y - corner_y) as f32 / scale) as i32;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::JoystickSample;

    fn sample() -> InputSample {
        InputSample {
            window_width: 640,
            window_height: 360,
            screen_width: 320,
            screen_height: 180,
            ..Default::default()
        }
    }

    fn pads(names: &[&str]) -> Vec<JoystickInfo> {
        names
            .iter()
            .map(|name| JoystickInfo {
                display_name: (*name).into(),
                buttons: 2,
                axes: 2,
            })
            .collect()
    }

    #[test]
    fn held_key_counts_frames_and_release_resets() {
        let mut tracker = InputTracker::new(&[]);
        let sample = sample();

        for expected in 1..=5 {
            tracker.update(&sample);
            tracker.key_down("Z");
            assert_eq!(tracker.key("z"), expected);
        }

        tracker.key_up("z");
        tracker.update(&sample);
        assert_eq!(tracker.key("z"), 0);
    }

    #[test]
    fn key_repeat_does_not_reset_the_counter() {
        let mut tracker = InputTracker::new(&[]);
        let sample = sample();

        tracker.update(&sample);
        tracker.key_down("space");
        tracker.update(&sample);
        tracker.key_down("space"); // OS key repeat
        assert_eq!(tracker.key("space"), 2);
    }

    #[test]
    fn keys_lists_held_keys() {
        let mut tracker = InputTracker::new(&[]);
        tracker.key_down("a");
        tracker.key_down("b");
        let mut held: Vec<&str> = tracker.keys().collect();
        held.sort_unstable();
        assert_eq!(held, ["a", "b"]);
    }

    #[test]
    fn mouse_buttons_count_held_frames() {
        let mut tracker = InputTracker::new(&[]);
        let mut sample = sample();
        sample.mouse.left = true;

        tracker.update(&sample);
        tracker.update(&sample);
        assert_eq!(tracker.mouse_button("left"), 2);
        assert_eq!(tracker.mouse_button("right"), 0);

        sample.mouse.left = false;
        tracker.update(&sample);
        assert_eq!(tracker.mouse_button("left"), 0);
    }

    #[test]
    fn mouse_maps_to_center_origin_y_up() {
        let mut tracker = InputTracker::new(&[]);
        let mut sample = sample();

        sample.mouse.x = 320;
        sample.mouse.y = 180;
        tracker.update(&sample);
        assert_eq!(tracker.mouse_position(), (0, 0));

        sample.mouse.x = 0;
        sample.mouse.y = 0;
        tracker.update(&sample);
        assert_eq!(tracker.mouse_position(), (-160, 90));
        assert_eq!(tracker.mouse_movement(), (-160, 90));
    }

    #[test]
    fn mouse_mapping_removes_letterbox_offset() {
        let mut tracker = InputTracker::new(&[]);
        let mut sample = sample();
        sample.window_width = 800; // 80px pillars at scale 2

        sample.mouse.x = 80;
        sample.mouse.y = 0;
        tracker.update(&sample);
        assert_eq!(tracker.mouse_position(), (-160, 90));
    }

    #[test]
    fn first_frame_has_no_mouse_movement() {
        let mut tracker = InputTracker::new(&[]);
        let mut sample = sample();
        sample.mouse.x = 100;
        sample.mouse.y = 100;
        tracker.update(&sample);
        assert_eq!(tracker.mouse_movement(), (0, 0));
    }

    #[test]
    fn duplicate_joystick_names_get_suffixes() {
        let tracker = InputTracker::new(&pads(&["Generic Gamepad", "Generic Gamepad"]));
        let names: Vec<&str> = tracker.joystick_names().collect();
        assert_eq!(names, ["genericgamepad", "genericgamepad2"]);
    }

    #[test]
    fn unnamed_queries_use_the_default_joystick() {
        let mut tracker = InputTracker::new(&pads(&["Pad One", "Pad Two"]));
        let mut sample = sample();
        sample.joysticks = vec![
            JoystickSample {
                buttons: vec![true, false],
                axes: vec![0, 0],
            },
            JoystickSample::default(),
        ];
        tracker.update(&sample);
        assert_eq!(tracker.joystick_button(0, None).unwrap(), 1);
        assert_eq!(tracker.joystick_button(0, Some("padtwo")).unwrap(), 0);
    }

    #[test]
    fn unknown_joystick_name_is_not_found() {
        let tracker = InputTracker::new(&pads(&["Pad One"]));
        assert!(matches!(
            tracker.joystick_button(0, Some("padnine")),
            Err(MicroError::NotFound {
                kind: "joystick",
                ..
            })
        ));
    }

    #[test]
    fn queries_without_any_joystick_read_zero() {
        let tracker = InputTracker::new(&[]);
        assert_eq!(tracker.joystick_button(0, None).unwrap(), 0);
        assert_eq!(tracker.joystick_axis(0, None).unwrap(), 0.0);
        assert_eq!(tracker.joystick_axis_count(None).unwrap(), 0);
    }
}
