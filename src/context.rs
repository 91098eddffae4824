//! The `Micro` context: window, drawing, audio and input in one handle.
//!
//! Everything in the library hangs off an explicit [`Micro`] value created
//! with [`Micro::init`]. Holding one is proof the window, backbuffer and
//! resource caches exist, so there is no hidden global state and no
//! "did you call init?" checks at every call site.
//!
//! Drawing uses a fixed logical resolution with the origin at the screen
//! center and y pointing up. Draw calls paint onto a persistent backbuffer;
//! [`Micro::update`] presents it scaled to the window, paces the frame and
//! refreshes the input counters. A minimal loop:
//!
//! ```no_run
//! use micro2d::{Config, Micro};
//!
//! let mut micro = Micro::init(Config::default())?;
//! while micro.running() {
//!     micro.clear(None)?;
//!     micro.draw_image("player")?;
//!     micro.update();
//! }
//! # Ok::<(), micro2d::MicroError>(())
//! ```

use raylib::prelude::*;

use crate::colors::color_from_name;
use crate::config::{Config, RESOLUTION_RANGE};
use crate::error::MicroError;
use crate::input::{AxisDirection, InputSample, InputTracker, JoystickInfo, JoystickSample,
                   MouseSample};
use crate::rendertarget::RenderTarget;
use crate::resources::audio::{AudioBridge, AudioCmd};
use crate::resources::cache::Locator;
use crate::resources::manager::{FontResource, ResourceManager, WHITE_IMAGE};
use crate::validate;

/// Highest gamepad slot probed at startup.
const MAX_GAMEPADS: i32 = 8;
/// Raylib tracks this many buttons per gamepad.
const GAMEPAD_BUTTONS: usize = 18;

/// Optional parameters for [`Micro::draw_image_ex`].
#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    /// Center of the image; the drawing cursor when unset.
    pub x: Option<i32>,
    pub y: Option<i32>,
    /// Target size. When only one of width/height is given the other is
    /// derived from the source aspect ratio. Negative values flip.
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Flip flags: `h` or `-` toggles horizontal, `v` or `|` vertical.
    pub flip: String,
    /// Rotation in degrees, clockwise, about the image center.
    pub angle: f32,
    /// Animation time in seconds; the current time when unset.
    pub time: Option<f32>,
    /// Recolor; the current draw color when unset.
    pub color: Option<String>,
}

/// Optional parameters for [`Micro::fill_rectangle_ex`].
#[derive(Debug, Clone, Default)]
pub struct RectangleOptions {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub angle: f32,
    /// Fill; the current fill color when unset.
    pub color: Option<String>,
}

/// Optional parameters for [`Micro::draw_text_ex`].
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub font_name: Option<String>,
    pub font_size: Option<i32>,
    pub color: Option<String>,
}

/// Optional parameters for [`Micro::draw_tilemap_ex`].
#[derive(Debug, Clone, Default)]
pub struct TilemapOptions {
    /// Center of the whole map; the drawing cursor when unset.
    pub x: Option<i32>,
    pub y: Option<i32>,
    /// On-screen tile size; the tileset's own tile size when unset, with
    /// aspect-ratio scaling when only one is given.
    pub tile_width: Option<i32>,
    pub tile_height: Option<i32>,
    pub time: Option<f32>,
    pub color: Option<String>,
}

/// Current colors, font and drawing cursor. Color fields keep both the
/// user's string and its parsed value.
struct Graphics {
    background: (String, Color),
    fill: (String, Color),
    draw: (String, Color),
    font_name: String,
    font_size: i32,
    x: i32,
    y: i32,
}

impl Default for Graphics {
    fn default() -> Self {
        Graphics {
            background: ("gray".into(), Color::new(128, 128, 128, 255)),
            fill: ("black".into(), Color::new(0, 0, 0, 255)),
            draw: ("white".into(), Color::new(255, 255, 255, 255)),
            font_name: "builtin".into(),
            font_size: 8,
            x: 0,
            y: 0,
        }
    }
}

pub struct Micro {
    rl: RaylibHandle,
    thread: RaylibThread,
    target: RenderTarget,
    resources: ResourceManager,
    input: InputTracker,
    graphics: Graphics,
    /// Raylib slots of the gamepads found at startup, tracker-order.
    gamepads: Vec<i32>,
    title: String,
    running: bool,
}

impl Micro {
    /// Open the window, create the backbuffer and start the audio thread.
    ///
    /// A missing audio device is logged and skipped rather than fatal;
    /// sound and music calls then fail with [`MicroError::Init`].
    pub fn init(config: Config) -> Result<Self, MicroError> {
        config.validate()?;

        let title = config.title.clone().unwrap_or_else(default_title);
        let width = config.screen_width as i32;
        let height = config.screen_height as i32;

        let (mut rl, thread) = raylib::init()
            .size(width, height)
            .resizable()
            .title(&title)
            .build();
        rl.set_exit_key(None);
        rl.set_target_fps(config.target_fps);
        if config.fullscreen {
            rl.toggle_fullscreen();
        }

        let target =
            RenderTarget::new(&mut rl, &thread, config.screen_width, config.screen_height)?;

        let resource_dir = config
            .resource_dir
            .clone()
            .or_else(|| std::env::current_exe().ok()?.parent().map(Into::into));
        let mut resources = ResourceManager::new(Locator::new(resource_dir.as_deref()));
        match AudioBridge::start() {
            Ok(bridge) => resources.attach_audio(bridge),
            Err(e) => log::warn!("audio disabled: {e}"),
        }

        let (devices, gamepads) = discover_gamepads(&rl);
        let input = InputTracker::new(&devices);

        let mut micro = Micro {
            rl,
            thread,
            target,
            resources,
            input,
            graphics: Graphics::default(),
            gamepads,
            title,
            running: true,
        };
        micro.clear(None)?;
        Ok(micro)
    }

    /// Present the backbuffer, pace the frame and refresh input state.
    ///
    /// Must be called regularly: nothing is visible until the first call,
    /// and input counters only advance here. Closing the window or pressing
    /// ESC clears `running`; F11 toggles fullscreen.
    pub fn update(&mut self) {
        let window_w = self.rl.get_screen_width();
        let window_h = self.rl.get_screen_height();
        {
            let mut d = self.rl.begin_drawing(&self.thread);
            d.clear_background(Color::BLACK);
            d.draw_texture_pro(
                self.target.texture.texture(),
                self.target.source_rect(),
                self.target.dest_rect(window_w, window_h),
                Vector2::default(),
                0.0,
                Color::WHITE,
            );
        }

        if self.rl.window_should_close() || self.rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            self.running = false;
        }
        if self.rl.is_key_pressed(KeyboardKey::KEY_F11) {
            self.rl.toggle_fullscreen();
        }

        let sample = self.sample_devices();
        self.input.update(&sample);
        for &(key, name) in KEY_TABLE {
            if self.rl.is_key_pressed(key) {
                self.input.key_down(name);
            }
            if self.rl.is_key_released(key) {
                self.input.key_up(name);
            }
        }
    }

    /// Whether the program should keep running. Cleared by the window close
    /// button or ESC; programs may also clear it themselves.
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Seconds since [`Micro::init`].
    pub fn now(&self) -> f32 {
        self.rl.get_time() as f32
    }

    /// Frames per second as measured between `update` calls.
    pub fn fps(&self) -> u32 {
        self.rl.get_fps()
    }

    // ---------------------------------------------------------------- drawing

    /// Clear the backbuffer and reset the drawing cursor to the center.
    /// Uses the background color unless another color is given.
    pub fn clear(&mut self, color: Option<&str>) -> Result<(), MicroError> {
        self.graphics.x = 0;
        self.graphics.y = 0;
        let rgba = match color {
            Some(name) => color_from_name(name)?,
            None => self.graphics.background.1,
        };
        let mut d = self.rl.begin_texture_mode(&self.thread, &mut self.target.texture);
        d.clear_background(rgba);
        Ok(())
    }

    /// Draw an image (or one of its frames/animations) at the cursor.
    ///
    /// `name` is `image` or `image/reference`, where the reference is a
    /// frame number or animation name, e.g. `"hero/walk"` or `"tiles/7"`.
    pub fn draw_image(&mut self, name: &str) -> Result<(), MicroError> {
        self.draw_image_ex(name, ImageOptions::default())
    }

    pub fn draw_image_ex(&mut self, name: &str, options: ImageOptions) -> Result<(), MicroError> {
        if options.width == Some(0) || options.height == Some(0) {
            return Ok(());
        }
        let time = options.time.unwrap_or_else(|| self.now());
        let tint = match &options.color {
            Some(color) => color_from_name(color)?,
            None => self.graphics.draw.1,
        };
        let (mut hflip, mut vflip) = parse_flip(&options.flip)?;

        let x = options.x.unwrap_or(self.graphics.x);
        let y = options.y.unwrap_or(self.graphics.y);
        let screen_w = self.target.width as i32;
        let screen_h = self.target.height as i32;
        let cx = x + screen_w / 2;
        let cy = screen_h / 2 - y;

        let (image_name, reference) = split_reference(name);
        let image = self.resources.image(&mut self.rl, &self.thread, image_name)?;
        let mut src = image.geometry.resolve(reference, time)?;

        let (mut width, mut height) = match (options.width, options.height) {
            (None, None) => (src.width as i32, src.height as i32),
            (Some(w), None) => (w, ((src.height / src.width) * w as f32) as i32),
            (None, Some(h)) => (((src.width / src.height) * h as f32) as i32, h),
            (Some(w), Some(h)) => (w, h),
        };
        if width < 0 {
            width = -width;
            hflip = !hflip;
        }
        if height < 0 {
            height = -height;
            vflip = !vflip;
        }
        if hflip {
            src.width = -src.width;
        }
        if vflip {
            src.height = -src.height;
        }

        let dest = Rectangle {
            x: cx as f32,
            y: cy as f32,
            width: width as f32,
            height: height as f32,
        };
        let origin = Vector2 {
            x: width as f32 / 2.0,
            y: height as f32 / 2.0,
        };

        let mut d = self.rl.begin_texture_mode(&self.thread, &mut self.target.texture);
        d.draw_texture_pro(&image.texture, src, dest, origin, options.angle, tint);
        Ok(())
    }

    /// Draw a filled rectangle centered at the cursor in the fill color.
    pub fn fill_rectangle(&mut self, width: i32, height: i32) -> Result<(), MicroError> {
        self.fill_rectangle_ex(width, height, RectangleOptions::default())
    }

    pub fn fill_rectangle_ex(
        &mut self,
        width: i32,
        height: i32,
        options: RectangleOptions,
    ) -> Result<(), MicroError> {
        let width = width.abs();
        let height = height.abs();
        if width == 0 || height == 0 {
            return Ok(());
        }
        let tint = match &options.color {
            Some(color) => color_from_name(color)?,
            None => self.graphics.fill.1,
        };
        let x = options.x.unwrap_or(self.graphics.x);
        let y = options.y.unwrap_or(self.graphics.y);
        let cx = x + self.target.width as i32 / 2;
        let cy = self.target.height as i32 / 2 - y;

        let image = self
            .resources
            .internal_image(&mut self.rl, &self.thread, WHITE_IMAGE)?;
        let dest = Rectangle {
            x: cx as f32,
            y: cy as f32,
            width: width as f32,
            height: height as f32,
        };
        let origin = Vector2 {
            x: width as f32 / 2.0,
            y: height as f32 / 2.0,
        };
        let src = image.geometry.frame_rect(0);

        let mut d = self.rl.begin_texture_mode(&self.thread, &mut self.target.texture);
        d.draw_texture_pro(&image.texture, src, dest, origin, options.angle, tint);
        Ok(())
    }

    /// Draw text at the cursor in the current font and draw color, leaving
    /// the cursor after the last character so consecutive calls continue
    /// the line. `\n` moves down one line and returns to the left edge.
    pub fn draw_text(&mut self, text: &str) -> Result<(), MicroError> {
        self.draw_text_ex(text, TextOptions::default())
    }

    pub fn draw_text_ex(&mut self, text: &str, options: TextOptions) -> Result<(), MicroError> {
        let size = match options.font_size {
            Some(size) => validate::positive("font_size", size)?,
            None => self.graphics.font_size,
        };
        let name = options
            .font_name
            .unwrap_or_else(|| self.graphics.font_name.clone());
        let tint = match &options.color {
            Some(color) => color_from_name(color)?,
            None => self.graphics.draw.1,
        };

        let mut x = options.x.unwrap_or(self.graphics.x);
        let mut y = options.y.unwrap_or(self.graphics.y);
        let screen_w = self.target.width as i32;
        let screen_h = self.target.height as i32;

        let size_f = size as f32;
        let spacing = size_f / 10.0;
        let line_height = size;

        let default_font = self.rl.get_font_default();
        let font = self.resources.font(&name, size)?;

        let mut d = self.rl.begin_texture_mode(&self.thread, &mut self.target.texture);
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                y -= line_height;
                x = -screen_w / 2;
            }
            if line.is_empty() {
                continue;
            }
            let position = Vector2 {
                x: (x + screen_w / 2) as f32,
                // The cursor sits on the baseline; draw from the top.
                y: ((screen_h / 2 - y) - size) as f32,
            };
            let advance = match font {
                FontResource::Builtin => {
                    d.draw_text_ex(&default_font, line, position, size_f, spacing, tint);
                    default_font.measure_text(line, size_f, spacing).x
                }
                FontResource::Custom(custom) => {
                    d.draw_text_ex(custom, line, position, size_f, spacing, tint);
                    custom.measure_text(line, size_f, spacing).x
                }
            };
            x += advance as i32;
        }
        drop(d);

        self.graphics.x = x;
        self.graphics.y = y;
        Ok(())
    }

    /// Draw a tile map centered at the cursor, resolving each cell through
    /// the tileset's geometry. Empty cells (`"0"`) are skipped. Cells
    /// outside the grid wrap, so oversized maps tile the whole screen.
    pub fn draw_tilemap(&mut self, name: &str) -> Result<(), MicroError> {
        self.draw_tilemap_ex(name, TilemapOptions::default())
    }

    pub fn draw_tilemap_ex(
        &mut self,
        name: &str,
        options: TilemapOptions,
    ) -> Result<(), MicroError> {
        let time = options.time.unwrap_or_else(|| self.now());
        let tint = match &options.color {
            Some(color) => color_from_name(color)?,
            None => self.graphics.draw.1,
        };
        let x = options.x.unwrap_or(self.graphics.x);
        let y = options.y.unwrap_or(self.graphics.y);
        let screen_w = self.target.width as i32;
        let screen_h = self.target.height as i32;

        // The map is drawn cell by cell from two caches at once, so take
        // the grid by value before borrowing the tileset image.
        let tilemap = self.resources.tilemap(name)?.clone();
        let image = self
            .resources
            .image(&mut self.rl, &self.thread, &tilemap.tileset)?;
        let geometry = &image.geometry;

        let (tile_w, tile_h) = match (
            options.tile_width.map(i32::abs),
            options.tile_height.map(i32::abs),
        ) {
            (None, None) => (geometry.tile_width as i32, geometry.tile_height as i32),
            (Some(w), None) => (
                w,
                ((geometry.tile_height as f32 / geometry.tile_width as f32) * w as f32) as i32,
            ),
            (None, Some(h)) => (
                ((geometry.tile_width as f32 / geometry.tile_height as f32) * h as f32) as i32,
                h,
            ),
            (Some(w), Some(h)) => (w, h),
        };
        if tile_w <= 0 || tile_h <= 0 {
            return Ok(());
        }

        let map_w = tilemap.width as i32;
        let map_h = tilemap.height as i32;
        let left = (screen_w / 2 + x) - (map_w * tile_w) / 2;
        let right = left + map_w * tile_w;
        let top = (screen_h / 2 - y) - (map_h * tile_h) / 2;
        let bottom = top + map_h * tile_h;

        // Cull rows and columns that cannot reach the screen; the grid
        // wraps, so indices may run past either edge.
        let cols_on_screen = screen_w / tile_w;
        let rows_on_screen = screen_h / tile_h;
        let start_x = if left < 0 {
            left.div_euclid(tile_w).abs() - 1
        } else {
            0
        };
        let end_x = if right.div_euclid(tile_w) > cols_on_screen {
            map_w - right.div_euclid(tile_w) + cols_on_screen + 1
        } else {
            map_w
        };
        let start_y = if top < 0 {
            top.div_euclid(tile_h).abs() - 1
        } else {
            0
        };
        let end_y = if bottom.div_euclid(tile_h) > rows_on_screen {
            map_h - bottom.div_euclid(tile_h) + rows_on_screen + 1
        } else {
            map_h
        };

        let mut d = self.rl.begin_texture_mode(&self.thread, &mut self.target.texture);
        for row in start_y..end_y {
            for col in start_x..end_x {
                let tile = tilemap.get(col, row);
                if tile == "0" {
                    continue;
                }
                let src = geometry.resolve(tile, time)?;
                let dest = Rectangle {
                    x: (left + col * tile_w) as f32,
                    y: (top + row * tile_h) as f32,
                    width: tile_w as f32,
                    height: tile_h as f32,
                };
                d.draw_texture_pro(&image.texture, src, dest, Vector2::default(), 0.0, tint);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------ audio

    /// Play a sound effect. Volume is clamped to `0.0..=1.0`.
    pub fn play_sound(&mut self, name: &str, volume: f32) -> Result<(), MicroError> {
        let volume = validate::volume(volume);
        let id = self.resources.sound(name)?.id.clone();
        self.resources
            .audio()?
            .send(AudioCmd::PlaySound { id, volume });
        Ok(())
    }

    /// Play a music track from the start, looping. Replaces any track
    /// already playing.
    pub fn play_music(&mut self, name: &str, volume: f32) -> Result<(), MicroError> {
        let volume = validate::volume(volume);
        let id = self.resources.music(name)?.id.clone();
        self.resources
            .audio()?
            .send(AudioCmd::PlayMusic { id, volume });
        Ok(())
    }

    /// Stop the playing music track, if any.
    pub fn stop_music(&mut self) {
        if let Ok(audio) = self.resources.audio() {
            audio.send(AudioCmd::StopMusic);
        }
    }

    // -------------------------------------------------------------- settings

    /// The color used by [`Micro::clear`].
    pub fn background_color(&self) -> &str {
        &self.graphics.background.0
    }

    pub fn set_background_color(&mut self, color: &str) -> Result<(), MicroError> {
        self.graphics.background = (color.to_string(), color_from_name(color)?);
        Ok(())
    }

    /// The color used by filled shapes.
    pub fn fill_color(&self) -> &str {
        &self.graphics.fill.0
    }

    pub fn set_fill_color(&mut self, color: &str) -> Result<(), MicroError> {
        self.graphics.fill = (color.to_string(), color_from_name(color)?);
        Ok(())
    }

    /// The color used by text and image/tile-map recoloring.
    pub fn draw_color(&self) -> &str {
        &self.graphics.draw.0
    }

    pub fn set_draw_color(&mut self, color: &str) -> Result<(), MicroError> {
        self.graphics.draw = (color.to_string(), color_from_name(color)?);
        Ok(())
    }

    /// Current font name and size.
    pub fn font(&self) -> (&str, i32) {
        (&self.graphics.font_name, self.graphics.font_size)
    }

    /// Set the default text font. Loads the font immediately so a missing
    /// or corrupt file is reported here, not at the first draw.
    pub fn set_font_name(&mut self, name: &str) -> Result<(), MicroError> {
        let size = self.graphics.font_size;
        self.resources.font(name, size)?;
        self.graphics.font_name = name.trim().to_ascii_lowercase();
        Ok(())
    }

    pub fn set_font_size(&mut self, size: i32) -> Result<(), MicroError> {
        self.graphics.font_size = validate::positive("font size", size)?;
        Ok(())
    }

    /// The drawing cursor, in logical coordinates.
    pub fn location(&self) -> (i32, i32) {
        (self.graphics.x, self.graphics.y)
    }

    pub fn set_location(&mut self, x: i32, y: i32) {
        self.graphics.x = x;
        self.graphics.y = y;
    }

    // ---------------------------------------------------------------- window

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.rl.set_window_title(&self.thread, title);
    }

    pub fn fullscreen(&self) -> bool {
        self.rl.is_window_fullscreen()
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if fullscreen != self.rl.is_window_fullscreen() {
            self.rl.toggle_fullscreen();
        }
    }

    /// Logical screen resolution.
    pub fn resolution(&self) -> (u32, u32) {
        (self.target.width, self.target.height)
    }

    /// Change the logical resolution, recreating the backbuffer (its
    /// contents are lost). The window grows if it is now smaller than the
    /// logical screen.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<(), MicroError> {
        let (min, max) = RESOLUTION_RANGE;
        let width = validate::in_range("width", width, min, max)?;
        let height = validate::in_range("height", height, min, max)?;
        self.target.recreate(&mut self.rl, &self.thread, width, height)?;
        if width as i32 > self.rl.get_screen_width() || height as i32 > self.rl.get_screen_height()
        {
            self.rl.set_window_size(width as i32, height as i32);
        }
        self.clear(None)
    }

    // ----------------------------------------------------------------- input

    /// Frames the named key has been held, 0 if it is not down.
    pub fn key(&self, name: &str) -> u32 {
        self.input.key(name)
    }

    /// Names of all keys currently held.
    pub fn keys(&self) -> Vec<String> {
        self.input.keys().map(String::from).collect()
    }

    /// Mouse position in logical coordinates (center origin, y up).
    pub fn mouse_position(&self) -> (i32, i32) {
        self.input.mouse_position()
    }

    /// Mouse movement since the previous frame.
    pub fn mouse_movement(&self) -> (i32, i32) {
        self.input.mouse_movement()
    }

    /// Frames a mouse button (`left`, `middle`, `right`) has been held.
    pub fn mouse_button(&self, name: &str) -> u32 {
        self.input.mouse_button(name)
    }

    /// Identifiers of the joysticks found at startup.
    pub fn joysticks(&self) -> Vec<String> {
        self.input.joystick_names().map(String::from).collect()
    }

    /// Normalized axis value in `[-1, 1]`. `joystick` of `None` queries the
    /// first device found.
    pub fn joy_axis(&self, index: usize, joystick: Option<&str>) -> Result<f32, MicroError> {
        self.input.joystick_axis(index, joystick)
    }

    /// Frames an axis has been held past the deadzone in one direction.
    pub fn joy_daxis(
        &self,
        index: usize,
        direction: AxisDirection,
        joystick: Option<&str>,
    ) -> Result<u32, MicroError> {
        self.input.joystick_axis_hold(index, direction, joystick)
    }

    pub fn joy_axis_count(&self, joystick: Option<&str>) -> Result<usize, MicroError> {
        self.input.joystick_axis_count(joystick)
    }

    /// Frames a joystick button has been held.
    pub fn joy_button(&self, index: usize, joystick: Option<&str>) -> Result<u32, MicroError> {
        self.input.joystick_button(index, joystick)
    }

    pub fn joy_button_count(&self, joystick: Option<&str>) -> Result<usize, MicroError> {
        self.input.joystick_button_count(joystick)
    }

    /// Release every cached resource. They reload on next use.
    pub fn dispose_resources(&mut self) {
        self.resources.dispose();
    }

    fn sample_devices(&self) -> InputSample {
        let joysticks = self
            .gamepads
            .iter()
            .map(|&pad| {
                let axes = (0..self.rl.get_gamepad_axis_count(pad))
                    .map(|axis| {
                        let value = unsafe { ffi::GetGamepadAxisMovement(pad, axis) };
                        (value * 32767.0) as i16
                    })
                    .collect();
                let buttons = (0..GAMEPAD_BUTTONS)
                    .map(|button| unsafe { ffi::IsGamepadButtonDown(pad, button as i32) })
                    .collect();
                JoystickSample { buttons, axes }
            })
            .collect();

        InputSample {
            window_width: self.rl.get_screen_width(),
            window_height: self.rl.get_screen_height(),
            screen_width: self.target.width as i32,
            screen_height: self.target.height as i32,
            mouse: MouseSample {
                x: self.rl.get_mouse_x(),
                y: self.rl.get_mouse_y(),
                left: self.rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT),
                middle: self.rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_MIDDLE),
                right: self.rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_RIGHT),
            },
            joysticks,
        }
    }
}

impl Drop for Micro {
    fn drop(&mut self) {
        self.resources.dispose();
    }
}

/// Split `image/reference` into its parts; a bare name references frame 0.
fn split_reference(name: &str) -> (&str, &str) {
    match name.split_once('/') {
        Some((image, reference)) => (image, reference),
        None => (name, "0"),
    }
}

/// Parse flip flags: `h` or `-` toggles horizontal, `v` or `|` vertical.
/// Repeating a flag toggles it off again.
fn parse_flip(flip: &str) -> Result<(bool, bool), MicroError> {
    let mut horizontal = false;
    let mut vertical = false;
    for c in flip.trim().to_ascii_lowercase().chars() {
        match c {
            'h' | '-' => horizontal = !horizontal,
            'v' | '|' => vertical = !vertical,
            _ => {
                return Err(MicroError::Validation(format!(
                    "invalid flip flag `{c}`: use `h` and/or `v`"
                )));
            }
        }
    }
    Ok((horizontal, vertical))
}

fn default_title() -> String {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(|exe| exe.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "micro2d".into())
}

fn discover_gamepads(rl: &RaylibHandle) -> (Vec<JoystickInfo>, Vec<i32>) {
    let mut devices = Vec::new();
    let mut slots = Vec::new();
    for pad in 0..MAX_GAMEPADS {
        if !rl.is_gamepad_available(pad) {
            continue;
        }
        let display_name = rl
            .get_gamepad_name(pad)
            .unwrap_or_else(|| "gamepad".to_string());
        devices.push(JoystickInfo {
            display_name,
            buttons: GAMEPAD_BUTTONS,
            axes: rl.get_gamepad_axis_count(pad) as usize,
        });
        slots.push(pad);
    }
    (devices, slots)
}

/// Canonical key names, patterned after the underlying key labels:
/// lowercased, spaces as underscores, punctuation spelled out.
#[rustfmt::skip]
const KEY_TABLE: &[(KeyboardKey, &str)] = &[
    (KeyboardKey::KEY_A, "a"), (KeyboardKey::KEY_B, "b"), (KeyboardKey::KEY_C, "c"),
    (KeyboardKey::KEY_D, "d"), (KeyboardKey::KEY_E, "e"), (KeyboardKey::KEY_F, "f"),
    (KeyboardKey::KEY_G, "g"), (KeyboardKey::KEY_H, "h"), (KeyboardKey::KEY_I, "i"),
    (KeyboardKey::KEY_J, "j"), (KeyboardKey::KEY_K, "k"), (KeyboardKey::KEY_L, "l"),
    (KeyboardKey::KEY_M, "m"), (KeyboardKey::KEY_N, "n"), (KeyboardKey::KEY_O, "o"),
    (KeyboardKey::KEY_P, "p"), (KeyboardKey::KEY_Q, "q"), (KeyboardKey::KEY_R, "r"),
    (KeyboardKey::KEY_S, "s"), (KeyboardKey::KEY_T, "t"), (KeyboardKey::KEY_U, "u"),
    (KeyboardKey::KEY_V, "v"), (KeyboardKey::KEY_W, "w"), (KeyboardKey::KEY_X, "x"),
    (KeyboardKey::KEY_Y, "y"), (KeyboardKey::KEY_Z, "z"),
    (KeyboardKey::KEY_ZERO, "0"), (KeyboardKey::KEY_ONE, "1"), (KeyboardKey::KEY_TWO, "2"),
    (KeyboardKey::KEY_THREE, "3"), (KeyboardKey::KEY_FOUR, "4"), (KeyboardKey::KEY_FIVE, "5"),
    (KeyboardKey::KEY_SIX, "6"), (KeyboardKey::KEY_SEVEN, "7"), (KeyboardKey::KEY_EIGHT, "8"),
    (KeyboardKey::KEY_NINE, "9"),
    (KeyboardKey::KEY_F1, "f1"), (KeyboardKey::KEY_F2, "f2"), (KeyboardKey::KEY_F3, "f3"),
    (KeyboardKey::KEY_F4, "f4"), (KeyboardKey::KEY_F5, "f5"), (KeyboardKey::KEY_F6, "f6"),
    (KeyboardKey::KEY_F7, "f7"), (KeyboardKey::KEY_F8, "f8"), (KeyboardKey::KEY_F9, "f9"),
    (KeyboardKey::KEY_F10, "f10"), (KeyboardKey::KEY_F11, "f11"), (KeyboardKey::KEY_F12, "f12"),
    (KeyboardKey::KEY_UP, "up"), (KeyboardKey::KEY_DOWN, "down"),
    (KeyboardKey::KEY_LEFT, "left"), (KeyboardKey::KEY_RIGHT, "right"),
    (KeyboardKey::KEY_SPACE, "space"), (KeyboardKey::KEY_ENTER, "return"),
    (KeyboardKey::KEY_ESCAPE, "escape"), (KeyboardKey::KEY_BACKSPACE, "backspace"),
    (KeyboardKey::KEY_TAB, "tab"), (KeyboardKey::KEY_DELETE, "delete"),
    (KeyboardKey::KEY_INSERT, "insert"), (KeyboardKey::KEY_HOME, "home"),
    (KeyboardKey::KEY_END, "end"), (KeyboardKey::KEY_PAGE_UP, "pageup"),
    (KeyboardKey::KEY_PAGE_DOWN, "pagedown"),
    (KeyboardKey::KEY_MINUS, "minus"), (KeyboardKey::KEY_EQUAL, "equals"),
    (KeyboardKey::KEY_LEFT_BRACKET, "open_bracket"),
    (KeyboardKey::KEY_RIGHT_BRACKET, "close_bracket"),
    (KeyboardKey::KEY_BACKSLASH, "backslash"), (KeyboardKey::KEY_SEMICOLON, "semicolon"),
    (KeyboardKey::KEY_APOSTROPHE, "quote"), (KeyboardKey::KEY_GRAVE, "backtick"),
    (KeyboardKey::KEY_COMMA, "comma"), (KeyboardKey::KEY_PERIOD, "period"),
    (KeyboardKey::KEY_SLASH, "slash"),
    (KeyboardKey::KEY_LEFT_SHIFT, "left_shift"), (KeyboardKey::KEY_RIGHT_SHIFT, "right_shift"),
    (KeyboardKey::KEY_LEFT_CONTROL, "left_ctrl"), (KeyboardKey::KEY_RIGHT_CONTROL, "right_ctrl"),
    (KeyboardKey::KEY_LEFT_ALT, "left_alt"), (KeyboardKey::KEY_RIGHT_ALT, "right_alt"),
    (KeyboardKey::KEY_CAPS_LOCK, "capslock"),
    (KeyboardKey::KEY_KP_0, "keypad_0"), (KeyboardKey::KEY_KP_1, "keypad_1"),
    (KeyboardKey::KEY_KP_2, "keypad_2"), (KeyboardKey::KEY_KP_3, "keypad_3"),
    (KeyboardKey::KEY_KP_4, "keypad_4"), (KeyboardKey::KEY_KP_5, "keypad_5"),
    (KeyboardKey::KEY_KP_6, "keypad_6"), (KeyboardKey::KEY_KP_7, "keypad_7"),
    (KeyboardKey::KEY_KP_8, "keypad_8"), (KeyboardKey::KEY_KP_9, "keypad_9"),
    (KeyboardKey::KEY_KP_ENTER, "keypad_enter"), (KeyboardKey::KEY_KP_ADD, "keypad_plus"),
    (KeyboardKey::KEY_KP_SUBTRACT, "keypad_minus"),
    (KeyboardKey::KEY_KP_MULTIPLY, "keypad_asterisk"),
    (KeyboardKey::KEY_KP_DIVIDE, "keypad_slash"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_split_on_the_first_slash() {
        assert_eq!(split_reference("hero/walk"), ("hero", "walk"));
        assert_eq!(split_reference("hero/7"), ("hero", "7"));
        assert_eq!(split_reference("hero"), ("hero", "0"));
    }

    #[test]
    fn flip_flags_toggle() {
        assert_eq!(parse_flip("").unwrap(), (false, false));
        assert_eq!(parse_flip("h").unwrap(), (true, false));
        assert_eq!(parse_flip("hv").unwrap(), (true, true));
        assert_eq!(parse_flip("-|").unwrap(), (true, true));
        assert_eq!(parse_flip("hh").unwrap(), (false, false));
        assert!(parse_flip("x").is_err());
    }

    #[test]
    fn key_table_names_are_unique() {
        let mut names: Vec<&str> = KEY_TABLE.iter().map(|&(_, name)| name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }
}
