//! Fixed-resolution backbuffer scaled to the window.
//!
//! All drawing lands on a render texture at the logical screen resolution.
//! Once per frame the texture is scaled to fit the window, preserving the
//! aspect ratio with letterbox or pillarbox bars as needed. The backbuffer
//! persists between frames, so anything drawn stays until cleared.

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::{Rectangle, RaylibHandle, RaylibThread, RenderTexture2D};

use crate::error::MicroError;

pub struct RenderTarget {
    pub texture: RenderTexture2D,
    /// Logical resolution in pixels.
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    /// Create the backbuffer at the logical resolution.
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        width: u32,
        height: u32,
    ) -> Result<Self, MicroError> {
        let texture = rl
            .load_render_texture(thread, width, height)
            .map_err(|e| MicroError::Init(format!("could not create render texture: {e}")))?;
        let target = RenderTarget {
            texture,
            width,
            height,
        };
        target.apply_filter();
        Ok(target)
    }

    /// Recreate the backbuffer at a new logical resolution. The previous
    /// contents are lost.
    pub fn recreate(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        width: u32,
        height: u32,
    ) -> Result<(), MicroError> {
        self.texture = rl
            .load_render_texture(thread, width, height)
            .map_err(|e| MicroError::Init(format!("could not recreate render texture: {e}")))?;
        self.width = width;
        self.height = height;
        self.apply_filter();
        Ok(())
    }

    // Nearest-neighbor keeps scaled pixels sharp.
    fn apply_filter(&self) {
        unsafe {
            ffi::SetTextureFilter(
                self.texture.texture,
                TextureFilter::TEXTURE_FILTER_POINT as i32,
            );
        }
    }

    /// Source rectangle for presenting the texture. The height is negative
    /// to undo OpenGL's inverted texture coordinates.
    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: self.width as f32,
            height: -(self.height as f32),
        }
    }

    /// Destination rectangle centered in a window of the given size.
    pub fn dest_rect(&self, window_width: i32, window_height: i32) -> Rectangle {
        letterbox_rect(window_width, window_height, self.width, self.height)
    }
}

/// Scale a logical resolution to fit a window, centered, preserving aspect
/// ratio.
fn letterbox_rect(window_w: i32, window_h: i32, game_w: u32, game_h: u32) -> Rectangle {
    let game_w = game_w as f32;
    let game_h = game_h as f32;
    let window_w = window_w as f32;
    let window_h = window_h as f32;

    let game_aspect = game_w / game_h;
    let window_aspect = window_w / window_h;

    if window_aspect > game_aspect {
        // Window is wider: pillarbox bars on the sides.
        let scale = window_h / game_h;
        let scaled_w = game_w * scale;
        Rectangle {
            x: (window_w - scaled_w) / 2.0,
            y: 0.0,
            width: scaled_w,
            height: window_h,
        }
    } else {
        // Window is taller: letterbox bars top and bottom.
        let scale = window_w / game_w;
        let scaled_h = game_h * scale;
        Rectangle {
            x: 0.0,
            y: (window_h - scaled_h) / 2.0,
            width: window_w,
            height: scaled_h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_covers_the_window() {
        let rect = letterbox_rect(640, 360, 320, 180);
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
        assert_eq!((rect.width, rect.height), (640.0, 360.0));
    }

    #[test]
    fn wide_window_gets_pillarbox_bars() {
        let rect = letterbox_rect(800, 360, 320, 180);
        assert_eq!((rect.x, rect.y), (80.0, 0.0));
        assert_eq!((rect.width, rect.height), (640.0, 360.0));
    }

    #[test]
    fn tall_window_gets_letterbox_bars() {
        let rect = letterbox_rect(640, 480, 320, 180);
        assert_eq!((rect.x, rect.y), (0.0, 60.0));
        assert_eq!((rect.width, rect.height), (640.0, 360.0));
    }
}
