//! Startup configuration.
//!
//! [`Config`] collects everything [`Micro::init`](crate::Micro::init) needs:
//! logical resolution, window title, fullscreen flag, target frame rate and
//! the resource directory. Values can come from code or from an optional
//! INI file:
//!
//! ```ini
//! [screen]
//! width      = 320
//! height     = 180
//! fullscreen = false
//!
//! [window]
//! title      = My Game
//! target_fps = 60
//!
//! [resources]
//! dir = ./assets
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;

use crate::error::MicroError;
use crate::validate;

const DEFAULT_SCREEN_WIDTH: u32 = 320;
const DEFAULT_SCREEN_HEIGHT: u32 = 180;
const DEFAULT_TARGET_FPS: u32 = 60;

/// Logical resolutions outside this range are rejected at startup.
pub const RESOLUTION_RANGE: (u32, u32) = (1, 2048);

#[derive(Debug, Clone)]
pub struct Config {
    /// Logical screen width in pixels.
    pub screen_width: u32,
    /// Logical screen height in pixels.
    pub screen_height: u32,
    pub fullscreen: bool,
    /// Window title; the executable name when unset.
    pub title: Option<String>,
    pub target_fps: u32,
    /// Directory searched for resources before the built-in fallback; the
    /// executable's directory when unset.
    pub resource_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            fullscreen: false,
            title: None,
            target_fps: DEFAULT_TARGET_FPS,
            resource_dir: None,
        }
    }
}

impl Config {
    /// Overlay values from an INI file onto the current configuration.
    /// Missing keys keep their current values.
    pub fn load_from_file(&mut self, path: impl Into<PathBuf>) -> Result<(), MicroError> {
        let path = path.into();
        let mut ini = Ini::new();
        ini.load(&path)
            .map_err(|e| MicroError::format(path.to_string_lossy(), e))?;

        if let Some(width) = ini.getuint("screen", "width").ok().flatten() {
            self.screen_width = width as u32;
        }
        if let Some(height) = ini.getuint("screen", "height").ok().flatten() {
            self.screen_height = height as u32;
        }
        if let Some(fullscreen) = ini.getbool("screen", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }
        if let Some(title) = ini.get("window", "title") {
            self.title = Some(title);
        }
        if let Some(fps) = ini.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(dir) = ini.get("resources", "dir") {
            self.resource_dir = Some(PathBuf::from(dir));
        }

        log::info!(
            "loaded config from {}: {}x{}, fullscreen={}, fps={}",
            path.display(),
            self.screen_width,
            self.screen_height,
            self.fullscreen,
            self.target_fps
        );
        Ok(())
    }

    /// Check that the configured values fall within their valid ranges.
    pub fn validate(&self) -> Result<(), MicroError> {
        let (min, max) = RESOLUTION_RANGE;
        validate::in_range("screen width", self.screen_width, min, max)?;
        validate::in_range("screen height", self.screen_height, min, max)?;
        validate::positive("target_fps", self.target_fps as i32)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.screen_width, 320);
        assert_eq!(config.screen_height, 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_resolution_is_rejected() {
        let config = Config {
            screen_width: 4096,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MicroError::Validation(_))
        ));
    }

    #[test]
    fn file_values_overlay_defaults() {
        let path = std::env::temp_dir().join(format!("micro2d-config-{}.ini", std::process::id()));
        std::fs::File::create(&path)
            .and_then(|mut f| {
                f.write_all(b"[screen]\nwidth = 640\nfullscreen = true\n[window]\ntitle = Demo\n")
            })
            .unwrap();

        let mut config = Config::default();
        config.load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.screen_width, 640);
        assert_eq!(config.screen_height, 180);
        assert!(config.fullscreen);
        assert_eq!(config.title.as_deref(), Some("Demo"));
    }

    #[test]
    fn missing_file_is_a_format_error() {
        let mut config = Config::default();
        assert!(config.load_from_file("/nonexistent/config.ini").is_err());
    }
}
