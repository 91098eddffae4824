//! Tile geometry for sprite-sheet images.
//!
//! A [`TileGeometry`] describes how an image is cut into fixed-size tiles
//! (margin, spacing, tile size) and which named animations are defined on it.
//! It is computed once when an image is loaded, from an optional `.ini`
//! sidecar file, and never changes afterwards.
//!
//! Metadata file format:
//!
//! ```ini
//! [.meta]
//! tile_width   = 16
//! tile_height  = 12
//! tile_spacing = 2
//! tile_margin  = 10
//! colorkey     = rgb(255, 0, 255)
//!
//! [walk]
//! rate   = 10
//! loop   = loop
//! frames = 1, 2
//! ```
//!
//! The `.meta` section holds the tile geometry; every other section defines
//! an animation. Section names are case-insensitive identifiers. `rate`
//! defaults to 0 (frozen on the first frame) and `loop` to `loop`; only
//! `frames` is required.

use configparser::ini::Ini;
use raylib::prelude::{Color, Rectangle};
use rustc_hash::FxHashMap;

use crate::animation::{Animation, LoopMode};
use crate::colors::color_from_name;
use crate::error::MicroError;
use crate::validate;

/// Strip a trailing `#` or `;` comment from a metadata line.
///
/// A comment marker only counts at the start of the line or after
/// whitespace, so a glued `colorkey=#ff00ff` keeps its hex color while
/// `tile_width = 16  # pixels` loses the comment.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'#' || b == b';') && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

/// Tile layout and animations of one source image.
#[derive(Debug, Clone)]
pub struct TileGeometry {
    /// Name of the image this geometry belongs to, for error messages.
    pub source: String,
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_margin: u32,
    pub tile_spacing: u32,
    /// Transparent color to strip from the image at load time.
    pub colorkey: Option<Color>,
    /// Animations defined on this image, keyed by lowercase name.
    pub animations: FxHashMap<String, Animation>,
}

impl TileGeometry {
    /// Geometry for an image without a metadata file: one tile covering the
    /// whole image.
    pub fn whole_image(source: impl Into<String>, width: u32, height: u32) -> Self {
        TileGeometry {
            source: source.into(),
            width,
            height,
            tile_width: width,
            tile_height: height,
            tile_margin: 0,
            tile_spacing: 0,
            colorkey: None,
            animations: FxHashMap::default(),
        }
    }

    /// Parse a metadata sidecar file for an image of the given pixel size.
    ///
    /// `file` names the metadata file for diagnostics. Missing geometry keys
    /// fall back to the whole-image defaults.
    pub fn from_ini(
        source: impl Into<String>,
        width: u32,
        height: u32,
        text: &str,
        file: &str,
    ) -> Result<Self, MicroError> {
        let source = source.into();

        // configparser keeps inline comments as part of the value, so strip
        // them line by line before handing the text over.
        let cleaned: String = text
            .lines()
            .map(|line| format!("{}\n", strip_comment(line)))
            .collect();

        let mut ini = Ini::new();
        ini.read(cleaned)
            .map_err(|e| MicroError::format(file, e))?;

        let geometry_uint = |key: &str, default: u32| -> Result<u32, MicroError> {
            match ini.getuint(".meta", key) {
                Ok(Some(v)) => Ok(v as u32),
                Ok(None) => Ok(default),
                Err(_) => Err(MicroError::format(
                    file,
                    format!("`{key}` must be a non-negative integer"),
                )),
            }
        };

        let mut geometry = TileGeometry::whole_image(source, width, height);
        geometry.tile_width = geometry_uint("tile_width", width)?;
        geometry.tile_height = geometry_uint("tile_height", height)?;
        geometry.tile_margin = geometry_uint("tile_margin", 0)?;
        geometry.tile_spacing = geometry_uint("tile_spacing", 0)?;
        if let Some(value) = ini.get(".meta", "colorkey") {
            geometry.colorkey = Some(color_from_name(&value)?);
        }
        geometry.check_layout()?;

        for section in ini.sections() {
            if section == ".meta" {
                continue;
            }
            if !validate::is_identifier(&section) {
                return Err(MicroError::format(
                    file,
                    format!("`[{section}]` is not a valid animation name"),
                ));
            }
            let animation = parse_animation(&ini, &section, file)?;
            geometry.animations.insert(section, animation);
        }

        Ok(geometry)
    }

    /// Number of tile columns in the image.
    pub fn columns(&self) -> u32 {
        (self.width - 2 * self.tile_margin) / self.tile_width
    }

    /// Resolve a tile reference to a source rectangle.
    ///
    /// An integer reference is a 1-based tile frame number, with `0` meaning
    /// the entire image. Anything else is an animation name, matched
    /// case-insensitively, whose current frame is selected by `time`.
    ///
    /// Out-of-range frame numbers are not bounds-checked: the resulting
    /// rectangle may fall outside the image.
    pub fn resolve(&self, reference: &str, time: f32) -> Result<Rectangle, MicroError> {
        let key = reference.trim().to_ascii_lowercase();
        if let Ok(frame) = key.parse::<u32>() {
            return Ok(self.frame_rect(frame));
        }
        if !validate::is_identifier(&key) {
            return Err(MicroError::InvalidName(key));
        }
        let animation = self
            .animations
            .get(&key)
            .ok_or_else(|| MicroError::UnknownAnimation {
                image: self.source.clone(),
                animation: key,
            })?;
        Ok(self.frame_rect(animation.frame_at(time)))
    }

    /// Source rectangle of a 1-based tile frame (0 = whole image).
    pub fn frame_rect(&self, frame: u32) -> Rectangle {
        if frame == 0 {
            return Rectangle {
                x: 0.0,
                y: 0.0,
                width: self.width as f32,
                height: self.height as f32,
            };
        }
        let index = frame - 1;
        let columns = self.columns().max(1);
        let col = index % columns;
        let row = index / columns;
        // Float math: a frame number near u32::MAX must pass through as an
        // off-image rectangle, not overflow.
        Rectangle {
            x: self.tile_margin as f32
                + col as f32 * (self.tile_width + self.tile_spacing) as f32,
            y: self.tile_margin as f32
                + row as f32 * (self.tile_height + self.tile_spacing) as f32,
            width: self.tile_width as f32,
            height: self.tile_height as f32,
        }
    }

    /// Validate the declared layout against the image extent.
    fn check_layout(&self) -> Result<(), MicroError> {
        let fail = |msg: String| Err(MicroError::Validation(msg));
        if self.tile_width == 0 || self.tile_height == 0 {
            return fail(format!(
                "image `{}`: tile size must be at least 1x1",
                self.source
            ));
        }
        let inner_w = match self.width.checked_sub(2 * self.tile_margin) {
            Some(w) => w,
            None => {
                return fail(format!(
                    "image `{}`: tile_margin {} does not fit a {} pixel wide image",
                    self.source, self.tile_margin, self.width
                ));
            }
        };
        let inner_h = match self.height.checked_sub(2 * self.tile_margin) {
            Some(h) => h,
            None => {
                return fail(format!(
                    "image `{}`: tile_margin {} does not fit a {} pixel tall image",
                    self.source, self.tile_margin, self.height
                ));
            }
        };
        if self.tile_width > inner_w {
            return fail(format!(
                "image `{}`: tile_width {} exceeds the image width minus margins ({})",
                self.source, self.tile_width, inner_w
            ));
        }
        if self.tile_height > inner_h {
            return fail(format!(
                "image `{}`: tile_height {} exceeds the image height minus margins ({})",
                self.source, self.tile_height, inner_h
            ));
        }
        if self.tile_spacing > inner_w - self.tile_width {
            return fail(format!(
                "image `{}`: tile_spacing {} leaves no room for a tile",
                self.source, self.tile_spacing
            ));
        }
        Ok(())
    }
}

fn parse_animation(ini: &Ini, section: &str, file: &str) -> Result<Animation, MicroError> {
    // A missing rate means a static animation stuck on its first frame.
    let rate = match ini.getfloat(section, "rate") {
        Ok(Some(v)) => v as f32,
        Ok(None) => 0.0,
        Err(_) => {
            return Err(MicroError::format(
                file,
                format!("animation `[{section}]` has a non-numeric `rate`"),
            ));
        }
    };
    if rate < 0.0 {
        return Err(MicroError::Validation(format!(
            "animation `[{section}]` rate must not be negative"
        )));
    }

    let loop_mode = match ini.get(section, "loop").as_deref() {
        Some("none") => LoopMode::None,
        Some("loop") => LoopMode::Loop,
        Some(other) => {
            return Err(MicroError::format(
                file,
                format!("animation `[{section}]` loop must be `none` or `loop`, not `{other}`"),
            ));
        }
        // Animations loop unless the file opts out.
        None => LoopMode::Loop,
    };

    let frames_raw = ini.get(section, "frames").ok_or_else(|| {
        MicroError::format(file, format!("animation `[{section}]` is missing `frames`"))
    })?;
    let mut frames = Vec::new();
    for part in frames_raw.split(',') {
        let part = part.trim();
        let frame = part.parse::<u32>().map_err(|_| {
            MicroError::format(
                file,
                format!("animation `[{section}]` frame `{part}` is not a non-negative integer"),
            )
        })?;
        frames.push(frame);
    }
    if frames.is_empty() {
        return Err(MicroError::format(
            file,
            format!("animation `[{section}]` has an empty frame list"),
        ));
    }

    Ok(Animation::new(rate, loop_mode, frames))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> (f32, f32, f32, f32) {
        (x, y, w, h)
    }

    fn parts(r: Rectangle) -> (f32, f32, f32, f32) {
        (r.x, r.y, r.width, r.height)
    }

    fn sheet() -> TileGeometry {
        let mut g = TileGeometry::whole_image("tiles", 100, 100);
        g.tile_width = 20;
        g.tile_height = 20;
        g.tile_margin = 10;
        g.tile_spacing = 0;
        g.check_layout().unwrap();
        g
    }

    #[test]
    fn columns_come_from_margin_and_tile_width() {
        assert_eq!(sheet().columns(), 4);
    }

    #[test]
    fn frame_five_lands_on_second_row() {
        // 4 columns: frame 5 is column 0, row 1.
        let r = sheet().resolve("5", 0.0).unwrap();
        assert_eq!(parts(r), rect(10.0, 30.0, 20.0, 20.0));
    }

    #[test]
    fn frame_zero_is_the_whole_image() {
        let r = sheet().resolve("0", 0.0).unwrap();
        assert_eq!(parts(r), rect(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn frame_one_starts_at_the_margin() {
        let r = sheet().resolve("1", 0.0).unwrap();
        assert_eq!(parts(r), rect(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn spacing_offsets_each_tile() {
        let mut g = TileGeometry::whole_image("tiles", 100, 100);
        g.tile_width = 20;
        g.tile_height = 20;
        g.tile_margin = 0;
        g.tile_spacing = 5;
        g.check_layout().unwrap();
        let r = g.frame_rect(2);
        assert_eq!(parts(r), rect(25.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn out_of_range_frames_pass_through_unchecked() {
        // Frame 100 is far outside a 100x100 sheet; the rectangle is still
        // produced as-is.
        let r = sheet().resolve("100", 0.0).unwrap();
        assert!(r.y > 100.0);

        // The whole u32 range passes through without overflowing.
        let r = sheet().resolve("4000000000", 0.0).unwrap();
        assert!(r.y > 1e9);
    }

    #[test]
    fn animation_references_resolve_through_frame_selection() {
        let mut g = sheet();
        g.animations
            .insert("walk".into(), Animation::new(10.0, LoopMode::Loop, [0, 4]));
        // t=0.1 is raw step 1 -> frames[1]=4 -> tile frame 5 -> (10, 30).
        let r = g.resolve("WALK", 0.1).unwrap();
        assert_eq!(parts(r), rect(10.0, 30.0, 20.0, 20.0));
    }

    #[test]
    fn unknown_animation_is_reported() {
        let err = sheet().resolve("fly", 0.0).unwrap_err();
        assert!(matches!(err, MicroError::UnknownAnimation { .. }));
    }

    #[test]
    fn malformed_animation_name_is_reported() {
        let err = sheet().resolve("9lives!", 0.0).unwrap_err();
        assert!(matches!(err, MicroError::InvalidName(_)));
    }

    #[test]
    fn metadata_parses_geometry_and_animations() {
        let text = "\
[.meta]
tile_width   = 16  # pixels
tile_height  = 12
tile_spacing = 2
tile_margin  = 10
colorkey     = rgb(255, 0, 255)

; two animations
[walk]
rate   = 10
loop   = loop
frames = 1, 2

[idle]
rate   = 20
loop   = none
frames = 3, 4, 5, 6
";
        let g = TileGeometry::from_ini("hero", 100, 64, text, "hero.ini").unwrap();
        assert_eq!(g.tile_width, 16);
        assert_eq!(g.tile_height, 12);
        assert_eq!(g.tile_spacing, 2);
        assert_eq!(g.tile_margin, 10);
        assert_eq!(g.colorkey, Some(Color::new(255, 0, 255, 255)));
        assert_eq!(g.animations.len(), 2);
        let walk = &g.animations["walk"];
        assert_eq!(walk.loop_mode, LoopMode::Loop);
        assert_eq!(walk.frames.as_slice(), &[1, 2]);
        let idle = &g.animations["idle"];
        assert_eq!(idle.loop_mode, LoopMode::None);
        assert_eq!(idle.rate, 20.0);
    }

    #[test]
    fn metadata_comments_do_not_eat_hex_colorkeys() {
        assert_eq!(strip_comment("colorkey=#ff00ff"), "colorkey=#ff00ff");
        assert_eq!(strip_comment("tile_width = 16 # pixels"), "tile_width = 16 ");
        assert_eq!(strip_comment("; whole line"), "");
    }

    #[test]
    fn metadata_defaults_to_whole_image() {
        let g = TileGeometry::from_ini("logo", 64, 32, "", "logo.ini").unwrap();
        assert_eq!(g.tile_width, 64);
        assert_eq!(g.tile_height, 32);
        assert_eq!(g.columns(), 1);
        assert!(g.animations.is_empty());
    }

    #[test]
    fn oversized_tiles_are_rejected() {
        let text = "[.meta]\ntile_width = 90\ntile_margin = 10\n";
        let err = TileGeometry::from_ini("tiles", 100, 100, text, "tiles.ini").unwrap_err();
        assert!(matches!(err, MicroError::Validation(_)));
    }

    #[test]
    fn animation_rate_and_loop_default_when_omitted() {
        let text = "[spin]\nframes = 1, 2, 3\n";
        let g = TileGeometry::from_ini("coin", 64, 32, text, "coin.ini").unwrap();
        let spin = &g.animations["spin"];
        assert_eq!(spin.rate, 0.0);
        assert_eq!(spin.loop_mode, LoopMode::Loop);
        // Rate 0 never advances past the first listed frame.
        assert_eq!(spin.frame_at(123.0), 2);
    }

    #[test]
    fn bad_loop_mode_is_a_format_error() {
        let text = "[walk]\nrate = 10\nloop = bounce\nframes = 1\n";
        let err = TileGeometry::from_ini("hero", 32, 32, text, "hero.ini").unwrap_err();
        assert!(matches!(err, MicroError::Format { .. }));
    }

    #[test]
    fn missing_frames_is_a_format_error() {
        let text = "[walk]\nrate = 10\nloop = loop\n";
        let err = TileGeometry::from_ini("hero", 32, 32, text, "hero.ini").unwrap_err();
        assert!(matches!(err, MicroError::Format { .. }));
    }
}
