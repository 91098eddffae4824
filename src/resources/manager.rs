//! Per-kind resource accessors over the generic cache.
//!
//! The [`ResourceManager`] owns one [`ResourceCache`] per resource kind plus
//! the file [`Locator`] and the audio bridge. Each accessor validates the
//! name, consults the cache, and on a miss locates the backing file and runs
//! the kind-specific loader. All accessors share the same error behavior:
//! `InvalidName` for a malformed name, `NotFound` when no backing file
//! exists, `Load` when the decoder rejects the file.

use std::ffi::CString;
use std::fs;
use std::path::Path;

use raylib::core::texture::Image;
use raylib::ffi;
use raylib::prelude::{Color, Font, RaylibHandle, RaylibThread, Texture2D};

use crate::error::MicroError;
use crate::resources::audio::{AudioBridge, AudioCmd};
use crate::resources::cache::{Locator, ResourceCache};
use crate::tilemap::TileMap;
use crate::tiles::TileGeometry;
use crate::validate;

/// File extensions per resource kind, in priority order.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "bmp", "gif", "jpg", "jpeg", "tga", "tif", "tiff"];
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "fon"];
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "ogg", "mp3", "flac", "aif", "aiff"];
pub const TILEMAP_EXTENSIONS: &[&str] = &["txt"];
const METADATA_EXTENSIONS: &[&str] = &["ini"];

/// Name of the generated 1x1 white texture used for rectangle fills.
pub const WHITE_IMAGE: &str = ".white";
/// Name that resolves to raylib's default font instead of a file.
pub const BUILTIN_FONT: &str = "builtin";

/// A loaded image together with its tile geometry.
pub struct ImageResource {
    pub texture: Texture2D,
    pub geometry: TileGeometry,
}

/// A loaded font. The built-in font has no owned handle; raylib keeps it
/// alive for the life of the window.
pub enum FontResource {
    Builtin,
    Custom(Font),
}

/// Cache entry for a sound or music track living on the audio thread.
pub struct AudioHandle {
    pub id: String,
}

pub struct ResourceManager {
    locator: Locator,
    images: ResourceCache<(), ImageResource>,
    fonts: ResourceCache<i32, FontResource>,
    sounds: ResourceCache<(), AudioHandle>,
    music: ResourceCache<(), AudioHandle>,
    tilemaps: ResourceCache<(), TileMap>,
    audio: Option<AudioBridge>,
}

impl ResourceManager {
    pub fn new(locator: Locator) -> Self {
        ResourceManager {
            locator,
            images: ResourceCache::new("image"),
            fonts: ResourceCache::new("font"),
            sounds: ResourceCache::new("sound"),
            music: ResourceCache::new("music"),
            tilemaps: ResourceCache::new("tile map"),
            audio: None,
        }
    }

    /// Connect the audio thread. Sound and music accessors fail with
    /// [`MicroError::Init`] until this has been called.
    pub fn attach_audio(&mut self, bridge: AudioBridge) {
        self.audio = Some(bridge);
    }

    /// Get an image by name, loading it on first use.
    pub fn image(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        name: &str,
    ) -> Result<&ImageResource, MicroError> {
        let key = validate::identifier(name)?;
        self.image_by_key(rl, thread, key)
    }

    /// Get an internal image, bypassing the identifier rules. `.white` is
    /// generated in code; other names resolve through the normal search.
    pub(crate) fn internal_image(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        name: &str,
    ) -> Result<&ImageResource, MicroError> {
        self.image_by_key(rl, thread, name.trim().to_ascii_lowercase())
    }

    fn image_by_key(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        key: String,
    ) -> Result<&ImageResource, MicroError> {
        let locator = &self.locator;
        let name = key.clone();
        self.images
            .get_or_try_insert_with(key, (), || load_image(locator, rl, thread, &name))
            .map(|r| &*r)
    }

    /// Get a font at a point size. Each size is a separate cache entry.
    pub fn font(&mut self, name: &str, size: i32) -> Result<&FontResource, MicroError> {
        let key = validate::identifier(name)?;
        let size = validate::positive("font size", size)?;
        let locator = &self.locator;
        let name = key.clone();
        self.fonts
            .get_or_try_insert_with(key, size, || load_font(locator, &name, size))
            .map(|r| &*r)
    }

    /// Get a sound effect, loading it onto the audio thread on first use.
    pub fn sound(&mut self, name: &str) -> Result<&AudioHandle, MicroError> {
        let key = validate::identifier(name)?;
        let locator = &self.locator;
        let audio = self.audio.as_ref().ok_or_else(audio_not_ready)?;
        let id = key.clone();
        self.sounds
            .get_or_try_insert_with(key, (), || {
                let path = locate(locator, &id, AUDIO_EXTENSIONS, "sound")?;
                audio.load_blocking(
                    AudioCmd::LoadSound {
                        id: id.clone(),
                        path: path.clone(),
                    },
                    &id,
                    &path,
                )?;
                Ok(AudioHandle { id })
            })
            .map(|r| &*r)
    }

    /// Get a music track, loading it onto the audio thread on first use.
    pub fn music(&mut self, name: &str) -> Result<&AudioHandle, MicroError> {
        let key = validate::identifier(name)?;
        let locator = &self.locator;
        let audio = self.audio.as_ref().ok_or_else(audio_not_ready)?;
        let id = key.clone();
        self.music
            .get_or_try_insert_with(key, (), || {
                let path = locate(locator, &id, AUDIO_EXTENSIONS, "music")?;
                audio.load_blocking(
                    AudioCmd::LoadMusic {
                        id: id.clone(),
                        path: path.clone(),
                    },
                    &id,
                    &path,
                )?;
                Ok(AudioHandle { id })
            })
            .map(|r| &*r)
    }

    /// Get a tile map by name, parsing its text file on first use.
    pub fn tilemap(&mut self, name: &str) -> Result<&TileMap, MicroError> {
        let key = validate::identifier(name)?;
        let locator = &self.locator;
        let name = key.clone();
        self.tilemaps
            .get_or_try_insert_with(key, (), || {
                let path = locate(locator, &name, TILEMAP_EXTENSIONS, "tile map")?;
                let text = fs::read_to_string(&path)
                    .map_err(|e| MicroError::load(&path, e.to_string()))?;
                TileMap::parse(&text, &file_name(&path))
            })
            .map(|r| &*r)
    }

    /// The audio bridge, for playback commands.
    pub(crate) fn audio(&self) -> Result<&AudioBridge, MicroError> {
        self.audio.as_ref().ok_or_else(audio_not_ready)
    }

    /// Release every cached resource of every kind at once.
    pub fn dispose(&mut self) {
        self.images.clear();
        self.fonts.clear();
        self.sounds.clear();
        self.music.clear();
        self.tilemaps.clear();
        if let Some(audio) = &self.audio {
            audio.send(AudioCmd::UnloadAll);
        }
    }
}

fn audio_not_ready() -> MicroError {
    MicroError::Init("the audio device has not been initialized".into())
}

/// Find the backing file for `name` or fail with `NotFound`.
fn locate(
    locator: &Locator,
    name: &str,
    extensions: &[&str],
    kind: &'static str,
) -> Result<String, MicroError> {
    locator
        .find(name, extensions)
        .map(|path| path.to_string_lossy().into_owned())
        .ok_or_else(|| MicroError::NotFound {
            kind,
            name: name.to_string(),
        })
}

fn file_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn load_image(
    locator: &Locator,
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    name: &str,
) -> Result<ImageResource, MicroError> {
    if name == WHITE_IMAGE {
        let image = Image::gen_image_color(1, 1, Color::WHITE);
        let texture = rl
            .load_texture_from_image(thread, &image)
            .map_err(|e| MicroError::load(WHITE_IMAGE, e.to_string()))?;
        return Ok(ImageResource {
            texture,
            geometry: TileGeometry::whole_image(WHITE_IMAGE, 1, 1),
        });
    }

    let path = locate(locator, name, IMAGE_EXTENSIONS, "image")?;
    let mut image = Image::load_image(&path).map_err(|e| MicroError::load(&path, e.to_string()))?;
    let (width, height) = (image.width as u32, image.height as u32);

    let geometry = match locator.find(name, METADATA_EXTENSIONS) {
        Some(meta) => {
            let file = file_name(&meta);
            let text = fs::read_to_string(&meta)
                .map_err(|e| MicroError::load(meta.to_string_lossy(), e.to_string()))?;
            TileGeometry::from_ini(name, width, height, &text, &file)?
        }
        None => TileGeometry::whole_image(name, width, height),
    };

    if let Some(colorkey) = geometry.colorkey {
        image.color_replace(colorkey, Color::BLANK);
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| MicroError::load(&path, e.to_string()))?;
    Ok(ImageResource { texture, geometry })
}

fn load_font(locator: &Locator, name: &str, size: i32) -> Result<FontResource, MicroError> {
    if name == BUILTIN_FONT {
        return Ok(FontResource::Builtin);
    }

    let path = locate(locator, name, FONT_EXTENSIONS, "font")?;
    let c_path =
        CString::new(path.as_str()).map_err(|_| MicroError::load(&path, "path contains NUL"))?;
    // raylib falls back to the default font when a file cannot be decoded;
    // wrapping that fallback in an owned Font would unload it, so treat it
    // as a load failure instead.
    let font = unsafe {
        let raw = ffi::LoadFontEx(c_path.as_ptr(), size, std::ptr::null_mut(), 0);
        if raw.texture.id == 0 || raw.texture.id == ffi::GetFontDefault().texture.id {
            return Err(MicroError::load(&path, "unsupported or corrupt font"));
        }
        Font::from_raw(raw)
    };
    Ok(FontResource::Custom(font))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_names_are_rejected_before_any_io() {
        let mut manager = ResourceManager::new(Locator::with_dirs(Vec::new()));
        assert!(matches!(
            manager.tilemap("9lives"),
            Err(MicroError::InvalidName(_))
        ));
        assert!(matches!(
            manager.tilemap("has space"),
            Err(MicroError::InvalidName(_))
        ));
    }

    #[test]
    fn missing_tilemap_is_not_found() {
        let mut manager = ResourceManager::new(Locator::with_dirs(Vec::new()));
        assert!(matches!(
            manager.tilemap("lostlevel"),
            Err(MicroError::NotFound {
                kind: "tile map",
                ..
            })
        ));
    }

    #[test]
    fn sound_without_audio_device_reports_init() {
        let mut manager = ResourceManager::new(Locator::with_dirs(Vec::new()));
        assert!(matches!(manager.sound("blip"), Err(MicroError::Init(_))));
    }
}
