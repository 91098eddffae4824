//! micro2d: a small 2D multimedia layer for beginner-friendly games.
//!
//! The library wraps windowing, drawing, audio and input behind a single
//! [`Micro`] context with center-origin, y-up coordinates and a fixed
//! logical resolution scaled to the window. Resources (images, fonts,
//! sounds, music, tile maps) are loaded by name from a resource directory
//! and cached on first use.
//!
//! - [`context`] – the [`Micro`] context and its drawing/audio/input calls
//! - [`config`] – startup configuration, optionally from an INI file
//! - [`animation`] / [`tiles`] / [`tilemap`] – frame animation, tileset
//!   geometry and the text tile-map format
//! - [`resources`] – name-based resource location, caching and the audio
//!   thread
//! - [`input`] – frame-hold counters for keys, mouse and joysticks
//! - [`colors`] – CSS-style color names and `#rrggbb` parsing

pub mod animation;
pub mod colors;
pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod rendertarget;
pub mod resources;
pub mod tilemap;
pub mod tiles;
pub mod validate;

pub use animation::{Animation, LoopMode};
pub use colors::color_from_name;
pub use config::Config;
pub use context::{ImageOptions, Micro, RectangleOptions, TextOptions, TilemapOptions};
pub use error::MicroError;
pub use input::AxisDirection;
pub use tilemap::TileMap;
pub use tiles::TileGeometry;
