//! Resource loading and caching.
//!
//! [`manager::ResourceManager`] is the front door: it locates files by name
//! through [`cache::Locator`], loads them on first use and keeps them in
//! per-kind [`cache::ResourceCache`]s. Sounds and music live on a dedicated
//! audio thread behind [`audio::AudioBridge`].

pub mod audio;
pub mod cache;
pub mod manager;

pub use audio::{AudioBridge, AudioCmd};
pub use cache::{Locator, ResourceCache};
pub use manager::ResourceManager;
