//! Generic name-keyed resource cache and file locator.
//!
//! Every resource kind (image, font, sound, music, tile-map) is cached the
//! same way: the key is the lowercased resource name plus a kind-specific
//! discriminator (fonts use their point size, everything else `()`), and a
//! hit returns the already-loaded value without touching the disk. Failed
//! loads are not cached, so a later request tries again.

use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::MicroError;

/// Lazily-populated cache for one resource kind.
pub struct ResourceCache<D, V> {
    kind: &'static str,
    entries: FxHashMap<(String, D), V>,
}

impl<D: Eq + Hash, V> ResourceCache<D, V> {
    pub fn new(kind: &'static str) -> Self {
        ResourceCache {
            kind,
            entries: FxHashMap::default(),
        }
    }

    /// The resource kind this cache holds, for error messages.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Look up `(name, discriminator)`, loading and inserting on a miss.
    ///
    /// `name` must already be canonical (lowercased). The loader runs only
    /// on a miss; if it fails nothing is inserted and the error is returned
    /// unchanged.
    pub fn get_or_try_insert_with(
        &mut self,
        name: String,
        discriminator: D,
        load: impl FnOnce() -> Result<V, MicroError>,
    ) -> Result<&mut V, MicroError> {
        use std::collections::hash_map::Entry;
        match self.entries.entry((name, discriminator)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let value = load()?;
                log::debug!("loaded {} `{}`", self.kind, entry.key().0);
                Ok(entry.insert(value))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached value at once. There is no individual eviction.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("releasing {} cached {}(s)", self.entries.len(), self.kind);
        }
        self.entries.clear();
    }
}

/// Resolves resource names to backing files on disk.
///
/// Directories are scanned in priority order: the application-supplied
/// resource directory first, then the built-in fallback next to the
/// executable. Within a directory the kind's extension list is tried in
/// order, and both the file stem and the extension match case-insensitively.
pub struct Locator {
    dirs: Vec<PathBuf>,
}

impl Locator {
    /// Build the search path from an optional application resource directory.
    pub fn new(resource_dir: Option<&Path>) -> Self {
        let mut dirs = Vec::new();
        if let Some(dir) = resource_dir {
            dirs.push(dir.to_path_buf());
        }
        if let Some(builtin) = builtin_dir() {
            dirs.push(builtin);
        }
        Locator { dirs }
    }

    /// Search path with exactly the given directories, highest priority first.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Locator { dirs }
    }

    /// Find the backing file for `name` with one of `extensions`.
    ///
    /// `name` must be canonical (lowercased); directory entries are matched
    /// against it case-insensitively.
    pub fn find(&self, name: &str, extensions: &[&str]) -> Option<PathBuf> {
        for dir in &self.dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            let files: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect();
            for wanted in extensions {
                for path in &files {
                    let stem_matches = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|s| s.eq_ignore_ascii_case(name));
                    let ext_matches = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
                    if stem_matches && ext_matches {
                        return Some(path.clone());
                    }
                }
            }
        }
        None
    }
}

/// The fallback resource directory shipped next to the executable.
fn builtin_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join("resources");
    dir.is_dir().then_some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(label: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "micro2d-cache-{label}-{}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            TempDir(dir)
        }

        fn touch(&self, name: &str) -> PathBuf {
            let path = self.0.join(name);
            File::create(&path)
                .and_then(|mut f| f.write_all(b"x"))
                .unwrap();
            path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn cache_is_idempotent() {
        let mut cache: ResourceCache<(), u32> = ResourceCache::new("number");
        let mut loads = 0;
        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with("seven".into(), (), || {
                    loads += 1;
                    Ok(7)
                })
                .unwrap();
            assert_eq!(*value, 7);
        }
        assert_eq!(loads, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn discriminators_separate_entries() {
        let mut cache: ResourceCache<i32, u32> = ResourceCache::new("font");
        cache
            .get_or_try_insert_with("mono".into(), 12, || Ok(12))
            .unwrap();
        cache
            .get_or_try_insert_with("mono".into(), 24, || Ok(24))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache: ResourceCache<(), u32> = ResourceCache::new("number");
        let err = cache.get_or_try_insert_with("bad".into(), (), || {
            Err(MicroError::load("bad.png", "corrupt"))
        });
        assert!(err.is_err());
        assert!(cache.is_empty());

        // The next attempt runs the loader again.
        let value = cache
            .get_or_try_insert_with("bad".into(), (), || Ok(1))
            .unwrap();
        assert_eq!(*value, 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache: ResourceCache<(), u32> = ResourceCache::new("number");
        cache
            .get_or_try_insert_with("one".into(), (), || Ok(1))
            .unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn locator_matches_names_case_insensitively() {
        let dir = TempDir::new("case");
        let expected = dir.touch("Hero.PNG");
        let locator = Locator::with_dirs(vec![dir.0.clone()]);
        assert_eq!(locator.find("hero", &["png", "bmp"]), Some(expected));
        assert_eq!(locator.find("villain", &["png"]), None);
    }

    #[test]
    fn locator_prefers_earlier_extensions() {
        let dir = TempDir::new("ext");
        dir.touch("hero.bmp");
        let png = dir.touch("hero.png");
        let locator = Locator::with_dirs(vec![dir.0.clone()]);
        assert_eq!(locator.find("hero", &["png", "bmp"]), Some(png));
    }

    #[test]
    fn locator_prefers_earlier_directories() {
        let first = TempDir::new("dir1");
        let second = TempDir::new("dir2");
        let winner = first.touch("hero.png");
        second.touch("hero.png");
        let locator = Locator::with_dirs(vec![first.0.clone(), second.0.clone()]);
        assert_eq!(locator.find("hero", &["png"]), Some(winner));
    }
}
