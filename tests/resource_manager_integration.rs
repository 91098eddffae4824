//! Integration tests for name-based resource loading.
//!
//! Exercises the locator + cache + parser path end to end with real files
//! in a temporary directory. Only tile maps are covered here: images,
//! fonts and audio need a window or an audio device, which integration
//! tests cannot assume.

use std::fs;
use std::path::PathBuf;

use micro2d::resources::cache::Locator;
use micro2d::resources::ResourceManager;
use micro2d::MicroError;

struct TempDir(PathBuf);

impl TempDir {
    fn new(label: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "micro2d-manager-{label}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        TempDir(dir)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn manager_for(dir: &TempDir) -> ResourceManager {
    ResourceManager::new(Locator::with_dirs(vec![dir.0.clone()]))
}

#[test]
fn tilemap_loads_from_resource_directory() {
    let dir = TempDir::new("load");
    dir.write(
        "level.txt",
        "# demo level\ntiles: dungeon\nwall, wall, wall\nwall, 0, wall\n",
    );

    let mut manager = manager_for(&dir);
    let map = manager.tilemap("level").unwrap();
    assert_eq!(map.tileset, "dungeon");
    assert_eq!((map.width, map.height), (3, 2));
    assert_eq!(map.get(1, 1), "0");
    assert_eq!(map.get(0, 0), "wall");
}

#[test]
fn names_match_files_case_insensitively() {
    let dir = TempDir::new("case");
    dir.write("Level.TXT", "tiles: dungeon\nwall\n");

    let mut manager = manager_for(&dir);
    assert!(manager.tilemap("level").is_ok());
    // The request name is canonicalized too.
    assert!(manager.tilemap("  LEVEL  ").is_ok());
}

#[test]
fn cached_tilemaps_do_not_reread_the_file() {
    let dir = TempDir::new("cache");
    let path = dir.write("level.txt", "tiles: dungeon\nwall, wall\n");

    let mut manager = manager_for(&dir);
    assert_eq!(manager.tilemap("level").unwrap().width, 2);

    // Rewriting the file must not change the cached grid.
    fs::write(&path, "tiles: dungeon\nwall, wall, wall, wall\n").unwrap();
    assert_eq!(manager.tilemap("level").unwrap().width, 2);
}

#[test]
fn parse_errors_are_reported_and_not_cached() {
    let dir = TempDir::new("badparse");
    let path = dir.write("level.txt", "wall, wall\n");

    let mut manager = manager_for(&dir);
    // No `tiles:` header.
    assert!(matches!(
        manager.tilemap("level"),
        Err(MicroError::Format { .. })
    ));

    // Fixing the file makes the next request succeed.
    fs::write(&path, "tiles: dungeon\nwall, wall\n").unwrap();
    assert!(manager.tilemap("level").is_ok());
}

#[test]
fn missing_and_malformed_names_fail_without_files() {
    let dir = TempDir::new("missing");
    let mut manager = manager_for(&dir);

    assert!(matches!(
        manager.tilemap("nosuchlevel"),
        Err(MicroError::NotFound {
            kind: "tile map",
            ..
        })
    ));
    assert!(matches!(
        manager.tilemap("2fast"),
        Err(MicroError::InvalidName(_))
    ));
}

#[test]
fn dispose_forces_a_reload() {
    let dir = TempDir::new("dispose");
    let path = dir.write("level.txt", "tiles: dungeon\nwall\n");

    let mut manager = manager_for(&dir);
    assert_eq!(manager.tilemap("level").unwrap().width, 1);

    fs::write(&path, "tiles: dungeon\nwall, wall\n").unwrap();
    manager.dispose();
    assert_eq!(manager.tilemap("level").unwrap().width, 2);
}
