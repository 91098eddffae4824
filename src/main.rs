//! micro2d demo entry point.
//!
//! Opens a window and exercises the drawing calls without needing any
//! asset files: text in the built-in font, filled rectangles and the
//! input counters. Useful as a smoke test and as a minimal example of
//! the main loop.
//!
//! ```sh
//! cargo run --release -- --config config.ini
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use clap::Parser;
use std::path::PathBuf;

use micro2d::{Config, Micro, RectangleOptions, TextOptions};

/// micro2d demo
#[derive(Parser)]
#[command(version, about = "Demo window for the micro2d library")]
struct Cli {
    /// Configuration file (INI). Defaults are used when absent.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start in fullscreen.
    #[arg(long)]
    fullscreen: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::default();
    config.title = Some("micro2d demo".to_string());
    if let Some(path) = &cli.config {
        if let Err(e) = config.load_from_file(path) {
            log::error!("could not load {}: {e}", path.display());
            std::process::exit(1);
        }
    }
    if cli.fullscreen {
        config.fullscreen = true;
    }

    if let Err(e) = run(config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), micro2d::MicroError> {
    let mut micro = Micro::init(config)?;
    micro.set_background_color("#203040")?;

    while micro.running() {
        micro.clear(None)?;

        let (width, height) = micro.resolution();
        let time = micro.now();

        // A rectangle orbiting the center.
        let angle = time * 90.0;
        let orbit = (angle.to_radians().cos() * 60.0, angle.to_radians().sin() * 60.0);
        micro.fill_rectangle_ex(
            24,
            24,
            RectangleOptions {
                x: Some(orbit.0 as i32),
                y: Some(orbit.1 as i32),
                angle,
                color: Some("orange".to_string()),
            },
        )?;

        micro.draw_text_ex(
            &format!("micro2d {}x{} @ {} fps", width, height, micro.fps()),
            TextOptions {
                x: Some(-(width as i32) / 2 + 4),
                y: Some(height as i32 / 2 - 4),
                ..TextOptions::default()
            },
        )?;

        let held = micro.keys();
        if !held.is_empty() {
            micro.draw_text_ex(
                &format!("keys: {}", held.join(" ")),
                TextOptions {
                    x: Some(-(width as i32) / 2 + 4),
                    y: Some(-(height as i32) / 2 + 12),
                    ..TextOptions::default()
                },
            )?;
        }

        micro.update();
    }
    Ok(())
}
