//! Tile-map grids loaded from plain text files.
//!
//! A tile-map file names its tileset image on the first content line and
//! then lists one comma-separated row per line:
//!
//! ```text
//! # A 4x3 map drawn with the "dungeon" tileset.
//! tiles: dungeon
//! 1, 2, 2, 3
//! 4, water, water, 6
//! wall*4
//! ```
//!
//! Cells are tile references in the same form the tile geometry resolver
//! accepts: a bare frame number, or an animation name. An empty cell or the
//! literal `0` marks a transparent hole. A cell may carry a `*count` suffix
//! repeating it along the row; `*0` expands to nothing.
//!
//! The format is whitespace-blind: lines are lowercased, a `#` or `;`
//! anywhere cuts the rest of the line, and all remaining whitespace is
//! deleted before cells are split on commas.

use crate::error::MicroError;
use crate::validate;

/// Canonicalize one tile-map line: lowercase, cut any comment, delete all
/// whitespace.
fn clean_line(line: &str) -> String {
    let line = match line.find(|c| c == '#' || c == ';') {
        Some(i) => &line[..i],
        None => line,
    };
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// An immutable grid of tile references over one tileset image.
#[derive(Debug, Clone)]
pub struct TileMap {
    /// Name of the tileset image the cells index into.
    pub tileset: String,
    /// Grid width in tiles, the longest row seen in the file.
    pub width: usize,
    /// Grid height in tiles.
    pub height: usize,
    // Rows are stored as parsed, which may be shorter than `width`.
    rows: Vec<Vec<String>>,
}

impl TileMap {
    /// Parse tile-map text. `file` names the source for diagnostics.
    pub fn parse(text: &str, file: &str) -> Result<Self, MicroError> {
        let mut tileset: Option<String> = None;
        let mut rows: Vec<Vec<String>> = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            let line = clean_line(raw);
            if line.is_empty() {
                continue;
            }
            let number = number + 1;

            if tileset.is_none() {
                tileset = Some(parse_header(&line, file, number)?);
                continue;
            }
            rows.push(parse_row(&line, file, number)?);
        }

        let tileset = tileset.ok_or_else(|| {
            MicroError::format(file, "missing `tiles:` header naming the tileset image")
        })?;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();

        Ok(TileMap {
            tileset,
            width,
            height,
            rows,
        })
    }

    /// The tile reference at `(x, y)`, wrapping both axes.
    ///
    /// Coordinates outside the grid wrap around, so a map tiles the plane
    /// infinitely. Columns past the end of a short row read as `"0"`.
    pub fn get(&self, x: i32, y: i32) -> &str {
        if self.width == 0 || self.height == 0 {
            return "0";
        }
        let x = x.rem_euclid(self.width as i32) as usize;
        let y = y.rem_euclid(self.height as i32) as usize;
        self.rows[y].get(x).map_or("0", String::as_str)
    }
}

// `line` has already been cleaned: lowercase, no whitespace.
fn parse_header(line: &str, file: &str, number: usize) -> Result<String, MicroError> {
    let name = line
        .strip_prefix("tiles")
        .and_then(|rest| rest.strip_prefix(':').or_else(|| rest.strip_prefix('=')))
        .ok_or_else(|| {
            MicroError::format(
                file,
                format!("line {number}: expected `tiles: <image>` before any rows"),
            )
        })?;
    if !validate::is_identifier(name) {
        return Err(MicroError::format(
            file,
            format!("line {number}: `{name}` is not a valid tileset image name"),
        ));
    }
    Ok(name.to_string())
}

fn parse_row(line: &str, file: &str, number: usize) -> Result<Vec<String>, MicroError> {
    let mut row = Vec::new();
    for cell in line.split(',') {
        if cell.is_empty() {
            row.push("0".to_string());
            continue;
        }
        // frame number or identifier, optionally repeated as `ref*count`
        let (name, count) = match cell.split_once('*') {
            Some((name, count)) => {
                let count = count.parse::<usize>().map_err(|_| {
                    MicroError::format(
                        file,
                        format!(
                            "line {number}: `{cell}` repeat count must be a non-negative integer"
                        ),
                    )
                })?;
                (name, count)
            }
            None => (cell, 1),
        };
        let is_frame = !name.is_empty() && name.chars().all(|c| c.is_ascii_digit());
        if !is_frame && !validate::is_identifier(name) {
            return Err(MicroError::format(
                file,
                format!("line {number}: `{cell}` is not a frame number or animation name"),
            ));
        }
        row.extend(std::iter::repeat_n(name.to_string(), count));
    }
    Ok(row)
}
