//! ASCII room layouts used by the headless simulator.
//!
//! Rows are listed top to bottom, so the last line holds `y = 0`.

use anyhow::{bail, ensure, Result};
use maze_guide_core::Tile;

const WALL: char = '#';
const FLOOR: char = '.';
const GOAL: char = 'F';
const GUARDIAN: char = 'G';
const PLAYER: char = 'P';

/// Room contents as observed by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RoomLayout {
    /// Number of tile columns.
    pub(crate) columns: u32,
    /// Number of tile rows.
    pub(crate) rows: u32,
    /// Tiles blocked by maze walls.
    pub(crate) walls: Vec<Tile>,
    /// Tile holding the goal marker.
    pub(crate) goal: Option<Tile>,
    /// Tile the guardian starts on.
    pub(crate) guardian: Option<Tile>,
    /// Tile the player starts on.
    pub(crate) player: Option<Tile>,
}

impl RoomLayout {
    /// Parses a layout drawn with `#` walls, `.` floor, `F` goal, `G` guardian
    /// and `P` player.
    pub(crate) fn parse(source: &str) -> Result<Self> {
        let lines: Vec<&str> = source
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        ensure!(!lines.is_empty(), "layout contains no rows");

        let columns = lines[0].chars().count();
        let rows = lines.len();
        let mut layout = Self {
            columns: u32::try_from(columns)?,
            rows: u32::try_from(rows)?,
            walls: Vec::new(),
            goal: None,
            guardian: None,
            player: None,
        };

        for (row, line) in lines.iter().enumerate() {
            ensure!(
                line.chars().count() == columns,
                "row {} has {} columns, expected {columns}",
                row + 1,
                line.chars().count()
            );

            let y = i32::try_from(rows - 1 - row)?;
            for (x, glyph) in line.chars().enumerate() {
                let tile = Tile::new(i32::try_from(x)?, y, 0);
                match glyph {
                    WALL => layout.walls.push(tile),
                    FLOOR => {}
                    GOAL => place(&mut layout.goal, tile, "goal")?,
                    GUARDIAN => place(&mut layout.guardian, tile, "guardian")?,
                    PLAYER => place(&mut layout.player, tile, "player")?,
                    other => bail!("unexpected glyph '{other}' at column {} of row {}", x + 1, row + 1),
                }
            }
        }

        Ok(layout)
    }

    /// Reports whether `tile` lies on the grid.
    pub(crate) fn contains(&self, tile: Tile) -> bool {
        u32::try_from(tile.x()).is_ok_and(|x| x < self.columns)
            && u32::try_from(tile.y()).is_ok_and(|y| y < self.rows)
    }

    /// Grid cell index of `tile`, counting rows from the top.
    pub(crate) fn cell_index(&self, tile: Tile) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let columns = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(self.rows).ok()? - 1 - usize::try_from(tile.y()).ok()?;
        Some(row * columns + usize::try_from(tile.x()).ok()?)
    }

    /// Glyphs of the layout without any highlights, one entry per cell.
    pub(crate) fn glyphs(&self) -> Vec<char> {
        let cells = self
            .columns
            .checked_mul(self.rows)
            .and_then(|cells| usize::try_from(cells).ok())
            .unwrap_or(0);
        let mut glyphs = vec![FLOOR; cells];
        let mut paint = |tile: Tile, glyph: char| {
            if let Some(index) = self.cell_index(tile) {
                glyphs[index] = glyph;
            }
        };

        for &wall in &self.walls {
            paint(wall, WALL);
        }
        for (tile, glyph) in [
            (self.goal, GOAL),
            (self.guardian, GUARDIAN),
            (self.player, PLAYER),
        ] {
            if let Some(tile) = tile {
                paint(tile, glyph);
            }
        }
        glyphs
    }

    /// Draws the layout back in the format accepted by [`RoomLayout::parse`].
    pub(crate) fn to_ascii(&self) -> String {
        join_rows(&self.glyphs(), self.columns)
    }
}

/// Joins row-major glyphs into newline separated rows.
pub(crate) fn join_rows(glyphs: &[char], columns: u32) -> String {
    let columns = usize::try_from(columns).unwrap_or(1).max(1);
    glyphs
        .chunks(columns)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn place(slot: &mut Option<Tile>, tile: Tile, what: &str) -> Result<()> {
    if let Some(existing) = slot {
        bail!(
            "layout places a second {what} at ({}, {}), first at ({}, {})",
            tile.x(),
            tile.y(),
            existing.x(),
            existing.y()
        );
    }
    *slot = Some(tile);
    Ok(())
}
