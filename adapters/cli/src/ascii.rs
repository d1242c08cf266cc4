//! Text frames for the headless simulator.

use anyhow::{bail, ensure, Context, Result as AnyResult};
use glam::Vec2;
use maze_guide_core::Tile;
use maze_guide_rendering::{Color, RenderingBackend, TilePolygon, TileProjector};

use crate::layout::{join_rows, RoomLayout};

const OUTLINE_GLYPHS: [char; 6] = ['*', '+', '~', 'o', '@', '%'];
const ACTOR_GLYPHS: [char; 2] = ['G', 'P'];

/// Maps grid tiles onto unit squares, row zero at the top.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GridProjector {
    columns: u32,
    rows: u32,
}

impl TileProjector for GridProjector {
    fn tile_polygon(&self, tile: Tile) -> Option<TilePolygon> {
        let column = u32::try_from(tile.x()).ok().filter(|&x| x < self.columns)?;
        let row = u32::try_from(tile.y()).ok().filter(|&y| y < self.rows)?;
        let top = self.rows - 1 - row;
        Some(TilePolygon::square(
            Vec2::new(column as f32, top as f32),
            1.0,
        ))
    }
}

/// Character canvas collecting tile outlines for a single frame.
#[derive(Debug)]
pub(crate) struct AsciiCanvas {
    columns: u32,
    rows: u32,
    cells: Vec<char>,
    legend: Vec<(Color, char)>,
}

impl AsciiCanvas {
    /// Starts a frame showing the provided room contents.
    pub(crate) fn new(layout: &RoomLayout) -> Self {
        Self {
            columns: layout.columns,
            rows: layout.rows,
            cells: layout.glyphs(),
            legend: Vec::new(),
        }
    }

    /// Projector placing tiles onto this canvas.
    pub(crate) fn projector(&self) -> GridProjector {
        GridProjector {
            columns: self.columns,
            rows: self.rows,
        }
    }

    /// Renders the frame followed by a legend of outline colours.
    pub(crate) fn finish(self) -> String {
        let mut frame = join_rows(&self.cells, self.columns);
        for (color, glyph) in &self.legend {
            frame.push_str(&format!(
                "\n  {glyph} rgb({}, {}, {})",
                channel(color.red),
                channel(color.green),
                channel(color.blue)
            ));
        }
        frame
    }

    fn glyph(&mut self, color: Color) -> AnyResult<char> {
        if let Some((_, glyph)) = self.legend.iter().find(|(known, _)| *known == color) {
            return Ok(*glyph);
        }

        let Some(&glyph) = OUTLINE_GLYPHS.get(self.legend.len()) else {
            bail!("frame uses more than {} outline colours", OUTLINE_GLYPHS.len());
        };
        self.legend.push((color, glyph));
        Ok(glyph)
    }
}

impl RenderingBackend for AsciiCanvas {
    fn outline(&mut self, polygon: &TilePolygon, color: Color) -> AnyResult<()> {
        let centre = polygon.centroid();
        ensure!(
            centre.x >= 0.0 && centre.y >= 0.0,
            "outline centred off canvas at {centre}"
        );

        let columns = usize::try_from(self.columns)?;
        let index = centre.y as usize * columns + centre.x as usize;
        let glyph = self.glyph(color)?;
        let cell = self
            .cells
            .get_mut(index)
            .with_context(|| format!("outline centred off canvas at {centre}"))?;
        if !ACTOR_GLYPHS.contains(cell) {
            *cell = glyph;
        }
        Ok(())
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> RoomLayout {
        RoomLayout::parse("#####\n#G.F#\n#..P#\n#####").expect("layout parses")
    }

    #[test]
    fn projector_flips_rows() {
        let canvas = AsciiCanvas::new(&layout());
        let projector = canvas.projector();

        let polygon = projector
            .tile_polygon(Tile::new(1, 3, 0))
            .expect("tile is on the grid");
        assert_eq!(polygon.centroid(), Vec2::new(1.5, 0.5));
        assert!(projector.tile_polygon(Tile::new(5, 0, 0)).is_none());
        assert!(projector.tile_polygon(Tile::new(0, -1, 0)).is_none());
    }

    #[test]
    fn outlines_keep_actors_visible_and_share_glyphs() {
        let mut canvas = AsciiCanvas::new(&layout());
        let projector = canvas.projector();
        let red = Color::from_rgba_u8(255, 0, 0, 255);

        for tile in [Tile::new(1, 2, 0), Tile::new(2, 3, 0), Tile::new(4, 1, 0)] {
            let polygon = projector.tile_polygon(tile).expect("on grid");
            canvas.outline(&polygon, red).expect("outline fits");
        }
        let polygon = projector.tile_polygon(Tile::new(2, 1, 0)).expect("on grid");
        canvas.outline(&polygon, Color::GREEN).expect("outline fits");

        assert_eq!(
            canvas.finish(),
            "##*##\n#G.F#\n#.+P*\n#####\n  * rgb(255, 0, 0)\n  + rgb(0, 255, 0)"
        );
    }
}
