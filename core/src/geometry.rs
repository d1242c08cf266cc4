//! Bounding region and indicator lines derived from the observed walls.

use thiserror::Error;

use crate::{Direction, Tile};

/// Errors raised when deriving room geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Bounds cannot be derived before at least one wall was observed.
    #[error("cannot derive room bounds without any observed walls")]
    NoObstacles,
}

/// Axis-aligned rectangle spanning the observed walls.
///
/// The width and height are the coordinate spans `max - min`, so a room whose
/// walls cover `0..=4` on both axes has a width and height of four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    plane: i32,
}

impl Bounds {
    /// Creates bounds from explicit corners on the provided plane.
    ///
    /// Corners are normalised so that the minimum never exceeds the maximum.
    #[must_use]
    pub fn from_corners(first: Tile, second: Tile) -> Self {
        Self {
            min_x: first.x().min(second.x()),
            min_y: first.y().min(second.y()),
            max_x: first.x().max(second.x()),
            max_y: first.y().max(second.y()),
            plane: first.plane(),
        }
    }

    /// Tight bounding box of the provided tiles.
    ///
    /// The plane is taken from the first tile.
    pub fn enclosing<I>(tiles: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = Tile>,
    {
        let mut tiles = tiles.into_iter();
        let first = tiles.next().ok_or(GeometryError::NoObstacles)?;
        Ok(tiles.fold(Self::from_corners(first, first), |bounds, tile| Self {
            min_x: bounds.min_x.min(tile.x()),
            min_y: bounds.min_y.min(tile.y()),
            max_x: bounds.max_x.max(tile.x()),
            max_y: bounds.max_y.max(tile.y()),
            plane: bounds.plane,
        }))
    }

    /// Smallest `x` covered by the bounds.
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Smallest `y` covered by the bounds.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Largest `x` covered by the bounds.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Largest `y` covered by the bounds.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Plane the bounds lie on.
    #[must_use]
    pub const fn plane(&self) -> i32 {
        self.plane
    }

    /// Horizontal span `max_x - min_x`.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// Vertical span `max_y - min_y`.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Boundary line a player stands on to push the guardian in `direction`.
    ///
    /// North and south lines cover `x` in `min_x + 1 .. max_x` along the top and
    /// bottom edges; east and west lines cover `y` in `min_y + 1 .. max_y` along
    /// the right and left edges. Neither includes a corner tile.
    #[must_use]
    pub fn indicator_line(&self, direction: Direction) -> IndicatorLine {
        let horizontal = len_from_span(self.width());
        let vertical = len_from_span(self.height());
        match direction {
            Direction::North => IndicatorLine::new(
                direction,
                Tile::new(self.min_x + 1, self.max_y, self.plane),
                horizontal,
            ),
            Direction::South => IndicatorLine::new(
                direction,
                Tile::new(self.min_x + 1, self.min_y, self.plane),
                horizontal,
            ),
            Direction::East => IndicatorLine::new(
                direction,
                Tile::new(self.max_x, self.min_y + 1, self.plane),
                vertical,
            ),
            Direction::West => IndicatorLine::new(
                direction,
                Tile::new(self.min_x, self.min_y + 1, self.plane),
                vertical,
            ),
        }
    }

    /// Side of the room the tile lies on, matching the direction the guardian
    /// is pushed when the player stands there.
    ///
    /// Sides are checked north, south, east, west. Corner tiles and tiles
    /// strictly inside the bounds belong to no side.
    #[must_use]
    pub fn side_of(&self, tile: Tile) -> Option<Direction> {
        let (x, y) = (tile.x(), tile.y());
        let within_columns = x < self.max_x && x > self.min_x;
        let within_rows = y < self.max_y && y > self.min_y;

        if y >= self.max_y && within_columns {
            Some(Direction::North)
        } else if y <= self.min_y && within_columns {
            Some(Direction::South)
        } else if x >= self.max_x && within_rows {
            Some(Direction::East)
        } else if x <= self.min_x && within_rows {
            Some(Direction::West)
        } else {
            None
        }
    }
}

fn len_from_span(span: i32) -> u32 {
    u32::try_from(span.saturating_sub(1)).unwrap_or(0)
}

/// One-tile-thick line of tiles along a side of the [`Bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndicatorLine {
    direction: Direction,
    origin: Tile,
    len: u32,
}

impl IndicatorLine {
    fn new(direction: Direction, origin: Tile, len: u32) -> Self {
        Self {
            direction,
            origin,
            len,
        }
    }

    /// Side of the bounds the line runs along.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of tiles covered by the line.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// Reports whether the line covers no tiles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Covered tiles in ascending coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let (dx, dy) = match self.direction {
            Direction::North | Direction::South => (1, 0),
            Direction::East | Direction::West => (0, 1),
        };
        (0..self.len).map(move |index| {
            let index = index as i32;
            self.origin.offset(dx * index, dy * index)
        })
    }

    /// Reports whether the line covers the provided tile.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles().any(|candidate| candidate == tile)
    }

    /// Covered tile with the smallest Manhattan distance to `to`.
    ///
    /// Ties resolve to the tile encountered first in [`IndicatorLine::tiles`]
    /// order. Returns `None` for an empty line.
    #[must_use]
    pub fn nearest(&self, to: Tile) -> Option<Tile> {
        let mut best: Option<(Tile, u32)> = None;
        for tile in self.tiles() {
            let distance = tile.manhattan_distance(to);
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((tile, distance)),
            }
        }
        best.map(|(tile, _)| tile)
    }
}
