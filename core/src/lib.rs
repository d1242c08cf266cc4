#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze guide engine.
//!
//! This crate defines the value types and the message surface that connect the
//! host overlay, the authoritative room state, and the pure planning systems.
//! The overlay submits [`Command`] values describing observed host state, the
//! world executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values for systems to react to. Systems consume event
//! streams and respond exclusively with new command batches.

mod config;
mod geometry;
mod route;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, GuideConfig, HintColor, MAX_STEPS};
pub use geometry::{Bounds, GeometryError, IndicatorLine};
pub use route::{Route, RouteStamp, TargetProjection};

/// Integer coordinate on the world grid.
///
/// Equality is by exact `(x, y, plane)` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    x: i32,
    y: i32,
    plane: i32,
}

impl Tile {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Horizontal coordinate, increasing towards the east.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, increasing towards the north.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Plane (floor level) the tile lies on.
    #[must_use]
    pub const fn plane(&self) -> i32 {
        self.plane
    }

    /// Tile translated by the provided delta on the same plane.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.plane)
    }

    /// Neighbouring tile one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Computes the Manhattan distance between two tiles, ignoring the plane.
    #[must_use]
    pub fn manhattan_distance(self, other: Tile) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Cardinal movement directions available to the guardian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y`.
    North,
    /// Movement toward decreasing `y`.
    South,
    /// Movement toward increasing `x`.
    East,
    /// Movement toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in neighbour enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit tile delta travelled by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Direction travelled when moving from `from` to `to`.
    ///
    /// The `x` axis is inspected before the `y` axis. Returns `None` when both
    /// tiles share their coordinates.
    #[must_use]
    pub fn of_travel(from: Tile, to: Tile) -> Option<Self> {
        if from.x() > to.x() {
            Some(Self::West)
        } else if from.x() < to.x() {
            Some(Self::East)
        } else if from.y() > to.y() {
            Some(Self::South)
        } else if from.y() < to.y() {
            Some(Self::North)
        } else {
            None
        }
    }

    /// Orientation an actor holds while facing this direction.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::South => Orientation::new(0),
            Self::West => Orientation::new(512),
            Self::North => Orientation::new(1024),
            Self::East => Orientation::new(1536),
        }
    }
}

/// Facing angle of an actor measured in 2048 units per full turn.
///
/// Zero faces south and the angle grows clockwise when viewed from above:
/// 512 faces west, 1024 north and 1536 east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation(u16);

impl Orientation {
    /// Units composing a full turn.
    pub const FULL_TURN: u16 = 2048;

    /// Creates an orientation, wrapping values beyond a full turn.
    #[must_use]
    pub const fn new(angle: u16) -> Self {
        Self(angle % Self::FULL_TURN)
    }

    /// Raw angle within `0..2048`.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Cardinal direction closest to this orientation.
    #[must_use]
    pub const fn nearest_direction(self) -> Direction {
        let quarter = Self::FULL_TURN / 4;
        match ((self.0 + quarter / 2) / quarter) % 4 {
            0 => Direction::South,
            1 => Direction::West,
            2 => Direction::North,
            _ => Direction::East,
        }
    }
}

/// Identifier the host assigns to a spawned actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Live motion state of the guardian as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardianMotion {
    /// Guardian stands still on its live tile.
    Stationary {
        /// Tile the guardian occupies.
        tile: Tile,
    },
    /// Guardian is mid-slide and will keep moving until blocked.
    Sliding {
        /// Tile the guardian currently occupies.
        tile: Tile,
        /// Orientation the guardian faces while sliding.
        orientation: Orientation,
    },
}

impl GuardianMotion {
    /// Tile the guardian occupies right now.
    #[must_use]
    pub const fn live_tile(&self) -> Tile {
        match self {
            Self::Stationary { tile } | Self::Sliding { tile, .. } => *tile,
        }
    }
}

/// Host capability reporting whether travel between adjacent tiles is open.
pub trait Traversal {
    /// Reports whether a single step of `(dx, dy)` from `tile` crosses neither
    /// a blocking wall nor the map boundary.
    fn can_travel(&self, tile: Tile, dx: i32, dy: i32) -> bool;
}

impl<T> Traversal for &T
where
    T: Traversal + ?Sized,
{
    fn can_travel(&self, tile: Tile, dx: i32, dy: i32) -> bool {
        (**self).can_travel(tile, dx, dy)
    }
}

/// Commands that express all permissible room mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Records an observed maze wall occupying the provided tile.
    RecordWall {
        /// Tile blocked by the wall.
        tile: Tile,
    },
    /// Records the fixed goal marker of the maze.
    RecordGoal {
        /// Tile the guardian must reach.
        tile: Tile,
    },
    /// Starts tracking a guardian actor.
    TrackGuardian {
        /// Host identifier of the guardian.
        guardian: ActorId,
    },
    /// Stops tracking the guardian if it matches the tracked actor.
    ReleaseGuardian {
        /// Host identifier of the despawned actor.
        guardian: ActorId,
    },
    /// Clears every observed wall, the goal and all cached geometry.
    ResetRoom,
    /// Discards cached bounds, route and position while the overlay is inactive.
    Deactivate,
    /// Advances the room by one simulation tick.
    Tick {
        /// Effective position of the tracked guardian, when it could be resolved.
        guardian: Option<Tile>,
    },
    /// Installs a freshly planned route.
    SetRoute {
        /// Effective guardian position the route was planned from.
        origin: Tile,
        /// Planned moves, next move first.
        route: Route,
    },
}

/// Events broadcast by the room after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Bounds were recomputed because the observed wall count changed.
    LayoutChanged {
        /// Tight bounding box of the observed walls.
        bounds: Bounds,
        /// Number of walls the bounds were derived from.
        walls: usize,
    },
    /// The guardian's effective position changed.
    GuardianMoved {
        /// Previously recorded position, if any.
        from: Option<Tile>,
        /// Newly recorded position.
        to: Tile,
    },
    /// A route from the guardian to the goal must be planned.
    RouteRequested {
        /// Effective guardian position the route starts from.
        from: Tile,
        /// Goal tile the route must reach.
        goal: Tile,
    },
    /// A new route replaced the cached one.
    RouteUpdated {
        /// Stamp identifying the installed route.
        stamp: RouteStamp,
        /// Number of moves contained in the route.
        moves: usize,
    },
    /// A planned route was dropped because the guardian moved on meanwhile.
    RouteDiscarded {
        /// Origin the discarded route was planned from.
        origin: Tile,
    },
    /// The guardian stands on the goal tile.
    GoalReached {
        /// Goal tile that was reached.
        tile: Tile,
    },
    /// The hint marker must be cleared.
    HintCleared,
    /// Walls, goal and all cached geometry were discarded.
    RoomReset,
}
