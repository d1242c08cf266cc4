#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Route planning system that answers route requests with slide-aware routes.
//!
//! The guardian never moves a single tile at a time: once pushed it keeps
//! sliding until a wall or the map edge stops it. Planning therefore searches
//! over slide destinations rather than adjacent tiles.

mod search;

use maze_guide_core::{Command, Direction, Event, GuardianMotion, Route, Tile, Traversal};
use tracing::debug;

pub use search::{build_route, search, Exploration, PredecessorMap};

/// Longest slide followed before the traversal rule gives up.
///
/// Hosts always stop a slide at their loaded map edge well before this.
pub const MAX_SLIDE_TILES: u32 = 1024;

/// Furthest tile reached by sliding from `tile` in `direction`.
///
/// Returns `tile` itself when the first step is already blocked.
#[must_use]
pub fn advance<T>(traversal: &T, tile: Tile, direction: Direction) -> Tile
where
    T: Traversal + ?Sized,
{
    let (dx, dy) = direction.delta();
    let mut current = tile;
    for _ in 0..MAX_SLIDE_TILES {
        if !traversal.can_travel(current, dx, dy) {
            break;
        }
        current = current.offset(dx, dy);
    }
    current
}

/// Position the route is planned from, derived once per tick from the
/// guardian's motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectivePosition {
    /// Live tile when stationary, slide destination when sliding.
    pub tile: Tile,
    /// Destination of an ongoing slide.
    pub destination: Option<Tile>,
}

/// Resolves the tile the guardian will rest on.
#[must_use]
pub fn effective_position<T>(motion: GuardianMotion, traversal: &T) -> EffectivePosition
where
    T: Traversal + ?Sized,
{
    match motion {
        GuardianMotion::Stationary { tile } => EffectivePosition {
            tile,
            destination: None,
        },
        GuardianMotion::Sliding { tile, orientation } => {
            let destination = advance(traversal, tile, orientation.nearest_direction());
            EffectivePosition {
                tile: destination,
                destination: Some(destination),
            }
        }
    }
}

/// Pure system that reacts to route requests and emits planned routes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoutePlanner {
    exploration: Exploration,
}

impl RoutePlanner {
    /// Creates a planner exploring the room as requested.
    #[must_use]
    pub const fn new(exploration: Exploration) -> Self {
        Self { exploration }
    }

    /// Consumes room events and answers the latest route request.
    ///
    /// Earlier requests in the same batch are superseded and left unanswered.
    pub fn handle<T>(&mut self, events: &[Event], traversal: &T, out: &mut Vec<Command>)
    where
        T: Traversal + ?Sized,
    {
        let request = events.iter().rev().find_map(|event| match event {
            Event::RouteRequested { from, goal } => Some((*from, *goal)),
            _ => None,
        });

        let Some((origin, goal)) = request else {
            return;
        };

        let route = self.plan(traversal, origin, goal);
        debug!(?origin, ?goal, moves = route.len(), "planned route");
        out.push(Command::SetRoute { origin, route });
    }

    /// Plans the moves leading from `start` to `goal`.
    ///
    /// Returns an empty route when the goal is unreachable or equals `start`.
    #[must_use]
    pub fn plan<T>(&self, traversal: &T, start: Tile, goal: Tile) -> Route
    where
        T: Traversal + ?Sized,
    {
        let map = search(start, goal, self.exploration, |tile, direction| {
            advance(traversal, tile, direction)
        });
        build_route(&map, goal)
    }
}
