//! Cached guardian routes and the targets projected from them.

use crate::{Direction, Tile};

/// Ordered moves leading the guardian from its effective position to the goal.
///
/// The route behaves like a pending stack: [`Route::next`] peeks the move to
/// execute next, [`Route::pop_next`] consumes it and [`Route::push_next`]
/// places a move back in front.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Route {
    // Stored last move first so the next move sits at the end of the vector.
    pending: Vec<Direction>,
}

impl Route {
    /// Creates an empty route.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Creates a route from moves listed in execution order.
    #[must_use]
    pub fn from_moves<I>(moves: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        let mut pending: Vec<Direction> = moves.into_iter().collect();
        pending.reverse();
        Self { pending }
    }

    /// Move that must be executed next, if any.
    #[must_use]
    pub fn next(&self) -> Option<Direction> {
        self.pending.last().copied()
    }

    /// Removes and returns the move that must be executed next.
    pub fn pop_next(&mut self) -> Option<Direction> {
        self.pending.pop()
    }

    /// Places a move in front of every pending move.
    pub fn push_next(&mut self, direction: Direction) {
        self.pending.push(direction);
    }

    /// Number of pending moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether no moves remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discards every pending move.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pending moves in execution order.
    pub fn upcoming(&self) -> impl ExactSizeIterator<Item = Direction> + '_ {
        self.pending.iter().rev().copied()
    }

    /// Pending moves collected in execution order.
    #[must_use]
    pub fn to_moves(&self) -> Vec<Direction> {
        self.upcoming().collect()
    }
}

/// Monotonic stamp identifying a route installed into the room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteStamp(u64);

impl RouteStamp {
    /// Creates a stamp with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the stamp.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Stamp that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Tiles the player should visit to push the guardian along its route.
///
/// `upcoming` may repeat tiles, repeat `current`, or hold `None` where a side
/// of the room covers no tiles; the renderer filters those.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetProjection {
    /// Tile the player should stand on for the next move.
    pub current: Option<Tile>,
    /// Tiles for the moves after the next one, in execution order.
    pub upcoming: Vec<Option<Tile>>,
}

impl TargetProjection {
    /// Splits targets listed in execution order into current and upcoming.
    #[must_use]
    pub fn from_targets(mut targets: Vec<Option<Tile>>) -> Self {
        if targets.is_empty() {
            return Self::default();
        }

        let current = targets.remove(0);
        Self {
            current,
            upcoming: targets,
        }
    }

    /// Reports whether nothing was projected at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.upcoming.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_moves_keeps_execution_order() {
        let moves = [Direction::East, Direction::North, Direction::West];
        let route = Route::from_moves(moves);

        assert_eq!(route.next(), Some(Direction::East));
        assert_eq!(route.to_moves(), moves.to_vec());
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn pop_then_push_restores_route() {
        let original = Route::from_moves([Direction::South, Direction::East]);
        let mut route = original.clone();

        let first = route.pop_next().expect("route has moves");
        assert_eq!(first, Direction::South);
        assert_eq!(route.next(), Some(Direction::East));

        route.push_next(first);
        assert_eq!(route, original);
    }

    #[test]
    fn empty_route_has_no_next_move() {
        let mut route = Route::new();
        assert!(route.is_empty());
        assert_eq!(route.next(), None);
        assert_eq!(route.pop_next(), None);
    }

    #[test]
    fn projection_splits_current_target() {
        let targets = vec![
            Some(Tile::new(4, 1, 0)),
            Some(Tile::new(3, 4, 0)),
            None,
            Some(Tile::new(3, 4, 0)),
        ];
        let projection = TargetProjection::from_targets(targets);

        assert_eq!(projection.current, Some(Tile::new(4, 1, 0)));
        assert_eq!(
            projection.upcoming,
            vec![Some(Tile::new(3, 4, 0)), None, Some(Tile::new(3, 4, 0))]
        );
    }

    #[test]
    fn projection_from_no_targets_is_empty() {
        let projection = TargetProjection::from_targets(Vec::new());
        assert!(projection.is_empty());
        assert!(projection.upcoming.is_empty());
    }

    #[test]
    fn stamps_increase() {
        let stamp = RouteStamp::default();
        assert!(stamp.next() > stamp);
        assert_eq!(stamp.next().get(), 1);
    }
}
