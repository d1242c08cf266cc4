#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lookahead system projecting upcoming guardian moves onto the room edges.
//!
//! Every move of the guardian is triggered by the player standing on the side
//! of the room matching the move's direction. The projector picks, for each of
//! the next few moves, the tile on that side the player should walk to.

use maze_guide_core::{Bounds, Direction, Route, TargetProjection, Tile};

/// Pure system that turns the cached route into player targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lookahead {
    max_count: usize,
}

impl Lookahead {
    /// Creates a projector that produces at most `max_count` targets.
    #[must_use]
    pub const fn new(max_count: usize) -> Self {
        Self { max_count }
    }

    /// Largest number of targets produced per projection.
    #[must_use]
    pub const fn max_count(&self) -> usize {
        self.max_count
    }

    /// Projects the next moves of `route` onto the room's indicator lines.
    ///
    /// The first target is the tile on the next move's line closest to the
    /// player. Each later target is chosen on its own line closest to the tile
    /// that the move after it would pick, measured from the previous target, so
    /// that the player is not led into a corner it must walk back out of. The
    /// final move of the route has nothing to look ahead to and is measured
    /// from the previous target directly.
    #[must_use]
    pub fn project(&self, route: &Route, bounds: &Bounds, player: Tile) -> TargetProjection {
        let count = self.max_count.min(route.len());
        if count == 0 {
            return TargetProjection::default();
        }

        // One extra move so the last projected move can still look ahead.
        let moves: Vec<Direction> = route.upcoming().take(count + 1).collect();
        let mut targets = Vec::with_capacity(count);
        let mut reference = player;

        for (index, &direction) in moves.iter().take(count).enumerate() {
            let line = bounds.indicator_line(direction);
            let target = if index == 0 {
                line.nearest(player)
            } else if let Some(&after) = moves.get(index + 1) {
                // An empty following side gives nothing to look ahead to.
                let lookahead = bounds
                    .indicator_line(after)
                    .nearest(reference)
                    .unwrap_or(reference);
                line.nearest(lookahead)
            } else {
                line.nearest(reference)
            };

            // An empty side leaves the reference where it was.
            if let Some(tile) = target {
                reference = tile;
            }
            targets.push(target);
        }

        TargetProjection::from_targets(targets)
    }
}
