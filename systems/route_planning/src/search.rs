//! Breadth-first search over slide destinations.

use std::collections::{HashMap, HashSet, VecDeque};

use maze_guide_core::{Direction, Route, Tile};

/// How far the search explores once the goal was discovered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Exploration {
    /// Explores every reachable tile before returning.
    #[default]
    Exhaustive,
    /// Returns as soon as the goal receives its predecessor edge.
    UntilGoal,
}

/// Tile each discovered tile was first reached from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredecessorMap {
    edges: HashMap<Tile, Tile>,
}

impl PredecessorMap {
    /// Tile the provided tile was reached from, if it was discovered.
    #[must_use]
    pub fn predecessor(&self, tile: Tile) -> Option<Tile> {
        self.edges.get(&tile).copied()
    }

    /// Number of tiles holding a predecessor edge.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Reports whether the search discovered nothing beyond its start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Breadth-first search from `start`, expanding every tile into the four
/// destinations reported by `neighbour`.
///
/// Destinations equal to the expanded tile, or already expanded, are skipped.
/// A destination records a predecessor edge whenever its distance improves.
pub fn search<F>(
    start: Tile,
    goal: Tile,
    exploration: Exploration,
    mut neighbour: F,
) -> PredecessorMap
where
    F: FnMut(Tile, Direction) -> Tile,
{
    let mut frontier = VecDeque::from([start]);
    let mut closed: HashSet<Tile> = HashSet::new();
    let mut scores: HashMap<Tile, u32> = HashMap::from([(start, 0)]);
    let mut map = PredecessorMap::default();

    while let Some(current) = frontier.pop_front() {
        let _ = closed.insert(current);
        let score = scores.get(&current).copied().unwrap_or(0) + 1;

        for direction in Direction::ALL {
            let candidate = neighbour(current, direction);
            if candidate == current || closed.contains(&candidate) {
                continue;
            }

            if scores.get(&candidate).is_some_and(|&known| known <= score) {
                continue;
            }

            let _ = scores.insert(candidate, score);
            let _ = map.edges.insert(candidate, current);
            frontier.push_back(candidate);

            if exploration == Exploration::UntilGoal && candidate == goal {
                return map;
            }
        }
    }

    map
}

/// Walks the predecessor edges back from `goal`, producing the moves that lead
/// from the search start to the goal.
///
/// Returns an empty route when the goal was never discovered or equals the
/// search start.
#[must_use]
pub fn build_route(map: &PredecessorMap, goal: Tile) -> Route {
    let mut route = Route::new();
    let mut current = goal;

    while let Some(previous) = map.predecessor(current) {
        let Some(direction) = Direction::of_travel(previous, current) else {
            break;
        };

        // Walking backwards, so each move lands in front of the ones collected.
        route.push_next(direction);
        current = previous;

        if route.len() > map.len() {
            route.clear();
            break;
        }
    }

    route
}
