#![allow(dead_code)]

use std::collections::HashSet;

use maze_guide_core::{ActorId, GuardianMotion, Tile, Traversal};
use maze_guide_overlay::Host;
use maze_guide_rendering::HintSink;

pub const GUARDIAN: ActorId = ActorId::new(7);

pub fn tile(x: i32, y: i32) -> Tile {
    Tile::new(x, y, 0)
}

/// Seven by seven room with two interior walls and two corner pillars that
/// pin the bounds one tile outside the walkable area.
pub const WALLS: [(i32, i32); 4] = [(0, 4), (4, 3), (-1, -1), (7, 7)];
pub const GOAL: (i32, i32) = (3, 3);

pub struct MazeHost {
    pub columns: i32,
    pub rows: i32,
    pub blocked: HashSet<Tile>,
    pub motion: Option<GuardianMotion>,
    pub player: Option<Tile>,
    pub in_maze: bool,
}

impl MazeHost {
    pub fn new() -> Self {
        Self {
            columns: 7,
            rows: 7,
            blocked: WALLS.iter().map(|&(x, y)| tile(x, y)).collect(),
            motion: Some(GuardianMotion::Stationary { tile: tile(0, 0) }),
            player: Some(tile(3, -1)),
            in_maze: true,
        }
    }
}

impl Traversal for MazeHost {
    fn can_travel(&self, from: Tile, dx: i32, dy: i32) -> bool {
        let target = from.offset(dx, dy);
        (0..self.columns).contains(&target.x())
            && (0..self.rows).contains(&target.y())
            && !self.blocked.contains(&target)
    }
}

impl Host for MazeHost {
    fn in_maze(&self) -> bool {
        self.in_maze
    }

    fn guardian_motion(&self, guardian: ActorId) -> Option<GuardianMotion> {
        (guardian == GUARDIAN).then_some(self.motion).flatten()
    }

    fn player_tile(&self) -> Option<Tile> {
        self.player
    }
}

#[derive(Debug, Default)]
pub struct HintRecorder {
    pub hint: Option<Tile>,
    pub history: Vec<Option<Tile>>,
}

impl HintSink for HintRecorder {
    fn set_hint(&mut self, tile: Tile) {
        self.hint = Some(tile);
        self.history.push(Some(tile));
    }

    fn clear_hint(&mut self) {
        self.hint = None;
        self.history.push(None);
    }
}
