//! Headless host that plays a room layout against the overlay.
//!
//! The simulated player walks straight to the hinted tile and pushes the
//! guardian once it stands on the side matching the next move. A push shows
//! up as a slide for exactly one tick before the guardian comes to rest.

use std::collections::HashSet;

use anyhow::{Context, Result};
use maze_guide_core::{ActorId, GuardianMotion, GuideConfig, Route, Tile, Traversal};
use maze_guide_overlay::{Host, HostEvent, Overlay};
use maze_guide_rendering::{HintSink, Scene};
use maze_guide_system_route_planning::{advance, RoutePlanner};
use maze_guide_world::query;
use tracing::{debug, info};

use crate::layout::RoomLayout;

const GUARDIAN: ActorId = ActorId::new(1);

struct GridHost {
    layout: RoomLayout,
    walls: HashSet<Tile>,
    motion: GuardianMotion,
    player: Option<Tile>,
}

impl Traversal for GridHost {
    fn can_travel(&self, from: Tile, dx: i32, dy: i32) -> bool {
        let target = from.offset(dx, dy);
        self.layout.contains(target) && !self.walls.contains(&target)
    }
}

impl Host for GridHost {
    fn in_maze(&self) -> bool {
        true
    }

    fn guardian_motion(&self, guardian: ActorId) -> Option<GuardianMotion> {
        (guardian == GUARDIAN).then_some(self.motion)
    }

    fn player_tile(&self) -> Option<Tile> {
        self.player
    }
}

impl GridHost {
    fn new(layout: RoomLayout, guardian: Tile) -> Self {
        Self {
            walls: layout.walls.iter().copied().collect(),
            motion: GuardianMotion::Stationary { tile: guardian },
            player: layout.player,
            layout,
        }
    }
}

/// Plans the moves taking the layout's guardian to its goal.
pub(crate) fn plan_route(layout: &RoomLayout) -> Result<Route> {
    let goal = layout.goal.context("layout has no goal marker")?;
    let guardian = layout.guardian.context("layout has no guardian")?;
    let host = GridHost::new(layout.clone(), guardian);
    Ok(RoutePlanner::default().plan(&host, guardian, goal))
}

#[derive(Debug, Default)]
struct HintMarker {
    tile: Option<Tile>,
}

impl HintSink for HintMarker {
    fn set_hint(&mut self, tile: Tile) {
        self.tile = Some(tile);
    }

    fn clear_hint(&mut self) {
        self.tile = None;
    }
}

/// How a simulation run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The guardian came to rest on the goal.
    GoalReached {
        /// Ticks simulated, including the final one.
        ticks: u32,
    },
    /// The tick budget ran out first.
    OutOfTicks {
        /// Ticks simulated.
        ticks: u32,
    },
}

/// Overlay driven by a simulated host.
pub(crate) struct Simulation {
    goal: Tile,
    overlay: Overlay,
    host: GridHost,
    hint: HintMarker,
    ticks: u32,
}

impl Simulation {
    /// Feeds the layout to a fresh overlay.
    pub(crate) fn new(layout: RoomLayout, config: GuideConfig) -> Result<Self> {
        let goal = layout.goal.context("layout has no goal marker")?;
        let guardian = layout.guardian.context("layout has no guardian")?;

        let mut overlay = Overlay::new(config);
        let mut hint = HintMarker::default();
        for &tile in &layout.walls {
            overlay.notify(HostEvent::WallSpawned { tile }, &mut hint);
        }
        overlay.notify(HostEvent::GoalSpawned { tile: goal }, &mut hint);
        overlay.notify(HostEvent::GuardianSpawned { actor: GUARDIAN }, &mut hint);

        let host = GridHost::new(layout, guardian);

        Ok(Self {
            goal,
            overlay,
            host,
            hint,
            ticks: 0,
        })
    }

    /// Runs ticks until the guardian rests on the goal or `max_ticks` elapse,
    /// handing every frame to `on_frame`.
    pub(crate) fn run<F>(&mut self, max_ticks: u32, mut on_frame: F) -> Result<Outcome>
    where
        F: FnMut(&Self, Option<&Scene>) -> Result<()>,
    {
        while self.ticks < max_ticks {
            let scene = self.step();
            on_frame(self, scene.as_ref())?;

            if self.finished() {
                info!(ticks = self.ticks, "guardian reached the goal");
                return Ok(Outcome::GoalReached { ticks: self.ticks });
            }
        }

        Ok(Outcome::OutOfTicks { ticks: self.ticks })
    }

    /// Current contents of the room.
    pub(crate) fn snapshot(&self) -> RoomLayout {
        RoomLayout {
            guardian: Some(self.host.motion.live_tile()),
            player: self.host.player,
            ..self.host.layout.clone()
        }
    }

    /// Number of ticks simulated so far.
    pub(crate) fn ticks(&self) -> u32 {
        self.ticks
    }

    fn step(&mut self) -> Option<Scene> {
        self.ticks += 1;
        self.overlay.update(&self.host, &mut self.hint);
        let scene = self.overlay.render(&self.host, &mut self.hint);
        self.settle();
        self.act();
        scene
    }

    fn settle(&mut self) {
        if let GuardianMotion::Sliding { tile, orientation } = self.host.motion {
            let rest = advance(&self.host, tile, orientation.nearest_direction());
            self.host.motion = GuardianMotion::Stationary { tile: rest };
        }
    }

    fn act(&mut self) {
        let room = self.overlay.room();
        let (Some(bounds), Some(next)) = (query::bounds(room), query::route(room).next()) else {
            return;
        };

        let side = self.host.player.and_then(|player| bounds.side_of(player));
        if side == Some(next) {
            if let GuardianMotion::Stationary { tile } = self.host.motion {
                debug!(?next, ?tile, "player pushes the guardian");
                self.host.motion = GuardianMotion::Sliding {
                    tile,
                    orientation: next.orientation(),
                };
            }
        } else if let Some(target) = self.hint.tile {
            self.host.player = Some(target);
        }
    }

    fn finished(&self) -> bool {
        self.host.motion == GuardianMotion::Stationary { tile: self.goal }
    }
}
