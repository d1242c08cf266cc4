#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-facing lifecycle of the maze guide overlay.
//!
//! The host forwards its notifications through [`Overlay::notify`], calls
//! [`Overlay::update`] once per simulation tick and [`Overlay::render`] once per
//! frame. Every call runs to completion on the caller's thread, so a frame
//! never observes a partially rebuilt route.

use maze_guide_core::{
    ActorId, Command, Event, GuardianMotion, GuideConfig, TargetProjection, Tile, Traversal,
};
use maze_guide_rendering::{HintFrame, HintSink, Scene};
use maze_guide_system_lookahead::Lookahead;
use maze_guide_system_route_planning::{effective_position, Exploration, RoutePlanner};
use maze_guide_world::{self as world, query, Room, TrackingPhase};
use tracing::{debug, trace};

/// Notifications delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// A maze wall appeared.
    WallSpawned {
        /// Tile the wall occupies.
        tile: Tile,
    },
    /// The goal marker appeared.
    GoalSpawned {
        /// Tile the marker occupies.
        tile: Tile,
    },
    /// The guardian appeared.
    GuardianSpawned {
        /// Host identifier of the guardian.
        actor: ActorId,
    },
    /// An actor that may be the guardian disappeared.
    GuardianDespawned {
        /// Host identifier of the actor.
        actor: ActorId,
    },
    /// The host started loading a new scene.
    SceneLoading,
}

/// Read-only capabilities the host exposes to the overlay.
pub trait Host: Traversal {
    /// Reports whether the player is inside the maze room.
    fn in_maze(&self) -> bool;

    /// Current motion of the provided actor, or `None` when it is not visible.
    fn guardian_motion(&self, guardian: ActorId) -> Option<GuardianMotion>;

    /// Tile the player stands on.
    fn player_tile(&self) -> Option<Tile>;
}

/// Guide overlay owning the room state and its systems.
#[derive(Debug)]
pub struct Overlay {
    room: Room,
    planner: RoutePlanner,
    config: GuideConfig,
    destination: Option<Tile>,
    journal: Vec<Event>,
}

impl Overlay {
    /// Creates an overlay with the provided configuration.
    #[must_use]
    pub fn new(config: GuideConfig) -> Self {
        Self {
            room: Room::new(),
            planner: RoutePlanner::default(),
            config,
            destination: None,
            journal: Vec::new(),
        }
    }

    /// Selects how far the route search explores.
    #[must_use]
    pub fn with_exploration(mut self, exploration: Exploration) -> Self {
        self.planner = RoutePlanner::new(exploration);
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    /// Replaces the configuration, taking effect on the next tick.
    pub fn set_config(&mut self, config: GuideConfig) {
        self.config = config;
    }

    /// Room state driven by the overlay.
    #[must_use]
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Events produced by the most recent `notify`, `update` or `reset` call.
    #[must_use]
    pub fn journal(&self) -> &[Event] {
        &self.journal
    }

    /// Applies a host notification to the room.
    pub fn notify<S>(&mut self, event: HostEvent, hints: &mut S)
    where
        S: HintSink + ?Sized,
    {
        let command = match event {
            HostEvent::WallSpawned { tile } => Command::RecordWall { tile },
            HostEvent::GoalSpawned { tile } => Command::RecordGoal { tile },
            HostEvent::GuardianSpawned { actor } => Command::TrackGuardian { guardian: actor },
            HostEvent::GuardianDespawned { actor } => {
                Command::ReleaseGuardian { guardian: actor }
            }
            HostEvent::SceneLoading => Command::ResetRoom,
        };

        trace!(?event, "host notification");
        self.journal.clear();
        self.apply(command, hints);
    }

    /// Clears every observed wall, the goal and all cached geometry.
    pub fn reset<S>(&mut self, hints: &mut S)
    where
        S: HintSink + ?Sized,
    {
        self.journal.clear();
        self.destination = None;
        self.apply(Command::ResetRoom, hints);
    }

    /// Advances the overlay by one simulation tick.
    ///
    /// Re-planning triggered by the tick completes before this returns.
    pub fn update<H, S>(&mut self, host: &H, hints: &mut S)
    where
        H: Host + ?Sized,
        S: HintSink + ?Sized,
    {
        self.journal.clear();

        if !self.config.enabled || !host.in_maze() {
            if query::phase(&self.room) != TrackingPhase::NoActor {
                debug!(enabled = self.config.enabled, "overlay inactive");
            }
            self.destination = None;
            self.apply(Command::Deactivate, hints);
            return;
        }

        let effective = query::guardian(&self.room)
            .and_then(|guardian| host.guardian_motion(guardian))
            .map(|motion| effective_position(motion, host));
        self.destination = effective.and_then(|position| position.destination);

        let mut events = Vec::new();
        world::apply(
            &mut self.room,
            Command::Tick {
                guardian: effective.map(|position| position.tile),
            },
            &mut events,
        );
        self.process(events, host, hints);
    }

    /// Composes the highlights for the current frame and points the hint
    /// sink at the current target.
    ///
    /// Returns `None` while there is nothing to draw: the overlay is disabled,
    /// the room has no bounds yet, or the guardian is not visible.
    pub fn render<H, S>(&self, host: &H, hints: &mut S) -> Option<Scene>
    where
        H: Host + ?Sized,
        S: HintSink + ?Sized,
    {
        if !self.config.enabled {
            return None;
        }

        let bounds = query::bounds(&self.room)?;
        let motion = query::guardian(&self.room)
            .and_then(|guardian| host.guardian_motion(guardian))?;
        let route = query::route(&self.room);
        let player = host.player_tile();

        let targets = match player {
            Some(player) => {
                Lookahead::new(self.config.max_targets()).project(route, &bounds, player)
            }
            None => TargetProjection::default(),
        };

        let frame = HintFrame {
            bounds,
            guardian: motion.live_tile(),
            guardian_destination: self.destination,
            next_move: route.next(),
            player,
            targets,
        };
        let scene = Scene::compose(&frame, &self.config);
        if let Some(tile) = scene.hint {
            hints.set_hint(tile);
        }
        Some(scene)
    }

    fn apply<S>(&mut self, command: Command, hints: &mut S)
    where
        S: HintSink + ?Sized,
    {
        let mut events = Vec::new();
        world::apply(&mut self.room, command, &mut events);
        self.record(events, hints);
    }

    fn process<H, S>(&mut self, pending_events: Vec<Event>, host: &H, hints: &mut S)
    where
        H: Host + ?Sized,
        S: HintSink + ?Sized,
    {
        let mut events = pending_events;

        loop {
            if events.is_empty() {
                break;
            }

            let mut commands = Vec::new();
            self.planner.handle(&events, host, &mut commands);
            self.record(std::mem::take(&mut events), hints);

            if commands.is_empty() {
                break;
            }

            for command in commands {
                world::apply(&mut self.room, command, &mut events);
            }
        }
    }

    fn record<S>(&mut self, events: Vec<Event>, hints: &mut S)
    where
        S: HintSink + ?Sized,
    {
        if events.iter().any(|event| matches!(event, Event::HintCleared)) {
            hints.clear_hint();
        }
        self.journal.extend(events);
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(GuideConfig::default())
    }
}
