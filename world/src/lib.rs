#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative room state for the maze guide.
//!
//! The room owns every piece of mutable state the guide relies on: observed
//! walls, the goal marker, the tracked guardian, the bounds derived from the
//! walls and the cached route. It is only mutated through [`apply`], which
//! reports the resulting transitions as [`Event`] values.

use maze_guide_core::{ActorId, Bounds, Command, Event, Route, RouteStamp, Tile};
use tracing::debug;

/// Re-planning state of the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackingPhase {
    /// No guardian is tracked, the tracked guardian could not be resolved on
    /// the last tick, or tracking restarted after a reset.
    NoActor,
    /// The cached route matches the guardian's last recorded position.
    Tracking,
    /// A route was requested and the room waits for it to be installed.
    Replanning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Layout {
    bounds: Bounds,
    walls: usize,
}

/// Represents the authoritative maze room state.
#[derive(Debug)]
pub struct Room {
    walls: Vec<Tile>,
    goal: Option<Tile>,
    guardian: Option<ActorId>,
    layout: Option<Layout>,
    position: Option<Tile>,
    route: Route,
    stamp: RouteStamp,
    phase: TrackingPhase,
}

impl Room {
    /// Creates an empty room awaiting observations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            walls: Vec::new(),
            goal: None,
            guardian: None,
            layout: None,
            position: None,
            route: Route::new(),
            stamp: RouteStamp::default(),
            phase: TrackingPhase::NoActor,
        }
    }

    fn clear_route(&mut self, out_events: &mut Vec<Event>) {
        if self.route.is_empty() {
            return;
        }

        self.route.clear();
        self.stamp = self.stamp.next();
        out_events.push(Event::HintCleared);
    }

    fn discard_layout(&mut self, out_events: &mut Vec<Event>) {
        self.layout = None;
        self.position = None;
        self.clear_route(out_events);
    }

    fn refresh_layout(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self
            .layout
            .is_some_and(|layout| layout.walls == self.walls.len())
        {
            return false;
        }

        debug_assert!(!self.walls.is_empty(), "bounds requested without walls");
        let Ok(bounds) = Bounds::enclosing(self.walls.iter().copied()) else {
            return true;
        };

        let walls = self.walls.len();
        debug!(?bounds, walls, "room layout changed");
        self.layout = Some(Layout { bounds, walls });
        self.position = None;
        self.clear_route(out_events);
        out_events.push(Event::LayoutChanged { bounds, walls });
        out_events.push(Event::HintCleared);
        true
    }

    fn track(&mut self, position: Option<Tile>, out_events: &mut Vec<Event>) {
        if self.phase == TrackingPhase::NoActor {
            self.phase = TrackingPhase::Tracking;
        }

        let Some(current) = position else {
            self.position = None;
            self.phase = TrackingPhase::NoActor;
            self.clear_route(out_events);
            return;
        };

        if self.position == Some(current) {
            return;
        }

        debug!(from = ?self.position, to = ?current, "updating guardian location");
        out_events.push(Event::GuardianMoved {
            from: self.position,
            to: current,
        });
        self.position = Some(current);

        match self.goal {
            Some(goal) if goal == current => {
                self.phase = TrackingPhase::Tracking;
                self.clear_route(out_events);
                out_events.push(Event::GoalReached { tile: goal });
                out_events.push(Event::HintCleared);
            }
            Some(goal) => {
                debug!("rebuilding moves due to guardian move");
                self.phase = TrackingPhase::Replanning;
                out_events.push(Event::RouteRequested {
                    from: current,
                    goal,
                });
            }
            None => {
                self.phase = TrackingPhase::Tracking;
                self.clear_route(out_events);
            }
        }
    }

    fn install_route(&mut self, origin: Tile, route: Route, out_events: &mut Vec<Event>) {
        if self.phase != TrackingPhase::Replanning || self.position != Some(origin) {
            debug!(?origin, "discarding stale route");
            out_events.push(Event::RouteDiscarded { origin });
            return;
        }

        let was_visible = !self.route.is_empty();
        self.route = route;
        self.stamp = self.stamp.next();
        self.phase = TrackingPhase::Tracking;
        out_events.push(Event::RouteUpdated {
            stamp: self.stamp,
            moves: self.route.len(),
        });
        if self.route.is_empty() && was_visible {
            out_events.push(Event::HintCleared);
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the room, mutating state deterministically.
pub fn apply(room: &mut Room, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RecordWall { tile } => {
            room.walls.push(tile);
        }
        Command::RecordGoal { tile } => {
            match room.goal {
                Some(goal) if goal == tile => return,
                Some(_) => {
                    debug!(?tile, "goal moved, discarding observed walls");
                    room.walls.clear();
                    room.discard_layout(out_events);
                    out_events.push(Event::RoomReset);
                }
                None => {
                    // Forget the position so the next tick plans towards the goal.
                    room.position = None;
                    room.clear_route(out_events);
                }
            }
            room.goal = Some(tile);
        }
        Command::TrackGuardian { guardian } => {
            room.guardian = Some(guardian);
            if room.phase == TrackingPhase::NoActor {
                room.phase = TrackingPhase::Tracking;
            }
        }
        Command::ReleaseGuardian { guardian } => {
            if room.guardian != Some(guardian) {
                return;
            }

            room.guardian = None;
            room.position = None;
            room.phase = TrackingPhase::NoActor;
            room.clear_route(out_events);
        }
        Command::ResetRoom => {
            room.walls.clear();
            room.goal = None;
            room.guardian = None;
            room.phase = TrackingPhase::NoActor;
            room.discard_layout(out_events);
            out_events.push(Event::RoomReset);
        }
        Command::Deactivate => {
            if room.layout.is_none() && room.route.is_empty() {
                room.phase = TrackingPhase::NoActor;
                return;
            }

            room.phase = TrackingPhase::NoActor;
            room.discard_layout(out_events);
        }
        Command::Tick { guardian } => {
            if room.walls.is_empty() {
                return;
            }

            if room.refresh_layout(out_events) {
                return;
            }

            if room.guardian.is_some() {
                room.track(guardian, out_events);
            } else {
                room.position = None;
                room.clear_route(out_events);
            }
        }
        Command::SetRoute { origin, route } => {
            room.install_route(origin, route, out_events);
        }
    }
}

/// Query functions that provide read-only access to the room state.
pub mod query {
    use super::{Room, TrackingPhase};
    use maze_guide_core::{ActorId, Bounds, Route, RouteStamp, Tile};

    /// Walls observed since the last reset, in observation order.
    #[must_use]
    pub fn walls(room: &Room) -> &[Tile] {
        &room.walls
    }

    /// Goal tile, once its marker was observed.
    #[must_use]
    pub fn goal(room: &Room) -> Option<Tile> {
        room.goal
    }

    /// Identifier of the tracked guardian.
    #[must_use]
    pub fn guardian(room: &Room) -> Option<ActorId> {
        room.guardian
    }

    /// Bounds derived from the observed walls, once computed.
    #[must_use]
    pub fn bounds(room: &Room) -> Option<Bounds> {
        room.layout.map(|layout| layout.bounds)
    }

    /// Last recorded effective position of the guardian.
    #[must_use]
    pub fn guardian_position(room: &Room) -> Option<Tile> {
        room.position
    }

    /// Cached route from the guardian to the goal.
    #[must_use]
    pub fn route(room: &Room) -> &Route {
        &room.route
    }

    /// Stamp of the cached route, bumped whenever the route changes.
    #[must_use]
    pub fn route_stamp(room: &Room) -> RouteStamp {
        room.stamp
    }

    /// Current re-planning phase.
    #[must_use]
    pub fn phase(room: &Room) -> TrackingPhase {
        room.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_guide_core::Direction;

    const GUARDIAN: ActorId = ActorId::new(6777);

    fn tile(x: i32, y: i32) -> Tile {
        Tile::new(x, y, 0)
    }

    fn run(room: &mut Room, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(room, command, &mut events);
        events
    }

    fn prepared_room() -> Room {
        let mut room = Room::new();
        for wall in [tile(0, 0), tile(6, 0), tile(0, 6), tile(6, 6)] {
            let _ = run(&mut room, Command::RecordWall { tile: wall });
        }
        let _ = run(&mut room, Command::RecordGoal { tile: tile(3, 3) });
        let _ = run(&mut room, Command::TrackGuardian { guardian: GUARDIAN });
        let events = run(&mut room, Command::Tick { guardian: None });
        assert!(matches!(events[0], Event::LayoutChanged { walls: 4, .. }));
        room
    }

    #[test]
    fn tick_without_walls_does_nothing() {
        let mut room = Room::new();
        let _ = run(&mut room, Command::TrackGuardian { guardian: GUARDIAN });

        let events = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );

        assert!(events.is_empty());
        assert_eq!(query::bounds(&room), None);
    }

    #[test]
    fn first_tick_derives_bounds_before_planning() {
        let room = prepared_room();
        let bounds = query::bounds(&room).expect("bounds computed");

        assert_eq!(bounds, Bounds::from_corners(tile(0, 0), tile(6, 6)));
        assert_eq!(query::guardian_position(&room), None);
    }

    #[test]
    fn guardian_move_requests_route() {
        let mut room = prepared_room();

        let events = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );

        assert_eq!(
            events,
            vec![
                Event::GuardianMoved {
                    from: None,
                    to: tile(1, 1),
                },
                Event::RouteRequested {
                    from: tile(1, 1),
                    goal: tile(3, 3),
                },
            ]
        );
        assert_eq!(query::phase(&room), TrackingPhase::Replanning);
    }

    #[test]
    fn installed_route_returns_to_tracking() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );

        let route = Route::from_moves([Direction::North, Direction::East]);
        let events = run(
            &mut room,
            Command::SetRoute {
                origin: tile(1, 1),
                route: route.clone(),
            },
        );

        assert_eq!(
            events,
            vec![Event::RouteUpdated {
                stamp: RouteStamp::new(1),
                moves: 2,
            }]
        );
        assert_eq!(query::route(&room), &route);
        assert_eq!(query::phase(&room), TrackingPhase::Tracking);
    }

    #[test]
    fn unchanged_position_keeps_route_stamp() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        let _ = run(
            &mut room,
            Command::SetRoute {
                origin: tile(1, 1),
                route: Route::from_moves([Direction::East]),
            },
        );
        let stamp = query::route_stamp(&room);

        let events = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );

        assert!(events.is_empty());
        assert_eq!(query::route_stamp(&room), stamp);
        assert_eq!(query::phase(&room), TrackingPhase::Tracking);
    }

    #[test]
    fn stale_route_is_discarded() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );

        let events = run(
            &mut room,
            Command::SetRoute {
                origin: tile(2, 2),
                route: Route::from_moves([Direction::East]),
            },
        );

        assert_eq!(events, vec![Event::RouteDiscarded { origin: tile(2, 2) }]);
        assert!(query::route(&room).is_empty());
        assert_eq!(query::phase(&room), TrackingPhase::Replanning);
    }

    #[test]
    fn reaching_goal_clears_route_and_hint() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 3)),
            },
        );
        let _ = run(
            &mut room,
            Command::SetRoute {
                origin: tile(1, 3),
                route: Route::from_moves([Direction::East]),
            },
        );

        let events = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(3, 3)),
            },
        );

        assert!(events.contains(&Event::GoalReached { tile: tile(3, 3) }));
        assert!(events.contains(&Event::HintCleared));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::RouteRequested { .. })));
        assert!(query::route(&room).is_empty());
    }

    #[test]
    fn new_wall_invalidates_layout() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        let _ = run(&mut room, Command::RecordWall { tile: tile(8, 2) });

        let events = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );

        assert_eq!(
            events[0],
            Event::LayoutChanged {
                bounds: Bounds::from_corners(tile(0, 0), tile(8, 6)),
                walls: 5,
            }
        );
        assert_eq!(query::guardian_position(&room), None);
    }

    #[test]
    fn releasing_other_actor_keeps_tracking() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::ReleaseGuardian {
                guardian: ActorId::new(1),
            },
        );
        assert_eq!(query::guardian(&room), Some(GUARDIAN));

        let _ = run(&mut room, Command::ReleaseGuardian { guardian: GUARDIAN });
        assert_eq!(query::guardian(&room), None);
        assert_eq!(query::phase(&room), TrackingPhase::NoActor);
    }

    #[test]
    fn reset_discards_everything() {
        let mut room = prepared_room();
        let events = run(&mut room, Command::ResetRoom);

        assert!(events.contains(&Event::RoomReset));
        assert!(query::walls(&room).is_empty());
        assert_eq!(query::goal(&room), None);
        assert_eq!(query::bounds(&room), None);
        assert_eq!(query::phase(&room), TrackingPhase::NoActor);
    }

    #[test]
    fn moved_goal_discards_walls() {
        let mut room = prepared_room();
        let events = run(&mut room, Command::RecordGoal { tile: tile(4, 4) });

        assert!(events.contains(&Event::RoomReset));
        assert!(query::walls(&room).is_empty());
        assert_eq!(query::goal(&room), Some(tile(4, 4)));
    }

    #[test]
    fn deactivate_restarts_tracking_on_next_tick() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        let _ = run(&mut room, Command::Deactivate);
        assert_eq!(query::phase(&room), TrackingPhase::NoActor);
        assert_eq!(query::bounds(&room), None);

        let relayout = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        assert!(matches!(relayout[0], Event::LayoutChanged { .. }));

        let replan = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        assert!(replan.contains(&Event::RouteRequested {
            from: tile(1, 1),
            goal: tile(3, 3),
        }));
    }

    #[test]
    fn lost_guardian_clears_route() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        let _ = run(
            &mut room,
            Command::SetRoute {
                origin: tile(1, 1),
                route: Route::from_moves([Direction::East]),
            },
        );

        let events = run(&mut room, Command::Tick { guardian: None });

        assert_eq!(events, vec![Event::HintCleared]);
        assert!(query::route(&room).is_empty());
        assert_eq!(query::phase(&room), TrackingPhase::NoActor);

        let found = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        assert!(found.contains(&Event::RouteRequested {
            from: tile(1, 1),
            goal: tile(3, 3),
        }));
        assert_eq!(query::phase(&room), TrackingPhase::Replanning);
    }

    #[test]
    fn goal_observed_after_tracking_started_requests_route() {
        let mut room = Room::new();
        for wall in [tile(0, 0), tile(6, 0), tile(0, 6), tile(6, 6)] {
            let _ = run(&mut room, Command::RecordWall { tile: wall });
        }
        let _ = run(&mut room, Command::TrackGuardian { guardian: GUARDIAN });
        for _ in 0..2 {
            let _ = run(
                &mut room,
                Command::Tick {
                    guardian: Some(tile(1, 1)),
                },
            );
        }
        assert_eq!(query::guardian_position(&room), Some(tile(1, 1)));

        let events = run(&mut room, Command::RecordGoal { tile: tile(3, 3) });
        assert!(!events.contains(&Event::RoomReset));
        assert_eq!(query::walls(&room).len(), 4);

        let events = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        assert!(events.contains(&Event::RouteRequested {
            from: tile(1, 1),
            goal: tile(3, 3),
        }));
        assert_eq!(query::phase(&room), TrackingPhase::Replanning);
    }

    #[test]
    fn repeated_goal_observation_keeps_route() {
        let mut room = prepared_room();
        let _ = run(
            &mut room,
            Command::Tick {
                guardian: Some(tile(1, 1)),
            },
        );
        let _ = run(
            &mut room,
            Command::SetRoute {
                origin: tile(1, 1),
                route: Route::from_moves([Direction::East]),
            },
        );

        let events = run(&mut room, Command::RecordGoal { tile: tile(3, 3) });

        assert!(events.is_empty());
        assert_eq!(query::route(&room).len(), 1);
        assert_eq!(query::guardian_position(&room), Some(tile(1, 1)));
    }
}
