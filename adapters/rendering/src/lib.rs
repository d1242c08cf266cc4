#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for maze guide adapters.
//!
//! The guide never talks to the screen directly. It composes a [`Scene`] of
//! highlighted tiles and hands it to whatever [`RenderingBackend`] the host
//! provides, using the host's [`TileProjector`] to turn tiles into polygons.

use std::collections::HashSet;

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_guide_core::{Bounds, Direction, GuideConfig, HintColor, TargetProjection, Tile};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Outline of the tile a sliding guardian is heading to.
    pub const ORANGE: Self = Self::from_rgba_u8(255, 200, 0, 255);
    /// Target colour while the player already stands on the correct side.
    pub const GREEN: Self = Self::from_rgba_u8(0, 255, 0, 255);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }
}

impl From<HintColor> for Color {
    fn from(color: HintColor) -> Self {
        Self::from_rgba_u8(color.red(), color.green(), color.blue(), color.alpha())
    }
}

/// Screen-space outline of a single tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePolygon {
    /// Corners in drawing order.
    pub corners: [Vec2; 4],
}

impl TilePolygon {
    /// Creates an axis-aligned square polygon from its top-left corner.
    #[must_use]
    pub fn square(origin: Vec2, size: f32) -> Self {
        Self {
            corners: [
                origin,
                origin + Vec2::new(size, 0.0),
                origin + Vec2::new(size, size),
                origin + Vec2::new(0.0, size),
            ],
        }
    }

    /// Average of the corners.
    #[must_use]
    pub fn centroid(&self) -> Vec2 {
        self.corners.iter().copied().sum::<Vec2>() / 4.0
    }
}

/// Host capability converting world tiles into screen polygons.
pub trait TileProjector {
    /// Polygon covering `tile` on screen, or `None` when it is not visible.
    fn tile_polygon(&self, tile: Tile) -> Option<TilePolygon>;
}

/// Host sink showing a single highlighted tile, such as a hint arrow.
pub trait HintSink {
    /// Points the hint at `tile`.
    fn set_hint(&mut self, tile: Tile);

    /// Removes the hint.
    fn clear_hint(&mut self);
}

/// Host sink drawing tile outlines.
pub trait RenderingBackend {
    /// Outlines the polygon in the provided colour.
    fn outline(&mut self, polygon: &TilePolygon, color: Color) -> AnyResult<()>;
}

/// Purpose of a highlighted tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightRole {
    /// Tile a sliding guardian will stop on.
    GuardianDestination,
    /// Tile the guardian currently occupies.
    Guardian,
    /// Tile the player should walk to now.
    CurrentTarget,
    /// Tile for the move after the current one.
    NextTarget,
    /// Tile for any later move.
    FutureTarget,
}

/// Tile outlined in a given colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileHighlight {
    /// Highlighted tile.
    pub tile: Tile,
    /// Why the tile is highlighted.
    pub role: HighlightRole,
    /// Outline colour.
    pub color: Color,
}

/// Room state captured for a single frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintFrame {
    /// Bounds of the room.
    pub bounds: Bounds,
    /// Tile the guardian occupies.
    pub guardian: Tile,
    /// Destination of an ongoing guardian slide.
    pub guardian_destination: Option<Tile>,
    /// Move the guardian must make next, if a route exists.
    pub next_move: Option<Direction>,
    /// Tile the player stands on.
    pub player: Option<Tile>,
    /// Targets projected from the route.
    pub targets: TargetProjection,
}

/// Highlights and hint produced for a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Tiles to outline, in drawing order.
    pub highlights: Vec<TileHighlight>,
    /// Tile the hint sink should point at.
    pub hint: Option<Tile>,
}

impl Scene {
    /// Composes the highlights for a frame.
    ///
    /// Upcoming targets already drawn earlier in the frame are skipped, so the
    /// more urgent colour wins.
    #[must_use]
    pub fn compose(frame: &HintFrame, config: &GuideConfig) -> Self {
        let mut scene = Self::default();

        if let Some(destination) = frame.guardian_destination {
            scene.push(destination, HighlightRole::GuardianDestination, Color::ORANGE);
        }

        let Some(next_move) = frame.next_move else {
            return scene;
        };

        let on_correct_side = frame
            .player
            .and_then(|player| frame.bounds.side_of(player))
            .is_some_and(|side| side == next_move);
        let target_color = if on_correct_side {
            Color::GREEN
        } else {
            Color::from(config.target_color)
        };

        scene.push(frame.guardian, HighlightRole::Guardian, target_color);

        let Some(current) = frame.targets.current else {
            return scene;
        };

        scene.push(current, HighlightRole::CurrentTarget, target_color);
        scene.hint = Some(current);

        let mut drawn = HashSet::from([current]);
        for (index, target) in frame.targets.upcoming.iter().enumerate() {
            let Some(tile) = *target else {
                continue;
            };
            if !drawn.insert(tile) {
                continue;
            }

            if index == 0 {
                scene.push(
                    tile,
                    HighlightRole::NextTarget,
                    Color::from(config.next_target_color),
                );
            } else {
                scene.push(
                    tile,
                    HighlightRole::FutureTarget,
                    Color::from(config.future_target_color),
                );
            }
        }

        scene
    }

    fn push(&mut self, tile: Tile, role: HighlightRole, color: Color) {
        self.highlights.push(TileHighlight { tile, role, color });
    }

    /// Highlights playing the provided role.
    pub fn with_role(&self, role: HighlightRole) -> impl Iterator<Item = &TileHighlight> {
        self.highlights
            .iter()
            .filter(move |highlight| highlight.role == role)
    }

    /// Outlines every highlight the projector can place on screen.
    ///
    /// Returns the number of outlines drawn.
    pub fn draw<P, R>(&self, projector: &P, renderer: &mut R) -> AnyResult<usize>
    where
        P: TileProjector + ?Sized,
        R: RenderingBackend + ?Sized,
    {
        let mut drawn = 0;
        for highlight in &self.highlights {
            let Some(polygon) = projector.tile_polygon(highlight.tile) else {
                continue;
            };
            renderer.outline(&polygon, highlight.color)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}
