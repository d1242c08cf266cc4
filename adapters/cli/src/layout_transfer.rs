#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_guide_core::Tile;
use serde::{Deserialize, Serialize};

use crate::layout::RoomLayout;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';
/// Largest accepted column or row count.
const MAX_DIMENSION: u32 = 1024;

impl RoomLayout {
    /// Encodes the layout into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableLayout {
            walls: self.walls.clone(),
            goal: self.goal,
            guardian: self.guardian,
            player: self.player,
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a layout from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableLayout =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let layout = Self {
            columns,
            rows,
            walls: decoded.walls,
            goal: decoded.goal,
            guardian: decoded.guardian,
            player: decoded.player,
        };

        let markers = [layout.goal, layout.guardian, layout.player];
        let outside = layout
            .walls
            .iter()
            .copied()
            .chain(markers.into_iter().flatten())
            .find(|&tile| !layout.contains(tile));
        if let Some(tile) = outside {
            return Err(LayoutTransferError::TileOutOfBounds(tile));
        }

        Ok(layout)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    walls: Vec<Tile>,
    goal: Option<Tile>,
    guardian: Option<Tile>,
    player: Option<Tile>,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded layout.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
    /// The payload placed a tile outside the encoded grid.
    TileOutOfBounds(Tile),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process layout payload: {error}")
            }
            Self::TileOutOfBounds(tile) => {
                write!(
                    f,
                    "tile ({}, {}) lies outside the layout grid",
                    tile.x(),
                    tile.y()
                )
            }
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if !(1..=MAX_DIMENSION).contains(&columns) || !(1..=MAX_DIMENSION).contains(&rows) {
        return Err(LayoutTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RoomLayout {
        RoomLayout::parse("#####\n#G.F#\n#..P#\n#####").expect("layout parses")
    }

    #[test]
    fn encoded_layout_carries_header_and_dimensions() {
        let encoded = sample().encode().expect("layout encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:5x4:")));

        let decoded = RoomLayout::decode(&encoded).expect("layout decodes");
        assert_eq!(decoded, sample());
    }

    #[test]
    fn rejects_foreign_prefix_and_version() {
        assert!(matches!(
            RoomLayout::decode("tower:v1:5x4:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "tower"
        ));
        assert!(matches!(
            RoomLayout::decode("maze:v2:5x4:e30"),
            Err(LayoutTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
    }

    #[test]
    fn rejects_missing_segments() {
        assert!(matches!(
            RoomLayout::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
        assert!(matches!(
            RoomLayout::decode("maze:v1:5x4"),
            Err(LayoutTransferError::MissingPayload)
        ));
        assert!(matches!(
            RoomLayout::decode("maze:v1:0x4:e30"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn rejects_oversized_grids() {
        let payload = STANDARD_NO_PAD.encode(r#"{"walls":[],"goal":null,"guardian":null,"player":null}"#);

        for dimensions in ["70000x70000", "60000x60000", "1025x4", "4x1025"] {
            let encoded = format!("{SNAPSHOT_HEADER}:{dimensions}:{payload}");
            assert!(
                matches!(
                    RoomLayout::decode(&encoded),
                    Err(LayoutTransferError::InvalidDimensions(value)) if value == dimensions
                ),
                "{dimensions} was accepted"
            );
        }

        let encoded = format!("{SNAPSHOT_HEADER}:{MAX_DIMENSION}x2:{payload}");
        let layout = RoomLayout::decode(&encoded).expect("largest grid decodes");
        assert_eq!(layout.to_ascii().len(), 2 * 1024 + 1);
    }

    #[test]
    fn glyphs_of_overflowing_grid_are_empty() {
        let layout = RoomLayout {
            columns: 70_000,
            rows: 70_000,
            walls: Vec::new(),
            goal: None,
            guardian: None,
            player: None,
        };

        assert!(layout.glyphs().is_empty());
    }

    #[test]
    fn rejects_tiles_outside_grid() {
        let mut layout = sample();
        layout.walls.push(Tile::new(9, 0, 0));
        let encoded = layout.encode().expect("layout encodes");

        assert!(matches!(
            RoomLayout::decode(&encoded),
            Err(LayoutTransferError::TileOutOfBounds(tile)) if tile == Tile::new(9, 0, 0)
        ));
    }
}
