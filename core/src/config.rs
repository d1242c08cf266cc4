//! User-facing overlay configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of moves the overlay projects ahead.
pub const MAX_STEPS: u32 = 64;

/// RGBA colour stored in the overlay configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HintColor {
    red: u8,
    green: u8,
    blue: u8,
    #[serde(default = "opaque")]
    alpha: u8,
}

const fn opaque() -> u8 {
    u8::MAX
}

impl HintColor {
    /// Pure red, the default colour of the current target.
    pub const RED: Self = Self::from_rgb(255, 0, 0);
    /// Orange, the default colour of the next target.
    pub const ORANGE: Self = Self::from_rgb(255, 200, 0);
    /// Cyan, the default colour of future targets.
    pub const CYAN: Self = Self::from_rgb(0, 255, 255);
    /// Green, used when the player already stands on the correct side.
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);

    /// Creates an opaque colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(red, green, blue, opaque())
    }

    /// Creates a colour from byte RGBA components.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the colour.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }
}

/// Settings read by the overlay every tick and frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Whether the overlay tracks the room at all.
    pub enabled: bool,
    /// Number of upcoming moves to display.
    pub steps: u32,
    /// Colour of the current target tile.
    pub target_color: HintColor,
    /// Colour of the target following the current one.
    pub next_target_color: HintColor,
    /// Colour of every later target.
    pub future_target_color: HintColor,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            steps: 1,
            target_color: HintColor::RED,
            next_target_color: HintColor::ORANGE,
            future_target_color: HintColor::CYAN,
        }
    }
}

impl GuideConfig {
    /// Checks that the configuration can drive the overlay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps > MAX_STEPS {
            return Err(ConfigError::TooManySteps {
                steps: self.steps,
                max: MAX_STEPS,
            });
        }
        Ok(())
    }

    /// Step count usable as a projection limit.
    #[must_use]
    pub fn max_targets(&self) -> usize {
        usize::try_from(self.steps.min(MAX_STEPS)).unwrap_or(0)
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// More steps were requested than the overlay projects.
    #[error("steps must not exceed {max} (received {steps})")]
    TooManySteps {
        /// Requested step count.
        steps: u32,
        /// Largest accepted step count.
        max: u32,
    },
}
