//! Editing tools.

use crate::level::PlatformKind;
use serde::{Deserialize, Serialize};

/// The active tool decides what a tap or drag on the canvas does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "tool", content = "kind", rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Select,
    Pan,
    /// Place platforms of the given kind.
    Platform(PlatformKind),
    Coin,
    PlayerStart,
    Goal,
}

impl Tool {
    /// Whether a tap with this tool puts an entity into the level.
    pub fn places(&self) -> bool {
        matches!(
            self,
            Tool::Platform(_) | Tool::Coin | Tool::PlayerStart | Tool::Goal
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Pan => "pan",
            Tool::Platform(_) => "platform",
            Tool::Coin => "coin",
            Tool::PlayerStart => "player start",
            Tool::Goal => "goal",
        }
    }
}
