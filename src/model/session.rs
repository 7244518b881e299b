use serde::{Deserialize, Serialize};

use crate::model::activity::Activity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Solo,
    Multiplayer,
}

/// Number of participants in multiplayer mode, always within
/// [`PlayerCount::MIN`, `PlayerCount::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCount(u8);

impl PlayerCount {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 = (self.0 + 1).min(Self::MAX);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1).max(Self::MIN);
    }

    pub fn at_min(self) -> bool {
        self.0 <= Self::MIN
    }

    pub fn at_max(self) -> bool {
        self.0 >= Self::MAX
    }
}

impl Default for PlayerCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// Read-only view of the interaction state handed to the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionSnapshot {
    pub current: Option<Activity>,
    pub busy: bool,
    pub retry_count: u8,
    pub mode: GameMode,
    pub players: PlayerCount,
    pub copied: bool,
}
