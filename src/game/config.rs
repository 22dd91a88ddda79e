//! Rule configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Half-moves without a capture or pawn move after which the game is drawn
pub const DEFAULT_FIFTY_MOVE_THRESHOLD: u32 = 100;

/// Tunable rules for a [`Game`](super::Game).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RulesConfig {
    /// The game is drawn once the halfmove clock reaches this value
    pub fifty_move_threshold: u32,
}

impl RulesConfig {
    #[must_use]
    pub fn with_fifty_move_threshold(mut self, threshold: u32) -> Self {
        self.fifty_move_threshold = threshold;
        self
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            fifty_move_threshold: DEFAULT_FIFTY_MOVE_THRESHOLD,
        }
    }
}
