//! Game outcome and the status messages shown to the player.

use super::types::Occupant;
use serde::{Deserialize, Serialize};

/// Result of evaluating the board after an occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameOutcome {
    /// No line completed and cells remain.
    #[default]
    InProgress,
    /// The player completed a line.
    PlayerWin,
    /// The AI completed a line.
    AiWin,
    /// Board full with no line completed.
    Draw,
}

impl GameOutcome {
    /// Outcome for a completed line owned by `winner`.
    pub fn won_by(winner: Occupant) -> Self {
        match winner {
            Occupant::Player => GameOutcome::PlayerWin,
            Occupant::Ai => GameOutcome::AiWin,
        }
    }

    /// Returns the winner if there is one.
    pub fn winner(self) -> Option<Occupant> {
        match self {
            GameOutcome::PlayerWin => Some(Occupant::Player),
            GameOutcome::AiWin => Some(Occupant::Ai),
            GameOutcome::InProgress | GameOutcome::Draw => None,
        }
    }

    /// Whether the game has ended.
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::PlayerWin => write!(f, "Player wins"),
            GameOutcome::AiWin => write!(f, "AI wins"),
            GameOutcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Status line handed to the presentation layer.
///
/// The display text is the exact message the frontend shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Status {
    /// The player may pick a cell.
    #[display("Player Turn")]
    PlayerTurn,
    /// The AI move is pending.
    #[display("AI Turn")]
    AiTurn,
    /// The player picked an occupied cell.
    #[display("Box already filled")]
    BoxAlreadyFilled,
    /// Terminal: player won.
    #[display("Player Won")]
    PlayerWon,
    /// Terminal: AI won.
    #[display("AI Won")]
    AiWon,
    /// Terminal: draw.
    #[display("DRAW")]
    Draw,
}

impl Status {
    /// Terminal status for an outcome; `None` while the game is in progress.
    pub fn for_outcome(outcome: GameOutcome) -> Option<Self> {
        match outcome {
            GameOutcome::InProgress => None,
            GameOutcome::PlayerWin => Some(Status::PlayerWon),
            GameOutcome::AiWin => Some(Status::AiWon),
            GameOutcome::Draw => Some(Status::Draw),
        }
    }
}
