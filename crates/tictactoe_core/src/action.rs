//! Moves and the errors raised when one cannot be applied.

use super::{Occupant, Position};
use serde::{Deserialize, Serialize};

/// A side placing its mark at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The side making the move.
    pub occupant: Occupant,
    /// Where the mark goes.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(occupant: Occupant, position: Position) -> Self {
        Self { occupant, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.occupant, self.position.label())
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell is already occupied.
    #[display("Cell {} is already filled", _0)]
    AlreadyFilled(Position),

    /// The flat index does not name a cell.
    #[display("Index {} is outside the board (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// Input arrived while the player may not act.
    #[display("It is not the player's turn")]
    NotPlayersTurn,

    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}
