//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board, and therefore the most moves a game can hold.
pub const MAX_BOARD_MOVES: u8 = 9;

/// Who occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Occupant {
    /// The human player (plays X, moves first).
    Player,
    /// The computer opponent (plays O).
    #[strum(serialize = "AI")]
    Ai,
}

impl Occupant {
    /// Mark drawn for this side.
    pub fn mark(self) -> char {
        match self {
            Occupant::Player => 'X',
            Occupant::Ai => 'O',
        }
    }

    /// Contribution of one cell to a line sum: +1 for the player, -1 for the AI.
    pub fn weight(self) -> i8 {
        match self {
            Occupant::Player => 1,
            Occupant::Ai => -1,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell claimed by one side.
    Occupied(Occupant),
}

impl Cell {
    /// Returns the occupant, if any.
    pub fn occupant(self) -> Option<Occupant> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(occupant) => Some(occupant),
        }
    }

    /// Whether the cell is empty.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Whether the cell holds the given side.
    pub fn is(self, occupant: Occupant) -> bool {
        self == Cell::Occupied(occupant)
    }

    /// Line-sum contribution of this cell.
    pub fn weight(self) -> i8 {
        self.occupant().map_or(0, Occupant::weight)
    }
}

/// Row-major 3x3 grid of cells.
pub type Grid = [[Cell; BOARD_SIZE]; BOARD_SIZE];
