//! Board state: grid occupancy, move counter and turn flag.

use super::action::MoveError;
use super::outcome::GameOutcome;
use super::position::Position;
use super::rules;
use super::types::{Cell, Grid, MAX_BOARD_MOVES, Occupant};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// The 3x3 grid plus the counters that travel with it.
///
/// Invariants:
/// - `move_count` equals the number of occupied cells
/// - `player_turn` is never true once the outcome is terminal
///
/// [`occupy`](Self::occupy) is the only way a cell changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    grid: Grid,
    move_count: u8,
    player_turn: bool,
}

impl BoardState {
    /// Creates a fresh board: all cells empty, no moves, player to act.
    pub fn new() -> Self {
        Self {
            grid: Grid::default(),
            move_count: 0,
            player_turn: true,
        }
    }

    /// Builds a board from explicit rows.
    ///
    /// The move count is derived from the occupied cells, and the turn flag
    /// is set only while the position is still in progress.
    pub fn from_grid(grid: Grid) -> Self {
        let move_count = grid.iter().flatten().filter(|cell| !cell.is_empty()).count() as u8;
        let mut board = Self {
            grid,
            move_count,
            player_turn: false,
        };
        board.player_turn = !board.evaluate_outcome().is_terminal();
        board
    }

    /// Clears every cell, zeroes the move count and hands the turn to the player.
    #[instrument(skip(self), fields(move_count = self.move_count))]
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("Board reset");
    }

    /// Returns the cell at `pos`.
    pub fn cell(&self, pos: Position) -> Cell {
        self.grid[pos.row()][pos.col()]
    }

    /// Who occupies `pos`, if anyone.
    pub fn occupant(&self, pos: Position) -> Option<Occupant> {
        self.cell(pos).occupant()
    }

    /// Whether `pos` is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.cell(pos).is_empty()
    }

    /// Occupies an empty cell and bumps the move count.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::AlreadyFilled`] and leaves the board untouched
    /// if the cell is taken.
    #[instrument(skip(self), fields(move_count = self.move_count))]
    pub fn occupy(&mut self, pos: Position, occupant: Occupant) -> Result<(), MoveError> {
        if !self.is_empty(pos) {
            warn!(position = %pos, "Cell already filled");
            return Err(MoveError::AlreadyFilled(pos));
        }

        self.grid[pos.row()][pos.col()] = Cell::Occupied(occupant);
        self.move_count += 1;
        debug_assert!(self.move_count <= MAX_BOARD_MOVES);

        debug!(position = %pos, %occupant, move_count = self.move_count, "Cell occupied");
        Ok(())
    }

    /// Evaluates rows, columns and both diagonals, then the draw condition.
    pub fn evaluate_outcome(&self) -> GameOutcome {
        rules::evaluate(&self.grid, self.move_count)
    }

    /// Whether a win or draw has been reached.
    pub fn is_game_over(&self) -> bool {
        self.evaluate_outcome().is_terminal()
    }

    /// Whether all nine cells are occupied.
    pub fn is_full(&self) -> bool {
        rules::is_full(self.move_count)
    }

    /// Number of successful occupations since the last reset.
    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    /// Whether the human may act.
    pub fn is_player_turn(&self) -> bool {
        self.player_turn
    }

    pub(crate) fn set_player_turn(&mut self, player_turn: bool) {
        self.player_turn = player_turn;
    }

    /// Returns the raw grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let symbol = match cell.occupant() {
                    Some(occupant) => occupant.mark().to_string(),
                    None => (row * 3 + col + 1).to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}
