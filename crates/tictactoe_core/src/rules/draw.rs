//! Draw detection logic for tic-tac-toe.

use super::super::MAX_BOARD_MOVES;

/// Whether every cell has been played.
///
/// A full board with no winner is a draw.
pub fn is_full(move_count: u8) -> bool {
    move_count >= MAX_BOARD_MOVES
}
