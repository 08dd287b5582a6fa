//! Game rules for tic-tac-toe.
//!
//! Pure functions over a grid and move count. Storage lives in
//! [`BoardState`](crate::BoardState), which delegates here.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, Line, line_sum, winner};

use super::{GameOutcome, Grid};
use tracing::instrument;

/// Evaluates the outcome of a grid.
///
/// All eight lines are checked before a draw is considered, so a win on
/// the ninth move is reported as a win.
#[instrument(skip(grid))]
pub fn evaluate(grid: &Grid, move_count: u8) -> GameOutcome {
    if let Some(occupant) = winner(grid) {
        return GameOutcome::won_by(occupant);
    }
    if is_full(move_count) {
        return GameOutcome::Draw;
    }
    GameOutcome::InProgress
}
