//! Win detection logic for tic-tac-toe.

use super::super::{Grid, Occupant, Position};
use tracing::instrument;

/// Three positions forming a row, column or diagonal.
pub type Line = [Position; 3];

/// All winning lines: rows, then columns, then the main diagonal, then the
/// anti-diagonal. Every scan over lines uses this order.
pub const LINES: [Line; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonal
    [Position::TopLeft, Position::Center, Position::BottomRight],
    // Anti-diagonal
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Sum of a line: +1 per player cell, -1 per AI cell.
pub fn line_sum(grid: &Grid, line: &Line) -> i8 {
    line.iter().map(|pos| grid[pos.row()][pos.col()].weight()).sum()
}

/// Returns the owner of the first complete line, if any.
#[instrument(skip(grid))]
pub fn winner(grid: &Grid) -> Option<Occupant> {
    LINES.iter().find_map(|line| match line_sum(grid, line) {
        3 => Some(Occupant::Player),
        -3 => Some(Occupant::Ai),
        _ => None,
    })
}
