//! Individual rungs of the heuristic ladder.
//!
//! Each rule inspects the grid and names the cell it would take, or `None`
//! when it does not apply. Scan orders are fixed and part of the observable
//! behaviour.

use super::{AiDecision, Heuristic};
use crate::rules::LINES;
use crate::{Cell, Grid, Occupant, Position};

/// Move count at which the fork patterns are checked (player's second move done).
pub const FORK_CHECK_MOVE: u8 = 3;

fn cell(grid: &Grid, pos: Position) -> Cell {
    grid[pos.row()][pos.col()]
}

/// First line holding two `occupant` cells and one empty cell; returns the empty one.
fn two_and_an_empty(grid: &Grid, occupant: Occupant) -> Option<Position> {
    LINES.iter().find_map(|line| {
        let mut count = 0i8;
        let mut empty = None;
        for &pos in line {
            match cell(grid, pos).occupant() {
                Some(o) if o == occupant => count += 1,
                Some(_) => count -= 1,
                None => empty = Some(pos),
            }
        }
        if count == 2 { empty } else { None }
    })
}

/// Completes a line of two AI cells.
pub fn win(grid: &Grid) -> Option<Position> {
    two_and_an_empty(grid, Occupant::Ai)
}

/// Plugs a line of two player cells.
pub fn block(grid: &Grid) -> Option<Position> {
    two_and_an_empty(grid, Occupant::Player)
}

/// Hard-coded fork patterns, only on the AI's second move.
///
/// The two diagonal patterns answer with [`empty_side`] and count as handled
/// even when no side is free; that case yields [`AiDecision::Claimed`].
/// The third pattern names the bottom-right corner without checking it.
pub fn fork_block(grid: &Grid, move_count: u8) -> Option<AiDecision> {
    if move_count != FORK_CHECK_MOVE {
        return None;
    }

    let player = |pos| cell(grid, pos).is(Occupant::Player);
    let ai_center = cell(grid, Position::Center).is(Occupant::Ai);

    let diagonal = player(Position::TopLeft) && ai_center && player(Position::BottomRight);
    let anti_diagonal = player(Position::BottomLeft) && ai_center && player(Position::TopRight);
    if diagonal || anti_diagonal {
        return Some(match empty_side(grid) {
            Some(position) => AiDecision::Move {
                heuristic: Heuristic::ForkBlock,
                position,
            },
            None => AiDecision::Claimed {
                heuristic: Heuristic::ForkBlock,
            },
        });
    }

    if player(Position::BottomCenter) && player(Position::MiddleRight) {
        return Some(AiDecision::Move {
            heuristic: Heuristic::ForkBlock,
            position: Position::BottomRight,
        });
    }

    None
}

/// Takes the center if free.
pub fn center(grid: &Grid) -> Option<Position> {
    cell(grid, Position::Center).is_empty().then_some(Position::Center)
}

/// Answers a player corner with the point-symmetric corner.
///
/// Order: top-left, bottom-right, top-right, bottom-left.
pub fn opposite_corner(grid: &Grid) -> Option<Position> {
    const ORDER: [Position; 4] = [
        Position::TopLeft,
        Position::BottomRight,
        Position::TopRight,
        Position::BottomLeft,
    ];
    ORDER.iter().find_map(|&corner| {
        let opposite = corner.opposite();
        (cell(grid, corner).is(Occupant::Player) && cell(grid, opposite).is_empty())
            .then_some(opposite)
    })
}

/// First free corner in scan order.
pub fn empty_corner(grid: &Grid) -> Option<Position> {
    first_empty(grid, &Position::CORNERS)
}

/// First free edge midpoint in scan order.
pub fn empty_side(grid: &Grid) -> Option<Position> {
    first_empty(grid, &Position::SIDES)
}

fn first_empty(grid: &Grid, candidates: &[Position]) -> Option<Position> {
    candidates.iter().copied().find(|&pos| cell(grid, pos).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Cell = Cell::Occupied(Occupant::Player);
    const A: Cell = Cell::Occupied(Occupant::Ai);
    const E: Cell = Cell::Empty;

    #[test]
    fn test_win_prefers_first_line_in_scan_order() {
        // Row 0 and column 2 both completable; rows come first.
        let grid = [[A, A, E], [E, E, A], [E, E, A]];
        assert_eq!(win(&grid), Some(Position::TopRight));
    }

    #[test]
    fn test_win_ignores_blocked_line() {
        let grid = [[A, A, P], [E, E, E], [E, E, E]];
        assert_eq!(win(&grid), None);
    }

    #[test]
    fn test_block_anti_diagonal() {
        let grid = [[E, E, P], [E, P, E], [E, E, A]];
        assert_eq!(block(&grid), Some(Position::BottomLeft));
    }

    #[test]
    fn test_fork_only_on_third_move() {
        let grid = [[P, E, E], [E, A, E], [E, E, P]];
        assert!(fork_block(&grid, 3).is_some());
        assert_eq!(fork_block(&grid, 5), None);
    }

    #[test]
    fn test_fork_diagonal_takes_side() {
        let grid = [[P, E, E], [E, A, E], [E, E, P]];
        assert_eq!(
            fork_block(&grid, 3),
            Some(AiDecision::Move {
                heuristic: Heuristic::ForkBlock,
                position: Position::TopCenter
            })
        );
    }

    #[test]
    fn test_fork_anti_diagonal_takes_side() {
        let grid = [[E, A, P], [E, A, E], [P, E, E]];
        // Top-center is taken, so the next side in order is middle-left.
        assert_eq!(
            fork_block(&grid, 3).and_then(|d| d.position()),
            Some(Position::MiddleLeft)
        );
    }

    #[test]
    fn test_fork_pattern_claims_without_free_side() {
        // Unreachable in play: the diagonal pattern with every side filled.
        // The rule still reports itself as handled and names no cell.
        let grid = [[P, A, E], [A, A, P], [E, P, P]];
        assert_eq!(
            fork_block(&grid, 3),
            Some(AiDecision::Claimed {
                heuristic: Heuristic::ForkBlock
            })
        );
    }

    #[test]
    fn test_fork_edge_pattern_takes_corner() {
        let grid = [[E, E, E], [E, A, P], [E, P, E]];
        assert_eq!(
            fork_block(&grid, 3).and_then(|d| d.position()),
            Some(Position::BottomRight)
        );
    }

    #[test]
    fn test_center() {
        assert_eq!(center(&Grid::default()), Some(Position::Center));
        let grid = [[E, E, E], [E, P, E], [E, E, E]];
        assert_eq!(center(&grid), None);
    }

    #[test]
    fn test_opposite_corner_order() {
        // Player holds bottom-right and top-right; bottom-right is checked first.
        let grid = [[E, E, P], [E, A, E], [E, E, P]];
        assert_eq!(opposite_corner(&grid), Some(Position::TopLeft));

        let grid = [[E, E, P], [E, A, E], [E, E, E]];
        assert_eq!(opposite_corner(&grid), Some(Position::BottomLeft));

        let grid = [[P, E, E], [E, A, E], [E, E, A]];
        assert_eq!(opposite_corner(&grid), None);
    }

    #[test]
    fn test_empty_corner_and_side_order() {
        let grid = [[A, E, P], [E, E, E], [E, E, E]];
        assert_eq!(empty_corner(&grid), Some(Position::BottomLeft));
        assert_eq!(empty_side(&grid), Some(Position::TopCenter));

        let grid = [[P, A, P], [P, E, A], [A, E, A]];
        assert_eq!(empty_corner(&grid), None);
        assert_eq!(empty_side(&grid), Some(Position::BottomCenter));
    }
}
