//! AI move selection.
//!
//! The opponent is a fixed, ordered list of rules (the heuristic ladder).
//! The first rule that applies decides the move. There is no search, so the
//! AI can be beaten; the order and scan directions reproduce its behaviour
//! exactly.

pub mod heuristics;

use crate::BoardState;
use crate::Position;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

/// A rung of the heuristic ladder, in precedence order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Heuristic {
    /// Complete a line holding two AI marks.
    Win,
    /// Plug a line holding two player marks.
    Block,
    /// Hard-coded responses to the player's fork setups on move 3.
    ForkBlock,
    /// Take the center.
    Center,
    /// Mirror a player corner.
    OppositeCorner,
    /// Take any corner.
    EmptyCorner,
    /// Take any edge midpoint.
    EmptySide,
}

/// What the ladder decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiDecision {
    /// A rule picked a cell.
    Move {
        /// The rule that fired.
        heuristic: Heuristic,
        /// The chosen cell.
        position: Position,
    },
    /// A rule reported that it handled the turn but picked no cell.
    ///
    /// Only the diagonal fork patterns can do this, when no side is free.
    Claimed {
        /// The rule that fired.
        heuristic: Heuristic,
    },
    /// No rule applied.
    Stuck,
}

impl AiDecision {
    /// The chosen cell, if the decision places a mark.
    pub fn position(&self) -> Option<Position> {
        match self {
            AiDecision::Move { position, .. } => Some(*position),
            AiDecision::Claimed { .. } | AiDecision::Stuck => None,
        }
    }

    /// The rule that fired, if any.
    pub fn heuristic(&self) -> Option<Heuristic> {
        match self {
            AiDecision::Move { heuristic, .. } | AiDecision::Claimed { heuristic } => {
                Some(*heuristic)
            }
            AiDecision::Stuck => None,
        }
    }
}

/// Source of AI moves.
pub trait MovePolicy: std::fmt::Debug + Send {
    /// Decides the AI's move for `board`.
    fn choose_move(&self, board: &BoardState) -> AiDecision;
}

/// The fixed precedence of rules used by the AI opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicLadder;

impl HeuristicLadder {
    /// Creates the ladder.
    pub fn new() -> Self {
        Self
    }

    fn decide(board: &BoardState) -> AiDecision {
        let grid = board.grid();
        let placed = |heuristic, position: Option<Position>| {
            position.map(|position| AiDecision::Move {
                heuristic,
                position,
            })
        };

        placed(Heuristic::Win, heuristics::win(grid))
            .or_else(|| placed(Heuristic::Block, heuristics::block(grid)))
            .or_else(|| heuristics::fork_block(grid, board.move_count()))
            .or_else(|| placed(Heuristic::Center, heuristics::center(grid)))
            .or_else(|| placed(Heuristic::OppositeCorner, heuristics::opposite_corner(grid)))
            .or_else(|| placed(Heuristic::EmptyCorner, heuristics::empty_corner(grid)))
            .or_else(|| placed(Heuristic::EmptySide, heuristics::empty_side(grid)))
            .unwrap_or(AiDecision::Stuck)
    }
}

impl MovePolicy for HeuristicLadder {
    #[instrument(skip(self, board), fields(move_count = board.move_count()))]
    fn choose_move(&self, board: &BoardState) -> AiDecision {
        let decision = Self::decide(board);
        match decision {
            AiDecision::Move {
                heuristic,
                position,
            } => debug!(%heuristic, %position, "AI chose move"),
            AiDecision::Claimed { heuristic } => {
                warn!(%heuristic, "AI rule claimed the turn without naming a cell")
            }
            AiDecision::Stuck => error!(
                move_count = board.move_count(),
                board = %board.display(),
                "AI stuck: no rule applied"
            ),
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Occupant};

    const P: Cell = Cell::Occupied(Occupant::Player);
    const A: Cell = Cell::Occupied(Occupant::Ai);
    const E: Cell = Cell::Empty;

    fn choose(rows: [[Cell; 3]; 3]) -> AiDecision {
        HeuristicLadder::new().choose_move(&BoardState::from_grid(rows))
    }

    #[test]
    fn test_win_beats_block() {
        let decision = choose([[A, A, E], [P, P, E], [E, E, E]]);
        assert_eq!(
            decision,
            AiDecision::Move {
                heuristic: Heuristic::Win,
                position: Position::TopRight
            }
        );
    }

    #[test]
    fn test_block_when_no_win() {
        let decision = choose([[P, P, E], [E, A, E], [E, E, E]]);
        assert_eq!(decision.heuristic(), Some(Heuristic::Block));
        assert_eq!(decision.position(), Some(Position::TopRight));
    }

    #[test]
    fn test_center_on_empty_board() {
        let decision = choose([[E; 3]; 3]);
        assert_eq!(decision.heuristic(), Some(Heuristic::Center));
        assert_eq!(decision.position(), Some(Position::Center));
    }

    #[test]
    fn test_opposite_corner() {
        let decision = choose([[P, E, E], [E, A, E], [E, E, E]]);
        assert_eq!(decision.heuristic(), Some(Heuristic::OppositeCorner));
        assert_eq!(decision.position(), Some(Position::BottomRight));
    }

    #[test]
    fn test_fork_block_beats_center() {
        // Player on two edges around bottom-right, AI took top-left.
        let decision = choose([[A, E, E], [E, E, P], [E, P, E]]);
        assert_eq!(decision.heuristic(), Some(Heuristic::ForkBlock));
        assert_eq!(decision.position(), Some(Position::BottomRight));
    }

    #[test]
    fn test_empty_corner_when_center_taken() {
        let decision = choose([[E, E, E], [E, P, E], [E, E, E]]);
        assert_eq!(decision.heuristic(), Some(Heuristic::EmptyCorner));
        assert_eq!(decision.position(), Some(Position::TopLeft));
    }

    #[test]
    fn test_empty_side_last() {
        // Only top-center is free and no line through it holds two of a kind.
        let decision = choose([[P, E, A], [A, A, P], [P, P, A]]);
        assert_eq!(decision.heuristic(), Some(Heuristic::EmptySide));
        assert_eq!(decision.position(), Some(Position::TopCenter));
    }

    #[test]
    fn test_full_board_is_stuck() {
        let decision = choose([[P, A, P], [P, A, A], [A, P, P]]);
        assert_eq!(decision, AiDecision::Stuck);
        assert_eq!(decision.position(), None);
    }

    #[test]
    fn test_heuristic_names() {
        assert_eq!(Heuristic::OppositeCorner.to_string(), "opposite_corner");
        let name: &'static str = Heuristic::ForkBlock.into();
        assert_eq!(name, "fork_block");
    }
}
