//! Invariants that must hold after every board mutation.
//!
//! Checked in debug builds after each transition of a [`GameSession`] and
//! exercised directly by the randomized tests.

use super::action::Move;
use super::board::BoardState;
use super::flow::GameSession;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violated: {}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = match <(I1, I2) as InvariantSet<S>>::check_all(state) {
            Ok(()) => Vec::new(),
            Err(violations) => violations,
        };
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

/// The move count equals the number of occupied cells.
pub struct MoveCountMatchesBoard;

impl Invariant<BoardState> for MoveCountMatchesBoard {
    fn holds(board: &BoardState) -> bool {
        let occupied = board.grid().iter().flatten().filter(|cell| !cell.is_empty()).count();
        occupied == usize::from(board.move_count())
    }

    fn description() -> &'static str {
        "Move count equals the number of occupied cells"
    }
}

impl Invariant<GameSession> for MoveCountMatchesBoard {
    fn holds(session: &GameSession) -> bool {
        <Self as Invariant<BoardState>>::holds(session.board())
    }

    fn description() -> &'static str {
        <Self as Invariant<BoardState>>::description()
    }
}

/// The player is never allowed to act on a finished board.
pub struct TurnFlagNotTerminal;

impl Invariant<BoardState> for TurnFlagNotTerminal {
    fn holds(board: &BoardState) -> bool {
        !(board.is_player_turn() && board.is_game_over())
    }

    fn description() -> &'static str {
        "Turn flag is never set while the game is over"
    }
}

impl Invariant<GameSession> for TurnFlagNotTerminal {
    fn holds(session: &GameSession) -> bool {
        <Self as Invariant<BoardState>>::holds(session.board())
    }

    fn description() -> &'static str {
        <Self as Invariant<BoardState>>::description()
    }
}

/// Replaying the move history onto an empty grid reproduces the board.
pub struct HistoryConsistent;

impl Invariant<GameSession> for HistoryConsistent {
    fn holds(session: &GameSession) -> bool {
        let mut replayed = BoardState::new();
        let applied = session
            .history()
            .iter()
            .all(|Move { occupant, position }| replayed.occupy(*position, *occupant).is_ok());
        applied && replayed.grid() == session.board().grid()
    }

    fn description() -> &'static str {
        "Move history replays to the current board"
    }
}

/// Invariants of a bare board.
pub type BoardInvariants = (MoveCountMatchesBoard, TurnFlagNotTerminal);

/// All session invariants as a composable set.
pub type SessionInvariants = (MoveCountMatchesBoard, TurnFlagNotTerminal, HistoryConsistent);

/// Asserts that all session invariants hold (debug builds only).
pub(crate) fn debug_assert_invariants(session: &GameSession) {
    if cfg!(debug_assertions)
        && let Err(violations) = SessionInvariants::check_all(session)
    {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        panic!("Session invariants violated: {descriptions}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Occupant, Position};

    #[test]
    fn test_fresh_board_holds() {
        assert!(BoardInvariants::check_all(&BoardState::new()).is_ok());
    }

    #[test]
    fn test_fresh_session_holds() {
        assert!(SessionInvariants::check_all(&GameSession::new()).is_ok());
    }

    #[test]
    fn test_terminal_board_with_turn_flag_violates() {
        let mut board = BoardState::new();
        for pos in [Position::TopLeft, Position::TopCenter, Position::TopRight] {
            board.occupy(pos, Occupant::Player).unwrap();
        }
        // occupy never touches the flag, so it is still set here
        let violations = BoardInvariants::check_all(&board).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].description,
            <TurnFlagNotTerminal as Invariant<BoardState>>::description()
        );

        board.set_player_turn(false);
        assert!(BoardInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_board_without_history_violates() {
        let mut session = GameSession::new();
        session.board_mut().occupy(Position::Center, Occupant::Ai).unwrap();
        assert!(!HistoryConsistent::holds(&session));
        assert!(MoveCountMatchesBoard::holds(&session));
    }
}
