//! Turn sequencing between the player and the AI.
//!
//! A [`GameSession`] owns the board and the state machine
//!
//! ```text
//! PlayerTurn --valid click--> AiTurnPending --timer--> AiThinking --> PlayerTurn
//!      |                           |                       |
//!      +--------- win/draw --------+-------- win/draw -----+--> GameOver
//! ```
//!
//! Every input returns the [`GameEvent`]s the presentation layer should
//! apply. The session never sleeps: entering `AiTurnPending` hands out an
//! [`AiTicket`] and the caller schedules [`GameSession::on_ai_turn_due`]
//! after [`AI_TURN_DELAY`]. Reset invalidates outstanding tickets.

use super::action::{Move, MoveError};
use super::ai::{AiDecision, HeuristicLadder, MovePolicy};
use super::board::BoardState;
use super::invariants::debug_assert_invariants;
use super::outcome::{GameOutcome, Status};
use super::position::Position;
use super::types::Occupant;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Pause between the player's move and the AI's reply.
pub const AI_TURN_DELAY: Duration = Duration::from_millis(500);

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one scheduled AI turn.
///
/// A ticket is only honoured by the session generation that issued it, for
/// the move it was issued after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiTicket {
    generation: u64,
    move_count: u8,
}

/// Where the session is in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    /// Waiting for the player to pick a cell.
    PlayerTurn,
    /// Player moved; the AI reply is scheduled.
    AiTurnPending(AiTicket),
    /// The AI is choosing and applying its move.
    AiThinking,
    /// Win or draw reached; only reset is accepted.
    GameOver(GameOutcome),
}

/// Instruction for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Draw a mark in a cell.
    CellFilled {
        /// The cell to mark.
        position: Position,
        /// Whose mark.
        occupant: Occupant,
    },
    /// Replace the status line.
    StatusChanged(Status),
    /// Wipe all marks.
    BoardCleared,
}

/// One game against the AI, owned by the caller.
#[derive(Debug)]
pub struct GameSession {
    id: u64,
    board: BoardState,
    state: FlowState,
    generation: u64,
    history: Vec<Move>,
    policy: Box<dyn MovePolicy>,
}

impl GameSession {
    /// Creates a session against the heuristic ladder, ready for the player.
    pub fn new() -> Self {
        Self::with_policy(Box::new(HeuristicLadder::new()))
    }

    /// Creates a session with a custom AI policy.
    pub fn with_policy(policy: Box<dyn MovePolicy>) -> Self {
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        info!(session_id = id, ?policy, "Creating game session");
        Self {
            id,
            board: BoardState::new(),
            state: FlowState::PlayerTurn,
            generation: 0,
            history: Vec::new(),
            policy,
        }
    }

    /// Session identifier, unique within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut BoardState {
        &mut self.board
    }

    /// Returns the current state.
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Moves played since the last reset, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Outcome of the current board.
    pub fn outcome(&self) -> GameOutcome {
        match self.state {
            FlowState::GameOver(outcome) => outcome,
            _ => GameOutcome::InProgress,
        }
    }

    /// Status line matching the current state.
    pub fn status(&self) -> Status {
        match self.state {
            FlowState::PlayerTurn => Status::PlayerTurn,
            FlowState::AiTurnPending(_) | FlowState::AiThinking => Status::AiTurn,
            FlowState::GameOver(outcome) => {
                Status::for_outcome(outcome).unwrap_or(Status::PlayerTurn)
            }
        }
    }

    /// Ticket for the AI turn waiting to be run, if any.
    pub fn pending_ai_turn(&self) -> Option<AiTicket> {
        match self.state {
            FlowState::AiTurnPending(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Reinitializes the board and returns control to the player.
    ///
    /// Valid in any state. Any ticket issued before the reset is stale
    /// afterwards.
    #[instrument(skip(self), fields(session_id = self.id, state = ?self.state))]
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.board.reset();
        self.history.clear();
        self.generation += 1;
        self.state = FlowState::PlayerTurn;
        debug_assert_invariants(self);

        info!(generation = self.generation, "Session reset");
        vec![
            GameEvent::BoardCleared,
            GameEvent::StatusChanged(Status::PlayerTurn),
        ]
    }

    /// Handles the player picking cell `index` (0-8).
    ///
    /// Ignored unless it is the player's turn. An occupied cell leaves the
    /// state unchanged and reports [`Status::BoxAlreadyFilled`].
    #[instrument(skip(self), fields(session_id = self.id, state = ?self.state))]
    pub fn on_cell_selected(&mut self, index: usize) -> Vec<GameEvent> {
        if let Err(e) = self.accepts_player_input() {
            debug!(error = %e, "Ignoring cell selection");
            return Vec::new();
        }

        let Some(position) = Position::from_index(index) else {
            warn!(error = %MoveError::OutOfBounds(index), "Ignoring cell selection");
            return Vec::new();
        };

        if let Err(e) = self.apply(Move::new(Occupant::Player, position)) {
            info!(error = %e, "Player picked a filled cell");
            return vec![GameEvent::StatusChanged(Status::BoxAlreadyFilled)];
        }

        let mut events = vec![GameEvent::CellFilled {
            position,
            occupant: Occupant::Player,
        }];
        self.board.set_player_turn(false);

        match self.finish_if_terminal() {
            Some(status) => events.push(GameEvent::StatusChanged(status)),
            None => {
                let ticket = AiTicket {
                    generation: self.generation,
                    move_count: self.board.move_count(),
                };
                self.state = FlowState::AiTurnPending(ticket);
                info!(?ticket, "AI turn pending");
                events.push(GameEvent::StatusChanged(Status::AiTurn));
            }
        }

        debug_assert_invariants(self);
        events
    }

    /// Runs the AI turn scheduled under `ticket`.
    ///
    /// Stale tickets (issued before a reset, or already used) are ignored.
    /// If the AI policy names no usable cell the board is left as it is and
    /// the turn passes back to the player.
    #[instrument(skip(self), fields(session_id = self.id, state = ?self.state))]
    pub fn on_ai_turn_due(&mut self, ticket: AiTicket) -> Vec<GameEvent> {
        if self.state != FlowState::AiTurnPending(ticket) {
            debug!(?ticket, "Ignoring stale AI ticket");
            return Vec::new();
        }
        self.state = FlowState::AiThinking;

        let mut events = Vec::new();
        let decision = self.policy.choose_move(&self.board);
        match decision {
            AiDecision::Move { position, .. } => {
                match self.apply(Move::new(Occupant::Ai, position)) {
                    Ok(()) => events.push(GameEvent::CellFilled {
                        position,
                        occupant: Occupant::Ai,
                    }),
                    Err(e) => error!(error = %e, ?decision, "AI picked an unusable cell"),
                }
            }
            // Already reported by the policy.
            AiDecision::Claimed { .. } => debug!(?decision, "AI turn claimed without a move"),
            AiDecision::Stuck => error!(move_count = self.board.move_count(), "AI made no move"),
        }

        match self.finish_if_terminal() {
            Some(status) => events.push(GameEvent::StatusChanged(status)),
            None => {
                self.state = FlowState::PlayerTurn;
                self.board.set_player_turn(true);
                events.push(GameEvent::StatusChanged(Status::PlayerTurn));
            }
        }

        debug_assert_invariants(self);
        events
    }

    fn accepts_player_input(&self) -> Result<(), MoveError> {
        match self.state {
            FlowState::PlayerTurn => Ok(()),
            FlowState::GameOver(_) => Err(MoveError::GameOver),
            FlowState::AiTurnPending(_) | FlowState::AiThinking => Err(MoveError::NotPlayersTurn),
        }
    }

    fn apply(&mut self, action: Move) -> Result<(), MoveError> {
        self.board.occupy(action.position, action.occupant)?;
        self.history.push(action);
        debug!(%action, move_count = self.board.move_count(), "Move applied");
        Ok(())
    }

    /// Enters `GameOver` if the board is terminal and returns the final status.
    fn finish_if_terminal(&mut self) -> Option<Status> {
        let outcome = self.board.evaluate_outcome();
        let status = Status::for_outcome(outcome)?;
        self.state = FlowState::GameOver(outcome);
        self.board.set_player_turn(false);
        info!(%outcome, moves = self.history.len(), "Game over");
        Some(status)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
