//! Tic-tac-toe against a rule-based AI.
//!
//! The player (X) always moves first; the AI (O) answers half a second
//! later using a fixed ladder of heuristics rather than search.
//!
//! # Architecture
//!
//! - **Board**: grid occupancy, move count, turn flag, outcome evaluation
//! - **AI**: the heuristic ladder behind the [`MovePolicy`] seam
//! - **Flow**: the [`GameSession`] state machine turning clicks into events
//! - **Driver**: a tokio task owning a session and pacing the AI with a
//!   cancellable timer
//!
//! # Example
//!
//! ```
//! use tictactoe_core::{GameEvent, GameSession, Occupant, Position};
//!
//! let mut session = GameSession::new();
//! session.on_cell_selected(0);
//! let ticket = session.pending_ai_turn().expect("AI turn scheduled");
//! let events = session.on_ai_turn_due(ticket);
//! assert_eq!(
//!     events[0],
//!     GameEvent::CellFilled { position: Position::Center, occupant: Occupant::Ai }
//! );
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod board;
mod driver;
mod flow;
mod invariants;
mod outcome;
mod position;
mod scheduler;
mod types;

pub mod ai;
pub mod rules;

// Crate-level exports - Domain types
pub use action::{Move, MoveError};
pub use outcome::{GameOutcome, Status};
pub use position::Position;
pub use types::{BOARD_SIZE, Cell, Grid, MAX_BOARD_MOVES, Occupant};

// Crate-level exports - Board
pub use board::BoardState;

// Crate-level exports - AI
pub use ai::{AiDecision, Heuristic, HeuristicLadder, MovePolicy};

// Crate-level exports - Game flow
pub use flow::{AI_TURN_DELAY, AiTicket, FlowState, GameEvent, GameSession};

// Crate-level exports - Async driver
pub use driver::{DriverClosed, GameDriver, GameHandle, SessionSnapshot};
pub use scheduler::ScheduledTask;

// Crate-level exports - Invariants
pub use invariants::{
    BoardInvariants, HistoryConsistent, Invariant, InvariantSet, InvariantViolation,
    MoveCountMatchesBoard, SessionInvariants, TurnFlagNotTerminal,
};
