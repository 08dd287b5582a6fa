//! Event loop that owns a [`GameSession`] and paces the AI.
//!
//! All session mutation happens on the single driver task. Frontends talk to
//! it through a [`GameHandle`] and receive [`GameEvent`]s on a channel.
//! At most one AI turn is scheduled at a time, and reset cancels it.

use super::board::BoardState;
use super::flow::{AI_TURN_DELAY, AiTicket, FlowState, GameEvent, GameSession};
use super::scheduler::ScheduledTask;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Error talking to a driver that has stopped.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Game driver is no longer running")]
pub struct DriverClosed;

/// Point-in-time copy of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The board.
    pub board: BoardState,
    /// The flow state.
    pub state: FlowState,
    /// Whether an AI timer is armed.
    pub ai_timer_armed: bool,
}

#[derive(Debug)]
enum Command {
    SelectCell(usize),
    Reset,
    AiTurnDue(AiTicket),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Inbound side of a running driver.
#[derive(Debug, Clone)]
pub struct GameHandle {
    commands: UnboundedSender<Command>,
}

impl GameHandle {
    /// Reports that the player picked cell `index` (0-8).
    pub fn select_cell(&self, index: usize) -> Result<(), DriverClosed> {
        self.send(Command::SelectCell(index))
    }

    /// Requests a new game.
    pub fn reset(&self) -> Result<(), DriverClosed> {
        self.send(Command::Reset)
    }

    /// Stops the driver, cancelling any pending AI turn.
    pub fn shutdown(&self) -> Result<(), DriverClosed> {
        self.send(Command::Shutdown)
    }

    /// Fetches a copy of the session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, DriverClosed> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| DriverClosed)
    }

    fn send(&self, command: Command) -> Result<(), DriverClosed> {
        self.commands.send(command).map_err(|_| DriverClosed)
    }
}

/// Owns a session and runs it against inbound commands.
#[derive(Debug)]
pub struct GameDriver {
    session: GameSession,
    commands: UnboundedReceiver<Command>,
    timer_tx: WeakUnboundedSender<Command>,
    events: UnboundedSender<GameEvent>,
    pending: Option<(AiTicket, ScheduledTask)>,
}

impl GameDriver {
    /// Creates a driver for `session`, returning the handle to feed it and
    /// the receiver of outbound events.
    pub fn new(session: GameSession) -> (Self, GameHandle, UnboundedReceiver<GameEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let driver = Self {
            session,
            commands: command_rx,
            timer_tx: command_tx.downgrade(),
            events: event_tx,
            pending: None,
        };
        (driver, GameHandle { commands: command_tx }, event_rx)
    }

    /// Spawns a driver for a fresh session on the current runtime.
    pub fn spawn() -> (GameHandle, UnboundedReceiver<GameEvent>, JoinHandle<()>) {
        let (driver, handle, events) = Self::new(GameSession::new());
        let task = tokio::spawn(driver.run());
        (handle, events, task)
    }

    /// Processes commands until shutdown or until every handle is dropped.
    ///
    /// Starts by resetting the session so the frontend receives the initial
    /// status.
    #[instrument(skip(self), fields(session_id = self.session.id()))]
    pub async fn run(mut self) {
        info!("Game driver started");
        let events = self.session.reset();
        self.emit(events);

        while let Some(command) = self.commands.recv().await {
            debug!(?command, "Handling command");
            match command {
                Command::SelectCell(index) => {
                    let events = self.session.on_cell_selected(index);
                    self.emit(events);
                    self.arm_ai_timer();
                }
                Command::AiTurnDue(ticket) => {
                    // Only the armed ticket's own delivery may disarm the timer.
                    if self.pending.as_ref().is_some_and(|(armed, _)| *armed == ticket) {
                        self.pending = None;
                    }
                    let events = self.session.on_ai_turn_due(ticket);
                    self.emit(events);
                }
                Command::Reset => {
                    self.cancel_ai_timer();
                    let events = self.session.reset();
                    self.emit(events);
                }
                Command::Snapshot(reply) => {
                    let snapshot = SessionSnapshot {
                        board: self.session.board().clone(),
                        state: self.session.state(),
                        ai_timer_armed: self.pending.is_some(),
                    };
                    if reply.send(snapshot).is_err() {
                        debug!("Snapshot requester went away");
                    }
                }
                Command::Shutdown => {
                    self.cancel_ai_timer();
                    break;
                }
            }
        }

        info!("Game driver stopped");
    }

    fn arm_ai_timer(&mut self) {
        let Some(ticket) = self.session.pending_ai_turn() else {
            return;
        };
        if self.pending.as_ref().is_some_and(|(armed, _)| *armed == ticket) {
            return;
        }
        let Some(tx) = self.timer_tx.upgrade() else {
            warn!("No command sender left; AI turn not scheduled");
            return;
        };
        debug!(?ticket, delay_ms = AI_TURN_DELAY.as_millis() as u64, "Scheduling AI turn");
        let task = ScheduledTask::schedule(AI_TURN_DELAY, tx, Command::AiTurnDue(ticket));
        self.pending = Some((ticket, task));
    }

    fn cancel_ai_timer(&mut self) {
        if let Some((ticket, task)) = self.pending.take() {
            info!(?ticket, "Cancelling pending AI turn");
            task.cancel();
        }
    }

    fn emit(&self, events: Vec<GameEvent>) {
        for event in events {
            if self.events.send(event).is_err() {
                debug!(?event, "Event receiver dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Occupant, Position, Status};
    use std::time::Duration;

    async fn drain(rx: &mut UnboundedReceiver<GameEvent>, n: usize) -> Vec<GameEvent> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(rx.recv().await.expect("driver running"));
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_status() {
        let (_handle, mut events, _task) = GameDriver::spawn();
        assert_eq!(
            drain(&mut events, 2).await,
            vec![GameEvent::BoardCleared, GameEvent::StatusChanged(Status::PlayerTurn)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ai_replies_after_delay() {
        let (handle, mut events, _task) = GameDriver::spawn();
        drain(&mut events, 2).await;

        handle.select_cell(0).unwrap();
        assert_eq!(
            drain(&mut events, 2).await,
            vec![
                GameEvent::CellFilled {
                    position: Position::TopLeft,
                    occupant: Occupant::Player
                },
                GameEvent::StatusChanged(Status::AiTurn),
            ]
        );
        assert!(handle.snapshot().await.unwrap().ai_timer_armed);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(events.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            drain(&mut events, 2).await,
            vec![
                GameEvent::CellFilled {
                    position: Position::Center,
                    occupant: Occupant::Ai
                },
                GameEvent::StatusChanged(Status::PlayerTurn),
            ]
        );
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, FlowState::PlayerTurn);
        assert!(!snapshot.ai_timer_armed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_ai_turn() {
        let (handle, mut events, _task) = GameDriver::spawn();
        drain(&mut events, 2).await;

        handle.select_cell(4).unwrap();
        drain(&mut events, 2).await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        handle.reset().unwrap();
        assert_eq!(
            drain(&mut events, 2).await,
            vec![GameEvent::BoardCleared, GameEvent::StatusChanged(Status::PlayerTurn)]
        );

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(events.try_recv().is_err());

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.board, BoardState::new());
        assert_eq!(snapshot.state, FlowState::PlayerTurn);
        assert!(!snapshot.ai_timer_armed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ai_turn_after_reset_keeps_new_timer() {
        let (handle, mut events, _task) = GameDriver::spawn();
        drain(&mut events, 2).await;

        handle.select_cell(0).unwrap();
        drain(&mut events, 2).await;
        let FlowState::AiTurnPending(old) = handle.snapshot().await.unwrap().state else {
            panic!("AI turn should be pending");
        };

        handle.reset().unwrap();
        handle.select_cell(0).unwrap();
        // Delivery from the timer armed before the reset, arriving late.
        handle.send(Command::AiTurnDue(old)).unwrap();
        drain(&mut events, 4).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.ai_timer_armed);
        assert_ne!(snapshot.state, FlowState::AiTurnPending(old));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            drain(&mut events, 2).await,
            vec![
                GameEvent::CellFilled {
                    position: Position::Center,
                    occupant: Occupant::Ai
                },
                GameEvent::StatusChanged(Status::PlayerTurn),
            ]
        );
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, FlowState::PlayerTurn);
        assert_eq!(snapshot.board.move_count(), 2);
        assert!(!snapshot.ai_timer_armed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_driver() {
        let (handle, mut events, task) = GameDriver::spawn();
        drain(&mut events, 2).await;
        handle.select_cell(0).unwrap();
        handle.shutdown().unwrap();
        task.await.unwrap();

        assert_eq!(handle.select_cell(1), Err(DriverClosed));
        assert_eq!(handle.snapshot().await, Err(DriverClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_ends_when_handles_dropped() {
        let (handle, _events, task) = GameDriver::spawn();
        drop(handle);
        task.await.unwrap();
    }
}
