//! Frontend view state fed by game events.

use tictactoe_core::{Cell, GameEvent, Position, Status};
use tracing::debug;

/// What the screen shows. Mirrors the driver's board through events only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    cells: [Cell; 9],
    status: Option<Status>,
    cursor: Position,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates an empty view with the cursor in the center.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
            status: None,
            cursor: Position::Center,
        }
    }

    /// Applies an event from the driver.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Applying game event");
        match event {
            GameEvent::CellFilled { position, occupant } => {
                self.cells[position.to_index()] = Cell::Occupied(occupant);
            }
            GameEvent::StatusChanged(status) => self.status = Some(status),
            GameEvent::BoardCleared => self.cells = [Cell::Empty; 9],
        }
    }

    /// Cell contents at `position`.
    pub fn cell(&self, position: Position) -> Cell {
        self.cells[position.to_index()]
    }

    /// Status text, empty until the driver reports one.
    pub fn status_text(&self) -> String {
        self.status.map(|s| s.to_string()).unwrap_or_default()
    }

    /// Last status received.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Moves the cursor.
    pub fn set_cursor(&mut self, cursor: Position) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_core::Occupant;

    #[test]
    fn test_events_update_view() {
        let mut app = App::new();
        app.handle_event(GameEvent::StatusChanged(Status::PlayerTurn));
        app.handle_event(GameEvent::CellFilled {
            position: Position::TopRight,
            occupant: Occupant::Player,
        });
        app.handle_event(GameEvent::StatusChanged(Status::AiTurn));

        assert_eq!(app.cell(Position::TopRight), Cell::Occupied(Occupant::Player));
        assert_eq!(app.status_text(), "AI Turn");
    }

    #[test]
    fn test_board_cleared_empties_cells() {
        let mut app = App::new();
        app.handle_event(GameEvent::CellFilled {
            position: Position::Center,
            occupant: Occupant::Ai,
        });
        app.handle_event(GameEvent::BoardCleared);
        assert!(Position::ALL.iter().all(|p| app.cell(*p).is_empty()));
    }
}
