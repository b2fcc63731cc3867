// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Sliders (3 rows): Min | Max                       |
// +--------------------------------------------------+
// | Selection table (fill)                            |
// +--------------------------------------------------+
// | Skipped files (6 rows)                            |
// +--------------------------------------------------+
// | Message line (1 row)                              |
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Roster directory, counts, last draw time.
    pub status_bar: Rect,
    /// Min and max selection sliders side by side.
    pub sliders: Rect,
    /// The drawn team/player table.
    pub selection: Rect,
    /// Files skipped during the last ingestion pass.
    pub warnings: Rect,
    /// Latest status or error message.
    pub message: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // sliders
            Constraint::Min(5),    // selection
            Constraint::Length(6), // warnings
            Constraint::Length(1), // message
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        sliders: vertical[1],
        selection: vertical[2],
        warnings: vertical[3],
        message: vertical[4],
        help_bar: vertical[5],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
