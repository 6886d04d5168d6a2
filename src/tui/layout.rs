// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +------------------+-------------------------------+
// | Roster Panel     | Main Panel (65%)              |
// | (35%)            | (mode-dependent content)      |
// +------------------+-------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: mode tabs, roster count, latest notice.
    pub status_bar: Rect,
    /// Left column: the roster list, visible in every mode.
    pub roster_panel: Rect,
    /// Right column: content for the active mode (manage, draw, grouping).
    pub main_panel: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
///
/// Fixed single-row bars at the top and bottom, with the remaining space
/// split between the roster column and the mode panel.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: roster column (35%) | main panel (65%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(middle);

    AppLayout {
        status_bar,
        roster_panel: horizontal[0],
        main_panel: horizontal[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
