// Text input overlay widget.
//
// Renders a centered single-line input box while a text entry is active
// (name paste, import path, grouping target).

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::{InputMode, ViewState};

const DIALOG_HEIGHT: u16 = 3;

/// Render the input overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let width = (area.width.saturating_sub(4)).min(60).max(20);
    let dialog_area = centered_rect(width, DIALOG_HEIGHT, area);

    frame.render_widget(Clear, dialog_area);

    let title = match state.input_mode {
        InputMode::PasteNames => " Add names (comma or newline separated) ",
        InputMode::ImportPath => " CSV file path ",
        InputMode::GroupValue => " Grouping target ",
        InputMode::None => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let text = Line::from(vec![
        Span::raw(" "),
        Span::raw(state.input_buffer.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Compute a centered rectangle of the given size within `area`,
/// clamped to the available space.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
