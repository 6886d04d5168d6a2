// Confirmation overlay widget.
//
// Renders a centered modal dialog for destructive actions (quit, clear
// roster, reset draw). Displayed on top of the main layout when
// `ViewState::confirm` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::{ConfirmAction, ViewState};

const DIALOG_WIDTH: u16 = 40;
const DIALOG_HEIGHT: u16 = 5;

/// Render the confirmation overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(action) = state.confirm else {
        return;
    };

    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);

    // Clear the area behind the dialog so it renders cleanly on top
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Confirm ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Line::from(vec![
        Span::raw(format!("  {} (", prompt(action))),
        Span::styled(
            "y",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("/"),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(")"),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

/// Prompt text for each confirmable action.
pub fn prompt(action: ConfirmAction) -> &'static str {
    match action {
        ConfirmAction::Quit => "Really quit?",
        ConfirmAction::ClearRoster => "Clear the whole roster?",
        ConfirmAction::ResetDraw => "Reset the pool and winner log?",
    }
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the dialog is clamped to the available space.
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
