// Draw stage widget: the name currently on stage.
//
// Idle: a prompt to start. Spinning: the cycling candidate name. Settled:
// the winner, highlighted.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::draw::DrawPhase;
use crate::tui::ViewState;

/// Render the draw stage into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let repeat = if state.allow_repeat { "on" } else { "off" };
    let title = format!("Lucky Draw -- pool {} -- repeat {}", state.pool_len, repeat);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (name, style) = stage_line(state);

    // Vertically center the stage name inside the panel.
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(inner);

    let paragraph = Paragraph::new(Line::from(Span::styled(name, style)))
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, rows[1]);
}

/// Text and style for the stage, by phase.
pub fn stage_line(state: &ViewState) -> (String, Style) {
    match state.draw_phase {
        DrawPhase::Idle => (
            "Press Enter to draw".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        DrawPhase::Spinning => (
            state.spin_name.clone().unwrap_or_else(|| "...".to_string()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        DrawPhase::Settled => (
            state
                .last_winner
                .clone()
                .unwrap_or_else(|| "--".to_string()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_line_idle_prompt() {
        let state = ViewState::default();
        let (text, _) = stage_line(&state);
        assert_eq!(text, "Press Enter to draw");
    }

    #[test]
    fn stage_line_spinning_shows_candidate() {
        let mut state = ViewState::default();
        state.draw_phase = DrawPhase::Spinning;
        state.spin_name = Some("陳大明".to_string());
        let (text, _) = stage_line(&state);
        assert_eq!(text, "陳大明");
    }

    #[test]
    fn stage_line_settled_shows_winner_in_green() {
        let mut state = ViewState::default();
        state.draw_phase = DrawPhase::Settled;
        state.last_winner = Some("林小華".to_string());
        let (text, style) = stage_line(&state);
        assert_eq!(text, "林小華");
        assert_eq!(style.fg, Some(Color::Green));
    }

    #[test]
    fn render_does_not_panic_in_each_phase() {
        let backend = ratatui::backend::TestBackend::new(60, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        for phase in [DrawPhase::Idle, DrawPhase::Spinning, DrawPhase::Settled] {
            let mut state = ViewState::default();
            state.draw_phase = phase;
            terminal
                .draw(|frame| render(frame, frame.area(), &state))
                .unwrap();
        }
    }

    #[test]
    fn render_does_not_panic_on_tiny_area() {
        let backend = ratatui::backend::TestBackend::new(10, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
