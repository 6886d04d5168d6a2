// Roster list widget: numbered participant list with duplicate highlighting.
//
// Visible in every mode. In manage mode the selected row is highlighted and
// drives the remove command.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::protocol::AppMode;
use crate::tui::ViewState;

/// Render the roster list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Roster ({})", state.participants.len());

    if state.participants.is_empty() {
        let paragraph = Paragraph::new("  No participants yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    // Keep the selected row visible: scroll so it fits in the viewport.
    let visible_rows = (area.height as usize).saturating_sub(2).max(1);
    let first = state
        .selected
        .saturating_sub(visible_rows.saturating_sub(1));

    let items: Vec<ListItem> = state
        .participants
        .iter()
        .enumerate()
        .skip(first)
        .take(visible_rows)
        .map(|(i, p)| {
            let mut style = if state.duplicates.contains(&p.name) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            if state.mode == AppMode::Manage && i == state.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(Span::styled(
                format!("{:>3}. {}", i + 1, p.name),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Participant;
    use std::collections::HashSet;

    fn state_with_names(names: &[&str]) -> ViewState {
        let mut state = ViewState::default();
        state.participants = names
            .iter()
            .enumerate()
            .map(|(i, name)| Participant {
                id: format!("p{:06}", i + 1),
                name: name.to_string(),
            })
            .collect();
        state
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(40, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_duplicates_and_selection() {
        let backend = ratatui::backend::TestBackend::new(40, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = state_with_names(&["陳大明", "林小華", "陳大明"]);
        state.duplicates = HashSet::from(["陳大明".to_string()]);
        state.selected = 1;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_roster_longer_than_panel() {
        let backend = ratatui::backend::TestBackend::new(40, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let names: Vec<String> = (0..50).map(|i| format!("Name{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut state = state_with_names(&refs);
        state.selected = 49;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
