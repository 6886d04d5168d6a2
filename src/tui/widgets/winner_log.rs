// Winner log widget: newest-first list of settled draws.
//
// Each row: "#{n} {time} {name}", where #1 is the most recent winner.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::draw::WinnerRecord;
use crate::tui::ViewState;

/// Render the winner log into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Winners ({})", state.winners.len());

    if state.winners.is_empty() {
        let paragraph = Paragraph::new("  No winners yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height as usize).saturating_sub(2).max(1);
    let max_offset = state.winners.len().saturating_sub(visible_rows);
    let offset = state.winner_scroll.min(max_offset);

    let items: Vec<ListItem> = state
        .winners
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, record)| {
            let color = if i == 0 { Color::Green } else { Color::White };
            ListItem::new(Line::from(Span::styled(
                format_record(i, record),
                Style::default().fg(color),
            )))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

/// Format a single winner row. `index` is the position in the newest-first
/// log, so 0 is the latest winner.
pub fn format_record(index: usize, record: &WinnerRecord) -> String {
    format!(
        "#{} {} {}",
        index + 1,
        record.timestamp.format("%H:%M:%S"),
        record.name
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
