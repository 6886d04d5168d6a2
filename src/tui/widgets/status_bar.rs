// Status bar widget: mode tabs, roster count, latest notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{AppMode, NoticeLevel};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [mode tabs] [roster count] [latest notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(mode_spans(state.mode));

    spans.push(Span::styled(
        format!("{} in roster", state.participants.len()),
        Style::default().fg(Color::White),
    ));

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            notice.text.clone(),
            Style::default().fg(notice_color(notice.level)),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Build mode tab spans with the active mode highlighted.
/// E.g. "[m:Manage] [d:Draw] [g:Group]"
pub fn mode_spans(active: AppMode) -> Vec<Span<'static>> {
    let modes = [
        (AppMode::Manage, "m:Manage"),
        (AppMode::LuckyDraw, "d:Draw"),
        (AppMode::Grouping, "g:Group"),
    ];

    let mut spans = Vec::new();
    for (mode, label) in modes {
        let style = if mode == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Color for a notice level.
pub fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Gray,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Notice;

    #[test]
    fn mode_spans_highlight_active() {
        let spans = mode_spans(AppMode::LuckyDraw);
        // 0=[m:Manage], 1=" ", 2=[d:Draw]
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn mode_spans_contain_all_labels() {
        let spans = mode_spans(AppMode::Manage);
        let labels: Vec<&str> = spans
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 0)
            .map(|(_, s)| s.content.as_ref())
            .collect();
        assert_eq!(labels, vec!["[m:Manage]", "[d:Draw]", "[g:Group]"]);
    }

    #[test]
    fn notice_colors() {
        assert_eq!(notice_color(NoticeLevel::Info), Color::Gray);
        assert_eq!(notice_color(NoticeLevel::Success), Color::Green);
        assert_eq!(notice_color(NoticeLevel::Error), Color::Red);
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_notice() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.notice = Some(Notice::error("Roster is empty"));
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
