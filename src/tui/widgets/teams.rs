// Teams widget: the last grouping result, one block of lines per team.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::grouping::Team;
use crate::tui::ViewState;

/// Render the grouping panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let target = if state.group_by_count {
        format!("{} teams", state.group_value())
    } else {
        format!("teams of {}", state.group_value())
    };
    let title = format!("Grouping -- target: {target}");

    if state.teams.is_empty() {
        let paragraph = Paragraph::new("  Press Enter to group the roster.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let mut lines = Vec::new();
    for team in &state.teams {
        lines.push(Line::from(Span::styled(
            format!("{} ({})", team.name, team.members.len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(member_line(team)));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

/// Comma-joined member names for one team.
pub fn member_line(team: &Team) -> String {
    let names: Vec<&str> = team.members.iter().map(|p| p.name.as_str()).collect();
    format!("  {}", names.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Participant;

    fn team(name: &str, members: &[&str]) -> Team {
        Team {
            id: String::from("team-1"),
            name: name.to_string(),
            members: members
                .iter()
                .enumerate()
                .map(|(i, n)| Participant {
                    id: format!("p{:06}", i + 1),
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn member_line_joins_names() {
        let team = team("Team 1", &["陳大明", "林小華"]);
        assert_eq!(member_line(&team), "  陳大明, 林小華");
    }

    #[test]
    fn member_line_empty_team() {
        let team = team("Team 1", &[]);
        assert_eq!(member_line(&team), "  ");
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_teams() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.teams = vec![
            team("Team 1", &["陳大明", "林小華"]),
            team("Team 2", &["張志豪"]),
        ];
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
