// TUI frontend: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc channel;
// the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashSet;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyModifiers};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::config::GroupingConfig;
use crate::draw::{DrawPhase, WinnerRecord};
use crate::grouping::{GroupingMode, Team};
use crate::protocol::{AppMode, Notice, UiUpdate, UserCommand};
use crate::roster::Participant;

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Which modal text input is active, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    None,
    /// Free-form name entry (newline/comma separated).
    PasteNames,
    /// Path to a CSV file to import.
    ImportPath,
    /// Numeric value for the grouping target (size or count).
    GroupValue,
}

/// Pending action awaiting a y/n confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Quit,
    ClearRoster,
    ResetDraw,
}

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the screen.
pub struct ViewState {
    /// Active mode (manage, lucky draw, grouping).
    pub mode: AppMode,
    /// Current roster, in insertion order.
    pub participants: Vec<Participant>,
    /// Names appearing more than once in the roster.
    pub duplicates: HashSet<String>,
    /// Index of the highlighted roster row.
    pub selected: usize,
    /// Draw state machine phase.
    pub draw_phase: DrawPhase,
    /// Name flashing on the stage during a spin.
    pub spin_name: Option<String>,
    /// Most recent winner, shown on the stage when settled.
    pub last_winner: Option<String>,
    /// Winner log, newest first.
    pub winners: Vec<WinnerRecord>,
    /// Remaining draw pool size.
    pub pool_len: usize,
    /// Whether settled winners stay eligible.
    pub allow_repeat: bool,
    /// Scroll offset into the winner log.
    pub winner_scroll: usize,
    /// Last grouping result.
    pub teams: Vec<Team>,
    /// Grouping target interpretation: team count vs. team size.
    pub group_by_count: bool,
    /// Members-per-team target for size mode.
    pub group_size: usize,
    /// Team-count target for count mode.
    pub group_count: usize,
    /// Active modal text input.
    pub input_mode: InputMode,
    /// Buffer for the active text input.
    pub input_buffer: String,
    /// Pending confirmation dialog.
    pub confirm: Option<ConfirmAction>,
    /// Latest notice from the orchestrator.
    pub notice: Option<Notice>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            mode: AppMode::Manage,
            participants: Vec::new(),
            duplicates: HashSet::new(),
            selected: 0,
            draw_phase: DrawPhase::Idle,
            spin_name: None,
            last_winner: None,
            winners: Vec::new(),
            pool_len: 0,
            allow_repeat: false,
            winner_scroll: 0,
            teams: Vec::new(),
            group_by_count: false,
            group_size: 2,
            group_count: 2,
            input_mode: InputMode::None,
            input_buffer: String::new(),
            confirm: None,
            notice: None,
        }
    }
}

impl ViewState {
    /// Seed the grouping targets from the config defaults.
    pub fn with_defaults(defaults: &GroupingConfig) -> Self {
        ViewState {
            group_size: defaults.default_size,
            group_count: defaults.default_count,
            ..ViewState::default()
        }
    }

    /// The grouping mode implied by the current target settings.
    pub fn grouping_mode(&self) -> GroupingMode {
        if self.group_by_count {
            GroupingMode::ByCount(self.group_count)
        } else {
            GroupingMode::BySize(self.group_size)
        }
    }

    /// The target value for the active grouping interpretation.
    pub fn group_value(&self) -> usize {
        if self.group_by_count {
            self.group_count
        } else {
            self.group_size
        }
    }

    /// Write a new target value for the active grouping interpretation.
    pub fn set_group_value(&mut self, value: usize) {
        if self.group_by_count {
            self.group_count = value;
        } else {
            self.group_size = value;
        }
    }

    /// Id of the highlighted roster row, if the roster is non-empty.
    pub fn selected_id(&self) -> Option<String> {
        self.participants.get(self.selected).map(|p| p.id.clone())
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Mode(mode) => {
            state.mode = mode;
        }
        UiUpdate::Roster(view) => {
            state.participants = view.participants;
            state.duplicates = view.duplicates;
            if state.selected >= state.participants.len() {
                state.selected = state.participants.len().saturating_sub(1);
            }
        }
        UiUpdate::Draw(view) => {
            state.draw_phase = view.phase;
            state.pool_len = view.pool_len;
            state.allow_repeat = view.allow_repeat;
            state.last_winner = view.last_winner;
            state.winners = view.winners;
            if state.draw_phase != DrawPhase::Spinning {
                state.spin_name = None;
            }
        }
        UiUpdate::SpinTick(name) => {
            state.spin_name = Some(name);
        }
        UiUpdate::Teams(view) => {
            state.teams = view.teams;
        }
        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame for the active mode.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::roster_list::render(frame, layout.roster_panel, state);
    render_main_panel(frame, &layout, state);
    render_help_bar(frame, layout.help_bar, state);

    if state.input_mode != InputMode::None {
        widgets::input_box::render(frame, frame.area(), state);
    }
    if state.confirm.is_some() {
        widgets::confirm::render(frame, frame.area(), state);
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.mode {
        AppMode::Manage => render_manage_panel(frame, layout, state),
        AppMode::LuckyDraw => {
            // Stage on top, winner log below.
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(layout.main_panel);
            widgets::draw_stage::render(frame, split[0], state);
            widgets::winner_log::render(frame, split[1], state);
        }
        AppMode::Grouping => widgets::teams::render(frame, layout.main_panel, state),
    }
}

fn render_manage_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let dup_count = state.duplicates.len();
    let mut lines = vec![
        Line::from(format!("{} participants", state.participants.len())),
        Line::from(if dup_count == 0 {
            Span::raw("No duplicate names")
        } else {
            Span::styled(
                format!("{dup_count} duplicate names (press u to deduplicate)"),
                Style::default().fg(Color::Yellow),
            )
        }),
        Line::from(""),
        Line::from("a: add names    i: import CSV    s: sample roster"),
        Line::from("x: remove selected    u: dedupe    c: clear all"),
    ];
    if state.participants.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Add participants to unlock the draw and grouping modes.",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Manage"));
    frame.render_widget(paragraph, layout.main_panel);
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let text = match state.mode {
        AppMode::Manage => " m/d/g:Mode | a:Add | i:Import | s:Sample | u:Dedupe | c:Clear | x:Remove | q:Quit",
        AppMode::LuckyDraw => " m/d/g:Mode | Enter:Draw | r:Reset | t:Toggle repeat | q:Quit",
        AppMode::Grouping => " m/d/g:Mode | Enter:Group | b:Size/Count | n:Target | e:Export | q:Quit",
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    grouping_defaults: GroupingConfig,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal even if a render panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::with_defaults(&grouping_defaults);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down.
                        break;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        // Ctrl+C always quits, regardless of modal state.
                        if key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(KeyModifiers::CONTROL)
                        {
                            let _ = cmd_tx.send(UserCommand::Quit).await;
                            break;
                        }
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quitting = matches!(cmd, UserCommand::Quit);
                            let _ = cmd_tx.send(cmd).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events are ignored.
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
