// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (selection movement,
// text entry, confirmation dialogs).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::protocol::{AppMode, UserCommand};

use super::{ConfirmAction, InputMode, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator. Returns `None` when the key press was handled
/// locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Confirmation dialog: only y confirms, n/Esc cancel, everything else blocked
    if view_state.confirm.is_some() {
        return handle_confirm(key_event, view_state);
    }

    // Text input: capture printable characters and special keys
    if view_state.input_mode != InputMode::None {
        return handle_text_input(key_event, view_state);
    }

    // Mode switching works the same everywhere
    match key_event.code {
        KeyCode::Char('m') | KeyCode::Char('1') => {
            return Some(UserCommand::SwitchMode(AppMode::Manage));
        }
        KeyCode::Char('d') | KeyCode::Char('2') => {
            return Some(UserCommand::SwitchMode(AppMode::LuckyDraw));
        }
        KeyCode::Char('g') | KeyCode::Char('3') => {
            return Some(UserCommand::SwitchMode(AppMode::Grouping));
        }
        KeyCode::Char('q') => {
            view_state.confirm = Some(ConfirmAction::Quit);
            return None;
        }
        _ => {}
    }

    match view_state.mode {
        AppMode::Manage => handle_manage_key(key_event, view_state),
        AppMode::LuckyDraw => handle_draw_key(key_event, view_state),
        AppMode::Grouping => handle_grouping_key(key_event, view_state),
    }
}

fn handle_manage_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('a') => {
            view_state.input_mode = InputMode::PasteNames;
            view_state.input_buffer.clear();
            None
        }
        KeyCode::Char('i') => {
            view_state.input_mode = InputMode::ImportPath;
            view_state.input_buffer.clear();
            None
        }
        KeyCode::Char('s') => Some(UserCommand::GenerateSample),
        KeyCode::Char('u') => Some(UserCommand::Dedupe),
        KeyCode::Char('c') => {
            if !view_state.participants.is_empty() {
                view_state.confirm = Some(ConfirmAction::ClearRoster);
            }
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected = view_state.selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.participants.len().saturating_sub(1);
            view_state.selected = (view_state.selected + 1).min(last);
            None
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            view_state.selected_id().map(UserCommand::RemoveParticipant)
        }
        _ => None,
    }
}

fn handle_draw_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter | KeyCode::Char(' ') => Some(UserCommand::StartDraw),
        KeyCode::Char('r') => {
            if !view_state.winners.is_empty() {
                view_state.confirm = Some(ConfirmAction::ResetDraw);
            }
            None
        }
        KeyCode::Char('t') => Some(UserCommand::SetAllowRepeat(!view_state.allow_repeat)),
        KeyCode::Up => {
            view_state.winner_scroll = view_state.winner_scroll.saturating_sub(1);
            None
        }
        KeyCode::Down => {
            let last = view_state.winners.len().saturating_sub(1);
            view_state.winner_scroll = (view_state.winner_scroll + 1).min(last);
            None
        }
        _ => None,
    }
}

fn handle_grouping_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => Some(UserCommand::RunGrouping(view_state.grouping_mode())),
        KeyCode::Char('b') | KeyCode::Tab => {
            view_state.group_by_count = !view_state.group_by_count;
            None
        }
        KeyCode::Char('n') => {
            view_state.input_mode = InputMode::GroupValue;
            view_state.input_buffer.clear();
            None
        }
        KeyCode::Char('e') => Some(UserCommand::ExportTeams),
        _ => None,
    }
}

/// Handle key events while a confirmation dialog is open.
///
/// `y` confirms the pending action, `n` or `Esc` cancels, all other keys
/// are blocked.
fn handle_confirm(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let action = view_state.confirm.take()?;
            match action {
                ConfirmAction::Quit => Some(UserCommand::Quit),
                ConfirmAction::ClearRoster => Some(UserCommand::ClearRoster),
                ConfirmAction::ResetDraw => Some(UserCommand::ResetDraw),
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm = None;
            None
        }
        _ => None, // Block all other input
    }
}

/// Handle key events while a text input is open.
///
/// Printable characters append to the buffer, Backspace removes the last
/// character, Enter commits, Esc cancels.
fn handle_text_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::None;
            view_state.input_buffer.clear();
            None
        }
        KeyCode::Enter => commit_text_input(view_state),
        KeyCode::Backspace => {
            view_state.input_buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.input_buffer.push(c);
            None
        }
        _ => None,
    }
}

fn commit_text_input(view_state: &mut ViewState) -> Option<UserCommand> {
    let mode = view_state.input_mode;
    let buffer = std::mem::take(&mut view_state.input_buffer);
    view_state.input_mode = InputMode::None;

    match mode {
        InputMode::PasteNames => {
            if buffer.trim().is_empty() {
                None
            } else {
                Some(UserCommand::PasteNames(buffer))
            }
        }
        InputMode::ImportPath => {
            let path = buffer.trim();
            if path.is_empty() {
                None
            } else {
                Some(UserCommand::ImportCsv(PathBuf::from(path)))
            }
        }
        InputMode::GroupValue => {
            // Unparseable or zero input leaves the previous target untouched.
            if let Ok(value) = buffer.trim().parse::<usize>() {
                if value >= 1 {
                    view_state.set_group_value(value);
                }
            }
            None
        }
        InputMode::None => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
