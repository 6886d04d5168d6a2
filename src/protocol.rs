// Shared message types between the app orchestrator and the TUI.
//
// The TUI sends `UserCommand`s over one mpsc channel; the orchestrator
// answers with `UiUpdate`s over another. All view payloads are immutable
// snapshots -- the renderer never reaches into live state.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::draw::{DrawPhase, WinnerRecord};
use crate::grouping::{GroupingMode, Team};
use crate::roster::Participant;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Top-level mode selector. LuckyDraw and Grouping are unreachable while the
/// roster is empty; the orchestrator refuses the switch with a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Manage,
    LuckyDraw,
    Grouping,
}

// ---------------------------------------------------------------------------
// Commands (TUI -> app)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SwitchMode(AppMode),
    /// Free-text paste: split on newline or comma, trimmed, empties dropped.
    PasteNames(String),
    /// Replace the roster with the built-in demo names.
    GenerateSample,
    RemoveParticipant(String),
    ClearRoster,
    Dedupe,
    /// Read a CSV file and append its first-column names to the roster.
    ImportCsv(PathBuf),
    SetAllowRepeat(bool),
    StartDraw,
    ResetDraw,
    RunGrouping(GroupingMode),
    /// Write the last grouping result to a dated CSV file.
    ExportTeams,
    Quit,
}

// ---------------------------------------------------------------------------
// Updates (app -> TUI)
// ---------------------------------------------------------------------------

/// Transient user-facing message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient user-facing message shown in the status area.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Snapshot of the roster for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterView {
    pub participants: Vec<Participant>,
    /// Names occurring 2+ times, for duplicate highlighting.
    pub duplicates: HashSet<String>,
}

/// Snapshot of the draw session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawView {
    pub phase: DrawPhase,
    pub pool_len: usize,
    pub allow_repeat: bool,
    pub last_winner: Option<String>,
    pub winners: Vec<WinnerRecord>,
}

/// Snapshot of the last grouping result for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingView {
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Mode(AppMode),
    Roster(Box<RosterView>),
    Draw(Box<DrawView>),
    /// Candidate name flashed during the cosmetic spin.
    SpinTick(String),
    Teams(Box<GroupingView>),
    Notice(Notice),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
