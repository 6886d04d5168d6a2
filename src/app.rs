// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI and
// spin-timer events from spawned tasks. Owns the roster, the draw session,
// and the last grouping result, and pushes immutable view snapshots to the
// TUI render loop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::csv_io;
use crate::draw::{DrawEngine, DrawError};
use crate::grouping::{self, GroupingMode, Team};
use crate::protocol::{
    AppMode, DrawView, GroupingView, Notice, RosterView, UiUpdate, UserCommand,
};
use crate::roster::{sample_names, Roster};

// ---------------------------------------------------------------------------
// Spin events
// ---------------------------------------------------------------------------

/// Events emitted by the spawned spin-timer task. Each carries the spin
/// generation so events from a cancelled cycle are dropped.
#[derive(Debug, Clone, Copy)]
enum SpinEvent {
    Tick { generation: u64, tick: usize },
    Elapsed { generation: u64 },
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub roster: Roster,
    pub mode: AppMode,
    /// Current draw session, created lazily when LuckyDraw mode is entered.
    pub draw: Option<DrawEngine>,
    /// Last grouping result; replaced in full on every run.
    pub teams: Vec<Team>,
    /// Carried between draw sessions so a recreated engine keeps the
    /// user's last "allow repeat" choice.
    allow_repeat: bool,
    rng: SmallRng,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let rng = SmallRng::from_os_rng();
        Self::with_rng(config, rng)
    }

    /// Construct with an explicit rng so tests can seed deterministically.
    pub fn with_rng(config: Config, rng: SmallRng) -> Self {
        let allow_repeat = config.draw.allow_repeat;
        AppState {
            config,
            roster: Roster::new(),
            mode: AppMode::Manage,
            draw: None,
            teams: Vec::new(),
            allow_repeat,
            rng,
        }
    }

    fn roster_view(&self) -> RosterView {
        RosterView {
            participants: self.roster.snapshot(),
            duplicates: self.roster.duplicate_names(),
        }
    }

    fn draw_view(&self) -> Option<DrawView> {
        self.draw.as_ref().map(|engine| DrawView {
            phase: engine.phase(),
            pool_len: engine.pool().len(),
            allow_repeat: engine.allow_repeat(),
            last_winner: engine.last_winner().map(|w| w.name.clone()),
            winners: engine.winners().to_vec(),
        })
    }

    /// Create or refresh the draw session so its snapshot matches the live
    /// roster. An unchanged roster keeps the session (pool and winner log
    /// survive mode switches).
    fn ensure_draw_session(&mut self) {
        let roster_ids: Vec<&str> = self.roster.participants().iter().map(|p| p.id.as_str()).collect();
        let stale = match &self.draw {
            Some(engine) => {
                let snapshot_ids: Vec<&str> =
                    engine.snapshot().iter().map(|p| p.id.as_str()).collect();
                snapshot_ids != roster_ids
            }
            None => true,
        };
        if stale {
            info!("starting draw session over {} participants", self.roster.len());
            self.draw = Some(DrawEngine::new(self.roster.snapshot(), self.allow_repeat));
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Listens on two channels using `tokio::select!`: user commands from the
/// TUI, and spin events from spawned timer tasks. Exits when a `Quit`
/// command arrives or the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    let (spin_tx, mut spin_rx) = mpsc::channel::<SpinEvent>(64);

    // Initial snapshots so the TUI has something to render.
    let _ = ui_tx.send(UiUpdate::Mode(state.mode)).await;
    let _ = ui_tx
        .send(UiUpdate::Roster(Box::new(state.roster_view())))
        .await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    None | Some(UserCommand::Quit) => {
                        info!("app loop shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_command(&mut state, cmd, &ui_tx, &spin_tx).await;
                    }
                }
            }

            event = spin_rx.recv() => {
                if let Some(event) = event {
                    handle_spin_event(&mut state, event, &ui_tx).await;
                }
            }
        }
    }

    Ok(())
}

async fn handle_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
    spin_tx: &mpsc::Sender<SpinEvent>,
) {
    match cmd {
        UserCommand::SwitchMode(mode) => {
            switch_mode(state, mode, ui_tx).await;
        }

        UserCommand::PasteNames(text) => {
            let names = csv_io::parse_pasted_names(&text);
            let added = state.roster.add(names);
            let notice = if added == 0 {
                Notice::info("No usable names in input")
            } else {
                Notice::success(format!("Added {added} participants"))
            };
            push_roster(state, ui_tx).await;
            let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
        }

        UserCommand::GenerateSample => {
            state.roster.clear();
            let added = state.roster.add(sample_names());
            push_roster(state, ui_tx).await;
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::success(format!(
                    "Generated a sample roster of {added} (includes one duplicate)"
                ))))
                .await;
        }

        UserCommand::RemoveParticipant(id) => {
            if state.roster.remove(&id) {
                push_roster(state, ui_tx).await;
            } else {
                debug!("remove for unknown participant id {id}");
            }
        }

        UserCommand::ClearRoster => {
            state.roster.clear();
            push_roster(state, ui_tx).await;
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::success("Roster cleared")))
                .await;
        }

        UserCommand::Dedupe => {
            let removed = state.roster.dedupe();
            push_roster(state, ui_tx).await;
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::success(format!(
                    "Removed {removed} duplicate names; {} remain",
                    state.roster.len()
                ))))
                .await;
        }

        UserCommand::ImportCsv(path) => {
            import_csv(state, &path, ui_tx).await;
        }

        UserCommand::SetAllowRepeat(allow) => {
            state.allow_repeat = allow;
            if let Some(engine) = state.draw.as_mut() {
                engine.set_allow_repeat(allow);
            }
            push_draw(state, ui_tx).await;
        }

        UserCommand::StartDraw => {
            start_draw(state, ui_tx, spin_tx).await;
        }

        UserCommand::ResetDraw => {
            if let Some(engine) = state.draw.as_mut() {
                engine.reset();
                push_draw(state, ui_tx).await;
                let _ = ui_tx
                    .send(UiUpdate::Notice(Notice::info(
                        "Draw pool restored and winner log cleared",
                    )))
                    .await;
            }
        }

        UserCommand::RunGrouping(mode) => {
            run_grouping(state, mode, ui_tx).await;
        }

        UserCommand::ExportTeams => {
            export_teams(state, ui_tx).await;
        }

        // Quit is consumed by the select loop before we get here.
        UserCommand::Quit => {}
    }
}

async fn switch_mode(state: &mut AppState, mode: AppMode, ui_tx: &mpsc::Sender<UiUpdate>) {
    if mode != AppMode::Manage && state.roster.is_empty() {
        let _ = ui_tx
            .send(UiUpdate::Notice(Notice::error(
                "Roster is empty -- add participants first",
            )))
            .await;
        return;
    }

    state.mode = mode;
    if mode == AppMode::LuckyDraw {
        state.ensure_draw_session();
        push_draw(state, ui_tx).await;
    }
    let _ = ui_tx.send(UiUpdate::Mode(mode)).await;
}

async fn start_draw(
    state: &mut AppState,
    ui_tx: &mpsc::Sender<UiUpdate>,
    spin_tx: &mpsc::Sender<SpinEvent>,
) {
    let Some(engine) = state.draw.as_mut() else {
        warn!("StartDraw received without a draw session");
        return;
    };

    match engine.begin_spin() {
        Ok(generation) => {
            push_draw(state, ui_tx).await;
            spawn_spin_timer(
                generation,
                state.config.draw.spin_cadence_ms,
                state.config.draw.spin_duration_ms,
                spin_tx.clone(),
            );
        }
        Err(DrawError::PoolExhausted) => {
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::error(
                    "Every participant has been drawn -- reset the pool to draw again",
                )))
                .await;
        }
        Err(DrawError::SpinInProgress) => {
            debug!("ignoring StartDraw while spinning");
        }
        Err(e) => {
            warn!("unexpected begin_spin error: {e}");
        }
    }
}

/// Spawn the cosmetic spin timer: one tick per cadence interval for the
/// configured duration, then a final elapse event that triggers settlement.
fn spawn_spin_timer(
    generation: u64,
    cadence_ms: u64,
    duration_ms: u64,
    spin_tx: mpsc::Sender<SpinEvent>,
) {
    let cadence = Duration::from_millis(cadence_ms.max(1));
    let ticks = (duration_ms / cadence_ms.max(1)) as usize;
    tokio::spawn(async move {
        for tick in 0..ticks {
            tokio::time::sleep(cadence).await;
            if spin_tx
                .send(SpinEvent::Tick { generation, tick })
                .await
                .is_err()
            {
                return;
            }
        }
        let _ = spin_tx.send(SpinEvent::Elapsed { generation }).await;
    });
}

async fn handle_spin_event(
    state: &mut AppState,
    event: SpinEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match event {
        SpinEvent::Tick { generation, tick } => {
            let Some(engine) = state.draw.as_ref() else {
                return;
            };
            // Stale ticks from a cancelled cycle are silently dropped.
            if generation != engine.current_generation() {
                return;
            }
            if let Some(name) = engine.candidate(tick) {
                let _ = ui_tx.send(UiUpdate::SpinTick(name.to_string())).await;
            }
        }

        SpinEvent::Elapsed { generation } => {
            let Some(engine) = state.draw.as_mut() else {
                return;
            };
            match engine.settle(generation, &mut state.rng) {
                Ok(record) => {
                    info!("draw settled: {} ({})", record.name, record.participant_id);
                    push_draw(state, ui_tx).await;
                    let _ = ui_tx
                        .send(UiUpdate::Notice(Notice::success(format!(
                            "Winner: {}",
                            record.name
                        ))))
                        .await;
                }
                Err(DrawError::StaleSpin { .. }) => {
                    // A reset or restart superseded this cycle; nothing to do.
                }
                Err(e) => {
                    warn!("draw settlement aborted: {e}");
                    push_draw(state, ui_tx).await;
                    let _ = ui_tx
                        .send(UiUpdate::Notice(Notice::error(format!(
                            "Draw aborted: {e}"
                        ))))
                        .await;
                }
            }
        }
    }
}

async fn import_csv(state: &mut AppState, path: &Path, ui_tx: &mpsc::Sender<UiUpdate>) {
    // The file is read in full before any names are merged; there is no
    // partial import.
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::error(format!(
                    "Could not read {}: {e}",
                    path.display()
                ))))
                .await;
            return;
        }
    };

    let names = match csv_io::parse_roster_csv(text.as_bytes()) {
        Ok(names) => names,
        Err(e) => {
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::error(format!(
                    "Could not parse {}: {e}",
                    path.display()
                ))))
                .await;
            return;
        }
    };

    let added = state.roster.add(names);
    push_roster(state, ui_tx).await;
    let notice = if added == 0 {
        Notice::info("CSV contained no usable names")
    } else {
        Notice::success(format!("Imported {added} names from CSV"))
    };
    let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
}

async fn run_grouping(state: &mut AppState, mode: GroupingMode, ui_tx: &mpsc::Sender<UiUpdate>) {
    if state.roster.is_empty() {
        let _ = ui_tx
            .send(UiUpdate::Notice(Notice::error(
                "Roster is empty -- nothing to group",
            )))
            .await;
        return;
    }

    let snapshot = state.roster.snapshot();
    state.teams = grouping::perform_grouping(&snapshot, mode, &mut state.rng);
    let team_count = state.teams.len();
    info!("grouped {} participants into {} teams", snapshot.len(), team_count);

    let _ = ui_tx
        .send(UiUpdate::Teams(Box::new(GroupingView {
            teams: state.teams.clone(),
        })))
        .await;
    let _ = ui_tx
        .send(UiUpdate::Notice(Notice::success(format!(
            "Grouped {} participants into {team_count} teams",
            snapshot.len()
        ))))
        .await;
}

async fn export_teams(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    if state.teams.is_empty() {
        let _ = ui_tx
            .send(UiUpdate::Notice(Notice::error("No grouping result to export")))
            .await;
        return;
    }

    let bytes = match csv_io::encode_teams(&state.teams) {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::error(format!("Export failed: {e}"))))
                .await;
            return;
        }
    };

    let file_name = csv_io::export_file_name(chrono::Local::now().date_naive());
    let path = PathBuf::from(&state.config.export.dir).join(file_name);
    match tokio::fs::write(&path, bytes).await {
        Ok(()) => {
            info!("exported grouping result to {}", path.display());
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::success(format!(
                    "Exported to {}",
                    path.display()
                ))))
                .await;
        }
        Err(e) => {
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::error(format!(
                    "Could not write {}: {e}",
                    path.display()
                ))))
                .await;
        }
    }
}

async fn push_roster(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::Roster(Box::new(state.roster_view())))
        .await;
}

async fn push_draw(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(view) = state.draw_view() {
        let _ = ui_tx.send(UiUpdate::Draw(Box::new(view))).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawPhase;

    fn test_state() -> AppState {
        AppState::with_rng(Config::default(), SmallRng::seed_from_u64(9))
    }

    /// Spawn the app loop and return its channel handles.
    fn spawn_app(
        state: AppState,
    ) -> (
        mpsc::Sender<UserCommand>,
        mpsc::Receiver<UiUpdate>,
        tokio::task::JoinHandle<anyhow::Result<()>>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (ui_tx, ui_rx) = mpsc::channel(1024);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));
        (cmd_tx, ui_rx, handle)
    }

    /// Drain updates until one matches the predicate, with a hard cap so a
    /// missing update fails the test instead of hanging it.
    async fn wait_for<F>(ui_rx: &mut mpsc::Receiver<UiUpdate>, mut pred: F) -> UiUpdate
    where
        F: FnMut(&UiUpdate) -> bool,
    {
        for _ in 0..500 {
            let update = ui_rx.recv().await.expect("ui channel closed early");
            if pred(&update) {
                return update;
            }
        }
        panic!("expected update never arrived");
    }

    #[tokio::test(start_paused = true)]
    async fn paste_then_mode_switch_and_quit() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx
            .send(UserCommand::PasteNames("A\nB,C".into()))
            .await
            .unwrap();
        let update = wait_for(&mut ui_rx, |u| {
            matches!(u, UiUpdate::Roster(view) if !view.participants.is_empty())
        })
        .await;
        if let UiUpdate::Roster(view) = update {
            assert_eq!(view.participants.len(), 3);
        }

        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::LuckyDraw))
            .await
            .unwrap();
        wait_for(&mut ui_rx, |u| matches!(u, UiUpdate::Mode(AppMode::LuckyDraw))).await;

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn mode_switch_refused_on_empty_roster() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::Grouping))
            .await
            .unwrap();
        let update = wait_for(&mut ui_rx, |u| matches!(u, UiUpdate::Notice(_))).await;
        if let UiUpdate::Notice(notice) = update {
            assert_eq!(notice.level, crate::protocol::NoticeLevel::Error);
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn draw_settles_after_spin_duration() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx
            .send(UserCommand::PasteNames("A,B,C".into()))
            .await
            .unwrap();
        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::LuckyDraw))
            .await
            .unwrap();
        cmd_tx.send(UserCommand::StartDraw).await.unwrap();

        // The paused clock auto-advances through the spin timer; the draw
        // must eventually settle with one winner and a shrunken pool.
        let update = wait_for(&mut ui_rx, |u| {
            matches!(u, UiUpdate::Draw(view) if view.phase == DrawPhase::Settled)
        })
        .await;
        if let UiUpdate::Draw(view) = update {
            assert_eq!(view.winners.len(), 1);
            assert_eq!(view.pool_len, 2);
            assert!(view.last_winner.is_some());
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn spin_ticks_are_emitted_before_settlement() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx.send(UserCommand::PasteNames("A,B".into())).await.unwrap();
        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::LuckyDraw))
            .await
            .unwrap();
        cmd_tx.send(UserCommand::StartDraw).await.unwrap();

        wait_for(&mut ui_rx, |u| matches!(u, UiUpdate::SpinTick(_))).await;

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_spin_cancels_settlement() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx.send(UserCommand::PasteNames("A,B,C".into())).await.unwrap();
        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::LuckyDraw))
            .await
            .unwrap();
        cmd_tx.send(UserCommand::StartDraw).await.unwrap();
        wait_for(&mut ui_rx, |u| {
            matches!(u, UiUpdate::Draw(view) if view.phase == DrawPhase::Spinning)
        })
        .await;

        // Reset immediately; the pending elapse must not settle a winner.
        cmd_tx.send(UserCommand::ResetDraw).await.unwrap();
        wait_for(&mut ui_rx, |u| {
            matches!(u, UiUpdate::Draw(view) if view.phase == DrawPhase::Idle)
        })
        .await;

        // Run a full grouping afterwards to force the loop to process any
        // leftover spin events, then confirm no winner ever appeared.
        cmd_tx
            .send(UserCommand::RunGrouping(GroupingMode::ByCount(1)))
            .await
            .unwrap();
        wait_for(&mut ui_rx, |u| matches!(u, UiUpdate::Teams(_))).await;

        cmd_tx.send(UserCommand::StartDraw).await.unwrap();
        let update = wait_for(&mut ui_rx, |u| {
            matches!(u, UiUpdate::Draw(view) if view.phase == DrawPhase::Settled)
        })
        .await;
        if let UiUpdate::Draw(view) = update {
            // Only the post-reset draw settled; the cancelled one left no record.
            assert_eq!(view.winners.len(), 1);
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn grouping_produces_balanced_teams() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx
            .send(UserCommand::PasteNames("A,B,C,D,E".into()))
            .await
            .unwrap();
        cmd_tx
            .send(UserCommand::RunGrouping(GroupingMode::BySize(2)))
            .await
            .unwrap();

        let update = wait_for(&mut ui_rx, |u| matches!(u, UiUpdate::Teams(_))).await;
        if let UiUpdate::Teams(view) = update {
            assert_eq!(view.teams.len(), 3);
            let mut sizes: Vec<_> = view.teams.iter().map(|t| t.members.len()).collect();
            sizes.sort_unstable();
            assert_eq!(sizes, vec![1, 2, 2]);
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn export_without_grouping_is_an_error_notice() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx.send(UserCommand::ExportTeams).await.unwrap();
        let update = wait_for(&mut ui_rx, |u| matches!(u, UiUpdate::Notice(_))).await;
        if let UiUpdate::Notice(notice) = update {
            assert_eq!(notice.level, crate::protocol::NoticeLevel::Error);
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn roster_edit_refreshes_draw_session_on_reentry() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx.send(UserCommand::PasteNames("A,B".into())).await.unwrap();
        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::LuckyDraw))
            .await
            .unwrap();
        let update = wait_for(&mut ui_rx, |u| matches!(u, UiUpdate::Draw(_))).await;
        if let UiUpdate::Draw(view) = update {
            assert_eq!(view.pool_len, 2);
        }

        // Back to manage, grow the roster, re-enter the draw: the session
        // is rebuilt from the new snapshot.
        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::Manage))
            .await
            .unwrap();
        cmd_tx.send(UserCommand::PasteNames("C".into())).await.unwrap();
        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::LuckyDraw))
            .await
            .unwrap();
        let update = wait_for(&mut ui_rx, |u| {
            matches!(u, UiUpdate::Draw(view) if view.pool_len == 3)
        })
        .await;
        if let UiUpdate::Draw(view) = update {
            assert!(view.winners.is_empty());
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn allow_repeat_toggle_reaches_engine() {
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state());

        cmd_tx.send(UserCommand::PasteNames("A,B".into())).await.unwrap();
        cmd_tx
            .send(UserCommand::SwitchMode(AppMode::LuckyDraw))
            .await
            .unwrap();
        cmd_tx.send(UserCommand::SetAllowRepeat(true)).await.unwrap();

        let update = wait_for(&mut ui_rx, |u| {
            matches!(u, UiUpdate::Draw(view) if view.allow_repeat)
        })
        .await;
        if let UiUpdate::Draw(view) = update {
            assert_eq!(view.pool_len, 2);
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }
}
