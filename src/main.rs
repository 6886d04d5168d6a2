// HR toolkit entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Create mpsc channels
// 4. Spawn app logic task
// 5. Run the TUI event loop (blocking until the user quits)
// 6. Cleanup on exit

use hr_toolkit::app;
use hr_toolkit::config;
use hr_toolkit::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("HR toolkit starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: spin {}ms at {}ms cadence, export dir {}",
        config.draw.spin_duration_ms, config.draw.spin_cadence_ms, config.export.dir
    );

    // 3. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let grouping_defaults = config.grouping.clone();
    let app_state = app::AppState::new(config);

    // 4. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 5. Run the TUI event loop.
    // The TUI consumes ui_rx and sends commands through cmd_tx.
    // It blocks until the user presses 'q' or Ctrl+C.
    if let Err(e) = tui::run(ui_rx, cmd_tx, grouping_defaults).await {
        error!("TUI error: {}", e);
    }

    // 6. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("HR toolkit shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("hr-toolkit.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hr_toolkit=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
