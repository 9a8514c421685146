// Scoreboard entry point.
//
// Startup sequence:
// 1. Load config (writes config/scoreboard.toml from defaults on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Create mpsc channels
// 4. Spawn app logic task
// 5. Run the TUI until the user quits
// 6. Cleanup on exit

use scoreboard_tui::app;
use scoreboard_tui::config::{self, LoggingConfig};
use scoreboard_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!("Scoreboard starting up");
    info!(
        "Config loaded: high_score_wins={}, render every {}ms",
        config.game.high_score_wins, config.tui.render_interval_ms
    );

    // 3. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 4. Spawn app logic task
    let render_interval = config.render_interval();
    let app_state = app::AppState::new(config);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 5. Run the TUI event loop (blocking until user quits)
    let tui_result = tui::run(ui_rx, cmd_tx, render_interval).await;
    if let Err(e) = &tui_result {
        error!("TUI error: {:#}", e);
    }

    // 6. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Scoreboard shut down cleanly");
    tui_result
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&logging.directory);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("scoreboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
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
