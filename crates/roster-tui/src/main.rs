// roster-draw entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load and validate config (writing defaults on first run)
// 3. Build the ingestion pipeline
// 4. Run the TUI until the user quits

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use roster_core::config;
use roster_tui::app::AppState;
use roster_tui::tui;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("roster-draw starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: rosters in {}, sliders 0..={}",
        config.roster.directory.display(),
        config.sampling.slider_max
    );

    let app = AppState::new(config).context("failed to build ingestion pipeline")?;
    tui::run(app).context("TUI error")?;

    info!("roster-draw shut down cleanly");
    Ok(())
}

/// Directory for log files: the platform data dir when one exists, otherwise
/// `./logs`.
fn log_dir() -> anyhow::Result<PathBuf> {
    match directories::ProjectDirs::from("", "", "roster-draw") {
        Some(dirs) => Ok(dirs.data_local_dir().join("logs")),
        None => Ok(std::env::current_dir()?.join("logs")),
    }
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("roster-draw.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roster_core=info,roster_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
