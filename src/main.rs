use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::KeyCode;
use tracing::info;
use vitals::config::{self, load_config, load_config_from_path, parse_key};
use vitals::event::EventHandler;
use vitals::metrics::collector::Collector;
use vitals::scheduler::Scheduler;
use vitals::ui::TerminalSink;

#[derive(Parser)]
#[command(name = "vitals", about = "Terminal hardware monitor: CPU, memory, battery")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display refresh period in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// CPU busy-percentage averaging window in milliseconds
    #[arg(long)]
    cpu_window: Option<u64>,

    /// Power-supply directory for battery attributes
    #[arg(long)]
    battery_path: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    let quit_key = parse_key(&config.keybinds.quit).unwrap_or(KeyCode::Char('q'));

    info!("starting vitals");

    // Terminal init is the one fatal failure; everything after degrades
    // per-field instead of exiting.
    let terminal = ratatui::try_init()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let events = EventHandler::new(Duration::from_millis(config.general.refresh_rate_ms));
    let collector = Collector::new(config.general.battery_path.clone());
    let sink = TerminalSink::new(terminal);
    let mut scheduler = Scheduler::new(
        collector,
        sink,
        events,
        Duration::from_millis(config.general.cpu_sample_window_ms),
        quit_key,
    );

    let result = scheduler.run().await;

    ratatui::restore();
    info!("closing vitals");
    result
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(window) = cli.cpu_window {
        config.general.cpu_sample_window_ms = window;
    }
    if let Some(ref path) = cli.battery_path {
        config.general.battery_path = path.clone();
    }

    config
}

/// Append-only diagnostic log under the user state dir; the TUI owns
/// stdout, so nothing may log there. Logging is best-effort: if the file
/// cannot be opened the process runs without it.
fn init_logging() {
    let Some(dir) = dirs::state_dir() else {
        return;
    };
    let _ = std::fs::create_dir_all(&dir);
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("vitals.log"))
    else {
        return;
    };
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
