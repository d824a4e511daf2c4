mod app;
mod handler;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use jobboard_core::{ChatSimulator, ChatSnapshot, Config, JobListing, SystemClock};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Browse a job listing with an assistant chat panel", version)]
struct Cli {
    /// Load the job listing from a JSON file instead of the built-in one
    #[arg(long)]
    job: Option<PathBuf>,

    /// Print the initial listing and chat state as JSON and exit
    #[arg(long)]
    dump_state: bool,

    /// Override the assistant reply delay from the config file
    #[arg(long)]
    reply_delay_ms: Option<u64>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    save_config: bool,
}

#[derive(Serialize)]
struct StateDump<'a> {
    job: &'a JobListing,
    chat: ChatSnapshot,
}

/// Log to a file under the config dir; stderr belongs to the terminal UI.
fn init_logging() -> Result<()> {
    let dir = Config::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let log_path = dir.join("jobboard.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("jobboard_core=info,jobboard_tui=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; the UI works without it
    if let Err(e) = init_logging() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {e:#}. Using defaults.");
        Config::new()
    });
    if let Some(ms) = cli.reply_delay_ms {
        config.reply_delay_ms = ms;
    }

    if cli.save_config {
        config.save()?;
        println!("Saved config to {}", Config::config_path()?.display());
        return Ok(());
    }

    let job = match &cli.job {
        Some(path) => JobListing::load_from_json(path)?,
        None => JobListing::sample(),
    };

    if cli.dump_state {
        let chat = ChatSimulator::from_config(SystemClock::new(), &config);
        let dump = StateDump {
            job: &job,
            chat: chat.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    tracing::info!(title = %job.title, reply_delay_ms = config.reply_delay_ms, "starting");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(config.tick_interval());
    let mut app = App::new(job, &config);

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    tracing::info!(messages = app.chat.transcript().len(), "exiting");
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
