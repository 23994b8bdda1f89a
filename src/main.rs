mod app;
mod config;
mod domain;
mod input;
mod logging;
mod notifications;
mod persistence;
mod pomodoro;
mod report;
mod store;
mod ticker;
mod ui;
mod voice;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notifications::DesktopNotifier;
use persistence::{init_local_data_dir, load_state, FileStorage};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use store::TaskStore;
use tracing::{error, info};
use voice::{FfmpegRecorder, VoiceBridge};

#[derive(Parser)]
#[command(name = "taskipin")]
#[command(about = "A terminal task manager with groups, a Pomodoro timer and voice commands", long_about = None)]
struct Cli {
    /// Data directory. Defaults to a local .taskipin, else ~/.taskipin
    #[arg(long, global = true, env = "TASKIPIN_DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL of the speech/chat API
    #[arg(long, global = true, env = "TASKIPIN_API_BASE")]
    api_base: Option<String>,

    /// Recorder command line; `{output}` is replaced with the audio file path
    #[arg(long, global = true, env = "TASKIPIN_RECORDER")]
    recorder: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .taskipin directory in the current directory
    Init,
    /// Print the completion history as markdown, grouped by day
    History {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_data_dir()?;
            println!("Initialized TaskiPin directory: {}", data_dir.display());
            println!();
            println!("TaskiPin will now use this local directory for its data.");
            println!("Run 'taskipin' to start.");
            Ok(())
        }
        Some(Commands::History { output }) => {
            let config = resolve_config(&cli.data_dir, &cli.api_base, &cli.recorder)?;
            let state = load_state(&FileStorage::new(&config.data_dir));
            match output {
                Some(path) => {
                    report::write_history_report(&state.history, &path)?;
                    println!("History written: {}", path.display());
                }
                None => print!("{}", report::render_history(&state.history)),
            }
            Ok(())
        }
        None => {
            let config = resolve_config(&cli.data_dir, &cli.api_base, &cli.recorder)?;
            run_tui(config)
        }
    }
}

fn resolve_config(
    data_dir: &Option<PathBuf>,
    api_base: &Option<String>,
    recorder: &Option<String>,
) -> Result<Config> {
    Config::resolve(data_dir.as_deref(), api_base.as_deref(), recorder.as_deref())
}

fn run_tui(config: Config) -> Result<()> {
    logging::init_logging(&config.data_dir)?;
    info!(data_dir = %config.data_dir.display(), "starting taskipin");

    let store = TaskStore::open(Box::new(FileStorage::new(&config.data_dir)));
    let recorder = FfmpegRecorder::from_command_line(&config.recorder_command)
        .context("Recorder command is empty")?;
    let mut app = App::new(
        store,
        Box::new(DesktopNotifier::new()),
        VoiceBridge::new(Box::new(recorder)),
        config.api_base,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Every mutation is already persisted; just report errors
    if let Err(err) = &result {
        error!(error = %err, "event loop failed");
        eprintln!("Error: {}", err);
    }
    info!("taskipin exited");

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        // Pomodoro countdown, voice results, status expiry
        app.tick();
    }
}
