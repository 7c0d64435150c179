use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::info;
use pacer::{
    action::Action,
    app::App,
    config::{Config, ConfigStore, FileConfigStore},
    corpus::Difficulty,
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    timer::Clock,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use simplelog::{LevelFilter, WriteLogger};
use std::{
    error::Error,
    fs::{self, File, OpenOptions},
    io::{self, stdin, Stdout},
    path::{Path, PathBuf},
    time::Duration,
};

/// terminal typing speed test with live wpm, accuracy, and elapsed time
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a sample paragraph and watch your words per minute, accuracy, and elapsed time update with every keystroke."
)]
pub struct Cli {
    /// difficulty selected when the app opens
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// how often the event loop wakes up when no key is pressed, in milliseconds
    #[clap(short = 't', long)]
    tick_rate_ms: Option<u64>,

    /// read and write settings at this path instead of the default config location
    #[clap(long)]
    config: Option<PathBuf>,

    /// append debug logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// store the given --difficulty and --tick-rate-ms as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Stored settings with command line overrides applied
    fn resolve_config(&self, store: &impl ConfigStore) -> Config {
        store.load().merged(self.difficulty, self.tick_rate_ms)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = &cli.log_file {
        WriteLogger::init(
            LevelFilter::Debug,
            simplelog::Config::default(),
            open_log_file(path)?,
        )?;
    }

    let store = cli.config_store();
    let config = cli.resolve_config(&store);
    if cli.save_config {
        store.save(&config)?;
        info!("saved config to {}", store.path().display());
    }

    enable_raw_mode()?;
    let mut terminal = restore_on_error(enter_terminal(), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })?;

    let mut app = App::new(config.difficulty);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(config.tick_rate_ms)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Opens `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Runs `restore` when terminal setup failed half way.
fn restore_on_error<T>(result: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T, C>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        let redraw = match runner.step()? {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => true,
            AppEvent::Key(key) => match Action::from_key(key, app.input_enabled()) {
                Some(action) => {
                    dispatch(app, action);
                    true
                }
                None => false,
            },
        };

        if redraw && !app.should_quit {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}

fn dispatch(app: &mut App, action: Action) {
    match action {
        Action::Start => app.start_test(),
        Action::Reset => app.reset_test(),
        Action::NextDifficulty => app.cycle_difficulty(true),
        Action::PreviousDifficulty => app.cycle_difficulty(false),
        Action::Edit(edit) => app.on_text_changed(edit),
        Action::Quit => app.quit(),
    }
}
