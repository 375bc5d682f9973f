use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use settui::config::Config;
use settui::core::SettingKey;
use settui::i18n::Catalog;
use settui::services::{JsonFileBackend, MemoryBackend, SettingsBackend, SettingsStore};
use settui::tui::{App, DescriptionMode, KeyBindings};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Terminal editor for speech provider credentials and endpoints
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Settings document to edit (overrides the configured path)
    #[arg(long = "settings", value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Show descriptions only for the focused field
    #[arg(long = "tooltips")]
    tooltips: bool,
    /// Keep settings in memory only; nothing is written to disk
    #[arg(long = "ephemeral")]
    ephemeral: bool,
    /// Setting to focus on start, e.g. openai_api_key
    #[arg(long = "focus", value_name = "KEY")]
    focus: Option<SettingKey>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    settui::logging::init_with(
        Some(settui::logging::default_log_path()?),
        args.logging.map(Into::into),
    )?;

    let config = Config::from_path(args.config.as_deref())?;
    let catalog = match config.locale_file() {
        Some(path) => Catalog::from_path(&path).unwrap_or_else(|e| {
            warn!("Ignoring locale file {}: {e}", path.display());
            Catalog::english()
        }),
        None => Catalog::english(),
    };
    let keybindings = match config.keybindings_file() {
        Some(path) => KeyBindings::load_from_file(&path).unwrap_or_else(|e| {
            warn!("Ignoring keybindings file {}: {e}", path.display());
            KeyBindings::default()
        }),
        None => KeyBindings::default(),
    };
    for warning in keybindings.validate() {
        warn!("{warning}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("settui-worker")
        .build()?;

    let backend: Arc<dyn SettingsBackend> = if args.ephemeral {
        Arc::new(MemoryBackend::default())
    } else {
        let path = args.settings.clone().unwrap_or_else(|| config.settings_file());
        info!("Editing {}", path.display());
        Arc::new(JsonFileBackend::new(path))
    };
    let store = SettingsStore::open(backend, runtime.handle())?;

    let description_mode = if args.tooltips {
        DescriptionMode::Tooltip
    } else {
        config.description_mode
    };
    let mut app = App::new(
        &store,
        runtime.handle().clone(),
        Arc::new(catalog),
        config.theme(),
        description_mode,
    );
    app.set_keybindings(keybindings);
    app.panel_mut().set_chat_model(config.chat_model.clone());
    if let Some(key) = args.focus {
        app.panel_mut().focus_key(key);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Pending writes finish before exit
    if let Err(e) = runtime.block_on(store.shutdown()) {
        error!("Settings store did not shut down cleanly: {e}");
    }
    if let Err(e) = &res {
        error!("Error: {e}");
    }
    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key)?;
            }
        }
        app.update()?;

        if app.should_quit() {
            return Ok(());
        }
    }
}
