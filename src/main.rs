use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use logic_drill::app::App;
use logic_drill::bank::QuestionCatalog;
use logic_drill::config::Config;
use logic_drill::engine::Mode;
use logic_drill::event::{AppEvent, EventHandler};
use logic_drill::provider::LogicProvider;
use logic_drill::session::{SessionController, SessionCounts};
use logic_drill::settings::Language;
use logic_drill::store::json_store::JsonStore;
use logic_drill::ui;

#[derive(Parser)]
#[command(name = "logic-drill", version, about = "Adaptive logic-reasoning drills in the terminal")]
struct Cli {
    #[arg(short, long, help = "Questions per session (5-50)")]
    questions: Option<u32>,

    #[arg(short = 's', long, help = "Seconds per question (10-120)")]
    time: Option<u32>,

    #[arg(short, long, help = "Question and interface language (en, id)")]
    language: Option<String>,

    #[arg(short, long, help = "Theme name (dark, light)")]
    theme: Option<String>,

    #[arg(short, long, help = "Start a session right away: mix, syllogism, fallacy, deduction, induction")]
    mode: Option<Mode>,

    #[arg(long, help = "Directory for saved stats and settings")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Reset all skill stats before starting")]
    reset_stats: bool,
}

fn init_logging(config: &Config) -> Result<()> {
    if !config.log_to_file {
        return Ok(());
    }
    std::fs::create_dir_all(config.data_path())?;
    let path = config.data_path().join("logic-drill.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let filter = EnvFilter::try_from_env("LOGIC_DRILL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("logic_drill=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_init().unwrap_or_else(|e| {
        eprintln!("using default config: {e:#}");
        Config::default()
    });
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Err(e) = init_logging(&config) {
        eprintln!("logging disabled: {e:#}");
    }

    let store = match JsonStore::new(config.data_path()) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!("progress will not be saved: {e:#}");
            None
        }
    };
    let provider = LogicProvider::new(
        Box::new(QuestionCatalog::embedded()),
        config.question_fallback,
    );
    let mut controller = SessionController::new(Box::new(provider), store, &config);
    controller.set_on_complete(Box::new(|counts: &SessionCounts| {
        tracing::info!(
            correct = counts.correct,
            wrong = counts.wrong,
            accuracy = counts.accuracy(),
            "summary shown"
        );
    }));

    if cli.questions.is_some() || cli.time.is_some() || cli.language.is_some() {
        let mut settings = controller.settings().clone();
        if let Some(questions) = cli.questions {
            settings.question_count = questions;
        }
        if let Some(time) = cli.time {
            settings.time_limit_seconds = time;
        }
        if let Some(code) = cli.language.as_deref() {
            match Language::from_code(code) {
                Some(language) => settings.language = language,
                None => anyhow::bail!("unknown language {code:?}, expected en or id"),
            }
        }
        controller.apply_settings(settings);
    }
    if cli.reset_stats {
        controller.reset_stats();
    }

    let mut app = App::new(controller, &config);
    if let Some(name) = cli.theme.as_deref()
        && !app.set_theme(name)
    {
        anyhow::bail!("unknown theme {name:?}");
    }
    if let Some(mode) = cli.mode {
        app.controller.start_session(mode);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("exiting after error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
