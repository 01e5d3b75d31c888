use std::{fs::OpenOptions, io::Stdout, sync::Mutex, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use todos::{
    application::{todo_service::TodoService, todo_storage::TodoStorage},
    config::AppConfig,
    domain::kv_store::KeyValueStore,
    infrastructure::sqlite_kv::SqliteKeyValueStore,
    ui::{self, App},
};

const TICK_RATE: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config)?;
    tracing::info!(database_url = %config.database_url, key = %config.storage_key, "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = session(&mut terminal, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let app = res?;
    app.into_service().shutdown().await;
    tracing::info!("shutdown");
    Ok(())
}

/// Shows the loading screen while the stored list is read, then runs the UI until quit.
async fn session(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: &AppConfig) -> Result<App> {
    terminal.draw(|f| ui::render_loading(f))?;

    let kv = SqliteKeyValueStore::connect(&config.database_url).await?;
    kv.init().await?;
    let (service, notice) = TodoService::start(TodoStorage::with_key(kv, config.storage_key.clone())).await;

    let mut app = App::new(service, notice);
    run_app(terminal, &mut app)?;
    Ok(app)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| ui::render(f, &*app))?;
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
