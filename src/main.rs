mod app;
mod color;
mod config;
mod error;
mod event;
mod render;
mod scene;
mod ui;

use std::io;

use crossterm::{
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use app::App;
use config::Config;
use error::DeltaError;
use event::{Event, EventHandler};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn run(terminal: &mut Term, app: &mut App, events: &EventHandler) -> Result<(), DeltaError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Resize(cols, rows) => app.on_resize(cols, rows),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<(), DeltaError> {
    // Quiet by default: log lines would tear the alternate screen.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env();
    info!("Configuration: {:?}", config);

    let (cols, rows) = terminal::size()?;
    let mut app = App::new(&config, ui::field_area(Rect::new(0, 0, cols, rows)));
    if app.is_hidden() {
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let events = EventHandler::new(config.tick_rate_ms);
    let result = run(&mut terminal, &mut app, &events);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
