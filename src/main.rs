use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use skolni_mapa::app::{App, Focus};
use skolni_mapa::config::{AppConfig, CONFIG_FILE};
use skolni_mapa::data::{self, Dataset};
use skolni_mapa::{logging, ui};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

fn main() -> Result<()> {
    let config = AppConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let _log_guard = logging::init(&config.log)?;

    // Load before taking over the terminal so errors print normally
    let delimiter = config.delimiter_byte();
    let dataset = data::load_schools(&config.data.schools, &config.columns, delimiter)
        .with_context(|| format!("Failed to load school dataset {:?}", config.data.schools))?;

    // Everything after init goes through `run` so the terminal is restored
    // on any error
    let mut terminal = ratatui::init();
    let result = run(&mut terminal, dataset, &config);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(e) = &result {
        error!(error = %e, "exiting with error");
    }
    info!("bye");
    result
}

/// Keys shared by every pane, then pane-specific ones
fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if app.popup.is_some() {
                app.close_popup();
            } else {
                app.quit();
            }
        }
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),

        // Zoom works from any pane
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom(1),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom(-1),

        code if app.focus == Focus::Map => match code {
            KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
            KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
            KeyCode::Up | KeyCode::Char('k') => app.pan(0, -8),
            KeyCode::Down | KeyCode::Char('j') => app.pan(0, 8),
            _ => {}
        },

        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::PageDown => app.move_cursor(10),
        _ => {}
    }
}

/// Handle mouse events for panning, zooming and popups
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel zooms towards the mouse position
        MouseEventKind::ScrollUp => app.zoom_at(mouse.column, mouse.row, 1),
        MouseEventKind::ScrollDown => app.zoom_at(mouse.column, mouse.row, -1),
        // Horizontal scroll (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan_at(mouse.column, mouse.row, -15, 0),
        MouseEventKind::ScrollRight => app.pan_at(mouse.column, mouse.row, 15, 0),
        // Click and drag to pan, click to open a popup
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(mouse.column, mouse.row),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, dataset: Dataset, config: &AppConfig) -> Result<()> {
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let size = terminal.size()?;
    let mut app = App::new(dataset, config, size.width, size.height);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Every event is handled to completion before the next redraw
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
