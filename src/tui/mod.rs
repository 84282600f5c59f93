//! Terminal front end: the base page with the wizard overlay on top.
//!
//! Feature-gated behind `tui`. Launch with `sunsave wizard` (the default).

mod controls;
mod layout;
/// Application state.
pub mod runtime;
mod style;

use std::io;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::estimate::EstimationService;
use crate::overlay::{ResourceGuard, Route, ScopedResource};
use crate::wizard::InputParameters;
use runtime::App;

/// How long to wait for input before checking for finished runs.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Raw mode, alternate screen and mouse capture, held for the UI's lifetime.
struct TerminalScreen;

impl ScopedResource for TerminalScreen {
    fn engage(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        let screen = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let raw = disable_raw_mode();
        screen.and(raw)
    }
}

/// Runs the interactive wizard until the user quits.
///
/// Must be called inside a tokio runtime context: estimation runs are
/// spawned onto it while this thread drives the UI. The terminal is restored
/// on every exit path.
///
/// # Errors
///
/// Returns terminal I/O errors.
pub fn run<S>(service: S, defaults: InputParameters, route: Route) -> io::Result<()>
where
    S: EstimationService + Clone + Send + Sync + 'static,
{
    let screen = ResourceGuard::acquire(TerminalScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(service, defaults, route);
    let result = event_loop(&mut terminal, &mut app);
    drop(app);

    let _ = terminal.show_cursor();
    screen.release()?;
    result
}

/// Core event loop: apply finished runs, draw, poll input.
fn event_loop<S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> io::Result<()>
where
    S: EstimationService + Clone + Send + Sync + 'static,
{
    loop {
        app.tick();
        let frame = terminal.draw(|frame| layout::render(frame, app))?;
        app.viewport = frame.area;

        if app.quit {
            return Ok(());
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => controls::handle_key(app, key),
                Event::Mouse(mouse) => controls::handle_mouse(app, mouse),
                _ => {}
            }
        }
    }
}
