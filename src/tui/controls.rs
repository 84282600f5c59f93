//! Keyboard and mouse input handling for the TUI.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use super::layout;
use super::runtime::App;
use crate::estimate::EstimationService;
use crate::overlay::CloseReason;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key<S>(app: &mut App<S>, key: KeyEvent)
where
    S: EstimationService + Clone + Send + Sync + 'static,
{
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.navigate_away();
        return;
    }

    if app.session().is_none() {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            KeyCode::Char('t') | KeyCode::Enter => app.open_tool(),
            KeyCode::Up => app.scroll(-1),
            KeyCode::Down => app.scroll(1),
            KeyCode::PageUp => app.scroll(-10),
            KeyCode::PageDown => app.scroll(10),
            _ => {}
        }
        return;
    }

    if key.code == KeyCode::Esc {
        app.close_tool(CloseReason::CloseButton);
    } else if app.on_results() {
        match key.code {
            KeyCode::Char('d') => app.toggle_details(),
            KeyCode::Char('r') => app.restart(),
            _ => {}
        }
    } else {
        match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Char(c) => app.type_char(c),
            _ => {}
        }
    }
}

/// A left click outside the card closes the overlay; wheel scrolls the page.
pub fn handle_mouse<S>(app: &mut App<S>, mouse: MouseEvent)
where
    S: EstimationService + Clone + Send + Sync + 'static,
{
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if app.session().is_some() => {
            let card = layout::card_area(app.viewport);
            if !card.contains(Position::new(mouse.column, mouse.row)) {
                app.close_tool(CloseReason::BackgroundClick);
            }
        }
        MouseEventKind::ScrollUp => app.scroll(-1),
        MouseEventKind::ScrollDown => app.scroll(1),
        _ => {}
    }
}
