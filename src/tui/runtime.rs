//! TUI application state: the base page, the overlay, and the live session.

use std::io;

use ratatui::layout::Rect;
use tracing::warn;

use crate::estimate::EstimationService;
use crate::overlay::{CloseReason, Overlay, Route, ScopedResource};
use crate::session::Session;
use crate::wizard::{Advance, Field, InputParameters, WizardView};

use super::layout::ABOUT;

/// Scroll position of the base page.
///
/// Engaged while the overlay is open: scrolling is frozen and the offset the
/// page had before opening comes back on release.
#[derive(Debug, Default)]
pub struct BackgroundScroll {
    offset: u16,
    saved: Option<u16>,
}

impl BackgroundScroll {
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn is_locked(&self) -> bool {
        self.saved.is_some()
    }

    /// Moves the page by `delta` lines, clamped to `0..=max`. Ignored while locked.
    pub fn scroll_by(&mut self, delta: i16, max: u16) {
        if self.is_locked() {
            return;
        }
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }
}

impl ScopedResource for BackgroundScroll {
    fn engage(&mut self) -> io::Result<()> {
        self.saved = Some(self.offset);
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        if let Some(prev) = self.saved.take() {
            self.offset = prev;
        }
        Ok(())
    }
}

/// TUI application state.
pub struct App<S> {
    service: S,
    defaults: InputParameters,
    overlay: Overlay<BackgroundScroll>,
    /// Present only while the overlay is open.
    session: Option<Session<S>>,
    /// Text being typed, one entry per field.
    drafts: Vec<(Field, String)>,
    /// Index into the active step's fields.
    focus: usize,
    /// Last rejected edit, shown under the fields.
    pub input_error: Option<String>,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// Frame area of the last draw, for mouse hit-testing.
    pub viewport: Rect,
}

impl<S> App<S> {
    pub fn session(&self) -> Option<&Session<S>> {
        self.session.as_ref()
    }

    pub fn route(&self) -> Route {
        self.overlay.route()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.overlay.resource().map_or(0, BackgroundScroll::offset)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// The field under the cursor, if a step is active.
    pub fn focused_field(&self) -> Option<Field> {
        let step = self.session.as_ref()?.controller().active_step()?;
        step.fields.get(self.focus).copied()
    }

    pub fn draft(&self, field: Field) -> &str {
        self.drafts
            .iter()
            .find(|(f, _)| *f == field)
            .map_or("", |(_, text)| text.as_str())
    }

    /// Whether the results panel is showing (pending, failed, or ready).
    pub fn on_results(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| matches!(s.view(), WizardView::Complete(_)))
    }

    pub fn scroll(&mut self, delta: i16) {
        let max = u16::try_from(ABOUT.len().saturating_sub(1)).unwrap_or(u16::MAX);
        if let Some(page) = self.overlay.resource_mut() {
            page.scroll_by(delta, max);
        }
    }
}

impl<S> App<S>
where
    S: EstimationService + Clone + Send + Sync + 'static,
{
    /// Builds the app on the base page, opening the overlay if `route` is `/tool`.
    pub fn new(service: S, defaults: InputParameters, route: Route) -> Self {
        let mut app = Self {
            service,
            drafts: drafts_for(&defaults),
            defaults,
            overlay: Overlay::new(BackgroundScroll::default()),
            session: None,
            focus: 0,
            input_error: None,
            quit: false,
            viewport: Rect::default(),
        };
        if route == Route::Tool {
            app.open_tool();
        }
        app
    }

    /// Opens the overlay with a fresh session.
    pub fn open_tool(&mut self) {
        match self.overlay.open() {
            Ok(true) => {
                self.session = Some(Session::new(self.defaults.clone(), self.service.clone()));
                self.drafts = drafts_for(&self.defaults);
                self.focus = 0;
                self.input_error = None;
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "failed to open overlay"),
        }
    }

    /// Closes the overlay and drops the session with everything it held.
    pub fn close_tool(&mut self, reason: CloseReason) {
        if let Err(e) = self.overlay.close(reason) {
            warn!(error = %e, "failed to close overlay");
        }
        self.session = None;
        self.input_error = None;
    }

    /// Leaves the app, closing the overlay on the way out.
    pub fn navigate_away(&mut self) {
        self.close_tool(CloseReason::Navigation);
        self.quit = true;
    }

    /// Applies finished runs. Called once per loop iteration.
    pub fn tick(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.drain_outcomes();
        }
    }

    pub fn focus_next(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    pub fn type_char(&mut self, c: char) {
        self.edit(|text| text.push(c));
    }

    pub fn backspace(&mut self) {
        self.edit(|text| {
            text.pop();
        });
    }

    /// Enter on a step: Next or Calculate.
    pub fn submit(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.advance() {
            Advance::Moved(_) => {
                self.focus = 0;
                self.input_error = None;
            }
            Advance::Completed(_) | Advance::Blocked | Advance::AlreadyComplete => {}
        }
    }

    pub fn restart(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.restart();
            self.focus = 0;
            self.input_error = None;
        }
    }

    pub fn toggle_details(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_details();
        }
    }

    fn field_count(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| s.controller().active_step())
            .map_or(0, |step| step.fields.len())
    }

    fn edit(&mut self, f: impl FnOnce(&mut String)) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let Some((_, text)) = self.drafts.iter_mut().find(|(d, _)| *d == field) else {
            return;
        };
        f(text);
        let raw = text.clone();
        if let Some(session) = self.session.as_mut() {
            self.input_error = session.set_field(field, &raw).err().map(|e| e.to_string());
        }
    }
}

fn drafts_for(params: &InputParameters) -> Vec<(Field, String)> {
    Field::ALL.iter().map(|&f| (f, f.text(params))).collect()
}
