//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use super::runtime::App;
use super::style;
use crate::present::ResultView;
use crate::session::Session;
use crate::wizard::WizardView;

/// Static text of the base page.
pub const ABOUT: &[&str] = &[
    "Add a home battery to your solar panels?",
    "",
    "This tool asks three questions: where you live, how large your",
    "solar array is, and which battery you have in mind.",
    "",
    "It then asks an estimation service for two things at once:",
    "  - how much energy your array generates on a typical day",
    "  - what a day of battery dispatch costs against the local tariff",
    "",
    "The result shows daily generation and what the battery is worth",
    "per day. Open the details to see the cost without a battery, the",
    "cost with it, and how much energy it moved.",
    "",
    "Nothing you enter is stored. Closing the calculator forgets it.",
];

const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 22;

/// Where the overlay card sits inside `area`.
pub fn card_area(area: Rect) -> Rect {
    let width = CARD_WIDTH.min(area.width);
    let height = CARD_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Renders the full TUI frame.
pub fn render<S>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(3),    // page
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_page(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    if let Some(session) = app.session() {
        render_card(frame, app, session, card_area(frame.area()));
    }
}

fn render_header<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            " SUNSAVE ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", app.route())),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_page<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let lines: Vec<Line> = ABOUT.iter().map(|l| Line::from(*l)).collect();
    let page = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Solar + battery savings ")
                .borders(Borders::ALL),
        )
        .scroll((app.scroll_offset(), 0));
    frame.render_widget(page, area);
}

fn render_footer<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let hints = if app.session().is_some() {
        " Ctrl-C:Quit"
    } else {
        " t:Open calculator  ↑/↓:Scroll  q:Quit"
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

/// The wizard card: progress, then the active step or the results.
fn render_card<S>(frame: &mut Frame, app: &App<S>, session: &Session<S>, area: Rect) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Solar Savings Calculator ")
        .title_bottom(Line::from(" Esc:Close ").right_aligned())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // progress
            Constraint::Min(5),    // content
            Constraint::Length(1), // hints
        ])
        .split(inner);

    render_progress(frame, session, chunks[0]);
    let hints = match session.view() {
        WizardView::Step { index, step, .. } => {
            let registry = session.controller().registry();
            let action = registry.action_label(index);
            let mut lines = vec![
                Line::from(Span::styled(
                    step.label,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(step.hint, Style::default().fg(style::HINT_FG))),
                Line::from(""),
            ];
            for (i, field) in step.fields.iter().enumerate() {
                let focused = i == app.focus();
                let (marker, value_style, cursor) = if focused {
                    ("> ", Style::default().fg(style::FOCUS), "_")
                } else {
                    ("  ", Style::default(), "")
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("{marker}{:<24}", field.label())),
                    Span::styled(format!("{}{cursor}", app.draft(*field)), value_style),
                ]));
            }
            lines.push(Line::from(""));
            if let Some(err) = &app.input_error {
                lines.push(Line::from(Span::styled(
                    err.clone(),
                    Style::default().fg(style::ERROR),
                )));
            }
            let action_style = if session.controller().can_advance() {
                Style::default()
                    .fg(style::ACTION_READY)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(style::ACTION_BLOCKED)
            };
            lines.push(Line::from(Span::styled(format!("[ {action} ]"), action_style)));
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
            format!(" Tab:Next field  Enter:{action}")
        }
        WizardView::Complete(_) => {
            let lines = session
                .result_view()
                .map(|view| result_lines(&view))
                .unwrap_or_default();
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
            if session.presenter().details_open() {
                " d:Hide details  r:Start over".to_string()
            } else {
                " d:Show details  r:Start over".to_string()
            }
        }
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(style::FOOTER_FG),
        ))),
        chunks[2],
    );
}

fn render_progress<S>(frame: &mut Frame, session: &Session<S>, area: Rect) {
    let controller = session.controller();
    let total = controller.registry().len();
    let label = if controller.is_complete() {
        "Done".to_string()
    } else {
        format!("Step {} of {total}", controller.step_index() + 1)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::BOTTOM))
        .gauge_style(Style::default().fg(style::PROGRESS))
        .ratio(controller.progress().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn result_lines(view: &ResultView) -> Vec<Line<'static>> {
    match view {
        ResultView::Pending => vec![Line::from(Span::styled(
            "Calculating...",
            Style::default().fg(style::HINT_FG),
        ))],
        ResultView::Failed { message } => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(style::ERROR),
        ))],
        ResultView::Ready(ready) => {
            let figure = Style::default()
                .fg(style::FIGURE)
                .add_modifier(Modifier::BOLD);
            let mut lines = vec![
                Line::from(vec![
                    Span::raw("Daily generation:     "),
                    Span::styled(ready.generation.clone(), figure),
                ]),
                Line::from(vec![
                    Span::raw("Extra with battery:   "),
                    Span::styled(ready.extra_savings.clone(), figure),
                ]),
            ];
            if let Some(notice) = ready.fallback_notice {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    notice,
                    Style::default().fg(style::NOTICE),
                )));
            }
            if let Some(d) = &ready.details {
                lines.push(Line::from(""));
                lines.push(Line::from(format!("Without battery:      {}", d.baseline)));
                lines.push(Line::from(format!("With battery:         {}", d.with_battery)));
                lines.push(Line::from(format!("Energy shifted:       {}", d.shifted)));
            }
            lines
        }
    }
}
