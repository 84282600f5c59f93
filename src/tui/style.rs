//! Color constants for the TUI.

use ratatui::style::Color;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Step hint and secondary text.
pub const HINT_FG: Color = Color::Gray;
/// Focused input field.
pub const FOCUS: Color = Color::Cyan;
/// Progress bar fill.
pub const PROGRESS: Color = Color::Yellow;
/// Action button when the step is valid.
pub const ACTION_READY: Color = Color::Green;
/// Action button when the step is blocked.
pub const ACTION_BLOCKED: Color = Color::DarkGray;
/// Input and service errors.
pub const ERROR: Color = Color::Red;
/// Fallback-tariff banner.
pub const NOTICE: Color = Color::Yellow;
/// Headline figures on the results panel.
pub const FIGURE: Color = Color::LightGreen;
