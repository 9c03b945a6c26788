//! Common view rendering helpers.

use chrono::{DateTime, NaiveDateTime};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats an upstream message timestamp for display.
///
/// RFC 3339 values are shown in their own offset; naive values are shown as
/// given. Anything unparseable is shown verbatim.
pub fn format_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.format(DISPLAY_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return parsed.format(DISPLAY_FORMAT).to_string();
        }
    }
    raw.to_string()
}

/// Shows `value` or a dash when upstream sent nothing.
pub fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

pub fn optional_number(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Rect of `width` x `height` centered in `area`, clamped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
