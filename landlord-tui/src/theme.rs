//! Ledger theme and color utilities.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct LedgerTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub message_bubble: Color,
}

impl LedgerTheme {
    pub fn ledger() -> Self {
        Self {
            bg: Color::Rgb(18, 18, 18),
            bg_highlight: Color::Rgb(48, 44, 30),
            primary: Color::Rgb(201, 174, 84),
            secondary: Color::Rgb(120, 180, 255),
            warning: Color::Rgb(240, 200, 80),
            error: Color::Rgb(235, 90, 90),
            info: Color::Rgb(120, 180, 255),
            text: Color::Rgb(235, 235, 235),
            text_dim: Color::Rgb(140, 140, 140),
            border: Color::Rgb(70, 70, 70),
            message_bubble: Color::Rgb(217, 253, 211),
        }
    }
}

impl Default for LedgerTheme {
    fn default() -> Self {
        Self::ledger()
    }
}

/// Color for a landlord's message count in the listing.
pub fn message_count_color(count: i64, theme: &LedgerTheme) -> Color {
    match count {
        0 => theme.text_dim,
        1..=9 => theme.text,
        _ => theme.warning,
    }
}

/// Alternating row stripe for tables.
pub fn stripe_color(index: usize, theme: &LedgerTheme) -> Color {
    if index % 2 == 0 {
        theme.bg
    } else {
        theme.bg_highlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_count_color_thresholds() {
        let theme = LedgerTheme::ledger();
        assert_eq!(message_count_color(0, &theme), theme.text_dim);
        assert_eq!(message_count_color(4, &theme), theme.text);
        assert_eq!(message_count_color(10, &theme), theme.warning);
    }
}
