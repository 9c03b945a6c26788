//! Status indicator widget.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Centered one-line status, used for loading and empty states.
pub struct StatusIndicator {
    pub title: String,
    pub status: String,
    pub style: Style,
}

impl StatusIndicator {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.status.clone())
            .style(self.style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            );
        f.render_widget(paragraph, area);
    }
}
