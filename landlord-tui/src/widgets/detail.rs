//! Detail panel widget for showing field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    pub label_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn lines(&self) -> Vec<Line<'_>> {
        self.fields
            .iter()
            .map(|(label, value)| {
                let value = if value.is_empty() { "-" } else { value.as_str() };
                Line::from(vec![
                    Span::styled(format!("{}: ", label), self.label_style),
                    Span::raw(value),
                ])
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(Text::from(self.lines()))
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }
}
