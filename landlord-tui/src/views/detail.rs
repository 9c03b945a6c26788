//! Landlord detail view: contact fields, properties and messages.

use crate::state::App;
use crate::views::helpers::{format_timestamp, optional_number, or_dash};
use crate::widgets::{DetailPanel, StatusIndicator};
use landlord_core::{Landlord, Message, Property};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

pub const NO_MESSAGES: &str = "No messages found.";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(landlord) = app.detail.landlord.as_ref() else {
        let (status, style) = match (app.detail.locating, app.detail.error.as_deref()) {
            (Some(id), _) => (
                format!("Searching for landlord {}...", id),
                Style::default().fg(app.theme.text_dim),
            ),
            (None, Some(error)) => (error.to_string(), Style::default().fg(app.theme.error)),
            (None, None) => ("No landlord selected.".to_string(), Style::default().fg(app.theme.text_dim)),
        };
        StatusIndicator {
            title: "Landlord".to_string(),
            status,
            style,
        }
        .render(f, area);
        return;
    };

    let table_height = (landlord.properties.len() as u16).saturating_add(3).clamp(4, 12);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(table_height),
            Constraint::Min(3),
        ])
        .split(area);

    DetailPanel {
        title: "Landlord",
        fields: landlord_fields(landlord),
        label_style: Style::default().fg(app.theme.secondary),
    }
    .render(f, chunks[0]);

    render_properties(f, app, &landlord.properties, chunks[1]);
    render_messages(f, app, chunks[2]);
}

pub fn landlord_fields(landlord: &Landlord) -> Vec<(&'static str, String)> {
    vec![
        ("ID", landlord.landlord_id.to_string()),
        ("Name", landlord.full_name.clone()),
        ("Email", landlord.email.clone()),
        ("Phone", landlord.phone_1.clone()),
        ("Properties", landlord.property_count().to_string()),
    ]
}

fn render_properties(f: &mut Frame<'_>, app: &App, properties: &[Property], area: Rect) {
    let title = format!("Properties ({})", properties.len());
    if properties.is_empty() {
        StatusIndicator {
            title,
            status: "No properties.".to_string(),
            style: Style::default().fg(app.theme.text_dim),
        }
        .render(f, area);
        return;
    }

    let header = Row::new(["ID", "Number", "Unit", "Type", "Rooms", "Building", "Project"])
        .style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        );
    let rows: Vec<Row> = properties.iter().map(property_row).collect();
    let widths = [
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Percentage(15),
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .style(Style::default().fg(app.theme.text))
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(table, area);
}

fn property_row(property: &Property) -> Row<'static> {
    Row::new(vec![
        Cell::from(property.property_id.to_string()),
        Cell::from(optional_number(property.p_number)),
        Cell::from(or_dash(&property.unit_no)),
        Cell::from(or_dash(&property.property_type)),
        Cell::from(optional_number(property.no_room)),
        Cell::from(or_dash(&property.building_name)),
        Cell::from(or_dash(&property.project)),
    ])
}

fn render_messages(f: &mut Frame<'_>, app: &App, area: Rect) {
    let detail = &app.detail;
    let title = if detail.messages_loading {
        "Messages (loading...)".to_string()
    } else {
        format!("Messages ({})", detail.messages.len())
    };

    let text = if detail.messages_loading && detail.messages.is_empty() {
        Text::from(Span::styled("Loading messages...", Style::default().fg(app.theme.text_dim)))
    } else if detail.messages.is_empty() {
        Text::from(Span::styled(NO_MESSAGES, Style::default().fg(app.theme.text_dim)))
    } else {
        Text::from(message_lines(app, &detail.messages))
    };

    let widget = Paragraph::new(text)
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((detail.message_scroll, 0));
    f.render_widget(widget, area);
}

fn message_lines<'a>(app: &App, messages: &'a [Message]) -> Vec<Line<'a>> {
    let mut lines = Vec::with_capacity(messages.len() * 3);
    for message in messages {
        lines.push(Line::from(Span::styled(
            format_timestamp(&message.timestamp),
            Style::default().fg(app.theme.text_dim),
        )));
        lines.push(Line::from(Span::styled(
            message.message.as_str(),
            Style::default().fg(app.theme.message_bubble),
        )));
        lines.push(Line::default());
    }
    lines
}
