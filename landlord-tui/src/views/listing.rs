//! Landlord listing view.

use crate::state::App;
use crate::theme::{message_count_color, stripe_color};
use crate::views::helpers::or_dash;
use crate::widgets::StatusIndicator;
use landlord_core::{Landlord, LandlordColumn, SortState};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

/// Displayed columns, in order.
#[derive(Debug, Clone, Copy)]
enum ListingColumn {
    Sortable(LandlordColumn),
    Email,
    Phone,
}

impl ListingColumn {
    fn title(self) -> &'static str {
        match self {
            ListingColumn::Sortable(column) => column.title(),
            ListingColumn::Email => "Email",
            ListingColumn::Phone => "Phone",
        }
    }

    fn sort_column(self) -> Option<LandlordColumn> {
        match self {
            ListingColumn::Sortable(column) => Some(column),
            ListingColumn::Email | ListingColumn::Phone => None,
        }
    }
}

const COLUMNS: [ListingColumn; 6] = [
    ListingColumn::Sortable(LandlordColumn::Id),
    ListingColumn::Sortable(LandlordColumn::Name),
    ListingColumn::Email,
    ListingColumn::Phone,
    ListingColumn::Sortable(LandlordColumn::PropertiesCount),
    ListingColumn::Sortable(LandlordColumn::MessagesCount),
];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let collection = &app.listing.collection;

    if !collection.is_loaded() {
        let status = if collection.is_loading() {
            "Loading landlords..."
        } else {
            "No page loaded. Press r to retry."
        };
        StatusIndicator {
            title: "Landlords".to_string(),
            status: status.to_string(),
            style: Style::default().fg(app.theme.text_dim),
        }
        .render(f, area);
        return;
    }

    if collection.is_empty() {
        StatusIndicator {
            title: "Landlords".to_string(),
            status: "No landlords found.".to_string(),
            style: Style::default().fg(app.theme.text_dim),
        }
        .render(f, area);
        return;
    }

    let sort = collection.sort_state();
    let header = Row::new(
        COLUMNS
            .iter()
            .map(|column| Cell::from(header_label(column.title(), column.sort_column(), sort)))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = collection
        .rows()
        .enumerate()
        .map(|(index, landlord)| landlord_row(app, index, landlord))
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let title = format!(
        "Landlords ({} total, page {} of {})",
        collection.total_count(),
        collection.paging().page_number(),
        collection.total_pages().max(1)
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::REVERSED),
        );

    let mut state = TableState::default();
    state.select(app.listing.selected_position());
    f.render_stateful_widget(table, area, &mut state);
}

/// Column header with its sort key hint and current sort indicator.
pub fn header_label(title: &str, column: Option<LandlordColumn>, sort: SortState<LandlordColumn>) -> String {
    let Some(column) = column else {
        return title.to_string();
    };
    let key = LandlordColumn::all()
        .iter()
        .position(|c| *c == column)
        .map(|index| index + 1)
        .unwrap_or_default();
    if sort.is_sorted_by(column) {
        format!("{} [{}] {}", title, key, sort.direction.indicator())
    } else {
        format!("{} [{}]", title, key)
    }
}

fn landlord_row<'a>(app: &App, index: usize, landlord: &'a Landlord) -> Row<'a> {
    let count_style = Style::default().fg(message_count_color(landlord.messages_count, &app.theme));
    Row::new(vec![
        Cell::from(landlord.landlord_id.to_string()),
        Cell::from(or_dash(&landlord.full_name)),
        Cell::from(or_dash(&landlord.email)),
        Cell::from(or_dash(&landlord.phone_1)),
        Cell::from(landlord.property_count().to_string()),
        Cell::from(Span::styled(landlord.messages_count.to_string(), count_style)),
    ])
    .style(Style::default().fg(app.theme.text).bg(stripe_color(index, &app.theme)))
}
