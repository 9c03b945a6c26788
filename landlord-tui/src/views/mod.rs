//! View rendering dispatch.

pub mod detail;
pub mod helpers;
pub mod listing;

use crate::nav::View;
use crate::notifications::NotificationLevel;
use crate::state::App;
use helpers::centered_rect;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const LISTING_HELP: &str =
    "j/k move • h/l page • [ ] jump • 1-4 sort • Enter open • g go to id • ? help • q quit";
const DETAIL_HELP: &str = "j/k scroll • Esc back • r refresh • g go to id • ? help • q quit";

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Listing => listing::render(f, app, layout[1]),
        View::Detail => detail::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if let Some(prompt) = app.jump.as_ref() {
        render_jump_prompt(f, app, &prompt.input);
    }
    if let Some(modal) = app.modal.as_ref() {
        render_modal(f, app, &modal.title, &modal.message);
    }
}

pub fn header_title(app: &App) -> String {
    let collection = &app.listing.collection;
    let mut title = format!(
        "LANDLORD DESK | {} | Page {} of {} | {} landlords",
        app.active_view.title(),
        collection.paging().page_number(),
        collection.total_pages().max(1),
        collection.total_count()
    );
    if app.is_loading() {
        title.push_str(" | Loading...");
    }
    title
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        header_title(app),
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, area);
}

/// Footer text: the active view's error, else the latest notification, else
/// key help.
pub fn footer_line(app: &App) -> (String, NotificationLevel, bool) {
    if let Some(error) = app.current_error() {
        return (format!("ERROR: {}", error), NotificationLevel::Error, true);
    }
    if let Some(note) = app.notifications.last() {
        let label = match note.level {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Error => "ERROR",
        };
        return (format!("{}: {}", label, note.message), note.level, true);
    }
    let help = match app.active_view {
        View::Listing => LISTING_HELP,
        View::Detail => DETAIL_HELP,
    };
    (help.to_string(), NotificationLevel::Info, false)
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, level, highlighted) = footer_line(app);
    let color = match (level, highlighted) {
        (NotificationLevel::Error, _) => app.theme.error,
        (NotificationLevel::Info, true) => app.theme.info,
        (NotificationLevel::Info, false) => app.theme.text_dim,
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(color));
    f.render_widget(footer, area);
}

fn render_jump_prompt(f: &mut Frame<'_>, app: &App, input: &str) {
    let area = centered_rect(40, 3, f.size());
    let line = Line::from(vec![
        Span::styled("Landlord id: ", Style::default().fg(app.theme.secondary)),
        Span::styled(
            format!("{}_", input),
            Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    let prompt = Paragraph::new(line).block(
        Block::default()
            .title("Go to landlord (Enter / Esc)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.primary)),
    );
    f.render_widget(Clear, area);
    f.render_widget(prompt, area);
}

fn render_modal(f: &mut Frame<'_>, app: &App, title: &str, message: &str) {
    let height = message.lines().count() as u16 + 2;
    let area = centered_rect(64, height, f.size());
    let modal = Paragraph::new(message.to_string())
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.primary)),
        );
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}
