//! Landlord TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use landlord_core::{PageSource, RecordId, RecordLocator};
use landlord_tui::api_client::RestClient;
use landlord_tui::config::{arg_value, TuiConfig};
use landlord_tui::error::TuiError;
use landlord_tui::events::TuiEvent;
use landlord_tui::keys::{map_key, map_prompt_key};
use landlord_tui::logging;
use landlord_tui::nav::Route;
use landlord_tui::notifications::NotificationLevel;
use landlord_tui::persistence::{self, PersistedState};
use landlord_tui::state::{App, Command, Flow};
use landlord_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config.log_path, &config.log_filter)?;
    info!(api_base_url = %config.api_base_url, page_size = config.page_size, "starting landlord-tui");

    let api = RestClient::new(&config)?;
    let mut app = App::new(config);
    let route = startup_route(&mut app);

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let commands = app.start(route);
    dispatch(&api, &event_tx, commands);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        let Some(event) = event_rx.recv().await else {
            break;
        };
        match handle_event(&mut app, event) {
            Flow::Continue(commands) => dispatch(&api, &event_tx, commands),
            Flow::Quit => break,
        }
    }

    let persisted = PersistedState { route: app.route() };
    if let Err(err) = persistence::save(&app.config.persistence_path, &persisted) {
        warn!(error = %err, "failed to persist route");
    }
    info!(route = %persisted.route, "exiting");

    Ok(())
}

/// `--landlord <id>` wins over the persisted route.
fn startup_route(app: &mut App) -> Route {
    if let Some(raw) = arg_value("--landlord") {
        match raw.parse::<RecordId>() {
            Ok(landlord_id) => {
                return Route::Detail {
                    landlord_id,
                    page_index: 0,
                }
            }
            Err(_) => app.notify(
                NotificationLevel::Error,
                format!("Invalid --landlord value: '{}'", raw),
            ),
        }
    }
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => state.route,
        Ok(None) => Route::default(),
        Err(err) => {
            warn!(error = %err, "ignoring unreadable persisted state");
            Route::default()
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

fn handle_event(app: &mut App, event: TuiEvent) -> Flow {
    match event {
        TuiEvent::Input(key) => {
            if app.jump.is_some() {
                return match map_prompt_key(key) {
                    Some(action) => Flow::Continue(app.handle_prompt(action)),
                    None => Flow::Continue(Vec::new()),
                };
            }
            match map_key(key) {
                Some(action) => app.handle_action(action),
                None => Flow::Continue(Vec::new()),
            }
        }
        TuiEvent::Resize { .. } => Flow::Continue(Vec::new()),
        TuiEvent::PageLoaded { page_index, result } => {
            app.apply_page_loaded(page_index, result);
            Flow::Continue(Vec::new())
        }
        TuiEvent::Located {
            landlord_id,
            result,
        } => Flow::Continue(app.apply_located(landlord_id, result)),
        TuiEvent::MessagesLoaded {
            landlord_id,
            result,
        } => {
            app.apply_messages(landlord_id, result);
            Flow::Continue(Vec::new())
        }
    }
}

/// Runs each command on its own task; results come back as events.
fn dispatch(api: &RestClient, sender: &mpsc::Sender<TuiEvent>, commands: Vec<Command>) {
    for command in commands {
        let api = api.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            let event = match command {
                Command::LoadPage {
                    page_index,
                    request,
                } => TuiEvent::PageLoaded {
                    page_index,
                    result: api.fetch_page(&request).await,
                },
                Command::Locate { landlord_id } => TuiEvent::Located {
                    landlord_id,
                    result: RecordLocator::new(&api).locate(landlord_id).await,
                },
                Command::LoadMessages { landlord_id } => TuiEvent::MessagesLoaded {
                    landlord_id,
                    result: api
                        .list_messages(landlord_id)
                        .await
                        .map(|list| list.results)
                        .map_err(Into::into),
                },
            };
            let _ = sender.send(event).await;
        });
    }
}
