//! Application state and view state definitions.
//!
//! State transitions never perform I/O. Anything that needs the network is
//! returned as a [`Command`] for the event loop to run on a spawned task; the
//! result comes back as a [`TuiEvent`](crate::events::TuiEvent) and is applied
//! through one of the `apply_*` methods.

use crate::config::TuiConfig;
use crate::keys::{Action, PromptAction};
use crate::nav::{Route, View};
use crate::notifications::{Notification, NotificationLevel};
use crate::theme::LedgerTheme;
use landlord_core::{
    CollectionError, HasRecordId, Landlord, LandlordColumn, Located, Message, Page, PageRequest,
    PagedCollection, RecordId,
};
use tracing::{debug, info};

/// Longest id the jump prompt accepts.
const MAX_PROMPT_DIGITS: usize = 18;

/// Network work requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadPage {
        page_index: usize,
        request: PageRequest,
    },
    Locate {
        landlord_id: RecordId,
    },
    LoadMessages {
        landlord_id: RecordId,
    },
}

/// What the event loop should do after handling an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Vec<Command>),
    Quit,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: LedgerTheme,
    pub active_view: View,

    pub listing: ListingViewState,
    pub detail: DetailViewState,

    pub notifications: Vec<Notification>,
    pub jump: Option<JumpPrompt>,
    pub modal: Option<Modal>,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        let listing = ListingViewState::new(config.page_size);
        Self {
            config,
            theme: LedgerTheme::ledger(),
            active_view: View::Listing,
            listing,
            detail: DetailViewState::new(),
            notifications: Vec::new(),
            jump: None,
            modal: None,
        }
    }

    /// Initial fetches for `route`.
    pub fn start(&mut self, route: Route) -> Vec<Command> {
        let mut commands = vec![self.load_page(route.page_index())];
        if let Route::Detail { landlord_id, .. } = route {
            commands.extend(self.navigate_to_landlord(landlord_id));
        }
        commands
    }

    /// Where the user currently is, for persistence.
    pub fn route(&self) -> Route {
        match (self.active_view, self.detail.landlord_id()) {
            (View::Detail, Some(landlord_id)) => Route::Detail {
                landlord_id,
                page_index: self.detail.return_page,
            },
            _ => Route::Listing {
                page_index: self.listing.collection.current_page_index(),
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        self.listing.collection.is_loading()
            || self.detail.messages_loading
            || self.detail.locating.is_some()
    }

    /// The single error message to surface for the active view.
    pub fn current_error(&self) -> Option<&str> {
        match self.active_view {
            View::Listing => self.listing.collection.error(),
            View::Detail => self.detail.error.as_deref(),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    pub fn handle_action(&mut self, action: Action) -> Flow {
        self.notifications.clear();
        let commands = match action {
            Action::Quit => return Flow::Quit,
            // An open modal swallows the key that closes it.
            _ if self.modal.take().is_some() => Vec::new(),
            Action::OpenHelp => {
                self.modal = Some(Modal::help());
                Vec::new()
            }
            Action::OpenJump => {
                self.jump = Some(JumpPrompt::default());
                Vec::new()
            }
            Action::MoveDown => {
                self.move_selection(true);
                Vec::new()
            }
            Action::MoveUp => {
                self.move_selection(false);
                Vec::new()
            }
            Action::NextPage => self.page_forward(1),
            Action::PrevPage => self.page_back(1),
            Action::JumpForward => self.page_forward(self.config.page_step),
            Action::JumpBack => self.page_back(self.config.page_step),
            Action::Sort(index) => {
                if self.active_view == View::Listing {
                    if let Some(column) = LandlordColumn::from_index(index) {
                        self.listing.collection.sort_by(column);
                    }
                }
                Vec::new()
            }
            Action::OpenDetails => self.open_selected(),
            Action::Back => {
                if self.active_view == View::Listing {
                    self.listing.collection.dismiss_error();
                }
                self.back_to_listing()
            }
            Action::Refresh => self.refresh(),
        };
        Flow::Continue(commands)
    }

    pub fn handle_prompt(&mut self, action: PromptAction) -> Vec<Command> {
        let Some(prompt) = self.jump.as_mut() else {
            return Vec::new();
        };
        match action {
            PromptAction::Input(c) => {
                if prompt.input.len() < MAX_PROMPT_DIGITS {
                    prompt.input.push(c);
                }
                Vec::new()
            }
            PromptAction::Backspace => {
                prompt.input.pop();
                Vec::new()
            }
            PromptAction::Cancel => {
                self.jump = None;
                Vec::new()
            }
            PromptAction::Submit => {
                let input = prompt.input.clone();
                self.jump = None;
                match input.parse::<RecordId>() {
                    Ok(landlord_id) => self.navigate_to_landlord(landlord_id),
                    Err(_) => {
                        self.notify(
                            NotificationLevel::Error,
                            format!("Invalid landlord id: '{}'", input),
                        );
                        Vec::new()
                    }
                }
            }
        }
    }

    fn move_selection(&mut self, forward: bool) {
        match self.active_view {
            View::Listing => {
                let ids: Vec<RecordId> = self
                    .listing
                    .collection
                    .rows()
                    .map(HasRecordId::record_id)
                    .collect();
                if forward {
                    select_next_id(&ids, &mut self.listing.selected);
                } else {
                    select_prev_id(&ids, &mut self.listing.selected);
                }
            }
            View::Detail => {
                if forward {
                    self.detail.message_scroll = self.detail.message_scroll.saturating_add(1);
                } else {
                    self.detail.message_scroll = self.detail.message_scroll.saturating_sub(1);
                }
            }
        }
    }

    fn page_forward(&mut self, step: usize) -> Vec<Command> {
        if self.active_view != View::Listing {
            return Vec::new();
        }
        match self.listing.collection.advance(step) {
            Some(target) => vec![self.load_page(target)],
            None => Vec::new(),
        }
    }

    fn page_back(&mut self, step: usize) -> Vec<Command> {
        if self.active_view != View::Listing {
            return Vec::new();
        }
        match self.listing.collection.retreat(step) {
            Some(target) => vec![self.load_page(target)],
            None => Vec::new(),
        }
    }

    fn load_page(&mut self, page_index: usize) -> Command {
        let request = self.listing.collection.begin_load(page_index);
        Command::LoadPage {
            page_index,
            request,
        }
    }

    fn refresh(&mut self) -> Vec<Command> {
        match self.active_view {
            View::Listing => {
                let page_index = self.listing.collection.current_page_index();
                vec![self.load_page(page_index)]
            }
            View::Detail => match self.detail.landlord_id() {
                Some(landlord_id) => vec![self.load_messages(landlord_id)],
                None => match self.detail.locating {
                    Some(landlord_id) => vec![Command::Locate { landlord_id }],
                    None => Vec::new(),
                },
            },
        }
    }

    // ------------------------------------------------------------------------
    // Detail navigation
    // ------------------------------------------------------------------------

    fn open_selected(&mut self) -> Vec<Command> {
        if self.active_view != View::Listing {
            return Vec::new();
        }
        let Some(landlord) = self.listing.selected_landlord().cloned() else {
            return Vec::new();
        };
        let page_index = self.listing.collection.current_page_index();
        self.open_detail(landlord, page_index)
    }

    /// Opens the detail view for `landlord_id`, searching the collection when
    /// the landlord is not on the loaded page.
    pub fn navigate_to_landlord(&mut self, landlord_id: RecordId) -> Vec<Command> {
        let on_page = self
            .listing
            .collection
            .rows()
            .find(|landlord| landlord.landlord_id == landlord_id)
            .cloned();
        if let Some(landlord) = on_page {
            let page_index = self.listing.collection.current_page_index();
            return self.open_detail(landlord, page_index);
        }

        debug!(landlord_id, "landlord not on loaded page, locating");
        self.detail = DetailViewState::new();
        self.detail.locating = Some(landlord_id);
        self.detail.return_page = self.listing.collection.current_page_index();
        self.active_view = View::Detail;
        vec![Command::Locate { landlord_id }]
    }

    fn open_detail(&mut self, landlord: Landlord, page_index: usize) -> Vec<Command> {
        let landlord_id = landlord.landlord_id;
        self.listing.selected = Some(landlord_id);
        self.detail = DetailViewState::new();
        self.detail.landlord = Some(landlord);
        self.detail.return_page = page_index;
        self.active_view = View::Detail;
        vec![self.load_messages(landlord_id)]
    }

    fn load_messages(&mut self, landlord_id: RecordId) -> Command {
        self.detail.messages_loading = true;
        Command::LoadMessages { landlord_id }
    }

    fn back_to_listing(&mut self) -> Vec<Command> {
        if self.active_view != View::Detail {
            return Vec::new();
        }
        self.active_view = View::Listing;
        self.detail.locating = None;
        let return_page = self.detail.return_page;
        let collection = &self.listing.collection;
        if !collection.is_loaded() || collection.current_page_index() != return_page {
            vec![self.load_page(return_page)]
        } else {
            Vec::new()
        }
    }

    // ------------------------------------------------------------------------
    // Fetch results
    // ------------------------------------------------------------------------

    /// Applies a finished page load. Failures are kept on the collection
    /// and surface through [`App::current_error`].
    pub fn apply_page_loaded(
        &mut self,
        page_index: usize,
        result: Result<Page<Landlord>, CollectionError>,
    ) {
        if self.listing.collection.finish_load(page_index, result).is_err() {
            return;
        }
        let still_present = self
            .listing
            .selected
            .and_then(|id| self.listing.collection.position_of(id))
            .is_some();
        if !still_present {
            self.listing.selected = self.listing.collection.row(0).map(HasRecordId::record_id);
        }
    }

    pub fn apply_located(
        &mut self,
        landlord_id: RecordId,
        result: Result<Located<Landlord>, CollectionError>,
    ) -> Vec<Command> {
        if self.detail.locating != Some(landlord_id) {
            debug!(landlord_id, "dropping lookup result for a view that was left");
            return Vec::new();
        }
        self.detail.locating = None;
        match result {
            Ok(located) => {
                info!(
                    landlord_id,
                    page_index = located.page_index,
                    pages_visited = located.pages_visited,
                    "opening located landlord"
                );
                self.detail.error = None;
                self.notify(
                    NotificationLevel::Info,
                    format!(
                        "Landlord {} found on page {}",
                        landlord_id,
                        located.page_index + 1
                    ),
                );
                self.detail.return_page = located.page_index;
                self.detail.landlord = Some(located.record);
                vec![self.load_messages(landlord_id)]
            }
            Err(err) => {
                self.detail.error = Some(err.to_string());
                Vec::new()
            }
        }
    }

    pub fn apply_messages(
        &mut self,
        landlord_id: RecordId,
        result: Result<Vec<Message>, CollectionError>,
    ) {
        if self.detail.landlord_id() != Some(landlord_id) {
            return;
        }
        self.detail.messages_loading = false;
        match result {
            Ok(messages) => {
                self.detail.error = None;
                self.detail.messages = messages;
                self.detail.message_scroll = 0;
            }
            Err(err) => self.detail.error = Some(err.to_string()),
        }
    }
}

fn select_next_id(ids: &[RecordId], selected: &mut Option<RecordId>) {
    if ids.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .and_then(|id| ids.iter().position(|item| *item == id))
        .unwrap_or(usize::MAX);
    let next = if index == usize::MAX {
        0
    } else {
        (index + 1) % ids.len()
    };
    *selected = Some(ids[next]);
}

fn select_prev_id(ids: &[RecordId], selected: &mut Option<RecordId>) {
    if ids.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .and_then(|id| ids.iter().position(|item| *item == id))
        .unwrap_or(0);
    let prev = if index == 0 { ids.len() - 1 } else { index - 1 };
    *selected = Some(ids[prev]);
}

#[derive(Debug, Clone, Default)]
pub struct JumpPrompt {
    pub input: String,
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

impl Modal {
    pub fn help() -> Self {
        Self {
            title: "Keybindings".to_string(),
            message: [
                "j/k or arrows   move selection / scroll messages",
                "h/l or arrows   previous / next page",
                "[ / ]           jump back / forward several pages",
                "1-4             sort by ID, Name, Properties, Messages",
                "Enter           open landlord details",
                "Esc             back to the listing",
                "g or /          go to landlord by id",
                "r               refresh",
                "q               quit",
            ]
            .join("\n"),
        }
    }
}

// ============================================================================
// VIEW STATE DEFINITIONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct ListingViewState {
    pub collection: PagedCollection<Landlord>,
    pub selected: Option<RecordId>,
}

impl ListingViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            collection: PagedCollection::new(page_size),
            selected: None,
        }
    }

    pub fn selected_landlord(&self) -> Option<&Landlord> {
        let id = self.selected?;
        self.collection.rows().find(|landlord| landlord.landlord_id == id)
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.selected.and_then(|id| self.collection.position_of(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailViewState {
    pub landlord: Option<Landlord>,
    pub messages: Vec<Message>,
    pub messages_loading: bool,
    /// Id being searched for across pages, while the lookup runs.
    pub locating: Option<RecordId>,
    pub error: Option<String>,
    /// Listing page to go back to.
    pub return_page: usize,
    pub message_scroll: u16,
}

impl DetailViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn landlord_id(&self) -> Option<RecordId> {
        self.landlord.as_ref().map(|landlord| landlord.landlord_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use landlord_core::Cursor;
    use std::path::PathBuf;

    fn config() -> TuiConfig {
        TuiConfig {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 5_000,
            page_size: 5,
            page_step: 5,
            persistence_path: PathBuf::from("tmp/state.json"),
            log_path: PathBuf::from("tmp/landlord-tui.log"),
            log_filter: "info".to_string(),
            theme: ThemeConfig {
                name: "ledger".to_string(),
            },
        }
    }

    fn landlord(id: RecordId, name: &str) -> Landlord {
        Landlord {
            landlord_id: id,
            full_name: name.to_string(),
            email: String::new(),
            phone_1: String::new(),
            messages_count: 0,
            properties: Vec::new(),
        }
    }

    /// Page `index` of twelve landlords, five per page.
    fn page(index: usize) -> Page<Landlord> {
        let start = index * 5;
        let records = (start..(start + 5).min(12))
            .map(|i| landlord(i as RecordId + 1, &format!("Landlord {}", i + 1)))
            .collect();
        let mut page = Page::new(records, 12);
        if index < 2 {
            page = page.with_next(Cursor::new(format!("next-{}", index + 1)));
        }
        if index > 0 {
            page = page.with_previous(Cursor::new(format!("prev-{}", index - 1)));
        }
        page
    }

    fn loaded_app(index: usize) -> App {
        let mut app = App::new(config());
        let commands = app.start(Route::Listing { page_index: index });
        assert_eq!(
            commands,
            vec![Command::LoadPage {
                page_index: index,
                request: PageRequest::Index(index)
            }]
        );
        app.apply_page_loaded(index, Ok(page(index)));
        app
    }

    #[test]
    fn test_start_on_detail_route_loads_page_and_locates() {
        let mut app = App::new(config());
        let commands = app.start(Route::Detail {
            landlord_id: 11,
            page_index: 0,
        });
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1], Command::Locate { landlord_id: 11 });
        assert_eq!(app.active_view, View::Detail);
        assert!(app.is_loading());
    }

    #[test]
    fn test_first_row_selected_after_load() {
        let app = loaded_app(0);
        assert_eq!(app.listing.selected, Some(1));
        assert!(!app.is_loading());
    }

    #[test]
    fn test_select_next_wraps_around() {
        let mut app = loaded_app(2);
        assert_eq!(app.listing.selected, Some(11));
        app.handle_action(Action::MoveDown);
        assert_eq!(app.listing.selected, Some(12));
        app.handle_action(Action::MoveDown);
        assert_eq!(app.listing.selected, Some(11));
        app.handle_action(Action::MoveUp);
        assert_eq!(app.listing.selected, Some(12));
    }

    #[test]
    fn test_select_on_empty_list_clears() {
        let mut selected = Some(3);
        select_next_id(&[], &mut selected);
        assert!(selected.is_none());
        select_prev_id(&[], &mut selected);
        assert!(selected.is_none());
    }

    #[test]
    fn test_jump_forward_clamps_to_last_page() {
        let mut app = loaded_app(0);
        let flow = app.handle_action(Action::JumpForward);
        assert_eq!(
            flow,
            Flow::Continue(vec![Command::LoadPage {
                page_index: 2,
                request: PageRequest::Index(2)
            }])
        );
        assert!(app.listing.collection.is_loading());
    }

    #[test]
    fn test_prev_on_first_page_is_noop() {
        let mut app = loaded_app(0);
        assert_eq!(app.handle_action(Action::PrevPage), Flow::Continue(Vec::new()));
    }

    #[test]
    fn test_sort_key_sorts_current_page() {
        let mut app = loaded_app(0);
        app.handle_action(Action::Sort(0));
        app.handle_action(Action::Sort(0));
        let ids: Vec<RecordId> = app.listing.collection.rows().map(|l| l.landlord_id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        // Selection follows the record, not the row.
        assert_eq!(app.listing.selected, Some(1));
        assert_eq!(app.listing.selected_position(), Some(4));
    }

    #[test]
    fn test_open_details_fetches_messages() {
        let mut app = loaded_app(1);
        let flow = app.handle_action(Action::OpenDetails);
        assert_eq!(flow, Flow::Continue(vec![Command::LoadMessages { landlord_id: 6 }]));
        assert_eq!(app.active_view, View::Detail);
        assert_eq!(
            app.route(),
            Route::Detail {
                landlord_id: 6,
                page_index: 1
            }
        );
    }

    #[test]
    fn test_back_returns_without_refetch_when_page_is_loaded() {
        let mut app = loaded_app(1);
        app.handle_action(Action::OpenDetails);
        let flow = app.handle_action(Action::Back);
        assert_eq!(flow, Flow::Continue(Vec::new()));
        assert_eq!(app.active_view, View::Listing);
        assert_eq!(app.route(), Route::Listing { page_index: 1 });
    }

    #[test]
    fn test_jump_prompt_to_landlord_on_page_opens_directly() {
        let mut app = loaded_app(0);
        app.handle_action(Action::OpenJump);
        app.handle_prompt(PromptAction::Input('3'));
        let commands = app.handle_prompt(PromptAction::Submit);
        assert_eq!(commands, vec![Command::LoadMessages { landlord_id: 3 }]);
        assert!(app.jump.is_none());
    }

    #[test]
    fn test_located_landlord_sets_return_page() {
        let mut app = loaded_app(0);
        app.handle_action(Action::OpenJump);
        app.handle_prompt(PromptAction::Input('1'));
        app.handle_prompt(PromptAction::Input('2'));
        let commands = app.handle_prompt(PromptAction::Submit);
        assert_eq!(commands, vec![Command::Locate { landlord_id: 12 }]);

        let commands = app.apply_located(
            12,
            Ok(Located {
                record: landlord(12, "Landlord 12"),
                page_index: 2,
                pages_visited: 3,
            }),
        );
        assert_eq!(commands, vec![Command::LoadMessages { landlord_id: 12 }]);
        assert_eq!(app.detail.return_page, 2);

        // Going back lands on the page the landlord lives on.
        let flow = app.handle_action(Action::Back);
        assert_eq!(
            flow,
            Flow::Continue(vec![Command::LoadPage {
                page_index: 2,
                request: PageRequest::Index(2)
            }])
        );
    }

    #[test]
    fn test_not_found_surfaces_error() {
        let mut app = loaded_app(0);
        app.navigate_to_landlord(404);
        app.apply_located(404, Err(CollectionError::NotFound { id: 404 }));
        assert_eq!(app.current_error(), Some("Landlord 404 not found"));
        assert!(!app.is_loading());
    }

    #[test]
    fn test_stale_lookup_result_dropped() {
        let mut app = loaded_app(0);
        app.navigate_to_landlord(404);
        app.handle_action(Action::Back);
        let commands = app.apply_located(
            404,
            Ok(Located {
                record: landlord(404, "Late"),
                page_index: 0,
                pages_visited: 1,
            }),
        );
        assert!(commands.is_empty());
        assert!(app.detail.landlord.is_none());
    }

    #[test]
    fn test_invalid_prompt_input_notifies() {
        let mut app = loaded_app(0);
        app.handle_action(Action::OpenJump);
        let commands = app.handle_prompt(PromptAction::Submit);
        assert!(commands.is_empty());
        assert_eq!(
            app.notifications.last().map(|n| n.level),
            Some(NotificationLevel::Error)
        );
    }

    #[test]
    fn test_failed_page_load_keeps_listing() {
        let mut app = loaded_app(0);
        app.handle_action(Action::NextPage);
        app.apply_page_loaded(1, Err(CollectionError::network("HTTP 500: boom")));
        assert_eq!(app.listing.collection.current_page_index(), 0);
        assert_eq!(app.current_error(), Some("Network error: HTTP 500: boom"));

        app.handle_action(Action::Refresh);
        app.apply_page_loaded(0, Ok(page(0)));
        assert_eq!(app.current_error(), None);
    }

    #[test]
    fn test_escape_dismisses_listing_error() {
        let mut app = loaded_app(0);
        app.handle_action(Action::NextPage);
        app.apply_page_loaded(1, Err(CollectionError::network("timed out")));
        assert!(app.current_error().is_some());
        assert_eq!(app.handle_action(Action::Back), Flow::Continue(Vec::new()));
        assert_eq!(app.current_error(), None);
    }

    #[test]
    fn test_messages_applied_for_open_landlord_only() {
        let mut app = loaded_app(0);
        app.handle_action(Action::OpenDetails);
        app.apply_messages(
            2,
            Ok(vec![Message {
                message_id: 1,
                message: "wrong landlord".to_string(),
                timestamp: String::new(),
                landlord: 2,
            }]),
        );
        assert!(app.detail.messages.is_empty());
        assert!(app.detail.messages_loading);

        app.apply_messages(1, Ok(Vec::new()));
        assert!(!app.detail.messages_loading);
    }

    #[test]
    fn test_modal_swallows_next_action() {
        let mut app = loaded_app(0);
        app.handle_action(Action::OpenHelp);
        assert!(app.modal.is_some());
        assert_eq!(app.handle_action(Action::MoveDown), Flow::Continue(Vec::new()));
        assert!(app.modal.is_none());
        assert_eq!(app.listing.selected, Some(1));
        assert_eq!(app.handle_action(Action::Quit), Flow::Quit);
    }

    #[test]
    fn test_quit_works_with_modal_open() {
        let mut app = loaded_app(0);
        app.handle_action(Action::OpenHelp);
        assert_eq!(app.handle_action(Action::Quit), Flow::Quit);
    }
}
