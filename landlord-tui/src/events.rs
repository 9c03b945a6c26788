//! Event types for the TUI event loop.

use crossterm::event::KeyEvent;
use landlord_core::{CollectionError, Landlord, Located, Message, Page, RecordId};

/// Everything the main loop reacts to: terminal input, and the results of
/// fetches running on spawned tasks.
#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    PageLoaded {
        page_index: usize,
        result: Result<Page<Landlord>, CollectionError>,
    },
    Located {
        landlord_id: RecordId,
        result: Result<Located<Landlord>, CollectionError>,
    },
    MessagesLoaded {
        landlord_id: RecordId,
        result: Result<Vec<Message>, CollectionError>,
    },
}
