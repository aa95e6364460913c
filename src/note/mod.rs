//! Notes that a user can jot down next to their expenses.

mod core;
mod endpoints;

pub use core::{Note, NoteId, NoteStore, NoteText, create_note_table};
pub use endpoints::{NoteForm, create_note_endpoint, list_notes_endpoint};
