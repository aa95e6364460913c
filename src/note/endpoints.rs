//! Route handlers for reading and writing notes.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{auth::UserID, expense::CreatedResponse, note::NoteStore};

/// The body of a request to create a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteForm {
    /// The text of the note.
    pub text: String,
}

/// List the user's notes in the order they were added.
pub async fn list_notes_endpoint(
    State(store): State<NoteStore>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match store.list(user_id) {
        Ok(notes) => Json(notes).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Create a note owned by the user and respond with its ID.
pub async fn create_note_endpoint(
    State(store): State<NoteStore>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<NoteForm>,
) -> Response {
    match store.add(user_id, &form.text) {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(error) => error.into_response(),
    }
}
