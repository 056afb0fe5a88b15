//! Runtime event stream payloads.

use crate::types::BookId;

/// Message shown to the user when a book is saved without a title.
pub const EMPTY_TITLE_MESSAGE: &str = "Please enter a book name";

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfEvent {
    /// A new book was added to the front of the catalog.
    BookAdded {
        /// New book id.
        id: BookId,
    },
    /// An existing book was overwritten.
    BookUpdated {
        /// Updated book id.
        id: BookId,
    },
    /// A book was deleted.
    BookRemoved {
        /// Removed book id.
        id: BookId,
    },
    /// A category was appended to the registry.
    CategoryCreated {
        /// Registered name.
        name: String,
    },
    /// A category was renamed and its books repointed.
    CategoryRenamed {
        /// Previous name.
        from: String,
        /// New name.
        to: String,
        /// Books whose category changed.
        books_moved: usize,
    },
    /// The catalog was written to durable storage.
    Saved,
    /// A save was refused; `message` is meant for the user.
    ValidationFailed {
        /// User-facing text.
        message: String,
    },
}
