//! Projection of the catalog into what the library grid shows.

/// Card fields for one displayed book.
pub mod card;
/// Transient filter and sort selections.
pub mod filter;
/// Filter/sort pipeline over the catalog.
pub mod projector;
