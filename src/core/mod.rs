//! In-memory authoritative catalog.

/// Catalog store and its seed data.
pub mod store;
