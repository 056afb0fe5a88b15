//! Personal library tracker for books, manga and manhwa: an authoritative
//! in-memory catalog persisted to a local key-value store, plus the
//! filter/sort projection that drives the library grid.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::CatalogStore`]:
//! ```
//! use shelflog::{
//!     book::BookDraft,
//!     core::store::CatalogStore,
//!     view::{filter::{FilterState, SortMode}, projector::project},
//! };
//!
//! let mut store = CatalogStore::seeded();
//! let id = store.add_or_replace(BookDraft {
//!     rating: 3,
//!     category: "seinen".to_string(),
//!     ..BookDraft::titled("Vagabond")
//! }, None).expect("add");
//! assert_eq!(store.id_at(0), Some(id));
//! assert!(store.categories().contains("seinen"));
//!
//! let view = project(&store, &FilterState::default().with_sort(SortMode::Rating));
//! assert_eq!(view.books[0].title, "Berserk");
//! assert_eq!(view.count, 3);
//! ```
//!
//! Runtime usage with SQLite storage:
//! ```no_run
//! use shelflog::{
//!     book::BookDraft,
//!     persist::sqlite::SqliteKvStore,
//!     runtime::handle::{open_shelf, RuntimeConfig},
//!     view::filter::FilterState,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let kv = SqliteKvStore::open("shelf.db").expect("open sqlite");
//! let handle = open_shelf(Box::new(kv), RuntimeConfig::default()).await.expect("open");
//! let _id = handle.add(BookDraft::titled("Berserk")).await.expect("add");
//! let view = handle.project(FilterState::default().with_search("ber")).await.expect("project");
//! println!("{} books", view.count);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
/// Book records and drafts.
pub mod book;
/// Category registry.
pub mod category;
/// Core in-memory catalog store.
pub mod core;
/// Cover image references.
pub mod cover;
/// Cache-first offline asset shim.
pub mod offline;
/// Key-value persistence abstraction and backends.
pub mod persist;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
/// Filter state, projection and card rendering data.
pub mod view;
