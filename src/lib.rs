//! Core library surface for the hymnal viewer.
//!
//! The pipeline runs leaves first: the store pushes `songs` snapshots, the
//! catalog projector normalizes them, the search engine derives the visible
//! list, and the viewer state machine hands the open song's lyrics to the
//! sectioner for rendering.
pub mod catalog;
pub mod config;
pub mod import;
pub mod logging;
pub mod lyrics;
pub mod models;
pub mod offline;
pub mod search;
pub mod store;
pub mod ui;
pub mod viewer;
pub mod visits;

/// Domain types that other layers manipulate.
pub use models::{LanguageFacet, LyricsBlock, SectionKind, Song};

/// The pure transformations: projection, filtering, and sectioning.
pub use catalog::project;
pub use lyrics::section;
pub use search::{filter, LanguageAliases};

/// Persistence and the state container driven by it.
pub use store::{RealtimeStore, SqliteStore, Subscription};
pub use viewer::{FontSize, Selection, Viewer};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
