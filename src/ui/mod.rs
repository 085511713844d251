//! Ratatui front-end: the song list with search and language chips, the lyrics
//! view, and an About popup fed by the offline asset cache.

mod app;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
