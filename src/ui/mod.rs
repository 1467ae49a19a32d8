//! Ratatui front-end: tabs for Home, Songs and Playlists over a single
//! [`LibraryStore`](crate::store::LibraryStore), plus the mini-player line.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
