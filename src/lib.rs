//! AmpleIt: an in-memory music library (songs, playlists, artwork, levels and
//! a play queue) driven from a terminal UI.
//!
//! [`store::LibraryStore`] is the single source of truth. Everything else
//! either seeds it ([`seed`]), observes it ([`ui`], [`player`]) or sets up the
//! process around it ([`config`], [`logging`]).
pub mod config;
pub mod logging;
pub mod models;
pub mod player;
pub mod seed;
pub mod store;
pub mod ui;

pub use config::{AppConfig, CliArgs};
pub use models::{Artwork, ArtworkRef, Levels, Playlist, PlaylistId, Song, SongId};
pub use store::{LibraryStore, StoreError, StoreEvent, SubscriptionId};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
