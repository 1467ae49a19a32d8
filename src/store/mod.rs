//! In-memory library state: songs, playlists, playlist membership, artwork,
//! per-song levels and the play queue.
//!
//! The store is the single source of truth for every screen. All mutations
//! are synchronous and publish a [`StoreEvent`] to subscribers before they
//! return. Membership is private to this module tree; the only way to change
//! it is through the methods in `playlists.rs` and `songs.rs`, which is what
//! keeps `Playlist::count` equal to the membership length.

mod error;
mod events;
mod playlists;
mod queue;
mod songs;

use std::collections::{HashMap, VecDeque};

use tracing::debug;

pub use error::StoreError;
pub use events::{StoreEvent, SubscriptionId};

use crate::models::{ArtworkRef, Levels, Playlist, PlaylistId, Song, SongId};
use crate::seed::SeedCatalog;
use events::Subscribers;

/// Stored playlist row. There is no count field; snapshots derive it.
#[derive(Debug, Clone)]
struct PlaylistEntry {
    id: PlaylistId,
    name: String,
}

/// Owner of every library collection. Construct one at startup and lend it
/// to consumers; there is no global instance.
#[derive(Debug, Default)]
pub struct LibraryStore {
    songs: Vec<Song>,
    playlists: Vec<PlaylistEntry>,
    membership: HashMap<PlaylistId, Vec<SongId>>,
    artwork: HashMap<PlaylistId, ArtworkRef>,
    levels: HashMap<SongId, Levels>,
    queue: VecDeque<Song>,
    subscribers: Subscribers,
}

impl LibraryStore {
    /// Build a store from trusted seed data. Seed ids are taken as-is.
    pub fn new(seed: SeedCatalog) -> Self {
        let mut store = Self {
            songs: seed.songs,
            ..Self::default()
        };

        for playlist in seed.playlists {
            store.membership.insert(playlist.id, playlist.song_ids);
            if let Some(artwork) = playlist.artwork {
                store.artwork.insert(playlist.id, artwork);
            }
            store.playlists.push(PlaylistEntry {
                id: playlist.id,
                name: playlist.name,
            });
        }

        debug!(
            songs = store.songs.len(),
            playlists = store.playlists.len(),
            "library store initialized"
        );
        store
    }

    /// Register a callback invoked synchronously after every effective
    /// mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.subscribers.add(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, event: StoreEvent) {
        debug!(?event, "store mutated");
        self.subscribers.publish(event);
    }

    /// Library songs in insertion order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    /// Snapshots of every playlist in creation order.
    pub fn playlists(&self) -> Vec<Playlist> {
        self.playlists
            .iter()
            .map(|entry| self.snapshot(entry))
            .collect()
    }

    pub fn playlist(&self, id: PlaylistId) -> Option<Playlist> {
        self.playlists
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| self.snapshot(entry))
    }

    fn snapshot(&self, entry: &PlaylistEntry) -> Playlist {
        Playlist {
            id: entry.id,
            name: entry.name.clone(),
            count: self.membership.get(&entry.id).map_or(0, Vec::len),
        }
    }

    fn has_playlist(&self, id: PlaylistId) -> bool {
        self.playlists.iter().any(|entry| entry.id == id)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{PlaylistId, Song, SongId};
    use crate::seed::{SeedCatalog, SeedPlaylist};

    use super::LibraryStore;

    pub(crate) fn song(title: &str, artist: &str) -> Song {
        Song::new(title, artist)
    }

    pub(crate) fn store_with_songs(songs: &[Song]) -> LibraryStore {
        LibraryStore::new(SeedCatalog {
            songs: songs.to_vec(),
            playlists: Vec::new(),
        })
    }

    pub(crate) fn seed_playlist(name: &str, song_ids: Vec<SongId>) -> SeedPlaylist {
        SeedPlaylist {
            id: PlaylistId::new(),
            name: name.to_string(),
            song_ids,
            artwork: None,
        }
    }

    /// Every playlist count must match its membership list.
    pub(crate) fn assert_counts_consistent(store: &LibraryStore) {
        for playlist in store.playlists() {
            let members = store.membership.get(&playlist.id).map_or(0, Vec::len);
            assert_eq!(playlist.count, members, "count drifted for {}", playlist.name);
        }
    }
}
