use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::models::{Artwork, ArtworkRef, Playlist, PlaylistId, Song, SongId};

use super::{LibraryStore, PlaylistEntry, StoreError, StoreEvent};

impl LibraryStore {
    /// Create an empty playlist. Blank names are rejected here as well as in
    /// the form that collects them.
    pub fn create_playlist(
        &mut self,
        name: &str,
        artwork: Option<ArtworkRef>,
    ) -> Result<Playlist, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyPlaylistName);
        }

        let entry = PlaylistEntry {
            id: PlaylistId::new(),
            name: name.to_string(),
        };
        self.membership.insert(entry.id, Vec::new());
        let has_artwork = artwork.is_some();
        if let Some(artwork) = artwork {
            self.artwork.insert(entry.id, artwork);
        }
        let playlist = self.snapshot(&entry);
        self.playlists.push(entry);

        debug!(
            playlist = %playlist.id,
            name = %playlist.name,
            has_artwork,
            "created playlist"
        );
        self.publish(StoreEvent::PlaylistCreated(playlist.id));
        Ok(playlist)
    }

    /// Remove every listed playlist together with its membership and artwork.
    /// Unknown ids are ignored.
    pub fn delete_playlists(&mut self, ids: &HashSet<PlaylistId>) {
        let removed: Vec<PlaylistId> = self
            .playlists
            .iter()
            .filter(|entry| ids.contains(&entry.id))
            .map(|entry| entry.id)
            .collect();
        self.playlists.retain(|entry| !ids.contains(&entry.id));

        for id in ids {
            self.membership.remove(id);
            self.artwork.remove(id);
        }

        if !removed.is_empty() {
            debug!(removed = removed.len(), "deleted playlists");
            self.publish(StoreEvent::PlaylistsDeleted(removed));
        }
    }

    /// Append a song to a playlist. Duplicates are allowed. Returns `false`
    /// and changes nothing when the playlist does not exist.
    pub fn add_song_to_playlist(&mut self, song: &Song, playlist: PlaylistId) -> bool {
        if !self.has_playlist(playlist) {
            debug!(playlist = %playlist, "ignored add to unknown playlist");
            return false;
        }
        self.membership.entry(playlist).or_default().push(song.id);
        self.publish(StoreEvent::MembershipChanged(playlist));
        true
    }

    /// Remove the membership entry at `position`, returning the song id that
    /// occupied it.
    pub fn remove_from_playlist(
        &mut self,
        playlist: PlaylistId,
        position: usize,
    ) -> Option<SongId> {
        let ids = self.membership.get_mut(&playlist)?;
        if position >= ids.len() {
            return None;
        }
        let removed = ids.remove(position);
        self.publish(StoreEvent::MembershipChanged(playlist));
        Some(removed)
    }

    /// Resolve a playlist's membership against the live library, in order.
    /// Ids that no longer resolve are skipped.
    pub fn songs_in_playlist(&self, playlist: PlaylistId) -> Vec<Song> {
        self.playlist_entries(playlist)
            .into_iter()
            .map(|(_, song)| song)
            .collect()
    }

    /// Like [`LibraryStore::songs_in_playlist`], paired with each song's
    /// position in the stored membership list.
    pub fn playlist_entries(&self, playlist: PlaylistId) -> Vec<(usize, Song)> {
        let Some(ids) = self.membership.get(&playlist) else {
            return Vec::new();
        };
        if ids.is_empty() {
            return Vec::new();
        }
        let by_id: HashMap<SongId, &Song> =
            self.songs.iter().map(|song| (song.id, song)).collect();
        ids.iter()
            .enumerate()
            .filter_map(|(position, id)| by_id.get(id).map(|song| (position, (*song).clone())))
            .collect()
    }

    /// Shuffled view of a playlist. The stored order is not changed.
    pub fn shuffled_songs_in_playlist<R: Rng + ?Sized>(
        &self,
        playlist: PlaylistId,
        rng: &mut R,
    ) -> Vec<Song> {
        let mut songs = self.songs_in_playlist(playlist);
        songs.shuffle(rng);
        songs
    }

    /// Artwork for a playlist, falling back to a placeholder derived from its
    /// id.
    pub fn artwork(&self, playlist: PlaylistId) -> Artwork {
        match self.artwork.get(&playlist) {
            Some(reference) => Artwork::Custom(reference.clone()),
            None => Artwork::Placeholder {
                seed: playlist.placeholder_seed(),
            },
        }
    }

    /// Attach or clear artwork. Completions that arrive after the playlist
    /// was deleted return `false` and leave the store untouched.
    pub fn set_playlist_artwork(
        &mut self,
        playlist: PlaylistId,
        artwork: Option<ArtworkRef>,
    ) -> bool {
        if !self.has_playlist(playlist) {
            debug!(playlist = %playlist, "dropped artwork for missing playlist");
            return false;
        }
        match artwork {
            Some(reference) => {
                self.artwork.insert(playlist, reference);
            }
            None => {
                if self.artwork.remove(&playlist).is_none() {
                    return true;
                }
            }
        }
        self.publish(StoreEvent::ArtworkChanged(playlist));
        true
    }
}
