//! Mini-player state: which song is playing and how next/previous move.
//! There is no audio here; the player only decides song identities.

use std::collections::VecDeque;

use tracing::debug;

use crate::models::{Song, SongId};
use crate::store::LibraryStore;

/// Number of entries kept in the recently-played list.
const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct MiniPlayer {
    now_playing: Option<Song>,
    is_playing: bool,
    history: VecDeque<SongId>,
}

impl Default for MiniPlayer {
    fn default() -> Self {
        Self {
            now_playing: None,
            is_playing: true,
            history: VecDeque::new(),
        }
    }
}

impl MiniPlayer {
    pub fn now_playing(&self) -> Option<&Song> {
        self.now_playing.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn toggle_playing(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }

    /// Recently played song ids, newest first.
    pub fn history(&self) -> impl Iterator<Item = &SongId> + '_ {
        self.history.iter()
    }

    /// Pick the first library song when nothing is loaded yet.
    pub fn start(&mut self, store: &LibraryStore) {
        if self.now_playing.is_none() {
            if let Some(first) = store.songs().first() {
                self.play(first.clone());
            }
        }
    }

    /// Switch to a specific song.
    pub fn play(&mut self, song: Song) {
        debug!(song = %song.id, "now playing");
        if self.history.front() != Some(&song.id) {
            self.history.push_front(song.id);
            self.history.truncate(HISTORY_LIMIT);
        }
        self.now_playing = Some(song);
    }

    /// Play the head of the queue, or the next library song after the current
    /// one (wrapping around) when the queue is empty.
    pub fn advance(&mut self, store: &mut LibraryStore) {
        if let Some(queued) = store.pop_queue() {
            self.play(queued);
            return;
        }
        if let Some(next) = self.library_neighbour(store, 1) {
            self.play(next);
        }
    }

    /// Previous library song, wrapping around. The queue is not consulted.
    pub fn step_back(&mut self, store: &LibraryStore) {
        if let Some(previous) = self.library_neighbour(store, -1) {
            self.play(previous);
        }
    }

    /// React to library changes: pick up an edited record for the current
    /// song, or fall back to the first library song (nothing when the library
    /// is empty) if it disappeared.
    pub fn sync_with_library(&mut self, store: &LibraryStore) {
        let current = self
            .now_playing
            .as_ref()
            .and_then(|playing| store.song(playing.id));
        if let Some(current) = current {
            self.now_playing = Some(current.clone());
            return;
        }
        self.now_playing = None;
        self.start(store);
    }

    fn library_neighbour(&self, store: &LibraryStore, offset: isize) -> Option<Song> {
        let current = self.now_playing.as_ref()?;
        let songs = store.songs();
        if songs.is_empty() {
            return None;
        }
        let index = songs.iter().position(|song| song.id == current.id)?;
        let len = songs.len() as isize;
        let target = (index as isize + offset).rem_euclid(len) as usize;
        Some(songs[target].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedCatalog;

    fn store(titles: &[&str]) -> LibraryStore {
        LibraryStore::new(SeedCatalog {
            songs: titles.iter().map(|title| Song::new(*title, "x")).collect(),
            playlists: Vec::new(),
        })
    }

    fn title(player: &MiniPlayer) -> Option<&str> {
        player.now_playing().map(|song| song.title.as_str())
    }

    #[test]
    fn starts_with_first_library_song() {
        let store = store(&["One", "Two"]);
        let mut player = MiniPlayer::default();
        player.start(&store);
        assert_eq!(title(&player), Some("One"));
        assert!(player.is_playing());
    }

    #[test]
    fn advance_prefers_queue_then_wraps_library() {
        let mut store = store(&["One", "Two", "Three"]);
        let queued = store.songs()[0].clone();
        store.add_to_queue(&queued);
        let mut player = MiniPlayer::default();
        player.play(store.songs()[2].clone());

        player.advance(&mut store);
        assert_eq!(title(&player), Some("One"));
        assert_eq!(store.queue_len(), 0);

        player.advance(&mut store);
        assert_eq!(title(&player), Some("Two"));

        player.play(store.songs()[2].clone());
        player.advance(&mut store);
        assert_eq!(title(&player), Some("One"));
    }

    #[test]
    fn step_back_wraps_to_last() {
        let store = store(&["One", "Two", "Three"]);
        let mut player = MiniPlayer::default();
        player.start(&store);

        player.step_back(&store);
        assert_eq!(title(&player), Some("Three"));
        player.step_back(&store);
        assert_eq!(title(&player), Some("Two"));
    }

    #[test]
    fn navigation_is_a_no_op_for_songs_outside_the_library() {
        let mut store = store(&["One"]);
        let mut player = MiniPlayer::default();
        player.play(Song::new("Stray", "y"));

        player.advance(&mut store);
        player.step_back(&store);

        assert_eq!(title(&player), Some("Stray"));
    }

    #[test]
    fn sync_after_delete_falls_back_to_first_song() {
        let mut store = store(&["One", "Two"]);
        let mut player = MiniPlayer::default();
        let two = store.songs()[1].clone();
        player.play(two.clone());

        store.delete_song(two.id);
        player.sync_with_library(&store);
        assert_eq!(title(&player), Some("One"));

        let one = store.songs()[0].id;
        store.delete_song(one);
        player.sync_with_library(&store);
        assert!(player.now_playing().is_none());
    }

    #[test]
    fn history_is_newest_first_without_repeats() {
        let store = store(&["One", "Two"]);
        let mut player = MiniPlayer::default();
        let one = store.songs()[0].clone();
        let two = store.songs()[1].clone();

        player.play(one.clone());
        player.play(one.clone());
        player.play(two.clone());

        let history: Vec<SongId> = player.history().copied().collect();
        assert_eq!(history, vec![two.id, one.id]);
    }

    #[test]
    fn history_is_capped() {
        let store = store(&["One", "Two"]);
        let mut player = MiniPlayer::default();
        for _ in 0..HISTORY_LIMIT {
            player.play(store.songs()[0].clone());
            player.play(store.songs()[1].clone());
        }
        assert_eq!(player.history().count(), HISTORY_LIMIT);
    }

    #[test]
    fn toggle_flips_play_state() {
        let mut player = MiniPlayer::default();
        assert!(!player.toggle_playing());
        assert!(player.toggle_playing());
    }

    #[test]
    fn sync_picks_up_edited_record() {
        let mut store = store(&["One", "Two"]);
        let mut player = MiniPlayer::default();
        player.start(&store);

        let mut edited = store.songs()[0].clone();
        edited.title = "Uno".to_string();
        store.replace_song(edited);
        player.sync_with_library(&store);

        assert_eq!(title(&player), Some("Uno"));
    }
}
