use std::collections::HashSet;

use rand::Rng;

use crate::models::{Playlist, PlaylistId, Song};
use crate::store::LibraryStore;

/// Clamp-move helper shared by every vertical list.
fn offset_selection(selected: usize, len: usize, offset: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (selected as isize + offset).clamp(0, len as isize - 1) as usize
}

/// The Songs tab: the whole library, optionally filtered by a search query.
pub(crate) struct SongListScreen {
    pub(crate) filter: Option<String>,
    pub(crate) songs: Vec<Song>,
    pub(crate) selected: usize,
}

impl SongListScreen {
    pub(crate) fn new(store: &LibraryStore) -> Self {
        let mut screen = Self {
            filter: None,
            songs: Vec::new(),
            selected: 0,
        };
        screen.refresh(store);
        screen
    }

    /// Re-run the current filter against the store.
    pub(crate) fn refresh(&mut self, store: &LibraryStore) {
        self.songs = match &self.filter {
            Some(query) => store.search_songs(query),
            None => store.songs().to_vec(),
        };
        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>, store: &LibraryStore) {
        self.filter = filter.filter(|query| !query.trim().is_empty());
        self.selected = 0;
        self.refresh(store);
    }

    pub(crate) fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.songs.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = offset_selection(self.selected, self.songs.len(), offset);
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.songs.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.songs.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.songs.len() {
            self.selected = self.songs.len() - 1;
        }
    }
}

/// The Home tab only tracks which "Recently Added" row is highlighted.
#[derive(Default)]
pub(crate) struct HomeScreen {
    pub(crate) selected: usize,
}

impl HomeScreen {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        self.selected = offset_selection(self.selected, len, offset);
    }

    pub(crate) fn clamp(&mut self, len: usize) {
        self.selected = offset_selection(self.selected, len, 0);
    }
}

/// Selection state for the playlist grid, including multi-select mode.
#[derive(Default)]
pub(crate) struct PlaylistGridState {
    pub(crate) selected: usize,
    pub(crate) selecting: bool,
    pub(crate) marked: HashSet<PlaylistId>,
}

impl PlaylistGridState {
    pub(crate) fn move_by(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + offset;
        if (0..len as isize).contains(&next) {
            self.selected = next as usize;
        }
    }

    pub(crate) fn toggle_selecting(&mut self) -> bool {
        self.selecting = !self.selecting;
        if !self.selecting {
            self.marked.clear();
        }
        self.selecting
    }

    pub(crate) fn toggle_mark(&mut self, id: PlaylistId) {
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
    }

    /// Drop marks for playlists that no longer exist and keep the cursor on a
    /// card.
    pub(crate) fn retain_existing(&mut self, playlists: &[Playlist]) {
        let live: HashSet<PlaylistId> = playlists.iter().map(|playlist| playlist.id).collect();
        self.marked.retain(|id| live.contains(id));
        if playlists.is_empty() {
            self.selected = 0;
        } else if self.selected >= playlists.len() {
            self.selected = playlists.len() - 1;
        }
    }
}

/// One playlist opened from the grid.
pub(crate) struct PlaylistDetailScreen {
    pub(crate) playlist: Playlist,
    pub(crate) songs: Vec<Song>,
    /// Membership positions of `songs`; empty while shuffled.
    positions: Vec<usize>,
    pub(crate) shuffled: bool,
    pub(crate) selected: usize,
}

impl PlaylistDetailScreen {
    pub(crate) fn new(playlist: Playlist, store: &LibraryStore) -> Self {
        let mut screen = Self {
            playlist,
            songs: Vec::new(),
            positions: Vec::new(),
            shuffled: false,
            selected: 0,
        };
        screen.load_ordered(store);
        screen
    }

    /// Reload from the store. Returns `false` when the playlist is gone. Any
    /// shuffled view is discarded because membership may have changed.
    pub(crate) fn refresh(&mut self, store: &LibraryStore) -> bool {
        let Some(playlist) = store.playlist(self.playlist.id) else {
            return false;
        };
        self.playlist = playlist;
        self.load_ordered(store);
        self.selected = offset_selection(self.selected, self.songs.len(), 0);
        true
    }

    pub(crate) fn shuffle<R: Rng + ?Sized>(&mut self, store: &LibraryStore, rng: &mut R) {
        self.songs = store.shuffled_songs_in_playlist(self.playlist.id, rng);
        self.positions.clear();
        self.shuffled = true;
        self.selected = 0;
    }

    fn load_ordered(&mut self, store: &LibraryStore) {
        let (positions, songs) = store
            .playlist_entries(self.playlist.id)
            .into_iter()
            .unzip();
        self.positions = positions;
        self.songs = songs;
        self.shuffled = false;
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.songs.get(self.selected)
    }

    /// Membership position of the highlighted row. `None` in shuffled order.
    pub(crate) fn current_position(&self) -> Option<usize> {
        self.positions.get(self.selected).copied()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = offset_selection(self.selected, self.songs.len(), offset);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::seed::SeedCatalog;

    fn store() -> LibraryStore {
        LibraryStore::new(SeedCatalog {
            songs: vec![
                Song::new("Midnight Drive", "Nova"),
                Song::new("Golden Hour", "Aria"),
                Song::new("Night Market", "Juno"),
            ],
            playlists: Vec::new(),
        })
    }

    #[test]
    fn song_list_filter_and_bounds() {
        let mut store = store();
        let mut screen = SongListScreen::new(&store);
        screen.select_last();
        assert_eq!(screen.selected, 2);

        screen.set_filter(Some("night".to_string()), &store);
        assert_eq!(screen.songs.len(), 2);
        screen.select_last();

        let last = screen.current_song().unwrap().id;
        store.delete_song(last);
        screen.refresh(&store);
        assert_eq!(screen.songs.len(), 1);
        assert_eq!(screen.selected, 0);

        screen.set_filter(Some("   ".to_string()), &store);
        assert!(!screen.has_filter());
        assert_eq!(screen.songs.len(), 2);
    }

    #[test]
    fn grid_marks_are_pruned() {
        let mut store = store();
        let gym = store.create_playlist("Gym", None).unwrap();
        let chill = store.create_playlist("Chill", None).unwrap();
        let mut grid = PlaylistGridState::default();
        grid.toggle_selecting();
        grid.toggle_mark(gym.id);
        grid.toggle_mark(chill.id);
        grid.move_by(1, 2);

        store.delete_playlists(&HashSet::from([chill.id]));
        grid.retain_existing(&store.playlists());

        assert_eq!(grid.marked, HashSet::from([gym.id]));
        assert_eq!(grid.selected, 0);
        assert!(!grid.toggle_selecting());
        assert!(grid.marked.is_empty());
    }

    #[test]
    fn grid_moves_stay_inside() {
        let mut grid = PlaylistGridState::default();
        grid.move_by(-1, 3);
        assert_eq!(grid.selected, 0);
        grid.move_by(4, 3);
        assert_eq!(grid.selected, 0);
        grid.move_by(2, 3);
        assert_eq!(grid.selected, 2);
    }

    #[test]
    fn detail_refresh_resets_shuffle_and_detects_deletion() {
        let mut store = store();
        let list = store.create_playlist("Mix", None).unwrap();
        for song in store.songs().to_vec() {
            store.add_song_to_playlist(&song, list.id);
        }
        let mut detail = PlaylistDetailScreen::new(store.playlist(list.id).unwrap(), &store);
        detail.shuffle(&store, &mut StdRng::seed_from_u64(1));
        assert!(detail.shuffled);
        assert_eq!(detail.current_position(), None);

        assert!(detail.refresh(&store));
        assert!(!detail.shuffled);
        assert_eq!(detail.current_position(), Some(0));
        assert_eq!(detail.songs, store.songs_in_playlist(list.id));

        store.delete_playlists(&HashSet::from([list.id]));
        assert!(!detail.refresh(&store));
    }
}
