use tracing::debug;

use crate::models::{Levels, Song, SongId, COPY_MARKER};

use super::{LibraryStore, StoreEvent};

impl LibraryStore {
    /// Append a copy of `song` with a fresh id and a copy marker on the title.
    /// Playlist membership is left alone.
    pub fn duplicate_song(&mut self, song: &Song) -> Song {
        let copy = Song {
            id: SongId::new(),
            title: format!("{}{}", song.title, COPY_MARKER),
            artist: song.artist.clone(),
        };
        self.songs.push(copy.clone());
        debug!(source = %song.id, copy = %copy.id, "duplicated song");
        self.publish(StoreEvent::SongsChanged);
        copy
    }

    /// Remove a song from the library, the queue, every playlist and the
    /// levels map. Unknown ids are ignored.
    pub fn delete_song(&mut self, id: SongId) {
        let songs_before = self.songs.len();
        self.songs.retain(|song| song.id != id);
        let removed_from_library = self.songs.len() != songs_before;

        let queue_before = self.queue.len();
        self.queue.retain(|song| song.id != id);
        let removed_from_queue = self.queue.len() != queue_before;

        let mut touched_playlists = Vec::new();
        for entry in &self.playlists {
            if let Some(ids) = self.membership.get_mut(&entry.id) {
                let before = ids.len();
                ids.retain(|member| *member != id);
                if ids.len() != before {
                    touched_playlists.push(entry.id);
                }
            }
        }

        let removed_levels = self.levels.remove(&id).is_some();

        if !removed_from_library
            && !removed_from_queue
            && !removed_levels
            && touched_playlists.is_empty()
        {
            return;
        }

        debug!(
            song = %id,
            playlists = touched_playlists.len(),
            removed_from_queue,
            "deleted song"
        );
        self.publish(StoreEvent::SongDeleted {
            id,
            playlists: touched_playlists,
        });
    }

    /// Replace the library record that shares `song.id`. Membership refers to
    /// songs by id, so playlists pick up the new title at once. Queue entries
    /// are snapshots and keep the old record. Returns `false` for unknown ids.
    pub fn replace_song(&mut self, song: Song) -> bool {
        let Some(slot) = self.songs.iter_mut().find(|existing| existing.id == song.id) else {
            debug!(song = %song.id, "ignored replace of unknown song");
            return false;
        };
        if *slot == song {
            return true;
        }
        *slot = song;
        debug!(song = %slot.id, "replaced song");
        self.publish(StoreEvent::SongsChanged);
        true
    }

    /// Case-insensitive search on title or artist. A blank query returns the
    /// whole library.
    pub fn search_songs(&self, query: &str) -> Vec<Song> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.songs.clone();
        }
        self.songs
            .iter()
            .filter(|song| song.matches(&needle))
            .cloned()
            .collect()
    }

    /// The newest `limit` library songs, newest first.
    pub fn recently_added(&self, limit: usize) -> Vec<Song> {
        self.songs.iter().rev().take(limit).cloned().collect()
    }

    /// Levels for a song, or the defaults when none were saved.
    pub fn levels(&self, id: SongId) -> Levels {
        self.levels.get(&id).copied().unwrap_or_default()
    }

    /// Save levels for a library song. Returns `false` for unknown songs.
    pub fn set_levels(&mut self, id: SongId, levels: Levels) -> bool {
        if self.song(id).is_none() {
            return false;
        }
        self.levels.insert(id, levels.clamped());
        self.publish(StoreEvent::LevelsChanged(id));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::models::LevelField;
    use crate::seed::SeedCatalog;

    #[test]
    fn duplicate_appends_copy_with_new_id() {
        let echo = song("Echo", "Nova");
        let mut store = store_with_songs(&[echo.clone()]);

        let copy = store.duplicate_song(&echo);

        assert_eq!(store.songs().len(), 2);
        assert_eq!(store.songs()[1], copy);
        assert_ne!(copy.id, echo.id);
        assert_eq!(copy.title, "Echo Copy");
        assert_eq!(copy.artist, "Nova");
    }

    #[test]
    fn duplicate_does_not_touch_membership() {
        let echo = song("Echo", "Nova");
        let mut store = store_with_songs(&[echo.clone()]);
        let gym = store.create_playlist("Gym", None).unwrap();
        store.add_song_to_playlist(&echo, gym.id);

        let copy = store.duplicate_song(&echo);

        assert_eq!(store.playlist(gym.id).unwrap().count, 1);
        assert_eq!(store.songs_in_playlist(gym.id), vec![echo]);
        assert!(!store.songs_in_playlist(gym.id).contains(&copy));
    }

    #[test]
    fn delete_removes_song_everywhere_and_keeps_counts_consistent() {
        let a = song("A", "x");
        let b = song("B", "y");
        let c = song("C", "z");
        let mut store = store_with_songs(&[a.clone(), b.clone(), c.clone()]);
        let list = store.create_playlist("Mix", None).unwrap();
        for s in [&a, &b, &c, &b] {
            store.add_song_to_playlist(s, list.id);
        }
        store.add_to_queue(&b);
        store.add_to_queue(&a);
        store.add_to_queue(&b);
        let mut levels = Levels::default();
        levels.set(LevelField::Bass, 4.0);
        store.set_levels(b.id, levels);

        store.delete_song(b.id);

        assert!(store.song(b.id).is_none());
        assert_eq!(store.songs_in_playlist(list.id), vec![a.clone(), c.clone()]);
        assert_eq!(store.playlist(list.id).unwrap().count, 2);
        assert_eq!(store.queue().cloned().collect::<Vec<_>>(), vec![a]);
        assert_eq!(store.levels(b.id), Levels::default());
        assert_counts_consistent(&store);
    }

    #[test]
    fn delete_is_idempotent() {
        let a = song("A", "x");
        let b = song("B", "y");
        let mut store = store_with_songs(&[a.clone(), b.clone()]);
        let list = store.create_playlist("Mix", None).unwrap();
        store.add_song_to_playlist(&a, list.id);
        store.add_song_to_playlist(&b, list.id);

        store.delete_song(a.id);
        let songs_once = store.songs().to_vec();
        let playlists_once = store.playlists();

        store.delete_song(a.id);

        assert_eq!(store.songs(), songs_once.as_slice());
        assert_eq!(store.playlists(), playlists_once);
    }

    #[test]
    fn delete_clears_ids_left_by_seed_data_without_a_library_song() {
        let ghost = SongId::new();
        let list = seed_playlist("Ghosts", vec![ghost]);
        let list_id = list.id;
        let mut store = LibraryStore::new(SeedCatalog {
            songs: Vec::new(),
            playlists: vec![list],
        });
        assert_eq!(store.playlist(list_id).unwrap().count, 1);
        assert!(store.songs_in_playlist(list_id).is_empty());

        store.delete_song(ghost);

        assert_eq!(store.playlist(list_id).unwrap().count, 0);
    }

    #[test]
    fn search_matches_title_or_artist_case_insensitively() {
        let store = store_with_songs(&[
            song("Midnight Drive", "Nova"),
            song("Golden Hour", "Aria"),
            song("Night Market", "Juno"),
        ]);

        let titles: Vec<String> = store
            .search_songs("  NIGHT ")
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Midnight Drive", "Night Market"]);

        assert_eq!(store.search_songs("aria").len(), 1);
        assert_eq!(store.search_songs("   ").len(), 3);
        assert!(store.search_songs("zzz").is_empty());
    }

    #[test]
    fn recently_added_is_newest_first() {
        let a = song("A", "x");
        let b = song("B", "y");
        let mut store = store_with_songs(&[a.clone(), b.clone()]);
        let copy = store.duplicate_song(&a);

        assert_eq!(store.recently_added(2), vec![copy, b]);
        assert_eq!(store.recently_added(10).len(), 3);
    }

    #[test]
    fn levels_only_saved_for_library_songs() {
        let a = song("A", "x");
        let mut store = store_with_songs(&[a.clone()]);
        let levels = Levels {
            speed: 9.0,
            ..Levels::default()
        };

        assert!(!store.set_levels(SongId::new(), levels));
        assert!(store.set_levels(a.id, levels));
        assert_eq!(store.levels(a.id).speed, 4.0);
    }

    #[test]
    fn replace_updates_record_but_not_membership_or_queue() {
        let a = song("Echo", "Nova");
        let b = song("Drift", "Aria");
        let mut store = store_with_songs(&[a.clone(), b.clone()]);
        let list = store.create_playlist("Mix", None).unwrap();
        store.add_song_to_playlist(&a, list.id);
        store.add_song_to_playlist(&b, list.id);
        store.add_to_queue(&a);

        let renamed = Song {
            title: "Echoes".to_string(),
            artist: "Nova & Aria".to_string(),
            ..a.clone()
        };
        assert!(store.replace_song(renamed.clone()));

        assert_eq!(store.songs(), [renamed.clone(), b.clone()].as_slice());
        assert_eq!(store.songs_in_playlist(list.id), vec![renamed, b]);
        assert_eq!(store.playlist(list.id).unwrap().count, 2);
        assert_eq!(store.queue().cloned().collect::<Vec<_>>(), vec![a]);
        assert_counts_consistent(&store);
    }

    #[test]
    fn replace_of_unknown_song_is_a_no_op() {
        let a = song("Echo", "Nova");
        let mut store = store_with_songs(&[a.clone()]);

        assert!(!store.replace_song(song("Stray", "x")));
        assert_eq!(store.songs(), [a].as_slice());
    }
}
