use crate::models::{PlaylistId, Song};

use super::{SeedCatalog, SeedPlaylist};

const DEMO_SONGS: &[(&str, &str)] = &[
    ("Midnight Drive", "Nova"),
    ("Golden Hour", "Aria"),
    ("Neon Skyline", "Kairo"),
    ("Afterglow", "Selene"),
    ("Slow Motion", "The Satellites"),
    ("Ocean Glass", "Mira"),
    ("Night Market", "Juno"),
    ("Paper Planes", "Lumen"),
    ("Static Bloom", "Echo Park"),
    ("Rainy Streetlights", "Orchid"),
];

/// Playlist names with the indices of the demo songs they hold.
const DEMO_PLAYLISTS: &[(&str, &[usize])] = &[
    ("Gym Mix", &[2, 4, 8]),
    ("Late Night", &[0, 6, 9, 3]),
    ("Practice Loops", &[]),
    ("Road Trip", &[0, 1, 7, 5, 2]),
    ("Chill", &[5, 3]),
    ("Focus", &[]),
];

/// Library used when no catalog file is available. Ids are minted fresh on
/// every call.
pub fn demo_catalog() -> SeedCatalog {
    let songs: Vec<Song> = DEMO_SONGS
        .iter()
        .map(|(title, artist)| Song::new(*title, *artist))
        .collect();

    let playlists = DEMO_PLAYLISTS
        .iter()
        .map(|(name, members)| SeedPlaylist {
            id: PlaylistId::new(),
            name: name.to_string(),
            song_ids: members.iter().map(|index| songs[*index].id).collect(),
            artwork: None,
        })
        .collect();

    SeedCatalog { songs, playlists }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::store::LibraryStore;

    #[test]
    fn demo_membership_resolves_fully() {
        let store = LibraryStore::new(demo_catalog());

        assert_eq!(store.songs().len(), DEMO_SONGS.len());
        assert_eq!(store.playlists().len(), DEMO_PLAYLISTS.len());
        for playlist in store.playlists() {
            assert_eq!(store.songs_in_playlist(playlist.id).len(), playlist.count);
        }
    }

    #[test]
    fn demo_ids_are_unique() {
        let seed = demo_catalog();
        let ids: HashSet<_> = seed.songs.iter().map(|song| song.id).collect();
        assert_eq!(ids.len(), seed.songs.len());
    }
}
