//! Initial library contents. The store trusts whatever arrives here: ids are
//! assumed unique and membership lists may reference songs that do not exist.

mod catalog;
mod demo;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::models::{ArtworkRef, PlaylistId, Song, SongId};

pub use catalog::{load_catalog, open_catalog};
pub use demo::demo_catalog;

/// Songs and playlists handed to `LibraryStore::new`.
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    pub songs: Vec<Song>,
    pub playlists: Vec<SeedPlaylist>,
}

/// One preloaded playlist with its ordered membership.
#[derive(Debug, Clone)]
pub struct SeedPlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub song_ids: Vec<SongId>,
    pub artwork: Option<ArtworkRef>,
}

/// Pick the seed source: an explicitly configured catalog, then the catalog
/// file in the data directory, then the built-in demo library.
pub fn load_seed(config: &AppConfig) -> Result<SeedCatalog> {
    if let Some(path) = &config.catalog_path {
        let conn = open_catalog(path)?;
        let seed = load_catalog(&conn)?;
        info!(path = %path.display(), songs = seed.songs.len(), "loaded configured catalog");
        return Ok(seed);
    }

    let default_path = config.default_catalog_path();
    if default_path.exists() {
        let conn = open_catalog(&default_path)?;
        let seed = load_catalog(&conn)?;
        info!(path = %default_path.display(), songs = seed.songs.len(), "loaded catalog");
        return Ok(seed);
    }

    info!("no catalog found, using demo library");
    Ok(demo_catalog())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rusqlite::Connection;

    use super::*;

    fn config_in(dir: &std::path::Path, catalog_path: Option<PathBuf>) -> AppConfig {
        AppConfig {
            data_dir: dir.to_path_buf(),
            catalog_path,
            log_level: None,
            recent_limit: 5,
        }
    }

    #[test]
    fn falls_back_to_demo_library() {
        let dir = tempfile::tempdir().unwrap();
        let seed = load_seed(&config_in(dir.path(), None)).unwrap();
        assert_eq!(seed.songs.len(), demo_catalog().songs.len());
    }

    #[test]
    fn missing_configured_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), Some(dir.path().join("nope.sqlite")));
        assert!(load_seed(&config).is_err());
    }

    #[test]
    fn default_catalog_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), None);
        {
            let conn = Connection::open(config.default_catalog_path()).unwrap();
            catalog::tests::create_schema(&conn);
            conn.execute(
                "INSERT INTO songs (id, title, artist) VALUES (?1, 'Solo', 'One')",
                [SongId::new().to_string()],
            )
            .unwrap();
        }

        let seed = load_seed(&config).unwrap();
        assert_eq!(seed.songs.len(), 1);
        assert_eq!(seed.songs[0].title, "Solo");
    }
}
