use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, OpenFlags};
use uuid::Uuid;

use crate::models::{ArtworkRef, PlaylistId, Song, SongId};

use super::{SeedCatalog, SeedPlaylist};

/// Open an existing catalog file read-only. The library is never written
/// back, so a missing file is reported instead of created.
pub fn open_catalog(path: &Path) -> Result<Connection> {
    if !path.exists() {
        return Err(anyhow!("catalog {} does not exist", path.display()));
    }
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open catalog {}", path.display()))
}

/// Read songs, playlists and playlist membership from a catalog database.
///
/// Expected tables:
/// - `songs(id TEXT, title TEXT, artist TEXT)`
/// - `playlists(id TEXT, name TEXT, artwork TEXT NULL)`
/// - `playlist_songs(playlist_id TEXT, song_id TEXT, position INTEGER)`
///
/// Songs and playlists keep their row order; membership follows `position`.
pub fn load_catalog(conn: &Connection) -> Result<SeedCatalog> {
    let songs = fetch_songs(conn)?;
    let mut membership = fetch_membership(conn)?;

    let playlists = fetch_playlists(conn)?
        .into_iter()
        .map(|(id, name, artwork)| SeedPlaylist {
            song_ids: membership.remove(&id).unwrap_or_default(),
            id,
            name,
            artwork: artwork.map(ArtworkRef::new),
        })
        .collect();

    Ok(SeedCatalog { songs, playlists })
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).with_context(|| format!("invalid {what} id {raw:?} in catalog"))
}

fn fetch_songs(conn: &Connection) -> Result<Vec<Song>> {
    let mut stmt = conn
        .prepare("SELECT id, title, artist FROM songs ORDER BY rowid")
        .context("failed to prepare songs query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })
        .context("failed to iterate songs")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect songs")?;

    rows.into_iter()
        .map(|(id, title, artist)| {
            Ok(Song {
                id: SongId::from_uuid(parse_id(&id, "song")?),
                title,
                artist: artist.unwrap_or_default(),
            })
        })
        .collect()
}

fn fetch_playlists(conn: &Connection) -> Result<Vec<(PlaylistId, String, Option<String>)>> {
    let mut stmt = conn
        .prepare("SELECT id, name, artwork FROM playlists ORDER BY rowid")
        .context("failed to prepare playlists query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })
        .context("failed to iterate playlists")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect playlists")?;

    rows.into_iter()
        .map(|(id, name, artwork)| {
            let artwork = artwork.filter(|reference| !reference.trim().is_empty());
            Ok((PlaylistId::from_uuid(parse_id(&id, "playlist")?), name, artwork))
        })
        .collect()
}

fn fetch_membership(conn: &Connection) -> Result<HashMap<PlaylistId, Vec<SongId>>> {
    let mut stmt = conn
        .prepare(
            "SELECT playlist_id, song_id
             FROM playlist_songs
             ORDER BY playlist_id, position, rowid",
        )
        .context("failed to prepare playlist songs query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to iterate playlist songs")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect playlist songs")?;

    let mut membership: HashMap<PlaylistId, Vec<SongId>> = HashMap::new();
    for (playlist_id, song_id) in rows {
        let playlist = PlaylistId::from_uuid(parse_id(&playlist_id, "playlist")?);
        let song = SongId::from_uuid(parse_id(&song_id, "song")?);
        membership.entry(playlist).or_default().push(song);
    }
    Ok(membership)
}
