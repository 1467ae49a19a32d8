use thiserror::Error;

/// Failures a caller could have checked up front. Unknown ids are never
/// errors; those calls are no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Playlist name is required.")]
    EmptyPlaylistName,
}
