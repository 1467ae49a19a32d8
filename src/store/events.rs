use std::fmt;

use crate::models::{PlaylistId, SongId};

/// What changed inside the store. Exactly one event is published per
/// effective mutation; an event may describe several collections at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A song was added or a record was replaced.
    SongsChanged,
    /// A song left the library. `playlists` lists every playlist whose
    /// membership lost entries; the queue and levels were purged too.
    SongDeleted {
        id: SongId,
        playlists: Vec<PlaylistId>,
    },
    /// A playlist was created, with its artwork if any was given.
    PlaylistCreated(PlaylistId),
    PlaylistsDeleted(Vec<PlaylistId>),
    MembershipChanged(PlaylistId),
    ArtworkChanged(PlaylistId),
    QueueChanged,
    LevelsChanged(SongId),
}

impl StoreEvent {
    /// Whether the event can change what a view of `playlist` shows.
    pub fn touches_playlist(&self, playlist: PlaylistId) -> bool {
        match self {
            StoreEvent::SongsChanged => true,
            StoreEvent::SongDeleted { playlists, .. } => playlists.contains(&playlist),
            StoreEvent::PlaylistsDeleted(ids) => ids.contains(&playlist),
            StoreEvent::MembershipChanged(id) | StoreEvent::ArtworkChanged(id) => *id == playlist,
            StoreEvent::PlaylistCreated(_)
            | StoreEvent::QueueChanged
            | StoreEvent::LevelsChanged(_) => false,
        }
    }

    /// Whether library songs were added, removed or replaced.
    pub fn touches_songs(&self) -> bool {
        matches!(
            self,
            StoreEvent::SongsChanged | StoreEvent::SongDeleted { .. }
        )
    }
}

/// Handle returned by `LibraryStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&StoreEvent) + Send>;

/// Ordered list of subscriber callbacks.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(crate) fn publish(&mut self, event: StoreEvent) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(&event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
