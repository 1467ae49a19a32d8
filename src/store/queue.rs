use crate::models::Song;

use super::{LibraryStore, StoreEvent};

impl LibraryStore {
    /// Append a snapshot of `song` to the tail of the queue. No dedup.
    pub fn add_to_queue(&mut self, song: &Song) {
        self.queue.push_back(song.clone());
        self.publish(StoreEvent::QueueChanged);
    }

    /// Take the head of the queue, or `None` when it is empty.
    pub fn pop_queue(&mut self) -> Option<Song> {
        let head = self.queue.pop_front()?;
        self.publish(StoreEvent::QueueChanged);
        Some(head)
    }

    /// Queued songs, head first.
    pub fn queue(&self) -> impl ExactSizeIterator<Item = &Song> + '_ {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn pops_in_fifo_order_then_none() {
        let songs = vec![song("One", "a"), song("Two", "b"), song("Three", "c")];
        let mut store = store_with_songs(&songs);
        for s in &songs {
            store.add_to_queue(s);
        }

        let mut popped = Vec::new();
        while let Some(next) = store.pop_queue() {
            popped.push(next);
        }

        assert_eq!(popped, songs);
        assert!(store.pop_queue().is_none());
    }

    #[test]
    fn same_song_can_be_queued_repeatedly() {
        let echo = song("Echo", "Nova");
        let mut store = store_with_songs(&[echo.clone()]);
        store.add_to_queue(&echo);
        store.add_to_queue(&echo);

        assert_eq!(store.queue_len(), 2);
        assert!(store.queue().all(|queued| queued.id == echo.id));
    }

    #[test]
    fn queued_snapshot_outlives_library_copy() {
        let echo = song("Echo", "Nova");
        let mut store = store_with_songs(&[]);
        store.add_to_queue(&echo);

        assert_eq!(store.pop_queue(), Some(echo));
    }
}
