use std::collections::VecDeque;

use crate::assets::{loader::AssetKind, priority::Priority};

/// Read-only view of a request waiting for admission, handed to cancellation predicates.
pub trait QueuedRequest {
    /// Resource key.
    fn key(&self) -> &str;
    /// Image or audio.
    fn kind(&self) -> AssetKind;
    /// Class the request was enqueued with.
    fn priority(&self) -> Priority;
}

/// Priority-ordered admission queue with a bound on active work.
///
/// Items are ordered by priority class and FIFO within a class. The queue only tracks
/// the `active` count; starting and finishing work is the caller's job.
#[derive(Debug)]
pub(crate) struct LoadQueue<T> {
    items: VecDeque<T>,
    active: usize,
    limit: usize,
}

impl<T: QueuedRequest> LoadQueue<T> {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            items: VecDeque::new(),
            active: 0,
            limit: limit.max(1),
        }
    }

    /// Insert before the first queued item of strictly lower priority.
    pub(crate) fn push(&mut self, item: T) {
        let rank = item.priority().rank();
        let at = self
            .items
            .iter()
            .position(|queued| queued.priority().rank() > rank)
            .unwrap_or(self.items.len());
        self.items.insert(at, item);
    }

    /// Pop the front item and count it active, if a slot is free.
    pub(crate) fn admit(&mut self) -> Option<T> {
        if self.active >= self.limit {
            return None;
        }
        let item = self.items.pop_front()?;
        self.active += 1;
        Some(item)
    }

    /// Give back the slot held by a finished item.
    pub(crate) fn release(&mut self) {
        debug_assert!(self.active > 0, "release without matching admit");
        self.active = self.active.saturating_sub(1);
    }

    /// Remove every queued (not active) item matching `pred`, preserving the order of the rest.
    pub(crate) fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut kept = VecDeque::with_capacity(self.items.len());
        let mut removed = Vec::new();
        for item in self.items.drain(..) {
            if pred(&item) {
                removed.push(item);
            } else {
                kept.push_back(item);
            }
        }
        self.items = kept;
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn active(&self) -> usize {
        self.active
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/queue.rs"]
mod tests;
