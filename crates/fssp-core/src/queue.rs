//! Breadth-first closure over windows.

use std::collections::{HashSet, VecDeque};

use crate::Segment;

/// FIFO of windows awaiting verification.
///
/// Every window is queued at most once over the lifetime of the queue, so
/// draining it terminates: there are finitely many windows of a given width
/// over a finite alphabet.
#[derive(Debug, Clone)]
pub struct WindowQueue {
    width: usize,
    gran: usize,
    queued: VecDeque<Segment>,
    seen: HashSet<Segment>,
}

impl WindowQueue {
    /// Queue for windows of `width` cells stepped by `gran`.
    pub fn new(width: usize, gran: usize) -> Self {
        Self {
            width,
            gran,
            queued: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Break `segment` into windows and queue the ones never seen before.
    ///
    /// Returns how many windows were queued.
    pub fn enqueue(&mut self, segment: &Segment) -> usize {
        let mut added = 0;
        for window in segment.windows(self.width, self.gran) {
            if self.seen.insert(window.clone()) {
                self.queued.push_back(window);
                added += 1;
            }
        }
        added
    }

    /// Pop the oldest queued window.
    pub fn dequeue(&mut self) -> Option<Segment> {
        self.queued.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Number of windows still waiting.
    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    /// Every window ever queued, including the ones already dequeued.
    pub fn seen(&self) -> impl Iterator<Item = &Segment> {
        self.seen.iter()
    }
}
