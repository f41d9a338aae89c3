use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::math::{lex_cmp, Point2};

/// What happens to the status structure at an event point.
///
/// The variant order is the processing order for events at the same point:
/// edges that end there leave first, crossings swap next, new edges enter last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    End,
    Cross,
    Begin,
}

/// A point where the status structure changes.
///
/// `a` and `b` index the sweep's edge arena. Begin and End events concern a
/// single edge and carry it in both slots; Cross events carry the pair with
/// `a < b`.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub point: Point2,
    pub kind: EventKind,
    pub a: usize,
    pub b: usize,
}

impl Event {
    #[must_use]
    pub fn begin(point: Point2, edge: usize) -> Self {
        Self {
            point,
            kind: EventKind::Begin,
            a: edge,
            b: edge,
        }
    }

    #[must_use]
    pub fn end(point: Point2, edge: usize) -> Self {
        Self {
            point,
            kind: EventKind::End,
            a: edge,
            b: edge,
        }
    }

    #[must_use]
    pub fn cross(point: Point2, a: usize, b: usize) -> Self {
        Self {
            point,
            kind: EventKind::Cross,
            a: a.min(b),
            b: a.max(b),
        }
    }
}

/// Sweep order: `u` ascending, then `v`, then kind, then edge index.
///
/// Points compare exactly. Near-coincident points are the status
/// structure's concern, not the queue's.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        lex_cmp(&self.point, &other.point)
            .then(self.kind.cmp(&other.kind))
            .then(self.a.cmp(&other.a))
            .then(self.b.cmp(&other.b))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

/// Min-priority queue of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Event>>,
}

impl EventQueue {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.heap.push(Reverse(event));
    }

    /// Removes and returns the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(e)| e)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
