//! Plane sweep over UV edges (Bentley–Ottmann).
//!
//! The sweep line moves along `u`. Every edge enters at its left endpoint and
//! leaves at its right endpoint; the status structure keeps the active edges
//! ordered by `v`. Two edges are tested when they become neighbours in the
//! status or when both pass through the same event point. An overlap is
//! recorded as soon as its pair is tested; a crossing that lies ahead also
//! queues a Cross event that swaps the pair once the sweep gets there.
//!
//! ```text
//! edges ─▶ Begin/End events ─▶ pop ─┬─ Begin: insert, settle the bundle at the point
//!                                   ├─ End:   remove, test the gap
//!                                   └─ Cross: settle the bundle at the point
//! ```
//!
//! A bundle is every active edge through the event point. All its pairs are
//! tested and it is re-sorted by slope, which handles any number of edges
//! meeting at one point.

mod event;
mod status;

pub use event::{Event, EventKind, EventQueue};
pub use status::{SweepEdge, SweepStatus};

use std::collections::HashSet;

use tracing::warn;

use crate::error::SweepError;
use crate::math::intersect_2d::SegmentIntersection;
use crate::math::{lex_cmp, Point2, TOLERANCE};
use crate::mesh::FaceIndex;
use crate::shell::{EdgeKey, ShellKey, UvEdge};

/// How two edges overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlapKind {
    /// Transversal crossing at a point interior to both edges.
    Crossing,
    /// Coincident collinear stretch of positive length.
    Collinear,
}

/// One side of an [`OverlapFinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeRef {
    pub key: EdgeKey,
    pub shell: ShellKey,
    pub face: FaceIndex,
}

impl From<&UvEdge> for EdgeRef {
    fn from(edge: &UvEdge) -> Self {
        Self {
            key: edge.key,
            shell: edge.shell,
            face: edge.face,
        }
    }
}

/// A pair of overlapping edges.
///
/// `first.key < second.key` always holds, which makes [`identity`] the same
/// no matter which sweep found the pair or in which order.
///
/// [`identity`]: OverlapFinding::identity
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapFinding {
    pub first: EdgeRef,
    pub second: EdgeRef,
    /// Crossing point, or start of the shared stretch.
    pub point: Point2,
    pub kind: OverlapKind,
}

impl OverlapFinding {
    #[must_use]
    pub fn new(a: &UvEdge, b: &UvEdge, point: Point2, kind: OverlapKind) -> Self {
        let (first, second) = if a.key <= b.key { (a, b) } else { (b, a) };
        Self {
            first: first.into(),
            second: second.into(),
            point,
            kind,
        }
    }

    /// Order-independent identity: the unordered edge pair.
    #[must_use]
    pub fn identity(&self) -> (EdgeKey, EdgeKey) {
        (self.first.key, self.second.key)
    }

    /// Stable report order: shell pair, then edge pair.
    #[must_use]
    pub fn sort_key(&self) -> (ShellKey, ShellKey, EdgeKey, EdgeKey) {
        let (s0, s1) = (self.first.shell, self.second.shell);
        (s0.min(s1), s0.max(s1), self.first.key, self.second.key)
    }

    #[must_use]
    pub fn is_cross_shell(&self) -> bool {
        self.first.shell != self.second.shell
    }
}

/// Result of one sweep run.
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    /// Findings in discovery order.
    pub findings: Vec<OverlapFinding>,
    /// Edges rejected before entering the event queue.
    pub skipped: Vec<EdgeKey>,
}

/// Finds every overlapping pair among `edges`.
///
/// # Errors
///
/// Returns [`SweepError`] if the status structure loses track of an edge,
/// which means the sweep's ordering invariant broke down.
pub fn find_intersections<'a, I>(edges: I) -> Result<SweepOutcome, SweepError>
where
    I: IntoIterator<Item = &'a UvEdge>,
{
    SweepLine::new(edges).run()
}

/// State of one sweep run. Owned by a single worker and dropped when the run
/// completes.
pub struct SweepLine<'a> {
    input: Vec<&'a UvEdge>,
    edges: Vec<SweepEdge>,
    queue: EventQueue,
    status: SweepStatus,
    tested: HashSet<(usize, usize)>,
    outcome: SweepOutcome,
}

impl<'a> SweepLine<'a> {
    /// Prepares a sweep. Edges with non-finite coordinates or zero length are
    /// rejected here and listed in [`SweepOutcome::skipped`].
    pub fn new<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a UvEdge>,
    {
        let mut outcome = SweepOutcome::default();
        let mut input = Vec::new();
        for edge in edges {
            if !edge.is_finite() || edge.length() < TOLERANCE {
                warn!(edge = %edge.key, "skipping malformed UV edge");
                outcome.skipped.push(edge.key);
                continue;
            }
            input.push(edge);
        }

        let mut queue = EventQueue::with_capacity(input.len() * 2);
        let edges = input
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let (left, right) = e.sweep_endpoints();
                queue.push(Event::begin(left, i));
                queue.push(Event::end(right, i));
                SweepEdge::new(left, right)
            })
            .collect();

        Self {
            input,
            edges,
            queue,
            status: SweepStatus::new(),
            tested: HashSet::new(),
            outcome,
        }
    }

    /// Processes every event and returns the findings.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingStatusEntry`] if an End event refers to
    /// an edge that is not active.
    pub fn run(mut self) -> Result<SweepOutcome, SweepError> {
        while let Some(event) = self.queue.pop() {
            match event.kind {
                EventKind::Begin => self.on_begin(&event),
                EventKind::End => self.on_end(&event)?,
                EventKind::Cross => self.on_cross(&event),
            }
        }
        Ok(self.outcome)
    }

    fn on_begin(&mut self, event: &Event) {
        let pos = self.status.insert(&self.edges, event.a, &event.point);
        self.settle(pos, pos, &event.point, true);
    }

    fn on_end(&mut self, event: &Event) -> Result<(), SweepError> {
        let edge = event.a;
        let pos = self
            .status
            .remove(edge)
            .ok_or(SweepError::MissingStatusEntry(self.input[edge].key))?;

        if pos > 0 && pos < self.status.len() {
            self.settle(pos - 1, pos, &event.point, false);
        }
        Ok(())
    }

    /// The crossing itself was recorded when the pair was tested. An edge
    /// that ended within rounding distance before its crossing is already
    /// gone, and then there is nothing left to swap.
    fn on_cross(&mut self, event: &Event) {
        let (Some(pa), Some(pb)) = (self.status.position(event.a), self.status.position(event.b))
        else {
            return;
        };
        self.settle(pa.min(pb), pa.max(pb), &event.point, true);
    }

    /// Restores the status order around `lo..=hi` just past `at`.
    ///
    /// The range grows to the bundle of active edges through `at`, every
    /// pair in it is tested, and the bundle is sorted by slope. Without
    /// `force` the sort only happens when the seed entries go through `at`
    /// as well. The neighbours across each boundary are tested last.
    fn settle(&mut self, lo: usize, hi: usize, at: &Point2, force: bool) {
        let (lo, hi) = self.status.block_through(&self.edges, lo, hi, at);
        let bundle = self.status.as_slice()[lo..=hi].to_vec();
        if force || bundle.iter().all(|&e| self.edges[e].passes_through(at)) {
            for (i, &a) in bundle.iter().enumerate() {
                for &b in &bundle[i + 1..] {
                    self.test_pair(a, b, at);
                }
            }
            self.status.sort_by_slope(&self.edges, lo, hi);
        }

        for p in lo.saturating_sub(1)..=hi {
            if let (Some(below), Some(above)) = (self.status.get(p), self.status.get(p + 1)) {
                self.test_pair(below, above, at);
            }
        }
    }

    /// Classifies two arena edges, always in edge-key order so that the same
    /// pair yields bit-identical points in every sweep.
    fn classify(&self, a: usize, b: usize) -> SegmentIntersection {
        let (ea, eb) = (self.input[a], self.input[b]);
        if ea.key <= eb.key {
            ea.intersects(eb)
        } else {
            eb.intersects(ea)
        }
    }

    /// Where the Cross event for a crossing at `p` goes: `p` clamped to the
    /// `u` range both edges cover, so rounding never puts it past either
    /// edge's end.
    fn crossing_event_point(&self, a: usize, b: usize, p: Point2) -> Point2 {
        let (ea, eb) = (&self.edges[a], &self.edges[b]);
        let lo = ea.left.x.max(eb.left.x);
        let hi = ea.right.x.min(eb.right.x);
        if lo <= hi {
            Point2::new(p.x.max(lo).min(hi), p.y)
        } else {
            p
        }
    }

    /// Tests a pair at most once and records any overlap right away.
    /// A crossing at or after the sweep point also queues a Cross event.
    fn test_pair(&mut self, a: usize, b: usize, at: &Point2) {
        if a == b || !self.tested.insert((a.min(b), a.max(b))) {
            return;
        }
        let (point, kind) = match self.classify(a, b) {
            SegmentIntersection::None => return,
            SegmentIntersection::Point(p) => {
                let event_point = self.crossing_event_point(a, b, p);
                if lex_cmp(&event_point, at).is_ge() {
                    self.queue.push(Event::cross(event_point, a, b));
                }
                (p, OverlapKind::Crossing)
            }
            SegmentIntersection::Collinear(p) => (p, OverlapKind::Collinear),
        };
        self.outcome
            .findings
            .push(OverlapFinding::new(self.input[a], self.input[b], point, kind));
    }
}
