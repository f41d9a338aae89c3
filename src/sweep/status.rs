use std::cmp::Ordering;

use crate::math::intersect_2d::signed_distance;
use crate::math::{cmp_scalar, Point2, TOLERANCE};

/// An edge as seen by the sweep: endpoints in sweep order plus its slope.
#[derive(Debug, Clone, Copy)]
pub struct SweepEdge {
    pub left: Point2,
    pub right: Point2,
    /// `dv / du`. Vertical edges get `+inf` when they run upwards and
    /// `-inf` when they run downwards, which is where they move in the
    /// status once the sweep passes a crossing.
    pub slope: f64,
}

impl SweepEdge {
    /// `left` must not come after `right` in sweep order.
    #[must_use]
    pub fn new(left: Point2, right: Point2) -> Self {
        let du = right.x - left.x;
        let slope = if du <= TOLERANCE {
            if right.y >= left.y {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            }
        } else {
            (right.y - left.y) / du
        };
        Self { left, right, slope }
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.slope.is_infinite()
    }

    /// Height of the edge where the sweep line passes through `at`.
    ///
    /// Vertical edges report the sweep point's own height clamped to their
    /// extent, so they sort consistently with edges crossing them at `at`.
    #[must_use]
    pub fn v_at(&self, at: &Point2) -> f64 {
        if self.is_vertical() {
            let lo = self.left.y.min(self.right.y);
            let hi = self.left.y.max(self.right.y);
            return at.y.max(lo).min(hi);
        }
        if at.x <= self.left.x {
            return self.left.y;
        }
        if at.x >= self.right.x {
            return self.right.y;
        }
        self.left.y + (at.x - self.left.x) * self.slope
    }

    /// `true` when `p` lies on the edge, endpoints included, within
    /// [`TOLERANCE`].
    #[must_use]
    pub fn passes_through(&self, p: &Point2) -> bool {
        let (lo, hi) = (self.left.y.min(self.right.y), self.left.y.max(self.right.y));
        p.x >= self.left.x - TOLERANCE
            && p.x <= self.right.x + TOLERANCE
            && p.y >= lo - TOLERANCE
            && p.y <= hi + TOLERANCE
            && signed_distance(&self.left, &self.right, p).abs() <= TOLERANCE
    }
}

/// Ordering of two active edges just right of the sweep point `at`:
/// height at `at`, then slope, then arena index.
#[must_use]
pub fn cmp_at(edges: &[SweepEdge], a: usize, b: usize, at: &Point2) -> Ordering {
    let (ea, eb) = (&edges[a], &edges[b]);
    cmp_scalar(ea.v_at(at), eb.v_at(at))
        .then_with(|| cmp_scalar(ea.slope, eb.slope))
        .then(a.cmp(&b))
}

/// Active edges, bottom to top.
#[derive(Debug, Default)]
pub struct SweepStatus {
    entries: Vec<usize>,
}

impl SweepStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `edge` at its ordered position for sweep point `at` and
    /// returns that position.
    pub fn insert(&mut self, edges: &[SweepEdge], edge: usize, at: &Point2) -> usize {
        let pos = self
            .entries
            .partition_point(|&other| cmp_at(edges, other, edge, at) == Ordering::Less);
        self.entries.insert(pos, edge);
        pos
    }

    /// Removes `edge`, returning the position it occupied.
    pub fn remove(&mut self, edge: usize) -> Option<usize> {
        let pos = self.position(edge)?;
        self.entries.remove(pos);
        Some(pos)
    }

    #[must_use]
    pub fn position(&self, edge: usize) -> Option<usize> {
        self.entries.iter().position(|&e| e == edge)
    }

    #[must_use]
    pub fn get(&self, pos: usize) -> Option<usize> {
        self.entries.get(pos).copied()
    }

    /// Widens `lo..=hi` to the maximal run of entries passing through `at`.
    #[must_use]
    pub fn block_through(
        &self,
        edges: &[SweepEdge],
        mut lo: usize,
        mut hi: usize,
        at: &Point2,
    ) -> (usize, usize) {
        while lo > 0 && edges[self.entries[lo - 1]].passes_through(at) {
            lo -= 1;
        }
        while hi + 1 < self.entries.len() && edges[self.entries[hi + 1]].passes_through(at) {
            hi += 1;
        }
        (lo, hi)
    }

    /// Sorts `lo..=hi` by slope, the order just past a point every entry
    /// in the range goes through. A pair crossing there is a swap; a bundle
    /// of concurrent edges reverses as a whole. Sorting the same run twice
    /// leaves it unchanged.
    pub fn sort_by_slope(&mut self, edges: &[SweepEdge], lo: usize, hi: usize) {
        self.entries[lo..=hi].sort_by(|&a, &b| {
            edges[a].slope.total_cmp(&edges[b].slope).then(a.cmp(&b))
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn seg(a: (f64, f64), b: (f64, f64)) -> SweepEdge {
        SweepEdge::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))
    }

    #[test]
    fn v_at_interpolates_and_clamps() {
        let e = seg((0.0, 0.0), (2.0, 1.0));
        assert_relative_eq!(e.v_at(&Point2::new(1.0, 9.0)), 0.5);
        assert_relative_eq!(e.v_at(&Point2::new(-1.0, 0.0)), 0.0);
        assert_relative_eq!(e.v_at(&Point2::new(3.0, 0.0)), 1.0);

        let v = seg((1.0, 0.0), (1.0, 2.0));
        assert!(v.is_vertical());
        assert_relative_eq!(v.v_at(&Point2::new(1.0, 0.7)), 0.7);
        assert_relative_eq!(v.v_at(&Point2::new(1.0, 5.0)), 2.0);
    }

    #[test]
    fn insert_keeps_bottom_to_top_order() {
        let edges = vec![
            seg((0.0, 0.0), (4.0, 0.0)),
            seg((0.0, 2.0), (4.0, 2.0)),
            seg((1.0, 1.0), (3.0, 1.0)),
        ];
        let mut status = SweepStatus::new();
        status.insert(&edges, 0, &edges[0].left);
        status.insert(&edges, 1, &edges[1].left);
        let pos = status.insert(&edges, 2, &edges[2].left);
        assert_eq!(pos, 1);
        assert_eq!(status.as_slice(), &[0, 2, 1]);
    }

    #[test]
    fn shared_start_orders_by_slope() {
        let edges = vec![seg((0.0, 0.0), (1.0, 1.0)), seg((0.0, 0.0), (1.0, -1.0))];
        let mut status = SweepStatus::new();
        status.insert(&edges, 0, &edges[0].left);
        status.insert(&edges, 1, &edges[1].left);
        assert_eq!(status.as_slice(), &[1, 0]);
    }

    #[test]
    fn slope_sort_swaps_crossing_pair() {
        let edges = vec![seg((0.0, 0.0), (2.0, 2.0)), seg((0.0, 2.0), (2.0, 0.0))];
        let mut status = SweepStatus::new();
        status.insert(&edges, 0, &edges[0].left);
        status.insert(&edges, 1, &edges[1].left);
        assert_eq!(status.as_slice(), &[0, 1]);
        status.sort_by_slope(&edges, 0, 1);
        assert_eq!(status.as_slice(), &[1, 0]);
        status.sort_by_slope(&edges, 0, 1);
        assert_eq!(status.as_slice(), &[1, 0]);
    }

    #[test]
    fn block_through_collects_concurrent_edges() {
        let edges = vec![
            seg((0.0, -1.0), (2.0, -1.0)),
            seg((0.0, 0.0), (2.0, 2.0)),
            seg((0.0, 1.0), (2.0, 1.0)),
            seg((0.0, 2.0), (2.0, 0.0)),
            seg((0.0, 3.0), (2.0, 3.0)),
        ];
        let mut status = SweepStatus::new();
        for (i, e) in edges.iter().enumerate() {
            status.insert(&edges, i, &e.left);
        }
        assert_eq!(status.as_slice(), &[0, 1, 2, 3, 4]);
        let at = Point2::new(1.0, 1.0);
        assert_eq!(status.block_through(&edges, 2, 2, &at), (1, 3));
        status.sort_by_slope(&edges, 1, 3);
        assert_eq!(status.as_slice(), &[0, 3, 2, 1, 4]);
    }

    #[test]
    fn passes_through_respects_extent() {
        let e = seg((0.0, 0.0), (1.0, 1.0));
        assert!(e.passes_through(&Point2::new(0.5, 0.5)));
        assert!(e.passes_through(&Point2::new(1.0, 1.0)));
        assert!(!e.passes_through(&Point2::new(1.5, 1.5)));
        assert!(!e.passes_through(&Point2::new(0.5, 0.6)));

        let v = seg((1.0, 0.0), (1.0, 2.0));
        assert!(v.passes_through(&Point2::new(1.0, 1.5)));
        assert!(!v.passes_through(&Point2::new(1.0, 2.5)));
    }

    #[test]
    fn vertical_slope_follows_direction() {
        let up = seg((1.0, 0.0), (1.0, 2.0));
        assert!(up.is_vertical() && up.slope > 0.0);
        let down = seg((0.0, 2.0), (1e-10, 0.0));
        assert!(down.is_vertical() && down.slope < 0.0);
    }

    #[test]
    fn remove_reports_position() {
        let edges = vec![seg((0.0, 0.0), (1.0, 0.0)), seg((0.0, 1.0), (1.0, 1.0))];
        let mut status = SweepStatus::new();
        status.insert(&edges, 0, &edges[0].left);
        status.insert(&edges, 1, &edges[1].left);
        assert_eq!(status.remove(0), Some(0));
        assert_eq!(status.remove(0), None);
        assert_eq!(status.get(0), Some(1));
        assert_eq!(status.len(), 1);
    }
}
