//! UV edges, UV shells and the shell builder.

mod builder;

pub use builder::ShellBuilder;

use std::collections::BTreeMap;
use std::fmt;

use crate::math::bounding_box::Aabb2;
use crate::math::intersect_2d::{segment_segment_intersect_2d, SegmentIntersection};
use crate::math::{lex_cmp, Point2};
use crate::mesh::{FaceIndex, ShellId, UvIndex};

/// Identifies a UV shell across all meshes of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShellKey {
    /// Position of the owning mesh in the run's mesh list.
    pub mesh: u32,
    /// Shell id assigned by the mesh.
    pub shell: ShellId,
}

impl ShellKey {
    #[must_use]
    pub fn new(mesh: u32, shell: ShellId) -> Self {
        Self { mesh, shell }
    }
}

impl fmt::Display for ShellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shell {}:{}", self.mesh, self.shell)
    }
}

/// Undirected identity of a UV edge: its two UV indices, smallest first.
///
/// Two faces sharing an edge produce the same key, which is what makes the
/// per-shell edge set duplicate-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub mesh: u32,
    pub uv_lo: UvIndex,
    pub uv_hi: UvIndex,
}

impl EdgeKey {
    /// Builds the key for the edge between `a` and `b`, in either direction.
    #[must_use]
    pub fn new(mesh: u32, a: UvIndex, b: UvIndex) -> Self {
        Self {
            mesh,
            uv_lo: a.min(b),
            uv_hi: a.max(b),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.mesh, self.uv_lo, self.uv_hi)
    }
}

/// A straight edge in UV space with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct UvEdge {
    pub start: Point2,
    pub end: Point2,
    pub key: EdgeKey,
    /// First face (in enumeration order) that contributed this edge.
    pub face: FaceIndex,
    pub shell: ShellKey,
}

impl UvEdge {
    #[must_use]
    pub fn new(start: Point2, end: Point2, key: EdgeKey, face: FaceIndex, shell: ShellKey) -> Self {
        Self {
            start,
            end,
            key,
            face,
            shell,
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.start.x.is_finite()
            && self.start.y.is_finite()
            && self.end.x.is_finite()
            && self.end.y.is_finite()
    }

    /// Endpoints ordered along the sweep: smallest `u` first, ties by `v`.
    /// Uses the same exact order as the sweep's event queue.
    #[must_use]
    pub fn sweep_endpoints(&self) -> (Point2, Point2) {
        if lex_cmp(&self.start, &self.end).is_le() {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Classifies this edge against `other`. See [`segment_segment_intersect_2d`].
    #[must_use]
    pub fn intersects(&self, other: &Self) -> SegmentIntersection {
        segment_segment_intersect_2d(&self.start, &self.end, &other.start, &other.end)
    }
}

/// A connected UV region: its deduplicated edges and their bounding box.
#[derive(Debug, Clone)]
pub struct UvShell {
    key: ShellKey,
    edges: Vec<UvEdge>,
    bbox: Aabb2,
}

impl UvShell {
    /// Builds a shell from its edges. Returns `None` if no edge has finite
    /// coordinates, since such a shell has no extent to test.
    #[must_use]
    pub fn new(key: ShellKey, edges: Vec<UvEdge>) -> Option<Self> {
        let bbox = Aabb2::from_points(edges.iter().flat_map(|e| [&e.start, &e.end]))?;
        Some(Self { key, edges, bbox })
    }

    #[must_use]
    pub fn key(&self) -> ShellKey {
        self.key
    }

    #[must_use]
    pub fn edges(&self) -> &[UvEdge] {
        &self.edges
    }

    #[must_use]
    pub fn bounding_box(&self) -> &Aabb2 {
        &self.bbox
    }
}

/// All shells of one run, keyed and iterated in [`ShellKey`] order.
#[derive(Debug, Clone, Default)]
pub struct ShellSet {
    shells: BTreeMap<ShellKey, UvShell>,
}

impl ShellSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, shell: UvShell) {
        self.shells.insert(shell.key(), shell);
    }

    #[must_use]
    pub fn get(&self, key: ShellKey) -> Option<&UvShell> {
        self.shells.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UvShell> {
        self.shells.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// Total number of edges over all shells.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.shells.values().map(|s| s.edges.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn edge(a: (f64, f64), b: (f64, f64), uvs: (UvIndex, UvIndex)) -> UvEdge {
        UvEdge::new(
            Point2::new(a.0, a.1),
            Point2::new(b.0, b.1),
            EdgeKey::new(0, uvs.0, uvs.1),
            0,
            ShellKey::new(0, 0),
        )
    }

    #[test]
    fn edge_key_is_undirected() {
        assert_eq!(EdgeKey::new(0, 4, 1), EdgeKey::new(0, 1, 4));
        assert_ne!(EdgeKey::new(0, 1, 4), EdgeKey::new(1, 1, 4));
        assert_eq!(EdgeKey::new(2, 9, 3).to_string(), "2:3-9");
    }

    #[test]
    fn sweep_endpoints_are_left_to_right() {
        let e = edge((1.0, 0.0), (0.0, 1.0), (0, 1));
        let (l, r) = e.sweep_endpoints();
        assert!(l.x < r.x);

        let vertical = edge((0.0, 1.0), (0.0, 0.0), (0, 1));
        let (b, t) = vertical.sweep_endpoints();
        assert!(b.y < t.y);

        // A steep edge is ordered by its exact `u`, not by `v`.
        let steep = edge((1e-10, -1.0), (0.0, 1.0), (0, 1));
        let (l, r) = steep.sweep_endpoints();
        assert!(l.x < r.x);
        assert!(l.y > r.y);
    }

    #[test]
    fn shell_bbox_covers_edges() {
        let shell = UvShell::new(
            ShellKey::new(0, 3),
            vec![
                edge((0.0, 0.0), (1.0, 0.5), (0, 1)),
                edge((1.0, 0.5), (0.2, 2.0), (1, 2)),
            ],
        )
        .unwrap();
        let b = shell.bounding_box();
        assert!(b.left.abs() < 1e-12 && (b.right - 1.0).abs() < 1e-12);
        assert!(b.bottom.abs() < 1e-12 && (b.top - 2.0).abs() < 1e-12);
        assert_eq!(shell.edges().len(), 2);
    }

    #[test]
    fn shell_without_finite_edges_is_rejected() {
        let e = edge((f64::NAN, 0.0), (f64::NAN, 1.0), (0, 1));
        assert!(UvShell::new(ShellKey::new(0, 0), vec![e]).is_none());
    }

    #[test]
    fn shell_set_iterates_in_key_order() {
        let mut set = ShellSet::new();
        for id in [5, 1, 3] {
            let e = edge((0.0, 0.0), (1.0, 1.0), (0, 1));
            set.insert(UvShell::new(ShellKey::new(0, id), vec![e]).unwrap());
        }
        let ids: Vec<_> = set.iter().map(|s| s.key().shell).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(set.edge_count(), 3);
        assert!(set.get(ShellKey::new(0, 3)).is_some());
    }
}
