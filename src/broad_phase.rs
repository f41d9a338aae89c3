//! Shell-level culling before the exact sweep.

use crate::math::bounding_box::aabb_overlap;
use crate::shell::{ShellKey, ShellSet};

/// Two distinct shells, smaller key first.
pub type ShellPair = (ShellKey, ShellKey);

/// Produces the shell pairs that need an exact test.
///
/// Implementations must return every pair whose bounding boxes overlap, each
/// once, with `pair.0 < pair.1`, and never pair a shell with itself. A grid or
/// interval tree can replace [`AllPairs`] without touching the rest of the
/// pipeline.
pub trait BroadPhase: Sync {
    fn candidate_pairs(&self, shells: &ShellSet) -> Vec<ShellPair>;
}

/// Tests every shell against every other. Fine for the tens to low hundreds
/// of shells a UV layout usually has.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPairs;

impl BroadPhase for AllPairs {
    fn candidate_pairs(&self, shells: &ShellSet) -> Vec<ShellPair> {
        let all: Vec<_> = shells.iter().collect();
        let mut pairs = Vec::new();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                if aabb_overlap(a.bounding_box(), b.bounding_box()) {
                    pairs.push((a.key(), b.key()));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mesh::{UvMeshData, DEFAULT_UV_SET};
    use crate::shell::ShellBuilder;

    fn shells(polygons: &[Vec<(f64, f64)>]) -> ShellSet {
        let mesh = UvMeshData::from_polygons("m", polygons);
        let mut builder = ShellBuilder::new();
        builder.add_mesh(0, &mesh, DEFAULT_UV_SET);
        builder.build().0
    }

    #[test]
    fn disjoint_shells_produce_no_pairs() {
        let set = shells(&[
            vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            vec![(2.0, 2.0), (3.0, 2.0), (2.0, 3.0)],
        ]);
        assert!(AllPairs.candidate_pairs(&set).is_empty());
    }

    #[test]
    fn overlapping_boxes_are_paired_once() {
        let set = shells(&[
            vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            vec![(0.5, 0.5), (1.5, 0.5), (0.5, 1.5)],
            vec![(5.0, 5.0), (6.0, 5.0), (5.0, 6.0)],
            vec![(0.9, 0.0), (1.9, 0.0), (1.9, 1.0)],
        ]);
        let pairs = AllPairs.candidate_pairs(&set);
        let ids: Vec<_> = pairs.iter().map(|(a, b)| (a.shell, b.shell)).collect();
        assert_eq!(ids, vec![(0, 1), (0, 3), (1, 3)]);
        assert!(pairs.iter().all(|(a, b)| a < b));
    }

    #[test]
    fn single_shell_has_no_pairs() {
        let set = shells(&[vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]]);
        assert!(AllPairs.candidate_pairs(&set).is_empty());
    }
}
