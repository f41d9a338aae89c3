use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use super::{EdgeKey, ShellKey, ShellSet, UvEdge, UvShell};
use crate::math::{cmp_points, Point2, TOLERANCE};
use crate::mesh::{FaceIndex, UvIndex, UvMesh};
use crate::report::Diagnostic;

#[derive(Debug, Default)]
struct ShellEdges {
    seen: HashSet<EdgeKey>,
    edges: Vec<UvEdge>,
}

impl ShellEdges {
    fn insert(&mut self, edge: UvEdge) {
        if self.seen.insert(edge.key) {
            self.edges.push(edge);
        }
    }
}

/// Groups the UV edges of one or more meshes into shells.
///
/// Faces are visited in index order and each undirected edge is kept once,
/// attributed to the first face that produced it, so the output is
/// deterministic for identical input.
#[derive(Debug, Default)]
pub struct ShellBuilder {
    shells: BTreeMap<ShellKey, ShellEdges>,
    diagnostics: Vec<Diagnostic>,
}

impl ShellBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every face of `mesh` in `uv_set`.
    ///
    /// `mesh_index` is the mesh's position in the run and ends up in every
    /// [`ShellKey`] and [`EdgeKey`] produced from it. Degenerate faces and
    /// edges are skipped and recorded as diagnostics.
    pub fn add_mesh(&mut self, mesh_index: u32, mesh: &dyn UvMesh, uv_set: &str) {
        let face_count = FaceIndex::try_from(mesh.face_count()).unwrap_or(FaceIndex::MAX);
        for face in 0..face_count {
            self.add_face(mesh_index, mesh, uv_set, face);
        }
    }

    fn add_face(&mut self, mesh_index: u32, mesh: &dyn UvMesh, uv_set: &str, face: FaceIndex) {
        let Some(uvs) = mesh.face_uvs(uv_set, face) else {
            // Unmapped faces have nothing to overlap.
            return;
        };

        let mut corners: Vec<(UvIndex, Point2)> = Vec::with_capacity(uvs.len());
        for &uv in &uvs {
            let Some(pos) = mesh.uv_position(uv_set, uv) else {
                self.diagnostics.push(Diagnostic::UnresolvedUv {
                    mesh: mesh_index,
                    uv,
                });
                self.skip_face(mesh_index, face);
                return;
            };
            if !(pos.x.is_finite() && pos.y.is_finite()) {
                self.diagnostics.push(Diagnostic::NonFiniteUv {
                    mesh: mesh_index,
                    uv,
                });
            }
            corners.push((uv, pos));
        }

        if unique_positions(&corners) < 3 {
            self.skip_face(mesh_index, face);
            return;
        }

        let Some(shell) = mesh.uv_shell_id(uv_set, corners[0].0) else {
            self.diagnostics.push(Diagnostic::UnresolvedUv {
                mesh: mesh_index,
                uv: corners[0].0,
            });
            self.skip_face(mesh_index, face);
            return;
        };
        let shell_key = ShellKey::new(mesh_index, shell);

        for i in 0..corners.len() {
            let (uv_a, a) = corners[i];
            let (uv_b, b) = corners[(i + 1) % corners.len()];
            if uv_a == uv_b {
                continue;
            }
            let key = EdgeKey::new(mesh_index, uv_a, uv_b);
            let edge = UvEdge::new(a, b, key, face, shell_key);
            if !edge.is_finite() {
                warn!(%key, face, "skipping non-finite UV edge");
                self.diagnostics.push(Diagnostic::SkippedEdge { edge: key });
                continue;
            }
            if edge.length() < TOLERANCE {
                warn!(%key, face, "skipping zero-length UV edge");
                self.diagnostics.push(Diagnostic::DegenerateEdge { edge: key });
                continue;
            }
            self.shells.entry(shell_key).or_default().insert(edge);
        }
    }

    fn skip_face(&mut self, mesh: u32, face: FaceIndex) {
        debug!(mesh, face, "skipping degenerate UV face");
        self.diagnostics.push(Diagnostic::DegenerateFace { mesh, face });
    }

    /// Finishes the build, returning the shells and the collected diagnostics.
    #[must_use]
    pub fn build(self) -> (ShellSet, Vec<Diagnostic>) {
        let mut set = ShellSet::new();
        for (key, shell) in self.shells {
            if let Some(shell) = UvShell::new(key, shell.edges) {
                set.insert(shell);
            }
        }
        (set, self.diagnostics)
    }
}

/// Number of distinct finite positions among the corners of a face.
fn unique_positions(corners: &[(UvIndex, Point2)]) -> usize {
    let mut points: Vec<Point2> = corners
        .iter()
        .map(|&(_, p)| p)
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    points.sort_by(cmp_points);
    points.dedup_by(|a, b| cmp_points(a, b).is_eq());
    points.len()
}
