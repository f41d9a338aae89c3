//! Translation of findings into host-facing names, and the final report.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::mesh::{FaceIndex, UvIndex, UvMesh};
use crate::shell::{EdgeKey, ShellKey};
use crate::sweep::{EdgeRef, OverlapFinding, OverlapKind};

/// A non-fatal condition met during a run. The offending element was
/// skipped; everything else was still checked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Diagnostic {
    /// Face with fewer than three distinct UV positions.
    DegenerateFace { mesh: u32, face: FaceIndex },
    /// Edge whose endpoints coincide in UV space.
    DegenerateEdge { edge: EdgeKey },
    /// UV with a NaN or infinite coordinate.
    NonFiniteUv { mesh: u32, uv: UvIndex },
    /// UV index the mesh could not resolve.
    UnresolvedUv { mesh: u32, uv: UvIndex },
    /// Edge with a non-finite endpoint, left out of every sweep.
    SkippedEdge { edge: EdgeKey },
    /// A partition failed; its findings were dropped.
    WorkerFailure { partition: usize, message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateFace { mesh, face } => {
                write!(f, "degenerate UV face {face} in mesh {mesh}")
            }
            Self::DegenerateEdge { edge } => write!(f, "zero-length UV edge {edge}"),
            Self::NonFiniteUv { mesh, uv } => write!(f, "non-finite UV {uv} in mesh {mesh}"),
            Self::UnresolvedUv { mesh, uv } => write!(f, "unresolved UV {uv} in mesh {mesh}"),
            Self::SkippedEdge { edge } => write!(f, "skipped UV edge {edge}"),
            Self::WorkerFailure { partition, message } => {
                write!(f, "partition {partition} failed: {message}")
            }
        }
    }
}

/// Wall-clock time spent in each stage. Only collected for verbose runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timings {
    pub shell_build: Duration,
    pub broad_phase: Duration,
    pub sweep: Duration,
    pub report: Duration,
    pub total: Duration,
}

/// One edge of a finding, in host terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEdge {
    pub face: String,
    pub uvs: [String; 2],
}

impl fmt::Display for ResolvedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} {}]", self.face, self.uvs[0], self.uvs[1])
    }
}

/// A finding with its edges named by the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFinding {
    pub label: String,
    pub first: ResolvedEdge,
    pub second: ResolvedEdge,
    pub shells: (ShellKey, ShellKey),
    pub kind: OverlapKind,
    pub finding: OverlapFinding,
}

/// Outcome of an overlap run.
#[derive(Debug, Clone, Default)]
pub struct OverlapReport {
    /// Unique UV component names of all overlapping edges, in finding order.
    pub identifiers: Vec<String>,
    /// Findings sorted by shell pair, then edge pair.
    pub findings: Vec<ResolvedFinding>,
    /// Sorted, duplicate-free warnings.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of partitions whose findings were dropped.
    pub failed_partitions: usize,
    pub timings: Option<Timings>,
}

impl OverlapReport {
    /// `true` when no overlap was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// `true` when every partition completed, so the report is exhaustive.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_partitions == 0
    }
}

/// Names findings using the meshes they came from.
///
/// Any index the mesh cannot resolve degrades to an opaque name instead of
/// failing the report.
pub struct ReportAdapter<'m> {
    meshes: &'m [&'m dyn UvMesh],
    uv_sets: &'m [String],
}

impl<'m> ReportAdapter<'m> {
    /// `uv_sets[i]` is the UV set that was analyzed on `meshes[i]`.
    #[must_use]
    pub fn new(meshes: &'m [&'m dyn UvMesh], uv_sets: &'m [String]) -> Self {
        Self { meshes, uv_sets }
    }

    fn mesh(&self, index: u32) -> Option<(&'m dyn UvMesh, &'m str)> {
        let i = usize::try_from(index).ok()?;
        Some((*self.meshes.get(i)?, self.uv_sets.get(i)?.as_str()))
    }

    #[must_use]
    pub fn uv_name(&self, mesh: u32, uv: UvIndex) -> String {
        self.mesh(mesh)
            .and_then(|(m, set)| m.uv_name(set, uv))
            .unwrap_or_else(|| format!("<mesh {mesh}>.map[{uv}]"))
    }

    #[must_use]
    pub fn face_name(&self, mesh: u32, face: FaceIndex) -> String {
        self.mesh(mesh)
            .and_then(|(m, _)| m.face_name(face))
            .unwrap_or_else(|| format!("<mesh {mesh}>.f[{face}]"))
    }

    #[must_use]
    pub fn resolve_edge(&self, edge: &EdgeRef) -> ResolvedEdge {
        let mesh = edge.key.mesh;
        ResolvedEdge {
            face: self.face_name(mesh, edge.face),
            uvs: [
                self.uv_name(mesh, edge.key.uv_lo),
                self.uv_name(mesh, edge.key.uv_hi),
            ],
        }
    }

    #[must_use]
    pub fn resolve(&self, finding: &OverlapFinding) -> ResolvedFinding {
        let first = self.resolve_edge(&finding.first);
        let second = self.resolve_edge(&finding.second);
        let verb = match finding.kind {
            OverlapKind::Crossing => "crosses",
            OverlapKind::Collinear => "coincides with",
        };
        ResolvedFinding {
            label: format!("{first} {verb} {second}"),
            shells: (finding.first.shell, finding.second.shell),
            kind: finding.kind,
            finding: finding.clone(),
            first,
            second,
        }
    }

    /// Resolves sorted findings, returning them with the unique UV names
    /// they mention.
    #[must_use]
    pub fn resolve_all(&self, findings: &[OverlapFinding]) -> (Vec<ResolvedFinding>, Vec<String>) {
        let mut seen = HashSet::new();
        let mut identifiers = Vec::new();
        let resolved: Vec<ResolvedFinding> = findings.iter().map(|f| self.resolve(f)).collect();
        for r in &resolved {
            for name in r.first.uvs.iter().chain(&r.second.uvs) {
                if seen.insert(name.clone()) {
                    identifiers.push(name.clone());
                }
            }
        }
        (resolved, identifiers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::mesh::{UvMeshData, DEFAULT_UV_SET};
    use crate::shell::UvEdge;

    fn finding(mesh: u32, a: (UvIndex, UvIndex), b: (UvIndex, UvIndex)) -> OverlapFinding {
        let e = |uvs: (UvIndex, UvIndex), face| {
            UvEdge::new(
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 1.0),
                EdgeKey::new(mesh, uvs.0, uvs.1),
                face,
                ShellKey::new(mesh, face),
            )
        };
        OverlapFinding::new(&e(a, 0), &e(b, 1), Point2::new(0.5, 0.5), OverlapKind::Crossing)
    }

    fn two_triangles() -> UvMeshData {
        UvMeshData::from_polygons(
            "pPlane1",
            &[
                vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
                vec![(0.5, 0.5), (1.5, 0.5), (0.5, 1.5)],
            ],
        )
    }

    #[test]
    fn resolves_names_through_the_mesh() {
        let mesh = two_triangles();
        let meshes: [&dyn UvMesh; 1] = [&mesh];
        let sets = [DEFAULT_UV_SET.to_owned()];
        let adapter = ReportAdapter::new(&meshes, &sets);

        let resolved = adapter.resolve(&finding(0, (1, 2), (3, 5)));
        assert_eq!(resolved.first.face, "pPlane1.f[0]");
        assert_eq!(resolved.first.uvs, ["pPlane1.map[1]", "pPlane1.map[2]"]);
        assert_eq!(
            resolved.label,
            "pPlane1.f[0] [pPlane1.map[1] pPlane1.map[2]] crosses pPlane1.f[1] [pPlane1.map[3] pPlane1.map[5]]"
        );
    }

    #[test]
    fn unresolvable_ids_degrade_to_opaque_names() {
        let mesh = two_triangles();
        let meshes: [&dyn UvMesh; 1] = [&mesh];
        let sets = [DEFAULT_UV_SET.to_owned()];
        let adapter = ReportAdapter::new(&meshes, &sets);

        assert_eq!(adapter.uv_name(0, 99), "<mesh 0>.map[99]");
        assert_eq!(adapter.uv_name(4, 1), "<mesh 4>.map[1]");
        assert_eq!(adapter.face_name(0, 7), "<mesh 0>.f[7]");
    }

    #[test]
    fn identifiers_are_unique_and_ordered() {
        let mesh = two_triangles();
        let meshes: [&dyn UvMesh; 1] = [&mesh];
        let sets = [DEFAULT_UV_SET.to_owned()];
        let adapter = ReportAdapter::new(&meshes, &sets);

        let findings = [finding(0, (0, 1), (3, 4)), finding(0, (0, 1), (4, 5))];
        let (resolved, ids) = adapter.resolve_all(&findings);
        assert_eq!(resolved.len(), 2);
        assert_eq!(
            ids,
            vec![
                "pPlane1.map[0]",
                "pPlane1.map[1]",
                "pPlane1.map[3]",
                "pPlane1.map[4]",
                "pPlane1.map[5]"
            ]
        );
    }

    #[test]
    fn diagnostics_display() {
        let d = Diagnostic::WorkerFailure {
            partition: 2,
            message: "boom".to_owned(),
        };
        assert_eq!(d.to_string(), "partition 2 failed: boom");
        let d = Diagnostic::DegenerateEdge {
            edge: EdgeKey::new(0, 3, 1),
        };
        assert_eq!(d.to_string(), "zero-length UV edge 0:1-3");
    }

    #[test]
    fn empty_report() {
        let report = OverlapReport::default();
        assert!(report.is_empty());
        assert!(report.is_complete());
    }
}
