use super::{FaceIndex, ShellId, UvIndex, UvMesh};
use crate::math::Point2;

/// Default UV set name for meshes built from bare polygons.
pub const DEFAULT_UV_SET: &str = "map1";

#[derive(Debug, Clone)]
struct UvSetData {
    name: String,
    positions: Vec<Point2>,
    faces: Vec<Vec<UvIndex>>,
    shell_ids: Vec<ShellId>,
}

/// An in-memory mesh that owns its UV data.
///
/// Shell ids are derived by connectivity (UVs that share a face belong to one
/// shell) unless supplied explicitly with [`UvMeshData::with_shell_ids`].
#[derive(Debug, Clone)]
pub struct UvMeshData {
    name: String,
    uv_sets: Vec<UvSetData>,
}

impl UvMeshData {
    /// Creates a mesh with no UV sets.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uv_sets: Vec::new(),
        }
    }

    /// Builds a mesh where each polygon is one face with its own UVs, in the
    /// [`DEFAULT_UV_SET`]. Every polygon therefore forms its own shell.
    #[must_use]
    pub fn from_polygons(name: impl Into<String>, polygons: &[Vec<(f64, f64)>]) -> Self {
        let mut positions = Vec::new();
        let mut faces = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            let mut face = Vec::with_capacity(polygon.len());
            for &(u, v) in polygon {
                face.push(next_index(positions.len()));
                positions.push(Point2::new(u, v));
            }
            faces.push(face);
        }
        Self::new(name).with_uv_set(DEFAULT_UV_SET, positions, faces)
    }

    /// Adds a UV set. Shell ids are computed from face connectivity.
    ///
    /// Face corners that reference a UV index outside `positions` are kept;
    /// lookups for them return `None`.
    #[must_use]
    pub fn with_uv_set(
        mut self,
        name: impl Into<String>,
        positions: Vec<Point2>,
        faces: Vec<Vec<UvIndex>>,
    ) -> Self {
        let shell_ids = connected_shells(positions.len(), &faces);
        self.uv_sets.push(UvSetData {
            name: name.into(),
            positions,
            faces,
            shell_ids,
        });
        self
    }

    /// Overrides the shell ids of an existing UV set. Unknown sets are ignored.
    #[must_use]
    pub fn with_shell_ids(mut self, uv_set: &str, shell_ids: Vec<ShellId>) -> Self {
        if let Some(set) = self.uv_sets.iter_mut().find(|s| s.name == uv_set) {
            set.shell_ids = shell_ids;
        }
        self
    }

    fn set(&self, uv_set: &str) -> Option<&UvSetData> {
        self.uv_sets.iter().find(|s| s.name == uv_set)
    }
}

impl UvMesh for UvMeshData {
    fn name(&self) -> &str {
        &self.name
    }

    fn uv_set_names(&self) -> Vec<String> {
        self.uv_sets.iter().map(|s| s.name.clone()).collect()
    }

    fn face_count(&self) -> usize {
        self.uv_sets.iter().map(|s| s.faces.len()).max().unwrap_or(0)
    }

    fn face_uvs(&self, uv_set: &str, face: FaceIndex) -> Option<Vec<UvIndex>> {
        let face = self.set(uv_set)?.faces.get(usize::try_from(face).ok()?)?;
        (!face.is_empty()).then(|| face.clone())
    }

    fn uv_position(&self, uv_set: &str, uv: UvIndex) -> Option<Point2> {
        self.set(uv_set)?
            .positions
            .get(usize::try_from(uv).ok()?)
            .copied()
    }

    fn uv_shell_id(&self, uv_set: &str, uv: UvIndex) -> Option<ShellId> {
        self.set(uv_set)?
            .shell_ids
            .get(usize::try_from(uv).ok()?)
            .copied()
    }
}

fn next_index(len: usize) -> UvIndex {
    UvIndex::try_from(len).unwrap_or(UvIndex::MAX)
}

/// Assigns shell ids by union-find over face corners, numbered in order of
/// each shell's lowest UV index.
fn connected_shells(uv_count: usize, faces: &[Vec<UvIndex>]) -> Vec<ShellId> {
    let mut parent: Vec<usize> = (0..uv_count).collect();

    for face in faces {
        let corners: Vec<usize> = face
            .iter()
            .filter_map(|&uv| usize::try_from(uv).ok())
            .filter(|&uv| uv < uv_count)
            .collect();
        for pair in corners.windows(2) {
            let a = find(&mut parent, pair[0]);
            let b = find(&mut parent, pair[1]);
            if a != b {
                parent[a.max(b)] = a.min(b);
            }
        }
    }

    let mut ids = vec![ShellId::MAX; uv_count];
    let mut next: ShellId = 0;
    for uv in 0..uv_count {
        let root = find(&mut parent, uv);
        if ids[root] == ShellId::MAX {
            ids[root] = next;
            next += 1;
        }
        ids[uv] = ids[root];
    }
    ids
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn polygons_become_separate_shells() {
        let mesh = UvMeshData::from_polygons(
            "pPlane1",
            &[
                vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
                vec![(2.0, 0.0), (3.0, 0.0), (3.0, 1.0)],
            ],
        );
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.face_uvs(DEFAULT_UV_SET, 1).unwrap(), vec![3, 4, 5]);
        assert_eq!(mesh.uv_shell_id(DEFAULT_UV_SET, 0), Some(0));
        assert_eq!(mesh.uv_shell_id(DEFAULT_UV_SET, 5), Some(1));
    }

    #[test]
    fn shared_uvs_join_shells() {
        let positions = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(5.0, 5.0),
        ];
        let mesh = UvMeshData::new("quad").with_uv_set(
            "map1",
            positions,
            vec![vec![0, 1, 2], vec![0, 2, 3]],
        );
        let ids: Vec<_> = (0..5)
            .map(|uv| mesh.uv_shell_id("map1", uv).unwrap())
            .collect();
        assert_eq!(ids, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn explicit_shell_ids_override() {
        let mesh = UvMeshData::from_polygons("m", &[vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]])
            .with_shell_ids(DEFAULT_UV_SET, vec![7, 7, 7]);
        assert_eq!(mesh.uv_shell_id(DEFAULT_UV_SET, 2), Some(7));
    }

    #[test]
    fn lookups_outside_range_resolve_to_none() {
        let mesh = UvMeshData::from_polygons("m", &[vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]]);
        assert!(mesh.uv_position(DEFAULT_UV_SET, 9).is_none());
        assert!(mesh.uv_name(DEFAULT_UV_SET, 9).is_none());
        assert!(mesh.face_uvs("missing", 0).is_none());
        assert!(mesh.face_name(3).is_none());
        assert_eq!(mesh.uv_name(DEFAULT_UV_SET, 1).unwrap(), "m.map[1]");
        assert_eq!(mesh.face_name(0).unwrap(), "m.f[0]");
    }

    #[test]
    fn current_uv_set_is_first() {
        let mesh = UvMeshData::new("m")
            .with_uv_set("map1", Vec::new(), Vec::new())
            .with_uv_set("lightmap", Vec::new(), Vec::new());
        assert_eq!(mesh.current_uv_set().unwrap(), "map1");
        assert_eq!(mesh.uv_set_names(), vec!["map1", "lightmap"]);
    }
}
