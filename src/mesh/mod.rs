//! Read-only view of the host mesh.
//!
//! The overlap engine never walks a host object model directly. Everything it
//! needs is behind [`UvMesh`]: face corner enumeration in UV space, the
//! precomputed UV shell id of each UV, and name resolution for reporting.

mod memory;

pub use memory::{UvMeshData, DEFAULT_UV_SET};

use crate::math::Point2;

/// Index of a face within its mesh.
pub type FaceIndex = u32;

/// Index of a UV within a UV set.
pub type UvIndex = u32;

/// Connected-component id of a UV, as assigned by the mesh.
pub type ShellId = u32;

/// Narrow query interface onto a host mesh.
///
/// Implementations must be `Sync`: the same mesh is read from every worker.
pub trait UvMesh: Sync {
    /// Display name used to build component identifiers (e.g. `pPlane1`).
    fn name(&self) -> &str;

    /// Names of all UV sets on the mesh.
    fn uv_set_names(&self) -> Vec<String>;

    /// The UV set used when the caller does not name one.
    fn current_uv_set(&self) -> Option<String> {
        self.uv_set_names().into_iter().next()
    }

    /// Number of faces on the mesh.
    fn face_count(&self) -> usize;

    /// Ordered UV indices of the corners of `face`, or `None` if the face has
    /// no UVs in `uv_set`.
    fn face_uvs(&self, uv_set: &str, face: FaceIndex) -> Option<Vec<UvIndex>>;

    /// Position of a UV in `uv_set`.
    fn uv_position(&self, uv_set: &str, uv: UvIndex) -> Option<Point2>;

    /// UV shell id of a UV in `uv_set`.
    fn uv_shell_id(&self, uv_set: &str, uv: UvIndex) -> Option<ShellId>;

    /// Component name of a UV. `None` when the index cannot be resolved.
    fn uv_name(&self, uv_set: &str, uv: UvIndex) -> Option<String> {
        self.uv_position(uv_set, uv)
            .map(|_| format!("{}.map[{uv}]", self.name()))
    }

    /// Component name of a face. `None` when the index cannot be resolved.
    fn face_name(&self, face: FaceIndex) -> Option<String> {
        usize::try_from(face)
            .ok()
            .filter(|&f| f < self.face_count())
            .map(|_| format!("{}.f[{face}]", self.name()))
    }
}
