pub mod broad_phase;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod report;
pub mod shell;
pub mod sweep;

pub use config::OverlapOptions;
pub use error::{InputError, Result, SweepError, UvlapError};
pub use mesh::{UvMesh, UvMeshData, DEFAULT_UV_SET};
pub use operations::{find_overlaps, FindUvOverlaps};
pub use report::{Diagnostic, OverlapReport};
