mod find_overlaps;

pub use find_overlaps::{find_overlaps, FindUvOverlaps};
