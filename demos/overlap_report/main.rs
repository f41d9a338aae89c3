//! Prints the UV overlap report for a small hand-built layout.
//!
//! ```text
//! cargo run --example overlap_report
//! cargo run --example overlap_report -- 1     # single worker
//! RUST_LOG=uvlap=debug cargo run --example overlap_report
//! ```

use uvlap::math::Point2;
use uvlap::{find_overlaps, OverlapOptions, UvMeshData};

fn main() -> uvlap::Result<()> {
    // Default: WARN for everything, INFO for uvlap.
    // Override with RUST_LOG env var.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("uvlap=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let threads = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);

    let mesh = layout();
    let options = OverlapOptions::default()
        .with_thread_count(threads)
        .with_verbose(true);
    let report = find_overlaps(&mesh, &options)?;

    if report.is_empty() {
        println!("no overlapping UVs");
    }
    for finding in &report.findings {
        println!(
            "{} -> {} at ({:.3}, {:.3})",
            finding.shells.0, finding.shells.1, finding.finding.point.x, finding.finding.point.y
        );
        println!("  {}", finding.label);
    }
    if !report.identifiers.is_empty() {
        println!("overlapping UVs: {}", report.identifiers.join(" "));
    }
    for diagnostic in &report.diagnostics {
        println!("warning: {diagnostic}");
    }
    if let Some(t) = report.timings {
        println!("total {:?} (sweep {:?})", t.total, t.sweep);
    }
    Ok(())
}

/// Two unit quads sharing an edge, a third quad overlapping both, and an
/// isolated triangle.
fn layout() -> UvMeshData {
    let positions = vec![
        // shell 0: two quads sharing the edge 1-4
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(0.0, 1.0),
        Point2::new(1.0, 1.0),
        Point2::new(2.0, 1.0),
        // shell 1: quad straddling the shared edge
        Point2::new(0.5, 0.5),
        Point2::new(1.5, 0.5),
        Point2::new(1.5, 1.5),
        Point2::new(0.5, 1.5),
        // shell 2: far away
        Point2::new(4.0, 4.0),
        Point2::new(5.0, 4.0),
        Point2::new(4.0, 5.0),
    ];
    let faces = vec![
        vec![0, 1, 4, 3],
        vec![1, 2, 5, 4],
        vec![6, 7, 8, 9],
        vec![10, 11, 12],
    ];
    UvMeshData::new("pPlane1").with_uv_set(uvlap::DEFAULT_UV_SET, positions, faces)
}
