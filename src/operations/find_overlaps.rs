use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::broad_phase::{AllPairs, BroadPhase};
use crate::config::OverlapOptions;
use crate::dispatch::{plan_work, Dispatcher};
use crate::error::{InputError, Result};
use crate::mesh::UvMesh;
use crate::report::{OverlapReport, ReportAdapter, Timings};
use crate::shell::ShellBuilder;

/// Finds overlapping UV shells across one or more meshes.
///
/// Only proper crossings and collinear overlaps of positive length count.
/// Shells that merely touch at a shared point or along a T-junction do not.
#[derive(Debug, Clone)]
pub struct FindUvOverlaps<B: BroadPhase = AllPairs> {
    options: OverlapOptions,
    broad_phase: B,
}

impl FindUvOverlaps {
    /// Creates the operation with the default all-pairs broad phase.
    #[must_use]
    pub fn new(options: OverlapOptions) -> Self {
        Self {
            options,
            broad_phase: AllPairs,
        }
    }
}

impl<B: BroadPhase> FindUvOverlaps<B> {
    /// The operation only reads the meshes, so there is nothing to undo.
    pub const IS_UNDOABLE: bool = false;

    /// Replaces the shell-pair filter.
    #[must_use]
    pub fn with_broad_phase<P: BroadPhase>(self, broad_phase: P) -> FindUvOverlaps<P> {
        FindUvOverlaps {
            options: self.options,
            broad_phase,
        }
    }

    #[must_use]
    pub fn options(&self) -> &OverlapOptions {
        &self.options
    }

    /// Executes the check over `meshes`, comparing every shell against every
    /// other shell of every mesh.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NoMeshes`] for an empty slice, and
    /// [`InputError::NoUvSets`] or [`InputError::UvSetNotFound`] when a mesh
    /// cannot provide the requested UV set. Failures inside a sweep are not
    /// errors; they are reported through
    /// [`OverlapReport::failed_partitions`].
    pub fn execute(&self, meshes: &[&dyn UvMesh]) -> Result<OverlapReport> {
        let started = Instant::now();
        if meshes.is_empty() {
            return Err(InputError::NoMeshes.into());
        }
        let uv_sets = self.resolve_uv_sets(meshes)?;
        let threads = self.options.resolved_thread_count();
        info!(meshes = meshes.len(), threads = threads.get(), "checking UV overlaps");

        let stage = Instant::now();
        let mut builder = ShellBuilder::new();
        for (index, (mesh, uv_set)) in meshes.iter().zip(&uv_sets).enumerate() {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            builder.add_mesh(index, *mesh, uv_set);
        }
        let (shells, mut diagnostics) = builder.build();
        let shell_build = stage.elapsed();
        debug!(
            shells = shells.len(),
            edges = shells.edge_count(),
            "built UV shells"
        );

        let stage = Instant::now();
        let pairs = self.broad_phase.candidate_pairs(&shells);
        let broad_phase = stage.elapsed();
        debug!(pairs = pairs.len(), "broad phase done");

        let stage = Instant::now();
        let items = plan_work(&shells, &pairs);
        let outcome = Dispatcher::new(threads).run(&shells, &items);
        let sweep = stage.elapsed();

        let stage = Instant::now();
        let adapter = ReportAdapter::new(meshes, &uv_sets);
        let (findings, identifiers) = adapter.resolve_all(&outcome.findings);
        diagnostics.extend(outcome.diagnostics);
        diagnostics.sort();
        diagnostics.dedup();
        let report_time = stage.elapsed();

        info!(
            shells = shells.len(),
            pairs = pairs.len(),
            findings = findings.len(),
            diagnostics = diagnostics.len(),
            failed_partitions = outcome.failed_partitions,
            "UV overlap check finished"
        );

        let timings = self.options.verbose.then(|| {
            let timings = Timings {
                shell_build,
                broad_phase,
                sweep,
                report: report_time,
                total: started.elapsed(),
            };
            log_timings(&timings);
            timings
        });

        Ok(OverlapReport {
            identifiers,
            findings,
            diagnostics,
            failed_partitions: outcome.failed_partitions,
            timings,
        })
    }

    fn resolve_uv_sets(&self, meshes: &[&dyn UvMesh]) -> Result<Vec<String>> {
        meshes
            .iter()
            .map(|mesh| -> Result<String> {
                let available = mesh.uv_set_names();
                match &self.options.uv_set {
                    Some(name) if available.iter().any(|s| s == name) => Ok(name.clone()),
                    Some(name) => Err(InputError::UvSetNotFound {
                        mesh: mesh.name().to_owned(),
                        uv_set: name.clone(),
                    }
                    .into()),
                    None => mesh.current_uv_set().ok_or_else(|| {
                        InputError::NoUvSets {
                            mesh: mesh.name().to_owned(),
                        }
                        .into()
                    }),
                }
            })
            .collect()
    }
}

fn log_timings(t: &Timings) {
    let ms = |d: Duration| d.as_secs_f64() * 1000.0;
    info!(
        shell_build_ms = ms(t.shell_build),
        broad_phase_ms = ms(t.broad_phase),
        sweep_ms = ms(t.sweep),
        report_ms = ms(t.report),
        total_ms = ms(t.total),
        "UV overlap timings"
    );
}

/// Checks a single mesh with the default broad phase.
///
/// # Errors
///
/// See [`FindUvOverlaps::execute`].
pub fn find_overlaps(mesh: &dyn UvMesh, options: &OverlapOptions) -> Result<OverlapReport> {
    FindUvOverlaps::new(options.clone()).execute(&[mesh])
}
