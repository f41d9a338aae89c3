//! Parallel execution of sweeps and merging of their findings.
//!
//! Work items are split into contiguous, weight-balanced partitions, one per
//! worker. Each worker reads the shared [`ShellSet`] and returns an owned list
//! of findings; merging happens once all workers have joined, so no lock sits
//! on the hot path.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use crate::broad_phase::ShellPair;
use crate::error::SweepError;
use crate::report::Diagnostic;
use crate::shell::{EdgeKey, ShellKey, ShellSet};
use crate::sweep::{find_intersections, OverlapFinding};

/// One unit of sweep work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkItem {
    /// Self-intersections within one shell.
    Shell(ShellKey),
    /// Crossings between two shells.
    Pair(ShellKey, ShellKey),
}

impl WorkItem {
    /// Number of edges the sweep for this item will process.
    #[must_use]
    pub fn weight(&self, shells: &ShellSet) -> usize {
        let edges = |k: ShellKey| shells.get(k).map_or(0, |s| s.edges().len());
        match *self {
            Self::Shell(k) => edges(k),
            Self::Pair(a, b) => edges(a) + edges(b),
        }
    }
}

/// Self-checks for every shell followed by the candidate pairs.
#[must_use]
pub fn plan_work(shells: &ShellSet, pairs: &[ShellPair]) -> Vec<WorkItem> {
    shells
        .iter()
        .map(|s| WorkItem::Shell(s.key()))
        .chain(pairs.iter().map(|&(a, b)| WorkItem::Pair(a, b)))
        .collect()
}

/// Splits `weights` into at most `parts` contiguous, non-empty ranges of
/// roughly equal total weight.
#[must_use]
pub fn partition(weights: &[usize], parts: NonZeroUsize) -> Vec<Range<usize>> {
    if weights.is_empty() {
        return Vec::new();
    }
    let parts = parts.get().min(weights.len());
    let total: usize = weights.iter().map(|&w| w.max(1)).sum();

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    let mut acc = 0;
    for (i, &w) in weights.iter().enumerate() {
        acc += w.max(1);
        let remaining_items = weights.len() - (i + 1);
        let remaining_parts = parts - ranges.len() - 1;
        // Close the current range once it reaches its share of the total,
        // keeping at least one item for each partition still to come.
        let target = total * (ranges.len() + 1) / parts;
        if remaining_parts > 0 && (acc >= target || remaining_items == remaining_parts) {
            ranges.push(start..i + 1);
            start = i + 1;
        }
    }
    ranges.push(start..weights.len());
    ranges
}

/// Merged output of all partitions.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Sorted by [`OverlapFinding::sort_key`], one entry per edge pair.
    pub findings: Vec<OverlapFinding>,
    pub diagnostics: Vec<Diagnostic>,
    pub failed_partitions: usize,
}

struct PartitionOutput {
    findings: Vec<OverlapFinding>,
    skipped: Vec<EdgeKey>,
}

/// Runs sweeps on a fixed-size worker pool.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    threads: NonZeroUsize,
}

impl Dispatcher {
    #[must_use]
    pub fn new(threads: NonZeroUsize) -> Self {
        Self { threads }
    }

    #[must_use]
    pub fn threads(&self) -> NonZeroUsize {
        self.threads
    }

    /// Sweeps every work item and merges the results.
    ///
    /// A partition that fails is logged and dropped whole; the others are
    /// unaffected.
    #[must_use]
    pub fn run(&self, shells: &ShellSet, items: &[WorkItem]) -> DispatchOutcome {
        self.run_with(shells, items, sweep_partition)
    }

    fn run_with<F>(&self, shells: &ShellSet, items: &[WorkItem], sweep: F) -> DispatchOutcome
    where
        F: Fn(&ShellSet, &[WorkItem]) -> Result<PartitionOutput, SweepError> + Sync,
    {
        let weights: Vec<usize> = items.iter().map(|i| i.weight(shells)).collect();
        let ranges = partition(&weights, self.threads);
        debug!(
            items = items.len(),
            partitions = ranges.len(),
            threads = self.threads.get(),
            "dispatching sweep work"
        );

        let work = |range: &Range<usize>| guarded(|| sweep(shells, &items[range.clone()]));
        let results: Vec<Result<PartitionOutput, SweepError>> =
            match ThreadPoolBuilder::new().num_threads(self.threads.get()).build() {
                Ok(pool) => pool.install(|| ranges.par_iter().map(work).collect()),
                Err(err) => {
                    warn!(%err, "worker pool unavailable, sweeping on the calling thread");
                    ranges.iter().map(work).collect()
                }
            };

        merge(results)
    }
}

/// Runs `f`, turning a panic into a [`SweepError`].
fn guarded<T, F>(f: F) -> Result<T, SweepError>
where
    F: FnOnce() -> Result<T, SweepError>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_owned());
        Err(SweepError::Panicked(message))
    })
}

fn sweep_partition(shells: &ShellSet, items: &[WorkItem]) -> Result<PartitionOutput, SweepError> {
    let mut out = PartitionOutput {
        findings: Vec::new(),
        skipped: Vec::new(),
    };
    for item in items {
        match *item {
            WorkItem::Shell(k) => {
                let Some(shell) = shells.get(k) else { continue };
                let outcome = find_intersections(shell.edges())?;
                out.findings.extend(outcome.findings);
                out.skipped.extend(outcome.skipped);
            }
            WorkItem::Pair(a, b) => {
                let (Some(sa), Some(sb)) = (shells.get(a), shells.get(b)) else {
                    continue;
                };
                let outcome = find_intersections(sa.edges().iter().chain(sb.edges()))?;
                // Same-shell pairs belong to the shells' own work items.
                out.findings
                    .extend(outcome.findings.into_iter().filter(OverlapFinding::is_cross_shell));
                out.skipped.extend(outcome.skipped);
            }
        }
    }
    Ok(out)
}

fn merge(results: Vec<Result<PartitionOutput, SweepError>>) -> DispatchOutcome {
    let mut unique: BTreeMap<(EdgeKey, EdgeKey), OverlapFinding> = BTreeMap::new();
    let mut outcome = DispatchOutcome::default();

    for (partition, result) in results.into_iter().enumerate() {
        match result {
            Ok(output) => {
                for finding in output.findings {
                    unique.entry(finding.identity()).or_insert(finding);
                }
                outcome
                    .diagnostics
                    .extend(output.skipped.into_iter().map(|edge| Diagnostic::SkippedEdge { edge }));
            }
            Err(err) => {
                warn!(partition, %err, "sweep partition failed, dropping its findings");
                outcome.failed_partitions += 1;
                outcome.diagnostics.push(Diagnostic::WorkerFailure {
                    partition,
                    message: err.to_string(),
                });
            }
        }
    }

    outcome.findings = unique.into_values().collect();
    outcome.findings.sort_by_key(OverlapFinding::sort_key);
    outcome.diagnostics.sort();
    outcome.diagnostics.dedup();
    outcome
}
