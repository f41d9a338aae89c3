//! Options for an overlap run.
//!
//! # Example
//!
//! ```
//! use uvlap::OverlapOptions;
//!
//! let options = OverlapOptions::default()
//!     .with_uv_set("map1")
//!     .with_thread_count(4)
//!     .with_verbose(true);
//! assert_eq!(options.resolved_thread_count().get(), 4);
//! ```

use std::num::NonZeroUsize;

/// Configuration for [`FindUvOverlaps`](crate::FindUvOverlaps).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapOptions {
    /// UV set to analyze. `None` uses each mesh's current UV set.
    pub uv_set: Option<String>,

    /// Attach per-stage timings to the report and log them.
    pub verbose: bool,

    /// Worker pool size, which is also the number of partitions.
    /// `None` uses the available hardware concurrency.
    pub thread_count: Option<NonZeroUsize>,
}

impl OverlapOptions {
    #[must_use]
    pub fn with_uv_set(mut self, uv_set: impl Into<String>) -> Self {
        self.uv_set = Some(uv_set.into());
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the worker count. `0` restores the hardware default.
    #[must_use]
    pub fn with_thread_count(mut self, threads: usize) -> Self {
        self.thread_count = NonZeroUsize::new(threads);
        self
    }

    /// The worker count this run will use.
    #[must_use]
    pub fn resolved_thread_count(&self) -> NonZeroUsize {
        self.thread_count.unwrap_or_else(|| {
            std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
        })
    }
}
