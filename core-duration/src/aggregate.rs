//! Batch aggregation
//!
//! Drives the resolver across a batch of descriptors and folds the
//! per-file results into a [`Report`]. Descriptors are deduplicated and
//! ordered by path up front, and results are re-sorted by path after
//! resolution, so the report is deterministic whether files are processed
//! sequentially or on a bounded worker pool.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::models::{AudioFileDescriptor, DurationResult};
use crate::resolver::DurationResolver;
use crate::source::ByteSource;

/// One descriptor paired with its resolution outcome.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub descriptor: AudioFileDescriptor,
    pub result: DurationResult,
}

/// Batch summary handed to an external renderer.
///
/// Invariants: `success_count + failure_count == per_file.len()`, and
/// `total_duration_seconds` / `total_size_bytes` accumulate only files
/// whose status is `Ok`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub total_duration_seconds: f64,
    pub total_size_bytes: u64,
    pub success_count: usize,
    pub failure_count: usize,
    /// Per-file results, ordered by path.
    pub per_file: Vec<FileOutcome>,
}

impl Report {
    fn from_outcomes(per_file: Vec<FileOutcome>) -> Self {
        let mut total_duration_seconds = 0.0;
        let mut total_size_bytes = 0u64;
        let mut success_count = 0usize;
        let mut failure_count = 0usize;

        for outcome in &per_file {
            if outcome.result.status.is_ok() {
                success_count += 1;
                total_duration_seconds += outcome.result.duration_seconds;
                total_size_bytes += outcome.descriptor.size_bytes;
            } else {
                failure_count += 1;
            }
        }

        Self {
            total_duration_seconds,
            total_size_bytes,
            success_count,
            failure_count,
            per_file,
        }
    }

    /// Mean duration of successfully resolved files; `None` when the batch
    /// had no successes (never divides by zero).
    pub fn average_duration_seconds(&self) -> Option<f64> {
        if self.success_count > 0 {
            Some(self.total_duration_seconds / self.success_count as f64)
        } else {
            None
        }
    }

    /// Mean size in bytes of successfully resolved files.
    pub fn average_size_bytes(&self) -> Option<f64> {
        if self.success_count > 0 {
            Some(self.total_size_bytes as f64 / self.success_count as f64)
        } else {
            None
        }
    }
}

/// Drives the resolver over a batch of files and accumulates a [`Report`].
pub struct DirectoryAggregator {
    resolver: DurationResolver,
    source: Arc<dyn ByteSource>,
    max_concurrent: usize,
}

impl DirectoryAggregator {
    /// Sequential aggregator.
    pub fn new(resolver: DurationResolver, source: Arc<dyn ByteSource>) -> Self {
        Self {
            resolver,
            source,
            max_concurrent: 1,
        }
    }

    /// Process up to `max_concurrent` files at a time. Per-file parsing is
    /// side-effect-free, so any bound is safe; `0` is treated as `1`.
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Resolve every descriptor in the batch and fold the outcomes into a
    /// report. A bad file never aborts the batch; it is counted as a
    /// failure and processing continues.
    pub async fn aggregate(&self, descriptors: Vec<AudioFileDescriptor>) -> Report {
        let deduplicated = Self::deduplicate(descriptors);
        debug!("aggregating {} files", deduplicated.len());

        let outcomes = if self.max_concurrent <= 1 {
            self.resolve_sequential(deduplicated).await
        } else {
            self.resolve_bounded(deduplicated).await
        };

        Report::from_outcomes(outcomes)
    }

    /// Collapse duplicate paths (case-variant extension patterns on
    /// case-insensitive storage can match the same physical file twice)
    /// and order the batch by path.
    fn deduplicate(descriptors: Vec<AudioFileDescriptor>) -> Vec<AudioFileDescriptor> {
        let mut by_path: BTreeMap<PathBuf, AudioFileDescriptor> = BTreeMap::new();
        for descriptor in descriptors {
            if by_path.contains_key(&descriptor.path) {
                debug!("dropping duplicate descriptor for {}", descriptor.path.display());
                continue;
            }
            by_path.insert(descriptor.path.clone(), descriptor);
        }
        by_path.into_values().collect()
    }

    async fn resolve_sequential(&self, descriptors: Vec<AudioFileDescriptor>) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let result = self.resolver.resolve(&descriptor, self.source.as_ref()).await;
            outcomes.push(FileOutcome { descriptor, result });
        }
        outcomes
    }

    async fn resolve_bounded(&self, descriptors: Vec<AudioFileDescriptor>) -> Vec<FileOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks: JoinSet<FileOutcome> = JoinSet::new();

        for descriptor in descriptors {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // semaphore closed, cannot happen here
            };
            let resolver = self.resolver.clone();
            let source = Arc::clone(&self.source);
            tasks.spawn(async move {
                let _permit = permit;
                let result = resolver.resolve(&descriptor, source.as_ref()).await;
                FileOutcome { descriptor, result }
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!("aggregation task failed to join: {}", e),
            }
        }

        // Completion order is nondeterministic; restore path order.
        outcomes.sort_by(|a, b| a.descriptor.path.cmp(&b.descriptor.path));
        outcomes
    }
}
