// Metrics hooks for the `matcher` crate.
//
// Callers install a global `MatchMetrics` implementation via [`set_match_metrics`],
// then every `Matcher` reports latency and candidate counts for its public
// operations. This keeps instrumentation decoupled from any specific metrics
// backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::types::MatchOperation;

/// Metrics observer for match operations.
pub trait MatchMetrics: Send + Sync {
    /// Record one scoring call.
    ///
    /// `candidates` is the number of songs the call considered and `latency`
    /// the wall-clock time spent, including failed calls.
    fn record_match(&self, operation: MatchOperation, candidates: usize, latency: Duration);

    /// Record one corpus-wide unique assignment.
    ///
    /// `committed` is the number of (book, song) pairs in the result.
    fn record_assignment(&self, books: usize, songs: usize, committed: usize, latency: Duration);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
///
/// This is typically called once during startup so all `Matcher` instances
/// share the same metrics backend.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
