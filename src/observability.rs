//! Observer hooks for subtraction runs.
//!
//! Configure an observer through [`crate::processing::SubtractOptions::observer`]. The crate ships
//! three sinks: [`StdErrObserver`], [`FileObserver`] and [`CompositeObserver`] for fan-out.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SubtractError;
use crate::processing::DuplicateKeyPolicy;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubtractSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal), e.g. a duplicate subtrahend key.
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

/// Which entrypoint produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtractOperation {
    /// [`crate::processing::subtract_with_options`] over typed rows.
    Rows,
    /// [`crate::processing::subtract_datasets`].
    DataSet,
}

/// Context about a subtraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtractContext {
    pub operation: SubtractOperation,
    /// Length of the minuend sequence.
    pub initial_rows: usize,
    /// Length of the subtrahend sequence.
    pub reduce_rows: usize,
    /// Policy in effect for duplicate subtrahend keys.
    pub duplicate_keys: DuplicateKeyPolicy,
}

/// Stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubtractStats {
    /// Number of output rows (always the minuend length).
    pub output_rows: usize,
    /// Rows that had a same-keyed subtrahend row.
    pub matched: usize,
    /// Rows copied through unchanged.
    pub passed_through: usize,
    /// Duplicate keys seen in the subtrahend.
    pub duplicate_keys: usize,
}

/// Observer interface for subtraction outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. Every method defaults to a no-op.
pub trait SubtractObserver: Send + Sync {
    /// Called when a run succeeds.
    fn on_success(&self, _ctx: &SubtractContext, _stats: SubtractStats) {}

    /// Called for each repeated key in the subtrahend, with the earlier and later positions.
    fn on_duplicate_key(&self, _ctx: &SubtractContext, _key: &str, _first: usize, _second: usize) {}

    /// Called when a run fails.
    fn on_failure(
        &self,
        _ctx: &SubtractContext,
        _severity: SubtractSeverity,
        _error: &SubtractError,
    ) {
    }

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &SubtractContext, severity: SubtractSeverity, error: &SubtractError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SubtractObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn SubtractObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SubtractObserver for CompositeObserver {
    fn on_success(&self, ctx: &SubtractContext, stats: SubtractStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_duplicate_key(&self, ctx: &SubtractContext, key: &str, first: usize, second: usize) {
        for o in &self.observers {
            o.on_duplicate_key(ctx, key, first, second);
        }
    }

    fn on_failure(&self, ctx: &SubtractContext, severity: SubtractSeverity, error: &SubtractError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &SubtractContext, severity: SubtractSeverity, error: &SubtractError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs subtraction events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl SubtractObserver for StdErrObserver {
    fn on_success(&self, ctx: &SubtractContext, stats: SubtractStats) {
        eprintln!(
            "[subtract][ok] op={:?} initial={} reduce={} matched={} passed_through={} \
             duplicates={}",
            ctx.operation,
            ctx.initial_rows,
            ctx.reduce_rows,
            stats.matched,
            stats.passed_through,
            stats.duplicate_keys
        );
    }

    fn on_duplicate_key(&self, ctx: &SubtractContext, key: &str, first: usize, second: usize) {
        eprintln!(
            "[subtract][Warning] op={:?} duplicate key '{}' at {} and {} policy={:?}",
            ctx.operation, key, first, second, ctx.duplicate_keys
        );
    }

    fn on_failure(&self, ctx: &SubtractContext, severity: SubtractSeverity, error: &SubtractError) {
        eprintln!(
            "[subtract][{:?}] op={:?} initial={} reduce={} err={}",
            severity, ctx.operation, ctx.initial_rows, ctx.reduce_rows, error
        );
    }

    fn on_alert(&self, ctx: &SubtractContext, severity: SubtractSeverity, error: &SubtractError) {
        eprintln!(
            "[ALERT][subtract][{:?}] op={:?} initial={} reduce={} err={}",
            severity, ctx.operation, ctx.initial_rows, ctx.reduce_rows, error
        );
    }
}

/// Appends subtraction events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl SubtractObserver for FileObserver {
    fn on_success(&self, ctx: &SubtractContext, stats: SubtractStats) {
        self.append_line(&format!(
            "{} ok op={:?} rows={} matched={} passed_through={} duplicates={}",
            unix_ts(),
            ctx.operation,
            stats.output_rows,
            stats.matched,
            stats.passed_through,
            stats.duplicate_keys
        ));
    }

    fn on_duplicate_key(&self, ctx: &SubtractContext, key: &str, first: usize, second: usize) {
        self.append_line(&format!(
            "{} duplicate op={:?} key={} first={} second={}",
            unix_ts(),
            ctx.operation,
            key,
            first,
            second
        ));
    }

    fn on_failure(&self, ctx: &SubtractContext, severity: SubtractSeverity, error: &SubtractError) {
        self.append_line(&format!(
            "{} fail severity={:?} op={:?} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            error
        ));
    }

    fn on_alert(&self, ctx: &SubtractContext, severity: SubtractSeverity, error: &SubtractError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} op={:?} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
