//! Host-side build lifecycle surface.
//!
//! Mirrors a bundler's compiler/compilation split:
//! - `BuildHost` — the long-lived object plugins tap at `apply` time
//! - `Compilation` — the per-cycle object carrying the diagnostics
//!   collections and the file timestamp snapshot
//! - `LifecycleHooks` — the two plugin-visible points: cycle start (async,
//!   receives the timestamp snapshot, returns the completion signal) and
//!   cycle flush (sync, two stages, mutates the compilation)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;

use crate::errors::CycleError;

/// File modification time in epoch milliseconds.
pub type Timestamp = i64;

/// Every file the host knows about, keyed by absolute path. Ordered so that
/// downstream diffing is deterministic.
pub type FileTimestamps = BTreeMap<PathBuf, Timestamp>;

pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Per-cycle mutable state: diagnostics collections plus the timestamp map.
#[derive(Debug, Default)]
pub struct Compilation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub file_timestamps: FileTimestamps,
}

impl Compilation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamps(file_timestamps: FileTimestamps) -> Self {
        Self {
            file_timestamps,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            file_timestamps: self.file_timestamps.clone(),
        }
    }
}

/// Read-only view handed to cycle-start taps.
#[derive(Debug, Clone, Default)]
pub struct CycleSnapshot {
    pub file_timestamps: FileTimestamps,
}

/// Which flush point a tap is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStage {
    /// Before the host treats the cycle's outputs as final; errors surface
    /// as compile-stage diagnostics.
    AfterCompile,
    /// After outputs are emitted; errors surface as emit-stage diagnostics.
    AfterEmit,
}

/// Async tap run at cycle start; its result is the cycle's completion signal.
pub type CycleStartTap =
    Box<dyn FnMut(CycleSnapshot) -> BoxFuture<'static, Result<(), CycleError>> + Send>;

/// Sync tap run at a flush stage.
pub type FlushTap = Box<dyn FnMut(&mut Compilation) + Send>;

#[derive(Default)]
struct TapLists {
    cycle_start: Vec<CycleStartTap>,
    after_compile: Vec<FlushTap>,
    after_emit: Vec<FlushTap>,
}

/// Registration and dispatch for the two plugin-visible lifecycle points.
///
/// Taps persist across cycles. Cycle-start taps run sequentially in
/// registration order and the first failure becomes the cycle's signal;
/// flush taps cannot fail.
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    taps: Arc<Mutex<TapLists>>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cycle_start(&self, tap: CycleStartTap) {
        self.lock().cycle_start.push(tap);
    }

    pub fn on_cycle_flush(&self, stage: FlushStage, tap: FlushTap) {
        let mut taps = self.lock();
        match stage {
            FlushStage::AfterCompile => taps.after_compile.push(tap),
            FlushStage::AfterEmit => taps.after_emit.push(tap),
        }
    }

    /// Run every cycle-start tap to completion, stopping at the first
    /// failure. Futures are created under the lock but awaited outside it:
    /// taps register flush taps mid-cycle, which takes the lock again.
    pub async fn fire_cycle_start(&self, snapshot: &CycleSnapshot) -> Result<(), CycleError> {
        let pending = {
            let mut taps = self.lock();
            taps.cycle_start
                .iter_mut()
                .map(|tap| tap(snapshot.clone()))
                .collect::<Vec<_>>()
        };
        for tap in pending {
            tap.await?;
        }
        Ok(())
    }

    pub fn fire_cycle_flush(&self, stage: FlushStage, compilation: &mut Compilation) {
        let mut taps = self.lock();
        let stage_taps = match stage {
            FlushStage::AfterCompile => &mut taps.after_compile,
            FlushStage::AfterEmit => &mut taps.after_emit,
        };
        for tap in stage_taps.iter_mut() {
            tap(compilation);
        }
    }

    fn lock(&self) -> MutexGuard<'_, TapLists> {
        self.taps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A minimal build host: a context directory plus the hook surface.
pub struct BuildHost {
    context: PathBuf,
    hooks: LifecycleHooks,
}

impl BuildHost {
    pub fn new(context: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            hooks: LifecycleHooks::new(),
        }
    }

    pub fn context(&self) -> &Path {
        &self.context
    }

    pub fn hooks(&self) -> &LifecycleHooks {
        &self.hooks
    }

    /// Drive one build cycle in the canonical order: cycle-start taps, then
    /// both flush stages. Flush fires even when the cycle failed, so
    /// diagnostics still land in the compilation's collections.
    pub async fn run_cycle(&self, compilation: &mut Compilation) -> Result<(), CycleError> {
        tracing::debug!(
            files = compilation.file_timestamps.len(),
            "running build cycle"
        );
        let result = self.hooks.fire_cycle_start(&compilation.snapshot()).await;
        self.hooks
            .fire_cycle_flush(FlushStage::AfterCompile, compilation);
        self.hooks
            .fire_cycle_flush(FlushStage::AfterEmit, compilation);
        result
    }
}
