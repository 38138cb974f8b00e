//! Incremental dirty-file tracking across build cycles.
//!
//! The tracker compares each cycle's file timestamp snapshot against the
//! previous one and delegates a lint run narrowed to exactly the files that
//! changed. The first cycle after construction only records timestamps; a
//! full lint of an unchanged project on startup is deliberately avoided.

use std::sync::Arc;

use crate::errors::CycleError;
use crate::host::{CycleSnapshot, FileTimestamps, LifecycleHooks, Timestamp, now_millis};
use crate::runner::CompilationRunner;

/// Cross-cycle dirty tracking state plus the runner it delegates to.
///
/// State invariants:
/// - `prev_timestamps` is replaced wholesale every cycle, never merged
/// - files first seen after construction compare against `start_time`
/// - a recorded timestamp of zero is a real value, not an absent one
pub struct DirtyTracker {
    start_time: Timestamp,
    prev_timestamps: FileTimestamps,
    is_first_run: bool,
    runner: CompilationRunner,
}

impl DirtyTracker {
    pub fn new(runner: CompilationRunner) -> Self {
        Self {
            start_time: now_millis(),
            prev_timestamps: FileTimestamps::new(),
            is_first_run: true,
            runner,
        }
    }

    #[cfg(test)]
    fn with_start_time(mut self, start_time: Timestamp) -> Self {
        self.start_time = start_time;
        self
    }

    /// Register the tracker on the cycle-start point. The hook surface is
    /// also what the delegated runner registers its flush tap on.
    pub fn apply(self, hooks: &LifecycleHooks) {
        let flush_hooks = hooks.clone();
        let tracker = Arc::new(tokio::sync::Mutex::new(self));
        hooks.on_cycle_start(Box::new(move |snapshot| {
            let tracker = tracker.clone();
            let hooks = flush_hooks.clone();
            Box::pin(async move { tracker.lock().await.lint_cycle(&snapshot, &hooks).await })
        }));
    }

    /// One build cycle: skip on the first run, otherwise lint exactly the
    /// changed files. Cycles without dirty style files complete immediately
    /// and never touch the engine.
    pub async fn lint_cycle(
        &mut self,
        snapshot: &CycleSnapshot,
        hooks: &LifecycleHooks,
    ) -> Result<(), CycleError> {
        if self.is_first_run {
            self.is_first_run = false;
            self.prev_timestamps = snapshot.file_timestamps.clone();
            tracing::debug!("first build cycle, recording timestamps only");
            return Ok(());
        }

        let changed = self.changed_files(&snapshot.file_timestamps);
        self.prev_timestamps = snapshot.file_timestamps.clone();

        if changed.is_empty() {
            tracing::debug!("no dirty style files, skipping lint");
            return Ok(());
        }
        tracing::debug!(dirty = changed.len(), "linting dirty files");
        self.runner.run(hooks, changed).await
    }

    /// A file is dirty when its timestamp is newer than the previous
    /// snapshot's (or than `start_time` for files not seen before) and it
    /// matches the configured patterns.
    fn changed_files(&self, current: &FileTimestamps) -> Vec<String> {
        let patterns = self.runner.options().patterns();
        current
            .iter()
            .filter(|(path, timestamp)| {
                let last_seen = self
                    .prev_timestamps
                    .get(*path)
                    .copied()
                    .unwrap_or(self.start_time);
                last_seen < **timestamp && patterns.matches(path)
            })
            .map(|(path, _)| path.to_string_lossy().into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{LintEngine, LintOutcome, LintRequest};
    use crate::options::LintOptions;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingEngine {
        requests: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingEngine {
        fn lint_calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_files(&self) -> Vec<String> {
            self.requests.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl LintEngine for RecordingEngine {
        async fn lint(&self, request: LintRequest) -> Result<LintOutcome> {
            self.requests.lock().unwrap().push(request.files);
            Ok(LintOutcome::default())
        }
    }

    fn tracker_with(engine: Arc<RecordingEngine>, start_time: Timestamp) -> DirtyTracker {
        let options = Arc::new(
            LintOptions::builder()
                .build(std::path::Path::new("/"))
                .unwrap(),
        );
        DirtyTracker::new(CompilationRunner::new(options, engine)).with_start_time(start_time)
    }

    fn snapshot(entries: &[(&str, Timestamp)]) -> CycleSnapshot {
        CycleSnapshot {
            file_timestamps: entries
                .iter()
                .map(|(path, timestamp)| (PathBuf::from(path), *timestamp))
                .collect(),
        }
    }

    #[tokio::test]
    async fn first_cycle_records_timestamps_without_linting() {
        let engine = Arc::new(RecordingEngine::default());
        let mut tracker = tracker_with(engine.clone(), 10);
        let hooks = LifecycleHooks::new();

        tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 5)]), &hooks)
            .await
            .unwrap();

        assert_eq!(engine.lint_calls(), 0);
        assert_eq!(
            tracker.prev_timestamps.get(&PathBuf::from("/test/a.scss")),
            Some(&5)
        );
    }

    #[tokio::test]
    async fn changed_files_respect_start_time_and_patterns() {
        let engine = Arc::new(RecordingEngine::default());
        let mut tracker = tracker_with(engine.clone(), 10);
        let hooks = LifecycleHooks::new();

        tracker
            .lint_cycle(
                &snapshot(&[
                    ("/test/changed.scss", 5),
                    ("/test/removed.scss", 5),
                    ("/test/changed.js", 5),
                ]),
                &hooks,
            )
            .await
            .unwrap();
        tracker
            .lint_cycle(
                &snapshot(&[
                    ("/test/changed.scss", 20),
                    ("/test/changed.js", 20),
                    ("/test/newly-created.scss", 15),
                ]),
                &hooks,
            )
            .await
            .unwrap();

        assert_eq!(engine.lint_calls(), 1);
        assert_eq!(
            engine.last_files(),
            vec![
                "/test/changed.scss".to_string(),
                "/test/newly-created.scss".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn unchanged_cycles_never_touch_the_engine() {
        let engine = Arc::new(RecordingEngine::default());
        let mut tracker = tracker_with(engine.clone(), 10);
        let hooks = LifecycleHooks::new();

        let same = snapshot(&[("/test/a.scss", 5)]);
        tracker.lint_cycle(&same, &hooks).await.unwrap();
        tracker.lint_cycle(&same, &hooks).await.unwrap();
        tracker.lint_cycle(&same, &hooks).await.unwrap();

        assert_eq!(engine.lint_calls(), 0);
    }

    #[tokio::test]
    async fn snapshot_replacement_is_wholesale() {
        let engine = Arc::new(RecordingEngine::default());
        let mut tracker = tracker_with(engine.clone(), 10);
        let hooks = LifecycleHooks::new();

        tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 5), ("/test/b.scss", 5)]), &hooks)
            .await
            .unwrap();
        tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 20)]), &hooks)
            .await
            .unwrap();
        assert_eq!(engine.last_files(), vec!["/test/a.scss".to_string()]);

        // b.scss reappears with its old timestamp: the previous snapshot was
        // replaced, so it compares against start_time and is not dirty.
        tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 20), ("/test/b.scss", 5)]), &hooks)
            .await
            .unwrap();

        assert_eq!(engine.lint_calls(), 1);
    }

    #[tokio::test]
    async fn files_outside_the_patterns_are_never_dirty() {
        let engine = Arc::new(RecordingEngine::default());
        let mut tracker = tracker_with(engine.clone(), 10);
        let hooks = LifecycleHooks::new();

        tracker
            .lint_cycle(&snapshot(&[("/test/app.js", 5)]), &hooks)
            .await
            .unwrap();
        tracker
            .lint_cycle(&snapshot(&[("/test/app.js", 50)]), &hooks)
            .await
            .unwrap();

        assert_eq!(engine.lint_calls(), 0);
    }

    #[tokio::test]
    async fn zero_timestamps_compare_as_real_values() {
        let engine = Arc::new(RecordingEngine::default());
        let mut tracker = tracker_with(engine.clone(), 100);
        let hooks = LifecycleHooks::new();

        tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 0)]), &hooks)
            .await
            .unwrap();
        // 0 < 5, so the file is dirty; defaulting the zero to start_time
        // (100) would wrongly skip it.
        tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 5)]), &hooks)
            .await
            .unwrap();

        assert_eq!(engine.lint_calls(), 1);
        assert_eq!(engine.last_files(), vec!["/test/a.scss".to_string()]);
    }

    #[tokio::test]
    async fn delegated_run_failures_propagate() {
        struct FailingEngine;

        #[async_trait]
        impl LintEngine for FailingEngine {
            async fn lint(&self, _request: LintRequest) -> Result<LintOutcome> {
                anyhow::bail!("engine exploded")
            }
        }

        let options = Arc::new(
            LintOptions::builder()
                .build(std::path::Path::new("/"))
                .unwrap(),
        );
        let mut tracker =
            DirtyTracker::new(CompilationRunner::new(options, Arc::new(FailingEngine)))
                .with_start_time(10);
        let hooks = LifecycleHooks::new();

        tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 5)]), &hooks)
            .await
            .unwrap();
        let err = tracker
            .lint_cycle(&snapshot(&[("/test/a.scss", 20)]), &hooks)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("engine exploded"));
    }

    #[tokio::test]
    async fn apply_registers_the_tracker_on_cycle_start() {
        let engine = Arc::new(RecordingEngine::default());
        let tracker = tracker_with(engine.clone(), 10);
        let hooks = LifecycleHooks::new();
        tracker.apply(&hooks);

        hooks
            .fire_cycle_start(&snapshot(&[("/test/a.scss", 5)]))
            .await
            .unwrap();
        assert_eq!(engine.lint_calls(), 0);

        hooks
            .fire_cycle_start(&snapshot(&[("/test/a.scss", 20)]))
            .await
            .unwrap();
        assert_eq!(engine.lint_calls(), 1);
        assert_eq!(engine.last_files(), vec!["/test/a.scss".to_string()]);
    }
}
