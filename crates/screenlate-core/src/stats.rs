use std::sync::atomic::{AtomicU64, Ordering};

/// Pipeline counters
#[derive(Debug, Default)]
pub struct PipelineStats {
    cycles_started: AtomicU64,
    cycles_completed: AtomicU64,
    ticks_skipped: AtomicU64,
    capture_failures: AtomicU64,
    recognition_failures: AtomicU64,
    translation_failures: AtomicU64,
    stale_results: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub cycles_started: u64,
    pub cycles_completed: u64,
    pub ticks_skipped: u64,
    pub capture_failures: u64,
    pub recognition_failures: u64,
    pub translation_failures: u64,
    pub stale_results: u64,
}

impl PipelineStats {
    pub fn cycle_started(&self) {
        self.cycles_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycle_completed(&self) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tick_skipped(&self) {
        self.ticks_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn capture_failed(&self) {
        self.capture_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn recognition_failed(&self) {
        self.recognition_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn translation_failed(&self) {
        self.translation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stale_result(&self) {
        self.stale_results.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles_started: self.cycles_started.load(Ordering::Relaxed),
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            ticks_skipped: self.ticks_skipped.load(Ordering::Relaxed),
            capture_failures: self.capture_failures.load(Ordering::Relaxed),
            recognition_failures: self.recognition_failures.load(Ordering::Relaxed),
            translation_failures: self.translation_failures.load(Ordering::Relaxed),
            stale_results: self.stale_results.load(Ordering::Relaxed),
        }
    }
}
