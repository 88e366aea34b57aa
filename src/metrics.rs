#[cfg(feature = "metrics")]
mod imp {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use crate::config::BLOCK_SIZE;

    // Throughput (cumulative, summed across workers)
    static READS_SUBMITTED: AtomicU64 = AtomicU64::new(0);
    static READS_COMPLETED: AtomicU64 = AtomicU64::new(0);
    // Completion polls that found nothing ready (the spin path)
    static EMPTY_POLLS: AtomicU64 = AtomicU64::new(0);

    #[derive(Clone, Copy)]
    pub struct MetricsSnapshot {
        pub reads_submitted: u64,
        pub reads_completed: u64,
        pub empty_polls: u64,
    }

    pub fn inc_submitted() {
        READS_SUBMITTED.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_completed() {
        READS_COMPLETED.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_polls() {
        EMPTY_POLLS.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            reads_submitted: READS_SUBMITTED.load(Ordering::Relaxed),
            reads_completed: READS_COMPLETED.load(Ordering::Relaxed),
            empty_polls: EMPTY_POLLS.load(Ordering::Relaxed),
        }
    }

    pub fn spawn_reporter() {
        const INTERVAL_SECS: u64 = 5;
        std::thread::spawn(|| {
            let mut last = snapshot();
            loop {
                std::thread::sleep(Duration::from_secs(INTERVAL_SECS));
                let snap = snapshot();
                let submitted_d = snap.reads_submitted.saturating_sub(last.reads_submitted);
                let completed_d = snap.reads_completed.saturating_sub(last.reads_completed);
                let empty_d = snap.empty_polls.saturating_sub(last.empty_polls);
                let mb_s = completed_d as f64 * BLOCK_SIZE as f64
                    / (1024.0 * 1024.0)
                    / INTERVAL_SECS as f64;
                eprintln!(
                    "metrics delta {INTERVAL_SECS}s: submitted={submitted_d} completed={completed_d} empty_polls={empty_d} ({mb_s:.1} MB/s)"
                );
                last = snap;
            }
        });
    }
}

#[cfg(not(feature = "metrics"))]
#[allow(dead_code)]
mod imp {
    #[derive(Clone, Copy)]
    pub struct MetricsSnapshot {
        pub reads_submitted: u64,
        pub reads_completed: u64,
        pub empty_polls: u64,
    }

    pub fn inc_submitted() {}
    pub fn inc_completed() {}
    pub fn inc_empty_polls() {}
    pub fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            reads_submitted: 0,
            reads_completed: 0,
            empty_polls: 0,
        }
    }
    pub fn spawn_reporter() {}
}

pub use imp::*;
