//! Worker fan-out: one engine per thread, joined before returning.

use std::thread;

use crate::fatal::{self, FatalKind};

/// Run `body(worker_index)` on `num_workers` parallel threads and block until
/// every one has finished. Workers share no state; a worker that dies fatally
/// takes the whole process with it.
pub fn run_workers<F>(num_workers: usize, body: F)
where
    F: Fn(usize) + Send + Clone + 'static,
{
    let mut handles = Vec::with_capacity(num_workers);
    for i in 0..num_workers {
        let body = body.clone();
        match thread::Builder::new()
            .name(format!("reader-{i}"))
            .spawn(move || body(i))
        {
            Ok(handle) => handles.push(handle),
            Err(e) => fatal::die(FatalKind::Worker, &format!("spawn worker {i}: {e}")),
        }
    }
    for (i, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() {
            fatal::die(FatalKind::Worker, &format!("worker {i} panicked"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn runs_every_worker_exactly_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let index_mask = Arc::new(AtomicU64::new(0));
        let runs2 = Arc::clone(&runs);
        let mask2 = Arc::clone(&index_mask);

        run_workers(4, move |i| {
            runs2.fetch_add(1, Ordering::SeqCst);
            mask2.fetch_or(1 << i, Ordering::SeqCst);
        });

        assert_eq!(runs.load(Ordering::SeqCst), 4);
        assert_eq!(index_mask.load(Ordering::SeqCst), 0b1111);
    }

    #[test]
    fn blocks_until_all_workers_finish() {
        let done = Arc::new(AtomicUsize::new(0));
        let done2 = Arc::clone(&done);

        run_workers(3, move |_| {
            thread::sleep(Duration::from_millis(20));
            done2.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(done.load(Ordering::SeqCst), 3);
    }
}
