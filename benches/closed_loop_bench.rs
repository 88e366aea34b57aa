//! Measures pure engine-loop overhead: a driver whose completions are always
//! ready immediately, and a verifier that accepts everything. No storage.
//!
//! Run with: cargo bench --bench closed_loop_bench

use std::collections::VecDeque;
use std::hint::black_box;
use std::io;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use ringbench::config::BLOCK_SIZE;
use ringbench::read_loop::{Completion, RingDriver, run_closed_loop};
use ringbench::slots::SlotPool;

const NUM_BLOCKS: u64 = 5_000_000;

struct ReadyRing {
    pending: VecDeque<usize>,
}

impl RingDriver for ReadyRing {
    fn submit_read(&mut self, slot_idx: usize, _pool: &SlotPool) -> io::Result<()> {
        self.pending.push_back(slot_idx);
        Ok(())
    }

    fn try_complete(&mut self) -> io::Result<Option<Completion>> {
        Ok(self.pending.pop_front().map(|slot_idx| Completion {
            slot_idx,
            result: BLOCK_SIZE as i32,
        }))
    }
}

fn main() {
    let mut driver = ReadyRing {
        pending: VecDeque::new(),
    };
    let mut pool = SlotPool::new();
    let mut rng = StdRng::seed_from_u64(42);

    let start = Instant::now();
    let stats = run_closed_loop(&mut driver, &mut pool, NUM_BLOCKS, &mut rng, |buf, id| {
        black_box((buf.len(), id));
        true
    })
    .expect("closed loop failed");
    let elapsed = start.elapsed();

    println!(
        "{} completions in {:.3}s ({:.1} M ops/s)",
        stats.completed,
        elapsed.as_secs_f64(),
        stats.completed as f64 / elapsed.as_secs_f64() / 1e6,
    );
}
