//! The closed loop: keep every slot's read in flight, verify each completion,
//! and immediately reuse its slot for a fresh random block.
//!
//! Extracted behind `RingDriver` so the loop's lifecycle rules can be tested
//! with a simulated ring, without io_uring or a real file.

use std::fmt;
use std::io;

use rand::Rng;

use crate::fatal::FatalKind;
use crate::metrics;
use crate::slots::SlotPool;

/// Submission/completion surface the loop drives.
pub trait RingDriver {
    /// Queue and submit one read of `pool.slot(slot_idx)`'s current block
    /// into that slot's buffer.
    fn submit_read(&mut self, slot_idx: usize, pool: &SlotPool) -> io::Result<()>;

    /// Non-blocking completion poll. `Ok(None)` means nothing is ready yet;
    /// the loop spins and retries.
    fn try_complete(&mut self) -> io::Result<Option<Completion>>;
}

/// One completed read, tagged with the slot that issued it.
#[derive(Clone, Copy, Debug)]
pub struct Completion {
    pub slot_idx: usize,
    /// Raw result: bytes read, or negative errno.
    pub result: i32,
}

/// Counters observed over one engine run.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopStats {
    pub submitted: u64,
    pub completed: u64,
}

#[derive(Debug)]
pub enum LoopError {
    Submit(io::Error),
    Poll(io::Error),
    Read { block_id: u64, errno: i32 },
    Verify { block_id: u64, slot_idx: usize },
}

impl LoopError {
    pub fn kind(&self) -> FatalKind {
        match self {
            LoopError::Submit(_) => FatalKind::Submit,
            LoopError::Poll(_) => FatalKind::Poll,
            LoopError::Read { .. } => FatalKind::Read,
            LoopError::Verify { .. } => FatalKind::Verify,
        }
    }
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::Submit(e) => write!(f, "submit failed: {e}"),
            LoopError::Poll(e) => write!(f, "completion poll failed: {e}"),
            LoopError::Read { block_id, errno } => {
                write!(f, "read of block {block_id} failed: errno {errno}")
            }
            LoopError::Verify { block_id, slot_idx } => {
                write!(f, "block {block_id} failed verification (slot {slot_idx})")
            }
        }
    }
}

impl std::error::Error for LoopError {}

/// Drive one closed-loop run: saturate the ring to full depth, then drain,
/// verify, and resubmit per completion until `num_blocks` reads have been
/// observed. Block ids are drawn uniformly with replacement; the workload is
/// steady-state random access, not a scan of every block.
///
/// Operations still in flight when the target is reached are abandoned, not
/// drained; their buffers must outlive the driver (see `engine::run_worker`).
pub fn run_closed_loop<D, R, V>(
    driver: &mut D,
    pool: &mut SlotPool,
    num_blocks: u64,
    rng: &mut R,
    mut verify: V,
) -> Result<LoopStats, LoopError>
where
    D: RingDriver,
    R: Rng,
    V: FnMut(&[u8], u64) -> bool,
{
    assert!(num_blocks > 0, "file holds no whole blocks");
    let mut stats = LoopStats::default();

    // Initial burst: one read per slot, ramping in-flight from 0 to depth.
    for idx in 0..pool.len() {
        let block_id = rng.random_range(0..num_blocks);
        pool.slot_mut(idx).set_block_id(block_id);
        driver.submit_read(idx, pool).map_err(LoopError::Submit)?;
        stats.submitted += 1;
        metrics::inc_submitted();
    }

    while stats.completed < num_blocks {
        let completion = match driver.try_complete().map_err(LoopError::Poll)? {
            Some(c) => c,
            None => {
                // Expected steady state while reads are in flight. Busy-poll
                // rather than block so scheduler latency stays out of the
                // measurement.
                metrics::inc_empty_polls();
                std::hint::spin_loop();
                continue;
            }
        };

        let slot = pool.slot(completion.slot_idx);
        let block_id = slot.block_id();
        if completion.result < 0 {
            return Err(LoopError::Read {
                block_id,
                errno: -completion.result,
            });
        }
        if !verify(slot.buf(), block_id) {
            return Err(LoopError::Verify {
                block_id,
                slot_idx: completion.slot_idx,
            });
        }
        stats.completed += 1;
        metrics::inc_completed();

        // Reuse the same slot for a fresh block; its descriptor already
        // points at the right buffer.
        let next = rng.random_range(0..num_blocks);
        pool.slot_mut(completion.slot_idx).set_block_id(next);
        driver
            .submit_read(completion.slot_idx, pool)
            .map_err(LoopError::Submit)?;
        stats.submitted += 1;
        metrics::inc_submitted();
    }

    Ok(stats)
}
