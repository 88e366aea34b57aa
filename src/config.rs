//! Benchmark sizing and run configuration.
//!
//! Hardcoded sizing lives here. Per-run options arrive via `BenchConfig`,
//! parsed by the binary and read-only for the engine.

/// Number of read operations kept in flight per worker.
pub const QUEUE_DEPTH: usize = 128;

/// Bytes per block. Block ids address the file in units of this size.
pub const BLOCK_SIZE: usize = 4096;

/// CPU the SQPOLL kernel thread is pinned to when `sqthread_poll_pin` is set.
pub const SQPOLL_CPU: u32 = 2;

/// Idle time before the SQPOLL kernel thread goes to sleep (milliseconds).
pub const SQPOLL_IDLE_MS: u32 = 2000;

// Compile-time sanity checks
const _: () = assert!(BLOCK_SIZE.is_power_of_two(), "O_DIRECT needs a power-of-two block size");
const _: () = assert!(BLOCK_SIZE % 8 == 0, "block pattern is written in 8-byte words");
const _: () = assert!(QUEUE_DEPTH > 0 && QUEUE_DEPTH <= u32::MAX as usize);

/// Per-run options, immutable once the workers start.
#[derive(Clone, Copy, Debug, Default)]
pub struct BenchConfig {
    /// Kernel-side submission queue polling (IORING_SETUP_SQPOLL).
    pub sqthread_poll: bool,
    /// Pin the SQPOLL thread to `SQPOLL_CPU` (IORING_SETUP_SQ_AFF).
    /// Only meaningful together with `sqthread_poll`.
    pub sqthread_poll_pin: bool,
    /// Fixed seed for the block-id sequence. `None` seeds from entropy.
    pub seed: Option<u64>,
}
