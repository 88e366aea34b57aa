//! Library crate for ringbench: a closed-loop io_uring random-read benchmark.
//!
//! The core loop (`read_loop`) is written against the `RingDriver` trait so it
//! can be exercised with a single-threaded simulated ring; `engine` supplies
//! the io_uring driver and is what the binary's worker threads actually run.

pub mod config;
pub mod datafile;
pub mod engine;
pub mod fatal;
pub mod metrics;
pub mod read_loop;
pub mod slots;
pub mod workers;
