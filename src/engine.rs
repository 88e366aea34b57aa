//! io_uring driver and the per-worker engine run.
//!
//! Each worker owns a private ring, file descriptor, and slot pool; nothing
//! is shared across workers. Errors here are the unrecoverable kind and go
//! straight through `fatal::die`.

use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

use io_uring::{IoUring, opcode, types::Fd};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{BLOCK_SIZE, BenchConfig, QUEUE_DEPTH, SQPOLL_CPU, SQPOLL_IDLE_MS};
use crate::datafile;
use crate::fatal::{self, FatalKind};
use crate::read_loop::{self, Completion, RingDriver};
use crate::slots::SlotPool;

pub struct UringDriver {
    ring: IoUring,
    fd: RawFd,
}

impl UringDriver {
    fn new(cfg: &BenchConfig, fd: RawFd) -> io::Result<Self> {
        let mut builder = IoUring::builder();
        if cfg.sqthread_poll {
            builder.setup_sqpoll(SQPOLL_IDLE_MS);
            if cfg.sqthread_poll_pin {
                builder.setup_sqpoll_cpu(SQPOLL_CPU);
            }
        }
        let ring = builder.build(QUEUE_DEPTH as u32)?;
        Ok(Self { ring, fd })
    }
}

impl RingDriver for UringDriver {
    fn submit_read(&mut self, slot_idx: usize, pool: &SlotPool) -> io::Result<()> {
        let slot = pool.slot(slot_idx);
        let sqe = opcode::Readv::new(Fd(self.fd), slot.iov(), 1)
            .offset(slot.offset())
            .build()
            .user_data(slot_idx as u64);
        // Queue the SQE, flushing to the kernel if the queue is full.
        loop {
            // SAFETY: the iovec and the buffer it references live in the
            // leaked slot pool and stay valid until the read completes.
            let pushed = unsafe { self.ring.submission().push(&sqe) };
            match pushed {
                Ok(()) => break,
                Err(_) => {
                    self.ring.submit()?;
                }
            }
        }
        // With SQPOLL this only wakes the kernel poller when it is idle;
        // otherwise it hands the SQE over.
        self.ring.submit()?;
        Ok(())
    }

    fn try_complete(&mut self) -> io::Result<Option<Completion>> {
        // Consuming the CQE releases it back to the completion ring.
        Ok(self.ring.completion().next().map(|cqe| Completion {
            slot_idx: cqe.user_data() as usize,
            result: cqe.result(),
        }))
    }
}

/// One full engine run: open the file O_DIRECT, build the ring, and drive the
/// closed loop until `file_size / BLOCK_SIZE` reads have been verified.
pub fn run_worker(path: &Path, file_size: u64, cfg: BenchConfig) {
    let num_blocks = file_size / BLOCK_SIZE as u64;
    if num_blocks == 0 {
        fatal::die(
            FatalKind::FileOpen,
            &format!("{}: smaller than one block", path.display()),
        );
    }

    let file = match std::fs::OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_DIRECT)
        .open(path)
    {
        Ok(f) => f,
        Err(e) => fatal::die(FatalKind::FileOpen, &format!("{}: {e}", path.display())),
    };

    let mut driver = match UringDriver::new(&cfg, file.as_raw_fd()) {
        Ok(d) => d,
        Err(e) => fatal::die(FatalKind::RingSetup, &e.to_string()),
    };

    // Leaked on purpose: reads still in flight at loop exit are abandoned,
    // not drained, so the kernel may write into these buffers after the
    // worker returns.
    let pool: &'static mut SlotPool = Box::leak(Box::new(SlotPool::new()));

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if let Err(e) =
        read_loop::run_closed_loop(&mut driver, pool, num_blocks, &mut rng, datafile::check_block)
    {
        fatal::die(e.kind(), &e.to_string());
    }
}
