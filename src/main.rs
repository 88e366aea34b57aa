use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use ringbench::config::{BLOCK_SIZE, BenchConfig, QUEUE_DEPTH};
use ringbench::datafile;
use ringbench::engine;
use ringbench::fatal::{self, FatalKind};
use ringbench::metrics;
use ringbench::workers;

#[derive(Parser)]
#[command(about = "Closed-loop io_uring random-read benchmark")]
struct Args {
    /// Directory holding the worker data files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Per-worker file size in bytes
    #[arg(short = 's', long, default_value_t = 1 << 30)]
    file_size: u64,

    /// Number of parallel workers, one file and one ring each
    #[arg(short = 'w', long, default_value_t = 1)]
    workers: usize,

    /// Kernel-side submission queue polling (SQPOLL)
    #[arg(long)]
    sqthread_poll: bool,

    /// Pin the SQPOLL thread to a fixed CPU; needs --sqthread-poll
    #[arg(long)]
    sqthread_poll_pin: bool,

    /// Fixed seed for the random block sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Create and fill the worker data files before running
    #[arg(long)]
    prepare: bool,
}

fn main() {
    let args = Args::parse();
    metrics::spawn_reporter();

    let cfg = BenchConfig {
        sqthread_poll: args.sqthread_poll,
        sqthread_poll_pin: args.sqthread_poll_pin,
        seed: args.seed,
    };

    let num_blocks = args.file_size / BLOCK_SIZE as u64;
    if num_blocks == 0 {
        fatal::die(FatalKind::FileOpen, "file size is smaller than one block");
    }

    if args.prepare {
        for i in 0..args.workers {
            let path = datafile::worker_file_path(&args.dir, i);
            eprintln!("ringbench: preparing {} ({num_blocks} blocks)", path.display());
            if let Err(e) = datafile::prepare_file(&path, args.file_size) {
                fatal::die(FatalKind::FileOpen, &format!("{}: {e}", path.display()));
            }
        }
    }

    eprintln!(
        "ringbench: {} worker(s), {} MB/file, depth {QUEUE_DEPTH}, sqpoll={} pin={}",
        args.workers,
        args.file_size / (1024 * 1024),
        cfg.sqthread_poll,
        cfg.sqthread_poll_pin,
    );

    let dir = args.dir.clone();
    let file_size = args.file_size;
    let start = Instant::now();
    workers::run_workers(args.workers, move |i| {
        let mut wcfg = cfg;
        // Distinct stream per worker, still reproducible from one seed.
        wcfg.seed = cfg.seed.map(|s| s.wrapping_add(i as u64));
        let path = datafile::worker_file_path(&dir, i);
        engine::run_worker(&path, file_size, wcfg);
    });
    let elapsed = start.elapsed();

    let total_reads = args.workers as u64 * num_blocks;
    let total_bytes = total_reads * BLOCK_SIZE as u64;
    println!(
        "ringbench: {total_reads} reads in {:.2}s, {:.1} MB/s",
        elapsed.as_secs_f64(),
        total_bytes as f64 / (1024.0 * 1024.0) / elapsed.as_secs_f64(),
    );
}
