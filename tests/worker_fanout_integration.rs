//! Fan-out contract: N workers, each scanning its own prepared file; total
//! verified blocks across workers equals N times the per-file block count.

use std::fs::File;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ringbench::config::BLOCK_SIZE;
use ringbench::datafile;
use ringbench::workers;

#[test]
fn four_workers_verify_four_files() {
    let dir = std::env::temp_dir().join(format!("ringbench-fanout-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    const NUM_WORKERS: usize = 4;
    const NUM_BLOCKS: u64 = 32;
    let file_size = NUM_BLOCKS * BLOCK_SIZE as u64;
    for i in 0..NUM_WORKERS {
        datafile::prepare_file(&datafile::worker_file_path(&dir, i), file_size).unwrap();
    }

    let verified = Arc::new(AtomicU64::new(0));
    let verified2 = Arc::clone(&verified);
    let dir2 = dir.clone();
    workers::run_workers(NUM_WORKERS, move |i| {
        let path = datafile::worker_file_path(&dir2, i);
        let mut file = File::open(&path).unwrap();
        let mut buf = vec![0u8; BLOCK_SIZE];
        for block_id in 0..NUM_BLOCKS {
            file.read_exact(&mut buf).unwrap();
            assert!(datafile::check_block(&buf, block_id));
            verified2.fetch_add(1, Ordering::SeqCst);
        }
    });

    assert_eq!(
        verified.load(Ordering::SeqCst),
        NUM_WORKERS as u64 * NUM_BLOCKS
    );

    std::fs::remove_dir_all(&dir).unwrap();
}
