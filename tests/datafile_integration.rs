//! Provision a data file on disk and verify every block reads back with the
//! expected pattern, using plain buffered reads (no io_uring required).

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use ringbench::config::BLOCK_SIZE;
use ringbench::datafile;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ringbench-test-{}-{name}", std::process::id()))
}

#[test]
fn prepared_file_verifies_block_by_block() {
    let path = temp_path("roundtrip.dat");
    let num_blocks = 64u64;
    let file_size = num_blocks * BLOCK_SIZE as u64;
    datafile::prepare_file(&path, file_size).unwrap();

    let mut file = File::open(&path).unwrap();
    let mut buf = vec![0u8; BLOCK_SIZE];
    for block_id in 0..num_blocks {
        file.read_exact(&mut buf).unwrap();
        assert!(
            datafile::check_block(&buf, block_id),
            "block {block_id} mismatch"
        );
    }
    assert_eq!(file.metadata().unwrap().len(), file_size);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn trailing_partial_block_is_not_written() {
    let path = temp_path("partial.dat");
    let file_size = 4 * BLOCK_SIZE as u64 + 123;
    datafile::prepare_file(&path, file_size).unwrap();

    assert_eq!(
        std::fs::metadata(&path).unwrap().len(),
        4 * BLOCK_SIZE as u64
    );

    std::fs::remove_file(&path).unwrap();
}
