//! Worker data files: naming, provisioning, and the block-content check.
//!
//! Every 8-byte word of block `b` holds little-endian `b`, so a block read
//! back from anywhere in the file identifies itself.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::BLOCK_SIZE;

/// File read by worker `index`. Workers never share a file.
pub fn worker_file_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("ringbench-worker-{index}.dat"))
}

/// Verify one block's payload against the pattern for `block_id`.
pub fn check_block(buf: &[u8], block_id: u64) -> bool {
    if buf.len() != BLOCK_SIZE {
        return false;
    }
    let want = block_id.to_le_bytes();
    buf.chunks_exact(8).all(|word| word == want)
}

/// Fill `buf` with the pattern for `block_id`.
pub fn fill_block(buf: &mut [u8], block_id: u64) {
    let want = block_id.to_le_bytes();
    for word in buf.chunks_exact_mut(8) {
        word.copy_from_slice(&want);
    }
}

/// Write a data file of patterned blocks. Bytes beyond the last whole block
/// are not written; the engine never reads them.
pub fn prepare_file(path: &Path, file_size: u64) -> io::Result<()> {
    let num_blocks = file_size / BLOCK_SIZE as u64;
    let mut out = BufWriter::new(File::create(path)?);
    let mut block = vec![0u8; BLOCK_SIZE];
    for block_id in 0..num_blocks {
        fill_block(&mut block, block_id);
        out.write_all(&block)?;
    }
    out.flush()
}
