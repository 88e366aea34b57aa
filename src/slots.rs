//! Fixed pool of in-flight read request slots.
//!
//! One slot per concurrent operation, allocated once for the whole engine run.
//! Buffers are only ever overwritten in place, and each slot's iovec
//! descriptor references that slot's own buffer for the pool's lifetime.

use crate::config::{BLOCK_SIZE, QUEUE_DEPTH};

/// Block-aligned buffer; O_DIRECT requires block-aligned reads.
#[repr(C, align(4096))]
struct Block([u8; BLOCK_SIZE]);

const _: () = assert!(
    std::mem::align_of::<Block>() >= BLOCK_SIZE,
    "buffer alignment must cover the block size"
);

/// One in-flight read request: the block id being read, the iovec handed to
/// the kernel, and the buffer the iovec points at.
#[repr(C)]
pub struct ReadSlot {
    block_id: u64,
    iov: libc::iovec,
    buf: Block,
}

impl ReadSlot {
    pub fn block_id(&self) -> u64 {
        self.block_id
    }

    /// Reassign the slot to a new block. Only valid while the slot is idle.
    pub fn set_block_id(&mut self, block_id: u64) {
        self.block_id = block_id;
    }

    /// Byte offset of the slot's current block within the file.
    pub fn offset(&self) -> u64 {
        self.block_id * BLOCK_SIZE as u64
    }

    pub fn buf(&self) -> &[u8] {
        &self.buf.0
    }

    pub fn iov(&self) -> *const libc::iovec {
        &self.iov
    }
}

/// Contiguous slot array. Slot addresses are stable once constructed: the
/// slots live in a boxed slice that is never reallocated.
pub struct SlotPool {
    slots: Box<[ReadSlot]>,
}

impl SlotPool {
    pub fn new() -> Self {
        Self::with_depth(QUEUE_DEPTH)
    }

    pub fn with_depth(depth: usize) -> Self {
        let mut slots = Vec::with_capacity(depth);
        for _ in 0..depth {
            slots.push(ReadSlot {
                block_id: 0,
                iov: libc::iovec {
                    iov_base: std::ptr::null_mut(),
                    iov_len: 0,
                },
                buf: Block([0u8; BLOCK_SIZE]),
            });
        }
        let mut slots = slots.into_boxed_slice();
        // Wire each descriptor to its own buffer. The heap allocation does
        // not move even when the pool itself does.
        for slot in slots.iter_mut() {
            slot.iov.iov_base = slot.buf.0.as_mut_ptr() as *mut libc::c_void;
            slot.iov.iov_len = BLOCK_SIZE;
        }
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, idx: usize) -> &ReadSlot {
        &self.slots[idx]
    }

    pub fn slot_mut(&mut self, idx: usize) -> &mut ReadSlot {
        &mut self.slots[idx]
    }
}

impl Default for SlotPool {
    fn default() -> Self {
        Self::new()
    }
}
