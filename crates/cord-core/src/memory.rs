//! Pool allocator.
//!
//! Allocates fixed-layout byte slots out of ~128 KiB pools. Each pool tracks a free
//! list and a bump cursor for never-allocated bytes; allocation walks pools
//! newest-first, first-fit over the free list, falling back to the bump cursor and
//! finally to a brand new pool.
//!
//! This is a standalone component: it is not wired into the value graph or the
//! rendering path. The value graph is reference-counted with `Rc` (see
//! `cord-runtime`), which already gives every value aliasing through
//! reference-counted handles only, without re-implementing reference counting
//! by hand, and `to_source` builds `String`s directly rather than allocating
//! through a pool.

use std::cell::RefCell;

/// Default pool size: 128 KiB.
pub const POOL_SIZE: usize = 128 * 1024;

fn align_up(size: usize, align: usize) -> usize {
    (size + align - 1) & !(align - 1)
}

#[derive(Debug, Clone, Copy)]
struct FreeBlock {
    offset: usize,
    len: usize,
}

struct Pool {
    buffer: Box<[u8]>,
    bump: usize,
    free: Vec<FreeBlock>,
    live: usize,
}

impl Pool {
    fn new(size: usize) -> Self {
        Pool {
            buffer: vec![0u8; size].into_boxed_slice(),
            bump: 0,
            free: Vec::new(),
            live: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// First-fit search of the free list, falling back to the bump cursor.
    fn try_allocate(&mut self, size: usize) -> Option<usize> {
        if let Some(index) = self.free.iter().position(|block| block.len >= size) {
            let block = self.free.remove(index);
            if block.len > size {
                // Split the remainder back into the free list.
                self.free.push(FreeBlock {
                    offset: block.offset + size,
                    len: block.len - size,
                });
            }
            self.live += 1;
            return Some(block.offset);
        }
        if self.capacity() - self.bump >= size {
            let offset = self.bump;
            self.bump += size;
            self.live += 1;
            return Some(offset);
        }
        None
    }

    fn deallocate(&mut self, offset: usize, len: usize) {
        self.free.push(FreeBlock { offset, len });
        self.live = self.live.saturating_sub(1);
    }
}

/// A handle identifying a single allocation: which pool it lives in, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pool_index: usize,
    offset: usize,
    len: usize,
}

/// Arena-style allocator built from a growing list of fixed-size pools.
///
/// `MemoryManager` is `!Sync` by design: each `Context`/`Runtime` owns one and the
/// interpreter is single-threaded.
pub struct MemoryManager {
    // `None` marks a tombstoned slot: releasing a middle pool clears its entry
    // rather than removing it, so every outstanding `Allocation::pool_index`
    // stays valid.
    pools: RefCell<Vec<Option<Pool>>>,
    pool_size: usize,
}

impl Default for MemoryManager {
    fn default() -> Self {
        MemoryManager::new()
    }
}

impl MemoryManager {
    pub fn new() -> Self {
        MemoryManager::with_pool_size(POOL_SIZE)
    }

    pub fn with_pool_size(pool_size: usize) -> Self {
        MemoryManager {
            pools: RefCell::new(Vec::new()),
            pool_size,
        }
    }

    /// Allocate `size` bytes, rounded up to 8-byte alignment, and return a handle to
    /// the byte range plus a mutable view of it: round up, walk pools newest-first
    /// first-fit, bump, or grow.
    pub fn allocate(&self, size: usize) -> Allocation {
        let size = align_up(size.max(1), 8);
        let mut pools = self.pools.borrow_mut();

        for (index, slot) in pools.iter_mut().enumerate().rev() {
            if let Some(pool) = slot {
                if let Some(offset) = pool.try_allocate(size) {
                    return Allocation {
                        pool_index: index,
                        offset,
                        len: size,
                    };
                }
            }
        }

        let mut new_pool = Pool::new(self.pool_size.max(size));
        let offset = new_pool
            .try_allocate(size)
            .expect("freshly created pool must fit its own first allocation");

        // Reuse a tombstoned slot before growing the pool list, so released
        // middle pools don't leave the vector growing unbounded.
        if let Some(index) = pools.iter().position(|slot| slot.is_none()) {
            pools[index] = Some(new_pool);
            Allocation {
                pool_index: index,
                offset,
                len: size,
            }
        } else {
            pools.push(Some(new_pool));
            Allocation {
                pool_index: pools.len() - 1,
                offset,
                len: size,
            }
        }
    }

    /// Return the bytes backing `allocation` to its owning pool's free list. If the
    /// pool is now wholly free and is not the first or last pool in the list, the
    /// pool's slot is tombstoned (not removed), so other allocations' `pool_index`
    /// handles stay valid.
    pub fn deallocate(&self, allocation: Allocation) {
        let mut pools = self.pools.borrow_mut();
        if let Some(Some(pool)) = pools.get_mut(allocation.pool_index) {
            pool.deallocate(allocation.offset, allocation.len);
        }

        let last = pools.len().saturating_sub(1);
        if allocation.pool_index != 0 && allocation.pool_index != last {
            let is_empty = matches!(&pools[allocation.pool_index], Some(pool) if pool.is_empty());
            if is_empty {
                pools[allocation.pool_index] = None;
            }
        }
    }

    /// Write `bytes` into the slot described by `allocation`.
    pub fn write(&self, allocation: Allocation, bytes: &[u8]) {
        let mut pools = self.pools.borrow_mut();
        let pool = pools[allocation.pool_index]
            .as_mut()
            .expect("allocation must reference a live pool slot");
        let end = allocation.offset + bytes.len().min(allocation.len);
        pool.buffer[allocation.offset..end].copy_from_slice(&bytes[..end - allocation.offset]);
    }

    /// Read back the bytes written into `allocation`.
    pub fn read(&self, allocation: Allocation) -> Vec<u8> {
        let pools = self.pools.borrow();
        let pool = pools[allocation.pool_index]
            .as_ref()
            .expect("allocation must reference a live pool slot");
        pool.buffer[allocation.offset..allocation.offset + allocation.len].to_vec()
    }

    /// Number of live (non-tombstoned) pools currently held. Exposed for tests
    /// and diagnostics.
    pub fn pool_count(&self) -> usize {
        self.pools.borrow().iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_deallocate_roundtrip() {
        let mgr = MemoryManager::new();
        let a = mgr.allocate(32);
        mgr.write(a, b"hello world, this fits in 32B!!");
        assert_eq!(&mgr.read(a)[..11], b"hello world");
        mgr.deallocate(a);
    }

    #[test]
    fn allocation_grows_a_new_pool_when_full() {
        let mgr = MemoryManager::with_pool_size(64);
        let a = mgr.allocate(32);
        let _b = mgr.allocate(32);
        assert_eq!(mgr.pool_count(), 1);
        // This no longer fits in the first pool's bump region; a new pool is grown.
        let _c = mgr.allocate(32);
        assert_eq!(mgr.pool_count(), 2);
        mgr.deallocate(a);
    }

    #[test]
    fn freeing_a_middle_pool_releases_it() {
        let mgr = MemoryManager::with_pool_size(16);
        let a = mgr.allocate(16); // pool 0
        let b = mgr.allocate(16); // pool 1
        let c = mgr.allocate(16); // pool 2
        assert_eq!(mgr.pool_count(), 3);
        mgr.deallocate(b);
        // pool 1 (neither head nor tail) became wholly free and is released.
        assert_eq!(mgr.pool_count(), 2);
        mgr.deallocate(a);
        mgr.deallocate(c);
    }

    #[test]
    fn first_fit_reuses_a_freed_slot() {
        let mgr = MemoryManager::with_pool_size(1024);
        let a = mgr.allocate(64);
        mgr.deallocate(a);
        let b = mgr.allocate(32);
        // The freed 64-byte block should be reused rather than bumping further.
        assert_eq!(mgr.pool_count(), 1);
        mgr.deallocate(b);
    }
}
