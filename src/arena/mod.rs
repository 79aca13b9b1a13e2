// ---------------------------------------------------------------------------
// Bump arena with lazy compaction.
//
// Layout: one Vec<u8> whose length is the arena capacity. Bytes [0, filled)
// are in use or are holes left by non-tail frees (counted in `fragmented`).
// Entries are handed out as non-Clone values; every call that can move an
// entry takes it by &mut or by value so the owner's slot is the only copy.
// ---------------------------------------------------------------------------

use alloc::vec::Vec;
use core::ops::Range;

use tracing::{debug, trace};

use crate::error::{Error, Result, ValidationError};
use crate::options::Options;


/// A byte range inside an [`Arena`].
///
/// Not `Clone`: the only copy lives wherever the arena's caller keeps it, and
/// [`Arena::resize`] / [`Arena::optimize`] rewrite that copy in place.
#[derive(Debug, PartialEq, Eq)]
pub struct Entry {
    offset: usize,
    len: usize,
    epoch: u32,
}

impl Entry {
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    #[inline]
    fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Growable byte heap with bump allocation, hole accounting and compaction.
#[derive(Debug)]
pub struct Arena {
    buf: Vec<u8>,
    filled: usize,
    fragmented: usize,
    epoch: u32,
    growth_base: usize,
    max_capacity: usize,
}

impl Arena {
    /// An empty arena. Nothing is reserved until the first allocation.
    pub fn new(options: &Options) -> Self {
        Self {
            buf: Vec::new(),
            filled: 0,
            fragmented: 0,
            epoch: 0,
            growth_base: options.growth_base.max(1),
            max_capacity: options.max_capacity,
        }
    }

    /// An empty arena with exactly `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize, options: &Options) -> Result<Self> {
        let mut arena = Self::new(options);
        if capacity > arena.max_capacity {
            return Err(arena.out_of_memory(capacity));
        }
        arena
            .buf
            .try_reserve_exact(capacity)
            .map_err(|_| arena.out_of_memory(capacity))?;
        arena.buf.resize(capacity, 0);
        Ok(arena)
    }

    /// Bytes reserved by the backing buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// High-water mark of allocated bytes, holes included.
    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Bytes below `filled` that belong to freed entries.
    #[inline]
    pub fn fragmented(&self) -> usize {
        self.fragmented
    }

    /// Bytes held by live entries.
    #[inline]
    pub fn used(&self) -> usize {
        self.filled - self.fragmented
    }

    /// Current compaction epoch. Entries from older epochs are stale.
    #[inline]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// `fragmented > filled / divisor`.
    #[inline]
    pub fn needs_compaction(&self, divisor: usize) -> bool {
        self.fragmented > self.filled / divisor.max(1)
    }

    // =======================================================================
    // Allocation
    // =======================================================================

    /// Bump-allocate `size` bytes at the current tail.
    pub fn alloc(&mut self, size: usize) -> Result<Entry> {
        self.reserve(size)?;
        let entry = Entry {
            offset: self.filled,
            len: size,
            epoch: self.epoch,
        };
        self.filled += size;
        Ok(entry)
    }

    /// Release an entry. Tail entries give their bytes back; interior entries
    /// leave a hole until the next compaction.
    ///
    /// A tail free only gives back the entry's own bytes. Holes that end up
    /// at the tail afterwards stay counted in `fragmented`; only
    /// [`optimize`](Self::optimize) or [`rebuild`](Self::rebuild) reclaims
    /// them.
    pub fn free(&mut self, entry: Entry) {
        self.check(&entry);
        if entry.end() == self.filled {
            self.filled -= entry.len;
        } else {
            self.fragmented += entry.len;
        }
        self.reset_if_garbage();
    }

    /// Change the length of `entry`, possibly moving it. The caller's entry
    /// is updated in place; on error it is left untouched.
    pub fn resize(&mut self, entry: &mut Entry, new_len: usize) -> Result<()> {
        self.check(entry);
        if new_len == entry.len {
            return Ok(());
        }

        if new_len > entry.len {
            let extra = new_len - entry.len;
            if entry.end() == self.filled {
                self.reserve(extra)?;
                self.filled += extra;
                entry.len = new_len;
            } else {
                let fresh = self.alloc(new_len)?;
                self.buf.copy_within(entry.range(), fresh.offset);
                let old = core::mem::replace(entry, fresh);
                self.free(old);
            }
        } else {
            let released = entry.len - new_len;
            if entry.end() == self.filled {
                self.filled -= released;
            } else {
                self.fragmented += released;
            }
            entry.len = new_len;
            self.reset_if_garbage();
        }
        Ok(())
    }

    // =======================================================================
    // Access
    // =======================================================================

    /// The bytes named by `entry`.
    #[inline]
    pub fn bytes(&self, entry: &Entry) -> &[u8] {
        self.check(entry);
        &self.buf[entry.range()]
    }

    /// Mutable view of the bytes named by `entry`.
    #[inline]
    pub fn bytes_mut(&mut self, entry: &Entry) -> &mut [u8] {
        self.check(entry);
        &mut self.buf[entry.range()]
    }

    /// Overwrite the whole entry. Panics if `src.len() != entry.len()`.
    #[inline]
    pub fn write(&mut self, entry: &Entry, src: &[u8]) {
        self.bytes_mut(entry).copy_from_slice(src);
    }

    // =======================================================================
    // Compaction
    // =======================================================================

    /// Slide `entries` down to close every hole, then optionally shrink the
    /// backing buffer to the smallest growth step that still fits.
    ///
    /// Entries not passed in are discarded. All passed entries are rewritten
    /// with their new offsets and the arena's new epoch.
    pub fn optimize(&mut self, entries: &mut [Entry], shrink_backing: bool) {
        for e in entries.iter() {
            self.check(e);
        }
        let before = (self.filled, self.fragmented);
        let epoch = self.epoch.wrapping_add(1);

        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_unstable_by_key(|&i| entries[i].offset);

        // Sorted ascending and only ever moving down, so a low-to-high pass
        // never clobbers bytes that have yet to move.
        let mut cursor = 0;
        for i in order {
            let e = &mut entries[i];
            if e.offset != cursor && e.len > 0 {
                self.buf.copy_within(e.range(), cursor);
            }
            e.offset = cursor;
            e.epoch = epoch;
            cursor += e.len;
        }

        self.filled = cursor;
        self.fragmented = 0;
        self.epoch = epoch;
        if shrink_backing {
            self.shrink_backing();
        }
        debug!(
            filled_before = before.0,
            fragmented_before = before.1,
            filled = self.filled,
            capacity = self.capacity(),
            "compacted arena"
        );
    }

    /// Copy `entries` into a new buffer of exactly their combined size.
    pub fn rebuild(&mut self, entries: &mut [Entry]) -> Result<()> {
        for e in entries.iter() {
            self.check(e);
        }
        let total: usize = entries.iter().map(Entry::len).sum();
        let mut fresh: Vec<u8> = Vec::new();
        fresh
            .try_reserve_exact(total)
            .map_err(|_| self.out_of_memory(total))?;

        let epoch = self.epoch.wrapping_add(1);
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_unstable_by_key(|&i| entries[i].offset);
        for i in order {
            let e = &mut entries[i];
            let offset = fresh.len();
            fresh.extend_from_slice(&self.buf[e.range()]);
            e.offset = offset;
            e.epoch = epoch;
        }

        debug!(from = self.capacity(), to = total, "rebuilt arena");
        self.buf = fresh;
        self.filled = total;
        self.fragmented = 0;
        self.epoch = epoch;
        Ok(())
    }

    /// Diagnostic check of every invariant over the caller's live entries.
    pub fn validate(&self, entries: &[Entry]) -> Result<(), ValidationError> {
        if self.fragmented > self.filled || self.filled > self.capacity() {
            return Err(ValidationError::Counters {
                fragmented: self.fragmented,
                filled: self.filled,
                capacity: self.capacity(),
            });
        }

        for (index, e) in entries.iter().enumerate() {
            if e.epoch != self.epoch {
                return Err(ValidationError::StaleEntry {
                    index,
                    entry: e.epoch,
                    arena: self.epoch,
                });
            }
            if e.len > 0 && e.end() > self.filled {
                return Err(ValidationError::OutOfBounds {
                    index,
                    end: e.end(),
                    filled: self.filled,
                });
            }
        }

        // Zero-length entries occupy nothing and cannot overlap.
        let mut order: Vec<usize> = (0..entries.len())
            .filter(|&i| entries[i].len > 0)
            .collect();
        order.sort_unstable_by_key(|&i| entries[i].offset);
        for pair in order.windows(2) {
            let (a, b) = (&entries[pair[0]], &entries[pair[1]]);
            if a.end() > b.offset {
                return Err(ValidationError::Overlap {
                    first: pair[0],
                    second: pair[1],
                });
            }
        }

        let live: usize = entries.iter().map(Entry::len).sum();
        if live != self.used() {
            return Err(ValidationError::SizeMismatch {
                live,
                expected: self.used(),
            });
        }
        Ok(())
    }

    // =======================================================================
    // Internals
    // =======================================================================

    #[inline]
    fn check(&self, entry: &Entry) {
        debug_assert_eq!(
            entry.epoch, self.epoch,
            "arena entry used after compaction moved it"
        );
    }

    fn reset_if_garbage(&mut self) {
        if self.fragmented == self.filled {
            self.filled = 0;
            self.fragmented = 0;
        }
    }

    /// Make room for `additional` bytes past `filled`. No state changes on
    /// failure.
    fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .filled
            .checked_add(additional)
            .ok_or_else(|| self.out_of_memory(usize::MAX))?;
        if required <= self.capacity() {
            return Ok(());
        }
        if required > self.max_capacity {
            return Err(self.out_of_memory(required));
        }

        let mut target = self.capacity().max(self.growth_base);
        while target < required {
            target = target.saturating_mul(2);
        }
        let target = target.min(self.max_capacity);

        self.buf
            .try_reserve_exact(target - self.capacity())
            .map_err(|_| self.out_of_memory(target))?;
        trace!(from = self.capacity(), to = target, "growing arena");
        self.buf.resize(target, 0);
        Ok(())
    }

    fn shrink_backing(&mut self) {
        let target = if self.filled == 0 {
            0
        } else {
            let mut target = self.growth_base;
            while target < self.filled {
                target = target.saturating_mul(2);
            }
            target.min(self.max_capacity)
        };
        if target < self.capacity() {
            trace!(from = self.capacity(), to = target, "shrinking arena");
            self.buf.truncate(target);
            self.buf.shrink_to_fit();
        }
    }

    fn out_of_memory(&self, requested: usize) -> Error {
        Error::OutOfMemory {
            requested,
            limit: self.max_capacity,
        }
    }
}
