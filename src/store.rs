//! One arena entry per row.

use alloc::vec::Vec;

use tracing::debug;

use crate::arena::{Arena, Entry};
use crate::error::{Result, ValidationError};
use crate::options::Options;

/// The compressed rows of a bitmap and the arena that holds them.
///
/// The row table is the sole owner of every [`Entry`]; all arena calls that
/// move entries go through here and write the result straight back.
#[derive(Debug)]
pub struct RowStore {
    arena: Arena,
    rows: Vec<Entry>,
    compaction_divisor: usize,
    shrink_on_compact: bool,
}

impl RowStore {
    /// `height` rows, each starting as a copy of `initial`.
    pub fn new(height: usize, initial: &[u8], options: &Options) -> Result<Self> {
        let total = initial.len().saturating_mul(height);
        let mut arena = Arena::with_capacity(total, options)?;
        let mut rows = Vec::with_capacity(height);
        for _ in 0..height {
            let entry = arena.alloc(initial.len())?;
            arena.write(&entry, initial);
            rows.push(entry);
        }
        Ok(Self {
            arena,
            rows,
            compaction_divisor: options.compaction_divisor,
            shrink_on_compact: options.shrink_on_compact,
        })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Compressed bytes of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        self.arena.bytes(&self.rows[y])
    }

    /// Replace row `y` with `bytes`, compacting afterwards if fragmentation
    /// has crossed the threshold. On error the old row is untouched.
    pub fn commit(&mut self, y: usize, bytes: &[u8]) -> Result<()> {
        let entry = &mut self.rows[y];
        self.arena.resize(entry, bytes.len())?;
        self.arena.write(entry, bytes);
        if self.arena.needs_compaction(self.compaction_divisor) {
            debug!(
                row = y,
                filled = self.arena.filled(),
                fragmented = self.arena.fragmented(),
                "fragmentation over threshold"
            );
            self.arena.optimize(&mut self.rows, self.shrink_on_compact);
        }
        Ok(())
    }

    /// Full: copy every row into an exactly-sized buffer. Incremental:
    /// compact in place, only if there is fragmentation to remove.
    pub fn optimize(&mut self, full: bool) -> Result<()> {
        if full {
            self.arena.rebuild(&mut self.rows)
        } else {
            if self.arena.fragmented() > 0 {
                self.arena.optimize(&mut self.rows, true);
            }
            Ok(())
        }
    }

    /// Bytes held by live rows.
    #[inline]
    pub fn used(&self) -> usize {
        self.arena.used()
    }

    /// Bytes reserved by the arena.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.arena.capacity()
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.arena.validate(&self.rows)
    }
}
