//! Single-slot write-back cache over a [`RowStore`].
//!
//! At most one row is held raw. Switching rows flushes the current one
//! (re-encode, commit) before decoding the next.

use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use tracing::{trace, warn};

use crate::codec::RowCodec;
use crate::error::{CodecError, Error, Result};
use crate::pixel::PixelWord;
use crate::store::RowStore;

/// Keeps one decoded row in front of a store of compressed rows.
#[derive(Debug)]
pub struct RowCache<P: PixelWord, C: RowCodec<P>> {
    store: RowStore,
    raw: Vec<P>,
    active: Option<usize>,
    dirty: bool,
    staging: Vec<u8>,
    _codec: PhantomData<C>,
}

impl<P: PixelWord, C: RowCodec<P>> RowCache<P, C> {
    /// Wrap `store`, whose rows must each decode to `width` pixels.
    pub fn new(store: RowStore, width: usize) -> Self {
        Self {
            store,
            raw: vec![P::from_u64(0); width],
            active: None,
            dirty: false,
            staging: Vec::new(),
            _codec: PhantomData,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    #[inline]
    pub fn store(&self) -> &RowStore {
        &self.store
    }

    /// Make row `y` the raw row and return it for reading.
    pub fn row(&mut self, y: usize) -> Result<&[P]> {
        self.activate(y)?;
        Ok(&self.raw)
    }

    /// Make row `y` the raw row and return it for writing. The row is
    /// re-encoded when another row is activated or on [`flush`](Self::flush).
    pub fn row_mut(&mut self, y: usize) -> Result<&mut [P]> {
        self.activate(y)?;
        self.dirty = true;
        Ok(&mut self.raw)
    }

    /// Ensure row `y` is the raw row.
    pub fn activate(&mut self, y: usize) -> Result<()> {
        if self.active == Some(y) {
            return Ok(());
        }
        self.flush()?;
        self.load(y)
    }

    /// Persist the raw row if it has changed. The row stays active. On
    /// error the raw row is still authoritative and still dirty.
    pub fn flush(&mut self) -> Result<()> {
        let Some(y) = self.active else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        self.staging.clear();
        C::encode(&self.raw, &mut self.staging);
        self.store.commit(y, &self.staging)?;
        self.dirty = false;
        trace!(row = y, bytes = self.staging.len(), "flushed row");
        Ok(())
    }

    /// Flush, then let the store compact or rebuild.
    pub fn optimize(&mut self, full: bool) -> Result<()> {
        self.flush()?;
        self.store.optimize(full)
    }

    fn load(&mut self, y: usize) -> Result<()> {
        self.active = None;
        self.dirty = false;
        let src = self.store.row(y);
        let stored = src.len();
        let consumed =
            C::decode(src, &mut self.raw).map_err(|source| Error::CorruptRow { row: y, source })?;
        if consumed != stored {
            warn!(row = y, consumed, stored, "row length mismatch");
            return Err(Error::CorruptRow {
                row: y,
                source: CodecError::LengthMismatch { consumed, stored },
            });
        }
        self.active = Some(y);
        trace!(row = y, "activated row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Dense, Sparse};
    use crate::options::Options;

    fn cache<C: RowCodec<u32>>(width: usize, height: usize, bg: u32) -> RowCache<u32, C> {
        let mut initial = Vec::new();
        C::encode(&vec![bg; width], &mut initial);
        let store = RowStore::new(height, &initial, &Options::new()).unwrap();
        RowCache::new(store, width)
    }

    #[test]
    fn activation_is_lazy() {
        let mut c = cache::<Dense>(8, 4, 7);
        assert_eq!(c.active(), None);
        assert_eq!(c.row(2).unwrap(), [7; 8]);
        assert_eq!(c.active(), Some(2));
    }

    #[test]
    fn writes_survive_row_switches() {
        let mut c = cache::<Dense>(8, 4, 0xFF00_0000);
        c.row_mut(1).unwrap()[3] = 0xFFAA_BBCC;
        c.row(0).unwrap();
        c.row(3).unwrap();
        let row = c.row(1).unwrap();
        assert_eq!(row[3], 0xFFAA_BBCC);
        assert_eq!(row[2], 0xFF00_0000);
        c.store().validate().unwrap();
    }

    #[test]
    fn read_only_visits_do_not_rewrite() {
        let mut c = cache::<Dense>(16, 3, 1);
        c.row(0).unwrap();
        c.row(1).unwrap();
        c.row(2).unwrap();
        assert_eq!(c.store().arena().fragmented(), 0);
        assert_eq!(c.store().used(), 3 * c.store().row(0).len());
    }

    #[test]
    fn flush_keeps_row_active() {
        let mut c = cache::<Sparse>(4, 2, 5);
        c.row_mut(0).unwrap().copy_from_slice(&[1, 2, 2, 3]);
        c.flush().unwrap();
        assert_eq!(c.active(), Some(0));
        // three runs
        assert_eq!(c.store().row(0).len(), 3 * 8);
        assert_eq!(c.row(0).unwrap(), [1, 2, 2, 3]);
    }

    #[test]
    fn failed_flush_keeps_dirty_row() {
        let mut initial = Vec::new();
        Dense::encode(&[0u32; 64], &mut initial);
        let opts = Options::new().max_capacity(initial.len() * 2);
        let store = RowStore::new(2, &initial, &opts).unwrap();
        let mut c: RowCache<u32, Dense> = RowCache::new(store, 64);

        let noisy: Vec<u32> = (0..64).map(|i| i * 0x0101_0101).collect();
        c.row_mut(0).unwrap().copy_from_slice(&noisy);
        assert!(matches!(c.activate(1), Err(Error::OutOfMemory { .. })));
        assert_eq!(c.active(), Some(0));
        assert_eq!(c.row(0).unwrap(), &noisy[..]);
        // Row 1 was never touched.
        assert_eq!(c.store().row(1), &initial[..]);
    }

    #[test]
    fn corrupt_row_is_reported() {
        let store = RowStore::new(1, &[1, 2], &Options::new()).unwrap();
        let mut c: RowCache<u32, Dense> = RowCache::new(store, 4);
        assert!(matches!(
            c.activate(0),
            Err(Error::CorruptRow {
                row: 0,
                source: CodecError::Truncated { offset: 0 }
            })
        ));
        assert_eq!(c.active(), None);
    }
}
