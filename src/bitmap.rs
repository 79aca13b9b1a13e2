//! Row-compressed bitmap with one decoded row.
//!
//! ```rust
//! use corset::{CompressedBitmap, Raster};
//!
//! let mut bmp: CompressedBitmap = CompressedBitmap::new(1920, 1080, 0xFF00_0000).unwrap();
//! bmp.fill_scanline(100, 10, 50, 0xFFFF_FFFF).unwrap();
//! assert_eq!(bmp.get_pixel(120, 10).unwrap(), 0xFFFF_FFFF);
//! assert!(bmp.compressed_size_used() < bmp.uncompressed_size() / 100);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::cache::RowCache;
use crate::codec::{Dense, RowCodec};
use crate::error::{Error, Result, ValidationError};
use crate::options::Options;
use crate::pixel::PixelWord;
use crate::raster::Raster;
use crate::store::RowStore;

/// A bitmap whose rows live compressed in an arena, with a single row
/// decoded at a time.
///
/// Access patterns that touch many pixels of one row before moving on cost
/// one decode (and, after writes, one encode) per row switch.
#[derive(Debug)]
pub struct CompressedBitmap<P: PixelWord = u32, C: RowCodec<P> = Dense> {
    cache: RowCache<P, C>,
    background: P,
}

/// 32-bit ARGB, dense codec.
pub type Bitmap32 = CompressedBitmap<u32, Dense>;
/// 64-bit ARGB, dense codec.
pub type Bitmap64 = CompressedBitmap<u64, Dense>;

impl<P: PixelWord, C: RowCodec<P>> CompressedBitmap<P, C> {
    /// A `width × height` bitmap filled with `background`.
    pub fn new(width: usize, height: usize, background: P) -> Result<Self> {
        Self::with_options(width, height, background, Options::default())
    }

    pub fn with_options(
        width: usize,
        height: usize,
        background: P,
        options: Options,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let mut initial = Vec::new();
        C::encode(&vec![background; width], &mut initial);
        let store = RowStore::new(height, &initial, &options)?;
        Ok(Self {
            cache: RowCache::new(store, width),
            background,
        })
    }

    /// Row currently held decoded, if any.
    #[inline]
    pub fn active_row(&self) -> Option<usize> {
        self.cache.active()
    }

    /// Encode the active row back into the arena if it has changed.
    pub fn flush(&mut self) -> Result<()> {
        self.cache.flush()
    }

    /// Bytes held by the decoded row buffer.
    #[inline]
    pub fn scratch_size(&self) -> usize {
        self.cache.width() * P::BYTES
    }

    /// Whole row `y`. Decodes it if it is not already active.
    pub fn row(&mut self, y: usize) -> Result<&[P]> {
        self.cache.row(y)
    }

    /// Whole row `y` for in-place editing.
    pub fn row_mut(&mut self, y: usize) -> Result<&mut [P]> {
        self.cache.row_mut(y)
    }
}

impl<P: PixelWord, C: RowCodec<P>> Raster for CompressedBitmap<P, C> {
    type Pixel = P;

    #[inline]
    fn width(&self) -> usize {
        self.cache.width()
    }

    #[inline]
    fn height(&self) -> usize {
        self.cache.store().height()
    }

    #[inline]
    fn background(&self) -> P {
        self.background
    }

    #[inline]
    fn pixel_unclipped(&mut self, x: usize, y: usize) -> Result<P> {
        Ok(self.cache.row(y)?[x])
    }

    #[inline]
    fn set_pixel_unclipped(&mut self, x: usize, y: usize, color: P) -> Result<()> {
        self.cache.row_mut(y)?[x] = color;
        Ok(())
    }

    fn read_span_unclipped(&mut self, x: usize, y: usize, dest: &mut [P]) -> Result<()> {
        let row = self.cache.row(y)?;
        dest.copy_from_slice(&row[x..x + dest.len()]);
        Ok(())
    }

    fn write_span_unclipped(&mut self, x: usize, y: usize, src: &[P]) -> Result<()> {
        let row = self.cache.row_mut(y)?;
        row[x..x + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn fill_span_unclipped(&mut self, x: usize, y: usize, len: usize, color: P) -> Result<()> {
        let row = self.cache.row_mut(y)?;
        row[x..x + len].fill(color);
        Ok(())
    }

    fn optimize(&mut self, full: bool) -> Result<()> {
        self.cache.optimize(full)
    }

    #[inline]
    fn compressed_size_used(&self) -> usize {
        self.cache.store().used()
    }

    #[inline]
    fn compressed_size_reserved(&self) -> usize {
        self.cache.store().reserved()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.cache.store().validate()
    }
}
