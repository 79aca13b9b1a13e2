//! Pixel and scanline access shared by every bitmap flavour.
//!
//! Implementors supply the unclipped fast paths, where the caller guarantees
//! in-bounds coordinates (out-of-bounds input panics, like slice indexing).
//! The provided methods take signed coordinates, clip them to the bitmap and
//! substitute the background colour for anything outside it.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Result, ValidationError};
use crate::pixel::PixelWord;

/// A `width × height` grid of pixels with clipped and unclipped accessors.
pub trait Raster {
    type Pixel: PixelWord;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Colour reported for (and initially stored in) every pixel.
    fn background(&self) -> Self::Pixel;

    // -----------------------------------------------------------------------
    // Unclipped fast paths
    // -----------------------------------------------------------------------

    fn pixel_unclipped(&mut self, x: usize, y: usize) -> Result<Self::Pixel>;

    fn set_pixel_unclipped(&mut self, x: usize, y: usize, color: Self::Pixel) -> Result<()>;

    /// Copy `dest.len()` pixels starting at `(x, y)` into `dest`.
    fn read_span_unclipped(&mut self, x: usize, y: usize, dest: &mut [Self::Pixel]) -> Result<()>;

    /// Overwrite `src.len()` pixels starting at `(x, y)`.
    fn write_span_unclipped(&mut self, x: usize, y: usize, src: &[Self::Pixel]) -> Result<()>;

    /// Set `len` pixels starting at `(x, y)` to `color`.
    fn fill_span_unclipped(
        &mut self,
        x: usize,
        y: usize,
        len: usize,
        color: Self::Pixel,
    ) -> Result<()>;

    // -----------------------------------------------------------------------
    // Maintenance and accounting
    // -----------------------------------------------------------------------

    /// `full`: persist everything and repack into an exactly-sized buffer.
    /// Otherwise compact in place, and only if there are holes.
    fn optimize(&mut self, full: bool) -> Result<()>;

    /// Bytes of compressed rows currently live in the arena.
    fn compressed_size_used(&self) -> usize;

    /// Bytes the arena has reserved.
    fn compressed_size_reserved(&self) -> usize;

    /// Size of the same image stored as raw pixel words.
    fn uncompressed_size(&self) -> usize {
        self.width() * self.height() * Self::Pixel::BYTES
    }

    /// Check the arena invariants. Diagnostic; not needed in normal use.
    fn validate(&self) -> Result<(), ValidationError>;

    // -----------------------------------------------------------------------
    // Clipped accessors
    // -----------------------------------------------------------------------

    /// Pixel at `(x, y)`, or the background when outside the bitmap.
    fn get_pixel(&mut self, x: i64, y: i64) -> Result<Self::Pixel> {
        match (index(x, self.width()), index(y, self.height())) {
            (Some(x), Some(y)) => self.pixel_unclipped(x, y),
            _ => Ok(self.background()),
        }
    }

    /// Set the pixel at `(x, y)`; ignored when outside the bitmap.
    fn set_pixel(&mut self, x: i64, y: i64, color: Self::Pixel) -> Result<()> {
        match (index(x, self.width()), index(y, self.height())) {
            (Some(x), Some(y)) => self.set_pixel_unclipped(x, y, color),
            _ => Ok(()),
        }
    }

    /// Read `dest.len()` pixels from `(x, y)` rightwards. Pixels outside the
    /// bitmap read as the background.
    fn read_scanline(&mut self, x: i64, y: i64, dest: &mut [Self::Pixel]) -> Result<()> {
        let background = self.background();
        let row = index(y, self.height());
        let span = clip(x, dest.len(), self.width());
        let (Some(y), Some(span)) = (row, span) else {
            dest.fill(background);
            return Ok(());
        };
        let (before, rest) = dest.split_at_mut(span.skip);
        let (inside, after) = rest.split_at_mut(span.len);
        before.fill(background);
        after.fill(background);
        self.read_span_unclipped(span.x, y, inside)
    }

    /// Write `src` to `(x, y)` rightwards, dropping whatever falls outside.
    fn write_scanline(&mut self, x: i64, y: i64, src: &[Self::Pixel]) -> Result<()> {
        let Some(y) = index(y, self.height()) else {
            return Ok(());
        };
        match clip(x, src.len(), self.width()) {
            Some(span) => {
                self.write_span_unclipped(span.x, y, &src[span.skip..span.skip + span.len])
            }
            None => Ok(()),
        }
    }

    /// Fill `len` pixels from `(x, y)` rightwards, clipped to the bitmap.
    fn fill_scanline(&mut self, x: i64, y: i64, len: usize, color: Self::Pixel) -> Result<()> {
        let Some(y) = index(y, self.height()) else {
            return Ok(());
        };
        match clip(x, len, self.width()) {
            Some(span) => self.fill_span_unclipped(span.x, y, span.len, color),
            None => Ok(()),
        }
    }

    /// Decode the whole image, row-major.
    fn to_vec(&mut self) -> Result<Vec<Self::Pixel>> {
        let (w, h) = (self.width(), self.height());
        let mut out = vec![self.background(); w * h];
        for (y, row) in out.chunks_exact_mut(w).enumerate() {
            self.read_span_unclipped(0, y, row)?;
        }
        Ok(out)
    }
}

/// The in-bounds part of a horizontal span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    /// Leading pixels of the request that fall left of the bitmap.
    skip: usize,
    /// First in-bounds column.
    x: usize,
    len: usize,
}

#[inline]
fn index(v: i64, bound: usize) -> Option<usize> {
    usize::try_from(v).ok().filter(|&v| v < bound)
}

fn clip(x: i64, len: usize, width: usize) -> Option<Span> {
    let start = i128::from(x);
    let end = start + len as i128;
    let lo = start.max(0);
    let hi = end.min(width as i128);
    if lo >= hi {
        return None;
    }
    Some(Span {
        skip: (lo - start) as usize,
        x: lo as usize,
        len: (hi - lo) as usize,
    })
}
