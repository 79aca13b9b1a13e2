//! Whole-image import and export using [`imgref`] types.
//!
//! These work on any [`Raster`] of 32-bit ARGB words, row by row, so only
//! one row of converted pixels is held outside the bitmap at a time.
//!
//! ```rust
//! use imgref::ImgVec;
//! use rgb::Rgba;
//! use corset::{Bitmap32, Raster, img};
//!
//! let src = ImgVec::new(vec![Rgba::new(10u8, 20, 30, 255); 16 * 4], 16, 4);
//! let mut bmp = Bitmap32::new(16, 4, 0).unwrap();
//! img::load_rgba8(&mut bmp, src.as_ref()).unwrap();
//! assert_eq!(bmp.get_pixel(3, 3).unwrap(), 0xFF0A_141E);
//!
//! let back = img::to_rgba8(&mut bmp).unwrap();
//! assert_eq!(back.buf(), src.buf());
//! ```

use alloc::vec;

use imgref::{ImgRef, ImgVec};
use rgb::{RGBA8, Rgba};

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::typed::{argb32_row_from_rgba8, rgba8_row_from_argb32};

/// Overwrite every pixel of `raster` with `img`. Dimensions must match.
///
/// Strided sources are fine; padding is skipped.
pub fn load_rgba8<R>(raster: &mut R, img: ImgRef<'_, RGBA8>) -> Result<()>
where
    R: Raster<Pixel = u32> + ?Sized,
{
    if img.width() != raster.width() || img.height() != raster.height() {
        return Err(Error::InvalidDimensions {
            width: img.width(),
            height: img.height(),
        });
    }
    let mut words = vec![0u32; img.width()];
    for (y, row) in img.rows().enumerate() {
        argb32_row_from_rgba8(row, &mut words);
        raster.write_span_unclipped(0, y, &words)?;
    }
    Ok(())
}

/// Decode `raster` into a tightly packed `ImgVec<Rgba<u8>>`.
pub fn to_rgba8<R>(raster: &mut R) -> Result<ImgVec<RGBA8>>
where
    R: Raster<Pixel = u32> + ?Sized,
{
    let w = raster.width();
    let h = raster.height();
    let mut dst = ImgVec::new(vec![Rgba::new(0, 0, 0, 0); w * h], w, h);
    let mut words = vec![0u32; w];
    for (y, row) in dst.rows_mut().enumerate() {
        raster.read_span_unclipped(0, y, &mut words)?;
        rgba8_row_from_argb32(&words, row);
    }
    Ok(dst)
}
