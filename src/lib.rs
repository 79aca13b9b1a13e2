//! # corset
//!
//! *Squeeze your pixels.*
//!
//! A bitmap that keeps every row run-length compressed inside one private,
//! compacting byte arena, and decodes exactly one row at a time for fast
//! pixel access. A 1920×1080 solid image costs a few bytes per row instead of
//! eight megabytes.
//!
//! ## Layers
//!
//! - [`arena`]: bump allocator over a single `Vec<u8>` with hole accounting
//!   and compaction. Hands out non-`Clone` [`Entry`] handles.
//! - [`codec`]: the [`Dense`] alpha/colour run codec and the [`Sparse`]
//!   run-list codec, both behind [`RowCodec`].
//! - [`CompressedBitmap`]: one decoded row in front of the compressed rows,
//!   written back when another row is touched.
//! - [`SparseBitmap`]: rows that stay as run lists and are spliced in place.
//! - [`Raster`]: the clipped pixel/scanline API both bitmaps share.
//!
//! Pixels are ARGB words, `u32` (`0xAARRGGBB`) or `u64` (16 bits per
//! channel); see [`PixelWord`].
//!
//! ## Feature flags
//!
//! - **`std`** (default): `std` support in the error and logging crates.
//! - **`rgb`**: conversions between pixel words and [`rgb`] crate types.
//! - **`imgref`**: load and export whole [`imgref`] images. Implies `rgb`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod arena;
pub mod codec;

mod bitmap;
mod cache;
mod error;
mod options;
mod pixel;
mod raster;
mod sparse;
mod store;

pub use arena::{Arena, Entry};
pub use bitmap::{Bitmap32, Bitmap64, CompressedBitmap};
pub use cache::RowCache;
pub use codec::{Dense, RowCodec, Sparse};
pub use error::{CodecError, Error, Result, ValidationError};
pub use options::Options;
pub use pixel::PixelWord;
pub use raster::Raster;
pub use sparse::SparseBitmap;
pub use store::RowStore;

#[cfg(feature = "rgb")]
pub mod typed;

#[cfg(feature = "imgref")]
pub mod img;
