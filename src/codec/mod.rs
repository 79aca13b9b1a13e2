//! Row codecs: one row of pixel words ↔ a compact byte stream.
//!
//! Two formats are provided, both implementing [`RowCodec`]:
//!
//! - [`Dense`]: literal first pixel, then runs tagged with a varint header
//!   `len << 2 | same_alpha << 1 | same_color`:
//!
//!   | same_alpha | same_color | payload per pixel            |
//!   |-----------:|-----------:|------------------------------|
//!   | 1          | 1          | none (repeat previous pixel) |
//!   | 1          | 0          | colour bytes only            |
//!   | 0          | 1          | alpha bytes only             |
//!   | 0          | 0          | full word                    |
//!
//! - [`Sparse`]: `{ color: word, len: u32 }` records summing to the width.
//!
//! All multi-byte values are little-endian. Headers are unsigned LEB128.

use alloc::vec::Vec;

use crate::error::CodecError;
use crate::pixel::PixelWord;

pub mod dense;
pub mod sparse;


pub use dense::{MIN_ALPHA_RUN, MIN_COLOR_RUN};
pub use sparse::{Run, RunIter};

/// Compresses a row of pixels and restores it exactly.
pub trait RowCodec<P: PixelWord> {
    /// Append the encoding of `row` to `out`. An empty row encodes to nothing.
    fn encode(row: &[P], out: &mut Vec<u8>);

    /// Fill all of `row` from `src`, returning the number of bytes consumed.
    fn decode(src: &[u8], row: &mut [P]) -> Result<usize, CodecError>;
}

/// Greedy alpha/colour run-length codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dense;

/// `(color, length)` run-list codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sparse;

impl<P: PixelWord> RowCodec<P> for Dense {
    #[inline]
    fn encode(row: &[P], out: &mut Vec<u8>) {
        dense::encode(row, out);
    }

    #[inline]
    fn decode(src: &[u8], row: &mut [P]) -> Result<usize, CodecError> {
        dense::decode(src, row)
    }
}

impl<P: PixelWord> RowCodec<P> for Sparse {
    fn encode(row: &[P], out: &mut Vec<u8>) {
        let mut runs = Vec::new();
        sparse::runs_from_row(row, &mut runs);
        sparse::encode_runs(&runs, out);
    }

    #[inline]
    fn decode(src: &[u8], row: &mut [P]) -> Result<usize, CodecError> {
        sparse::decode(src, row)
    }
}

// ===========================================================================
// Varint
// ===========================================================================

#[inline]
pub(crate) fn put_varint(out: &mut Vec<u8>, mut v: u64) {
    while v >= 0x80 {
        out.push((v as u8) | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
}

/// Read a varint at `*pos`, advancing it. `None` on truncation or overflow.
#[inline]
pub(crate) fn get_varint(src: &[u8], pos: &mut usize) -> Option<u64> {
    let mut v = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = *src.get(*pos)?;
        *pos += 1;
        if shift >= 64 || (shift == 63 && byte & 0x7E != 0) {
            return None;
        }
        v |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Some(v);
        }
        shift += 7;
    }
}
