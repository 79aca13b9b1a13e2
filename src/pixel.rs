//! Fixed-width ARGB pixel words.
//!
//! A pixel is a plain unsigned integer with the alpha channel in the top
//! quarter and three colour channels below it:
//!
//! | word  | layout                     | alpha bytes | colour bytes |
//! |-------|----------------------------|-------------|--------------|
//! | `u32` | `0xAARRGGBB`               | 1           | 3            |
//! | `u64` | `0xAAAA_RRRR_GGGG_BBBB`    | 2           | 6            |
//!
//! The codecs only ever look at a pixel through [`PixelWord`], so the same
//! code paths serve both widths.

use core::fmt::Debug;
use core::hash::Hash;

use bytemuck::Pod;

/// An ARGB pixel word the codecs can split into alpha and colour parts.
pub trait PixelWord: Pod + Eq + Hash + Debug + Send + Sync + 'static {
    /// Size of the full word in bytes.
    const BYTES: usize;
    /// Bytes taken by the alpha channel alone.
    const ALPHA_BYTES: usize = Self::BYTES / 4;
    /// Bytes taken by the three colour channels.
    const COLOR_BYTES: usize = Self::BYTES - Self::ALPHA_BYTES;

    /// Widen to `u64` without changing the value.
    fn to_u64(self) -> u64;

    /// Narrow from `u64`; bits above the word width are discarded.
    fn from_u64(v: u64) -> Self;

    /// Alpha value, shifted down to the low bits.
    #[inline(always)]
    fn alpha(self) -> u64 {
        self.to_u64() >> (Self::COLOR_BYTES * 8)
    }

    /// Colour channels with alpha masked off.
    #[inline(always)]
    fn color(self) -> u64 {
        self.to_u64() & color_mask(Self::COLOR_BYTES)
    }

    /// Reassemble a word from an alpha value and colour bits.
    #[inline(always)]
    fn from_parts(alpha: u64, color: u64) -> Self {
        let bits = Self::COLOR_BYTES * 8;
        Self::from_u64((alpha << bits) | (color & color_mask(Self::COLOR_BYTES)))
    }

    /// Same alpha as `other`.
    #[inline(always)]
    fn same_alpha(self, other: Self) -> bool {
        self.alpha() == other.alpha()
    }

    /// Same colour channels as `other`, alpha ignored.
    #[inline(always)]
    fn same_color(self, other: Self) -> bool {
        self.color() == other.color()
    }
}

#[inline(always)]
const fn color_mask(color_bytes: usize) -> u64 {
    (1u64 << (color_bytes * 8)) - 1
}

impl PixelWord for u32 {
    const BYTES: usize = 4;

    #[inline(always)]
    fn to_u64(self) -> u64 {
        u64::from(self)
    }

    #[inline(always)]
    fn from_u64(v: u64) -> Self {
        v as u32
    }
}

impl PixelWord for u64 {
    const BYTES: usize = 8;

    #[inline(always)]
    fn to_u64(self) -> u64 {
        self
    }

    #[inline(always)]
    fn from_u64(v: u64) -> Self {
        v
    }
}

// ===========================================================================
// Little-endian byte access
// ===========================================================================

/// Append the low `n` bytes of `v` to `out`, little-endian.
#[inline]
pub(crate) fn put_le(out: &mut alloc::vec::Vec<u8>, v: u64, n: usize) {
    out.extend_from_slice(&v.to_le_bytes()[..n]);
}

/// Read `n` little-endian bytes at `pos`. `None` if the slice is too short.
#[inline]
pub(crate) fn get_le(src: &[u8], pos: usize, n: usize) -> Option<u64> {
    let bytes = src.get(pos..pos.checked_add(n)?)?;
    let mut buf = [0u8; 8];
    buf[..n].copy_from_slice(bytes);
    Some(u64::from_le_bytes(buf))
}
