//! Conversions between ARGB pixel words and [`rgb`] crate pixel types.
//!
//! ```rust
//! use rgb::Rgba;
//! use corset::typed;
//!
//! let word = typed::argb32_from_rgba8(Rgba::new(0x11, 0x22, 0x33, 0xFF));
//! assert_eq!(word, 0xFF11_2233);
//! assert_eq!(typed::rgba8_from_argb32(word), Rgba::new(0x11, 0x22, 0x33, 0xFF));
//! ```

use rgb::{Rgba, RGBA8};

#[inline(always)]
fn swap_br_u32(v: u32) -> u32 {
    (v & 0xFF00_FF00) | (v.rotate_left(16) & 0x00FF_00FF)
}

/// `Rgba<u8>` → `0xAARRGGBB`.
#[inline]
pub fn argb32_from_rgba8(px: RGBA8) -> u32 {
    let bytes: [u8; 4] = bytemuck::cast(px);
    swap_br_u32(u32::from_le_bytes(bytes))
}

/// `0xAARRGGBB` → `Rgba<u8>`.
#[inline]
pub fn rgba8_from_argb32(word: u32) -> RGBA8 {
    bytemuck::cast(swap_br_u32(word).to_le_bytes())
}

/// `Rgba<u16>` → `0xAAAA_RRRR_GGGG_BBBB`.
#[inline]
pub fn argb64_from_rgba16(px: Rgba<u16>) -> u64 {
    (u64::from(px.a) << 48) | (u64::from(px.r) << 32) | (u64::from(px.g) << 16) | u64::from(px.b)
}

/// `0xAAAA_RRRR_GGGG_BBBB` → `Rgba<u16>`.
#[inline]
pub fn rgba16_from_argb64(word: u64) -> Rgba<u16> {
    Rgba::new(
        (word >> 32) as u16,
        (word >> 16) as u16,
        word as u16,
        (word >> 48) as u16,
    )
}

/// Convert a row of `Rgba<u8>` into ARGB words.
pub fn argb32_row_from_rgba8(src: &[RGBA8], dst: &mut [u32]) {
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        *d = argb32_from_rgba8(*s);
    }
}

/// Convert a row of ARGB words into `Rgba<u8>`.
pub fn rgba8_row_from_argb32(src: &[u32], dst: &mut [RGBA8]) {
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        *d = rgba8_from_argb32(*s);
    }
}
