// ---------------------------------------------------------------------------
// Dense row codec.
//
// Run selection at each boundary `i`, relative to the pixel before it:
//   1. neither alpha nor colour repeats -> literal run up to the next spot
//                                          where 2-4 would apply
//   2. >= MIN_ALPHA_RUN same alpha      -> same-alpha run, colour payload
//   3. >= MIN_COLOR_RUN same colour     -> same-colour run, alpha payload
//   4. both repeat (exact repeat)       -> repeat run, no payload
// A same-alpha run stops at the next colour repeat, which inside it is an
// exact repeat. A same-colour run stops where MIN_ALPHA_RUN pixels would
// keep the alpha of the pixel before them. Every scan is bounded by the run
// it produces plus at most MIN_ALPHA_RUN pixels of lookahead.
// ---------------------------------------------------------------------------

use alloc::vec::Vec;

use super::{get_varint, put_varint};
use crate::error::CodecError;
use crate::pixel::{PixelWord, get_le, put_le};

/// Same-alpha pixels needed before a same-alpha run beats a literal run.
pub const MIN_ALPHA_RUN: usize = 4;

/// Same-colour pixels needed before a same-colour run beats a literal run.
pub const MIN_COLOR_RUN: usize = 2;

const SAME_ALPHA: u64 = 0b10;
const SAME_COLOR: u64 = 0b01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Repeat,
    SameAlpha,
    SameColor,
    Literal,
}

impl Kind {
    #[inline]
    fn flags(self) -> u64 {
        match self {
            Kind::Repeat => SAME_ALPHA | SAME_COLOR,
            Kind::SameAlpha => SAME_ALPHA,
            Kind::SameColor => SAME_COLOR,
            Kind::Literal => 0,
        }
    }
}

// ===========================================================================
// Encoder
// ===========================================================================

/// Append the dense encoding of `row` to `out`.
pub fn encode<P: PixelWord>(row: &[P], out: &mut Vec<u8>) {
    let Some(first) = row.first() else {
        return;
    };
    put_le(out, first.to_u64(), P::BYTES);

    let mut i = 1;
    while i < row.len() {
        let (kind, len) = next_run(row, i);
        emit(&row[i..i + len], kind, out);
        i += len;
    }
}

fn next_run<P: PixelWord>(row: &[P], i: usize) -> (Kind, usize) {
    let prev = row[i - 1];
    let repeats = row[i..].iter().take_while(|&&p| p == prev).count();
    if repeats > 0 {
        return (Kind::Repeat, repeats);
    }

    let alpha = distinct_span(row, i, usize::MAX, |p| p.same_alpha(prev));
    if alpha >= MIN_ALPHA_RUN {
        return (Kind::SameAlpha, alpha);
    }
    let color = color_span(row, i, prev);
    if color >= MIN_COLOR_RUN {
        return (Kind::SameColor, color);
    }

    let end = (i + 1..row.len())
        .find(|&j| opens_run(row, j))
        .unwrap_or(row.len());
    (Kind::Literal, end - i)
}

/// Length of the span starting at `i` (capped at `limit`) whose pixels all
/// satisfy `keep`, stopping before any pixel that repeats its predecessor.
#[inline]
fn distinct_span<P: PixelWord>(
    row: &[P],
    i: usize,
    limit: usize,
    keep: impl Fn(P) -> bool,
) -> usize {
    let mut j = i;
    while j < row.len() && j - i < limit {
        let p = row[j];
        if !keep(p) || (j > i && p == row[j - 1]) {
            break;
        }
        j += 1;
    }
    j - i
}

/// Length of the same-colour span starting at `i`, ending early where a
/// same-alpha run of `MIN_ALPHA_RUN` could begin.
#[inline]
fn color_span<P: PixelWord>(row: &[P], i: usize, prev: P) -> usize {
    let mut j = i;
    while j < row.len() && row[j].same_color(prev) && alpha_holds(row, j) < MIN_ALPHA_RUN {
        j += 1;
    }
    j - i
}

/// How many of the next `MIN_ALPHA_RUN` pixels from `j` keep the alpha of
/// `row[j - 1]`.
#[inline]
fn alpha_holds<P: PixelWord>(row: &[P], j: usize) -> usize {
    let prev = row[j - 1];
    row[j..]
        .iter()
        .take(MIN_ALPHA_RUN)
        .take_while(|p| p.same_alpha(prev))
        .count()
}

/// Whether a non-literal run could start at `j`.
#[inline]
fn opens_run<P: PixelWord>(row: &[P], j: usize) -> bool {
    let prev = row[j - 1];
    row[j] == prev
        || distinct_span(row, j, MIN_ALPHA_RUN, |p| p.same_alpha(prev)) >= MIN_ALPHA_RUN
        || distinct_span(row, j, MIN_COLOR_RUN, |p| p.same_color(prev)) >= MIN_COLOR_RUN
}

fn emit<P: PixelWord>(span: &[P], kind: Kind, out: &mut Vec<u8>) {
    put_varint(out, ((span.len() as u64) << 2) | kind.flags());
    match kind {
        Kind::Repeat => {}
        Kind::SameAlpha => {
            for p in span {
                put_le(out, p.color(), P::COLOR_BYTES);
            }
        }
        Kind::SameColor => {
            for p in span {
                put_le(out, p.alpha(), P::ALPHA_BYTES);
            }
        }
        Kind::Literal => {
            for p in span {
                put_le(out, p.to_u64(), P::BYTES);
            }
        }
    }
}

// ===========================================================================
// Decoder
// ===========================================================================

/// Decode exactly `row.len()` pixels from `src`. Returns bytes consumed.
pub fn decode<P: PixelWord>(src: &[u8], row: &mut [P]) -> Result<usize, CodecError> {
    let width = row.len();
    if width == 0 {
        return Err(CodecError::EmptyRow);
    }

    let first = get_le(src, 0, P::BYTES).ok_or(CodecError::Truncated { offset: 0 })?;
    row[0] = P::from_u64(first);
    let mut pos = P::BYTES;
    let mut x = 1;

    while x < width {
        let at = pos;
        let header = get_varint(src, &mut pos).ok_or(CodecError::Truncated { offset: at })?;
        let len = usize::try_from(header >> 2).unwrap_or(usize::MAX);
        if len == 0 {
            return Err(CodecError::EmptyRun { offset: at });
        }
        let remaining = width - x;
        if len > remaining {
            return Err(CodecError::Overrun {
                offset: at,
                len,
                remaining,
            });
        }

        let prev = row[x - 1];
        let span = &mut row[x..x + len];
        match (header & SAME_ALPHA != 0, header & SAME_COLOR != 0) {
            (true, true) => span.fill(prev),
            (true, false) => {
                for slot in span {
                    let color = read(src, &mut pos, P::COLOR_BYTES)?;
                    *slot = P::from_parts(prev.alpha(), color);
                }
            }
            (false, true) => {
                for slot in span {
                    let alpha = read(src, &mut pos, P::ALPHA_BYTES)?;
                    *slot = P::from_parts(alpha, prev.color());
                }
            }
            (false, false) => {
                for slot in span {
                    *slot = P::from_u64(read(src, &mut pos, P::BYTES)?);
                }
            }
        }
        x += len;
    }
    Ok(pos)
}

#[inline(always)]
fn read(src: &[u8], pos: &mut usize, n: usize) -> Result<u64, CodecError> {
    let v = get_le(src, *pos, n).ok_or(CodecError::Truncated { offset: *pos })?;
    *pos += n;
    Ok(v)
}
