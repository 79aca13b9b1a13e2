//! Run-list rows: `{ color, len: u32 }` records summing to the row width.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::error::CodecError;
use crate::pixel::{PixelWord, get_le, put_le};

/// A horizontal span of one colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<P> {
    pub color: P,
    pub len: u32,
}

impl<P: PixelWord> Run<P> {
    /// Encoded size of one record.
    pub const BYTES: usize = P::BYTES + 4;

    #[inline]
    pub fn new(color: P, len: u32) -> Self {
        Self { color, len }
    }
}

/// Push `len` pixels of `color`, extending the last run when the colour
/// matches. Zero-length pushes are ignored.
pub fn push_run<P: PixelWord>(runs: &mut Vec<Run<P>>, color: P, mut len: usize) {
    if len == 0 {
        return;
    }
    if let Some(last) = runs.last_mut()
        && last.color == color
    {
        let room = (u32::MAX - last.len) as usize;
        let take = room.min(len);
        last.len += take as u32;
        len -= take;
    }
    while len > 0 {
        let take = len.min(u32::MAX as usize);
        runs.push(Run::new(color, take as u32));
        len -= take;
    }
}

/// Collapse a raw row into runs, appending to `runs`.
pub fn runs_from_row<P: PixelWord>(row: &[P], runs: &mut Vec<Run<P>>) {
    let mut rest = row;
    while let Some(&color) = rest.first() {
        let len = rest.iter().take_while(|&&p| p == color).count();
        push_run(runs, color, len);
        rest = &rest[len..];
    }
}

/// Append the encoding of `runs` to `out`.
pub fn encode_runs<P: PixelWord>(runs: &[Run<P>], out: &mut Vec<u8>) {
    out.reserve(runs.len() * Run::<P>::BYTES);
    for run in runs {
        put_le(out, run.color.to_u64(), P::BYTES);
        out.extend_from_slice(&run.len.to_le_bytes());
    }
}

/// Iterates the complete records of an encoded run list.
#[derive(Debug, Clone)]
pub struct RunIter<'a, P> {
    src: &'a [u8],
    pos: usize,
    _pixel: PhantomData<P>,
}

impl<'a, P: PixelWord> RunIter<'a, P> {
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            _pixel: PhantomData,
        }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<P: PixelWord> Iterator for RunIter<'_, P> {
    type Item = Run<P>;

    #[inline]
    fn next(&mut self) -> Option<Run<P>> {
        let color = get_le(self.src, self.pos, P::BYTES)?;
        let len = get_le(self.src, self.pos + P::BYTES, 4)?;
        self.pos += Run::<P>::BYTES;
        Some(Run::new(P::from_u64(color), len as u32))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.src.len() - self.pos) / Run::<P>::BYTES;
        (n, Some(n))
    }
}

/// Expand a run list into `row`, returning the bytes consumed.
pub fn decode<P: PixelWord>(src: &[u8], row: &mut [P]) -> Result<usize, CodecError> {
    let width = row.len();
    if width == 0 {
        return Err(CodecError::EmptyRow);
    }

    let mut runs = RunIter::<P>::new(src);
    let mut x = 0;
    while x < width {
        let at = runs.position();
        let run = runs.next().ok_or(CodecError::Truncated { offset: at })?;
        let len = run.len as usize;
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
        row[x..x + len].fill(run.color);
        x += len;
    }
    Ok(runs.position())
}
