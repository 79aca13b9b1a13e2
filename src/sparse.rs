//! Bitmap made of run lists, edited in place without a decoded row.
//!
//! Every row is a list of `(color, len)` runs. A write rebuilds the row in
//! three parts: runs left of the edit, the new pixels, runs right of it.
//! Cheap when rows have few colour changes; costs grow with the run count.

use alloc::vec::Vec;
use core::mem;

use crate::codec::sparse::{Run, RunIter, encode_runs, push_run};
use crate::error::{CodecError, Error, Result, ValidationError};
use crate::options::Options;
use crate::pixel::PixelWord;
use crate::raster::Raster;
use crate::store::RowStore;

/// A bitmap whose rows are always stored as run lists.
#[derive(Debug)]
pub struct SparseBitmap<P: PixelWord = u32> {
    store: RowStore,
    width: usize,
    background: P,
    runs: Vec<Run<P>>,
    staging: Vec<u8>,
}

impl<P: PixelWord> SparseBitmap<P> {
    pub fn new(width: usize, height: usize, background: P) -> Result<Self> {
        Self::with_options(width, height, background, Options::default())
    }

    pub fn with_options(
        width: usize,
        height: usize,
        background: P,
        options: Options,
    ) -> Result<Self> {
        let Some(len) = u32::try_from(width).ok().filter(|_| width > 0 && height > 0) else {
            return Err(Error::InvalidDimensions { width, height });
        };
        let mut initial = Vec::new();
        encode_runs(&[Run::new(background, len)], &mut initial);
        Ok(Self {
            store: RowStore::new(height, &initial, &options)?,
            width,
            background,
            runs: Vec::new(),
            staging: Vec::new(),
        })
    }

    /// The runs of row `y`, left to right.
    pub fn runs(&self, y: usize) -> RunIter<'_, P> {
        RunIter::new(self.store.row(y))
    }

    /// Number of runs in row `y`.
    pub fn run_count(&self, y: usize) -> usize {
        self.store.row(y).len() / Run::<P>::BYTES
    }

    /// Replace `[x, x + len)` of row `y` with whatever `middle` pushes.
    fn splice(
        &mut self,
        x: usize,
        y: usize,
        len: usize,
        middle: impl FnOnce(&mut Vec<Run<P>>),
    ) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        let end = x + len;
        let mut runs = mem::take(&mut self.runs);
        runs.clear();

        let src = self.store.row(y);
        let mut pos = 0;
        for run in RunIter::<P>::new(src) {
            if pos >= x {
                break;
            }
            let run_end = pos + run.len as usize;
            push_run(&mut runs, run.color, run_end.min(x) - pos);
            pos = run_end;
        }

        middle(&mut runs);

        let mut pos = 0;
        let mut iter = RunIter::<P>::new(src);
        for run in iter.by_ref() {
            let run_end = pos + run.len as usize;
            if run_end > end {
                push_run(&mut runs, run.color, run_end - pos.max(end));
            }
            pos = run_end;
        }
        if pos != self.width {
            let source = if pos < self.width {
                CodecError::Truncated {
                    offset: iter.position(),
                }
            } else {
                CodecError::Overrun {
                    offset: 0,
                    len: pos,
                    remaining: self.width,
                }
            };
            self.runs = runs;
            return Err(Error::CorruptRow { row: y, source });
        }

        let mut staging = mem::take(&mut self.staging);
        staging.clear();
        encode_runs(&runs, &mut staging);
        let committed = self.store.commit(y, &staging);
        self.runs = runs;
        self.staging = staging;
        committed
    }
}

impl<P: PixelWord> Raster for SparseBitmap<P> {
    type Pixel = P;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.store.height()
    }

    #[inline]
    fn background(&self) -> P {
        self.background
    }

    fn pixel_unclipped(&mut self, x: usize, y: usize) -> Result<P> {
        assert!(x < self.width, "x {x} out of bounds for width {}", self.width);
        let mut pos = 0;
        let mut iter = self.runs(y);
        for run in iter.by_ref() {
            pos += run.len as usize;
            if x < pos {
                return Ok(run.color);
            }
        }
        Err(Error::CorruptRow {
            row: y,
            source: CodecError::Truncated {
                offset: iter.position(),
            },
        })
    }

    fn set_pixel_unclipped(&mut self, x: usize, y: usize, color: P) -> Result<()> {
        assert!(x < self.width, "x {x} out of bounds for width {}", self.width);
        self.splice(x, y, 1, |runs| push_run(runs, color, 1))
    }

    fn read_span_unclipped(&mut self, x: usize, y: usize, dest: &mut [P]) -> Result<()> {
        let end = x + dest.len();
        assert!(end <= self.width, "span {x}..{end} out of bounds for width {}", self.width);
        if dest.is_empty() {
            return Ok(());
        }
        let mut pos = 0;
        let mut iter = self.runs(y);
        for run in iter.by_ref() {
            let run_end = pos + run.len as usize;
            let lo = pos.max(x);
            let hi = run_end.min(end);
            if lo < hi {
                dest[lo - x..hi - x].fill(run.color);
            }
            pos = run_end;
            if pos >= end {
                return Ok(());
            }
        }
        Err(Error::CorruptRow {
            row: y,
            source: CodecError::Truncated {
                offset: iter.position(),
            },
        })
    }

    fn write_span_unclipped(&mut self, x: usize, y: usize, src: &[P]) -> Result<()> {
        assert!(x + src.len() <= self.width, "span out of bounds for width {}", self.width);
        self.splice(x, y, src.len(), |runs| {
            for &p in src {
                push_run(runs, p, 1);
            }
        })
    }

    fn fill_span_unclipped(&mut self, x: usize, y: usize, len: usize, color: P) -> Result<()> {
        assert!(x + len <= self.width, "span out of bounds for width {}", self.width);
        self.splice(x, y, len, |runs| push_run(runs, color, len))
    }

    fn optimize(&mut self, full: bool) -> Result<()> {
        self.store.optimize(full)
    }

    #[inline]
    fn compressed_size_used(&self) -> usize {
        self.store.used()
    }

    #[inline]
    fn compressed_size_reserved(&self) -> usize {
        self.store.reserved()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate()
    }
}
