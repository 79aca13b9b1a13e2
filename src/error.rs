//! Error types.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors returned by bitmap and arena operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The arena could not grow to hold `requested` bytes.
    #[error("arena cannot grow to {requested} bytes (limit {limit})")]
    OutOfMemory { requested: usize, limit: usize },

    /// Width or height is zero, or too large for the row format.
    #[error("invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// A stored row did not decode back to exactly `width` pixels.
    #[error("row {row} is corrupt: {source}")]
    CorruptRow {
        row: usize,
        #[source]
        source: CodecError,
    },
}

/// Decoder failures. None of these can happen for bytes the encoder wrote.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("row has zero width")]
    EmptyRow,

    #[error("input ends inside a token at byte {offset}")]
    Truncated { offset: usize },

    #[error("zero-length run at byte {offset}")]
    EmptyRun { offset: usize },

    #[error("run at byte {offset} covers {len} pixels but only {remaining} remain")]
    Overrun {
        offset: usize,
        len: usize,
        remaining: usize,
    },

    #[error("row decoded from {consumed} of {stored} stored bytes")]
    LengthMismatch { consumed: usize, stored: usize },
}

/// Arena invariant violations reported by `validate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("fragmented ({fragmented}) > filled ({filled}) or filled > capacity ({capacity})")]
    Counters {
        fragmented: usize,
        filled: usize,
        capacity: usize,
    },

    #[error("entry {index} ends at {end}, past filled ({filled})")]
    OutOfBounds {
        index: usize,
        end: usize,
        filled: usize,
    },

    #[error("entries {first} and {second} overlap")]
    Overlap { first: usize, second: usize },

    #[error("live bytes {live} differ from filled - fragmented ({expected})")]
    SizeMismatch { live: usize, expected: usize },

    #[error("entry {index} is from epoch {entry} but the arena is at epoch {arena}")]
    StaleEntry { index: usize, entry: u32, arena: u32 },
}
