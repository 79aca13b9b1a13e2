//! Arena tuning knobs.

/// Growth, limit and compaction settings for a bitmap's arena.
///
/// ```rust
/// use corset::Options;
///
/// let opts = Options::new()
///     .growth_base(1024)
///     .max_capacity(16 << 20)
///     .compaction_divisor(8);
/// assert_eq!(opts.compaction_divisor, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Smallest non-zero capacity; growth doubles from here.
    pub growth_base: usize,
    /// Hard ceiling on arena capacity in bytes.
    pub max_capacity: usize,
    /// Compaction runs when `fragmented > filled / compaction_divisor`.
    pub compaction_divisor: usize,
    /// Shrink the backing buffer after an automatic compaction.
    pub shrink_on_compact: bool,
}

impl Options {
    pub const fn new() -> Self {
        Self {
            growth_base: 256,
            max_capacity: usize::MAX,
            compaction_divisor: 4,
            shrink_on_compact: true,
        }
    }

    pub const fn growth_base(mut self, bytes: usize) -> Self {
        self.growth_base = if bytes == 0 { 1 } else { bytes };
        self
    }

    pub const fn max_capacity(mut self, bytes: usize) -> Self {
        self.max_capacity = bytes;
        self
    }

    pub const fn compaction_divisor(mut self, divisor: usize) -> Self {
        self.compaction_divisor = if divisor == 0 { 1 } else { divisor };
        self
    }

    pub const fn shrink_on_compact(mut self, shrink: bool) -> Self {
        self.shrink_on_compact = shrink;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
