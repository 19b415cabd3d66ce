//! Numeric repeat-count prefix.

/// Upper bound for accumulated counts; keeps `count * 10 + d` far from overflow.
pub const MAX_COUNT: u32 = 999_999;

/// Repeat count typed digit by digit. Zero means "unset" and is consumed as one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    count: u32,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_pending(&self) -> bool {
        self.count != 0
    }

    /// Fold a digit into the count. A `0` with nothing pending is not a digit (it is the
    /// column-0 motion) and leaves the count at zero.
    pub fn add_digit(&mut self, d: u8) {
        debug_assert!(d <= 9, "digit out of range: {d}");
        let d = u32::from(d.min(9));
        self.count = if self.count == 0 {
            d
        } else {
            self.count.saturating_mul(10).saturating_add(d).min(MAX_COUNT)
        };
    }

    /// Remove and return the pending count (0 when unset).
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.count)
    }

    /// Multiply the pending count by `factor` (an unset count counts as one). Used to
    /// combine a count typed before an operator with one typed after it.
    pub fn scale(&mut self, factor: u32) {
        if factor <= 1 {
            return;
        }
        self.count = self.count.max(1).saturating_mul(factor).min(MAX_COUNT);
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Number of times [`run`](Self::run) will invoke its action.
    pub fn repetitions(&self) -> u32 {
        self.count.max(1)
    }

    /// Invoke `action` `max(count, 1)` times with the zero-based repetition index, then
    /// reset. The first error stops the remaining repetitions; repetitions already applied
    /// stay applied. The count is reset whatever the outcome.
    pub fn run<F, E>(&mut self, mut action: F) -> Result<(), E>
    where
        F: FnMut(u32) -> Result<(), E>,
    {
        let n = self.repetitions();
        self.count = 0;
        for i in 0..n {
            action(i)?;
        }
        Ok(())
    }
}
