//! Contains [`FrequencyTable`], the number of times every
//! byte value occurs within an input.

use core::fmt;

/// How often each byte value occurs in some input.
///
/// Byte values that don't occur are absent from the table, iterating yields
/// the present values in ascending order.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Index is the symbol, a count of zero means the symbol is absent
    counts: [u32; 256],
    distinct: usize,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    /// An empty table, as produced by counting an empty input.
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; 256],
            distinct: 0,
        }
    }

    /// Count the occurrences of every byte value in `data`.
    ///
    /// # Panics
    /// If `data` is longer than [`MAX_INPUT_SIZE`](crate::common::MAX_INPUT_SIZE), the counts
    /// could overflow. [`encode`](crate::encode) rejects such inputs before counting.
    pub fn count(data: &[u8]) -> Self {
        assert!(
            data.len() <= crate::common::MAX_INPUT_SIZE,
            "Can't count more than u32::MAX symbols"
        );
        let mut table = Self::new();
        for &symbol in data {
            table.counts[symbol as usize] += 1;
        }
        table.distinct = table.counts.iter().filter(|count| **count > 0).count();
        table
    }

    /// Build a table from `(symbol, count)` pairs. Counts for the same symbol add up,
    /// zero counts are ignored.
    ///
    /// A summed count saturates at `u32::MAX`, the most any input accepted by
    /// [`encode`](crate::encode) can hold.
    pub fn from_counts(counts: impl IntoIterator<Item = (u8, u32)>) -> Self {
        let mut table = Self::new();
        for (symbol, count) in counts {
            let slot = &mut table.counts[symbol as usize];
            *slot = slot.saturating_add(count);
        }
        table.distinct = table.counts.iter().filter(|count| **count > 0).count();
        table
    }

    /// The count for `symbol`, or `None` if it doesn't occur.
    pub fn get(&self, symbol: u8) -> Option<u32> {
        match self.counts[symbol as usize] {
            0 => None,
            count => Some(count),
        }
    }

    /// Number of distinct byte values.
    pub fn len(&self) -> usize {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Sum of all counts, which is the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().copied().map(u64::from).sum()
    }

    /// All present symbols with their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, count)| (symbol as u8, *count))
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
