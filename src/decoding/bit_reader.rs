/// Reads bits from a byte slice, starting at the most significant bit of the first byte.
pub struct BitReader<'s> {
    idx: usize, //index counts bits already read
    source: &'s [u8],
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GetBitsError {
    #[error("Cant serve this request. The reader is limited to {limit} bits, requested {num_requested_bits} bits")]
    TooManyBits {
        num_requested_bits: usize,
        limit: u8,
    },
    #[error("Can't read {requested} bits, only have {remaining} bits left")]
    NotEnoughRemainingBits { requested: usize, remaining: usize },
}

impl<'s> BitReader<'s> {
    pub fn new(source: &'s [u8]) -> BitReader<'s> {
        BitReader { idx: 0, source }
    }

    pub fn bits_left(&self) -> usize {
        self.source.len() * 8 - self.idx
    }

    pub fn bits_read(&self) -> usize {
        self.idx
    }

    pub fn get_bit(&mut self) -> Result<bool, GetBitsError> {
        if self.bits_left() == 0 {
            return Err(GetBitsError::NotEnoughRemainingBits {
                requested: 1,
                remaining: 0,
            });
        }
        let byte = self.source[self.idx / 8];
        let bit = (byte >> (7 - self.idx % 8)) & 1;
        self.idx += 1;
        Ok(bit == 1)
    }

    /// Read `n` bits. The first bit read ends up as the most significant bit of the
    /// `n` lowest bits of the result.
    pub fn get_bits(&mut self, n: usize) -> Result<u64, GetBitsError> {
        if n > 64 {
            return Err(GetBitsError::TooManyBits {
                num_requested_bits: n,
                limit: 64,
            });
        }
        if self.bits_left() < n {
            return Err(GetBitsError::NotEnoughRemainingBits {
                requested: n,
                remaining: self.bits_left(),
            });
        }

        let mut value: u64 = 0;
        let mut remaining = n;
        while remaining > 0 {
            let bits_left_in_current_byte = 8 - (self.idx % 8);
            let take = bits_left_in_current_byte.min(remaining);

            //drop the bits after the ones we need, then mask the ones already read
            let byte = u64::from(self.source[self.idx / 8]);
            let chunk = (byte >> (bits_left_in_current_byte - take)) & ((1 << take) - 1);

            value = (value << take) | chunk;
            remaining -= take;
            self.idx += take;
        }

        Ok(value)
    }

    pub fn reset(&mut self, new_source: &'s [u8]) {
        self.idx = 0;
        self.source = new_source;
    }
}
