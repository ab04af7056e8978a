use crate::huff::Code;
use alloc::vec::Vec;

/// Packs codes and header fields of any bit width into bytes.
///
/// Bits fill every byte from the most significant position to the least
/// significant one. The last byte is padded with zeros when the buffer is dumped.
pub(crate) struct BitWriter {
    /// Finished bytes plus the partially filled last one
    output: Vec<u8>,
    /// Bits written so far. `bit_idx % 8` is the fill level of the last byte.
    bit_idx: usize,
}

impl BitWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// A writer whose buffer can hold `capacity` bytes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(Vec::with_capacity(capacity))
    }

    /// Write the lowest `num_bits` of `bits` into the writer, the most significant
    /// of those first. Bits above `num_bits` are ignored.
    ///
    /// # Panics
    /// If `num_bits` is bigger than 64.
    pub fn write_bits(&mut self, bits: u64, num_bits: u8) {
        assert!(num_bits <= 64, "Can't write more than 64 bits at once");
        let mut remaining = usize::from(num_bits);
        while remaining > 0 {
            let bits_in_current_byte = self.bit_idx % 8;
            if bits_in_current_byte == 0 {
                self.output.push(0);
            }
            let free_bits = 8 - bits_in_current_byte;
            let num_bits_being_added = free_bits.min(remaining);

            // The next `num_bits_being_added` bits, moved all the way to the right
            let chunk = (bits >> (remaining - num_bits_being_added)) & ((1 << num_bits_being_added) - 1);
            // Then back to the left, right behind the bits already in the byte
            let aligned = (chunk as u8) << (free_bits - num_bits_being_added);

            let last = self.output.len() - 1;
            self.output[last] |= aligned;

            remaining -= num_bits_being_added;
            self.bit_idx += num_bits_being_added;
        }
    }

    /// Write all bits of `code`. The empty code writes nothing.
    pub fn write_code(&mut self, code: Code) {
        self.write_bits(code.bits(), code.len());
    }

    /// Write a whole byte.
    pub fn write_u8(&mut self, value: u8) {
        self.write_bits(u64::from(value), 8);
    }

    /// Write a big endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.write_bits(u64::from(value), 16);
    }

    /// Write a big endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.write_bits(u64::from(value), 32);
    }

    /// Skip ahead to the next byte boundary, leaving the skipped bits as zero.
    pub fn pad_to_byte(&mut self) {
        self.bit_idx = self.output.len() * 8;
    }

    /// Number of bits written so far, not counting padding that is still ahead.
    pub fn bits_written(&self) -> usize {
        self.bit_idx
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.bit_idx % 8 == 0
    }

    /// The written bytes, the last one zero padded.
    pub fn dump(self) -> Vec<u8> {
        self.output
    }
}

impl From<Vec<u8>> for BitWriter {
    /// Continue writing after the bytes already in `output`.
    fn from(output: Vec<u8>) -> Self {
        let bit_idx = output.len() * 8;
        Self { output, bit_idx }
    }
}
