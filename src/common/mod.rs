//! Values and interfaces shared between the encoding side
//! and the decoding side.

// --- HEADER ---
/// This marker follows the last code table entry of a container header.
pub const END_MARKER: u16 = 0xFFFF;
/// The source alphabet is single bytes, so a code table never has more entries than this.
pub const MAX_SYMBOLS: u32 = 256;
/// Codes are kept in a `u64`, so no code can be longer than this.
///
/// The encoder never gets close: counts are bounded by the 32 bit original symbol count,
/// which bounds the depth of the tree to less than 60.
pub const MAX_CODE_LENGTH: u8 = 64;

// --- PAYLOAD ---
/// The original symbol count is stored in 32 bits, inputs can't be longer than this.
pub const MAX_INPUT_SIZE: usize = u32::MAX as usize;
