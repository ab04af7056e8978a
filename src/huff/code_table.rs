use super::{FrequencyTable, HuffmanTree, Node};
use crate::common::MAX_CODE_LENGTH;
use alloc::vec;
use core::fmt;

/// A bitstring of up to 64 bits.
///
/// The bits live in the lower `len` bits of `bits`, the first bit of the code is the most
/// significant of those. Codes are written in that order too.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// The code of the only symbol of a single entry table.
    pub const EMPTY: Code = Code { bits: 0, len: 0 };

    /// Returns `None` if `len` is too big or `bits` has bits set above `len`.
    pub fn new(bits: u64, len: u8) -> Option<Self> {
        if len > MAX_CODE_LENGTH {
            return None;
        }
        if len < MAX_CODE_LENGTH && bits >> len != 0 {
            return None;
        }
        Some(Code { bits, len })
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bit at `idx`, counting from the start of the code.
    pub fn bit(&self, idx: u8) -> bool {
        assert!(idx < self.len);
        (self.bits >> (self.len - 1 - idx)) & 1 == 1
    }

    /// This code with `bit` appended at the end.
    pub fn push(self, bit: bool) -> Self {
        assert!(self.len < MAX_CODE_LENGTH, "Code can't grow beyond 64 bits");
        Code {
            bits: (self.bits << 1) | u64::from(bit),
            len: self.len + 1,
        }
    }

    /// True if `other` starts with this code. Every code is a prefix of itself.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        if self.len == 0 {
            return true;
        }
        other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in 0..self.len {
            f.write_str(if self.bit(idx) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code(\"{}\")", self)
    }
}

/// Maps every symbol of an input to its code.
#[derive(Clone, PartialEq, Eq)]
pub struct CodeTable {
    /// Index is the symbol
    codes: [Option<Code>; 256],
    len: usize,
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable {
            codes: [None; 256],
            len: 0,
        }
    }
}

impl CodeTable {
    /// Build the huffman tree for `frequencies` and derive the codes from it.
    ///
    /// An empty frequency table results in an empty code table.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        match HuffmanTree::build(frequencies) {
            Some(tree) => Self::from_tree(&tree),
            None => Self::default(),
        }
    }

    /// Walk the tree depth first. Going left appends a 0, going right a 1.
    ///
    /// A tree that is just a leaf gives that symbol the empty code.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::default();
        let mut stack = vec![(tree.root(), Code::EMPTY)];
        while let Some((node, code)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    table.insert(*symbol, code);
                }
                Node::Internal { left, right, .. } => {
                    stack.push((&**right, code.push(true)));
                    stack.push((&**left, code.push(false)));
                }
            }
        }
        table
    }

    /// Set the code for `symbol`, returning the code it had before.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        let old = self.codes[symbol as usize].replace(code);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Number of symbols that have a code.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All symbols with their codes, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|code| (symbol as u8, code)))
    }

    /// True if no code is a prefix of another one.
    pub fn is_prefix_free(&self) -> bool {
        self.iter().all(|(symbol, code)| {
            self.iter()
                .all(|(other_symbol, other)| other_symbol == symbol || !code.is_prefix_of(&other))
        })
    }

    /// Length of `frequencies` encoded with this table, in bits and without padding.
    ///
    /// Symbols without a code count as zero bits.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, count)| {
                self.get(symbol)
                    .map(|code| u64::from(count) * u64::from(code.len()))
            })
            .sum()
    }

    /// Longest code in the table, zero for an empty table.
    pub fn max_code_len(&self) -> u8 {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }
}

impl fmt::Debug for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Code, CodeTable};
    use crate::huff::FrequencyTable;
    use alloc::string::ToString;

    fn code(bits: &str) -> Code {
        bits.chars()
            .fold(Code::EMPTY, |code, bit| code.push(bit == '1'))
    }

    fn known_vector() -> FrequencyTable {
        FrequencyTable::from_counts([
            (b'a', 5),
            (b'b', 9),
            (b'c', 12),
            (b'd', 13),
            (b'e', 16),
            (b'f', 45),
        ])
    }

    #[test]
    fn code_bits() {
        let c = code("1101");
        assert_eq!(c.bits(), 0b1101);
        assert_eq!(c.len(), 4);
        assert!(c.bit(0));
        assert!(!c.bit(2));
        assert_eq!(c.to_string(), "1101");
        assert_eq!(Code::new(0b1101, 4), Some(c));
        assert_eq!(Code::new(0b1101, 3), None);
        assert_eq!(Code::new(0, 65), None);
        assert_eq!(Code::new(u64::MAX, 64).map(|c| c.len()), Some(64));
    }

    #[test]
    fn prefixes() {
        assert!(code("11").is_prefix_of(&code("110")));
        assert!(code("110").is_prefix_of(&code("110")));
        assert!(!code("10").is_prefix_of(&code("110")));
        assert!(!code("110").is_prefix_of(&code("11")));
        assert!(Code::EMPTY.is_prefix_of(&code("0")));
        assert!(code("0").is_prefix_of(&Code::new(0, 64).unwrap()));
    }

    #[test]
    fn known_vector_codes() {
        let table = CodeTable::build(&known_vector());
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(b'a'), Some(code("1100")));
        assert_eq!(table.get(b'b'), Some(code("1101")));
        assert_eq!(table.get(b'c'), Some(code("100")));
        assert_eq!(table.get(b'd'), Some(code("101")));
        assert_eq!(table.get(b'e'), Some(code("111")));
        assert_eq!(table.get(b'f'), Some(code("0")));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn known_vector_is_optimal() {
        let frequencies = known_vector();
        let table = CodeTable::build(&frequencies);
        // 5*4 + 9*4 + 12*3 + 13*3 + 16*3 + 45*1
        assert_eq!(table.encoded_bit_len(&frequencies), 224);

        // f gets the shortest code, a and b the longest ones
        let f = table.get(b'f').unwrap().len();
        let longest = table.max_code_len();
        assert!(table.iter().all(|(_, c)| c.len() >= f));
        assert_eq!(table.get(b'a').unwrap().len(), longest);
        assert_eq!(table.get(b'b').unwrap().len(), longest);
    }

    #[test]
    fn single_symbol_gets_empty_code() {
        let table = CodeTable::build(&FrequencyTable::from_counts([(b'a', 1)]));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b'a'), Some(Code::EMPTY));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn empty_frequencies() {
        let table = CodeTable::build(&FrequencyTable::new());
        assert!(table.is_empty());
        assert_eq!(table.max_code_len(), 0);
        assert_eq!(table.encoded_bit_len(&FrequencyTable::new()), 0);
    }

    #[test]
    fn full_alphabet_is_prefix_free() {
        // skewed weights make for a deep tree
        let frequencies = FrequencyTable::from_counts((0..=255u8).map(|s| (s, u32::from(s) * 7 + 1)));
        let table = CodeTable::build(&frequencies);
        assert_eq!(table.len(), 256);
        assert!(table.is_prefix_free());
        assert!(table.iter().all(|(_, c)| !c.is_empty()));
    }

    #[test]
    fn fibonacci_weights_make_long_codes() {
        let mut weights = [1u32; 30];
        for idx in 2..weights.len() {
            weights[idx] = weights[idx - 1] + weights[idx - 2];
        }
        let frequencies = FrequencyTable::from_counts((0..30u8).map(|s| (s, weights[s as usize])));
        let table = CodeTable::build(&frequencies);
        assert_eq!(table.max_code_len(), 29);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn insert_reports_replaced_code() {
        let mut table = CodeTable::default();
        assert_eq!(table.insert(7, code("01")), None);
        assert_eq!(table.insert(7, code("10")), Some(code("01")));
        assert_eq!(table.len(), 1);
    }
}
