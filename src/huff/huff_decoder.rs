use super::Code;
use crate::container::HeaderEntry;
use crate::decoding::bit_reader::{BitReader, GetBitsError};
use alloc::vec;
use alloc::vec::Vec;
use tracing::trace;

/// The huffman tree rebuilt from the codes of a container header.
///
/// Nodes live in a flat vector and refer to their children by index. The root is at index 0.
pub struct HuffmanTable {
    nodes: Vec<Entry>,
}

#[derive(Copy, Clone)]
enum Entry {
    Branch { children: [Option<usize>; 2] },
    Leaf { symbol: u8 },
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HuffmanTableError {
    #[error("Code {code} of symbol {symbol} collides with the code {other_code} of symbol {other_symbol}, the table is not prefix free")]
    PrefixCollision {
        symbol: u8,
        code: Code,
        other_symbol: u8,
        other_code: Code,
    },
}

pub struct HuffmanDecoder<'table> {
    table: &'table HuffmanTable,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HuffmanDecoderError {
    #[error(transparent)]
    GetBitsError(#[from] GetBitsError),
    #[error("Bits {bits_read} and before don't lead to any symbol in the code table")]
    UnknownCode { bits_read: usize },
}

impl Default for HuffmanTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanTable {
    /// A table without symbols. Decoding anything with it fails.
    pub fn new() -> HuffmanTable {
        HuffmanTable {
            nodes: vec![Entry::Branch {
                children: [None, None],
            }],
        }
    }

    /// Insert the code of every entry. Fails if any code is a prefix of another one,
    /// which includes two symbols with the same code.
    pub fn build(entries: &[HeaderEntry]) -> Result<HuffmanTable, HuffmanTableError> {
        let mut table = HuffmanTable::new();
        for entry in entries {
            table.insert(entry.symbol, entry.code)?;
        }
        trace!(nodes = table.nodes.len(), "rebuilt huffman tree");
        Ok(table)
    }

    fn insert(&mut self, symbol: u8, code: Code) -> Result<(), HuffmanTableError> {
        let mut idx = 0;
        for bit_idx in 0..code.len() {
            let bit = usize::from(code.bit(bit_idx));
            idx = match self.nodes[idx] {
                Entry::Leaf {
                    symbol: other_symbol,
                } => return Err(self.collision(symbol, code, other_symbol)),
                Entry::Branch { children } => match children[bit] {
                    Some(child) => child,
                    None => {
                        let child = self.nodes.len();
                        self.nodes.push(Entry::Branch {
                            children: [None, None],
                        });
                        if let Entry::Branch { children } = &mut self.nodes[idx] {
                            children[bit] = Some(child);
                        }
                        child
                    }
                },
            };
        }

        match self.nodes[idx] {
            Entry::Branch {
                children: [None, None],
            } => {
                self.nodes[idx] = Entry::Leaf { symbol };
                Ok(())
            }
            Entry::Leaf {
                symbol: other_symbol,
            } => Err(self.collision(symbol, code, other_symbol)),
            Entry::Branch { .. } => {
                // some longer code already runs through here, any leaf below will do
                let other_symbol = self.first_leaf_below(idx);
                Err(self.collision(symbol, code, other_symbol))
            }
        }
    }

    fn first_leaf_below(&self, mut idx: usize) -> u8 {
        loop {
            match self.nodes[idx] {
                Entry::Leaf { symbol } => return symbol,
                Entry::Branch { children } => match children {
                    [Some(child), _] | [None, Some(child)] => idx = child,
                    [None, None] => {
                        unreachable!("Branches are only created on the way to a leaf")
                    }
                },
            }
        }
    }

    fn collision(&self, symbol: u8, code: Code, other_symbol: u8) -> HuffmanTableError {
        HuffmanTableError::PrefixCollision {
            symbol,
            code,
            other_symbol,
            other_code: self.code_of(other_symbol).unwrap_or(Code::EMPTY),
        }
    }

    /// Find the code of `symbol` by searching the tree. Only used for error reporting.
    fn code_of(&self, symbol: u8) -> Option<Code> {
        let mut stack = vec![(0, Code::EMPTY)];
        while let Some((idx, code)) = stack.pop() {
            match self.nodes[idx] {
                Entry::Leaf { symbol: found } if found == symbol => return Some(code),
                Entry::Leaf { .. } => {}
                Entry::Branch { children } => {
                    if let Some(child) = children[1] {
                        stack.push((child, code.push(true)));
                    }
                    if let Some(child) = children[0] {
                        stack.push((child, code.push(false)));
                    }
                }
            }
        }
        None
    }

    /// True if the table holds no symbols at all.
    pub fn is_empty(&self) -> bool {
        matches!(
            self.nodes[0],
            Entry::Branch {
                children: [None, None]
            }
        )
    }

    /// If the table holds a single symbol with the empty code, returns that symbol.
    pub fn single_symbol(&self) -> Option<u8> {
        match self.nodes[0] {
            Entry::Leaf { symbol } => Some(symbol),
            Entry::Branch { .. } => None,
        }
    }
}

impl<'t> HuffmanDecoder<'t> {
    pub fn new(table: &'t HuffmanTable) -> HuffmanDecoder<'t> {
        HuffmanDecoder { table }
    }

    /// Walk the tree from the root, one bit per step, until a leaf is reached.
    ///
    /// A symbol with the empty code is decoded without reading any bits.
    pub fn decode_symbol(&self, br: &mut BitReader<'_>) -> Result<u8, HuffmanDecoderError> {
        let mut idx = 0;
        loop {
            match self.table.nodes[idx] {
                Entry::Leaf { symbol } => return Ok(symbol),
                Entry::Branch { children } => {
                    let bit = usize::from(br.get_bit()?);
                    idx = children[bit].ok_or(HuffmanDecoderError::UnknownCode {
                        bits_read: br.bits_read(),
                    })?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HuffmanDecoder, HuffmanDecoderError, HuffmanTable, HuffmanTableError};
    use crate::container::HeaderEntry;
    use crate::decoding::bit_reader::{BitReader, GetBitsError};
    use crate::huff::Code;
    use alloc::vec::Vec;

    fn entry(symbol: u8, bits: &str) -> HeaderEntry {
        let code = bits
            .chars()
            .fold(Code::EMPTY, |code, bit| code.push(bit == '1'));
        HeaderEntry { symbol, code }
    }

    #[test]
    fn decodes_known_codes() {
        let table = HuffmanTable::build(&[
            entry(b'f', "0"),
            entry(b'c', "100"),
            entry(b'd', "101"),
            entry(b'a', "1100"),
            entry(b'b', "1101"),
            entry(b'e', "111"),
        ])
        .unwrap();
        let decoder = HuffmanDecoder::new(&table);

        // f a c e, padded with zeros
        let source = [0b0110_0100, 0b1110_0000];
        let mut br = BitReader::new(&source);
        let decoded: Vec<u8> = (0..4).map(|_| decoder.decode_symbol(&mut br).unwrap()).collect();
        assert_eq!(decoded, b"face");
        assert_eq!(br.bits_read(), 11);
    }

    #[test]
    fn empty_code_reads_nothing() {
        let table = HuffmanTable::build(&[entry(b'x', "")]).unwrap();
        assert_eq!(table.single_symbol(), Some(b'x'));
        let decoder = HuffmanDecoder::new(&table);
        let mut br = BitReader::new(&[]);
        assert_eq!(decoder.decode_symbol(&mut br).unwrap(), b'x');
        assert_eq!(decoder.decode_symbol(&mut br).unwrap(), b'x');
        assert_eq!(br.bits_read(), 0);
    }

    #[test]
    fn rejects_prefix_codes() {
        let err = HuffmanTable::build(&[entry(1, "10"), entry(2, "101")])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            HuffmanTableError::PrefixCollision {
                symbol: 2,
                other_symbol: 1,
                ..
            }
        ));

        // shorter code inserted after the longer one
        let err = HuffmanTable::build(&[entry(1, "101"), entry(2, "10")])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            HuffmanTableError::PrefixCollision {
                symbol: 2,
                other_symbol: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_equal_codes() {
        let err = HuffmanTable::build(&[entry(1, "0"), entry(2, "1"), entry(3, "1")])
            .err()
            .unwrap();
        match err {
            HuffmanTableError::PrefixCollision {
                symbol,
                other_symbol,
                other_code,
                ..
            } => {
                assert_eq!(symbol, 3);
                assert_eq!(other_symbol, 2);
                assert_eq!(other_code, entry(2, "1").code);
            }
        }
    }

    #[test]
    fn rejects_empty_code_next_to_others() {
        assert!(HuffmanTable::build(&[entry(1, ""), entry(2, "0")]).is_err());
        assert!(HuffmanTable::build(&[entry(2, "0"), entry(1, "")]).is_err());
    }

    #[test]
    fn unused_branch_is_an_error() {
        // "1" leads nowhere
        let table = HuffmanTable::build(&[entry(1, "00"), entry(2, "01")]).unwrap();
        let decoder = HuffmanDecoder::new(&table);
        let mut br = BitReader::new(&[0b1000_0000]);
        assert!(matches!(
            decoder.decode_symbol(&mut br),
            Err(HuffmanDecoderError::UnknownCode { bits_read: 1 })
        ));
    }

    #[test]
    fn running_out_of_bits() {
        let table = HuffmanTable::build(&[entry(1, "0"), entry(2, "1")]).unwrap();
        let decoder = HuffmanDecoder::new(&table);
        let mut br = BitReader::new(&[]);
        assert!(matches!(
            decoder.decode_symbol(&mut br),
            Err(HuffmanDecoderError::GetBitsError(
                GetBitsError::NotEnoughRemainingBits { .. }
            ))
        ));
    }

    #[test]
    fn empty_table() {
        let table = HuffmanTable::build(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.single_symbol(), None);
    }
}
