//! The header of a container: the code table, the end marker and the number of
//! symbols in the payload.
//!
//! | Field | Size |
//! |---|---|
//! | symbol count | 4 bytes, big endian |
//! | entry × symbol count | symbol (1 byte), code length in bits (1 byte), code padded to whole bytes |
//! | end marker | `0xFFFF` |
//! | original symbol count | 4 bytes, big endian |
//!
//! The packed payload follows right after the header.
use crate::common::{END_MARKER, MAX_CODE_LENGTH, MAX_SYMBOLS};
use crate::decoding::bit_reader::{BitReader, GetBitsError};
use crate::encoding::bit_writer::BitWriter;
use crate::huff::{Code, CodeTable};
use crate::io::{Error, Read};
use alloc::vec::Vec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    entries: Vec<HeaderEntry>,
    original_symbol_count: u32,
}

/// One symbol of the code table together with its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    pub symbol: u8,
    pub code: Code,
}

impl ContainerHeader {
    /// A header for a payload of `original_symbol_count` symbols encoded with `table`.
    ///
    /// Entries are stored in ascending symbol order.
    pub fn new(table: &CodeTable, original_symbol_count: u32) -> Self {
        ContainerHeader {
            entries: table
                .iter()
                .map(|(symbol, code)| HeaderEntry { symbol, code })
                .collect(),
            original_symbol_count,
        }
    }

    /// Number of distinct symbols in the code table.
    pub fn symbol_count(&self) -> u32 {
        self.entries.len() as u32
    }

    /// The code table entries, in the order they appear in the header.
    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    /// Number of symbols the payload decodes to, which is the length of the original input.
    pub fn original_symbol_count(&self) -> u32 {
        self.original_symbol_count
    }

    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::default();
        for entry in &self.entries {
            table.insert(entry.symbol, entry.code);
        }
        table
    }

    /// Size of the serialized header in bytes.
    pub fn serialized_len(&self) -> usize {
        let entries: usize = self
            .entries
            .iter()
            .map(|entry| 2 + usize::from(entry.code.len()).div_ceil(8))
            .sum();
        4 + entries + 2 + 4
    }

    /// Write the header. Every code starts on a fresh byte.
    pub(crate) fn serialize(&self, bw: &mut BitWriter) {
        debug_assert!(bw.is_byte_aligned());
        bw.write_u32(self.symbol_count());
        for entry in &self.entries {
            bw.write_u8(entry.symbol);
            bw.write_u8(entry.code.len());
            bw.write_code(entry.code);
            bw.pad_to_byte();
        }
        bw.write_u16(END_MARKER);
        bw.write_u32(self.original_symbol_count);
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReadContainerHeaderError {
    #[error("Error while reading the symbol count: {0}")]
    SymbolCountReadError(#[source] Error),
    #[error("Header declares {got} symbols, there are only {MAX_SYMBOLS} byte values")]
    TooManySymbols { got: u32 },
    #[error("Error while reading the symbol of entry {entry}: {source}")]
    SymbolReadError {
        entry: u32,
        #[source]
        source: Error,
    },
    #[error("Symbol {symbol} appears in the code table more than once")]
    DuplicateSymbol { symbol: u8 },
    #[error("Error while reading the code length of symbol {symbol}: {source}")]
    CodeLengthReadError {
        symbol: u8,
        #[source]
        source: Error,
    },
    #[error("Code of symbol {symbol} is {got} bits long, can't be longer than {MAX_CODE_LENGTH}")]
    CodeTooLong { symbol: u8, got: u8 },
    #[error("Error while reading the code of symbol {symbol}: {source}")]
    CodeReadError {
        symbol: u8,
        #[source]
        source: Error,
    },
    #[error(transparent)]
    GetBitsError(#[from] GetBitsError),
    #[error("Error while reading the end marker: {0}")]
    EndMarkerReadError(#[source] Error),
    #[error("Read wrong end marker: 0x{got:X}, should be 0x{END_MARKER:X}")]
    BadEndMarker { got: u16 },
    #[error("Error while reading the original symbol count: {0}")]
    OriginalSymbolCountReadError(#[source] Error),
}

impl ReadContainerHeaderError {
    /// The io error that caused this error, if any.
    pub fn io_error(&self) -> Option<&Error> {
        use ReadContainerHeaderError as err;
        match self {
            err::SymbolCountReadError(source)
            | err::EndMarkerReadError(source)
            | err::OriginalSymbolCountReadError(source)
            | err::SymbolReadError { source, .. }
            | err::CodeLengthReadError { source, .. }
            | err::CodeReadError { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read and validate a container header, leaving `r` at the start of the payload.
///
/// Symbols must be unique and codes must fit into [`MAX_CODE_LENGTH`] bits. Whether the
/// codes form a prefix code is checked when building a [`HuffmanTable`](crate::huff::HuffmanTable)
/// from the entries.
pub fn read_container_header(mut r: impl Read) -> Result<ContainerHeader, ReadContainerHeaderError> {
    use ReadContainerHeaderError as err;
    let mut buf = [0u8; 4];

    r.read_exact(&mut buf).map_err(err::SymbolCountReadError)?;
    let symbol_count = u32::from_be_bytes(buf);
    if symbol_count > MAX_SYMBOLS {
        return Err(err::TooManySymbols { got: symbol_count });
    }

    let mut entries = Vec::with_capacity(symbol_count as usize);
    let mut seen = [false; 256];
    for entry in 0..symbol_count {
        let mut buf = [0u8; 2];
        r.read_exact(&mut buf[..1])
            .map_err(|source| err::SymbolReadError { entry, source })?;
        let symbol = buf[0];
        if seen[symbol as usize] {
            return Err(err::DuplicateSymbol { symbol });
        }
        seen[symbol as usize] = true;

        r.read_exact(&mut buf[1..])
            .map_err(|source| err::CodeLengthReadError { symbol, source })?;
        let code_len = buf[1];
        if code_len > MAX_CODE_LENGTH {
            return Err(err::CodeTooLong {
                symbol,
                got: code_len,
            });
        }

        let mut code_buf = [0u8; 8];
        let code_bytes = &mut code_buf[..usize::from(code_len).div_ceil(8)];
        r.read_exact(code_bytes)
            .map_err(|source| err::CodeReadError { symbol, source })?;
        // the rest of the last byte is padding
        let bits = BitReader::new(code_bytes).get_bits(usize::from(code_len))?;
        // can't fail, the length was checked and the reader only returned `code_len` bits
        let code = Code::new(bits, code_len).ok_or(err::CodeTooLong {
            symbol,
            got: code_len,
        })?;

        entries.push(HeaderEntry { symbol, code });
    }

    let mut buf = [0u8; 2];
    r.read_exact(&mut buf).map_err(err::EndMarkerReadError)?;
    let end_marker = u16::from_be_bytes(buf);
    if end_marker != END_MARKER {
        return Err(err::BadEndMarker { got: end_marker });
    }

    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(err::OriginalSymbolCountReadError)?;
    let original_symbol_count = u32::from_be_bytes(buf);

    Ok(ContainerHeader {
        entries,
        original_symbol_count,
    })
}
