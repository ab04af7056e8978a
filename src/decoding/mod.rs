//! Structures and utilities used for decoding containers back into the original data.

pub mod bit_reader;

use crate::container::{read_container_header, ReadContainerHeaderError};
use crate::huff::{HuffmanDecoder, HuffmanDecoderError, HuffmanTable, HuffmanTableError};
use crate::io::{Error, ErrorKind, Read};
use alloc::vec;
use alloc::vec::Vec;
use bit_reader::BitReader;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    ReadContainerHeaderError(#[from] ReadContainerHeaderError),
    #[error(transparent)]
    HuffmanTableError(#[from] HuffmanTableError),
    #[error("Failed to decode symbol {decoded} of {declared}: {source}")]
    HuffmanDecoderError {
        decoded: u32,
        declared: u32,
        #[source]
        source: HuffmanDecoderError,
    },
    #[error("Error while reading the payload: {0}")]
    PayloadReadError(#[source] Error),
    #[error("Header declares {declared} symbols but the code table is empty")]
    MissingSymbols { declared: u32 },
    #[error("Found {extra} unused bytes after the payload")]
    TrailingBytes { extra: usize },
}

impl DecodeError {
    /// True if the input is not a valid container: it's truncated, malformed or
    /// internally inconsistent. False for errors of the underlying reader.
    pub fn is_corrupt_input(&self) -> bool {
        match self {
            DecodeError::ReadContainerHeaderError(e) => e
                .io_error()
                .map_or(true, |e| e.kind() == ErrorKind::UnexpectedEof),
            DecodeError::PayloadReadError(e) => e.kind() == ErrorKind::UnexpectedEof,
            _ => true,
        }
    }
}

/// Decode a container created by [`encode`](crate::encode).
pub fn decode(source: &[u8]) -> Result<Vec<u8>, DecodeError> {
    decode_from(source)
}

/// Read a container from `source` and decode it. `source` is read to the end, the payload
/// has to be the last thing in it.
pub fn decode_from(mut source: impl Read) -> Result<Vec<u8>, DecodeError> {
    let header = read_container_header(&mut source)?;
    let table = HuffmanTable::build(header.entries())?;
    let declared = header.original_symbol_count();

    let mut payload = Vec::new();
    source
        .read_to_end(&mut payload)
        .map_err(DecodeError::PayloadReadError)?;

    let output = decode_payload(&table, &payload, declared)?;
    debug!(
        symbols = header.symbol_count(),
        payload = payload.len(),
        output = output.len(),
        "decoded container"
    );
    Ok(output)
}

/// Walk the payload bits through the tree until `declared` symbols came out.
///
/// Padding after the last code is never looked at.
fn decode_payload(table: &HuffmanTable, payload: &[u8], declared: u32) -> Result<Vec<u8>, DecodeError> {
    if declared == 0 {
        if !payload.is_empty() {
            return Err(DecodeError::TrailingBytes {
                extra: payload.len(),
            });
        }
        return Ok(Vec::new());
    }
    if table.is_empty() {
        return Err(DecodeError::MissingSymbols { declared });
    }

    // every occurrence of a lone symbol is encoded with zero bits, only the count tells the length
    if let Some(symbol) = table.single_symbol() {
        if !payload.is_empty() {
            return Err(DecodeError::TrailingBytes {
                extra: payload.len(),
            });
        }
        return Ok(vec![symbol; declared as usize]);
    }

    // every code is at least one bit long, no point in reserving more than that
    let capacity = core::cmp::min(declared as usize, payload.len().saturating_mul(8));
    let mut output = Vec::with_capacity(capacity);
    let decoder = HuffmanDecoder::new(table);
    let mut br = BitReader::new(payload);
    for decoded in 0..declared {
        let symbol = decoder
            .decode_symbol(&mut br)
            .map_err(|source| DecodeError::HuffmanDecoderError {
                decoded,
                declared,
                source,
            })?;
        output.push(symbol);
    }

    let extra = br.bits_left() / 8;
    if extra > 0 {
        return Err(DecodeError::TrailingBytes { extra });
    }
    Ok(output)
}
