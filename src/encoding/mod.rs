//! Structures and utilities used for compressing/encoding data into the container format.

pub(crate) mod bit_writer;

use crate::common::MAX_INPUT_SIZE;
use crate::container::ContainerHeader;
use crate::huff::{CodeTable, FrequencyTable};
use crate::io::{Error, Write};
use alloc::vec::Vec;
use bit_writer::BitWriter;
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("Input is {got} bytes long, can't encode more than {MAX_INPUT_SIZE} bytes")]
    InputTooLarge { got: usize },
    #[error("Symbol {symbol} has no code in the code table. This is a bug")]
    MissingCode { symbol: u8 },
    #[error("Error while writing the container: {0}")]
    WriteError(#[source] Error),
}

/// Compress `data` into a self contained container.
///
/// ```
/// let container = huffpack::encode(b"abracadabra").unwrap();
/// assert_eq!(huffpack::decode(&container).unwrap(), b"abracadabra");
/// ```
pub fn encode(data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if data.len() > MAX_INPUT_SIZE {
        return Err(EncodeError::InputTooLarge { got: data.len() });
    }
    let original_symbol_count = data.len() as u32;

    let frequencies = FrequencyTable::count(data);
    let table = CodeTable::build(&frequencies);
    trace!(?table, "derived code table");
    debug_assert!(table.len() < 2 || table.is_prefix_free());

    let header = ContainerHeader::new(&table, original_symbol_count);
    let payload_bits = table.encoded_bit_len(&frequencies);
    let payload_len = payload_bits.div_ceil(8) as usize;

    let mut bw = BitWriter::with_capacity(header.serialized_len() + payload_len);
    header.serialize(&mut bw);
    let header_len = bw.bits_written() / 8;

    for &symbol in data {
        let code = table
            .get(symbol)
            .ok_or(EncodeError::MissingCode { symbol })?;
        bw.write_code(code);
    }

    let output = bw.dump();
    debug!(
        input = data.len(),
        symbols = table.len(),
        header = header_len,
        payload = output.len() - header_len,
        "encoded container"
    );
    Ok(output)
}

/// Compress `data` and write the container into `target`.
pub fn encode_to(data: &[u8], mut target: impl Write) -> Result<(), EncodeError> {
    let container = encode(data)?;
    target
        .write_all(&container)
        .map_err(EncodeError::WriteError)?;
    target.flush().map_err(EncodeError::WriteError)
}
