/// The huffman stage of the codec: every byte value of an input gets a bit string whose
/// length shrinks as the byte gets more frequent, and no bit string starts with another.
///
/// The encoding side counts symbols ([`FrequencyTable`]), builds a tree from the counts
/// ([`HuffmanTree`]) and reads the codes off that tree ([`CodeTable`]). The decoding side
/// rebuilds a tree from the codes stored in a container header ([`HuffmanTable`]) and walks
/// it bit by bit ([`HuffmanDecoder`]).
mod code_table;
mod frequency;
mod huff_decoder;
mod tree;

pub use code_table::*;
pub use frequency::*;
pub use huff_decoder::*;
pub use tree::*;

/// Encode `data`, decode the result and check that nothing changed.
///
/// # Panics
/// If either side fails or the data doesn't survive the round trip.
#[cfg(any(test, feature = "fuzz_exports"))]
pub fn round_trip(data: &[u8]) {
    let encoded = crate::encode(data).unwrap();
    let decoded = crate::decode(&encoded).unwrap();
    assert_eq!(data, decoded.as_slice());

    let frequencies = FrequencyTable::count(data);
    let table = CodeTable::build(&frequencies);
    if table.len() > 1 {
        assert!(table.is_prefix_free());
    }
    let payload_len = table.encoded_bit_len(&frequencies).div_ceil(8) as usize;
    assert!(encoded.len() >= payload_len);
}
