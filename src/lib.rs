//! A byte oriented huffman codec.
//!
//! [`encode`] counts the bytes of its input, builds a huffman tree from the counts and
//! writes a container made of the code table followed by the packed payload.
//! [`decode`] reads the code table back, rebuilds the tree and walks the payload through it.
//!
//! ```
//! let input = "she sells sea shells by the sea shore. ".repeat(20);
//! let container = huffpack::encode(input.as_bytes()).unwrap();
//! assert!(container.len() < input.len());
//! assert_eq!(huffpack::decode(&container).unwrap(), input.as_bytes());
//! ```
#![no_std]
#![deny(trivial_casts, trivial_numeric_casts, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod common;
pub mod container;
pub mod decoding;
pub mod encoding;
pub mod huff;

#[cfg(feature = "std")]
pub mod io;

#[cfg(not(feature = "std"))]
pub mod io_nostd;

#[cfg(not(feature = "std"))]
pub use io_nostd as io;

pub use decoding::{decode, decode_from, DecodeError};
pub use encoding::{encode, encode_to, EncodeError};

#[cfg(feature = "fuzz_exports")]
pub use huff::round_trip;
