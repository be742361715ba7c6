//! A fast deflate/zlib compressor and decompressor.
//!
//! The compressor trades ratio for speed: a short greedy hash chain feeds
//! either a pair of precomputed global Huffman tables (one pass, no
//! statistics), per block custom tables, or stored blocks.
//!
//! The decompressor follows Eric Bigger's [libdeflate] and handles any
//! valid stream, not only the ones produced here.
//!
//! # Usage
//!
//! Compressing and decompressing zlib data
//!
//! ```
//! use fpng_deflate::{DeflateDecoder, DeflateEncoder};
//! let data = b"the quick brown fox jumps over the lazy dog, the quick brown fox";
//!
//! let compressed = DeflateEncoder::new(data).encode_zlib();
//! let decompressed = DeflateDecoder::new(&compressed).decode_zlib().unwrap();
//!
//! assert_eq!(&decompressed, data);
//! ```
//!
//! Picking a different strategy
//! ```
//! use fpng_deflate::{DeflateEncoder, DeflateEncodingOptions, DeflateEncodingStrategy};
//! let options = DeflateEncodingOptions::default()
//!     .set_strategy(DeflateEncodingStrategy::CustomTables);
//! let compressed = DeflateEncoder::new_with_options(&[0; 100], options).encode_deflate();
//! ```
//!
//! Decoding zlib data without confirming the adler32 checksum
//! ```no_run
//! use fpng_deflate::DeflateDecoder;
//! use fpng_deflate::DeflateOptions;
//! let totally_valid_data = [0; 23];
//! let options = DeflateOptions::default().set_confirm_checksum(false);
//! let mut decoder = DeflateDecoder::new_with_options(&totally_valid_data, options);
//!
//! let decompressed = decoder.decode_zlib();
//! ```
//!
//! [libdeflate]: https://github.com/ebiggers/libdeflate
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use crate::decoder::{DeflateDecoder, DeflateOptions};
pub use crate::encoder::{DeflateEncoder, DeflateEncodingOptions, DeflateEncodingStrategy};
#[cfg(feature = "zlib")]
pub use crate::utils::adler32;

mod bitstream;
mod bitwriter;
mod constants;
mod decoder;
mod encoder;
pub mod errors;
mod huffman;
mod matcher;
mod utils;
