//! # huffpack
//!
//! Lossless Huffman compression with a self-describing artifact format.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffpack::{compress_bytes, decompress_bytes};
//!
//! let artifact = compress_bytes(b"abracadabra")?;
//! assert_eq!(decompress_bytes(&artifact)?, b"abracadabra");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! Working with the pieces directly:
//!
//! ```rust
//! use huffpack::{CodeTable, HuffmanCodec, HuffmanTree};
//!
//! let tree = HuffmanTree::from_symbols(&b"aaabbc"[..])?;
//! let table = CodeTable::from_tree(&tree);
//! assert_eq!(table.get(&b'a').unwrap().to_string(), "0");
//!
//! let artifact = HuffmanCodec::compress(&b"aaabbc"[..])?;
//! assert_eq!(artifact.bit_count, 9);
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod bit_vec;
pub mod code_table;
pub mod compressed_data;
pub mod config;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod min_heap;
pub mod symbol;

// Re-export main types for convenience
pub use bit_vec::BitVec;
pub use code_table::CodeTable;
pub use compressed_data::CompressedData;
pub use config::CodecConfig;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{
    compress_bytes, compress_str, decode_from_reader, decompress_bytes, decompress_str,
    encode_from_reader, HuffmanCodec,
};
pub use hufftree::{HuffmanTree, NodeKind, NodeRef};
pub use symbol::Symbol;
