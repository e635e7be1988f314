use std::io::{Read, Write};

use log::{debug, warn};

use crate::bit_vec::BitVec;
use crate::code_table::CodeTable;
use crate::compressed_data::CompressedData;
use crate::config::CodecConfig;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::symbol::Symbol;

/// A tree together with the code table derived from it.
#[derive(Debug, Clone)]
pub struct HuffmanCodec<S: Symbol> {
    tree: HuffmanTree<S>,
    encode_table: CodeTable<S>,
}

impl<S: Symbol> HuffmanCodec<S> {
    pub fn new(tree: HuffmanTree<S>) -> Self {
        let encode_table = CodeTable::from_tree(&tree);
        HuffmanCodec { tree, encode_table }
    }

    pub fn from_frequencies(frequencies: &FrequencyTable<S>) -> Result<Self> {
        Ok(Self::new(HuffmanTree::from_frequencies(frequencies)?))
    }

    pub fn tree(&self) -> &HuffmanTree<S> {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable<S> {
        &self.encode_table
    }

    /// Concatenates the code of every symbol in `data`.
    pub fn encode(&self, data: &[S]) -> Result<BitVec> {
        let mut bit_vec = BitVec::with_capacity(data.len());
        for symbol in data {
            bit_vec.extend(self.encode_table.code(symbol)?);
        }
        Ok(bit_vec)
    }

    /// Walks the tree once per bit, emitting a symbol at every leaf.
    ///
    /// Fails if the bits end part-way through a code.
    pub fn decode(&self, bits: &BitVec) -> Result<Vec<S>> {
        let root = self.tree.root_id();
        let mut result = Vec::with_capacity(bits.bit_count() / self.encode_table.max_code_len().max(1));

        if let HuffNode::Leaf { symbol, .. } = self.tree.get(root) {
            for (i, bit) in bits.iter().enumerate() {
                if bit {
                    return Err(HuffmanError::corrupt(format!(
                        "bit {} is 1 but the only code is 0",
                        i
                    )));
                }
                result.push(symbol.clone());
            }
            return Ok(result);
        }

        let mut current = root;
        for bit in bits.iter() {
            current = match self.tree.get(current) {
                HuffNode::Internal { left, right, .. } => {
                    if bit {
                        *right
                    } else {
                        *left
                    }
                }
                HuffNode::Leaf { .. } => {
                    return Err(HuffmanError::corrupt("walk resumed from a leaf"));
                }
            };
            if let HuffNode::Leaf { symbol, .. } = self.tree.get(current) {
                result.push(symbol.clone());
                current = root;
            }
        }

        if current != root {
            return Err(HuffmanError::corrupt("ran out of bits while decoding"));
        }
        Ok(result)
    }

    /// Counts, builds the code and packs `data` into an artifact.
    pub fn compress(data: &[S]) -> Result<CompressedData<S>> {
        Self::compress_with(data, &CodecConfig::default())
    }

    pub fn compress_with(data: &[S], config: &CodecConfig) -> Result<CompressedData<S>> {
        config.validate()?;
        let frequencies = if data.len() >= config.parallel_threshold {
            FrequencyTable::count_parallel(data, config.chunk_size)?
        } else {
            FrequencyTable::count(data)?
        };

        let codec = Self::from_frequencies(&frequencies)?;
        let bits = codec.encode(data)?;
        let bit_count = bits.bit_count() as u64;
        debug!(
            "compressed {} symbols ({} distinct) into {} bits",
            data.len(),
            frequencies.len(),
            bit_count
        );

        let compressed = CompressedData {
            frequencies,
            bit_count,
            payload: bits.into_bytes(),
        };

        if config.verify && Self::decompress(&compressed)?.as_slice() != data {
            return Err(HuffmanError::corrupt("artifact does not decode to its input"));
        }
        Ok(compressed)
    }

    /// Rebuilds the tree from the artifact header and decodes the payload.
    pub fn decompress(compressed: &CompressedData<S>) -> Result<Vec<S>> {
        let codec = Self::from_frequencies(&compressed.frequencies)?;

        let expected_bits = codec.encode_table.encoded_bit_len(&compressed.frequencies)?;
        if expected_bits != compressed.bit_count {
            warn!(
                "rejecting artifact: header declares {} payload bits, frequencies imply {}",
                compressed.bit_count, expected_bits
            );
            return Err(HuffmanError::corrupt(format!(
                "payload length {} bits does not match frequency table ({} bits)",
                compressed.bit_count, expected_bits
            )));
        }

        let bit_count = usize::try_from(compressed.bit_count)
            .map_err(|_| HuffmanError::corrupt("payload too large for this platform"))?;
        let bits = BitVec::from_packed(&compressed.payload, bit_count)?;
        let decoded = codec.decode(&bits)?;

        if decoded.len() as u64 != compressed.original_length() {
            warn!(
                "rejecting artifact: decoded {} symbols, header declares {}",
                decoded.len(),
                compressed.original_length()
            );
            return Err(HuffmanError::corrupt(format!(
                "expected {} symbols, got {}",
                compressed.original_length(),
                decoded.len()
            )));
        }
        Ok(decoded)
    }
}

pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Ok(HuffmanCodec::compress(data)?.serialize())
}

pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::decompress(&CompressedData::deserialize(data)?)
}

/// Compresses text one Unicode scalar value at a time.
pub fn compress_str(text: &str) -> Result<Vec<u8>> {
    let chars: Vec<char> = text.chars().collect();
    Ok(HuffmanCodec::compress(&chars)?.serialize())
}

pub fn decompress_str(data: &[u8]) -> Result<String> {
    let chars = HuffmanCodec::<char>::decompress(&CompressedData::deserialize(data)?)?;
    Ok(chars.into_iter().collect())
}

/// Reads all of `input`, compresses it and writes the artifact to `output`.
///
/// Nothing is written unless compression succeeds. Returns the number of
/// bytes written.
pub fn encode_from_reader<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    config: &CodecConfig,
) -> Result<usize> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    let artifact = HuffmanCodec::compress_with(&data, config)?.serialize();
    output.write_all(&artifact)?;
    output.flush()?;
    Ok(artifact.len())
}

/// Reads an artifact from `input` and writes the decoded bytes to `output`.
///
/// Nothing is written unless decoding succeeds. Returns the number of bytes
/// written.
pub fn decode_from_reader<R: Read, W: Write>(mut input: R, mut output: W) -> Result<usize> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    let decoded = decompress_bytes(&data)?;
    output.write_all(&decoded)?;
    output.flush()?;
    Ok(decoded.len())
}
