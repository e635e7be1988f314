//! Self-describing compressed artifact.
//!
//! ```text
//! magic          4 bytes   "HUFP"
//! version        u8
//! symbol kind    u8        Symbol::KIND
//! symbol count   u32
//!   symbol       Symbol::encode_into
//!   frequency    u64
//! payload bits   u64
//! payload        ceil(payload bits / 8) bytes
//! ```
//!
//! Integers are little-endian. The header carries the frequency table rather
//! than the tree; the decoder rebuilds the identical tree from it.

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::{take, Symbol};

pub const MAGIC: &[u8; 4] = b"HUFP";
pub const VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData<S: Symbol> {
    pub frequencies: FrequencyTable<S>,
    pub bit_count: u64,
    pub payload: Vec<u8>,
}

fn read_u32(input: &mut &[u8], what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(take(input, 4, what)?);
    Ok(u32::from_le_bytes(buf))
}

fn read_u64(input: &mut &[u8], what: &str) -> Result<u64> {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(take(input, 8, what)?);
    Ok(u64::from_le_bytes(buf))
}

impl<S: Symbol> CompressedData<S> {
    /// Number of symbols the payload decodes to.
    pub fn original_length(&self) -> u64 {
        self.frequencies.total()
    }

    /// Size of the serialized header in bytes.
    pub fn header_len(&self) -> usize {
        let mut symbols = Vec::new();
        for (symbol, _) in self.frequencies.iter() {
            symbol.encode_into(&mut symbols);
        }
        MAGIC.len() + 2 + 4 + symbols.len() + 8 * self.frequencies.len() + 8
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.header_len() + self.payload.len());

        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.push(S::KIND);

        bytes.extend_from_slice(&(self.frequencies.len() as u32).to_le_bytes());
        for (symbol, freq) in self.frequencies.iter() {
            symbol.encode_into(&mut bytes);
            bytes.extend_from_slice(&freq.to_le_bytes());
        }

        bytes.extend_from_slice(&self.bit_count.to_le_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut input = data;

        if take(&mut input, MAGIC.len(), "magic")? != MAGIC {
            return Err(HuffmanError::corrupt("bad magic"));
        }
        let version = take(&mut input, 1, "version")?[0];
        if version != VERSION {
            return Err(HuffmanError::corrupt(format!("unsupported version {}", version)));
        }
        let kind = take(&mut input, 1, "symbol kind")?[0];
        if kind != S::KIND {
            return Err(HuffmanError::corrupt(format!(
                "artifact holds symbol kind {}, expected {}",
                kind,
                S::KIND
            )));
        }

        let count = read_u32(&mut input, "symbol count")?;
        if count == 0 {
            return Err(HuffmanError::corrupt("header lists no symbols"));
        }

        let mut pairs: Vec<(S, u64)> = Vec::new();
        for _ in 0..count {
            let symbol = S::decode_from(&mut input)?;
            let freq = read_u64(&mut input, "frequency")?;
            if let Some((prev, _)) = pairs.last() {
                if *prev >= symbol {
                    return Err(HuffmanError::corrupt(format!(
                        "symbol {:?} out of order after {:?}",
                        symbol, prev
                    )));
                }
            }
            pairs.push((symbol, freq));
        }
        let frequencies = FrequencyTable::from_pairs(pairs)?;

        let bit_count = read_u64(&mut input, "payload bit length")?;
        let expected = bit_count.div_ceil(8);
        if input.len() as u64 != expected {
            return Err(HuffmanError::corrupt(format!(
                "payload is {} bytes, header declares {} bits ({} bytes)",
                input.len(),
                bit_count,
                expected
            )));
        }

        Ok(CompressedData {
            frequencies,
            bit_count,
            payload: input.to_vec(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> CompressedData<u8> {
        CompressedData {
            frequencies: FrequencyTable::count(&b"aaabbc"[..]).unwrap(),
            bit_count: 9,
            payload: vec![0b0001_0111, 0b1000_0000],
        }
    }

    #[test]
    fn header_layout() {
        let bytes = sample().serialize();
        assert_eq!(&bytes[..4], b"HUFP");
        assert_eq!(bytes[4], VERSION);
        assert_eq!(bytes[5], u8::KIND);
        assert_eq!(&bytes[6..10], &3u32.to_le_bytes());
        assert_eq!(bytes[10], b'a');
        assert_eq!(&bytes[11..19], &3u64.to_le_bytes());
        assert_eq!(bytes.len(), sample().header_len() + 2);
        assert_eq!(CompressedData::<u8>::deserialize(&bytes).unwrap(), sample());
    }

    #[test]
    fn wrong_symbol_kind_is_rejected() {
        let bytes = sample().serialize();
        assert!(CompressedData::<char>::deserialize(&bytes)
            .unwrap_err()
            .is_corrupt());
    }

    #[test]
    fn bad_magic_and_version_are_rejected() {
        let mut bytes = sample().serialize();
        bytes[0] = b'X';
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());

        let mut bytes = sample().serialize();
        bytes[4] = 9;
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());
    }

    #[test]
    fn payload_size_must_match_bit_length() {
        let mut bytes = sample().serialize();
        bytes.pop();
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());

        let mut bytes = sample().serialize();
        bytes.push(0);
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());
    }

    #[test]
    fn every_header_truncation_is_corrupt() {
        let bytes = sample().serialize();
        for len in 0..bytes.len() {
            let err = CompressedData::<u8>::deserialize(&bytes[..len]).unwrap_err();
            assert!(err.is_corrupt(), "len {} gave {:?}", len, err);
        }
    }

    #[test]
    fn unsorted_or_duplicate_symbols_are_rejected() {
        let mut bytes = sample().serialize();
        // swap 'a' and 'b' entries' symbol bytes
        bytes[10] = b'b';
        bytes[19] = b'a';
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());

        let mut bytes = sample().serialize();
        bytes[19] = b'a';
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());
    }

    #[test]
    fn overflowing_frequency_total_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[VERSION, u8::KIND]);
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.push(b'a');
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.push(b'b');
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes());
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());
    }

    #[test]
    fn zero_symbol_count_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[VERSION, u8::KIND]);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes());
        assert!(CompressedData::<u8>::deserialize(&bytes).unwrap_err().is_corrupt());
    }
}
