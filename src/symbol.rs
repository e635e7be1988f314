//! Alphabets the codec can compress.
//!
//! A symbol must be totally ordered so that frequency tables, header bytes
//! and tree shape come out the same on every run, and it must know how to
//! write itself into an artifact header.

use std::fmt::Debug;

use crate::error::{HuffmanError, Result};

pub trait Symbol: Ord + Clone + Debug + Send + Sync {
    /// Tag written to the artifact header so that an artifact is never
    /// decoded with the wrong alphabet.
    const KIND: u8;

    fn encode_into(&self, out: &mut Vec<u8>);

    /// Reads one symbol from the front of `input`, advancing it.
    fn decode_from(input: &mut &[u8]) -> Result<Self>;
}

pub(crate) fn take<'a>(input: &mut &'a [u8], n: usize, what: &str) -> Result<&'a [u8]> {
    if input.len() < n {
        return Err(HuffmanError::corrupt(format!(
            "truncated header: need {} bytes for {}, have {}",
            n,
            what,
            input.len()
        )));
    }
    let (head, tail) = input.split_at(n);
    *input = tail;
    Ok(head)
}

impl Symbol for u8 {
    const KIND: u8 = 1;

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }

    fn decode_from(input: &mut &[u8]) -> Result<Self> {
        Ok(take(input, 1, "byte symbol")?[0])
    }
}

/// Characters are stored as a one-byte length followed by their UTF-8 bytes.
impl Symbol for char {
    const KIND: u8 = 2;

    fn encode_into(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        let utf8 = self.encode_utf8(&mut buf);
        out.push(utf8.len() as u8);
        out.extend_from_slice(utf8.as_bytes());
    }

    fn decode_from(input: &mut &[u8]) -> Result<Self> {
        let len = take(input, 1, "char length")?[0] as usize;
        if !(1..=4).contains(&len) {
            return Err(HuffmanError::corrupt(format!("invalid char length {}", len)));
        }
        let bytes = take(input, len, "char bytes")?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| HuffmanError::corrupt(format!("invalid UTF-8 symbol: {}", e)))?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(HuffmanError::corrupt("char symbol is not a single scalar value")),
        }
    }
}
