use std::collections::BTreeMap;

use log::trace;

use crate::bit_vec::BitVec;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::symbol::Symbol;

/// Symbol to code mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    codes: BTreeMap<S, BitVec>,
}

impl<S: Symbol> CodeTable<S> {
    /// Walks the tree with an explicit stack, appending `0` for a left edge
    /// and `1` for a right edge.
    ///
    /// A tree that is a single leaf gets the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Self {
        let mut codes = BTreeMap::new();

        if let HuffNode::Leaf { symbol, .. } = tree.get(tree.root_id()) {
            codes.insert(symbol.clone(), BitVec::from_iter([false]));
            return CodeTable { codes };
        }

        let mut stack = vec![(tree.root_id(), BitVec::new())];
        while let Some((id, code)) = stack.pop() {
            match tree.get(id) {
                HuffNode::Leaf { symbol, .. } => {
                    trace!("code {:?} -> {}", symbol, code);
                    codes.insert(symbol.clone(), code);
                }
                HuffNode::Internal { left, right, .. } => {
                    let mut right_code = code.clone();
                    right_code.push_bit(true);
                    let mut left_code = code;
                    left_code.push_bit(false);
                    stack.push((*right, right_code));
                    stack.push((*left, left_code));
                }
            }
        }
        CodeTable { codes }
    }

    pub fn get(&self, symbol: &S) -> Option<&BitVec> {
        self.codes.get(symbol)
    }

    /// Like [`CodeTable::get`], but a missing symbol is an error.
    pub fn code(&self, symbol: &S) -> Result<&BitVec> {
        self.codes
            .get(symbol)
            .ok_or_else(|| HuffmanError::unknown_symbol(symbol))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &BitVec)> + '_ {
        self.codes.iter()
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(BitVec::bit_count).max().unwrap_or(0)
    }

    /// Σ frequency × code length over `frequencies`, the exact payload size
    /// in bits.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable<S>) -> Result<u64> {
        frequencies.iter().try_fold(0u64, |acc, (symbol, count)| {
            let len = self.code(symbol)?.bit_count() as u64;
            count
                .checked_mul(len)
                .and_then(|bits| acc.checked_add(bits))
                .ok_or_else(|| HuffmanError::corrupt("encoded length overflows u64"))
        })
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitVec> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}
