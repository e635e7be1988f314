use std::collections::BTreeMap;

use log::debug;
use rayon::prelude::*;

use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;

/// Occurrence count of every symbol in an input.
///
/// Backed by a `BTreeMap` so iteration is always in ascending symbol order.
/// The sum of all counts always fits in a `u64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: BTreeMap<S, u64>,
    total: u64,
}

fn overflow() -> HuffmanError {
    HuffmanError::corrupt("frequency total overflows u64")
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn count(symbols: &[S]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        let counts = symbols.iter().fold(BTreeMap::new(), |mut acc, s| {
            *acc.entry(s.clone()).or_insert(0) += 1;
            acc
        });
        Ok(FrequencyTable {
            counts,
            total: symbols.len() as u64,
        })
    }

    /// Counts `chunk_size` slices of the input on the rayon pool and merges
    /// the partial tables. Gives the same table as [`FrequencyTable::count`].
    pub fn count_parallel(symbols: &[S], chunk_size: usize) -> Result<Self> {
        if symbols.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        if chunk_size == 0 {
            return Err(HuffmanError::Config("chunk_size must be positive".into()));
        }
        debug!(
            "counting {} symbols in {} chunks",
            symbols.len(),
            symbols.len().div_ceil(chunk_size)
        );
        symbols
            .par_chunks(chunk_size)
            .map(Self::count)
            .try_reduce_with(|mut a, b| {
                a.merge(&b)?;
                Ok(a)
            })
            .unwrap_or(Err(HuffmanError::EmptyInput))
    }

    /// Builds a table from explicit counts, as read back from an artifact
    /// header. Every count must be positive and their sum must fit in a
    /// `u64`.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
    {
        let mut counts = BTreeMap::new();
        let mut total: u64 = 0;
        for (symbol, count) in pairs {
            if count == 0 {
                return Err(HuffmanError::corrupt(format!(
                    "symbol {:?} has zero frequency",
                    symbol
                )));
            }
            if counts.insert(symbol.clone(), count).is_some() {
                return Err(HuffmanError::corrupt(format!(
                    "symbol {:?} listed twice",
                    symbol
                )));
            }
            total = total.checked_add(count).ok_or_else(overflow)?;
        }
        if counts.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        Ok(FrequencyTable { counts, total })
    }

    /// Adds every count of `other` into `self`. On overflow `self` is left
    /// unchanged.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        let total = self.total.checked_add(other.total).ok_or_else(overflow)?;
        for (symbol, count) in &other.counts {
            *self.counts.entry(symbol.clone()).or_insert(0) += count;
        }
        self.total = total;
        Ok(())
    }

    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.counts.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, which is the length of the counted input.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, u64)> + '_ {
        self.counts.iter().map(|(s, &c)| (s, c))
    }
}
