//! Binary-indexed (Fenwick) cumulative-frequency tables.
//!
//! The teacher crate has no cumulative-frequency structure of its own — its closest relative is
//! the sorted frequency array driving `tools::adaptive_huff::AdaptiveHuffman`, which establishes
//! this crate's house style for "a frequency table that rescales itself on a threshold and keeps
//! a backstop bound" (`AdaptiveHuffman::update`/`rebuild_huff`). The tree itself is the standard
//! binary-indexed-tree recurrence.

use crate::consts::ALPHABET_SIZE as S;

/// A binary-indexed tree over the fixed `S`-symbol alphabet.
///
/// `underlying[i]` is the raw count for symbol `i`; `tree` is the BIT over those counts,
/// 1-indexed internally so `tree[k]` covers the range implied by `k`'s lowest set bit.
#[derive(Clone)]
pub struct FenwickTable {
    underlying: Vec<u64>,
    tree: Vec<u64>,
}

fn low_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_pow2_leq(n: usize) -> usize {
    let mut p = 1;
    while p * 2 <= n {
        p *= 2;
    }
    p
}

impl FenwickTable {
    /// Builds a table from an initial length-`S` count array in O(S log S).
    pub fn from_counts(counts: [u64; S]) -> Self {
        let mut t = Self {
            underlying: counts.to_vec(),
            tree: vec![0; S + 1],
        };
        for i in 0..S {
            t.bit_add(i, counts[i] as i64);
        }
        t
    }

    fn bit_add(&mut self, i: usize, delta: i64) {
        let mut idx = i + 1;
        while idx <= S {
            if delta >= 0 {
                self.tree[idx] += delta as u64;
            } else {
                self.tree[idx] -= (-delta) as u64;
            }
            idx += low_bit(idx);
        }
    }

    /// Cumulative sum of `underlying[0..i)`, for `i` in `[0, S]`.
    pub fn prefix_sum(&self, i: usize) -> u64 {
        let mut idx = i;
        let mut sum = 0u64;
        while idx > 0 {
            sum += self.tree[idx];
            idx -= low_bit(idx);
        }
        sum
    }

    /// `PrefixSum(j) - PrefixSum(i)`.
    pub fn range_sum(&self, i: usize, j: usize) -> u64 {
        self.prefix_sum(j) - self.prefix_sum(i)
    }

    /// Total mass over the whole alphabet, `PrefixSum(S)`.
    pub fn total(&self) -> u64 {
        self.prefix_sum(S)
    }

    pub fn add(&mut self, i: usize, delta: i64) {
        if delta >= 0 {
            self.underlying[i] += delta as u64;
        } else {
            self.underlying[i] -= (-delta) as u64;
        }
        self.bit_add(i, delta);
    }

    pub fn get(&self, i: usize) -> u64 {
        self.range_sum(i, i + 1)
    }

    pub fn set(&mut self, i: usize, v: u64) {
        let delta = v as i64 - self.get(i) as i64;
        self.add(i, delta);
    }

    /// The smallest `i` in `[0, S]` such that `PrefixSum(i+1) > v`, found by descending powers of
    /// two from the highest power of two `<= S` (equivalently: the largest `i` such that
    /// `PrefixSum(i) <= v`).
    pub fn rank_query(&self, v: u64) -> usize {
        let mut idx = 0usize;
        let mut remaining = v;
        let mut step = highest_pow2_leq(S);
        while step != 0 {
            let next = idx + step;
            if next <= S && self.tree[next] <= remaining {
                idx = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        idx
    }

    /// Replaces every count with `(count / c) | 1` and rebuilds the tree, guaranteeing every
    /// count stays `>= 1`.
    pub fn scale(&mut self, c: u64) {
        let snapshot = self.underlying.clone();
        self.tree = vec![0; S + 1];
        for (i, &count) in snapshot.iter().enumerate() {
            let rescaled = (count / c) | 1;
            self.underlying[i] = rescaled;
            self.bit_add(i, rescaled as i64);
        }
    }
}
