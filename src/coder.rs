//! Integer arithmetic coder: range renormalization, bit-plus-follow, EOF handling.
//!
//! The renormalization shape is adapted from
//! `examples/other_examples/1ba35659_rhellwege-stegosaurus__src-compression-arith.rs.rs`'s
//! `AriEncoder`/`AriDecoder` (the `pending_bits`/straddle-counter loop and the
//! `output_bit_plus_pending` helper). Where that reference writes through its own `BitStream`,
//! this module writes through `bitio::BitSink`/`BitSource` instead, and reads cumulative counts
//! from a `Model` rather than its own flat `AdaptiveModel`.

use crate::bitio::{BitSink, BitSource};
use crate::consts::{HALF, QUARTER, THIRD_QUARTER, TOP_VALUE, CODE_VALUE_BITS, EOF_SYMBOL};
use crate::error::Error;
use crate::model::Model;

pub struct Encoder {
    low: u64,
    high: u64,
    bits_to_follow: u64,
}

impl Encoder {
    pub fn new() -> Self {
        Self { low: 0, high: TOP_VALUE, bits_to_follow: 0 }
    }

    fn output_bit_plus_follow(&mut self, sink: &mut BitSink, bit: u8) {
        sink.write_bit(bit);
        while self.bits_to_follow > 0 {
            sink.write_bit(1 - bit);
            self.bits_to_follow -= 1;
        }
    }

    /// Encodes `symbol` against the model's currently selected table, then renormalizes.
    pub fn encode_symbol(&mut self, model: &Model, sink: &mut BitSink, symbol: usize) {
        let table = model.current_table();
        let lo = table.prefix_sum(symbol);
        let hi = table.prefix_sum(symbol + 1);
        let total = table.total();

        let range = self.high - self.low + 1;
        self.high = self.low + range * hi / total - 1;
        self.low = self.low + range * lo / total;

        loop {
            if self.high < HALF {
                self.output_bit_plus_follow(sink, 0);
            } else if self.low >= HALF {
                self.output_bit_plus_follow(sink, 1);
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THIRD_QUARTER {
                self.bits_to_follow += 1;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low *= 2;
            self.high = self.high * 2 + 1;
        }
    }

    /// Flushes the final two bits that disambiguate `[low, high)` and any outstanding
    /// bit-plus-follow straddle. Must be called exactly once, after the EOF symbol.
    pub fn finish(mut self, sink: &mut BitSink) {
        self.bits_to_follow += 1;
        if self.low < QUARTER {
            self.output_bit_plus_follow(sink, 0);
        } else {
            self.output_bit_plus_follow(sink, 1);
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Decoder {
    low: u64,
    high: u64,
    value: u64,
}

impl Decoder {
    pub fn new(source: &mut BitSource) -> Result<Self, Error> {
        let mut value = 0u64;
        for _ in 0..CODE_VALUE_BITS {
            value = (value << 1) | source.read_bit()? as u64;
        }
        Ok(Self { low: 0, high: TOP_VALUE, value })
    }

    /// Decodes the next symbol against the model's currently selected table and renormalizes.
    /// Returns the decoded symbol; the caller is responsible for comparing it against the model
    /// and for calling `Model::update`/`set_symbol_magic` between symbols as the §4.8 protocol
    /// dictates.
    pub fn decode_symbol(&mut self, model: &Model, source: &mut BitSource) -> Result<usize, Error> {
        let table = model.current_table();
        let total = table.total();
        let range = self.high - self.low + 1;
        let scaled = ((self.value - self.low + 1) * total - 1) / range;
        let symbol = table.rank_query(scaled);

        let lo = table.prefix_sum(symbol);
        let hi = table.prefix_sum(symbol + 1);
        self.high = self.low + range * hi / total - 1;
        self.low = self.low + range * lo / total;

        loop {
            if self.high < HALF {
                // no-op, bit already consistent
            } else if self.low >= HALF {
                self.value -= HALF;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THIRD_QUARTER {
                self.value -= QUARTER;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low *= 2;
            self.high = self.high * 2 + 1;
            self.value = (self.value * 2) + source.read_bit()? as u64;
        }
        Ok(symbol)
    }
}

/// The EOF symbol's index in the 258-entry alphabet.
pub const EOF: usize = EOF_SYMBOL;
