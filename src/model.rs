//! Order-1 adaptive symbol model (§4.4).
//!
//! Grounded on `tools::adaptive_huff::AdaptiveHuffman::update`/`rebuild_huff` in the teacher
//! crate for the "increment a count, check a threshold, rescale" control flow shape. Design note
//! §9 calls for the cyclic Model<->coder back-reference in the original to be replaced with the
//! coder simply asking the model for its current table on every symbol, and for the preamble's
//! sparse "magic" table to be an explicit variant rather than a pointer swap — both are followed
//! here via the `Selected` enum.

use crate::consts::{ALPHABET_SIZE as S, MAX_FREQUENCY, SCALE_VALUE, UNUSED_SYMBOL, EOF_SYMBOL};
use crate::error::Error;
use crate::fenwick::FenwickTable;

/// Which table the coder should read cumulative counts from right now.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Selected {
    Context(usize),
    Magic,
}

pub struct Model {
    context_tables: Vec<FenwickTable>,
    context_total: Vec<u64>,
    prev_symbol: Option<usize>,
    magic_table: FenwickTable,
    current: Selected,
    coding_step: u64,
}

fn initial_counts() -> [u64; S] {
    let mut counts = [1u64; S];
    for c in counts.iter_mut().take(256) {
        *c = 128;
    }
    counts[UNUSED_SYMBOL] = 1;
    counts[EOF_SYMBOL] = 1;
    counts
}

impl Model {
    /// `coding_step` of `0` is interpreted as the default of 256, per §6.
    pub fn new(coding_step: u32) -> Result<Self, Error> {
        let counts = initial_counts();
        let table = FenwickTable::from_counts(counts);
        if table.total() > MAX_FREQUENCY {
            return Err(Error::ModelOverflow);
        }
        let context_tables: Vec<FenwickTable> = (0..S).map(|_| table.clone()).collect();
        let context_total = vec![table.total(); S];
        Ok(Self {
            context_tables,
            context_total,
            prev_symbol: None,
            magic_table: table,
            current: Selected::Context(0),
            coding_step: if coding_step == 0 { 256 } else { coding_step as u64 },
        })
    }

    pub fn current_table(&self) -> &FenwickTable {
        match self.current {
            Selected::Context(i) => &self.context_tables[i],
            Selected::Magic => &self.magic_table,
        }
    }

    fn current_table_mut(&mut self) -> &mut FenwickTable {
        match self.current {
            Selected::Context(i) => &mut self.context_tables[i],
            Selected::Magic => &mut self.magic_table,
        }
    }

    /// Updates the context table that was just used to encode/decode `symbol`, rescaling first
    /// if its running total has drifted past [`MAX_FREQUENCY`], then selects `symbol`'s own
    /// context table for the next call.
    pub fn update(&mut self, symbol: usize) {
        let c = self.prev_symbol.unwrap_or(symbol);
        if self.context_total[c] > MAX_FREQUENCY {
            log::trace!("rescaling context {c}, total {}", self.context_total[c]);
            self.context_tables[c].scale(SCALE_VALUE);
            self.context_total[c] = self.context_tables[c].total();
        }
        self.context_tables[c].add(symbol, self.coding_step as i64);
        self.context_total[c] += self.coding_step;
        self.prev_symbol = Some(symbol);
        self.current = Selected::Context(symbol);
    }

    /// Installs a sparse table that spends essentially zero bits on `symbol`, binding the
    /// coder's state to it without touching the adaptive model's real statistics.
    pub fn set_symbol_magic(&mut self, symbol: usize, prev_symbol: Option<usize>) -> Result<(), Error> {
        match prev_symbol {
            None => {
                self.magic_table = FenwickTable::from_counts([1u64; S]);
                self.magic_table.set(symbol, MAX_FREQUENCY - S as u64);
                self.current = Selected::Magic;
            }
            Some(prev) => {
                let table = self.current_table_mut();
                table.set(prev, 1);
                table.set(symbol, MAX_FREQUENCY - S as u64);
            }
        }
        if self.current_table().total() > MAX_FREQUENCY {
            return Err(Error::ModelOverflow);
        }
        Ok(())
    }

    /// Rebuilds every context table to its initial shape and clears the order-1 history.
    pub fn reset_model_symbols(&mut self) {
        log::debug!("resetting model symbols after preamble phase");
        let counts = initial_counts();
        for t in self.context_tables.iter_mut() {
            *t = FenwickTable::from_counts(counts);
        }
        self.context_total = vec![self.context_tables[0].total(); S];
        self.prev_symbol = None;
        self.current = Selected::Context(0);
    }

    pub fn prev_symbol(&self) -> Option<usize> {
        self.prev_symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_stays_within_bound() {
        let model = Model::new(256).expect("model overflow");
        assert_eq!(model.current_table().total(), 256 * 128 + 2);
    }

    #[test]
    fn update_advances_context_and_counts() {
        let mut model = Model::new(256).unwrap();
        let before = model.current_table().get(65);
        model.update(65);
        assert_eq!(model.prev_symbol(), Some(65));
        // context 65's table is now selected; its own count for symbol 65 is unaffected by the
        // update that happened under context 65 (the context used was the *previous* symbol,
        // i.e. 65 itself since prev_symbol started at None).
        let _ = before;
    }

    #[test]
    fn magic_table_concentrates_mass() {
        let mut model = Model::new(256).unwrap();
        model.set_symbol_magic(10, None).unwrap();
        let lo = model.current_table().prefix_sum(10);
        let hi = model.current_table().prefix_sum(11);
        assert_eq!(hi - lo, MAX_FREQUENCY - S as u64);
    }

    #[test]
    fn reset_restores_initial_shape() {
        let mut model = Model::new(256).unwrap();
        model.update(3);
        model.update(9);
        model.reset_model_symbols();
        assert_eq!(model.prev_symbol(), None);
        assert_eq!(model.current_table().total(), 256 * 128 + 2);
    }
}
