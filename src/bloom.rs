//! String-keyed Bloom filter
//!
//! A space-efficient probabilistic data structure for membership testing.
//! Keys are case-folded before hashing, so `"Foo"` and `"foo"` are the same key.

use crate::{
    config::FilterConfig,
    hash::{HashStrategy, Positions, Strategy, StrategyKind},
    table::BitTable,
    Result,
};
use rand::Rng;
use tracing::debug;

/// A Bloom filter over strings with a pluggable hash strategy
#[derive(Debug, Clone)]
pub struct BloomFilter {
    /// Bit array storing the filter data
    table: BitTable,
    /// Sizing the table and strategy were built from
    config: FilterConfig,
    /// Position generator, bound to `config.table_length()`
    strategy: Strategy,
    /// Number of insertions (for statistics)
    count: usize,
}

impl BloomFilter {
    /// Create a new Bloom filter
    ///
    /// # Arguments
    /// * `set_size` - Expected number of elements to insert
    /// * `bits_per_element` - Table bits per expected element
    /// * `kind` - Hash strategy; a randomized strategy draws its coefficients
    ///   from the thread-local generator
    pub fn new(set_size: usize, bits_per_element: usize, kind: StrategyKind) -> Result<Self> {
        Self::with_rng(set_size, bits_per_element, kind, &mut rand::thread_rng())
    }

    /// Create a Bloom filter drawing any random coefficients from `rng`
    pub fn with_rng<R: Rng + ?Sized>(
        set_size: usize,
        bits_per_element: usize,
        kind: StrategyKind,
        rng: &mut R,
    ) -> Result<Self> {
        let config = FilterConfig::new(set_size, bits_per_element, kind)?;
        let strategy = Strategy::for_config(kind, &config, rng)?;

        debug!(
            strategy = %strategy.name(),
            table_length = config.table_length(),
            hash_count = config.hash_count(),
            "created bloom filter"
        );

        Ok(BloomFilter {
            table: BitTable::new(config.table_length()),
            config,
            strategy,
            count: 0,
        })
    }

    /// Insert a key into the filter
    pub fn insert(&mut self, key: &str) {
        let key = key.to_lowercase();
        for position in self.strategy.positions(&key, self.config.hash_count()) {
            self.table.set(position);
        }

        self.count += 1;
    }

    /// Check if a key might be in the filter
    /// Returns true if the key might be present (with possible false positives)
    /// Returns false if the key is definitely not present
    pub fn query(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.strategy
            .positions(&key, self.config.hash_count())
            .all(|position| self.table.get(position))
    }

    /// Table positions of the case-folded key
    pub fn positions(&self, key: &str) -> Positions {
        self.strategy
            .positions(&key.to_lowercase(), self.config.hash_count())
    }

    /// Get the table length in bits
    pub fn size(&self) -> usize {
        self.config.table_length()
    }

    /// Get the number of insertions, duplicates included
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the number of positions set per key
    pub fn hash_count(&self) -> usize {
        self.config.hash_count()
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn table(&self) -> &BitTable {
        &self.table
    }

    /// Get the current load factor (fraction of bits set)
    pub fn load_factor(&self) -> f64 {
        self.table.count_ones() as f64 / self.table.len() as f64
    }

    /// False positive rate estimated from the observed load
    pub fn estimated_fpr(&self) -> f64 {
        self.load_factor().powi(self.hash_count() as i32)
    }

    /// False positive rate predicted by `(1 - e^{-kn/m})^k` at the current count
    pub fn theoretical_fpr(&self) -> f64 {
        self.config.expected_fpr(self.count)
    }

    /// Get statistics about the filter
    pub fn stats(&self) -> BloomStats {
        BloomStats {
            strategy: self.kind(),
            table_length: self.size(),
            num_hash_functions: self.hash_count(),
            elements_inserted: self.count,
            bits_set: self.table.count_ones(),
            load_factor: self.load_factor(),
            estimated_fpr: self.estimated_fpr(),
            theoretical_fpr: self.theoretical_fpr(),
        }
    }
}

/// Statistics about a Bloom filter
#[derive(Debug, Clone)]
pub struct BloomStats {
    pub strategy: StrategyKind,
    pub table_length: usize,
    pub num_hash_functions: usize,
    pub elements_inserted: usize,
    pub bits_set: usize,
    pub load_factor: f64,
    pub estimated_fpr: f64,
    pub theoretical_fpr: f64,
}

impl std::fmt::Display for BloomStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter Stats:\n\
             - Strategy: {}\n\
             - Table length: {} bits\n\
             - Hash functions: {}\n\
             - Elements inserted: {}\n\
             - Bits set: {}\n\
             - Load factor: {:.3}\n\
             - Estimated FPR: {:.6}\n\
             - Theoretical FPR: {:.6}",
            self.strategy,
            self.table_length,
            self.num_hash_functions,
            self.elements_inserted,
            self.bits_set,
            self.load_factor,
            self.estimated_fpr,
            self.theoretical_fpr
        )
    }
}
