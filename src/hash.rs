//! Hash strategies for string-keyed Bloom filters
//!
//! Both strategies reduce a key to two base values and expand them into `k`
//! table positions by double hashing, `g_i = (h1 + i * h2) mod m`. All
//! arithmetic is 32-bit signed and wrapping, and a negative remainder is
//! negated, so positions are reproducible bit-for-bit across platforms.

use crate::{config::FilterConfig, config::MAX_TABLE_LENGTH, BloomError, Result};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// FNV offset basis, 32-bit
pub const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
/// FNV prime, 32-bit
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Which hash strategy a filter is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Content hash, identical across runs
    Deterministic,
    /// Universal hash family with coefficients sampled per filter
    Randomized,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Deterministic => "deterministic",
            StrategyKind::Randomized => "randomized",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = BloomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "deterministic" | "det" => Ok(StrategyKind::Deterministic),
            "randomized" | "random" | "ran" => Ok(StrategyKind::Randomized),
            _ => Err(BloomError::InvalidParameter(format!(
                "Unknown hash strategy '{}', expected 'deterministic' or 'randomized'",
                s
            ))),
        }
    }
}

/// Capability shared by the hash strategies
pub trait HashStrategy: Send + Sync {
    /// The two base values combined by double hashing
    fn base_hashes(&self, key: &str) -> (i32, i32);

    /// Table length this strategy reduces into
    fn table_length(&self) -> usize;

    /// Get a name/identifier for this strategy
    fn name(&self) -> String;

    /// The `count` table positions of `key`, computed lazily
    fn positions(&self, key: &str, count: usize) -> Positions {
        let (first, second) = self.base_hashes(key);
        Positions::new(first, second, self.table_length() as i32, count)
    }
}

/// Iterator over double-hashed positions
#[derive(Debug, Clone)]
pub struct Positions {
    first: i32,
    second: i32,
    modulus: i32,
    next: usize,
    count: usize,
}

impl Positions {
    fn new(first: i32, second: i32, modulus: i32, count: usize) -> Self {
        Positions {
            first,
            second,
            modulus,
            next: 0,
            count,
        }
    }
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.count {
            return None;
        }
        let i = self.next as i32;
        self.next += 1;

        let raw = self.first.wrapping_add(self.second.wrapping_mul(i)) % self.modulus;
        // |raw| < modulus, so the negated remainder is a valid index
        Some(raw.unsigned_abs() as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

/// 32-bit FNV over the Unicode scalar values of `s`.
///
/// Each step XORs the character into the accumulator and then multiplies by
/// the FNV prime, wrapping at 2^32.
pub fn fnv32(s: &str) -> u32 {
    s.chars().fold(FNV_OFFSET_BASIS, |hash, c| {
        (hash ^ c as u32).wrapping_mul(FNV_PRIME)
    })
}

/// XOR of all characters, times the character count
pub fn mix(s: &str) -> i32 {
    let (folded, len) = s
        .chars()
        .fold((0i32, 0i32), |(acc, len), c| (acc ^ c as i32, len.wrapping_add(1)));
    folded.wrapping_mul(len)
}

/// Content-derived double hashing: `h1 = fnv32(s)`, `h2 = h1 * mix(s)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicStrategy {
    table_length: i32,
}

impl DeterministicStrategy {
    pub fn new(table_length: usize) -> Result<Self> {
        Ok(DeterministicStrategy {
            table_length: checked_length(table_length, 1)?,
        })
    }
}

impl HashStrategy for DeterministicStrategy {
    fn base_hashes(&self, key: &str) -> (i32, i32) {
        let a = fnv32(key) as i32;
        (a, a.wrapping_mul(mix(key)))
    }

    fn table_length(&self) -> usize {
        self.table_length as usize
    }

    fn name(&self) -> String {
        format!("fnv32-m{}", self.table_length)
    }
}

/// Two affine rolling hashes with coefficients sampled from `[0, m)`,
/// where the table length `m` is prime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomizedStrategy {
    table_length: i32,
    a1: i32,
    b1: i32,
    a2: i32,
    b2: i32,
}

impl RandomizedStrategy {
    /// Sample coefficients from `rng`. Pairs are redrawn until `a1 != a2`
    /// and `b1 != b2`.
    pub fn new<R: Rng + ?Sized>(table_length: usize, rng: &mut R) -> Result<Self> {
        let m = checked_length(table_length, 2)?;

        let (mut a1, mut a2) = (0, 0);
        while a1 == a2 {
            a1 = rng.gen_range(0..m);
            a2 = rng.gen_range(0..m);
        }

        let (mut b1, mut b2) = (0, 0);
        while b1 == b2 {
            b1 = rng.gen_range(0..m);
            b2 = rng.gen_range(0..m);
        }

        Ok(RandomizedStrategy {
            table_length: m,
            a1,
            b1,
            a2,
            b2,
        })
    }

    /// Build from known coefficients `(a1, b1, a2, b2)`
    pub fn with_coefficients(
        table_length: usize,
        a1: i32,
        b1: i32,
        a2: i32,
        b2: i32,
    ) -> Result<Self> {
        let m = checked_length(table_length, 2)?;
        if [a1, b1, a2, b2].iter().any(|&c| c < 0 || c >= m) {
            return Err(BloomError::InvalidParameter(format!(
                "Coefficients must lie in [0, {})",
                m
            )));
        }
        if a1 == a2 || b1 == b2 {
            return Err(BloomError::InvalidParameter(
                "Coefficient pairs must differ (a1 != a2, b1 != b2)".to_string(),
            ));
        }

        Ok(RandomizedStrategy {
            table_length: m,
            a1,
            b1,
            a2,
            b2,
        })
    }

    /// Sampled coefficients as `(a1, b1, a2, b2)`
    pub fn coefficients(&self) -> (i32, i32, i32, i32) {
        (self.a1, self.b1, self.a2, self.b2)
    }

    /// Rolling hash: for each character, `acc = (a + b * (acc ^ c)) mod m`
    pub fn rand_hash(&self, s: &str, a: i32, b: i32) -> i32 {
        s.chars().fold(0i32, |acc, c| {
            let acc = acc ^ c as i32;
            a.wrapping_add(b.wrapping_mul(acc)) % self.table_length
        })
    }
}

impl HashStrategy for RandomizedStrategy {
    fn base_hashes(&self, key: &str) -> (i32, i32) {
        (
            self.rand_hash(key, self.a1, self.b1),
            self.rand_hash(key, self.a2, self.b2),
        )
    }

    fn table_length(&self) -> usize {
        self.table_length as usize
    }

    fn name(&self) -> String {
        format!(
            "universal{}-{}/{}-{}-m{}",
            self.a1, self.b1, self.a2, self.b2, self.table_length
        )
    }
}

/// The strategy bound to a filter, dispatched without boxing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Deterministic(DeterministicStrategy),
    Randomized(RandomizedStrategy),
}

impl Strategy {
    /// Build the strategy matching `kind` for a sized filter
    pub fn for_config<R: Rng + ?Sized>(
        kind: StrategyKind,
        config: &FilterConfig,
        rng: &mut R,
    ) -> Result<Self> {
        match kind {
            StrategyKind::Deterministic => Ok(Strategy::Deterministic(
                DeterministicStrategy::new(config.table_length())?,
            )),
            StrategyKind::Randomized => Ok(Strategy::Randomized(RandomizedStrategy::new(
                config.table_length(),
                rng,
            )?)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Deterministic(_) => StrategyKind::Deterministic,
            Strategy::Randomized(_) => StrategyKind::Randomized,
        }
    }
}

impl HashStrategy for Strategy {
    fn base_hashes(&self, key: &str) -> (i32, i32) {
        match self {
            Strategy::Deterministic(s) => s.base_hashes(key),
            Strategy::Randomized(s) => s.base_hashes(key),
        }
    }

    fn table_length(&self) -> usize {
        match self {
            Strategy::Deterministic(s) => s.table_length(),
            Strategy::Randomized(s) => s.table_length(),
        }
    }

    fn name(&self) -> String {
        match self {
            Strategy::Deterministic(s) => s.name(),
            Strategy::Randomized(s) => s.name(),
        }
    }
}

fn checked_length(table_length: usize, min: usize) -> Result<i32> {
    if table_length < min || table_length > MAX_TABLE_LENGTH {
        return Err(BloomError::InvalidConfiguration(format!(
            "Table length must be in [{}, {}], got {}",
            min, MAX_TABLE_LENGTH, table_length
        )));
    }
    Ok(table_length as i32)
}
