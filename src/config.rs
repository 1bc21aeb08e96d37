//! Filter sizing: table length and hash count from set size and bits per element

use crate::{hash::StrategyKind, BloomError, Result};

/// Scaling factor approximating ln(2) in `k = ln(2) * m / n`
const HASH_COUNT_SCALE: f64 = 0.69;

/// Largest table the 32-bit index arithmetic of the hash strategies can address
pub const MAX_TABLE_LENGTH: usize = i32::MAX as usize;

/// Immutable sizing parameters of a Bloom filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    set_size: usize,
    bits_per_element: usize,
    table_length: usize,
    hash_count: usize,
}

impl FilterConfig {
    /// Size a filter for the given hash strategy
    pub fn new(set_size: usize, bits_per_element: usize, kind: StrategyKind) -> Result<Self> {
        match kind {
            StrategyKind::Deterministic => Self::deterministic(set_size, bits_per_element),
            StrategyKind::Randomized => Self::randomized(set_size, bits_per_element),
        }
    }

    /// Table length is exactly `set_size * bits_per_element`
    pub fn deterministic(set_size: usize, bits_per_element: usize) -> Result<Self> {
        let table_length = requested_length(set_size, bits_per_element)?;

        Ok(FilterConfig {
            set_size,
            bits_per_element,
            table_length,
            hash_count: scaled_hash_count(bits_per_element),
        })
    }

    /// Table length is the first prime above `set_size * bits_per_element`.
    ///
    /// The hash count is recomputed from the adjusted length with integer
    /// division, `floor(0.69 * (m / n + 1)) + 1`, so both the effective bits
    /// per element and the hash count can only grow relative to the request.
    pub fn randomized(set_size: usize, bits_per_element: usize) -> Result<Self> {
        let requested = requested_length(set_size, bits_per_element)?;
        let table_length = next_prime(requested as u64)
            .map(|prime| prime as usize)
            .unwrap_or(usize::MAX);
        if table_length > MAX_TABLE_LENGTH {
            return Err(BloomError::InvalidConfiguration(format!(
                "No prime table length above {} fits in {} bits",
                requested, MAX_TABLE_LENGTH
            )));
        }

        Ok(FilterConfig {
            set_size,
            bits_per_element,
            table_length,
            hash_count: scaled_hash_count(table_length / set_size + 1),
        })
    }

    /// Expected number of elements
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    /// Requested bits per element
    pub fn bits_per_element(&self) -> usize {
        self.bits_per_element
    }

    /// Number of bits in the table
    pub fn table_length(&self) -> usize {
        self.table_length
    }

    /// Number of positions derived per key
    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    /// Bits per expected element after any table length adjustment
    pub fn effective_bits_per_element(&self) -> f64 {
        self.table_length as f64 / self.set_size as f64
    }

    /// Theoretical false positive rate after `inserted` elements
    pub fn expected_fpr(&self, inserted: usize) -> f64 {
        expected_fpr(self.table_length, self.hash_count, inserted)
    }
}

fn requested_length(set_size: usize, bits_per_element: usize) -> Result<usize> {
    if set_size == 0 {
        return Err(BloomError::InvalidConfiguration(
            "Set size must be > 0".to_string(),
        ));
    }
    if bits_per_element == 0 {
        return Err(BloomError::InvalidConfiguration(
            "Bits per element must be > 0".to_string(),
        ));
    }

    match set_size.checked_mul(bits_per_element) {
        Some(length) if length <= MAX_TABLE_LENGTH => Ok(length),
        _ => Err(BloomError::InvalidConfiguration(format!(
            "Table length {} x {} exceeds {}",
            set_size, bits_per_element, MAX_TABLE_LENGTH
        ))),
    }
}

fn scaled_hash_count(ratio: usize) -> usize {
    (HASH_COUNT_SCALE * ratio as f64) as usize + 1
}

/// `(1 - e^{-kn/m})^k` for `n` inserted elements
pub fn expected_fpr(table_length: usize, hash_count: usize, inserted: usize) -> f64 {
    if table_length == 0 {
        return 1.0;
    }
    let k = hash_count as f64;
    let exponent = -k * inserted as f64 / table_length as f64;
    (1.0 - exponent.exp()).powi(hash_count as i32)
}

/// Trial division over candidates of the form 6k ± 1
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5u64;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Smallest prime strictly greater than `n`, or `None` past the last
/// prime representable in a `u64`
pub fn next_prime(n: u64) -> Option<u64> {
    let mut candidate = n.checked_add(1)?;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_sizing() {
        let config = FilterConfig::deterministic(1000, 8).unwrap();
        assert_eq!(config.table_length(), 8000);
        assert_eq!(config.hash_count(), 6);

        let config = FilterConfig::deterministic(1000, 16).unwrap();
        assert_eq!(config.table_length(), 16000);
        assert_eq!(config.hash_count(), 12);
    }

    #[test]
    fn test_single_bit_per_element() {
        let config = FilterConfig::deterministic(10, 1).unwrap();
        assert_eq!(config.hash_count(), 1);
    }

    #[test]
    fn test_randomized_sizing() {
        let config = FilterConfig::randomized(10, 8).unwrap();
        assert_eq!(config.table_length(), 83);
        // 83 / 10 = 8, floor(0.69 * 9) + 1
        assert_eq!(config.hash_count(), 7);
        assert!(config.effective_bits_per_element() > 8.0);
    }

    #[test]
    fn test_randomized_skips_prime_product() {
        // 7 * 1 is prime itself; the search is strictly greater
        let config = FilterConfig::randomized(7, 1).unwrap();
        assert_eq!(config.table_length(), 11);
    }

    #[test]
    fn test_invalid_configuration() {
        for kind in [StrategyKind::Deterministic, StrategyKind::Randomized] {
            assert!(matches!(
                FilterConfig::new(0, 8, kind),
                Err(BloomError::InvalidConfiguration(_))
            ));
            assert!(matches!(
                FilterConfig::new(100, 0, kind),
                Err(BloomError::InvalidConfiguration(_))
            ));
            assert!(matches!(
                FilterConfig::new(usize::MAX, 2, kind),
                Err(BloomError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_randomized_prime_overflow() {
        // i32::MAX is prime, so the next prime above it does not fit
        assert!(FilterConfig::deterministic(1, MAX_TABLE_LENGTH).is_ok());
        assert!(FilterConfig::randomized(1, MAX_TABLE_LENGTH).is_err());
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..50).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
        assert!(is_prime(40009));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        assert!(!is_prime(121));
        assert!(is_prime(i32::MAX as u64));
    }

    #[test]
    fn test_is_prime_near_u64_max() {
        // smallest factors: 3, 13, 827 and 139646831
        assert!(!is_prime(u64::MAX));
        assert!(!is_prime(u64::MAX - 2));
        assert!(!is_prime(u64::MAX - 32));
        assert!(!is_prime(u64::MAX - 38));
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(80), Some(83));
        assert_eq!(next_prime(2), Some(3));
        assert_eq!(next_prime(0), Some(2));
        assert_eq!(next_prime(40000), Some(40009));
    }

    #[test]
    fn test_next_prime_past_u64_range() {
        // u64::MAX - 58 is the largest 64-bit prime
        assert_eq!(next_prime(u64::MAX), None);
        assert_eq!(next_prime(u64::MAX - 58), None);
    }

    #[test]
    fn test_expected_fpr() {
        let fpr = expected_fpr(40000, 6, 5000);
        assert!(fpr > 0.02 && fpr < 0.025);
        assert_eq!(expected_fpr(1000, 3, 0), 0.0);
    }
}
