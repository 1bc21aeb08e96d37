//! # Bloom Search
//!
//! Bloom filters over strings with two interchangeable hash strategies, and a
//! small document index built on them for approximate full-text search.
//!
//! - [`hash::DeterministicStrategy`] derives positions from a 32-bit FNV hash
//!   and is identical across runs.
//! - [`hash::RandomizedStrategy`] samples a universal hash family per filter
//!   over a prime-sized table.
//!
//! ```
//! use bloom_search::{BloomFilter, StrategyKind};
//!
//! let mut filter = BloomFilter::new(100, 8, StrategyKind::Deterministic).unwrap();
//! filter.insert("Rust");
//! assert!(filter.query("rust"));
//! assert_eq!(filter.hash_count(), 6);
//! ```

pub mod bloom;
pub mod config;
pub mod document;
pub mod experiment;
pub mod hash;
pub mod search;
pub mod table;

pub use bloom::{BloomFilter, BloomStats};
pub use config::FilterConfig;
pub use document::DocumentFilter;
pub use experiment::{ExperimentConfig, ExperimentReport};
pub use hash::{DeterministicStrategy, HashStrategy, RandomizedStrategy, StrategyKind};
pub use search::{SearchIndex, SearchReport};
pub use table::BitTable;

// Python bindings
#[cfg(feature = "python")]
pub mod python_module;

/// Common error types for the library
#[derive(Debug)]
pub enum BloomError {
    /// Non-positive set size or bits per element, or a table too large to index
    InvalidConfiguration(String),
    /// A document filter was queried before its words were added
    UninitializedQuery(String),
    /// Unknown strategy name or unusable experiment setting
    InvalidParameter(String),
    /// Reading a document or listing a directory failed
    Io(std::io::Error),
}

impl std::fmt::Display for BloomError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BloomError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            BloomError::UninitializedQuery(msg) => write!(f, "Uninitialized query: {}", msg),
            BloomError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            BloomError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for BloomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BloomError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BloomError {
    fn from(err: std::io::Error) -> Self {
        BloomError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, BloomError>;
