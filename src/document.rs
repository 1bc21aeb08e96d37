//! Per-document Bloom filters over a text file's vocabulary

use crate::{bloom::BloomFilter, hash::StrategyKind, BloomError, Result};
use fnv::FnvHashSet;
use rand::Rng;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Words shorter than this are dropped
const MIN_WORD_LEN: usize = 3;

/// Common words that carry no search value
pub const STOP_WORDS: [&str; 11] = [
    "are", "with", "the", "can", "has", "had", "let", "like", "that", "for", "and",
];

/// Check a lower-cased word against [`STOP_WORDS`]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Split text into searchable words.
///
/// Anything other than ASCII letters, digits and spaces becomes a space, the
/// result is lower-cased and split on whitespace, and short words and stop
/// words are dropped. Duplicates are kept.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().flat_map(|line| {
        let cleaned: String = line
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == ' ' {
                    c.to_ascii_lowercase()
                } else {
                    ' '
                }
            })
            .collect();

        cleaned
            .split_whitespace()
            .filter(|word| word.len() >= MIN_WORD_LEN && !is_stop_word(word))
            .map(str::to_string)
            .collect::<Vec<_>>()
    })
}

/// Distinct tokens of `text` in first-seen order
pub fn vocabulary(text: &str) -> Vec<String> {
    let mut seen = FnvHashSet::default();
    tokenize(text)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// A Bloom filter holding one document's vocabulary.
///
/// The filter is sized from the vocabulary when the document is opened, but
/// can only be queried after [`DocumentFilter::add_document`] has run.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    name: String,
    filter: BloomFilter,
    pending: Vec<String>,
    indexed: bool,
}

impl DocumentFilter {
    /// Read a text file and size a filter for its distinct words
    pub fn open<P: AsRef<Path>>(
        path: P,
        bits_per_word: usize,
        kind: StrategyKind,
    ) -> Result<Self> {
        Self::open_with_rng(path, bits_per_word, kind, &mut rand::thread_rng())
    }

    pub fn open_with_rng<P: AsRef<Path>, R: Rng + ?Sized>(
        path: P,
        bits_per_word: usize,
        kind: StrategyKind,
        rng: &mut R,
    ) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_text_with_rng(name, &text, bits_per_word, kind, rng)
    }

    /// Size a filter for the distinct words of in-memory text
    pub fn from_text(
        name: impl Into<String>,
        text: &str,
        bits_per_word: usize,
        kind: StrategyKind,
    ) -> Result<Self> {
        Self::from_text_with_rng(name, text, bits_per_word, kind, &mut rand::thread_rng())
    }

    pub fn from_text_with_rng<R: Rng + ?Sized>(
        name: impl Into<String>,
        text: &str,
        bits_per_word: usize,
        kind: StrategyKind,
        rng: &mut R,
    ) -> Result<Self> {
        let pending = vocabulary(text);
        // A document without searchable words still gets a one-element filter
        let set_size = pending.len().max(1);
        let filter = BloomFilter::with_rng(set_size, bits_per_word, kind, rng)?;

        Ok(DocumentFilter {
            name: name.into(),
            filter,
            pending,
            indexed: false,
        })
    }

    /// Insert the document's words. Returns how many were inserted; a second
    /// call inserts nothing.
    pub fn add_document(&mut self) -> usize {
        let words = std::mem::take(&mut self.pending);
        for word in &words {
            self.filter.insert(word);
        }
        self.indexed = true;

        debug!(
            document = %self.name,
            words = words.len(),
            bits = self.filter.size(),
            "indexed document"
        );
        words.len()
    }

    /// Check whether the document might contain `word`
    pub fn appears(&self, word: &str) -> Result<bool> {
        self.ensure_indexed()?;
        Ok(self.filter.query(word))
    }

    /// Check whether the document might contain any of `words`
    pub fn appears_any<S: AsRef<str>>(&self, words: &[S]) -> Result<bool> {
        self.ensure_indexed()?;
        Ok(words.iter().any(|word| self.filter.query(word.as_ref())))
    }

    /// Name of the document, the file name when opened from disk
    pub fn document(&self) -> &str {
        &self.name
    }

    /// Filter size in bits
    pub fn filter_size(&self) -> usize {
        self.filter.size()
    }

    /// Number of words inserted
    pub fn data_size(&self) -> Result<usize> {
        self.ensure_indexed()?;
        Ok(self.filter.count())
    }

    pub fn num_hashes(&self) -> usize {
        self.filter.hash_count()
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    fn ensure_indexed(&self) -> Result<()> {
        if self.indexed {
            Ok(())
        } else {
            Err(BloomError::UninitializedQuery(format!(
                "add_document() must run before querying '{}'",
                self.name
            )))
        }
    }
}
