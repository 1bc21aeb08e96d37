//! Approximate full-text search across a directory of text files

use crate::{document::DocumentFilter, hash::StrategyKind, BloomError, Result};
use rand::Rng;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Bits per distinct word used by the command-line search
pub const DEFAULT_BITS_PER_WORD: usize = 16;

/// One indexed filter per file of a directory
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    documents: Vec<DocumentFilter>,
}

impl SearchIndex {
    /// Index every regular file directly inside `dir`
    pub fn build<P: AsRef<Path>>(
        dir: P,
        bits_per_word: usize,
        kind: StrategyKind,
    ) -> Result<Self> {
        Self::build_with_rng(dir, bits_per_word, kind, &mut rand::thread_rng())
    }

    /// Index `dir`, drawing randomized coefficients from `rng`.
    ///
    /// Files are visited in name order. A file that cannot be read is logged
    /// and skipped; a `dir` that cannot be listed is an error.
    pub fn build_with_rng<P: AsRef<Path>, R: Rng + ?Sized>(
        dir: P,
        bits_per_word: usize,
        kind: StrategyKind,
        rng: &mut R,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut index = SearchIndex::default();
        for path in paths {
            match DocumentFilter::open_with_rng(&path, bits_per_word, kind, rng) {
                Ok(mut document) => {
                    document.add_document();
                    index.documents.push(document);
                }
                Err(BloomError::Io(err)) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            dir = %dir.display(),
            documents = index.documents.len(),
            "built search index"
        );
        Ok(index)
    }

    /// Add an already indexed document
    pub fn push(&mut self, document: DocumentFilter) -> Result<()> {
        if !document.is_indexed() {
            return Err(BloomError::UninitializedQuery(format!(
                "document '{}' has not been indexed",
                document.document()
            )));
        }
        self.documents.push(document);
        Ok(())
    }

    /// Documents that might contain at least one of `terms`
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Result<SearchReport> {
        if terms.is_empty() {
            return Err(BloomError::InvalidParameter(
                "At least one search term is required".to_string(),
            ));
        }

        let mut matches = Vec::new();
        for document in &self.documents {
            if document.appears_any(terms)? {
                matches.push(document.document().to_string());
            }
        }

        Ok(SearchReport {
            matches,
            total_bits: self.total_bits(),
        })
    }

    /// Bits used across every document filter
    pub fn total_bits(&self) -> usize {
        self.documents.iter().map(DocumentFilter::filter_size).sum()
    }

    pub fn documents(&self) -> &[DocumentFilter] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Result of a search over an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// Names of documents reporting a possible match
    pub matches: Vec<String>,
    /// Bits used across all filters of the index
    pub total_bits: usize,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[{}]", self.matches.join(", "))?;
        write!(f, "Total number of bits used: {}", self.total_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("animals.txt"), "The zebra and the giraffe.").unwrap();
        fs::write(dir.path().join("fruit.txt"), "Apples, oranges and bananas").unwrap();
        fs::write(dir.path().join("mixed.txt"), "A zebra eating bananas").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("hidden.txt"), "zebra").unwrap();
        dir
    }

    #[test]
    fn test_build_and_search() {
        let dir = corpus();
        let index = SearchIndex::build(dir.path(), 16, StrategyKind::Deterministic).unwrap();
        assert_eq!(index.len(), 3);

        let report = index.search(&["zebra"]).unwrap();
        assert!(report.matches.contains(&"animals.txt".to_string()));
        assert!(report.matches.contains(&"mixed.txt".to_string()));
        assert!(!report.matches.iter().any(|m| m == "hidden.txt"));

        // animals: 2 words, fruit: 3 words, mixed: 3 words
        assert_eq!(report.total_bits, (2 + 3 + 3) * 16);
    }

    #[test]
    fn test_search_any_term() {
        let dir = corpus();
        let mut rng = StdRng::seed_from_u64(5);
        let index =
            SearchIndex::build_with_rng(dir.path(), 16, StrategyKind::Randomized, &mut rng)
                .unwrap();

        let report = index.search(&["GIRAFFE", "oranges"]).unwrap();
        assert!(report.matches.contains(&"animals.txt".to_string()));
        assert!(report.matches.contains(&"fruit.txt".to_string()));
    }

    #[test]
    fn test_matches_in_name_order() {
        let dir = corpus();
        let index = SearchIndex::build(dir.path(), 16, StrategyKind::Deterministic).unwrap();
        let names: Vec<&str> = index.documents().iter().map(|d| d.document()).collect();
        assert_eq!(names, vec!["animals.txt", "fruit.txt", "mixed.txt"]);
    }

    #[test]
    fn test_empty_terms() {
        let index = SearchIndex::default();
        assert!(matches!(
            index.search::<&str>(&[]),
            Err(BloomError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_missing_directory() {
        let result = SearchIndex::build("/definitely/not/here", 16, StrategyKind::Deterministic);
        assert!(matches!(result, Err(BloomError::Io(_))));
    }

    #[test]
    fn test_push_requires_indexed_document() {
        let mut index = SearchIndex::default();
        let mut doc =
            DocumentFilter::from_text("a.txt", "hello world", 8, StrategyKind::Deterministic)
                .unwrap();
        assert!(index.push(doc.clone()).is_err());

        doc.add_document();
        index.push(doc).unwrap();
        assert_eq!(index.total_bits(), 16);
    }

    #[test]
    fn test_report_display() {
        let report = SearchReport {
            matches: vec!["a.txt".to_string(), "b.txt".to_string()],
            total_bits: 160,
        };
        assert_eq!(
            report.to_string(),
            "[a.txt, b.txt]\nTotal number of bits used: 160"
        );
    }
}
