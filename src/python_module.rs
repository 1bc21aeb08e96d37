//! Python bindings for bloom-search using PyO3

use crate::{config, BloomError, BloomFilter, DocumentFilter, HashStrategy, StrategyKind};
use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(err: BloomError) -> PyErr {
    match err {
        BloomError::Io(err) => PyIOError::new_err(err.to_string()),
        BloomError::UninitializedQuery(msg) => PyRuntimeError::new_err(msg),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn parse_kind(strategy: &str) -> PyResult<StrategyKind> {
    strategy.parse().map_err(to_py_err)
}

/// Python wrapper for BloomFilter
#[pyclass(name = "BloomFilter")]
struct PyBloomFilter {
    inner: BloomFilter,
}

#[pymethods]
impl PyBloomFilter {
    #[new]
    #[pyo3(signature = (set_size, bits_per_element, strategy = "deterministic"))]
    fn new(set_size: usize, bits_per_element: usize, strategy: &str) -> PyResult<Self> {
        let kind = parse_kind(strategy)?;
        let filter = BloomFilter::new(set_size, bits_per_element, kind).map_err(to_py_err)?;
        Ok(PyBloomFilter { inner: filter })
    }

    fn insert(&mut self, key: &str) {
        self.inner.insert(key);
    }

    fn query(&self, key: &str) -> bool {
        self.inner.query(key)
    }

    fn __contains__(&self, key: &str) -> bool {
        self.inner.query(key)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn __len__(&self) -> usize {
        self.inner.count()
    }

    fn hash_count(&self) -> usize {
        self.inner.hash_count()
    }

    fn strategy(&self) -> String {
        self.inner.strategy().name()
    }

    fn positions<'py>(&self, py: Python<'py>, key: &str) -> &'py PyArray1<usize> {
        let positions: Vec<usize> = self.inner.positions(key).collect();
        positions.into_pyarray(py)
    }

    fn load_factor(&self) -> f64 {
        self.inner.load_factor()
    }

    fn theoretical_fpr(&self) -> f64 {
        self.inner.theoretical_fpr()
    }

    fn stats(&self) -> String {
        self.inner.stats().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "BloomFilter(strategy={}, size={}, hashes={}, count={})",
            self.inner.kind(),
            self.inner.size(),
            self.inner.hash_count(),
            self.inner.count()
        )
    }
}

/// Python wrapper for DocumentFilter
#[pyclass(name = "DocumentFilter")]
struct PyDocumentFilter {
    inner: DocumentFilter,
}

#[pymethods]
impl PyDocumentFilter {
    #[new]
    #[pyo3(signature = (path, bits_per_word = 16, strategy = "deterministic"))]
    fn new(path: &str, bits_per_word: usize, strategy: &str) -> PyResult<Self> {
        let kind = parse_kind(strategy)?;
        let document = DocumentFilter::open(path, bits_per_word, kind).map_err(to_py_err)?;
        Ok(PyDocumentFilter { inner: document })
    }

    fn add_document(&mut self) -> usize {
        self.inner.add_document()
    }

    fn appears(&self, word: &str) -> PyResult<bool> {
        self.inner.appears(word).map_err(to_py_err)
    }

    fn appears_any(&self, words: Vec<String>) -> PyResult<bool> {
        self.inner.appears_any(&words).map_err(to_py_err)
    }

    fn document(&self) -> &str {
        self.inner.document()
    }

    fn filter_size(&self) -> usize {
        self.inner.filter_size()
    }

    fn data_size(&self) -> PyResult<usize> {
        self.inner.data_size().map_err(to_py_err)
    }

    fn num_hashes(&self) -> usize {
        self.inner.num_hashes()
    }
}

#[pyfunction]
fn next_prime(n: u64) -> Option<u64> {
    config::next_prime(n)
}

#[pyfunction]
fn is_prime(n: u64) -> bool {
    config::is_prime(n)
}

/// Python module definition
#[pymodule]
fn bloom_search(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyBloomFilter>()?;
    m.add_class::<PyDocumentFilter>()?;

    m.add_function(wrap_pyfunction!(next_prime, m)?)?;
    m.add_function(wrap_pyfunction!(is_prime, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
