//! Basic usage examples for bloom-search

use bloom_search::document::DocumentFilter;
use bloom_search::{BloomFilter, HashStrategy, StrategyKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Bloom Search Examples ===\n");

    // Example 1: Deterministic Bloom Filter
    println!("1. Deterministic Bloom Filter:");
    let mut bloom = BloomFilter::new(100, 8, StrategyKind::Deterministic)?;

    let words = ["apple", "Banana", "cherry", "date", "elderberry"];
    for word in &words {
        bloom.insert(word);
    }

    for word in &words {
        println!("  {} in filter: {}", word, bloom.query(word));
    }
    for word in &["fig", "grape", "BANANA"] {
        println!("  {} in filter: {}", word, bloom.query(word));
    }

    println!("  {}", bloom.stats());
    println!();

    // Example 2: Randomized Bloom Filter with a fixed seed
    println!("2. Randomized Bloom Filter:");
    let mut rng = StdRng::seed_from_u64(42);
    let mut random = BloomFilter::with_rng(100, 8, StrategyKind::Randomized, &mut rng)?;
    println!(
        "  requested {} bits, got prime table of {} bits",
        100 * 8,
        random.size()
    );
    println!("  strategy: {}", random.strategy().name());

    for word in &words {
        random.insert(word);
    }
    println!("  positions of 'apple': {:?}", random.positions("apple").collect::<Vec<_>>());
    println!("  {}", random.stats());
    println!();

    // Example 3: Document filter
    println!("3. Document filter:");
    let text = "Bloom filters answer membership queries with no false negatives.\n\
                They trade a small false positive rate for compact storage.";
    let mut document = DocumentFilter::from_text("notes.txt", text, 16, StrategyKind::Deterministic)?;
    match document.appears("bloom") {
        Ok(_) => println!("  queried before indexing?"),
        Err(err) => println!("  before indexing: {}", err),
    }

    let added = document.add_document();
    println!("  indexed {} distinct words in {} bits", added, document.filter_size());
    for term in &["bloom", "storage", "cuckoo"] {
        println!("  '{}' appears: {}", term, document.appears(term)?);
    }

    Ok(())
}
