//! Empirical false positive rate by repeated trials
//!
//! Each trial fills a fresh filter with distinct random words, then probes it
//! with random words that were never inserted and counts the hits.

use crate::{bloom::BloomFilter, hash::StrategyKind, BloomError, Result};
use fnv::FnvHashSet;
use rand::Rng;
use std::fmt;
use tracing::info;

/// Range of code points random words are drawn from, `'0'..='z'`
const WORD_CHARS: std::ops::RangeInclusive<u8> = 48..=122;

/// Draws allowed per distinct word before a trial gives up
const MAX_DRAWS_PER_WORD: usize = 1000;

/// Parameters of a false positive experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentConfig {
    pub kind: StrategyKind,
    pub bits_per_element: usize,
    pub trials: usize,
    /// Distinct words inserted per trial; also the filter's set size
    pub inserted: usize,
    /// Words probed per trial, none of them inserted
    pub probes: usize,
    /// Characters drawn per word, before punctuation is stripped
    pub word_length: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            kind: StrategyKind::Randomized,
            bits_per_element: 8,
            trials: 10,
            inserted: 5000,
            probes: 5000,
            word_length: 20,
        }
    }
}

impl ExperimentConfig {
    fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(BloomError::InvalidParameter(
                "Number of trials must be > 0".to_string(),
            ));
        }
        if self.probes == 0 {
            return Err(BloomError::InvalidParameter(
                "Number of probe words must be > 0".to_string(),
            ));
        }
        if self.word_length == 0 {
            return Err(BloomError::InvalidParameter(
                "Word length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a single trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub false_positives: usize,
    pub probes: usize,
    /// Table length of the trial's filter
    pub table_length: usize,
    pub hash_count: usize,
    /// `false_positives / probes`
    pub rate: f64,
    /// `(1 - e^{-kn/m})^k` for the trial's filter
    pub theoretical: f64,
}

/// Aggregate over all trials
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub config: ExperimentConfig,
    pub trials: Vec<TrialOutcome>,
    pub mean_rate: f64,
    pub mean_theoretical: f64,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "The average false positive rate is: {} for a {} bloom filter, with {} bits.",
            self.mean_rate, self.config.kind, self.config.bits_per_element
        )
    }
}

/// `length` random characters from `'0'..='z'` with the non-alphanumeric
/// ones removed, so words vary in length and may be empty
pub fn random_word<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| rng.gen_range(WORD_CHARS) as char)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Run one trial
pub fn run_trial<R: Rng + ?Sized>(
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<TrialOutcome> {
    config.validate()?;
    let mut filter =
        BloomFilter::with_rng(config.inserted, config.bits_per_element, config.kind, rng)?;

    // Keys are case-folded by the filter, so distinctness is judged the same way
    let mut added: FnvHashSet<String> = FnvHashSet::default();
    while added.len() < config.inserted {
        let word = distinct_word(config, rng, |word| !added.contains(word))?;
        filter.insert(&word);
        added.insert(word);
    }

    let mut false_positives = 0;
    for _ in 0..config.probes {
        let word = distinct_word(config, rng, |word| !added.contains(word))?;
        if filter.query(&word) {
            false_positives += 1;
        }
    }

    Ok(TrialOutcome {
        false_positives,
        probes: config.probes,
        table_length: filter.size(),
        hash_count: filter.hash_count(),
        rate: false_positives as f64 / config.probes as f64,
        theoretical: filter.theoretical_fpr(),
    })
}

/// Run every trial and average the rates
pub fn run<R: Rng + ?Sized>(config: &ExperimentConfig, rng: &mut R) -> Result<ExperimentReport> {
    config.validate()?;

    let mut trials = Vec::with_capacity(config.trials);
    for trial in 0..config.trials {
        let outcome = run_trial(config, rng)?;
        info!(
            trial,
            false_positives = outcome.false_positives,
            rate = outcome.rate,
            theoretical = outcome.theoretical,
            "finished trial"
        );
        trials.push(outcome);
    }

    let n = trials.len() as f64;
    let mean_rate = trials.iter().map(|t| t.rate).sum::<f64>() / n;
    let mean_theoretical = trials.iter().map(|t| t.theoretical).sum::<f64>() / n;

    Ok(ExperimentReport {
        config: *config,
        trials,
        mean_rate,
        mean_theoretical,
    })
}

/// Draw lower-cased random words until one passes `accept`
fn distinct_word<R, F>(config: &ExperimentConfig, rng: &mut R, accept: F) -> Result<String>
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    for _ in 0..MAX_DRAWS_PER_WORD {
        let word = random_word(rng, config.word_length).to_ascii_lowercase();
        if accept(&word) {
            return Ok(word);
        }
    }

    Err(BloomError::InvalidParameter(format!(
        "Could not draw a fresh word of length {} after {} attempts",
        config.word_length, MAX_DRAWS_PER_WORD
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_word() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let word = random_word(&mut rng, 20);
            assert!(word.len() <= 20);
            assert!(word.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        assert_eq!(random_word(&mut rng, 0), "");
    }

    #[test]
    fn test_default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.kind, StrategyKind::Randomized);
        assert_eq!(config.bits_per_element, 8);
        assert_eq!(config.trials, 10);
        assert_eq!(config.inserted, 5000);
        assert_eq!(config.probes, 5000);
        assert_eq!(config.word_length, 20);
    }

    #[test]
    fn test_small_experiment() {
        let config = ExperimentConfig {
            kind: StrategyKind::Deterministic,
            trials: 2,
            inserted: 200,
            probes: 200,
            ..ExperimentConfig::default()
        };
        let report = run(&config, &mut StdRng::seed_from_u64(9)).unwrap();

        assert_eq!(report.trials.len(), 2);
        for trial in &report.trials {
            assert_eq!(trial.probes, 200);
            assert_eq!(trial.table_length, 1600);
            assert_eq!(trial.hash_count, 6);
            assert!(trial.rate >= 0.0 && trial.rate <= 1.0);
        }
        assert!(report
            .to_string()
            .ends_with("for a deterministic bloom filter, with 8 bits."));
    }

    #[test]
    fn test_invalid_experiment() {
        let mut rng = StdRng::seed_from_u64(2);
        for config in [
            ExperimentConfig {
                trials: 0,
                ..ExperimentConfig::default()
            },
            ExperimentConfig {
                probes: 0,
                ..ExperimentConfig::default()
            },
            ExperimentConfig {
                word_length: 0,
                ..ExperimentConfig::default()
            },
        ] {
            assert!(matches!(
                run(&config, &mut rng),
                Err(BloomError::InvalidParameter(_))
            ));
        }

        let config = ExperimentConfig {
            inserted: 0,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            run(&config, &mut rng),
            Err(BloomError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_exhausted_word_space() {
        // One lower-cased alphanumeric character yields at most 37 distinct words
        let config = ExperimentConfig {
            inserted: 100,
            word_length: 1,
            ..ExperimentConfig::default()
        };
        let result = run_trial(&config, &mut StdRng::seed_from_u64(4));
        assert!(matches!(result, Err(BloomError::InvalidParameter(_))));
    }
}
