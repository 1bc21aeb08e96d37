use bloom_search::experiment::{self, ExperimentConfig};
use bloom_search::search::DEFAULT_BITS_PER_WORD;
use bloom_search::{BloomFilter, HashStrategy, SearchIndex, StrategyKind};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bloom-search", about = "Bloom filter document search and experiments")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(ValueEnum, Clone, Copy)]
enum CliStrategy {
    Deterministic,
    Randomized,
}

impl From<CliStrategy> for StrategyKind {
    fn from(strategy: CliStrategy) -> Self {
        match strategy {
            CliStrategy::Deterministic => StrategyKind::Deterministic,
            CliStrategy::Randomized => StrategyKind::Randomized,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// List the files of DIR that might contain any of the terms
    Search {
        dir: PathBuf,
        #[arg(required = true)]
        terms: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_BITS_PER_WORD)]
        bits_per_word: usize,
        #[arg(long, value_enum, default_value_t = CliStrategy::Deterministic)]
        strategy: CliStrategy,
        /// Seed for randomized coefficients
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Measure the false positive rate with random words
    Fpr {
        #[arg(long, value_enum, default_value_t = CliStrategy::Randomized)]
        strategy: CliStrategy,
        #[arg(long, default_value_t = 8)]
        bits_per_element: usize,
        #[arg(long, default_value_t = 10)]
        trials: usize,
        #[arg(long, default_value_t = 5000)]
        words: usize,
        #[arg(long, default_value_t = 5000)]
        probes: usize,
        #[arg(long, default_value_t = 20)]
        length: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Also print each trial
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Show filter parameters and the positions of each key
    Probe {
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(long, default_value_t = 1000)]
        set_size: usize,
        #[arg(long, default_value_t = 8)]
        bits_per_element: usize,
        #[arg(long, value_enum, default_value_t = CliStrategy::Deterministic)]
        strategy: CliStrategy,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run(cli: Cli) -> bloom_search::Result<()> {
    match cli.cmd {
        Cmd::Search {
            dir,
            terms,
            bits_per_word,
            strategy,
            seed,
        } => {
            let mut rng = rng_from(seed);
            let index =
                SearchIndex::build_with_rng(&dir, bits_per_word, strategy.into(), &mut rng)?;
            let report = index.search(&terms)?;
            println!("{}", report);
        }

        Cmd::Fpr {
            strategy,
            bits_per_element,
            trials,
            words,
            probes,
            length,
            seed,
            verbose,
        } => {
            let config = ExperimentConfig {
                kind: strategy.into(),
                bits_per_element,
                trials,
                inserted: words,
                probes,
                word_length: length,
            };
            let report = experiment::run(&config, &mut rng_from(seed))?;

            if verbose {
                println!("trial,table_length,hash_count,false_positives,rate,theoretical");
                for (i, trial) in report.trials.iter().enumerate() {
                    println!(
                        "{},{},{},{},{:.6},{:.6}",
                        i,
                        trial.table_length,
                        trial.hash_count,
                        trial.false_positives,
                        trial.rate,
                        trial.theoretical
                    );
                }
            }
            println!("{}", report);
            println!("Theoretical rate: {:.6}", report.mean_theoretical);
        }

        Cmd::Probe {
            keys,
            set_size,
            bits_per_element,
            strategy,
            seed,
        } => {
            let mut rng = rng_from(seed);
            let filter =
                BloomFilter::with_rng(set_size, bits_per_element, strategy.into(), &mut rng)?;
            println!("strategy: {}", filter.strategy().name());
            println!("table length: {}", filter.size());
            println!("hash count: {}", filter.hash_count());
            for key in &keys {
                let positions: Vec<usize> = filter.positions(key).collect();
                println!("{}: {:?}", key, positions);
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
