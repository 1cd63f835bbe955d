// Timing driver for `RedBlackTree`. Each round measures:
// * Ascending load of `keys` keys, then deleting the root until the tree is empty.
// * Random load of `keys` keys, then `keys` searches for other random keys.
// * Full ascending and descending walks.
// * `keys` calls each to the tree minimum and maximum.
//
// Usage: rbtree-bench [keys] [rounds]

#[macro_use]
extern crate serde_derive;

use log::{error, info, LevelFilter};
use rand::Rng;
use rbtree_index::{RedBlackTree, Result, Stats};
use simplelog::{Config, SimpleLogger};
use std::env;
use std::num::ParseIntError;
use std::process;
use std::time::{Duration, Instant};

struct BenchConfig {
    keys: usize,
    rounds: usize,
}

impl BenchConfig {
    fn from_args<I>(mut args: I) -> std::result::Result<Self, ParseIntError>
    where
        I: Iterator<Item = String>,
    {
        let mut config = BenchConfig::default();
        if let Some(keys) = args.next() {
            config.keys = keys.parse()?;
        }
        if let Some(rounds) = args.next() {
            config.rounds = rounds.parse()?;
        }
        Ok(config)
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            keys: 100_000,
            rounds: 10,
        }
    }
}

#[derive(Serialize)]
struct RoundReport {
    round: usize,
    elapsed_ms: f64,
    stats: Stats,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs() as f64 * 1000.0 + f64::from(duration.subsec_nanos()) / 1_000_000.0
}

fn run_round(keys: usize) -> Result<(Duration, Stats)> {
    let mut rng = rand::thread_rng();
    let inserted: Vec<u64> = (0..keys).map(|_| rng.gen()).collect();
    let searched: Vec<u64> = (0..keys).map(|_| rng.gen()).collect();
    let start = Instant::now();

    let mut tree = RedBlackTree::new();
    for key in 0..keys as u64 {
        tree.insert(key);
    }
    while let Some(root) = tree.root() {
        tree.try_delete(root)?;
    }

    let mut tree = RedBlackTree::new();
    for key in inserted {
        tree.insert(key);
    }
    let mut found = 0;
    for key in &searched {
        if tree.search(key).is_some() {
            found += 1;
        }
    }
    let mut checksum = 0u64;
    tree.walk_in_order(|key| checksum = checksum.wrapping_add(*key));
    tree.walk_reverse_in_order(|key| checksum = checksum.wrapping_sub(*key));
    for _ in 0..keys {
        tree.tree_minimum();
    }
    for _ in 0..keys {
        tree.tree_maximum();
    }

    let elapsed = start.elapsed();
    info!("found {} of {} searched keys, walk checksum {}", found, keys, checksum);
    let stats = tree.validate()?;
    Ok((elapsed, stats))
}

fn main() {
    if let Err(err) = SimpleLogger::init(LevelFilter::Info, Config::default()) {
        eprintln!("failed to install logger: {}", err);
    }

    let config = match BenchConfig::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            error!("invalid argument: {}", err);
            process::exit(2);
        },
    };

    for round in 0..config.rounds {
        match run_round(config.keys) {
            Ok((elapsed, stats)) => {
                let report = RoundReport {
                    round,
                    elapsed_ms: millis(elapsed),
                    stats,
                };
                match serde_json::to_string(&report) {
                    Ok(json) => info!("{}", json),
                    Err(err) => error!("failed to encode report: {}", err),
                }
            },
            Err(err) => {
                error!("round {} failed: {}", round, err);
                process::exit(1);
            },
        }
    }
}
