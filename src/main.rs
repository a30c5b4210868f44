use clap::{ArgAction, Parser};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use skipmap::{codec, Options, SharedSkipList, DEFAULT_MAX_LEVEL};
use std::path::PathBuf;
use std::time::Instant;

/// Mixed insert/delete/get workload against a shared skip list.
#[derive(Parser, Debug)]
#[command(name = "skipbench")]
struct Args {
    /// Worker threads
    #[arg(long, default_value_t = 8)]
    threads: u64,

    /// Operations per thread
    #[arg(long, default_value_t = 500_000)]
    ops: u64,

    /// Keys are drawn from 0..key_space
    #[arg(long, default_value_t = u32::MAX as u64)]
    key_space: u64,

    /// Base seed for the workload and the level oracle
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_MAX_LEVEL)]
    max_level: usize,

    /// Write the final list to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Default, Clone, Copy)]
struct WorkerStats {
    inserted: u64,
    deleted: u64,
    hits: u64,
    misses: u64,
}

impl WorkerStats {
    fn merge(mut self, other: WorkerStats) -> WorkerStats {
        self.inserted += other.inserted;
        self.deleted += other.deleted;
        self.hits += other.hits;
        self.misses += other.misses;
        self
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("SKIPMAP_LOG")
        .init();
}

fn run_worker(list: &SharedSkipList<u64, u64>, seed: u64, ops: u64, key_space: u64) -> WorkerStats {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = WorkerStats::default();
    for _ in 0..ops {
        // op and key come from separate draws so every op sees every key
        let key = rng.next_u64() % key_space;
        match rng.next_u32() % 3 {
            0 => {
                if list.insert(key, key) {
                    stats.inserted += 1;
                }
            }
            1 => {
                if list.delete(&key).is_some() {
                    stats.deleted += 1;
                }
            }
            _ => {
                if list.get(&key).is_some() {
                    stats.hits += 1;
                } else {
                    stats.misses += 1;
                }
            }
        }
    }
    stats
}

fn main() -> skipmap::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let seed = args.seed.unwrap_or_else(rand::random);
    let key_space = args.key_space.max(1);
    let options = Options::default().max_level(args.max_level).seed(seed);
    let list = SharedSkipList::with_options(options)?;
    log::info!(
        "running {} threads x {} ops, key space {}, seed {}",
        args.threads,
        args.ops,
        key_space,
        seed
    );

    let start = Instant::now();
    let stats = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..args.threads)
            .map(|t| {
                let list = list.clone();
                let ops = args.ops;
                s.spawn(move |_| run_worker(&list, seed.wrapping_add(t), ops, key_space))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker thread panicked"))
            .fold(WorkerStats::default(), WorkerStats::merge)
    })
    .expect("worker scope panicked");
    let elapsed = start.elapsed();

    let total = args.threads * args.ops;
    let secs = elapsed.as_secs_f64();
    let qps = if secs > 0.0 { total as f64 / secs } else { f64::INFINITY };

    println!("Total Execution Time: {} ms", elapsed.as_millis());
    println!("Total Operations: {}", total);
    println!("QPS: {:.0}", qps);
    println!("Final Size: {}", list.len());
    log::info!("{:?}", stats);

    if let Some(path) = &args.dump {
        let written = list.read(|l| codec::dump_to_file(l, path))?;
        log::info!("wrote {} entries to {}", written, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_worker;
    use skipmap::{Options, SharedSkipList};

    fn run(key_space: u64) -> (super::WorkerStats, usize) {
        let list = SharedSkipList::with_options(Options::default().seed(1)).unwrap();
        let stats = run_worker(&list, 1, 30_000, key_space);
        (stats, list.len())
    }

    #[test]
    fn test_mix_hits_inserted_keys() {
        let (stats, len) = run(1_000);
        assert!(stats.inserted > 0);
        assert!(stats.deleted > 0);
        assert!(stats.hits > 0);
        assert!(stats.misses > 0);
        assert_eq!(stats.inserted - stats.deleted, len as u64);
    }

    #[test]
    fn test_key_space_divisible_by_three() {
        // 999 and u32::MAX are both multiples of 3
        let (stats, _) = run(999);
        assert!(stats.deleted > 0);
        assert!(stats.hits > 0);
    }

    #[test]
    fn test_default_key_space_balances_ops() {
        let (stats, len) = run(u32::MAX as u64);
        let gets = stats.hits + stats.misses;
        assert!(stats.inserted > 9_000 && stats.inserted < 11_000);
        assert!(gets > 9_000 && gets < 11_000);
        assert_eq!(stats.inserted - stats.deleted, len as u64);
    }
}
