// src/bin/reward_sim.rs
//
// Research-harness CLI for the reward kernel.
//
// Drives the aggregator over synthetic per-variant inputs for a fixed number
// of ticks and prints a JSON episode summary. Deterministic given --seed.
//
// Config precedence: CLI flags override REWARDCORE_* environment variables,
// which override the built-in defaults (window 100, label space 10,
// classification variant).
//
// Run examples:
//   cargo run --bin reward_sim -- --variant spherical --ticks 500 --window 50 --seed 7
//   REWARDCORE_WINDOW_LEN=20 cargo run --bin reward_sim -- --variant planar -v
//   cargo run --bin reward_sim -- --variant gridworld --jsonl runs/grid.jsonl

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum};

use rewardcore::config::RewardConfig;
use rewardcore::harness::{run_episode, EpisodeConfig};
use rewardcore::logging::{FileSink, NoopSink, RewardSink};
use rewardcore::shaping::RewardVariant;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum VariantArg {
    Classification,
    Planar,
    Spherical,
    Gridworld,
    Unset,
}

impl From<VariantArg> for RewardVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Classification => RewardVariant::ClassificationAccuracy,
            VariantArg::Planar => RewardVariant::PlanarPotential,
            VariantArg::Spherical => RewardVariant::SphericalPotential,
            VariantArg::Gridworld => RewardVariant::GridworldPotential,
            VariantArg::Unset => RewardVariant::Unset,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "reward_sim",
    about = "Synthetic-input driver for the periodic reward-aggregation kernel",
    version
)]
struct Args {
    /// Number of synthetic ticks to run (ticks are numbered from 1).
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Reward-shaping variant (optional).
    /// If omitted, uses REWARDCORE_VARIANT (default classification).
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Ticks per emission window (optional).
    /// If omitted, uses REWARDCORE_WINDOW_LEN (default 100).
    #[arg(long)]
    window: Option<u64>,

    /// Label-space size for the classification variant (optional).
    #[arg(long)]
    label_space: Option<usize>,

    /// Deterministic seed for synthetic input generation.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Probability of the planar event flag firing on a given tick.
    #[arg(long, default_value_t = 0.05)]
    event_rate: f64,

    /// Write one JSON line per emission (and per notice) to this file.
    #[arg(long)]
    jsonl: Option<PathBuf>,

    /// Verbosity: -v prints each emission as it happens.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Sink that prints each emission to stdout (used with -v).
struct PrintSink;

impl RewardSink for PrintSink {
    fn on_emit(&mut self, tick: u64, value: f32) {
        println!("emit | tick={} | reward={}", tick, value);
    }

    fn notice(&mut self, tick: u64, msg: &str) {
        eprintln!("notice | tick={} | {}", tick, msg);
    }
}

fn main() {
    let args = Args::parse();

    // Env defaults, CLI overrides.
    let mut cfg = RewardConfig::from_env();
    if let Some(v) = args.variant {
        cfg.variant = v.into();
    }
    if let Some(w) = args.window {
        cfg.window_len = w;
    }
    if let Some(l) = args.label_space {
        cfg.label_space = l;
    }

    if let Err(e) = cfg.validate() {
        eprintln!("reward_sim: {e}");
        process::exit(2);
    }

    println!(
        "reward_sim | variant={} | window={} | label_space={} | ticks={} | seed={}",
        cfg.variant.as_str(),
        cfg.window_len,
        cfg.label_space,
        args.ticks,
        args.seed
    );

    let mut sink: Box<dyn RewardSink> = match &args.jsonl {
        Some(path) => match FileSink::create(path) {
            Ok(s) => Box::new(s),
            Err(e) => {
                eprintln!("reward_sim: cannot open {}: {e}", path.display());
                process::exit(2);
            }
        },
        None if args.verbose > 0 => Box::new(PrintSink),
        None => Box::new(NoopSink),
    };

    let ep = EpisodeConfig::default()
        .with_seed(args.seed)
        .with_ticks(args.ticks)
        .with_event_rate(args.event_rate);

    match run_episode(&cfg, &ep, sink.as_mut()) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("reward_sim: summary serialization failed: {e}"),
        },
        Err(e) => {
            eprintln!("reward_sim: {e}");
            process::exit(1);
        }
    }
}
