// src/harness.rs
//
// Deterministic synthetic-input episode runner.
//
// The kernel never produces its own inputs; in the host simulation they come
// from upstream nodes (a classifier head, a 2D world, a pendulum, a
// gridworld). This module stands in for that host: it generates per-variant
// agent/target/event streams from a seeded RNG and drives the aggregator for
// a fixed number of ticks, so the kernel can be exercised end to end and
// runs are reproducible given the seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::aggregator::{EmitResult, RewardAggregator, TickError, TickInputs};
use crate::config::{ConfigError, RewardConfig};
use crate::logging::RewardSink;
use crate::shaping::{RewardVariant, SPHERICAL_ANCHOR};

/// Configuration for one synthetic episode.
#[derive(Debug, Clone)]
pub struct EpisodeConfig {
    /// Random seed for deterministic input generation.
    pub seed: u64,
    /// Number of ticks to run. Ticks are numbered from 1.
    pub ticks: u64,
    /// Probability that the planar event flag fires on a given tick.
    pub event_rate: f64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            ticks: 1000,
            event_rate: 0.05,
        }
    }
}

impl EpisodeConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_event_rate(mut self, event_rate: f64) -> Self {
        self.event_rate = event_rate;
        self
    }
}

/// Summary of a completed episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Seed used.
    pub seed: u64,
    /// Total ticks executed.
    pub total_ticks: u64,
    /// Number of emissions observed.
    pub emissions: u64,
    /// Sum of all emitted window rewards.
    pub total_reward: f32,
    /// Mean emitted window reward (zero if nothing emitted).
    pub mean_window_reward: f32,
    /// Tick of the last emission, if any.
    pub last_emit_tick: Option<u64>,
}

/// Errors from running an episode.
#[derive(Debug, Clone, PartialEq)]
pub enum EpisodeError {
    Config(ConfigError),
    Tick { tick: u64, source: TickError },
}

impl std::fmt::Display for EpisodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeError::Config(e) => write!(f, "invalid config: {}", e),
            EpisodeError::Tick { tick, source } => {
                write!(f, "tick {} failed: {}", tick, source)
            }
        }
    }
}

impl std::error::Error for EpisodeError {}

impl From<ConfigError> for EpisodeError {
    fn from(e: ConfigError) -> Self {
        EpisodeError::Config(e)
    }
}

/// Synthetic generator for per-variant input buffers.
///
/// Buffers are sized for the selected variant and refreshed in place each
/// tick, mirroring how the host re-synchronises its memory blocks before
/// invoking the kernel.
pub struct SyntheticWorld {
    variant: RewardVariant,
    label_space: usize,
    rng: ChaCha8Rng,
    agent: Vec<f32>,
    target: Vec<f32>,
    event: Option<f32>,
}

impl SyntheticWorld {
    pub fn new(cfg: &RewardConfig, seed: u64) -> Self {
        let (agent_len, target_len, has_event) = match cfg.variant {
            RewardVariant::ClassificationAccuracy => (cfg.label_space, 1, false),
            RewardVariant::PlanarPotential => (2, 2, true),
            RewardVariant::SphericalPotential => (3, 0, false),
            RewardVariant::GridworldPotential => (0, 8, false),
            RewardVariant::Unset => (0, 0, false),
        };

        Self {
            variant: cfg.variant,
            label_space: cfg.label_space,
            rng: ChaCha8Rng::seed_from_u64(seed),
            agent: vec![0.0; agent_len],
            target: vec![0.0; target_len],
            event: if has_event { Some(0.0) } else { None },
        }
    }

    /// Refresh the buffers for the next tick; the host-side
    /// "synchronise inputs before the call" step.
    pub fn advance(&mut self, event_rate: f64) {
        match self.variant {
            RewardVariant::ClassificationAccuracy => {
                for v in self.agent.iter_mut() {
                    *v = self.rng.gen::<f32>();
                }
                self.target[0] = self.rng.gen_range(0..self.label_space) as f32;
            }
            RewardVariant::PlanarPotential => {
                for v in self.agent.iter_mut() {
                    *v = self.rng.gen_range(-10.0..10.0);
                }
                for v in self.target.iter_mut() {
                    *v = self.rng.gen_range(-10.0..10.0);
                }
                let fired = self.rng.gen_bool(event_rate.clamp(0.0, 1.0));
                self.event = Some(if fired { 1.0 } else { 0.0 });
            }
            RewardVariant::SphericalPotential => {
                for (v, anchor) in self.agent.iter_mut().zip(SPHERICAL_ANCHOR) {
                    *v = anchor + self.rng.gen_range(-4.0..4.0);
                }
            }
            RewardVariant::GridworldPotential => {
                // Agent cell, light flag, goal cell; remaining slots of the
                // packed descriptor stay zero.
                self.target[0] = self.rng.gen_range(0..10) as f32;
                self.target[1] = self.rng.gen_range(0..10) as f32;
                self.target[2] = if self.rng.gen_bool(0.5) { 1.0 } else { 0.0 };
                self.target[6] = self.rng.gen_range(0..10) as f32;
                self.target[7] = self.rng.gen_range(0..10) as f32;
            }
            RewardVariant::Unset => {}
        }
    }

    /// Tick-scoped views over the current buffers.
    pub fn inputs(&self) -> TickInputs<'_> {
        TickInputs {
            agent: &self.agent,
            target: &self.target,
            event: self.event,
        }
    }
}

/// Run one synthetic episode: construct the aggregator, drive it for
/// `ep.ticks` ticks (numbered from 1), and summarise the emissions.
pub fn run_episode(
    cfg: &RewardConfig,
    ep: &EpisodeConfig,
    sink: &mut dyn RewardSink,
) -> Result<EpisodeSummary, EpisodeError> {
    let mut agg = RewardAggregator::new(cfg.clone())?;
    let mut world = SyntheticWorld::new(cfg, ep.seed);

    let mut emissions = 0u64;
    let mut total_reward = 0.0f32;
    let mut last_emit_tick = None;

    for tick in 1..=ep.ticks {
        world.advance(ep.event_rate);
        let result = agg
            .on_tick(tick, world.inputs(), sink)
            .map_err(|source| EpisodeError::Tick { tick, source })?;

        if let EmitResult::Emitted(value) = result {
            emissions += 1;
            total_reward += value;
            last_emit_tick = Some(tick);
        }
    }

    let mean_window_reward = if emissions > 0 {
        total_reward / emissions as f32
    } else {
        0.0
    };

    Ok(EpisodeSummary {
        seed: ep.seed,
        total_ticks: ep.ticks,
        emissions,
        total_reward,
        mean_window_reward,
        last_emit_tick,
    })
}
