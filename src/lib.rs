//! rewardcore: periodic reward aggregation for tick-driven RL simulations.
//!
//! The crate is built around a single stateful component, the
//! [`RewardAggregator`]: once per simulation tick the host scheduler hands it
//! the current tick index and read-only views over small float buffers
//! (agent state, target state, optional event flag). The aggregator applies
//! the configured reward-shaping variant, sums contributions into a running
//! accumulator, and on that variant's cadence boundary emits the accumulated
//! scalar and resets in place.
//!
//! # Architecture
//!
//! - **Shaping** (`shaping`): the closed set of reward-shaping strategies
//!   (classification accuracy, planar/spherical/gridworld potentials, plus
//!   the never-emitting `Unset` identity) with their per-variant emission
//!   predicates and input-length requirements.
//!
//! - **Aggregator** (`aggregator`): the accumulate/emit/reset state machine.
//!   Pure with respect to external time: the tick index is always an explicit
//!   parameter, never shared state.
//!
//! - **Logging** (`logging`): `RewardSink` is the host boundary for the
//!   emission mirror (write-then-sync) and for advisory diagnostics.
//!   Noop/memory/JSONL-file implementations are provided.
//!
//! - **Harness** (`harness`): deterministic synthetic-input episode runner
//!   used by the `reward_sim` binary and the integration tests.

pub mod aggregator;
pub mod config;
pub mod harness;
pub mod logging;
pub mod shaping;

// --- Re-exports for ergonomic external use ---------------------------------

pub use aggregator::{EmitResult, InputKind, RewardAggregator, TickError, TickInputs};
pub use config::{
    parse_variant, ConfigError, RewardConfig, DEFAULT_LABEL_SPACE, DEFAULT_WINDOW_LEN,
};
pub use harness::{run_episode, EpisodeConfig, EpisodeError, EpisodeSummary, SyntheticWorld};
pub use logging::{FileSink, MemorySink, NoopSink, RewardSink};
pub use shaping::RewardVariant;

// --- Window accumulation unit tests -----------------------------------------
