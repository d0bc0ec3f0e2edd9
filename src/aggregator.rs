// src/aggregator.rs
//
// The reward-aggregation state machine.
//
// Once per simulation tick the host calls `on_tick` with the current tick
// index and tick-scoped views over its input buffers. The aggregator adds the
// selected variant's contribution to a running accumulator and, on that
// variant's cadence boundary, writes the accumulated value to its output
// scalar, signals the sink (the host's device-mirror hook), resets the
// accumulator, and returns `Emitted`.
//
// The aggregator is single-threaded and non-reentrant: calls must be strictly
// sequential and tick-ordered. It never retains input references across ticks.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RewardConfig};
use crate::logging::RewardSink;
use crate::shaping::RewardVariant;

/// Tick-scoped read-only views over the host's input buffers.
///
/// The host must have refreshed these to the current tick's observation
/// before the call; the aggregator borrows them for the call only.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs<'a> {
    /// Observed agent state (label distribution or position).
    pub agent: &'a [f32],
    /// Goal state (label, position, or packed gridworld descriptor).
    pub target: &'a [f32],
    /// Terminal-event flag; required only by `PlanarPotential`.
    pub event: Option<f32>,
}

impl<'a> TickInputs<'a> {
    pub fn new(agent: &'a [f32], target: &'a [f32]) -> Self {
        Self {
            agent,
            target,
            event: None,
        }
    }

    pub fn with_event(agent: &'a [f32], target: &'a [f32], event: f32) -> Self {
        Self {
            agent,
            target,
            event: Some(event),
        }
    }
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EmitResult {
    /// Accumulator updated; output unchanged.
    NoEmission,
    /// One full window's accumulation was written to the output scalar
    /// (and the accumulator reset) before this value was produced.
    Emitted(f32),
}

impl EmitResult {
    /// Emitted value, if any.
    pub fn value(&self) -> Option<f32> {
        match self {
            EmitResult::NoEmission => None,
            EmitResult::Emitted(v) => Some(*v),
        }
    }
}

/// Which input buffer violated its minimum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Agent,
    Target,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Agent => "agent",
            InputKind::Target => "target",
        }
    }
}

/// Per-tick failures. These are caller bugs: the tick is lost but the
/// accumulator is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    InputTooShort {
        variant: RewardVariant,
        input: InputKind,
        required: usize,
        actual: usize,
    },
    MissingEvent {
        variant: RewardVariant,
    },
}

impl std::fmt::Display for TickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickError::InputTooShort {
                variant,
                input,
                required,
                actual,
            } => {
                write!(
                    f,
                    "{} input too short for variant {}: need {}, got {}",
                    input.as_str(),
                    variant.as_str(),
                    required,
                    actual
                )
            }
            TickError::MissingEvent { variant } => {
                write!(f, "variant {} requires the event flag", variant.as_str())
            }
        }
    }
}

impl std::error::Error for TickError {}

/// Stateful reward aggregator.
#[derive(Debug, Clone)]
pub struct RewardAggregator {
    cfg: RewardConfig,
    accumulator: f32,
    output: f32,
}

impl RewardAggregator {
    /// Create an aggregator with a validated config. The accumulator starts
    /// at zero and lives for the lifetime of the instance; it is only ever
    /// reset in place.
    pub fn new(cfg: RewardConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            accumulator: 0.0,
            output: 0.0,
        })
    }

    pub fn config(&self) -> &RewardConfig {
        &self.cfg
    }

    /// Current in-window accumulation.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Last emitted value (zero until the first emission).
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Process one simulation tick.
    ///
    /// `tick` is the host's global step index, monotonically non-decreasing.
    /// On a cadence boundary the accumulated value is written to the output
    /// scalar, `sink.on_emit` fires (strictly after the write), the
    /// accumulator resets to zero, and `Emitted` carries the value out.
    pub fn on_tick(
        &mut self,
        tick: u64,
        inputs: TickInputs<'_>,
        sink: &mut dyn RewardSink,
    ) -> Result<EmitResult, TickError> {
        self.check_bounds(&inputs)?;

        let variant = self.cfg.variant;
        if variant == RewardVariant::Unset {
            sink.notice(tick, "no reward calculation set");
            return Ok(EmitResult::NoEmission);
        }

        self.accumulator += variant.contribution(
            tick,
            self.cfg.window_len,
            self.cfg.label_space,
            inputs.agent,
            inputs.target,
            inputs.event,
        );

        if variant.should_emit(tick, self.cfg.window_len) {
            let value = self.accumulator;
            self.output = value;
            self.accumulator = 0.0;
            sink.on_emit(tick, value);
            Ok(EmitResult::Emitted(value))
        } else {
            Ok(EmitResult::NoEmission)
        }
    }

    /// Validate input lengths against the variant's required slices before
    /// touching any state.
    fn check_bounds(&self, inputs: &TickInputs<'_>) -> Result<(), TickError> {
        let variant = self.cfg.variant;

        let need_agent = variant.min_agent_len(self.cfg.label_space);
        if inputs.agent.len() < need_agent {
            return Err(TickError::InputTooShort {
                variant,
                input: InputKind::Agent,
                required: need_agent,
                actual: inputs.agent.len(),
            });
        }

        let need_target = variant.min_target_len();
        if inputs.target.len() < need_target {
            return Err(TickError::InputTooShort {
                variant,
                input: InputKind::Target,
                required: need_target,
                actual: inputs.target.len(),
            });
        }

        if variant.requires_event() && inputs.event.is_none() {
            return Err(TickError::MissingEvent { variant });
        }

        Ok(())
    }
}
