// src/shaping.rs
//
// Reward-shaping variants: the closed set of per-tick contribution rules and
// their emission cadences.
//
// Each variant reads a different slice of the agent/target buffers:
// - ClassificationAccuracy: agent label distribution vs. target label
// - PlanarPotential: 2D agent position vs. 2D target position + event flag
// - SphericalPotential: 3D agent position vs. a fixed anchor point
// - GridworldPotential: agent cell and goal cell, both packed into the
//   target buffer (the agent buffer is unused by this variant)
// - Unset: identity strategy; contributes nothing and never emits

use serde::{Deserialize, Serialize};

/// Fixed anchor for the spherical (pendulum) potential, in world units.
pub const SPHERICAL_ANCHOR: [f32; 3] = [0.0, 8.0, 0.0];

/// Squared normalisation constant for the spherical potential. The per-tick
/// contribution is `(sqrt(128) - dist) / sqrt(128)`.
pub const SPHERICAL_NORM_SQ: f32 = 128.0;

/// Selected reward-shaping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardVariant {
    ClassificationAccuracy,
    PlanarPotential,
    SphericalPotential,
    GridworldPotential,
    Unset,
}

impl RewardVariant {
    /// Return a stable lowercase name for the variant (used in logs/CLI).
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardVariant::ClassificationAccuracy => "classification",
            RewardVariant::PlanarPotential => "planar",
            RewardVariant::SphericalPotential => "spherical",
            RewardVariant::GridworldPotential => "gridworld",
            RewardVariant::Unset => "unset",
        }
    }

    /// Parse a variant name (case-insensitive). Returns None if unrecognized.
    pub fn parse(s: &str) -> Option<RewardVariant> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classification" | "class" | "mnist" => Some(RewardVariant::ClassificationAccuracy),
            "planar" | "2d" => Some(RewardVariant::PlanarPotential),
            "spherical" | "pendulum" => Some(RewardVariant::SphericalPotential),
            "gridworld" | "grid" => Some(RewardVariant::GridworldPotential),
            "unset" | "none" => Some(RewardVariant::Unset),
            _ => None,
        }
    }

    /// Map a legacy integer wire code (as stored in host graph configs) to a
    /// variant. Code 0 is the explicit "unset" selection; codes outside the
    /// enumerated set are rejected at config time.
    pub fn from_code(code: i64) -> Option<RewardVariant> {
        match code {
            0 => Some(RewardVariant::Unset),
            1 => Some(RewardVariant::ClassificationAccuracy),
            2 => Some(RewardVariant::PlanarPotential),
            3 => Some(RewardVariant::SphericalPotential),
            4 => Some(RewardVariant::GridworldPotential),
            _ => None,
        }
    }

    /// Legacy integer wire code for this variant.
    pub fn code(&self) -> i64 {
        match self {
            RewardVariant::Unset => 0,
            RewardVariant::ClassificationAccuracy => 1,
            RewardVariant::PlanarPotential => 2,
            RewardVariant::SphericalPotential => 3,
            RewardVariant::GridworldPotential => 4,
        }
    }

    /// Minimum agent-buffer length this variant reads.
    pub fn min_agent_len(&self, label_space: usize) -> usize {
        match self {
            RewardVariant::ClassificationAccuracy => label_space,
            RewardVariant::PlanarPotential => 2,
            RewardVariant::SphericalPotential => 3,
            RewardVariant::GridworldPotential => 0,
            RewardVariant::Unset => 0,
        }
    }

    /// Minimum target-buffer length this variant reads.
    pub fn min_target_len(&self) -> usize {
        match self {
            RewardVariant::ClassificationAccuracy => 1,
            RewardVariant::PlanarPotential => 2,
            RewardVariant::SphericalPotential => 0,
            RewardVariant::GridworldPotential => 8,
            RewardVariant::Unset => 0,
        }
    }

    /// Whether this variant requires the event flag each tick.
    pub fn requires_event(&self) -> bool {
        matches!(self, RewardVariant::PlanarPotential)
    }

    /// Emission predicate for this variant.
    ///
    /// ClassificationAccuracy emits on `tick % window == 0`; the potential
    /// variants emit on `(tick - 1) % window == 0`. The off-by-one between
    /// them is inherited host behaviour and each predicate is kept
    /// variant-specific on purpose.
    pub fn should_emit(&self, tick: u64, window_len: u64) -> bool {
        if tick == 0 {
            return false;
        }
        match self {
            RewardVariant::ClassificationAccuracy => tick % window_len == 0,
            RewardVariant::PlanarPotential
            | RewardVariant::SphericalPotential
            | RewardVariant::GridworldPotential => (tick - 1) % window_len == 0,
            RewardVariant::Unset => false,
        }
    }

    /// Per-tick reward contribution.
    ///
    /// Callers must have bounds-checked the buffers against
    /// `min_agent_len` / `min_target_len` / `requires_event` first; slices
    /// here are indexed directly.
    pub(crate) fn contribution(
        &self,
        tick: u64,
        window_len: u64,
        label_space: usize,
        agent: &[f32],
        target: &[f32],
        event: Option<f32>,
    ) -> f32 {
        match self {
            RewardVariant::ClassificationAccuracy => {
                // Scan with a strict `>` against a running max that starts at
                // zero, so ties resolve to the lowest index and an
                // all-non-positive distribution resolves to label 0.
                let mut max = 0.0_f32;
                let mut label = 0usize;
                for (i, &v) in agent[..label_space].iter().enumerate() {
                    if v > max {
                        max = v;
                        label = i;
                    }
                }
                if label as i64 == target[0].round() as i64 {
                    1.0
                } else {
                    0.0
                }
            }
            RewardVariant::PlanarPotential => {
                let dist = euclid2(agent[0], agent[1], target[0], target[1]);
                let mut r = 0.0;
                if dist != 0.0 {
                    r += 1.0 / dist;
                }
                // Goal-reached bonus, independent of the distance branch.
                if event == Some(1.0) {
                    r += 1.0;
                }
                r
            }
            RewardVariant::SphericalPotential => {
                let dist = euclid3(
                    agent[0],
                    agent[1],
                    agent[2],
                    SPHERICAL_ANCHOR[0],
                    SPHERICAL_ANCHOR[1],
                    SPHERICAL_ANCHOR[2],
                );
                let norm = SPHERICAL_NORM_SQ.sqrt();
                (norm - dist) / norm
            }
            RewardVariant::GridworldPotential => {
                // Agent cell and goal cell both live in the target buffer.
                let dist = euclid2(target[0], target[1], target[6], target[7]);
                let mut r = 0.0;
                if dist > 1.0 {
                    r += 1.0 / dist;
                } else if dist >= 0.0 {
                    r += 1.0 - dist;
                }
                // Light-off bonus. The host evaluates `(tick - 1) % window`
                // with a signed tick, so tick 0 yields -1 and passes the
                // `!= 1` exclusion; mirror that with an explicit tick-0 arm.
                if target[2] == 0.0 && (tick == 0 || (tick - 1) % window_len != 1) {
                    r += 2.0;
                }
                r
            }
            RewardVariant::Unset => 0.0,
        }
    }
}

fn euclid2(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}

fn euclid3(ax: f32, ay: f32, az: f32, bx: f32, by: f32, bz: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    let dz = az - bz;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
