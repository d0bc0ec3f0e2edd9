// src/config.rs
//
// Central configuration for the reward kernel.
//
// The config is immutable for the aggregator's lifetime: window length
// (ticks per emission cycle), label-space size (read only by the
// classification variant), and the selected reward-shaping variant.

use crate::shaping::RewardVariant;

/// Default ticks per emission cycle.
pub const DEFAULT_WINDOW_LEN: u64 = 100;

/// Default label-space size for the classification variant.
pub const DEFAULT_LABEL_SPACE: usize = 10;

/// Immutable aggregator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardConfig {
    /// Ticks per emission cycle. Must be >= 1.
    pub window_len: u64,
    /// Label-space size for `ClassificationAccuracy`. Must be >= 1.
    pub label_space: usize,
    /// Selected reward-shaping variant.
    pub variant: RewardVariant,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            label_space: DEFAULT_LABEL_SPACE,
            variant: RewardVariant::ClassificationAccuracy,
        }
    }
}

impl RewardConfig {
    /// Validate the config. Fatal at construction time if this fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_len == 0 {
            return Err(ConfigError::InvalidWindowLen { value: self.window_len });
        }
        if self.label_space == 0 {
            return Err(ConfigError::InvalidLabelSpace { value: self.label_space });
        }
        Ok(())
    }

    /// Build a config from defaults plus environment-variable overrides.
    ///
    /// Recognised variables:
    /// - `REWARDCORE_WINDOW_LEN`: u64 >= 1
    /// - `REWARDCORE_LABEL_SPACE`: usize >= 1
    /// - `REWARDCORE_VARIANT`: variant name (see `RewardVariant::parse`)
    ///   or legacy integer code 0..=4
    ///
    /// Unparseable values warn on stderr and keep the default, so a typo in
    /// an experiment script degrades loudly rather than silently.
    pub fn from_env() -> Self {
        use std::env;

        let mut cfg = RewardConfig::default();

        if let Ok(raw) = env::var("REWARDCORE_WINDOW_LEN") {
            match raw.parse::<u64>() {
                Ok(v) if v >= 1 => {
                    cfg.window_len = v;
                    eprintln!("[config] REWARDCORE_WINDOW_LEN = {v} (overrode default)");
                }
                _ => {
                    eprintln!(
                        "[config] WARN: could not parse REWARDCORE_WINDOW_LEN = {:?} as u64 >= 1; using default {}",
                        raw, cfg.window_len
                    );
                }
            }
        }

        if let Ok(raw) = env::var("REWARDCORE_LABEL_SPACE") {
            match raw.parse::<usize>() {
                Ok(v) if v >= 1 => {
                    cfg.label_space = v;
                    eprintln!("[config] REWARDCORE_LABEL_SPACE = {v} (overrode default)");
                }
                _ => {
                    eprintln!(
                        "[config] WARN: could not parse REWARDCORE_LABEL_SPACE = {:?} as usize >= 1; using default {}",
                        raw, cfg.label_space
                    );
                }
            }
        }

        if let Ok(raw) = env::var("REWARDCORE_VARIANT") {
            match parse_variant(&raw) {
                Ok(v) => {
                    cfg.variant = v;
                    eprintln!(
                        "[config] REWARDCORE_VARIANT = {} (overrode default)",
                        v.as_str()
                    );
                }
                Err(_) => {
                    eprintln!(
                        "[config] WARN: unrecognized REWARDCORE_VARIANT = {:?}; using default {}",
                        raw,
                        cfg.variant.as_str()
                    );
                }
            }
        }

        cfg
    }
}

/// Parse a variant selector: a name (see `RewardVariant::parse`) or a legacy
/// integer wire code. Anything outside the enumerated set is a config error.
pub fn parse_variant(raw: &str) -> Result<RewardVariant, ConfigError> {
    RewardVariant::parse(raw)
        .or_else(|| raw.trim().parse::<i64>().ok().and_then(RewardVariant::from_code))
        .ok_or_else(|| ConfigError::UnknownVariant { raw: raw.to_string() })
}

/// Errors surfaced when validating or parsing a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidWindowLen { value: u64 },
    InvalidLabelSpace { value: usize },
    UnknownVariant { raw: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidWindowLen { value } => {
                write!(f, "window_len must be >= 1, got {}", value)
            }
            ConfigError::InvalidLabelSpace { value } => {
                write!(f, "label_space must be >= 1, got {}", value)
            }
            ConfigError::UnknownVariant { raw } => {
                write!(f, "unrecognized reward variant {:?}", raw)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_host_defaults() {
        let cfg = RewardConfig::default();
        assert_eq!(cfg.window_len, 100);
        assert_eq!(cfg.label_space, 10);
        assert_eq!(cfg.variant, RewardVariant::ClassificationAccuracy);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let cfg = RewardConfig {
            window_len: 0,
            ..RewardConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidWindowLen { value: 0 })
        );
    }

    #[test]
    fn validate_rejects_zero_label_space() {
        let cfg = RewardConfig {
            label_space: 0,
            ..RewardConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidLabelSpace { value: 0 })
        );
    }

    #[test]
    fn parse_variant_accepts_names_and_codes() {
        assert_eq!(parse_variant("planar"), Ok(RewardVariant::PlanarPotential));
        assert_eq!(parse_variant("3"), Ok(RewardVariant::SphericalPotential));
        assert_eq!(parse_variant("0"), Ok(RewardVariant::Unset));
        assert_eq!(
            parse_variant("7"),
            Err(ConfigError::UnknownVariant { raw: "7".to_string() })
        );
        assert!(parse_variant("nope").is_err());
    }
}
