//! Mutation-rate adaptation on stagnation
//!
//! A generation counts as progress when it produced a new run-wide best
//! fitness. After `stagnation_window` generations without progress the rate is
//! raised one step (smaller steps once the target has been hit); any progress
//! drops it back to the baseline.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationPolicyConfig {
    /// Rate restored after a generation with progress
    pub baseline: f32,
    /// Stagnant generations before the rate is raised
    pub stagnation_window: u32,
    /// Step and ceiling once any agent has reached the target
    pub reached_increment: f32,
    pub reached_cap: f32,
    /// Step and ceiling while the target has never been reached
    pub unreached_increment: f32,
    pub unreached_cap: f32,
}

impl Default for MutationPolicyConfig {
    fn default() -> Self {
        Self {
            baseline: 0.01,
            stagnation_window: 5,
            reached_increment: 0.01,
            reached_cap: 0.02,
            unreached_increment: 0.02,
            unreached_cap: 0.05,
        }
    }
}

impl MutationPolicyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stagnation_window == 0 {
            return Err(ConfigError::InvalidPolicy(
                "stagnation window must be at least 1".to_string(),
            ));
        }
        let values = [
            ("baseline", self.baseline),
            ("reached_increment", self.reached_increment),
            ("reached_cap", self.reached_cap),
            ("unreached_increment", self.unreached_increment),
            ("unreached_cap", self.unreached_cap),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPolicy(format!(
                    "{name} must be a finite value >= 0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// What the policy did at a generation end
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateChange {
    /// Progress was made; rate back at baseline
    Reset,
    /// Still stagnating, rate unchanged
    Unchanged,
    /// Stagnation window filled; rate raised from `from` to `to`
    Raised { from: f32, to: f32 },
}

/// Stagnation counter and current mutation rate
#[derive(Debug, Clone)]
pub struct MutationPolicy {
    config: MutationPolicyConfig,
    rate: f32,
    stagnation_counter: u32,
}

impl MutationPolicy {
    pub fn new(config: MutationPolicyConfig, initial_rate: f32) -> Self {
        Self {
            config,
            rate: initial_rate,
            stagnation_counter: 0,
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn stagnation_counter(&self) -> u32 {
        self.stagnation_counter
    }

    /// Apply the policy for one finished generation
    pub fn on_generation_end(&mut self, progress: bool, target_reached: bool) -> RateChange {
        if progress {
            self.rate = self.config.baseline;
            self.stagnation_counter = 0;
            return RateChange::Reset;
        }

        self.stagnation_counter += 1;
        if self.stagnation_counter < self.config.stagnation_window {
            return RateChange::Unchanged;
        }
        self.stagnation_counter = 0;

        let (increment, cap) = if target_reached {
            (self.config.reached_increment, self.config.reached_cap)
        } else {
            (self.config.unreached_increment, self.config.unreached_cap)
        };
        if self.rate >= cap {
            return RateChange::Unchanged;
        }

        let from = self.rate;
        self.rate = (self.rate + increment).min(cap);
        RateChange::Raised {
            from,
            to: self.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> MutationPolicy {
        MutationPolicy::new(MutationPolicyConfig::default(), 0.01)
    }

    #[test]
    fn test_raises_after_window() {
        let mut policy = policy();
        for _ in 0..4 {
            assert_eq!(policy.on_generation_end(false, false), RateChange::Unchanged);
        }
        assert_eq!(policy.stagnation_counter(), 4);

        let change = policy.on_generation_end(false, false);
        assert!(matches!(change, RateChange::Raised { .. }));
        assert!((policy.rate() - 0.03).abs() < 1e-6);
        assert_eq!(policy.stagnation_counter(), 0);
    }

    #[test]
    fn test_smaller_step_after_target_reached() {
        let mut policy = policy();
        for _ in 0..5 {
            policy.on_generation_end(false, true);
        }
        assert!((policy.rate() - 0.02).abs() < 1e-6);

        // Already at cap
        for _ in 0..5 {
            policy.on_generation_end(false, true);
        }
        assert!((policy.rate() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_unreached_cap() {
        let mut policy = policy();
        for _ in 0..50 {
            policy.on_generation_end(false, false);
        }
        assert!((policy.rate() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_progress_resets() {
        let mut policy = policy();
        for _ in 0..5 {
            policy.on_generation_end(false, false);
        }
        policy.on_generation_end(false, false);
        assert_eq!(policy.stagnation_counter(), 1);

        assert_eq!(policy.on_generation_end(true, false), RateChange::Reset);
        assert_eq!(policy.rate(), 0.01);
        assert_eq!(policy.stagnation_counter(), 0);
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = MutationPolicyConfig {
            stagnation_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(MutationPolicyConfig::default().validate().is_ok());
    }
}
