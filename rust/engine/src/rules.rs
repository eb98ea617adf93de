use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::soil::DEFAULT_SOIL_COUNT;

/// Seeds drawn into the hand at the start of every round
pub const HAND_SIZE: usize = 5;
/// Score goal of the first round
pub const STARTING_GOAL: u64 = 10;
/// Goal increase applied by `next_round`
pub const GOAL_STEP: u64 = 50;
/// Coins granted once when a round is won
pub const COINS_PER_ROUND: u32 = 50;
/// Delay between two harvest animation beats
pub const STEP_DELAY_MS: u64 = 300;
/// Delay between a won hand and the round-won screen request
pub const ROUND_WON_DELAY_MS: u64 = 1_000;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid rules: {0}")]
pub struct RulesError(pub String);

/// Tunable numbers of the round rules.
///
/// Every field has a default, so partial TOML or JSON documents deserialize
/// cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub soil_count: usize,
    pub hand_size: usize,
    pub starting_goal: u64,
    pub goal_step: u64,
    pub coins_per_round: u32,
    /// Clover roll below this returns the seed to the hand
    pub clover_return_below: f64,
    /// Clover roll below this (and not below the return threshold) returns
    /// the seed and pays `clover_bonus_coins`
    pub clover_bonus_below: f64,
    pub clover_bonus_coins: u32,
    /// Chance an evil soil loses its multiplier on harvest
    pub evil_wither_chance: f64,
    pub step_delay_ms: u64,
    pub round_won_delay_ms: u64,
    /// Resolve hands through the timed scheduler; `false` resolves at once
    pub animate: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            soil_count: DEFAULT_SOIL_COUNT,
            hand_size: HAND_SIZE,
            starting_goal: STARTING_GOAL,
            goal_step: GOAL_STEP,
            coins_per_round: COINS_PER_ROUND,
            clover_return_below: 0.3,
            clover_bonus_below: 0.6,
            clover_bonus_coins: 10,
            evil_wither_chance: 0.3,
            step_delay_ms: STEP_DELAY_MS,
            round_won_delay_ms: ROUND_WON_DELAY_MS,
            animate: true,
        }
    }
}

impl RulesConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn round_won_delay(&self) -> Duration {
        Duration::from_millis(self.round_won_delay_ms)
    }

    /// Checks ranges and threshold ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use botanic_engine::rules::RulesConfig;
    ///
    /// assert!(RulesConfig::default().validate().is_ok());
    ///
    /// let broken = RulesConfig { soil_count: 0, ..RulesConfig::default() };
    /// assert!(broken.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.soil_count == 0 {
            return Err(RulesError("soil_count must be >= 1".into()));
        }
        if self.hand_size == 0 {
            return Err(RulesError("hand_size must be >= 1".into()));
        }
        if self.starting_goal == 0 {
            return Err(RulesError("starting_goal must be >= 1".into()));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.clover_return_below)
            || !unit.contains(&self.clover_bonus_below)
            || self.clover_return_below > self.clover_bonus_below
        {
            return Err(RulesError(
                "clover thresholds must satisfy 0 <= return <= bonus <= 1".into(),
            ));
        }
        if !unit.contains(&self.evil_wither_chance) {
            return Err(RulesError("evil_wither_chance must be within [0, 1]".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clover_thresholds_must_be_ordered() {
        let rules = RulesConfig {
            clover_return_below: 0.7,
            clover_bonus_below: 0.6,
            ..RulesConfig::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn evil_chance_outside_unit_interval_is_rejected() {
        let rules = RulesConfig {
            evil_wither_chance: 1.5,
            ..RulesConfig::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn rules_round_trip_through_json() {
        let rules = RulesConfig {
            animate: false,
            ..RulesConfig::default()
        };
        let json = serde_json::to_string(&rules).unwrap();
        let back: RulesConfig = serde_json::from_str(&json).unwrap();
        assert!(!back.animate);
        assert_eq!(back.step_delay(), Duration::from_millis(300));
    }
}
