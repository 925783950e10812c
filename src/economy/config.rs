//! Seed tables and tuning constants.
//!
//! `EconomyConfig::default()` is the shipped game. Every field can be
//! overridden from JSON; missing fields keep their defaults.

use std::collections::HashSet;

use serde::Deserialize;

use super::error::ConfigError;
use super::state::{
    AchievementCondition, AchievementDefinition, ApartmentLevel, UpgradeCategory,
    UpgradeDefinition,
};

/// Diamond ladder constants: first goal 100 clicks paying 1, then
/// +100 clicks and +2 diamonds per stage.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LadderConfig {
    pub first_threshold: u32,
    pub threshold_step: u32,
    pub first_reward: u64,
    pub reward_step: u64,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            first_threshold: 100,
            threshold_step: 100,
            first_reward: 1,
            reward_step: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EconomyConfig {
    pub base_click_value: f64,
    pub upgrades: Vec<UpgradeDefinition>,
    pub apartments: Vec<ApartmentLevel>,
    pub ladder: LadderConfig,
    pub achievements: Vec<AchievementDefinition>,
    pub daily_reward: u64,
    /// Seconds of accumulated live ticks between passive-income autosaves.
    pub autosave_interval_secs: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_click_value: 1.0,
            upgrades: default_upgrades(),
            apartments: default_apartments(),
            ladder: LadderConfig::default(),
            achievements: default_achievements(),
            daily_reward: 100,
            autosave_interval_secs: 30,
        }
    }
}

impl EconomyConfig {
    /// Parse a JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EconomyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for u in &self.upgrades {
            if !seen.insert(u.id.as_str()) {
                return Err(ConfigError::DuplicateUpgrade(u.id.clone()));
            }
            if !(u.cost_multiplier > 1.0) {
                return Err(ConfigError::InvalidCostMultiplier {
                    id: u.id.clone(),
                    multiplier: u.cost_multiplier,
                });
            }
        }

        match self.apartments.first() {
            None => return Err(ConfigError::NoApartments),
            Some(first) if first.threshold != 0 => {
                return Err(ConfigError::FirstThresholdNotZero(first.threshold))
            }
            Some(_) => {}
        }
        for (i, pair) in self.apartments.windows(2).enumerate() {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ConfigError::ThresholdsNotIncreasing { index: i + 1 });
            }
        }

        if self.ladder.first_threshold == 0 {
            return Err(ConfigError::ZeroLadderThreshold);
        }

        let mut seen = HashSet::new();
        for a in &self.achievements {
            if !seen.insert(a.id.as_str()) {
                return Err(ConfigError::DuplicateAchievement(a.id.clone()));
            }
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Vec<u64> {
        self.apartments.iter().map(|a| a.threshold).collect()
    }
}

fn upgrade(
    id: &str,
    name: &str,
    category: UpgradeCategory,
    is_additive: bool,
    base_value: f64,
    base_cost: u64,
    cost_multiplier: f64,
) -> UpgradeDefinition {
    UpgradeDefinition {
        id: id.into(),
        name: name.into(),
        category,
        is_additive,
        base_value,
        base_cost,
        cost_multiplier,
    }
}

/// The upgrade set a brand-new player starts with.
pub fn default_upgrades() -> Vec<UpgradeDefinition> {
    use UpgradeCategory::{Click, Passive};
    vec![
        upgrade("click_upgrade", "Click Upgrade", Click, true, 1.0, 10, 1.15),
        upgrade("camera", "Camera", Click, true, 2.0, 100, 1.2),
        upgrade("notebook", "Laptop", Click, false, 0.10, 500, 1.25),
        upgrade("microphone", "Microphone", Click, false, 0.25, 2_500, 1.3),
        upgrade("sponsor", "Sponsor", Passive, true, 1.0, 1_000, 1.2),
        upgrade("passive_stream", "Stream Schedule", Passive, false, 0.20, 5_000, 1.35),
    ]
}

pub fn default_apartments() -> Vec<ApartmentLevel> {
    let level = |name: &str, message: &str, threshold: u64| ApartmentLevel {
        name: name.into(),
        unlock_message: message.into(),
        threshold,
    };
    vec![
        level("Rented Room", "You've moved into your first room!", 0),
        level("Studio", "A studio of your own!", 10_000),
        level("Loft", "A loft with a view!", 100_000),
        level("Penthouse", "Welcome to the penthouse!", 1_000_000),
        level("Mansion", "You made it: a mansion!", 10_000_000),
    ]
}

pub fn default_achievements() -> Vec<AchievementDefinition> {
    vec![
        AchievementDefinition {
            id: "coins_1000".into(),
            title: "Collect 1000 coins".into(),
            reward: 100,
            condition: AchievementCondition::CoinsAtLeast(1_000),
        },
        AchievementDefinition {
            id: "upgrade_camera".into(),
            title: "Camera 3 lvl.".into(),
            reward: 500,
            condition: AchievementCondition::UpgradeLevelAtLeast {
                upgrade_id: "camera".into(),
                level: 3,
            },
        },
        AchievementDefinition {
            id: "login_5".into(),
            title: "Five launches".into(),
            reward: 250,
            condition: AchievementCondition::LoginsAtLeast(5),
        },
    ]
}
