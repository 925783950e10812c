//! Streamer Clicker economy state definitions.

use serde::{Deserialize, Serialize};

use super::config::{EconomyConfig, LadderConfig};

/// Maximum number of entries kept in the event log.
pub const LOG_CAPACITY: usize = 50;

/// Which aggregates an upgrade feeds into. Every upgrade counts toward
/// coins per click; only passive ones count toward coins per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeCategory {
    /// Contributes to coins per click.
    Click,
    /// Contributes to coins per second and coins per click.
    Passive,
}

impl UpgradeCategory {
    /// Category for records saved before the tag existed: the old game
    /// keyed passive upgrades by id.
    pub fn infer_from_id(id: &str) -> Self {
        if id == "sponsor" || id.starts_with("passive_") {
            UpgradeCategory::Passive
        } else {
            UpgradeCategory::Click
        }
    }
}

/// One row of the upgrade seed table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDefinition {
    pub id: String,
    pub name: String,
    pub category: UpgradeCategory,
    pub is_additive: bool,
    /// Effect per level.
    pub base_value: f64,
    pub base_cost: u64,
    /// Geometric cost growth per level (> 1).
    pub cost_multiplier: f64,
}

/// A purchasable upgrade and its progress.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeState {
    pub id: String,
    pub name: String,
    pub category: UpgradeCategory,
    pub is_additive: bool,
    pub base_value: f64,
    /// Always `base_value * level`.
    pub current_value: f64,
    pub level: u32,
    pub base_cost: u64,
    pub current_cost: u64,
    pub cost_multiplier: f64,
}

impl UpgradeState {
    pub fn from_definition(def: &UpgradeDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            category: def.category,
            is_additive: def.is_additive,
            base_value: def.base_value,
            current_value: 0.0,
            level: 0,
            base_cost: def.base_cost,
            current_cost: def.base_cost,
            cost_multiplier: def.cost_multiplier,
        }
    }

    /// Cost of the level after `cost`: `floor(cost * multiplier)`,
    /// saturating at `u64::MAX`.
    pub fn next_cost(cost: u64, multiplier: f64) -> u64 {
        let scaled = (cost as f64 * multiplier).floor();
        if scaled >= u64::MAX as f64 {
            return u64::MAX;
        }
        scaled as u64
    }

    /// Advance one level: value follows the level, cost moves up the curve.
    pub fn level_up(&mut self) {
        self.level += 1;
        self.current_value = self.base_value * self.level as f64;
        self.current_cost = Self::next_cost(self.current_cost, self.cost_multiplier);
    }

    /// Human-readable effect of one level, e.g. "+2 per click".
    pub fn effect_description(&self) -> String {
        let value = trim_float(self.base_value);
        let percent = trim_float(self.base_value * 100.0);
        match (self.category, self.is_additive) {
            (UpgradeCategory::Click, true) => format!("+{value} per click"),
            (UpgradeCategory::Click, false) => format!("+{percent}% click value"),
            (UpgradeCategory::Passive, true) => format!("+{value} coins/sec"),
            (UpgradeCategory::Passive, false) => format!("+{percent}% passive income"),
        }
    }
}

fn trim_float(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// An apartment background unlocked at a coin balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentLevel {
    pub name: String,
    pub unlock_message: String,
    /// Coin balance needed to move into this apartment.
    pub threshold: u64,
}

/// Click-count ladder that pays diamonds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiamondLadder {
    pub clicks_since_last_award: u32,
    pub next_threshold: u32,
    pub current_reward: u64,
}

impl DiamondLadder {
    pub fn new(cfg: &LadderConfig) -> Self {
        Self {
            clicks_since_last_award: 0,
            next_threshold: cfg.first_threshold,
            current_reward: cfg.first_reward,
        }
    }
}

/// What unlocks an achievement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementCondition {
    CoinsAtLeast(u64),
    #[serde(rename_all = "camelCase")]
    UpgradeLevelAtLeast { upgrade_id: String, level: u32 },
    LoginsAtLeast(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDefinition {
    pub id: String,
    pub title: String,
    pub reward: u64,
    pub condition: AchievementCondition,
}

/// Achievement progress: Locked → Ready (condition met) → Claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AchievementStatus {
    Locked,
    Ready,
    Claimed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub reward: u64,
    pub condition: AchievementCondition,
    pub status: AchievementStatus,
}

impl Achievement {
    pub fn from_definition(def: &AchievementDefinition) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            reward: def.reward,
            condition: def.condition.clone(),
            status: AchievementStatus::Locked,
        }
    }
}

/// Event log entry (rendered as a toast by the presentation layer).
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Full economy state of one player.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyState {
    /// Spendable coins.
    pub coins: u64,
    /// Premium currency, only from the click ladder.
    pub diamonds: u64,
    /// Seed of the click-value formula.
    pub base_click_value: f64,
    /// Coins per click (derived).
    pub click_value: f64,
    /// Coins per second (derived).
    pub passive_income_per_sec: f64,
    /// Upgrades in definition order.
    pub upgrades: Vec<UpgradeState>,
    /// Unix seconds of the last suspend/exit, consumed by the next load.
    pub last_quit_timestamp: Option<u64>,
    pub apartment_level_index: usize,
    pub diamond_ladder: DiamondLadder,

    // Statistics
    pub total_clicks: u64,
    pub coins_all_time: u64,

    pub achievements: Vec<Achievement>,
    pub login_count: u32,
    /// UTC day index of the last daily-reward claim.
    pub last_daily_reward_day: Option<u64>,

    /// Message log (not persisted).
    pub log: Vec<LogEntry>,
}

impl EconomyState {
    /// Fresh state built from the seed tables.
    pub fn new(config: &EconomyConfig) -> Self {
        let mut state = Self {
            coins: 0,
            diamonds: 0,
            base_click_value: config.base_click_value,
            click_value: config.base_click_value,
            passive_income_per_sec: super::logic::PASSIVE_INCOME_SEED,
            upgrades: config
                .upgrades
                .iter()
                .map(UpgradeState::from_definition)
                .collect(),
            last_quit_timestamp: None,
            apartment_level_index: 0,
            diamond_ladder: DiamondLadder::new(&config.ladder),
            total_clicks: 0,
            coins_all_time: 0,
            achievements: config
                .achievements
                .iter()
                .map(Achievement::from_definition)
                .collect(),
            login_count: 0,
            last_daily_reward_day: None,
            log: Vec::new(),
        };
        super::logic::recalculate(&mut state);
        state
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeState> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn upgrade_mut(&mut self, id: &str) -> Option<&mut UpgradeState> {
        self.upgrades.iter_mut().find(|u| u.id == id)
    }

    pub fn can_afford(&self, upgrade: &UpgradeState) -> bool {
        self.coins >= upgrade.current_cost
    }

    /// Credit coins to both the balance and the all-time counter.
    pub fn earn(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
        self.coins_all_time = self.coins_all_time.saturating_add(amount);
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }
}
