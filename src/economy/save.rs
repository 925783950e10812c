//! Snapshot (de)serialization.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current snapshot format. Bump it when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format still readable. Only bump it for
//!   breaking changes (a field changes meaning or disappears).
//!
//! Older snapshots at or above `MIN_COMPATIBLE_VERSION` load with missing
//! fields filled from defaults. The flat, unversioned record written by the
//! first release of the game (`{coins, clickValue, diamonds?, upgrades?}`)
//! is migrated as well.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::config::EconomyConfig;
use super::error::SnapshotError;
use super::logic;
use super::state::{
    AchievementStatus, DiamondLadder, EconomyState, UpgradeCategory, UpgradeState,
};
use crate::console;

/// Snapshot format version.
pub const SAVE_VERSION: u32 = 2;

/// Oldest version still accepted.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Highest upgrade level a snapshot may carry.
pub const MAX_UPGRADE_LEVEL: u32 = 100_000;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GameSave {
    coins: u64,
    diamonds: u64,
    base_click_value: f64,
    click_value: f64,
    passive_income_per_sec: f64,
    last_quit_timestamp: Option<u64>,
    apartment_level_index: usize,
    upgrades: Vec<UpgradeSave>,

    // Added in version 2
    diamond_ladder: Option<LadderSave>,
    total_clicks: u64,
    coins_all_time: u64,
    achievements: Vec<AchievementSave>,
    login_count: u32,
    last_daily_reward_day: Option<u64>,
}

impl Default for GameSave {
    fn default() -> Self {
        Self {
            coins: 0,
            diamonds: 0,
            base_click_value: 1.0,
            click_value: 1.0,
            passive_income_per_sec: logic::PASSIVE_INCOME_SEED,
            last_quit_timestamp: None,
            apartment_level_index: 0,
            upgrades: Vec::new(),
            diamond_ladder: None,
            total_clicks: 0,
            coins_all_time: 0,
            achievements: Vec::new(),
            login_count: 0,
            last_daily_reward_day: None,
        }
    }
}

/// Saved upgrade record. Everything but `id` is optional so that records
/// from older formats fill the gaps from the definition table.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpgradeSave {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<UpgradeCategory>,
    #[serde(default)]
    is_additive: Option<bool>,
    #[serde(default)]
    base_value: Option<f64>,
    /// Written for readability; recomputed from `base_value * level` on load.
    #[serde(default)]
    current_value: Option<f64>,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    base_cost: Option<u64>,
    #[serde(default)]
    current_cost: Option<u64>,
    #[serde(default)]
    cost_multiplier: Option<f64>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LadderSave {
    clicks_since_last_award: u32,
    next_threshold: u32,
    current_reward: u64,
}

#[derive(Serialize, Deserialize)]
struct AchievementSave {
    id: String,
    status: u8, // 0=Locked, 1=Ready, 2=Claimed
}

/// The pre-versioning record: a flat object keyed by `coins`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySave {
    coins: u64,
    #[serde(default)]
    click_value: Option<f64>,
    #[serde(default)]
    diamonds: u64,
    #[serde(default)]
    upgrades: Vec<UpgradeSave>,
}

impl From<LegacySave> for GameSave {
    fn from(legacy: LegacySave) -> Self {
        let mut game = GameSave {
            coins: legacy.coins,
            // Not tracked before; the balance is the best lower bound
            coins_all_time: legacy.coins,
            diamonds: legacy.diamonds,
            upgrades: legacy.upgrades,
            ..GameSave::default()
        };
        if let Some(v) = legacy.click_value {
            game.click_value = v;
            // Before the upgrade list, clickValue was the whole click power
            if game.upgrades.is_empty() && v.is_finite() && v > 0.0 {
                game.base_click_value = v;
            }
        }
        game
    }
}

fn extract_save(state: &EconomyState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            coins: state.coins,
            diamonds: state.diamonds,
            base_click_value: state.base_click_value,
            click_value: state.click_value,
            passive_income_per_sec: state.passive_income_per_sec,
            last_quit_timestamp: state.last_quit_timestamp,
            apartment_level_index: state.apartment_level_index,
            upgrades: state
                .upgrades
                .iter()
                .map(|u| UpgradeSave {
                    id: u.id.clone(),
                    name: Some(u.name.clone()),
                    category: Some(u.category),
                    is_additive: Some(u.is_additive),
                    base_value: Some(u.base_value),
                    current_value: Some(u.current_value),
                    level: u.level,
                    base_cost: Some(u.base_cost),
                    current_cost: Some(u.current_cost),
                    cost_multiplier: Some(u.cost_multiplier),
                })
                .collect(),
            diamond_ladder: Some(LadderSave {
                clicks_since_last_award: state.diamond_ladder.clicks_since_last_award,
                next_threshold: state.diamond_ladder.next_threshold,
                current_reward: state.diamond_ladder.current_reward,
            }),
            total_clicks: state.total_clicks,
            coins_all_time: state.coins_all_time,
            achievements: state
                .achievements
                .iter()
                .map(|a| AchievementSave {
                    id: a.id.clone(),
                    status: match a.status {
                        AchievementStatus::Locked => 0,
                        AchievementStatus::Ready => 1,
                        AchievementStatus::Claimed => 2,
                    },
                })
                .collect(),
            login_count: state.login_count,
            last_daily_reward_day: state.last_daily_reward_day,
        },
    }
}

/// Restore a snapshot on top of a fresh state built from `config`.
///
/// Saved upgrade fields win over the table; missing ones come from the
/// matching definition. Records whose id is not in the table are dropped.
fn apply_save(state: &mut EconomyState, save: GameSave) -> Result<(), SnapshotError> {
    state.coins = save.coins;
    state.diamonds = save.diamonds;
    if save.base_click_value.is_finite() && save.base_click_value > 0.0 {
        state.base_click_value = save.base_click_value;
    }
    state.last_quit_timestamp = save.last_quit_timestamp;
    state.apartment_level_index = save.apartment_level_index;
    state.total_clicks = save.total_clicks;
    state.coins_all_time = save.coins_all_time;
    state.login_count = save.login_count;
    state.last_daily_reward_day = save.last_daily_reward_day;

    let mut seen = HashSet::new();
    for saved in save.upgrades {
        if !seen.insert(saved.id.clone()) {
            return Err(SnapshotError::Invalid(format!(
                "duplicate upgrade id `{}`",
                saved.id
            )));
        }
        let Some(u) = state.upgrade_mut(&saved.id) else {
            console::log(&format!(
                "dropping saved upgrade `{}` (not in the upgrade table)",
                saved.id
            ));
            continue;
        };
        if let Some(name) = saved.name {
            u.name = name;
        }
        u.category = saved
            .category
            .unwrap_or_else(|| UpgradeCategory::infer_from_id(&saved.id));
        if let Some(v) = saved.is_additive {
            u.is_additive = v;
        }
        if let Some(v) = saved.base_value {
            u.base_value = v;
        }
        if let Some(v) = saved.base_cost {
            u.base_cost = v;
        }
        if let Some(v) = saved.cost_multiplier {
            u.cost_multiplier = v;
        }
        if saved.level > MAX_UPGRADE_LEVEL {
            return Err(SnapshotError::Invalid(format!(
                "upgrade `{}` at level {} (max {})",
                saved.id, saved.level, MAX_UPGRADE_LEVEL
            )));
        }
        u.level = saved.level;
        u.current_value = u.base_value * u.level as f64;
        u.current_cost = match saved.current_cost {
            Some(c) => c,
            // Replay the curve when only the level survived
            None => replay_cost(u.base_cost, u.cost_multiplier, u.level),
        };
    }

    if let Some(ladder) = save.diamond_ladder {
        state.diamond_ladder = DiamondLadder {
            clicks_since_last_award: ladder.clicks_since_last_award,
            next_threshold: ladder.next_threshold,
            current_reward: ladder.current_reward,
        };
    }

    for saved in save.achievements {
        if let Some(a) = state.achievements.iter_mut().find(|a| a.id == saved.id) {
            a.status = match saved.status {
                1 => AchievementStatus::Ready,
                2 => AchievementStatus::Claimed,
                _ => AchievementStatus::Locked,
            };
        }
    }

    // Derived values are never trusted from disk
    logic::recalculate(state);
    Ok(())
}

/// Cost after `level` purchases starting from `base_cost`. Stops early once
/// the curve stalls or saturates.
fn replay_cost(base_cost: u64, multiplier: f64, level: u32) -> u64 {
    let mut cost = base_cost;
    for _ in 0..level {
        let next = UpgradeState::next_cost(cost, multiplier);
        if next == cost || next == u64::MAX {
            return next;
        }
        cost = next;
    }
    cost
}

/// Check the invariants a restored state must hold.
fn validate(state: &EconomyState, config: &EconomyConfig) -> Result<(), SnapshotError> {
    if state.apartment_level_index >= config.apartments.len() {
        return Err(SnapshotError::Invalid(format!(
            "apartment index {} out of range (0..{})",
            state.apartment_level_index,
            config.apartments.len()
        )));
    }
    for u in &state.upgrades {
        if !(u.cost_multiplier > 1.0) {
            return Err(SnapshotError::Invalid(format!(
                "upgrade `{}` has cost multiplier {}",
                u.id, u.cost_multiplier
            )));
        }
        if u.current_cost < u.base_cost {
            return Err(SnapshotError::Invalid(format!(
                "upgrade `{}` costs {} below its base cost {}",
                u.id, u.current_cost, u.base_cost
            )));
        }
        if !u.base_value.is_finite() {
            return Err(SnapshotError::Invalid(format!(
                "upgrade `{}` has a non-finite value",
                u.id
            )));
        }
    }
    let ladder = &state.diamond_ladder;
    if ladder.next_threshold == 0 || ladder.clicks_since_last_award >= ladder.next_threshold {
        return Err(SnapshotError::Invalid(format!(
            "diamond ladder at {}/{}",
            ladder.clicks_since_last_award, ladder.next_threshold
        )));
    }
    Ok(())
}

/// Serialize the persisted part of `state`. The event log is not saved.
pub fn to_json(state: &EconomyState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&extract_save(state))
}

/// Parse a snapshot, migrating older formats, and rebuild the state.
pub fn from_json(json: &str, config: &EconomyConfig) -> Result<EconomyState, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let game = match value.get("version") {
        Some(_) => {
            let save_data: SaveData = serde_json::from_value(value)?;
            if save_data.version < MIN_COMPATIBLE_VERSION {
                return Err(SnapshotError::IncompatibleVersion {
                    saved: save_data.version,
                    min_compatible: MIN_COMPATIBLE_VERSION,
                });
            }
            if save_data.version < SAVE_VERSION {
                console::log(&format!(
                    "migrating snapshot (saved={}, current={})",
                    save_data.version, SAVE_VERSION
                ));
            }
            save_data.game
        }
        None if value.get("coins").is_some() => {
            console::log("migrating unversioned snapshot");
            GameSave::from(serde_json::from_value::<LegacySave>(value)?)
        }
        None => {
            return Err(SnapshotError::Invalid(
                "neither a versioned nor a legacy snapshot".into(),
            ))
        }
    };

    let mut state = EconomyState::new(config);
    apply_save(&mut state, game)?;
    validate(&state, config)?;
    Ok(state)
}
