//! Streamer Clicker progression rules: pure functions over the economy state.

use super::config::{EconomyConfig, LadderConfig};
use super::error::{ClaimError, PurchaseError};
use super::state::{
    AchievementCondition, AchievementStatus, ApartmentLevel, EconomyState, UpgradeCategory,
    UpgradeState,
};
use crate::time::{day_index, SecondAccumulator};

/// Additive seed of the passive-income formula (coins/sec with no upgrades).
pub const PASSIVE_INCOME_SEED: f64 = 1.0;

/// Convert a fractional coin amount to whole coins (round to nearest).
/// Clicks, live ticks and offline payouts all use this.
pub fn to_coins(amount: f64) -> u64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    let rounded = amount.round();
    if rounded >= u64::MAX as f64 {
        u64::MAX
    } else {
        rounded as u64
    }
}

/// Sum the additive upgrades onto `seed`, then apply every multiplicative
/// upgrade as `(1 + value)`.
fn compose<'a>(seed: f64, upgrades: impl Iterator<Item = &'a UpgradeState>) -> f64 {
    let mut additive = seed;
    let mut multiplicative = 1.0;
    for u in upgrades {
        if u.is_additive {
            additive += u.current_value;
        } else {
            multiplicative *= 1.0 + u.current_value;
        }
    }
    additive * multiplicative
}

/// Coins per click. Every upgrade takes part, passive ones included.
pub fn compute_click_value(base: f64, upgrades: &[UpgradeState]) -> f64 {
    compose(base, upgrades.iter())
}

/// Coins per second from the Passive-category upgrades only.
pub fn compute_passive_income(upgrades: &[UpgradeState]) -> f64 {
    compose(
        PASSIVE_INCOME_SEED,
        upgrades
            .iter()
            .filter(|u| u.category == UpgradeCategory::Passive),
    )
}

/// Refresh both derived aggregates after any upgrade-level change.
pub fn recalculate(state: &mut EconomyState) {
    state.click_value = compute_click_value(state.base_click_value, &state.upgrades);
    state.passive_income_per_sec = compute_passive_income(&state.upgrades);
}

/// Result of a successful purchase.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseReceipt {
    pub id: String,
    pub cost_paid: u64,
    pub new_level: u32,
    pub next_cost: u64,
}

/// Buy one level of `id`. On error nothing is mutated.
pub fn try_purchase(state: &mut EconomyState, id: &str) -> Result<PurchaseReceipt, PurchaseError> {
    let (cost, name) = match state.upgrade(id) {
        Some(u) => (u.current_cost, u.name.clone()),
        None => return Err(PurchaseError::UnknownUpgrade(id.to_string())),
    };
    if state.coins < cost {
        return Err(PurchaseError::InsufficientFunds {
            id: id.to_string(),
            cost,
            coins: state.coins,
        });
    }

    state.coins -= cost;
    let (new_level, next_cost) = match state.upgrade_mut(id) {
        Some(u) => {
            u.level_up();
            (u.level, u.current_cost)
        }
        None => return Err(PurchaseError::UnknownUpgrade(id.to_string())),
    };
    recalculate(state);
    state.add_log(&format!("Upgraded {} (Lv {})", name, new_level), false);

    Ok(PurchaseReceipt {
        id: id.to_string(),
        cost_paid: cost,
        new_level,
        next_cost,
    })
}

/// What one click produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClickOutcome {
    pub coins: u64,
    /// Diamonds paid by the ladder on this click, if a stage completed.
    pub diamonds: Option<u64>,
}

/// Manual click: pay the click value and advance the diamond ladder.
pub fn click(state: &mut EconomyState, ladder: &LadderConfig) -> ClickOutcome {
    let coins = to_coins(state.click_value);
    state.earn(coins);
    state.total_clicks += 1;
    let diamonds = advance_diamond_ladder(state, ladder);
    ClickOutcome { coins, diamonds }
}

/// Count one click toward the current diamond goal. Returns the award when
/// the goal is reached.
pub fn advance_diamond_ladder(state: &mut EconomyState, cfg: &LadderConfig) -> Option<u64> {
    let ladder = &mut state.diamond_ladder;
    ladder.clicks_since_last_award += 1;
    if ladder.clicks_since_last_award < ladder.next_threshold {
        return None;
    }

    let award = ladder.current_reward;
    ladder.clicks_since_last_award = 0;
    ladder.current_reward = ladder.current_reward.saturating_add(cfg.reward_step);
    ladder.next_threshold = ladder.next_threshold.saturating_add(cfg.threshold_step);

    state.diamonds = state.diamonds.saturating_add(award);
    state.add_log(&format!("💎 +{} diamonds!", award), true);
    Some(award)
}

/// Session-only bookkeeping for live passive income.
///
/// `seconds` carries sub-second time between ticks; `residual` carries the
/// rounding error between whole-second payouts, so the total paid after `W`
/// seconds at a fixed rate is exactly `round(rate * W)`.
#[derive(Clone, Debug, Default)]
pub struct PassiveAccrual {
    pub seconds: SecondAccumulator,
    residual: f64,
}

impl PassiveAccrual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed real elapsed time and pay any whole seconds crossed.
    /// Returns the coins paid by this call.
    pub fn tick(&mut self, state: &mut EconomyState, elapsed_real_secs: f64) -> u64 {
        let whole = self.seconds.advance(elapsed_real_secs);
        if whole == 0 {
            return 0;
        }
        let earned = state.passive_income_per_sec * whole as f64 + self.residual;
        let paid = to_coins(earned);
        self.residual = earned - paid as f64;
        state.earn(paid);
        paid
    }

    pub fn clear(&mut self) {
        self.seconds.clear();
        self.residual = 0.0;
    }
}

/// Credit earned while the game was closed.
#[derive(Clone, Debug, PartialEq)]
pub struct OfflinePayout {
    pub seconds_away: u64,
    pub coins: u64,
}

/// Consume the stored quit timestamp and pay passive income for the time
/// away. The timestamp is cleared here, in the same step as the payout, so a
/// second call pays nothing.
pub fn apply_offline_payout(state: &mut EconomyState, now_unix_secs: u64) -> Option<OfflinePayout> {
    let quit = state.last_quit_timestamp.take()?;
    let seconds_away = now_unix_secs.saturating_sub(quit);
    let coins = to_coins(seconds_away as f64 * state.passive_income_per_sec);
    state.earn(coins);
    if coins > 0 {
        state.add_log(
            &format!(
                "Welcome back! +{} coins while away ({})",
                format_number(coins),
                format_duration(seconds_away)
            ),
            true,
        );
    }
    Some(OfflinePayout {
        seconds_away,
        coins,
    })
}

/// Move into every apartment the current balance affords. Returns how many
/// levels were gained (several when the balance jumps past more than one
/// threshold at once).
pub fn evaluate_apartment(state: &mut EconomyState, levels: &[ApartmentLevel]) -> usize {
    let mut gained = 0;
    while let Some(next) = levels.get(state.apartment_level_index + 1) {
        if state.coins < next.threshold {
            break;
        }
        state.apartment_level_index += 1;
        gained += 1;
        state.add_log(&format!("Apartment upgraded: {}", next.unlock_message), true);
    }
    gained
}

/// Debug helper: advance one apartment regardless of coins.
pub fn force_upgrade_apartment(state: &mut EconomyState, levels: &[ApartmentLevel]) -> bool {
    match levels.get(state.apartment_level_index + 1) {
        Some(next) => {
            state.apartment_level_index += 1;
            state.add_log(&format!("Apartment upgraded: {}", next.unlock_message), true);
            true
        }
        None => false,
    }
}

/// Coin balance needed for the next apartment, `None` at the last one.
pub fn next_apartment_threshold(state: &EconomyState, levels: &[ApartmentLevel]) -> Option<u64> {
    levels
        .get(state.apartment_level_index + 1)
        .map(|l| l.threshold)
}

/// Wipe economy progress back to the seed tables.
///
/// Coins, diamonds, upgrades, the diamond ladder, apartment and statistics
/// start over. Achievements, login count and the daily-reward day belong
/// to the player's account, not the run, and are kept.
pub fn reset(state: &mut EconomyState, config: &EconomyConfig) {
    let mut fresh = EconomyState::new(config);
    fresh.achievements = std::mem::take(&mut state.achievements);
    fresh.login_count = state.login_count;
    fresh.last_daily_reward_day = state.last_daily_reward_day;
    fresh.log = std::mem::take(&mut state.log);
    *state = fresh;
    state.add_log("Progress reset", true);
}

/// Mark every achievement whose condition now holds as Ready.
/// Returns the number that became Ready on this call.
pub fn check_achievements(state: &mut EconomyState) -> usize {
    let mut newly_ready = Vec::new();
    for (i, a) in state.achievements.iter().enumerate() {
        if a.status != AchievementStatus::Locked {
            continue;
        }
        let met = match &a.condition {
            AchievementCondition::CoinsAtLeast(n) => state.coins >= *n,
            AchievementCondition::UpgradeLevelAtLeast { upgrade_id, level } => state
                .upgrade(upgrade_id)
                .is_some_and(|u| u.level >= *level),
            AchievementCondition::LoginsAtLeast(n) => state.login_count >= *n,
        };
        if met {
            newly_ready.push(i);
        }
    }
    for &i in &newly_ready {
        state.achievements[i].status = AchievementStatus::Ready;
        let title = state.achievements[i].title.clone();
        state.add_log(&format!("🏆 Achievement complete: {}", title), true);
    }
    newly_ready.len()
}

/// Claim a Ready achievement and pay its reward.
pub fn claim_achievement(state: &mut EconomyState, id: &str) -> Result<u64, ClaimError> {
    let idx = state
        .achievements
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| ClaimError::UnknownAchievement(id.to_string()))?;

    match state.achievements[idx].status {
        AchievementStatus::Locked => return Err(ClaimError::NotReady(id.to_string())),
        AchievementStatus::Claimed => return Err(ClaimError::AlreadyClaimed(id.to_string())),
        AchievementStatus::Ready => {}
    }

    state.achievements[idx].status = AchievementStatus::Claimed;
    let reward = state.achievements[idx].reward;
    state.earn(reward);
    state.add_log(&format!("+{} coins (achievement)", format_number(reward)), false);
    Ok(reward)
}

/// True when no daily reward has been claimed on the current UTC day.
pub fn daily_reward_available(state: &EconomyState, now_unix_secs: u64) -> bool {
    match state.last_daily_reward_day {
        Some(day) => day < day_index(now_unix_secs),
        None => true,
    }
}

pub fn claim_daily_reward(
    state: &mut EconomyState,
    now_unix_secs: u64,
    amount: u64,
) -> Result<u64, ClaimError> {
    if !daily_reward_available(state, now_unix_secs) {
        return Err(ClaimError::DailyRewardTaken {
            day: day_index(now_unix_secs),
        });
    }
    state.last_daily_reward_day = Some(day_index(now_unix_secs));
    state.earn(amount);
    state.add_log(&format!("Daily Reward: +{} coins!", format_number(amount)), true);
    Ok(amount)
}

/// Compact number for labels: 999 → "999", 1500 → "1.5K", 2_000_000 → "2.0M".
pub fn format_number(n: u64) -> String {
    const UNITS: [(u64, &str); 5] = [
        (1_000_000_000_000_000, "Q"),
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];
    for (scale, suffix) in UNITS {
        if n >= scale {
            // Truncate to one decimal so 999_999 never shows as "1000.0K"
            let tenths = n / (scale / 10);
            return format!("{}.{}{}", tenths / 10, tenths % 10, suffix);
        }
    }
    n.to_string()
}

/// "1h 02m", "5m 07s", "42s".
pub fn format_duration(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::state::{DiamondLadder, UpgradeDefinition, LOG_CAPACITY};

    fn state() -> EconomyState {
        EconomyState::new(&EconomyConfig::default())
    }

    fn upgrade(id: &str, category: UpgradeCategory, additive: bool, value: f64) -> UpgradeState {
        let mut u = UpgradeState::from_definition(&UpgradeDefinition {
            id: id.into(),
            name: id.into(),
            category,
            is_additive: additive,
            base_value: value,
            base_cost: 10,
            cost_multiplier: 1.5,
        });
        u.level_up();
        u
    }

    // ── composition ──────────────────────────────────────

    #[test]
    fn click_value_without_upgrades_is_base() {
        assert!((compute_click_value(3.0, &[]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn click_value_sums_before_multiplying() {
        let ups = vec![
            upgrade("m", UpgradeCategory::Click, false, 0.5),
            upgrade("a", UpgradeCategory::Click, true, 2.0),
        ];
        // (1 + 2) * 1.5 = 4.5, not 1 * 1.5 + 2 = 3.5
        assert!((compute_click_value(1.0, &ups) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn multiplicative_upgrades_stack_multiplicatively() {
        let ups = vec![
            upgrade("m1", UpgradeCategory::Click, false, 0.5),
            upgrade("m2", UpgradeCategory::Click, false, 1.0),
        ];
        // 1 * 1.5 * 2.0
        assert!((compute_click_value(1.0, &ups) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn level_zero_upgrades_have_no_effect() {
        let s = state();
        assert!((compute_click_value(1.0, &s.upgrades) - 1.0).abs() < 1e-9);
        assert!((compute_passive_income(&s.upgrades) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn passive_income_ignores_click_upgrades() {
        let ups = vec![
            upgrade("camera", UpgradeCategory::Click, true, 100.0),
            upgrade("sponsor", UpgradeCategory::Passive, true, 2.0),
            upgrade("passive_x", UpgradeCategory::Passive, false, 0.5),
        ];
        // (1 + 2) * 1.5
        assert!((compute_passive_income(&ups) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn click_value_includes_passive_upgrades() {
        let ups = vec![
            upgrade("camera", UpgradeCategory::Click, true, 100.0),
            upgrade("sponsor", UpgradeCategory::Passive, true, 2.0),
            upgrade("passive_x", UpgradeCategory::Passive, false, 0.5),
        ];
        // (1 + 100 + 2) * 1.5
        assert!((compute_click_value(1.0, &ups) - 154.5).abs() < 1e-9);
    }

    // ── purchase ─────────────────────────────────────────

    #[test]
    fn purchase_success() {
        let mut s = state();
        s.coins = 150;
        let receipt = try_purchase(&mut s, "camera").unwrap();
        assert_eq!(receipt.cost_paid, 100);
        assert_eq!(receipt.new_level, 1);
        assert_eq!(receipt.next_cost, 120);
        assert_eq!(s.coins, 50);
        let cam = s.upgrade("camera").unwrap();
        assert_eq!(cam.level, 1);
        assert!((cam.current_value - 2.0).abs() < 1e-9);
        assert!((s.click_value - 3.0).abs() < 1e-9);
    }

    #[test]
    fn purchase_recomputes_passive_income() {
        let mut s = state();
        s.coins = 1_000;
        try_purchase(&mut s, "sponsor").unwrap();
        assert!((s.passive_income_per_sec - 2.0).abs() < 1e-9);
        // Buying any upgrade can move both aggregates
        assert!((s.click_value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn purchase_insufficient_funds_leaves_state_unchanged() {
        let mut s = state();
        s.coins = 99;
        let before = s.clone();
        let err = try_purchase(&mut s, "camera").unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientFunds {
                id: "camera".into(),
                cost: 100,
                coins: 99
            }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn purchase_unknown_id_leaves_state_unchanged() {
        let mut s = state();
        s.coins = 1_000_000;
        let before = s.clone();
        assert_eq!(
            try_purchase(&mut s, "laptop"),
            Err(PurchaseError::UnknownUpgrade("laptop".into()))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn purchase_exact_balance_reaches_zero() {
        let mut s = state();
        s.coins = 10;
        assert!(try_purchase(&mut s, "click_upgrade").is_ok());
        assert_eq!(s.coins, 0);
        assert!(try_purchase(&mut s, "click_upgrade").is_err());
    }

    #[test]
    fn purchase_cost_follows_curve() {
        let mut s = state();
        s.coins = 1_000_000;
        let mut costs = Vec::new();
        for _ in 0..4 {
            costs.push(try_purchase(&mut s, "camera").unwrap().cost_paid);
        }
        assert_eq!(costs, vec![100, 120, 144, 172]);
    }

    // ── click & diamond ladder ──────────────────────────

    #[test]
    fn click_adds_click_value() {
        let mut s = state();
        let out = click(&mut s, &LadderConfig::default());
        assert_eq!(out.coins, 1);
        assert_eq!(s.coins, 1);
        assert_eq!(s.total_clicks, 1);
    }

    #[test]
    fn click_rounds_fractional_value() {
        let mut s = state();
        s.click_value = 2.6;
        assert_eq!(click(&mut s, &LadderConfig::default()).coins, 3);
        s.click_value = 2.4;
        assert_eq!(click(&mut s, &LadderConfig::default()).coins, 2);
    }

    #[test]
    fn hundred_clicks_award_one_diamond() {
        let mut s = state();
        let cfg = LadderConfig::default();
        for _ in 0..99 {
            assert_eq!(click(&mut s, &cfg).diamonds, None);
        }
        assert_eq!(click(&mut s, &cfg).diamonds, Some(1));
        assert_eq!(s.diamonds, 1);
        assert_eq!(s.diamond_ladder.clicks_since_last_award, 0);
        assert_eq!(s.diamond_ladder.next_threshold, 200);
        assert_eq!(s.diamond_ladder.current_reward, 3);
    }

    #[test]
    fn three_hundred_clicks_award_four_diamonds() {
        let mut s = state();
        let cfg = LadderConfig::default();
        for _ in 0..300 {
            click(&mut s, &cfg);
        }
        assert_eq!(s.diamonds, 1 + 3);
        // Third stage needs 300 more clicks and pays 5
        for _ in 0..300 {
            click(&mut s, &cfg);
        }
        assert_eq!(s.diamonds, 1 + 3 + 5);
    }

    // ── passive tick ─────────────────────────────────────

    #[test]
    fn tick_pays_per_whole_second() {
        let mut s = state();
        let mut acc = PassiveAccrual::new();
        assert_eq!(acc.tick(&mut s, 0.6), 0);
        assert_eq!(acc.tick(&mut s, 0.6), 1);
        assert_eq!(s.coins, 1);
        assert!((acc.seconds.carry_secs() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn half_second_ticks_pay_rounded_two_seconds() {
        let mut s = state();
        s.passive_income_per_sec = 1.5;
        let mut acc = PassiveAccrual::new();
        for _ in 0..4 {
            acc.tick(&mut s, 0.5);
        }
        assert_eq!(s.coins, to_coins(1.5 * 2.0));
    }

    #[test]
    fn slow_rate_does_not_leak_between_ticks() {
        let mut s = state();
        s.passive_income_per_sec = 0.4;
        let mut acc = PassiveAccrual::new();
        for _ in 0..10 {
            acc.tick(&mut s, 1.0);
        }
        // round(0.4) per tick would pay nothing
        assert_eq!(s.coins, 4);
    }

    #[test]
    fn tick_zero_is_noop() {
        let mut s = state();
        let mut acc = PassiveAccrual::new();
        assert_eq!(acc.tick(&mut s, 0.0), 0);
        assert_eq!(s.coins, 0);
    }

    // ── offline payout ───────────────────────────────────

    #[test]
    fn offline_payout_pays_and_clears_timestamp() {
        let mut s = state();
        s.passive_income_per_sec = 2.0;
        s.last_quit_timestamp = Some(1_000);
        let payout = apply_offline_payout(&mut s, 1_090).unwrap();
        assert_eq!(payout.seconds_away, 90);
        assert_eq!(payout.coins, 180);
        assert_eq!(s.coins, 180);
        assert_eq!(s.last_quit_timestamp, None);
    }

    #[test]
    fn offline_payout_only_once() {
        let mut s = state();
        s.last_quit_timestamp = Some(0);
        assert!(apply_offline_payout(&mut s, 60).is_some());
        assert!(apply_offline_payout(&mut s, 120).is_none());
        assert_eq!(s.coins, 60);
    }

    #[test]
    fn offline_payout_with_clock_skew_pays_nothing() {
        let mut s = state();
        s.last_quit_timestamp = Some(5_000);
        let payout = apply_offline_payout(&mut s, 4_000).unwrap();
        assert_eq!(payout.coins, 0);
        assert_eq!(s.last_quit_timestamp, None);
    }

    // ── apartments ───────────────────────────────────────

    fn levels(thresholds: &[u64]) -> Vec<ApartmentLevel> {
        thresholds
            .iter()
            .enumerate()
            .map(|(i, &t)| ApartmentLevel {
                name: format!("L{i}"),
                unlock_message: format!("level {i}"),
                threshold: t,
            })
            .collect()
    }

    #[test]
    fn apartment_multi_step_catch_up() {
        let mut s = state();
        let lv = levels(&[0, 10_000, 100_000]);
        s.coins = 150_000;
        assert_eq!(evaluate_apartment(&mut s, &lv), 2);
        assert_eq!(s.apartment_level_index, 2);
    }

    #[test]
    fn apartment_stays_below_threshold() {
        let mut s = state();
        let lv = levels(&[0, 10_000, 100_000]);
        s.coins = 9_999;
        assert_eq!(evaluate_apartment(&mut s, &lv), 0);
        s.coins = 10_000;
        assert_eq!(evaluate_apartment(&mut s, &lv), 1);
        assert_eq!(s.apartment_level_index, 1);
    }

    #[test]
    fn apartment_terminal_state() {
        let mut s = state();
        let lv = levels(&[0, 10]);
        s.coins = u64::MAX;
        evaluate_apartment(&mut s, &lv);
        assert_eq!(s.apartment_level_index, 1);
        assert_eq!(evaluate_apartment(&mut s, &lv), 0);
        assert_eq!(next_apartment_threshold(&s, &lv), None);
        assert!(!force_upgrade_apartment(&mut s, &lv));
    }

    #[test]
    fn apartment_does_not_downgrade_after_spending() {
        let mut s = state();
        let lv = levels(&[0, 10_000]);
        s.coins = 10_000;
        evaluate_apartment(&mut s, &lv);
        s.coins = 0;
        evaluate_apartment(&mut s, &lv);
        assert_eq!(s.apartment_level_index, 1);
    }

    #[test]
    fn force_upgrade_advances_one_level() {
        let mut s = state();
        let lv = levels(&[0, 10, 20]);
        assert_eq!(next_apartment_threshold(&s, &lv), Some(10));
        assert!(force_upgrade_apartment(&mut s, &lv));
        assert_eq!(s.apartment_level_index, 1);
        assert_eq!(next_apartment_threshold(&s, &lv), Some(20));
    }

    // ── reset ────────────────────────────────────────────

    #[test]
    fn reset_restores_seed_state() {
        let config = EconomyConfig::default();
        let mut s = state();
        s.coins = 1_000_000;
        try_purchase(&mut s, "camera").unwrap();
        for _ in 0..150 {
            click(&mut s, &config.ladder);
        }
        s.apartment_level_index = 3;
        s.last_quit_timestamp = Some(42);
        s.login_count = 7;
        s.last_daily_reward_day = Some(3);

        reset(&mut s, &config);

        assert_eq!(s.coins, 0);
        assert_eq!(s.diamonds, 0);
        assert_eq!(s.apartment_level_index, 0);
        assert_eq!(s.last_quit_timestamp, None);
        assert_eq!(s.diamond_ladder, DiamondLadder::new(&config.ladder));
        let cam = s.upgrade("camera").unwrap();
        assert_eq!(cam.level, 0);
        assert_eq!(cam.current_cost, cam.base_cost);
        assert!((s.click_value - 1.0).abs() < 1e-9);
        assert_eq!(s.login_count, 7);
        assert_eq!(s.last_daily_reward_day, Some(3));
    }

    // ── achievements & daily reward ─────────────────────

    #[test]
    fn coin_achievement_becomes_ready_then_claimed() {
        let mut s = state();
        s.coins = 1_000;
        assert_eq!(check_achievements(&mut s), 1);
        assert_eq!(s.achievements[0].status, AchievementStatus::Ready);
        assert_eq!(claim_achievement(&mut s, "coins_1000"), Ok(100));
        assert_eq!(s.coins, 1_100);
        assert_eq!(
            claim_achievement(&mut s, "coins_1000"),
            Err(ClaimError::AlreadyClaimed("coins_1000".into()))
        );
    }

    #[test]
    fn locked_achievement_cannot_be_claimed() {
        let mut s = state();
        assert_eq!(
            claim_achievement(&mut s, "upgrade_camera"),
            Err(ClaimError::NotReady("upgrade_camera".into()))
        );
        assert_eq!(
            claim_achievement(&mut s, "nope"),
            Err(ClaimError::UnknownAchievement("nope".into()))
        );
    }

    #[test]
    fn camera_and_login_achievements() {
        let mut s = state();
        s.coins = 10_000;
        for _ in 0..3 {
            try_purchase(&mut s, "camera").unwrap();
        }
        s.login_count = 5;
        check_achievements(&mut s);
        assert!(s
            .achievements
            .iter()
            .all(|a| a.status == AchievementStatus::Ready));
    }

    #[test]
    fn daily_reward_once_per_day() {
        let mut s = state();
        let day = 86_400;
        assert!(daily_reward_available(&s, 5 * day + 10));
        assert_eq!(claim_daily_reward(&mut s, 5 * day + 10, 100), Ok(100));
        assert!(!daily_reward_available(&s, 5 * day + 80_000));
        assert_eq!(
            claim_daily_reward(&mut s, 5 * day + 80_000, 100),
            Err(ClaimError::DailyRewardTaken { day: 5 })
        );
        assert!(daily_reward_available(&s, 6 * day));
        assert_eq!(s.coins, 100);
    }

    // ── formatting ───────────────────────────────────────

    #[test]
    fn format_number_basic() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1.0K");
        assert_eq!(format_number(1_550), "1.5K");
        assert_eq!(format_number(999_999), "999.9K");
        assert_eq!(format_number(2_000_000), "2.0M");
        assert_eq!(format_number(3_400_000_000), "3.4B");
        assert_eq!(format_number(1_000_000_000_000), "1.0T");
        assert_eq!(format_number(7_000_000_000_000_000), "7.0Q");
    }

    #[test]
    fn format_duration_basic() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(307), "5m 07s");
        assert_eq!(format_duration(3_720), "1h 02m");
    }

    #[test]
    fn to_coins_rounds_and_clamps() {
        assert_eq!(to_coins(0.49), 0);
        assert_eq!(to_coins(0.5), 1);
        assert_eq!(to_coins(-3.0), 0);
        assert_eq!(to_coins(f64::NAN), 0);
        assert_eq!(to_coins(1e30), u64::MAX);
    }

    #[test]
    fn log_stays_bounded_under_many_purchases() {
        let mut s = state();
        s.coins = u64::MAX / 2;
        for _ in 0..80 {
            try_purchase(&mut s, "click_upgrade").unwrap();
        }
        assert_eq!(s.log.len(), LOG_CAPACITY);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::economy::state::UpgradeDefinition;
    use proptest::prelude::*;

    // ── Strategy helpers ──────────────────────────────────

    fn arb_click_upgrade() -> impl Strategy<Value = UpgradeState> {
        (any::<bool>(), 0.0f64..5.0, 0u32..20).prop_map(|(additive, value, level)| {
            let mut u = UpgradeState::from_definition(&UpgradeDefinition {
                id: "u".into(),
                name: "u".into(),
                category: UpgradeCategory::Click,
                is_additive: additive,
                base_value: value,
                base_cost: 10,
                cost_multiplier: 1.2,
            });
            for _ in 0..level {
                u.level_up();
            }
            u
        })
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    // ── composition properties ───────────────────────────

    proptest! {
        #[test]
        fn prop_click_value_invariant_under_reordering(
            ups in prop::collection::vec(arb_click_upgrade(), 0..8),
            base in 0.1f64..10.0,
        ) {
            let forward = compute_click_value(base, &ups);
            let mut reversed = ups.clone();
            reversed.reverse();
            let backward = compute_click_value(base, &reversed);
            prop_assert!(close(forward, backward), "{} vs {}", forward, backward);
        }

        #[test]
        fn prop_click_value_is_sum_times_product(
            ups in prop::collection::vec(arb_click_upgrade(), 0..8),
            base in 0.1f64..10.0,
        ) {
            let sum: f64 = base + ups.iter().filter(|u| u.is_additive).map(|u| u.current_value).sum::<f64>();
            let product: f64 = ups.iter().filter(|u| !u.is_additive).map(|u| 1.0 + u.current_value).product();
            prop_assert!(close(compute_click_value(base, &ups), sum * product));
        }

        #[test]
        fn prop_click_value_at_least_base(
            ups in prop::collection::vec(arb_click_upgrade(), 0..8),
            base in 0.1f64..10.0,
        ) {
            prop_assert!(compute_click_value(base, &ups) >= base - 1e-9);
        }
    }

    // ── purchase properties ──────────────────────────────

    proptest! {
        #[test]
        fn prop_purchase_never_underflows(
            coins in 0u64..20_000,
            picks in prop::collection::vec(0usize..6, 1..40),
        ) {
            let mut s = EconomyState::new(&EconomyConfig::default());
            s.coins = coins;
            for p in picks {
                let id = s.upgrades[p].id.clone();
                let before = s.clone();
                match try_purchase(&mut s, &id) {
                    Ok(r) => prop_assert_eq!(s.coins, before.coins - r.cost_paid),
                    Err(_) => prop_assert_eq!(&s, &before),
                }
            }
        }

        #[test]
        fn prop_cost_never_decreases(levels in 1usize..60) {
            let mut s = EconomyState::new(&EconomyConfig::default());
            s.coins = u64::MAX;
            let mut last = 0;
            for _ in 0..levels {
                let r = try_purchase(&mut s, "click_upgrade").unwrap();
                prop_assert!(r.cost_paid >= last);
                last = r.cost_paid;
            }
        }

        #[test]
        fn prop_current_value_tracks_level(levels in 0usize..50) {
            let mut s = EconomyState::new(&EconomyConfig::default());
            s.coins = u64::MAX;
            for _ in 0..levels {
                try_purchase(&mut s, "notebook").unwrap();
            }
            let u = s.upgrade("notebook").unwrap();
            prop_assert_eq!(u.current_value, u.base_value * u.level as f64);
        }
    }

    // ── tick properties ──────────────────────────────────

    proptest! {
        #[test]
        fn prop_tick_grouping_does_not_change_total(
            rate in 0.0f64..500.0,
            whole_secs in 1u32..30,
            split in 1u32..8,
        ) {
            let mut s1 = EconomyState::new(&EconomyConfig::default());
            s1.passive_income_per_sec = rate;
            let mut a1 = PassiveAccrual::new();
            a1.tick(&mut s1, whole_secs as f64);

            let mut s2 = s1.clone();
            s2.coins = 0;
            s2.coins_all_time = 0;
            let mut a2 = PassiveAccrual::new();
            // Same time in 1/split-second steps (powers of two keep it exact)
            let step = 1.0 / (1u32 << (split % 4)) as f64;
            let steps = (whole_secs as f64 / step) as u32;
            for _ in 0..steps {
                a2.tick(&mut s2, step);
            }

            prop_assert_eq!(s1.coins, s2.coins);
            prop_assert_eq!(s1.coins, to_coins(rate * whole_secs as f64));
        }

        #[test]
        fn prop_tick_never_reduces_coins(elapsed in 0.0f64..100.0, coins in 0u64..1_000_000) {
            let mut s = EconomyState::new(&EconomyConfig::default());
            s.coins = coins;
            let mut acc = PassiveAccrual::new();
            acc.tick(&mut s, elapsed);
            prop_assert!(s.coins >= coins);
        }
    }

    // ── format_number properties ──────────────────────────

    proptest! {
        #[test]
        fn prop_format_number_small_values_plain(n in 0u64..1000) {
            prop_assert_eq!(format_number(n), n.to_string());
        }

        #[test]
        fn prop_format_number_large_values_have_suffix(n in 1000u64..u64::MAX) {
            let s = format_number(n);
            let last = s.chars().last().unwrap();
            prop_assert!("KMBTQ".contains(last), "got: {}", s);
            prop_assert!(s.contains('.'), "got: {}", s);
        }
    }
}
