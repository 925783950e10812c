//! Streamer Clicker economy: one `Economy` value owns the player's state,
//! its snapshot store and the clock.

pub mod commands;
pub mod config;
pub mod error;
pub mod logic;
pub mod save;
pub mod state;
pub mod store;

mod simulator;

use crate::console;
use crate::time::{Clock, SystemClock};

use config::EconomyConfig;
use error::{ClaimError, ConfigError, PurchaseError, SaveError};
use logic::{ClickOutcome, OfflinePayout, PassiveAccrual, PurchaseReceipt};
use state::{AchievementStatus, EconomyState, LogEntry};
use store::SnapshotStore;

pub use commands::{Command, CommandOutcome};

/// One upgrade row as the presentation layer shows it.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeView {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub cost: u64,
    pub effect_description: String,
    pub affordable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AchievementView {
    pub id: String,
    pub title: String,
    pub reward: u64,
    pub status: AchievementStatus,
}

/// Read-only snapshot for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyView {
    pub coins: u64,
    pub diamonds: u64,
    pub click_value: f64,
    pub passive_income_per_sec: f64,
    pub apartment_level_index: usize,
    pub apartment_name: String,
    pub next_apartment_threshold: Option<u64>,
    pub upgrades: Vec<UpgradeView>,
    pub achievements: Vec<AchievementView>,
    pub daily_reward_available: bool,
}

/// The economy service.
///
/// Purchases, resets, diamond awards, claims and offline payouts are written
/// through to the store immediately. Clicks and live passive income only mark
/// the state dirty; those are written every `autosave_interval_secs` of
/// ticked time, on suspend, or on [`Economy::flush`].
///
/// When the store fails to read at load, nothing is written until
/// [`Economy::reset`] or [`Economy::overwrite_unread_snapshot`].
pub struct Economy<S: SnapshotStore, C: Clock = SystemClock> {
    config: EconomyConfig,
    state: EconomyState,
    store: S,
    clock: C,
    accrual: PassiveAccrual,
    /// `accrual.seconds.total_seconds` at the last autosave.
    last_autosave_secs: u64,
    dirty: bool,
    suspended: bool,
    /// Load could not read the store; writes are held back.
    unread_snapshot: bool,
}

impl<S: SnapshotStore, C: Clock> Economy<S, C> {
    /// Load the stored snapshot (or start fresh), count the login, pay any
    /// offline income and persist the result.
    ///
    /// A missing or unusable snapshot is never fatal: the player starts from
    /// the default tables. Only an invalid `config` is an error.
    pub fn load(config: EconomyConfig, store: S, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut unread_snapshot = false;
        let mut state = match store.read() {
            Ok(Some(json)) => match save::from_json(&json, &config) {
                Ok(state) => state,
                Err(e) => {
                    console::warn(&format!("discarding unusable save data: {e}"));
                    let mut state = EconomyState::new(&config);
                    state.add_log("Save data was corrupted. Starting a new game.", true);
                    state
                }
            },
            Ok(None) => EconomyState::new(&config),
            Err(e) => {
                console::warn(&format!("could not read save data: {e}"));
                unread_snapshot = true;
                let mut state = EconomyState::new(&config);
                state.add_log(
                    "Save data could not be read. Progress will not be saved.",
                    true,
                );
                state
            }
        };

        state.login_count = state.login_count.saturating_add(1);

        let mut economy = Self {
            config,
            state,
            store,
            clock,
            accrual: PassiveAccrual::new(),
            last_autosave_secs: 0,
            dirty: true,
            suspended: false,
            unread_snapshot,
        };
        let now = economy.clock.now_unix_secs();
        logic::apply_offline_payout(&mut economy.state, now);
        economy.after_balance_change();
        economy.persist();
        Ok(economy)
    }

    // ── Commands ─────────────────────────────────────────

    pub fn on_click(&mut self) -> ClickOutcome {
        let outcome = logic::click(&mut self.state, &self.config.ladder);
        self.dirty = true;
        let changed = self.after_balance_change();
        if outcome.diamonds.is_some() || changed {
            self.persist();
        }
        outcome
    }

    pub fn try_purchase(&mut self, id: &str) -> Result<PurchaseReceipt, PurchaseError> {
        let receipt = logic::try_purchase(&mut self.state, id)?;
        self.after_balance_change();
        self.dirty = true;
        self.persist();
        Ok(receipt)
    }

    /// Wipe progress. Also clears a pending unread snapshot, so the fresh
    /// state replaces it.
    pub fn reset(&mut self) {
        self.unread_snapshot = false;
        logic::reset(&mut self.state, &self.config);
        self.accrual.clear();
        self.after_balance_change();
        self.dirty = true;
        self.persist();
    }

    /// Advance live passive income by `elapsed_real_secs` of unscaled time.
    /// Returns the coins paid. Ignored while suspended.
    pub fn tick(&mut self, elapsed_real_secs: f64) -> u64 {
        if self.suspended {
            return 0;
        }
        let paid = self.accrual.tick(&mut self.state, elapsed_real_secs);
        if paid > 0 {
            self.dirty = true;
            if self.after_balance_change() {
                self.persist();
            }
        }

        let elapsed = self
            .accrual
            .seconds
            .total_seconds
            .saturating_sub(self.last_autosave_secs);
        if self.dirty && elapsed >= self.config.autosave_interval_secs {
            self.persist();
        }
        paid
    }

    /// The host is going to background or exiting: stamp the quit time and
    /// write the final snapshot.
    /// A second suspend without a resume keeps the first stamp.
    pub fn on_suspend(&mut self) {
        if self.state.last_quit_timestamp.is_none() {
            self.state.last_quit_timestamp = Some(self.clock.now_unix_secs());
        }
        self.accrual.clear();
        self.suspended = true;
        self.dirty = true;
        self.persist();
    }

    /// The host came back without restarting: pay the time away.
    pub fn on_resume(&mut self) -> Option<OfflinePayout> {
        self.suspended = false;
        let now = self.clock.now_unix_secs();
        let payout = logic::apply_offline_payout(&mut self.state, now);
        if payout.is_some() {
            self.after_balance_change();
            self.dirty = true;
            self.persist();
        }
        payout
    }

    pub fn claim_achievement(&mut self, id: &str) -> Result<u64, ClaimError> {
        let reward = logic::claim_achievement(&mut self.state, id)?;
        self.after_balance_change();
        self.dirty = true;
        self.persist();
        Ok(reward)
    }

    pub fn claim_daily_reward(&mut self) -> Result<u64, ClaimError> {
        let now = self.clock.now_unix_secs();
        let amount = logic::claim_daily_reward(&mut self.state, now, self.config.daily_reward)?;
        self.after_balance_change();
        self.dirty = true;
        self.persist();
        Ok(amount)
    }

    /// Debug: move up one apartment regardless of coins.
    pub fn force_upgrade_apartment(&mut self) -> bool {
        let moved = logic::force_upgrade_apartment(&mut self.state, &self.config.apartments);
        if moved {
            self.dirty = true;
            self.persist();
        }
        moved
    }

    /// Write pending changes now.
    pub fn flush(&mut self) -> Result<(), SaveError> {
        if !self.dirty {
            return Ok(());
        }
        self.write_snapshot()
    }

    /// Give up on the snapshot that failed to read and write the current
    /// state over it.
    pub fn overwrite_unread_snapshot(&mut self) -> Result<(), SaveError> {
        self.unread_snapshot = false;
        self.write_snapshot()
    }

    // ── Queries ──────────────────────────────────────────

    pub fn view(&self) -> EconomyView {
        let state = &self.state;
        let apartments = &self.config.apartments;
        EconomyView {
            coins: state.coins,
            diamonds: state.diamonds,
            click_value: state.click_value,
            passive_income_per_sec: state.passive_income_per_sec,
            apartment_level_index: state.apartment_level_index,
            apartment_name: apartments
                .get(state.apartment_level_index)
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            next_apartment_threshold: logic::next_apartment_threshold(state, apartments),
            upgrades: state
                .upgrades
                .iter()
                .map(|u| UpgradeView {
                    id: u.id.clone(),
                    name: u.name.clone(),
                    level: u.level,
                    cost: u.current_cost,
                    effect_description: u.effect_description(),
                    affordable: state.can_afford(u),
                })
                .collect(),
            achievements: state
                .achievements
                .iter()
                .map(|a| AchievementView {
                    id: a.id.clone(),
                    title: a.title.clone(),
                    reward: a.reward,
                    status: a.status,
                })
                .collect(),
            daily_reward_available: self.daily_reward_available(),
        }
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.state.log
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn daily_reward_available(&self) -> bool {
        logic::daily_reward_available(&self.state, self.clock.now_unix_secs())
    }

    /// True when there are changes not yet written to the store.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// True when load could not read the store and writes are held back.
    pub fn has_unread_snapshot(&self) -> bool {
        self.unread_snapshot
    }

    // ── Internals ────────────────────────────────────────

    /// Re-run the balance-driven state machines. Returns true when an
    /// apartment unlocked or an achievement became ready.
    fn after_balance_change(&mut self) -> bool {
        let moved = logic::evaluate_apartment(&mut self.state, &self.config.apartments);
        let ready = logic::check_achievements(&mut self.state);
        moved > 0 || ready > 0
    }

    fn write_snapshot(&mut self) -> Result<(), SaveError> {
        if self.unread_snapshot {
            return Err(SaveError::UnreadSnapshot);
        }
        let json = save::to_json(&self.state)?;
        self.store.write(&json)?;
        self.dirty = false;
        self.last_autosave_secs = self.accrual.seconds.total_seconds;
        Ok(())
    }

    /// Write-through; failures are logged and the state stays dirty.
    fn persist(&mut self) {
        if self.unread_snapshot {
            return;
        }
        if let Err(e) = self.write_snapshot() {
            console::warn(&format!("save failed: {e}"));
        }
    }
}
