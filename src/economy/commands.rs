//! Presentation-layer commands.
//!
//! A UI can either call the `Economy` methods directly or translate its
//! input into a [`Command`] and [`Economy::dispatch`] it.

use super::error::{ClaimError, PurchaseError};
use super::logic::{ClickOutcome, OfflinePayout, PurchaseReceipt};
use super::store::SnapshotStore;
use super::Economy;
use crate::time::Clock;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Click,
    Purchase(String),
    Reset,
    /// Real elapsed seconds since the previous tick.
    Tick(f64),
    Suspend,
    Resume,
    ClaimAchievement(String),
    ClaimDailyReward,
    ForceUpgradeApartment,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommandOutcome {
    Clicked(ClickOutcome),
    Purchased(PurchaseReceipt),
    PurchaseFailed(PurchaseError),
    Reset,
    Ticked { coins: u64 },
    Suspended,
    Resumed(Option<OfflinePayout>),
    Claimed { reward: u64 },
    ClaimFailed(ClaimError),
    ApartmentForced { moved: bool },
}

impl CommandOutcome {
    /// True for the outcomes the UI should answer with an error toast.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::PurchaseFailed(_) | Self::ClaimFailed(_))
    }
}

impl<S: SnapshotStore, C: Clock> Economy<S, C> {
    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Click => CommandOutcome::Clicked(self.on_click()),
            Command::Purchase(id) => match self.try_purchase(&id) {
                Ok(receipt) => CommandOutcome::Purchased(receipt),
                Err(e) => CommandOutcome::PurchaseFailed(e),
            },
            Command::Reset => {
                self.reset();
                CommandOutcome::Reset
            }
            Command::Tick(secs) => CommandOutcome::Ticked {
                coins: self.tick(secs),
            },
            Command::Suspend => {
                self.on_suspend();
                CommandOutcome::Suspended
            }
            Command::Resume => CommandOutcome::Resumed(self.on_resume()),
            Command::ClaimAchievement(id) => match self.claim_achievement(&id) {
                Ok(reward) => CommandOutcome::Claimed { reward },
                Err(e) => CommandOutcome::ClaimFailed(e),
            },
            Command::ClaimDailyReward => match self.claim_daily_reward() {
                Ok(reward) => CommandOutcome::Claimed { reward },
                Err(e) => CommandOutcome::ClaimFailed(e),
            },
            Command::ForceUpgradeApartment => CommandOutcome::ApartmentForced {
                moved: self.force_upgrade_apartment(),
            },
        }
    }
}
