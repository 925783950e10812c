use std::fmt;

/// Why a purchase did not happen. State is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    UnknownUpgrade(String),
    InsufficientFunds { id: String, cost: u64, coins: u64 },
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUpgrade(id) => write!(f, "unknown upgrade `{id}`"),
            Self::InsufficientFunds { id, cost, coins } => {
                write!(f, "not enough coins for `{id}`: need {cost}, have {coins}")
            }
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Why an achievement or reward claim did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    UnknownAchievement(String),
    NotReady(String),
    AlreadyClaimed(String),
    DailyRewardTaken { day: u64 },
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAchievement(id) => write!(f, "unknown achievement `{id}`"),
            Self::NotReady(id) => write!(f, "achievement `{id}` is not completed yet"),
            Self::AlreadyClaimed(id) => write!(f, "achievement `{id}` was already claimed"),
            Self::DailyRewardTaken { day } => {
                write!(f, "daily reward already claimed on day {day}")
            }
        }
    }
}

impl std::error::Error for ClaimError {}

/// A stored snapshot that cannot be used.
#[derive(Debug)]
pub enum SnapshotError {
    Parse(serde_json::Error),
    IncompatibleVersion { saved: u32, min_compatible: u32 },
    Invalid(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "snapshot parse error: {err}"),
            Self::IncompatibleVersion {
                saved,
                min_compatible,
            } => write!(
                f,
                "snapshot version {saved} is older than the minimum compatible version {min_compatible}"
            ),
            Self::Invalid(reason) => write!(f, "invalid snapshot: {reason}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Storage backend failure.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// The backend does not exist in this environment (e.g. no localStorage).
    Unavailable,
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Unavailable => write!(f, "storage is not available"),
            Self::Backend(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Errors from a save attempt.
#[derive(Debug)]
pub enum SaveError {
    Serialize(serde_json::Error),
    Store(StoreError),
    /// The stored snapshot could not be read at load, so it is left alone.
    UnreadSnapshot,
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "snapshot serialization failed: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::UnreadSnapshot => {
                write!(f, "stored snapshot could not be read; not overwriting it")
            }
        }
    }
}

impl std::error::Error for SaveError {}

impl From<serde_json::Error> for SaveError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<StoreError> for SaveError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Rejected tuning tables.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    DuplicateUpgrade(String),
    InvalidCostMultiplier { id: String, multiplier: f64 },
    NoApartments,
    FirstThresholdNotZero(u64),
    ThresholdsNotIncreasing { index: usize },
    ZeroLadderThreshold,
    DuplicateAchievement(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::DuplicateUpgrade(id) => write!(f, "duplicate upgrade id `{id}`"),
            Self::InvalidCostMultiplier { id, multiplier } => {
                write!(f, "upgrade `{id}` has cost multiplier {multiplier}, must be > 1")
            }
            Self::NoApartments => write!(f, "at least one apartment level is required"),
            Self::FirstThresholdNotZero(t) => {
                write!(f, "first apartment threshold must be 0, got {t}")
            }
            Self::ThresholdsNotIncreasing { index } => {
                write!(f, "apartment threshold {index} is not above the previous one")
            }
            Self::ZeroLadderThreshold => write!(f, "diamond ladder threshold must be > 0"),
            Self::DuplicateAchievement(id) => write!(f, "duplicate achievement id `{id}`"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
