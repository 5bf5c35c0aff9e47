pub mod asset;
pub mod audit;
pub mod client;
pub mod macro_indicator;
pub mod portfolio;
pub mod request;

pub use asset::{Asset, AssetInput, AssetRow};
pub use audit::AuditEntry;
pub use client::{Client, ClientConflict, ClientInput, ClientProfile};
pub use macro_indicator::{IndicatorKind, MacroIndicator, MacroIndicatorRow, MacroSnapshot};
pub use request::{AllocationParams, RecommendationRequest, MAX_AMOUNT};
pub use portfolio::{
    ApprovalStatus, ClassShare, Concentration, DiversificationReport, MonthlyProjection, Portfolio,
    PortfolioItem, ProjectionSeries,
};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RiskProfile: client tier, also the risk level of an asset
// ---------------------------------------------------------------------------

/// Ordered: Conservative < Moderate < Aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Some(RiskProfile::Conservative),
            "moderate" => Some(RiskProfile::Moderate),
            "aggressive" => Some(RiskProfile::Aggressive),
            _ => None,
        }
    }

    /// Whether an asset at `risk` may be offered to a client of this tier.
    pub fn accepts(&self, risk: RiskProfile) -> bool {
        match self {
            RiskProfile::Conservative => risk == RiskProfile::Conservative,
            RiskProfile::Moderate => risk <= RiskProfile::Moderate,
            RiskProfile::Aggressive => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssetClass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    FixedIncome,
    Equity,
    Fund,
    Crypto,
    Commodity,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::FixedIncome,
        AssetClass::Equity,
        AssetClass::Fund,
        AssetClass::Crypto,
        AssetClass::Commodity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::FixedIncome => "fixed_income",
            AssetClass::Equity => "equity",
            AssetClass::Fund => "fund",
            AssetClass::Crypto => "crypto",
            AssetClass::Commodity => "commodity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed_income" => Some(AssetClass::FixedIncome),
            "equity" => Some(AssetClass::Equity),
            "fund" => Some(AssetClass::Fund),
            "crypto" => Some(AssetClass::Crypto),
            "commodity" => Some(AssetClass::Commodity),
            _ => None,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Objective
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    ShortTerm,
    MediumTerm,
    LongTerm,
    Retirement,
    EmergencyReserve,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::ShortTerm => "short_term",
            Objective::MediumTerm => "medium_term",
            Objective::LongTerm => "long_term",
            Objective::Retirement => "retirement",
            Objective::EmergencyReserve => "emergency_reserve",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "short_term" => Some(Objective::ShortTerm),
            "medium_term" => Some(Objective::MediumTerm),
            "long_term" => Some(Objective::LongTerm),
            "retirement" => Some(Objective::Retirement),
            "emergency_reserve" => Some(Objective::EmergencyReserve),
            _ => None,
        }
    }

    /// Human-readable form used in rationale text.
    pub fn describe(&self) -> &'static str {
        match self {
            Objective::ShortTerm => "short-term",
            Objective::MediumTerm => "medium-term",
            Objective::LongTerm => "long-term",
            Objective::Retirement => "retirement",
            Objective::EmergencyReserve => "emergency reserve",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trend / Scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Some(Trend::Up),
            "down" => Some(Trend::Down),
            "stable" => Some(Trend::Stable),
            _ => None,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Optimistic,
    Cautious,
    Neutral,
}

impl Scenario {
    /// Majority vote of indicator trends; a tie is Neutral.
    pub fn from_trends<I>(trends: I) -> Self
    where
        I: IntoIterator<Item = Trend>,
    {
        let (up, down) = trends.into_iter().fold((0usize, 0usize), |(up, down), t| match t {
            Trend::Up => (up + 1, down),
            Trend::Down => (up, down + 1),
            Trend::Stable => (up, down),
        });

        if up > down {
            Scenario::Optimistic
        } else if down > up {
            Scenario::Cautious
        } else {
            Scenario::Neutral
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Optimistic => write!(f, "optimistic"),
            Scenario::Cautious => write!(f, "cautious"),
            Scenario::Neutral => write!(f, "neutral"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
