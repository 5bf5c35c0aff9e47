use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Scenario, Trend};

/// The indicators the allocation engine knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    PolicyRate,
    Inflation,
    InterbankRate,
    EquityIndexDelta,
    FxRate,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::PolicyRate,
        IndicatorKind::Inflation,
        IndicatorKind::InterbankRate,
        IndicatorKind::EquityIndexDelta,
        IndicatorKind::FxRate,
    ];

    /// Code stored in the macro_indicators table.
    pub fn code(&self) -> &'static str {
        match self {
            IndicatorKind::PolicyRate => "SELIC",
            IndicatorKind::Inflation => "IPCA",
            IndicatorKind::InterbankRate => "CDI",
            IndicatorKind::EquityIndexDelta => "IBOV",
            IndicatorKind::FxRate => "USD",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_uppercase();
        Self::ALL.into_iter().find(|k| k.code() == code)
    }
}

/// Database row for the macro_indicators table.
#[derive(Debug, Clone, FromRow)]
pub struct MacroIndicatorRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub current_value: Decimal,
    pub previous_value: Option<Decimal>,
    pub trend: String,
    pub unit: Option<String>,
    pub source: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicator {
    pub kind: IndicatorKind,
    pub value: Decimal,
    pub previous_value: Option<Decimal>,
    pub trend: Trend,
    pub updated_at: DateTime<Utc>,
}

impl MacroIndicatorRow {
    /// Rows with codes the engine does not read are skipped (`Ok(None)`).
    pub fn into_indicator(self) -> anyhow::Result<Option<MacroIndicator>> {
        let Some(kind) = IndicatorKind::from_code(&self.code) else {
            return Ok(None);
        };
        let trend = Trend::from_str(&self.trend)
            .ok_or_else(|| anyhow::anyhow!("unknown trend '{}' for indicator {}", self.trend, self.code))?;

        Ok(Some(MacroIndicator {
            kind,
            value: self.current_value,
            previous_value: self.previous_value,
            trend,
            updated_at: self.updated_at,
        }))
    }
}

/// Read-only view of the macro context taken at the start of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSnapshot {
    pub as_of: DateTime<Utc>,
    pub indicators: Vec<MacroIndicator>,
    pub scenario: Scenario,
}

impl MacroSnapshot {
    pub fn new(indicators: Vec<MacroIndicator>, as_of: DateTime<Utc>) -> Self {
        let scenario = Scenario::from_trends(indicators.iter().map(|i| i.trend));
        Self {
            as_of,
            indicators,
            scenario,
        }
    }

    pub fn indicator(&self, kind: IndicatorKind) -> Option<&MacroIndicator> {
        self.indicators.iter().find(|i| i.kind == kind)
    }

    /// Current value, or zero when the indicator is absent.
    pub fn value(&self, kind: IndicatorKind) -> Decimal {
        self.indicator(kind).map(|i| i.value).unwrap_or(Decimal::ZERO)
    }

    pub fn policy_rate(&self) -> Decimal {
        self.value(IndicatorKind::PolicyRate)
    }

    pub fn equity_index_delta(&self) -> Decimal {
        self.value(IndicatorKind::EquityIndexDelta)
    }

    /// Short investor-facing hints derived from indicator trends.
    pub fn advisories(&self) -> Vec<String> {
        let mut out = Vec::new();

        if self.indicator(IndicatorKind::PolicyRate).map(|i| i.trend) == Some(Trend::Up) {
            out.push("Policy rate is rising: consider increasing the fixed income position".to_string());
        }
        if self.indicator(IndicatorKind::FxRate).map(|i| i.trend) == Some(Trend::Up) {
            out.push("Foreign exchange rate is rising: exporters and FX funds tend to benefit".to_string());
        }

        out
    }
}
