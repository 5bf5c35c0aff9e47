use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::IndicatorKind;

/// SGS time series published by the central bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SgsSeries {
    Selic,
    Ipca,
    Cdi,
    UsdPtax,
}

impl SgsSeries {
    pub const ALL: [SgsSeries; 4] = [SgsSeries::Selic, SgsSeries::Ipca, SgsSeries::Cdi, SgsSeries::UsdPtax];

    pub fn code(&self) -> u32 {
        match self {
            SgsSeries::Selic => 432,
            SgsSeries::Ipca => 433,
            SgsSeries::Cdi => 4392,
            SgsSeries::UsdPtax => 1,
        }
    }

    /// The stored indicator this series feeds.
    pub fn indicator(&self) -> IndicatorKind {
        match self {
            SgsSeries::Selic => IndicatorKind::PolicyRate,
            SgsSeries::Ipca => IndicatorKind::Inflation,
            SgsSeries::Cdi => IndicatorKind::InterbankRate,
            SgsSeries::UsdPtax => IndicatorKind::FxRate,
        }
    }
}

/// One observation as returned by `/dados/ultimos/N?formato=json`.
///
/// `valor` uses a comma as decimal separator in some series.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeriesPoint {
    pub data: String,
    pub valor: String,
}

impl SeriesPoint {
    pub fn value(&self) -> Option<Decimal> {
        let normalized = self.valor.trim().replace(',', ".");
        Decimal::from_str(&normalized).ok()
    }
}
