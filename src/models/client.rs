use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Objective, RiskProfile, MAX_AMOUNT};

/// Database row for the clients table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub birth_date: NaiveDate,
    pub monthly_income: Decimal,
    pub available_capital: Decimal,
    pub risk_profile: String,
    pub objective: String,
    pub horizon_months: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Normalized investor profile consumed by the allocation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub client_id: Uuid,
    pub name: String,
    pub risk_profile: RiskProfile,
    pub objective: Objective,
    pub horizon_months: i32,
    pub available_capital: Decimal,
    pub monthly_income: Decimal,
    pub age: i32,
    pub investment_capacity: Decimal,
}

impl ClientProfile {
    pub fn from_client(client: &Client, today: NaiveDate) -> anyhow::Result<Self> {
        let risk_profile = RiskProfile::from_str(&client.risk_profile)
            .ok_or_else(|| anyhow::anyhow!("unknown risk profile '{}' for client {}", client.risk_profile, client.id))?;
        let objective = Objective::from_str(&client.objective)
            .ok_or_else(|| anyhow::anyhow!("unknown objective '{}' for client {}", client.objective, client.id))?;

        Ok(Self {
            client_id: client.id,
            name: client.name.clone(),
            risk_profile,
            objective,
            horizon_months: client.horizon_months,
            available_capital: client.available_capital,
            monthly_income: client.monthly_income,
            age: age_on(client.birth_date, today),
            investment_capacity: investment_capacity(client.monthly_income, client.available_capital),
        })
    }
}

/// Registration payload for creating or replacing a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub monthly_income: Decimal,
    #[serde(default)]
    pub available_capital: Decimal,
    pub risk_profile: RiskProfile,
    pub objective: Objective,
    pub horizon_months: i32,
}

impl ClientInput {
    /// Trimmed text fields, email lowercased, tax id reduced to its digits.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.tax_id = self.tax_id.chars().filter(char::is_ascii_digit).collect();
        self
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && domain.contains('.') => {}
            _ => return Err(format!("invalid email '{email}'")),
        }
        if self.tax_id.trim().is_empty() {
            return Err("tax_id is required".into());
        }
        if self.birth_date > today {
            return Err(format!("birth_date {} is in the future", self.birth_date));
        }
        for (field, value) in [
            ("monthly_income", self.monthly_income),
            ("available_capital", self.available_capital),
        ] {
            if value.is_sign_negative() || value > MAX_AMOUNT {
                return Err(format!("{field} must be between 0 and {MAX_AMOUNT}, got {value}"));
            }
        }
        if self.horizon_months <= 0 {
            return Err(format!("horizon_months must be positive, got {}", self.horizon_months));
        }
        Ok(())
    }
}

/// Unique client attribute already held by another active client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientConflict {
    TaxId,
    Email,
}

impl ClientConflict {
    pub fn field(&self) -> &'static str {
        match self {
            ClientConflict::TaxId => "tax_id",
            ClientConflict::Email => "email",
        }
    }
}

/// Whole years elapsed since `birth_date`, counting the birthday itself.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// 10% of monthly income set aside regularly, plus capital already available.
pub fn investment_capacity(monthly_income: Decimal, available_capital: Decimal) -> Decimal {
    monthly_income * Decimal::new(1, 1) + available_capital
}
