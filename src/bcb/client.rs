use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{SeriesPoint, SgsSeries};

#[derive(Debug, Error)]
pub enum BcbError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Client for the central bank's SGS open-data API.
#[derive(Debug, Clone)]
pub struct BcbClient {
    http: Client,
    base_url: String,
}

impl BcbClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BcbError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn latest_url(&self, series: SgsSeries) -> String {
        format!("{}.{}/dados/ultimos/1?formato=json", self.base_url, series.code())
    }

    /// Most recent observation of a series. `Ok(None)` when the series is empty.
    pub async fn get_latest(&self, series: SgsSeries) -> Result<Option<Decimal>, BcbError> {
        let resp = self
            .http
            .get(self.latest_url(series))
            .send()
            .await?
            .error_for_status()?;

        let points: Vec<SeriesPoint> = resp.json().await?;
        match points.last() {
            None => Ok(None),
            Some(point) => point
                .value()
                .map(Some)
                .ok_or_else(|| BcbError::Unexpected(format!("unparsable value '{}' for series {}", point.valor, series.code()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_url() {
        let client = BcbClient::with_http(Client::new(), "https://api.bcb.gov.br/dados/serie/bcdata.sgs/");
        assert_eq!(
            client.latest_url(SgsSeries::Cdi),
            "https://api.bcb.gov.br/dados/serie/bcdata.sgs.4392/dados/ultimos/1?formato=json"
        );
    }
}
