//! Football-data API client
//!
//! Thin wrapper over the RapidAPI-hosted provider. Each call carries the
//! RapidAPI headers and a request timeout; non-2xx replies surface as typed
//! errors with a body snippet for the logs.

use crate::config::ProviderConfig;
use crate::error::{BackendError, Result};
use crate::types::BookmakerGroup;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::FixtureDataProvider;

/// The provider nests every payload under `response`.
#[derive(Debug, Deserialize)]
struct OddsPayload {
    #[serde(default)]
    response: Vec<BookmakerGroup>,
}

#[derive(Clone)]
pub struct FootballClient {
    http: Client,
    base_url: String,
}

impl FootballClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("x-rapidapi-key", HeaderValue::from_str(&config.api_key)?);
        headers.insert("x-rapidapi-host", HeaderValue::from_str(&config.api_host)?);

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let resp = self.http.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl FixtureDataProvider for FootballClient {
    async fn fixtures_by_date(&self, date: NaiveDate) -> Result<Value> {
        self.get_json("fixtures", &[("date", date.format("%Y-%m-%d").to_string())])
            .await
    }

    async fn fixtures_by_league(&self, league: u32, season: i32) -> Result<Value> {
        self.get_json(
            "fixtures",
            &[("league", league.to_string()), ("season", season.to_string())],
        )
        .await
    }

    async fn odds_raw(&self, fixture_id: u64) -> Result<Value> {
        self.get_json("odds", &[("fixture", fixture_id.to_string())])
            .await
    }

    async fn odds_for_fixture(&self, fixture_id: u64) -> Result<Vec<BookmakerGroup>> {
        let raw = self.odds_raw(fixture_id).await?;
        let payload: OddsPayload = serde_json::from_value(raw)?;
        debug!(
            "fixture {}: {} bookmaker group(s)",
            fixture_id,
            payload.response.len()
        );
        Ok(payload.response)
    }
}

/// One-line body excerpt for error messages; upstream errors can be pages of
/// HTML.
fn snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(220)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_comes_from_provider_config() {
        let config = ProviderConfig {
            api_key: "key".to_string(),
            api_host: "example.test".to_string(),
            timeout_secs: 5,
        };
        let client = FootballClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://example.test/v3");
    }

    #[test]
    fn snippet_flattens_and_truncates() {
        let flat = snippet("  line one\nline two\r\n  ");
        assert_eq!(flat, "line one line two");

        let long = "x".repeat(500);
        assert_eq!(snippet(&long).len(), 220);
    }

    #[test]
    fn odds_payload_tolerates_missing_response() {
        let payload: OddsPayload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(payload.response.is_empty());
    }
}
