//! Clients for the upstream football-data provider

pub mod football;

pub use football::FootballClient;

use crate::error::Result;
use crate::types::BookmakerGroup;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

/// Upstream data source consumed by the HTTP layer and the CLI.
///
/// The proxy routes relay the raw payloads verbatim; the prediction pipeline
/// uses the typed odds accessor.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FixtureDataProvider: Send + Sync {
    /// Fixtures scheduled on a calendar date.
    async fn fixtures_by_date(&self, date: NaiveDate) -> Result<Value>;

    /// Fixtures of a league for a season year.
    async fn fixtures_by_league(&self, league: u32, season: i32) -> Result<Value>;

    /// Raw bookmaker odds payload for one fixture.
    async fn odds_raw(&self, fixture_id: u64) -> Result<Value>;

    /// Bookmaker odds for one fixture, typed for the normalizer.
    async fn odds_for_fixture(&self, fixture_id: u64) -> Result<Vec<BookmakerGroup>>;
}
