//! Core types: odds payload wire model and probability distributions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of the upstream odds payload's `response` array: everything the
/// provider knows about a single fixture, grouped per bookmaker.
///
/// Every nesting level is optional on the wire; absence short-circuits the
/// scan at that level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmakerGroup {
    #[serde(default)]
    pub bookmakers: Option<Vec<Bookmaker>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub markets: Option<Vec<MarketQuote>>,
}

/// One bookmaker's quoted market for a fixture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketQuote {
    /// Human-readable market label, e.g. `"3-way"`.
    #[serde(default)]
    pub market: Option<String>,
    /// Short market key, e.g. `"h2h"` or `"3way"`.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub outcomes: Option<Vec<OutcomeQuote>>,
}

/// A single outcome of a market: a free-text label and a decimal price.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutcomeQuote {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<OddsPrice>,
}

/// Decimal price as the upstream emits it: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OddsPrice {
    Number(f64),
    Text(String),
}

impl OddsPrice {
    /// The price as a finite number > 0, or `None`.
    ///
    /// Zero, negative, non-finite, and unparseable prices all count as
    /// absent, which makes the enclosing market unusable.
    pub fn as_positive_decimal(&self) -> Option<Decimal> {
        let value = match self {
            OddsPrice::Number(n) => Decimal::try_from(*n).ok()?,
            OddsPrice::Text(s) => Decimal::from_str(s.trim()).ok()?,
        };
        (value > Decimal::ZERO).then_some(value)
    }
}

/// Three-way outcome distribution. Components are each in [0, 1] and sum to
/// 1 within floating-point tolerance; constructed fresh per request and
/// never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchProbabilities {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

impl MatchProbabilities {
    pub fn sum(&self) -> Decimal {
        self.home + self.draw + self.away
    }

    /// Round each component for presentation. The unrounded values are the
    /// ones that satisfy the sum-to-1 invariant.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            home: self.home.round_dp(dp),
            draw: self.draw.round_dp(dp),
            away: self.away.round_dp(dp),
        }
    }
}

/// Where a prediction's probabilities came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// Derived from a bookmaker's three-way market.
    BookmakerOdds,
    /// Static fallback used when no usable market was found.
    HeuristicDefault,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionSource::BookmakerOdds => "bookmaker_odds",
            PredictionSource::HeuristicDefault => "heuristic_default",
        }
    }
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
