//! Implied-probability prediction from bookmaker odds
//!
//! Converts a fixture's bookmaker quotes into a normalized win/draw/loss
//! distribution. The reciprocal of a decimal price is the outcome's implied
//! probability; dividing the three reciprocals by their sum removes the
//! bookmaker overround. When no usable three-way market exists the
//! normalizer degrades to a fixed heuristic distribution instead of failing.


use crate::types::{
    BookmakerGroup, MarketQuote, MatchProbabilities, OutcomeQuote, PredictionSource,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Distribution used when no bookmaker quote is usable.
pub const FALLBACK_PROBABILITIES: MatchProbabilities = MatchProbabilities {
    home: dec!(0.45),
    draw: dec!(0.25),
    away: dec!(0.30),
};

/// Output of [`OddsNormalizer::normalize`] for one fixture.
#[derive(Debug, Clone)]
pub struct NormalizedPrediction {
    pub probabilities: MatchProbabilities,
    pub source: PredictionSource,
}

/// Turns raw bookmaker quotes into a normalized probability distribution.
///
/// Scans groups, bookmakers, and markets strictly in input order and takes
/// the first three-way market carrying usable home/draw/away prices. There
/// is no aggregation across bookmakers and no best-price selection; a pure,
/// synchronous computation that never errors.
#[derive(Debug, Clone)]
pub struct OddsNormalizer {
    fallback: MatchProbabilities,
}

impl OddsNormalizer {
    pub fn new(fallback: MatchProbabilities) -> Self {
        Self { fallback }
    }

    /// Derive win/draw/loss probabilities from the odds payload's bookmaker
    /// groups, or fall back to the configured default distribution.
    ///
    /// The returned probabilities are unrounded; rounding for presentation
    /// is the caller's concern.
    pub fn normalize(&self, groups: &[BookmakerGroup]) -> NormalizedPrediction {
        for group in groups {
            for bookmaker in group.bookmakers.iter().flatten() {
                for market in bookmaker.markets.iter().flatten() {
                    if !is_three_way_market(market) {
                        continue;
                    }
                    if let Some(probabilities) = implied_from_market(market) {
                        return NormalizedPrediction {
                            probabilities,
                            source: PredictionSource::BookmakerOdds,
                        };
                    }
                }
            }
        }

        NormalizedPrediction {
            probabilities: self.fallback,
            source: PredictionSource::HeuristicDefault,
        }
    }
}

impl Default for OddsNormalizer {
    fn default() -> Self {
        Self::new(FALLBACK_PROBABILITIES)
    }
}

/// The upstream's known vocabulary for 1X2 markets. Exact, case-sensitive.
fn is_three_way_market(market: &MarketQuote) -> bool {
    market.market.as_deref() == Some("3-way")
        || market.key.as_deref() == Some("3way")
        || market.key.as_deref() == Some("h2h")
}

/// Extract the three outcome prices from a market and normalize their
/// reciprocals. `None` when any of the three lookups fails; the caller then
/// continues with the next market.
fn implied_from_market(market: &MarketQuote) -> Option<MatchProbabilities> {
    let outcomes = market.outcomes.as_deref().unwrap_or_default();

    let home_price = find_price(outcomes, &["home"])?;
    let draw_price = find_price(outcomes, &["draw", "tie"])?;
    let away_price = find_price(outcomes, &["away"])?;

    // Prices below 1.0 are not rejected: their reciprocal exceeds 1, and the
    // division by the sum still forces every component into [0, 1].
    let implied_home = Decimal::ONE / home_price;
    let implied_draw = Decimal::ONE / draw_price;
    let implied_away = Decimal::ONE / away_price;
    let sum = implied_home + implied_draw + implied_away;

    Some(MatchProbabilities {
        home: implied_home / sum,
        draw: implied_draw / sum,
        away: implied_away / sum,
    })
}

/// Price of the first outcome whose name contains any of `needles`
/// (case-insensitive substring match). The match is on the name alone: if
/// the named outcome carries no positive price the whole lookup fails
/// rather than moving on to a later outcome.
fn find_price(outcomes: &[OutcomeQuote], needles: &[&str]) -> Option<Decimal> {
    outcomes
        .iter()
        .find(|outcome| {
            let name = outcome.name.to_lowercase();
            needles.iter().any(|needle| name.contains(needle))
        })
        .and_then(|outcome| outcome.price.as_ref()?.as_positive_decimal())
}
