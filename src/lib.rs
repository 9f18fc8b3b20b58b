//! Football Prediction Backend
//!
//! A Rust backend that proxies a third-party football-data API and derives
//! match outcome probabilities from bookmaker odds.
//!
//! ## Architecture
//!
//! ```text
//! HTTP routes (axum) → FootballClient (upstream provider) → OddsNormalizer
//!        │                                                       │
//!   fixtures/odds passthrough                    win/draw/away probabilities
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod predict;
pub mod server;
pub mod types;
