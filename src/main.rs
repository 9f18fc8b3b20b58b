//! Football fixtures proxy and match outcome prediction backend

use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use matchday_backend::{
    client::{FixtureDataProvider, FootballClient},
    config::Config,
    predict::OddsNormalizer,
    server::{self, AppState},
};
use rust_decimal::Decimal;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "matchday-backend")]
#[command(about = "Football fixtures proxy and match outcome prediction backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show fixtures for a date or a league
    Fixtures {
        /// Calendar date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// League id (switches to a league/season lookup)
        #[arg(long)]
        league: Option<u32>,
        /// Season year for the league lookup, defaults to the current year
        #[arg(long)]
        season: Option<i32>,
    },
    /// Show raw bookmaker odds for a fixture
    Odds {
        /// Provider-assigned fixture id
        fixture_id: u64,
    },
    /// Predict the outcome of a fixture
    Predict {
        /// Provider-assigned fixture id
        fixture_id: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => run_server(config, port).await,
        Commands::Fixtures {
            date,
            league,
            season,
        } => show_fixtures(config, date, league, season).await,
        Commands::Odds { fixture_id } => show_odds(config, fixture_id).await,
        Commands::Predict { fixture_id } => predict_fixture(config, fixture_id).await,
    }
}

async fn run_server(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    let provider = Arc::new(FootballClient::new(&config.provider)?);
    let state = Arc::new(AppState {
        provider,
        normalizer: OddsNormalizer::default(),
    });

    let host: IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

    server::serve(state, addr).await?;
    Ok(())
}

async fn show_fixtures(
    config: Config,
    date: Option<NaiveDate>,
    league: Option<u32>,
    season: Option<i32>,
) -> anyhow::Result<()> {
    let client = FootballClient::new(&config.provider)?;

    let payload = match league {
        Some(league) => {
            let season = season.unwrap_or_else(|| Utc::now().year());
            client.fixtures_by_league(league, season).await?
        }
        None => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            client.fixtures_by_date(date).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn show_odds(config: Config, fixture_id: u64) -> anyhow::Result<()> {
    let client = FootballClient::new(&config.provider)?;
    let payload = client.odds_raw(fixture_id).await?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn predict_fixture(config: Config, fixture_id: u64) -> anyhow::Result<()> {
    let client = FootballClient::new(&config.provider)?;
    let groups = client.odds_for_fixture(fixture_id).await?;

    let prediction = OddsNormalizer::default().normalize(&groups);
    let probs = prediction.probabilities.rounded(3);

    println!("\n⚽ Prediction for fixture {}\n", fixture_id);
    println!("  Home win: {:>5.1}%", probs.home * Decimal::ONE_HUNDRED);
    println!("  Draw:     {:>5.1}%", probs.draw * Decimal::ONE_HUNDRED);
    println!("  Away win: {:>5.1}%", probs.away * Decimal::ONE_HUNDRED);
    println!("\nSource: {}", prediction.source);

    Ok(())
}
