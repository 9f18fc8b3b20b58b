//! HTTP surface of the backend
//!
//! Mirrors the upstream provider for fixture and odds lookups and adds the
//! prediction endpoint on top. Handlers isolate their own upstream failures:
//! the caller gets a generic error body, the detail goes to the logs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::FixtureDataProvider;
use crate::error::{BackendError, Result};
use crate::predict::OddsNormalizer;
use crate::types::PredictionSource;

/// State shared across handlers.
pub struct AppState {
    pub provider: Arc<dyn FixtureDataProvider>,
    pub normalizer: OddsNormalizer,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct TodayQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct LeagueQuery {
    season: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    #[serde(rename = "fixtureId")]
    fixture_id: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ProbabilitySummary {
    #[serde(with = "rust_decimal::serde::float")]
    home_win: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    draw: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    away_win: Decimal,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    #[serde(rename = "fixtureId")]
    fixture_id: u64,
    probabilities: ProbabilitySummary,
    source: PredictionSource,
}

fn client_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Log the failure, reply with a generic body. The upstream's status and
/// payload never reach the caller.
fn upstream_failure(route: &str, err: BackendError) -> Response {
    tracing::error!("{} failed: {}", route, err);
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorBody {
            error: "upstream data provider unavailable".to_string(),
        }),
    )
        .into_response()
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "matchday backend online",
    })
}

async fn matches_today(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TodayQuery>,
) -> Response {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    match state.provider.fixtures_by_date(date).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => upstream_failure("/matches/today", err),
    }
}

async fn matches_by_league(
    State(state): State<Arc<AppState>>,
    Path(league_id): Path<u32>,
    Query(query): Query<LeagueQuery>,
) -> Response {
    let season = query.season.unwrap_or_else(|| Utc::now().year());
    match state.provider.fixtures_by_league(league_id, season).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => upstream_failure("/matches/league", err),
    }
}

async fn odds_by_fixture(
    State(state): State<Arc<AppState>>,
    Path(fixture_id): Path<u64>,
) -> Response {
    match state.provider.odds_raw(fixture_id).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => upstream_failure("/odds/fixture", err),
    }
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Response {
    let Some(fixture_id) = request.fixture_id else {
        return client_error("fixtureId is required");
    };

    let groups = match state.provider.odds_for_fixture(fixture_id).await {
        Ok(groups) => groups,
        Err(err) => return upstream_failure("/predict", err),
    };

    let prediction = state.normalizer.normalize(&groups);
    let rounded = prediction.probabilities.rounded(3);
    tracing::info!(
        "fixture {}: home {} / draw {} / away {} ({})",
        fixture_id,
        rounded.home,
        rounded.draw,
        rounded.away,
        prediction.source
    );
    Json(PredictResponse {
        fixture_id,
        probabilities: ProbabilitySummary {
            home_win: rounded.home,
            draw: rounded.draw,
            away_win: rounded.away,
        },
        source: prediction.source,
    })
    .into_response()
}

/// Build the application router. CORS is wide open on every route.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/matches/today", get(matches_today))
        .route("/matches/league/{league_id}", get(matches_by_league))
        .route("/odds/fixture/{fixture_id}", get(odds_by_fixture))
        .route("/predict", post(predict))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let app = create_router(state);

    tracing::info!("matchday backend listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockFixtureDataProvider;
    use crate::types::{Bookmaker, BookmakerGroup, MarketQuote, OddsPrice, OutcomeQuote};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app(provider: MockFixtureDataProvider) -> Router {
        create_router(Arc::new(AppState {
            provider: Arc::new(provider),
            normalizer: OddsNormalizer::default(),
        }))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn quoted_groups() -> Vec<BookmakerGroup> {
        vec![BookmakerGroup {
            bookmakers: Some(vec![Bookmaker {
                name: Some("bookie".to_string()),
                markets: Some(vec![MarketQuote {
                    market: None,
                    key: Some("h2h".to_string()),
                    outcomes: Some(vec![
                        OutcomeQuote {
                            name: "Home".to_string(),
                            price: Some(OddsPrice::Number(2.0)),
                        },
                        OutcomeQuote {
                            name: "Draw".to_string(),
                            price: Some(OddsPrice::Number(3.0)),
                        },
                        OutcomeQuote {
                            name: "Away".to_string(),
                            price: Some(OddsPrice::Number(4.0)),
                        },
                    ]),
                }]),
            }]),
        }]
    }

    fn predict_request(body: &str) -> Request<Body> {
        Request::post("/predict")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let app = test_app(MockFixtureDataProvider::new());

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn predict_normalizes_bookmaker_odds() {
        let mut provider = MockFixtureDataProvider::new();
        provider
            .expect_odds_for_fixture()
            .withf(|fixture_id| *fixture_id == 42)
            .returning(|_| Ok(quoted_groups()));

        let response = test_app(provider)
            .oneshot(predict_request(r#"{"fixtureId": 42}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fixtureId"], 42);
        assert_eq!(body["source"], "bookmaker_odds");
        assert_eq!(body["probabilities"]["home_win"], json!(0.462));
        assert_eq!(body["probabilities"]["draw"], json!(0.308));
        assert_eq!(body["probabilities"]["away_win"], json!(0.231));
    }

    #[tokio::test]
    async fn predict_falls_back_without_usable_quotes() {
        let mut provider = MockFixtureDataProvider::new();
        provider
            .expect_odds_for_fixture()
            .returning(|_| Ok(Vec::new()));

        let response = test_app(provider)
            .oneshot(predict_request(r#"{"fixtureId": 7}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["source"], "heuristic_default");
        assert_eq!(body["probabilities"]["home_win"], json!(0.45));
        assert_eq!(body["probabilities"]["draw"], json!(0.25));
        assert_eq!(body["probabilities"]["away_win"], json!(0.3));
    }

    #[tokio::test]
    async fn predict_requires_fixture_id() {
        let response = test_app(MockFixtureDataProvider::new())
            .oneshot(predict_request("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "fixtureId is required");
    }

    #[tokio::test]
    async fn predict_maps_upstream_failure_to_generic_error() {
        let mut provider = MockFixtureDataProvider::new();
        provider.expect_odds_for_fixture().returning(|_| {
            Err(BackendError::Upstream {
                status: 503,
                body: "maintenance".to_string(),
            })
        });

        let response = test_app(provider)
            .oneshot(predict_request(r#"{"fixtureId": 42}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "upstream data provider unavailable");
    }

    #[tokio::test]
    async fn matches_today_passes_requested_date_through() {
        let mut provider = MockFixtureDataProvider::new();
        provider
            .expect_fixtures_by_date()
            .withf(|date| *date == NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .returning(|_| Ok(json!({"response": []})));

        let response = test_app(provider)
            .oneshot(
                Request::get("/matches/today?date=2024-05-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!({"response": []}));
    }

    #[tokio::test]
    async fn league_route_defaults_season_to_current_year() {
        let current_year = Utc::now().year();
        let mut provider = MockFixtureDataProvider::new();
        provider
            .expect_fixtures_by_league()
            .withf(move |league, season| *league == 39 && *season == current_year)
            .returning(|_, _| Ok(json!({"response": []})));

        let response = test_app(provider)
            .oneshot(
                Request::get("/matches/league/39")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn odds_route_relays_upstream_body_verbatim() {
        let payload = json!({"response": [{"bookmakers": []}], "paging": {"total": 1}});
        let mut provider = MockFixtureDataProvider::new();
        let relayed = payload.clone();
        provider
            .expect_odds_raw()
            .withf(|fixture_id| *fixture_id == 99)
            .returning(move |_| Ok(relayed.clone()));

        let response = test_app(provider)
            .oneshot(
                Request::get("/odds/fixture/99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, payload);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let response = test_app(MockFixtureDataProvider::new())
            .oneshot(
                Request::get("/")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
