//! Shared fixtures: a fake subgraph and a dashboard bound to ephemeral ports.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use treasury_dashboard::api;
use treasury_dashboard::app_state::AppState;
use treasury_dashboard::config::DashboardConfig;
use treasury_dashboard::domain::{EventBus, LoadingPolicy, UsdFormatter};
use treasury_dashboard::service::DashboardService;
use treasury_dashboard::subgraph::SubgraphClient;

/// Two periods, newest first, with BigDecimals as strings.
pub fn protocol_metrics() -> Vec<Value> {
    vec![
        json!({
            "id": "2",
            "timestamp": "1650096000",
            "ohmPrice": "12.5",
            "gOhmPrice": "1025.75",
            "marketCap": "250000000",
            "totalSupply": "2000000",
            "ohmCirculatingSupply": "1000000",
            "ohmFloatingSupply": "900000",
            "currentIndex": "82.1234",
            "totalValueLocked": "150000000",
            "nextEpochRebase": "0.1",
            "treasuryMarketValue": "300000000",
            "treasuryLiquidBackingPerOhmFloating": "10.25",
            "treasuryLiquidBackingPerGOhm": "845.5",
            "treasuryStableValue": "200000000",
            "treasuryVolatileValue": "60000000",
            "treasuryLPValue": "40000000",
            "treasuryStableValueComponents": {
                "value": "200000000",
                "records": [
                    {"token": "DAI", "value": "150000000"},
                    {"token": "FRAX", "value": "50000000"}
                ]
            },
            "treasuryVolatileValueComponents": {
                "value": "60000000",
                "records": [{"token": "wETH", "value": "60000000"}]
            },
            "treasuryLPValueComponents": {
                "value": "40000000",
                "records": [
                    {"token": "OHM-DAI", "value": "30000000"},
                    {"token": "OHM-FRAX", "value": "10000000"}
                ]
            }
        }),
        json!({
            "id": "1",
            "timestamp": "1650009600",
            "ohmPrice": "12.0",
            "treasuryLiquidBackingPerOhmFloating": "10.0",
            "treasuryStableValue": "190000000",
            "treasuryLPValueComponents": {
                "value": "35000000",
                "records": [{"token": "OHM-DAI", "value": "35000000"}]
            }
        }),
    ]
}

async fn graphql(Json(body): Json<Value>) -> Json<Value> {
    let records = body["variables"]["records"].as_u64().unwrap_or(100);
    let periods: Vec<Value> = protocol_metrics()
        .into_iter()
        .take(usize::try_from(records).unwrap_or(usize::MAX))
        .collect();
    Json(json!({ "data": { "protocolMetrics": periods } }))
}

/// Operation names of the GraphQL requests a fake subgraph received.
pub type QueryLog = Arc<Mutex<Vec<String>>>;

async fn recording_graphql(State(log): State<QueryLog>, body: Json<Value>) -> Json<Value> {
    let operation = body["query"]
        .as_str()
        .and_then(|q| q.trim_start().strip_prefix("query "))
        .and_then(|rest| rest.split(|c: char| c == '(' || c.is_whitespace()).next())
        .unwrap_or_default()
        .to_string();
    if let Ok(mut seen) = log.lock() {
        seen.push(operation);
    }
    graphql(body).await
}

async fn failing() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "indexer unavailable")
}

async fn serve(router: Router) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Starts a fake subgraph answering every query with [`protocol_metrics`].
pub async fn spawn_subgraph() -> String {
    let addr = serve(Router::new().route("/", post(graphql))).await;
    format!("http://{addr}")
}

/// Starts a fake subgraph that also records every operation it answers.
pub async fn spawn_recording_subgraph() -> (String, QueryLog) {
    let log = QueryLog::default();
    let router = Router::new()
        .route("/", post(recording_graphql))
        .with_state(Arc::clone(&log));
    let addr = serve(router).await;
    (format!("http://{addr}"), log)
}

/// Operations in `log` named `operation`.
pub fn count_operation(log: &QueryLog, operation: &str) -> usize {
    log.lock()
        .map(|seen| seen.iter().filter(|op| *op == operation).count())
        .unwrap_or_default()
}

/// Starts a fake subgraph that always answers HTTP 500.
pub async fn spawn_failing_subgraph() -> String {
    let addr = serve(Router::new().route("/", post(failing))).await;
    format!("http://{addr}")
}

/// A running dashboard.
pub struct TestApp {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// The service behind the router.
    pub service: Arc<DashboardService>,
    /// The bus WebSocket connections subscribe to.
    pub event_bus: EventBus,
}

/// Starts the dashboard against `subgraph_url`.
pub async fn spawn_app(subgraph_url: &str, customize: impl FnOnce(&mut DashboardConfig)) -> TestApp {
    let mut config = DashboardConfig {
        subgraph_url: subgraph_url.to_string(),
        refresh_interval_secs: 0,
        ..DashboardConfig::default()
    };
    customize(&mut config);

    let Ok(client) = SubgraphClient::new(subgraph_url, Duration::from_secs(5)) else {
        panic!("client builds");
    };
    let service = Arc::new(DashboardService::new(
        Arc::new(client),
        Arc::new(UsdFormatter),
        config,
    ));
    let event_bus = EventBus::new(64);
    let app = api::build_app(AppState {
        dashboard_service: Arc::clone(&service),
        event_bus: event_bus.clone(),
    });
    let addr = serve(app).await;

    TestApp {
        base_url: format!("http://{addr}"),
        service,
        event_bus,
    }
}

/// Config hook that surfaces fetch failures.
pub fn surface_failures(config: &mut DashboardConfig) {
    config.loading_policy = LoadingPolicy::SurfaceFailures;
}

/// GETs `path` and decodes the JSON body.
pub async fn get_json(base_url: &str, path: &str) -> (StatusCode, Value) {
    let Ok(response) = reqwest::get(format!("{base_url}{path}")).await else {
        panic!("request to {path} failed");
    };
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::IM_A_TEAPOT);
    let Ok(body) = response.json::<Value>().await else {
        panic!("{path} did not return JSON");
    };
    (status, body)
}
