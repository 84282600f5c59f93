//! Shared test fixtures for integration tests: a mock estimation service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tokio::task::JoinHandle;

use sunsave::estimate::HttpEstimator;

/// How the mock answers. `Default` matches the reference scenario:
/// 14.2 kWh/day, baseline 2.10, with battery 0.75, 3.1 kWh shifted.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub simulate_status: StatusCode,
    pub dispatch_status: StatusCode,
    pub simulate_latency: Duration,
    pub dispatch_latency: Duration,
    /// Send a 200 with a body that is not JSON from `/dispatch`.
    pub malformed_dispatch: bool,
    pub fallback: bool,
    pub daily_kwh: f64,
    pub money_saved: f64,
    pub baseline_cost: f64,
    pub with_batt_cost: f64,
    pub kwh_shifted: f64,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            simulate_status: StatusCode::OK,
            dispatch_status: StatusCode::OK,
            simulate_latency: Duration::ZERO,
            dispatch_latency: Duration::ZERO,
            malformed_dispatch: false,
            fallback: false,
            daily_kwh: 14.2,
            money_saved: 1.35,
            baseline_cost: 2.10,
            with_batt_cost: 0.75,
            kwh_shifted: 3.1,
        }
    }
}

type Recorded = Mutex<Vec<HashMap<String, String>>>;

struct MockState {
    behavior: Behavior,
    simulate: Recorded,
    dispatch: Recorded,
}

/// Mock service bound to an ephemeral localhost port.
///
/// Aborted when dropped.
pub struct MockService {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockService {
    pub async fn start(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            simulate: Mutex::new(Vec::new()),
            dispatch: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/simulate", get(simulate))
            .route("/dispatch", get(dispatch))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let addr = listener.local_addr().expect("local addr should resolve");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server should run");
        });
        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// An estimator pointed at this mock.
    pub fn client(&self) -> HttpEstimator {
        HttpEstimator::new(&self.base_url(), Duration::from_secs(5), "sunsave-tests")
            .expect("client should build")
    }

    /// Query strings received on `/simulate`, in arrival order.
    pub fn simulate_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.simulate.lock().expect("lock").clone()
    }

    /// Query strings received on `/dispatch`, in arrival order.
    pub fn dispatch_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.dispatch.lock().expect("lock").clone()
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn simulate(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.simulate.lock().expect("lock").push(query);
    let b = &state.behavior;
    tokio::time::sleep(b.simulate_latency).await;
    if b.simulate_status != StatusCode::OK {
        return (b.simulate_status, "simulate failed").into_response();
    }
    axum::Json(json!({ "daily_kwh": b.daily_kwh })).into_response()
}

async fn dispatch(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.dispatch.lock().expect("lock").push(query.clone());
    let b = &state.behavior;
    tokio::time::sleep(b.dispatch_latency).await;
    if b.dispatch_status != StatusCode::OK {
        return (b.dispatch_status, "dispatch failed").into_response();
    }
    if b.malformed_dispatch {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }
    let mut body = json!({
        "money_saved": b.money_saved,
        "baseline_cost": b.baseline_cost,
        "with_batt_cost": b.with_batt_cost,
        "kwh_shifted": b.kwh_shifted,
        "battery": { "cap_kwh": query.get("cap_kwh"), "eta": query.get("eta") },
    });
    if b.fallback {
        body["fallback"] = json!(true);
    }
    axum::Json(body).into_response()
}
