mod common;

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use common::{Behavior, MockService};
use sunsave::estimate::{
    DispatchOrchestrator, DispatchOutcome, EstimationService, GENERIC_FAILURE, HttpEstimator,
    ServiceError, SimulateQuery,
};
use sunsave::wizard::InputParameters;

fn reference_params() -> InputParameters {
    InputParameters {
        postcode: " EC2A 3AY ".to_string(),
        array_kwp: 4.0,
        capacity_kwh: 5.0,
        power_kw: 3.0,
        efficiency: 0.92,
    }
}

fn keys(q: &std::collections::HashMap<String, String>) -> BTreeSet<&str> {
    q.keys().map(String::as_str).collect()
}

fn number(q: &std::collections::HashMap<String, String>, key: &str) -> f64 {
    q.get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("{key} should be a number in {q:?}"))
}

#[tokio::test]
async fn requests_follow_the_query_contract() {
    let mock = MockService::start(Behavior::default()).await;
    let orch = DispatchOrchestrator::new(mock.client());
    let outcome = orch.run(reference_params()).await;
    assert!(outcome.is_success(), "{outcome:?}");

    let sim = mock.simulate_queries();
    assert_eq!(sim.len(), 1);
    assert_eq!(keys(&sim[0]), BTreeSet::from(["postcode", "kwp"]));
    assert_eq!(sim[0]["postcode"], "EC2A 3AY");
    assert_eq!(number(&sim[0], "kwp"), 4.0);

    let disp = mock.dispatch_queries();
    assert_eq!(disp.len(), 1);
    assert_eq!(
        keys(&disp[0]),
        BTreeSet::from(["postcode", "kwp", "cap_kwh", "pow_kw", "eta"])
    );
    assert_eq!(disp[0]["postcode"], "EC2A 3AY");
    assert_eq!(number(&disp[0], "cap_kwh"), 5.0);
    assert_eq!(number(&disp[0], "pow_kw"), 3.0);
    assert_eq!(number(&disp[0], "eta"), 0.92);
}

#[tokio::test]
async fn success_carries_every_figure() {
    let mock = MockService::start(Behavior::default()).await;
    let outcome = DispatchOrchestrator::new(mock.client())
        .run(reference_params())
        .await;
    let est = outcome.estimate().expect("run should succeed");
    assert_eq!(est.daily_generation_kwh, 14.2);
    assert_eq!(est.money_saved, 1.35);
    assert_eq!(est.baseline_cost, 2.10);
    assert_eq!(est.with_battery_cost, 0.75);
    assert_eq!(est.kwh_shifted, 3.1);
    assert!(!est.used_fallback_tariff, "absent fallback means false");
}

#[tokio::test]
async fn fallback_flag_comes_through() {
    let mock = MockService::start(Behavior {
        fallback: true,
        ..Behavior::default()
    })
    .await;
    let outcome = DispatchOrchestrator::new(mock.client())
        .run(reference_params())
        .await;
    assert!(outcome.estimate().is_some_and(|e| e.used_fallback_tariff));
}

#[tokio::test]
async fn error_status_on_either_endpoint_fails_the_run() {
    let behaviors = [
        Behavior {
            simulate_status: StatusCode::INTERNAL_SERVER_ERROR,
            ..Behavior::default()
        },
        Behavior {
            dispatch_status: StatusCode::BAD_GATEWAY,
            ..Behavior::default()
        },
        Behavior {
            simulate_status: StatusCode::NOT_FOUND,
            dispatch_status: StatusCode::INTERNAL_SERVER_ERROR,
            ..Behavior::default()
        },
    ];
    for behavior in behaviors {
        let mock = MockService::start(behavior).await;
        let outcome = DispatchOrchestrator::new(mock.client())
            .run(reference_params())
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::Failure {
                message: GENERIC_FAILURE.to_string()
            }
        );
        // Both requests are issued even though one fails.
        assert_eq!(mock.simulate_queries().len(), 1);
        assert_eq!(mock.dispatch_queries().len(), 1);
    }
}

#[tokio::test]
async fn status_error_names_the_endpoint() {
    let mock = MockService::start(Behavior {
        simulate_status: StatusCode::SERVICE_UNAVAILABLE,
        ..Behavior::default()
    })
    .await;
    let err = mock
        .client()
        .simulate(&SimulateQuery::from(&reference_params()))
        .await
        .expect_err("simulate should fail");
    assert!(matches!(err, ServiceError::Status { status: 503, .. }), "{err:?}");
    assert!(err.to_string().contains("/simulate"), "{err}");
}

#[tokio::test]
async fn malformed_body_fails_the_run() {
    let mock = MockService::start(Behavior {
        malformed_dispatch: true,
        ..Behavior::default()
    })
    .await;
    let outcome = DispatchOrchestrator::new(mock.client())
        .run(reference_params())
        .await;
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn unreachable_service_fails_the_run() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        listener.local_addr().expect("local addr should resolve")
    };
    let client = HttpEstimator::new(&format!("http://{addr}"), Duration::from_secs(2), "t")
        .expect("client should build");
    let outcome = DispatchOrchestrator::new(client).run(reference_params()).await;
    assert_eq!(
        outcome,
        DispatchOutcome::Failure {
            message: GENERIC_FAILURE.to_string()
        }
    );
}

#[tokio::test]
async fn endpoint_latencies_overlap() {
    let mock = MockService::start(Behavior {
        simulate_latency: Duration::from_millis(300),
        dispatch_latency: Duration::from_millis(300),
        ..Behavior::default()
    })
    .await;
    let orch = DispatchOrchestrator::new(mock.client());
    let start = Instant::now();
    let outcome = orch.run(reference_params()).await;
    let elapsed = start.elapsed();
    assert!(outcome.is_success());
    assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(550), "{elapsed:?}");
}
