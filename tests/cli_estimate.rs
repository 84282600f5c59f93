mod common;

use std::path::PathBuf;
use std::process::{Command, Output};

use axum::http::StatusCode;
use common::{Behavior, MockService};
use serde_json::Value;
use sunsave::estimate::GENERIC_FAILURE;

/// Config file pointing the binary at `mock`, removed on drop.
struct TempConfig {
    path: PathBuf,
}

impl TempConfig {
    fn for_mock(mock: &MockService, name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "sunsave-{}-{name}.toml",
            std::process::id()
        ));
        let body = format!(
            "[service]\nbase_url = \"{}\"\ntimeout_secs = 5\n\n[logging]\nfilter = \"warn\"\n",
            mock.base_url()
        );
        std::fs::write(&path, body).expect("config should be written");
        Self { path }
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Runs the binary off the async runtime so the mock keeps serving.
async fn sunsave(config: &TempConfig, args: &[&str]) -> Output {
    let path = config.path.clone();
    let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_sunsave"))
            .arg("--config")
            .arg(path)
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("binary should run")
    })
    .await
    .expect("blocking task should finish")
}

const REFERENCE_ARGS: &[&str] = &[
    "estimate",
    "--postcode",
    "EC2A 3AY",
    "--kwp",
    "4",
    "--cap-kwh",
    "5",
    "--pow-kw",
    "3",
    "--eta",
    "0.92",
];

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn estimate_prints_the_presented_result() {
    let mock = MockService::start(Behavior::default()).await;
    let config = TempConfig::for_mock(&mock, "presented");
    let out = sunsave(&config, REFERENCE_ARGS).await;

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout.contains("14.20 kWh"), "{stdout}");
    assert!(stdout.contains("cost 1.35"), "{stdout}");
    assert!(stdout.contains("cost 2.10"), "{stdout}");
    assert!(stdout.contains("cost 0.75"), "{stdout}");
    assert!(stdout.contains("3.1 kWh"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn estimate_json_is_the_tagged_outcome() {
    let mock = MockService::start(Behavior::default()).await;
    let config = TempConfig::for_mock(&mock, "json");
    let mut args = REFERENCE_ARGS.to_vec();
    args.push("--json");
    let out = sunsave(&config, &args).await;

    assert!(out.status.success());
    let json: Value = serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(json["status"], "success");
    assert_eq!(json["daily_generation_kwh"], 14.2);
    assert_eq!(json["used_fallback_tariff"], false);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocked_step_exits_without_calling_the_service() {
    let mock = MockService::start(Behavior::default()).await;
    let config = TempConfig::for_mock(&mock, "blocked");
    let out = sunsave(&config, &["estimate", "--postcode", "AB1"]).await;

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Where is your home located?"), "{stderr}");
    assert!(mock.simulate_queries().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn service_failure_exits_with_the_generic_message() {
    let mock = MockService::start(Behavior {
        simulate_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..Behavior::default()
    })
    .await;
    let config = TempConfig::for_mock(&mock, "failure");
    let out = sunsave(&config, REFERENCE_ARGS).await;

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(GENERIC_FAILURE), "{stderr}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_config_is_rejected() {
    let mock = MockService::start(Behavior::default()).await;
    let config = TempConfig::for_mock(&mock, "invalid");
    std::fs::write(&config.path, "[defaults]\neta = 2.0\n").expect("config should be written");
    let out = sunsave(&config, REFERENCE_ARGS).await;

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("eta"), "{stderr}");
}
