//! End-to-end tests for the heartbeat and liveness endpoints.
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`; no
//! listening socket is needed. One set of tests runs against the live
//! `HostStatsProvider`, another against a fixed fake provider to pin exact
//! output.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::util::ServiceExt;

use vitals::config::{AppConfig, HttpServerConfig, LoggingConfig};
use vitals::routes::create_router;
use vitals::state::AppState;
use vitals::stats::{HostStatsProvider, RuntimeStats, RuntimeStatsProvider};

/// Provider returning the same snapshot on every call.
struct FixedStatsProvider(RuntimeStats);

impl RuntimeStatsProvider for FixedStatsProvider {
    fn snapshot(&self) -> RuntimeStats {
        self.0.clone()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        http: HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        logging: LoggingConfig::default(),
    }
}

fn live_router() -> Router {
    let state = AppState::new(
        test_config(),
        Instant::now(),
        Arc::new(HostStatsProvider::new()),
    );
    create_router(state)
}

fn fixed_router(stats: RuntimeStats) -> Router {
    let state = AppState::new(
        test_config(),
        Instant::now(),
        Arc::new(FixedStatsProvider(stats)),
    );
    create_router(state)
}

fn fixed_stats() -> RuntimeStats {
    RuntimeStats {
        allocated: 25 * 1024 * 1024,
        total_allocated: 400 * 1024 * 1024,
        sys: 100 * 1024 * 1024,
        gc_cycles: 0,
        heap_allocated: 25 * 1024 * 1024,
        heap_sys: 48 * 1024 * 1024,
        tasks: 3,
        cpus: 4,
        runtime_version: "rustc 1.80.0",
        os: "linux",
        arch: "x86_64",
    }
}

async fn get_json(router: Router, path: &str) -> Result<(StatusCode, serde_json::Value)> {
    let response = router
        .oneshot(Request::builder().uri(path).body(Body::empty())?)
        .await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

/// `\d+\.\d{2}%` without pulling in a regex engine.
fn assert_usage_format(usage: &str) {
    let pct = usage.strip_suffix('%').expect("usage ends with %");
    let (int_part, frac_part) = pct.split_once('.').expect("usage has a decimal point");
    assert!(!int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(frac_part.len(), 2);
    assert!(frac_part.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_health_returns_ok() -> Result<()> {
    let response = live_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"ok");
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_returns_healthy_vitals() -> Result<()> {
    let (status, json) = get_json(live_router(), "/heartbeat").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"]["code"], "healthy");
    assert_eq!(json["status"]["message"], "Server is running normally");

    // Every memory quantity is a non-empty formatted string
    for field in ["alloc", "totalAlloc", "sys", "heapAlloc", "heapSys", "free", "used"] {
        let value = json["memory"][field].as_str().unwrap();
        assert!(!value.is_empty(), "memory.{field} is empty");
        assert!(value.ends_with('B'), "memory.{field} lacks a unit suffix: {value}");
    }

    assert_usage_format(json["memory"]["usage"].as_str().unwrap());
    assert!(json["memory"]["numGC"].is_u64());

    let ts = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());

    assert!(json["system"]["numCPU"].as_u64().unwrap() > 0);
    assert!(json["system"]["goroutines"].is_u64());
    assert!(!json["system"]["goVersion"].as_str().unwrap().is_empty());
    assert_eq!(json["system"]["os"], std::env::consts::OS);
    assert_eq!(json["system"]["arch"], std::env::consts::ARCH);
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_uptime_shape() -> Result<()> {
    let (_, json) = get_json(live_router(), "/heartbeat").await?;
    let uptime = &json["uptime"];

    assert!(uptime["raw"].as_str().unwrap().ends_with('s'));
    assert!(uptime["seconds"].as_u64().unwrap() < 60);
    assert!(uptime["minutes"].as_u64().unwrap() < 60);
    assert!(uptime["hours"].as_u64().unwrap() < 24);
    // Router was just created
    assert_eq!(uptime["days"].as_u64().unwrap(), 0);
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_is_not_cacheable() -> Result<()> {
    let response = live_router()
        .oneshot(Request::builder().uri("/heartbeat").body(Body::empty())?)
        .await?;

    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_with_fixed_provider() -> Result<()> {
    let (status, json) = get_json(fixed_router(fixed_stats()), "/heartbeat").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["memory"]["alloc"], "25.00 MB");
    assert_eq!(json["memory"]["totalAlloc"], "400.00 MB");
    assert_eq!(json["memory"]["sys"], "100.00 MB");
    assert_eq!(json["memory"]["heapAlloc"], "25.00 MB");
    assert_eq!(json["memory"]["heapSys"], "48.00 MB");
    assert_eq!(json["memory"]["free"], "75.00 MB");
    assert_eq!(json["memory"]["used"], "25.00 MB");
    assert_eq!(json["memory"]["usage"], "25.00%");
    assert_eq!(json["memory"]["numGC"], 0);
    assert_eq!(json["system"]["goroutines"], 3);
    assert_eq!(json["system"]["numCPU"], 4);
    assert_eq!(json["system"]["goVersion"], "rustc 1.80.0");
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_zero_sys_reports_zero_usage() -> Result<()> {
    let mut stats = fixed_stats();
    stats.sys = 0;

    let (status, json) = get_json(fixed_router(stats), "/heartbeat").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["memory"]["usage"], "0.00%");
    assert_eq!(json["memory"]["free"], "0 B");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_heartbeats_are_consistent() -> Result<()> {
    let router = live_router();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..32 {
        let router = router.clone();
        tasks.spawn(async move { get_json(router, "/heartbeat").await });
    }

    while let Some(joined) = tasks.join_next().await {
        let (status, json) = joined??;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"]["code"], "healthy");
        assert_usage_format(json["memory"]["usage"].as_str().unwrap());
        assert!(json["uptime"]["seconds"].as_u64().unwrap() < 60);
        assert!(json["uptime"]["minutes"].as_u64().unwrap() < 60);
        assert!(json["uptime"]["hours"].as_u64().unwrap() < 24);
    }
    Ok(())
}
