// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `kindred check` command implementation.
//!
//! Reports whether the loaded configuration can actually serve requests.

use std::time::{Duration, Instant};

use kindred_config::KindredConfig;
use kindred_core::{HealthStatus, KindredError, PluginAdapter, StorageAdapter};
use kindred_storage::SqliteStorage;

/// Status of a readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single readiness check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Runs every check and prints a summary. Fails when any check fails.
pub async fn run_check(config: &KindredConfig) -> Result<(), KindredError> {
    let results = vec![
        CheckResult {
            name: "Config".to_string(),
            status: CheckStatus::Pass,
            message: "loaded and validated".to_string(),
            duration: Duration::ZERO,
        },
        check_storage(config).await,
        check_api_key(config),
        check_auth(config),
        check_memory(),
    ];

    print_results(&results);

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failed > 0 {
        return Err(KindredError::Config(format!("{failed} check(s) failed")));
    }
    Ok(())
}

async fn check_storage(config: &KindredConfig) -> CheckResult {
    let start = Instant::now();
    let path = &config.storage.database_path;
    let storage = SqliteStorage::new(config.storage.clone());

    let outcome = async {
        storage.initialize().await?;
        let health = storage.health_check().await?;
        storage.close().await?;
        Ok::<_, KindredError>(health)
    }
    .await;

    let (status, message) = match outcome {
        Ok(HealthStatus::Healthy) => (CheckStatus::Pass, format!("{path} (migrated)")),
        Ok(HealthStatus::Degraded(reason)) => (CheckStatus::Warn, reason),
        Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "Storage".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn check_api_key(config: &KindredConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match kindred_anthropic::resolve_api_key(&config.anthropic.api_key) {
        Ok(_) => (
            CheckStatus::Pass,
            format!("present (model {})", config.anthropic.model),
        ),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "Anthropic API key".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn check_auth(config: &KindredConfig) -> CheckResult {
    let (status, message) = match &config.server.bearer_token {
        Some(_) => (CheckStatus::Pass, "bearer token required".to_string()),
        None => (
            CheckStatus::Warn,
            "no bearer token set, API routes are open".to_string(),
        ),
    };
    CheckResult {
        name: "Auth".to_string(),
        status,
        message,
        duration: Duration::ZERO,
    }
}

#[cfg(not(target_env = "msvc"))]
fn check_memory() -> CheckResult {
    use tikv_jemalloc_ctl::{epoch, stats};

    let start = Instant::now();
    let (status, message) = match epoch::advance().and_then(|_| stats::allocated::read()) {
        Ok(bytes) => (
            CheckStatus::Pass,
            format!("{:.1} MiB allocated", bytes as f64 / (1024.0 * 1024.0)),
        ),
        Err(e) => (CheckStatus::Warn, format!("jemalloc stats unavailable: {e}")),
    };
    CheckResult {
        name: "Memory".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

#[cfg(target_env = "msvc")]
fn check_memory() -> CheckResult {
    CheckResult {
        name: "Memory".to_string(),
        status: CheckStatus::Warn,
        message: "allocator statistics unavailable on this target".to_string(),
        duration: Duration::ZERO,
    }
}

fn print_results(results: &[CheckResult]) {
    for result in results {
        let label = match result.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warn => "WARN",
            CheckStatus::Fail => "FAIL",
        };
        println!(
            "[{label}] {:<18} {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
    }
}
