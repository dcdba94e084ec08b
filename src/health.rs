use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
    pub duration_ms: Option<u64>,
}

impl HealthCheckResult {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
            details: None,
            duration_ms: None,
        }
    }

    pub fn healthy_with_details(details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::healthy()
        }
    }

    pub fn degraded(message: String) -> Self {
        Self {
            status: HealthStatus::Degraded,
            message: Some(message),
            details: None,
            duration_ms: None,
        }
    }

    pub fn unhealthy(message: String) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message),
            details: None,
            duration_ms: None,
        }
    }

    pub fn unhealthy_with_details(message: String, details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::unhealthy(message)
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// The name of this health check component
    fn name(&self) -> &str;

    /// Perform the health check
    async fn check(&self) -> HealthCheckResult;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallHealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub checks: HashMap<String, HealthCheckResult>,
    pub summary: HealthSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_checks: usize,
    pub healthy_count: usize,
    pub degraded_count: usize,
    pub unhealthy_count: usize,
    pub total_duration_ms: u64,
}

/// Registry of component health checks
pub struct HealthService {
    checkers: Arc<RwLock<HashMap<String, Arc<dyn HealthChecker>>>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            checkers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a health checker for a specific component
    pub async fn register(&self, checker: Arc<dyn HealthChecker>) {
        let name = checker.name().to_string();
        let mut checkers = self.checkers.write().await;
        checkers.insert(name, checker);
    }

    /// Run all health checks (`"all"`), one named check, or none
    pub async fn check_health(&self, filter: Option<&str>) -> OverallHealthResponse {
        let checkers = self.checkers.read().await;
        let mut results = HashMap::new();

        let checks_to_run: Vec<_> = match filter {
            Some("all") => checkers.iter().collect(),
            Some(specific) => checkers
                .iter()
                .filter(|(name, _)| name.as_str() == specific)
                .collect(),
            None => vec![],
        };

        for (name, checker) in checks_to_run {
            results.insert(name.clone(), timed_check(checker.as_ref()).await);
        }

        let count = |status: HealthStatus| results.values().filter(|r| r.status == status).count();
        let healthy_count = count(HealthStatus::Healthy);
        let degraded_count = count(HealthStatus::Degraded);
        let unhealthy_count = count(HealthStatus::Unhealthy);

        // Worst status wins
        let overall_status = if unhealthy_count > 0 {
            HealthStatus::Unhealthy
        } else if degraded_count > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let summary = HealthSummary {
            total_checks: results.len(),
            healthy_count,
            degraded_count,
            unhealthy_count,
            total_duration_ms: results.values().filter_map(|r| r.duration_ms).sum(),
        };

        OverallHealthResponse {
            status: overall_status,
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks: results,
            summary,
        }
    }

    pub async fn get_registered_checkers(&self) -> Vec<String> {
        let checkers = self.checkers.read().await;
        checkers.keys().cloned().collect()
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

async fn timed_check(checker: &dyn HealthChecker) -> HealthCheckResult {
    let start = Instant::now();
    let result = checker.check().await;
    result.with_duration(start.elapsed().as_millis() as u64)
}
