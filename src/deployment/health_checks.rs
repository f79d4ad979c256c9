use crate::config::ProviderConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

/// Per-request timeout for health probes
pub const PROBE_TIMEOUT_SECS: u64 = 10;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    pub check_name: String,
    pub status: HealthStatus,
    pub response_time_ms: u64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub provider: String,
    pub results: Vec<HealthCheckResult>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        !self.results.is_empty()
            && self
                .results
                .iter()
                .all(|result| result.status == HealthStatus::Healthy)
    }
}

/// HTTP probes against a provider's deployed services
pub struct HealthProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthProber {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Frontend root, backend health and the services API.
    ///
    /// A configured `endpoint` serves all three; otherwise the local
    /// port-forward defaults are used.
    pub fn checks_for(provider: &ProviderConfig) -> Vec<HealthCheck> {
        let (frontend, backend) = match provider.endpoint.as_deref() {
            Some(endpoint) => {
                let base = endpoint.trim_end_matches('/');
                (base.to_string(), base.to_string())
            }
            None => (DEFAULT_FRONTEND_URL.to_string(), DEFAULT_BACKEND_URL.to_string()),
        };

        vec![
            HealthCheck {
                name: "frontend".to_string(),
                endpoint: frontend,
            },
            HealthCheck {
                name: "backend-health".to_string(),
                endpoint: format!("{}/health", backend),
            },
            HealthCheck {
                name: "backend-services".to_string(),
                endpoint: format!("{}/api/v1/services", backend),
            },
        ]
    }

    /// Probe in order, stopping at the first failing check
    pub async fn probe(&self, provider: &ProviderConfig) -> HealthReport {
        let mut results = Vec::new();

        for check in Self::checks_for(provider) {
            let result = self.check_health(&check).await;
            let healthy = result.status == HealthStatus::Healthy;
            results.push(result);
            if !healthy {
                error!("Health check failed for {}: {}", provider.name, check.endpoint);
                break;
            }
        }

        let report = HealthReport {
            provider: provider.name.clone(),
            results,
        };
        if report.is_healthy() {
            info!("Health check passed for {}", provider.name);
        }
        report
    }

    pub async fn check_health(&self, check: &HealthCheck) -> HealthCheckResult {
        let start_time = std::time::Instant::now();

        let (status, message) =
            match tokio::time::timeout(self.timeout, self.client.get(&check.endpoint).send()).await {
                Ok(Ok(response)) if response.status() == reqwest::StatusCode::OK => {
                    (HealthStatus::Healthy, format!("HTTP {}", response.status()))
                }
                Ok(Ok(response)) => (HealthStatus::Unhealthy, format!("HTTP {}", response.status())),
                Ok(Err(e)) => (HealthStatus::Unhealthy, format!("Request failed: {}", e)),
                Err(_) => (
                    HealthStatus::Unhealthy,
                    format!("Health check timed out after {:?}", self.timeout),
                ),
            };

        HealthCheckResult {
            check_name: check.name.clone(),
            status,
            response_time_ms: start_time.elapsed().as_millis() as u64,
            message,
            timestamp: Utc::now(),
        }
    }
}

impl Default for HealthProber {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootConfig;

    #[test]
    fn test_default_checks_use_local_ports() {
        let config = RootConfig::default();
        let checks = HealthProber::checks_for(config.provider("aws").unwrap());
        let endpoints: Vec<_> = checks.iter().map(|c| c.endpoint.as_str()).collect();
        assert_eq!(
            endpoints,
            vec![
                "http://localhost:3000",
                "http://localhost:8080/health",
                "http://localhost:8080/api/v1/services"
            ]
        );
    }

    #[test]
    fn test_endpoint_overrides_base() {
        let config = RootConfig::default();
        let mut gcp = config.provider("gcp").unwrap().clone();
        gcp.endpoint = Some("https://gke.example.com/".to_string());
        let checks = HealthProber::checks_for(&gcp);
        assert_eq!(checks[0].endpoint, "https://gke.example.com");
        assert_eq!(checks[1].endpoint, "https://gke.example.com/health");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unhealthy() {
        let config = RootConfig::default();
        let mut aws = config.provider("aws").unwrap().clone();
        // nothing listens on port 9 locally
        aws.endpoint = Some("http://127.0.0.1:9".to_string());

        let report = HealthProber::new()
            .with_timeout(Duration::from_secs(2))
            .probe(&aws)
            .await;

        assert!(!report.is_healthy());
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].status, HealthStatus::Unhealthy);
    }
}
