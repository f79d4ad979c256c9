//! Plain-text deployment report

use crate::deployment::DeploymentStatus;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_TITLE: &str = "Multi-Cloud Deployment Report";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders statuses in the order given. Callers pass completion order, so
/// no sorting happens here.
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn render(statuses: &[DeploymentStatus]) -> String {
        Self::render_at(statuses, Utc::now())
    }

    pub fn render_at(statuses: &[DeploymentStatus], generated_at: DateTime<Utc>) -> String {
        let mut report = vec![
            REPORT_TITLE.to_string(),
            "=".repeat(50),
            format!("Timestamp: {}", generated_at.format(TIMESTAMP_FORMAT)),
            String::new(),
        ];

        for status in statuses {
            report.push(format!("Provider: {}", status.provider.to_uppercase()));
            report.push(format!("Status: {}", status.state));
            report.push(format!("Message: {}", status.message));
            report.push(format!("Pods: {}/{}", status.pods_running, status.pods_total));
            report.push(format!("Timestamp: {}", status.timestamp.format(TIMESTAMP_FORMAT)));
            report.push("-".repeat(30));
        }

        report.push(format!(
            "Overall Success Rate: {}/{} ({:.1}%)",
            successful_count(statuses),
            statuses.len(),
            success_rate(statuses)
        ));

        report.join("\n")
    }

    /// Write the report as `deployment-report-<unix-seconds>.txt` in `dir`
    pub fn write_report(dir: &Path, report: &str) -> Result<PathBuf> {
        let path = dir.join(format!("deployment-report-{}.txt", Utc::now().timestamp()));
        std::fs::write(&path, report)?;
        info!("📝 Report saved to {}", path.display());
        Ok(path)
    }
}

pub fn successful_count(statuses: &[DeploymentStatus]) -> usize {
    statuses.iter().filter(|s| s.state.is_success()).count()
}

/// Percentage of statuses that count as successful; 0 for no statuses
pub fn success_rate(statuses: &[DeploymentStatus]) -> f64 {
    if statuses.is_empty() {
        return 0.0;
    }
    100.0 * successful_count(statuses) as f64 / statuses.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::PodCounts;
    use chrono::TimeZone;

    fn healthy(provider: &str) -> DeploymentStatus {
        DeploymentStatus::from_pod_counts(provider, PodCounts { running: 3, total: 3 })
    }

    #[test]
    fn test_layout() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let mut status = healthy("gcp");
        status.timestamp = at;

        let report = ReportGenerator::render_at(&[status], at);
        let expected = [
            "Multi-Cloud Deployment Report",
            "=".repeat(50).as_str(),
            "Timestamp: 2026-03-01 12:30:00",
            "",
            "Provider: GCP",
            "Status: healthy",
            "Message: 3/3 pods running",
            "Pods: 3/3",
            "Timestamp: 2026-03-01 12:30:00",
            "-".repeat(30).as_str(),
            "Overall Success Rate: 1/1 (100.0%)",
        ]
        .join("\n");
        assert_eq!(report, expected);
    }

    #[test]
    fn test_blocks_keep_input_order() {
        let report = ReportGenerator::render(&[healthy("gcp"), healthy("aws"), healthy("azure")]);
        let gcp = report.find("Provider: GCP").unwrap();
        let aws = report.find("Provider: AWS").unwrap();
        let azure = report.find("Provider: AZURE").unwrap();
        assert!(gcp < aws && aws < azure);
    }

    #[test]
    fn test_success_rate_one_decimal() {
        let statuses = vec![
            healthy("aws"),
            DeploymentStatus::failed("azure", "boom"),
            DeploymentStatus::unknown("gcp", "timeout"),
        ];
        assert!((success_rate(&statuses) - 100.0 / 3.0).abs() < 1e-9);
        let report = ReportGenerator::render(&statuses);
        assert!(report.ends_with("Overall Success Rate: 1/3 (33.3%)"));
    }

    #[test]
    fn test_empty_report() {
        let report = ReportGenerator::render(&[]);
        assert!(report.ends_with("Overall Success Rate: 0/0 (0.0%)"));
    }

    #[test]
    fn test_write_report_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = ReportGenerator::write_report(dir.path(), "body").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("deployment-report-"));
        assert!(name.ends_with(".txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "body");
    }
}
