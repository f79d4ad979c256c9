use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

/// Represents the outcome of one external command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl ProcessResult {
    pub fn new(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            success: exit_code == 0,
        }
    }

    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(0, stdout.into(), String::new())
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        // a zero exit code would flip `success`
        let exit_code = if exit_code == 0 { -1 } else { exit_code };
        Self::new(exit_code, String::new(), stderr.into())
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Best single-line description of why the command failed
    pub fn error_summary(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("exit code {}", self.exit_code)
    }
}

/// Seam between the deployment logic and the operating system.
///
/// Implementations never fail for a non-zero exit: the outcome is always
/// reported through `ProcessResult` so the caller decides how severe it is.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &[String],
        working_dir: Option<&Path>,
        stdin: Option<&str>,
    ) -> ProcessResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag_follows_exit_code() {
        assert!(ProcessResult::success("ok").is_success());
        assert!(!ProcessResult::new(2, String::new(), "boom".to_string()).is_success());
        assert!(!ProcessResult::failure(0, "spawn failed").is_success());
    }

    #[test]
    fn test_error_summary_prefers_stderr() {
        let result = ProcessResult::new(1, "out".to_string(), "  err \n".to_string());
        assert_eq!(result.error_summary(), "err");

        let result = ProcessResult::new(1, "out".to_string(), String::new());
        assert_eq!(result.error_summary(), "out");

        let result = ProcessResult::new(7, String::new(), String::new());
        assert_eq!(result.error_summary(), "exit code 7");
    }
}
