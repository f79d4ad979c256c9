use async_trait::async_trait;
use multicloud_deployer::connectors::{CommandRunner, ProcessResult};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// One command seen by the mock runner
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub stdin: Option<String>,
}

impl RecordedCall {
    pub fn line(&self) -> String {
        self.command.join(" ")
    }
}

struct Rule {
    needles: Vec<String>,
    result: ProcessResult,
    delay: Option<Duration>,
    panics: bool,
}

/// Mock command runner driven by substring rules.
///
/// The first rule whose needles all occur in the joined command line wins;
/// unmatched commands succeed with empty output.
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, needles: &[&str], result: ProcessResult) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|s| s.to_string()).collect(),
            result,
            delay: None,
            panics: false,
        });
        self
    }

    pub fn on_delayed(mut self, needles: &[&str], result: ProcessResult, delay: Duration) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|s| s.to_string()).collect(),
            result,
            delay: Some(delay),
            panics: false,
        });
        self
    }

    pub fn panic_on(mut self, needles: &[&str]) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|s| s.to_string()).collect(),
            result: ProcessResult::success(""),
            delay: None,
            panics: true,
        });
        self
    }

    /// Answer `kubectl get pods` on `context` with the given counts
    pub fn with_pods(self, context: &str, running: usize, total: usize) -> Self {
        let context_flag = format!("--context {}", context);
        self.on(&[&context_flag, "get pods"], ProcessResult::success(pod_list(running, total)))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, needle: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.line().contains(needle))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        command: &[String],
        working_dir: Option<&Path>,
        stdin: Option<&str>,
    ) -> ProcessResult {
        let line = command.join(" ");
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.to_vec(),
            working_dir: working_dir.map(Path::to_path_buf),
            stdin: stdin.map(str::to_string),
        });

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.needles.iter().all(|needle| line.contains(needle.as_str())));

        match rule {
            Some(rule) => {
                if let Some(delay) = rule.delay {
                    tokio::time::sleep(delay).await;
                }
                if rule.panics {
                    panic!("scripted panic for: {}", line);
                }
                rule.result.clone()
            }
            None => ProcessResult::success(""),
        }
    }
}

/// `kubectl get pods -o json` output with `running` of `total` pods running
pub fn pod_list(running: usize, total: usize) -> String {
    let items: Vec<serde_json::Value> = (0..total)
        .map(|i| {
            let phase = if i < running { "Running" } else { "Pending" };
            serde_json::json!({
                "metadata": { "name": format!("pod-{}", i) },
                "status": { "phase": phase }
            })
        })
        .collect();
    serde_json::json!({ "items": items }).to_string()
}
