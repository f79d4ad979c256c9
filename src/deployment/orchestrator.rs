//! Concurrent multi-provider deployment
//!
//! One task per provider on a `JoinSet`, throttled by a semaphore. Tasks
//! share only the read-only `RootConfig` and the command runner; the join
//! loop is the single point where results are gathered, in completion order.

use super::pipeline::{PipelineOutcome, ProviderPipeline};
use super::status::{DeploymentStatus, StatusCollector};
use crate::config::RootConfig;
use crate::connectors::kubernetes::Kubectl;
use crate::connectors::{CommandRunner, CredentialBinder, ProviderKind};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Default number of providers deployed at the same time
pub const DEFAULT_CONCURRENCY: usize = 3;

#[derive(Clone)]
pub struct Orchestrator {
    binder: CredentialBinder,
    pipeline: ProviderPipeline,
    collector: StatusCollector,
    max_concurrency: usize,
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binder: CredentialBinder::new(Arc::clone(&runner)),
            pipeline: ProviderPipeline::new(Arc::clone(&runner)),
            collector: StatusCollector::new(runner),
            max_concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Deploy to every configured provider concurrently.
    ///
    /// Returns exactly one status per configured provider, ordered by
    /// completion. A failing or panicking provider never affects the others.
    pub async fn run_all(&self, config: Arc<RootConfig>) -> Vec<DeploymentStatus> {
        let run_id = Uuid::new_v4();
        let provider_ids = config.provider_ids();

        if provider_ids.is_empty() {
            warn!("⚠️ No providers configured, nothing to deploy");
            return Vec::new();
        }

        let permits = self.max_concurrency.min(provider_ids.len());
        info!(
            "🚀 Deploying to {} providers (run {}, {} at a time)",
            provider_ids.len(),
            run_id,
            permits
        );

        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();

        for provider_id in provider_ids.iter().cloned() {
            let worker = self.clone();
            let config = Arc::clone(&config);
            let semaphore = Arc::clone(&semaphore);
            let span = info_span!("deploy", run = %run_id, provider = %provider_id);

            tasks.spawn(
                async move {
                    // the semaphore is never closed
                    let _permit = semaphore.acquire_owned().await.ok();

                    AssertUnwindSafe(worker.deploy_provider(&config, &provider_id))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|panic| {
                            let reason = panic_message(panic.as_ref());
                            error!("❌ Deployment task for {} panicked: {}", provider_id, reason);
                            DeploymentStatus::failed(
                                &provider_id,
                                format!("Deployment task panicked: {}", reason),
                            )
                        })
                }
                .instrument(span),
            );
        }

        let mut results = Vec::with_capacity(provider_ids.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(status) => {
                    info!("📥 {} finished: {}", status.provider, status.state);
                    results.push(status);
                }
                Err(e) => error!("❌ Deployment task could not be joined: {}", e),
            }
        }

        for provider_id in &provider_ids {
            if !results.iter().any(|status| &status.provider == provider_id) {
                results.push(DeploymentStatus::failed(
                    provider_id,
                    "Deployment task did not report a status",
                ));
            }
        }

        results
    }

    /// Deploy to a single provider without the worker pool
    pub async fn run_one(&self, config: &RootConfig, provider_id: &str) -> DeploymentStatus {
        let run_id = Uuid::new_v4();
        self.deploy_provider(config, provider_id)
            .instrument(info_span!("deploy", run = %run_id, provider = %provider_id))
            .await
    }

    /// Bind credentials and report current pod health without deploying
    pub async fn collect_status(&self, config: &RootConfig, provider_id: &str) -> DeploymentStatus {
        let provider = match config.provider(provider_id) {
            Some(provider) => provider,
            None => return missing_provider(provider_id),
        };

        match self.binder.bind(provider).await {
            Ok(result) if result.is_success() => {}
            Ok(result) => {
                return DeploymentStatus::unknown(
                    provider_id,
                    format!("Credential binding failed: {}", result.error_summary()),
                )
            }
            Err(e) => return DeploymentStatus::failed(provider_id, e.to_string()),
        }

        let kubectl = Kubectl::new(&provider.context, &config.deployment.namespace);
        self.collector.collect(provider_id, &kubectl).await
    }

    async fn deploy_provider(&self, config: &RootConfig, provider_id: &str) -> DeploymentStatus {
        let provider = match config.provider(provider_id) {
            Some(provider) => provider,
            None => return missing_provider(provider_id),
        };
        if let Err(e) = provider_id.parse::<ProviderKind>() {
            warn!("⚠️ {}", e);
            return DeploymentStatus::failed(provider_id, e.to_string());
        }

        let outcome = self.pipeline.run(provider, &config.deployment).await;

        // collected even after a failure to surface partial rollout state
        let kubectl = Kubectl::new(&provider.context, &config.deployment.namespace);
        let observed = self.collector.collect(provider_id, &kubectl).await;

        match outcome {
            PipelineOutcome::Done => observed,
            PipelineOutcome::Failed { message, .. } => {
                DeploymentStatus::failed_with_counts(provider_id, message, observed.counts())
            }
        }
    }
}

fn missing_provider(provider_id: &str) -> DeploymentStatus {
    match provider_id.parse::<ProviderKind>() {
        Err(e) => {
            warn!("⚠️ {}", e);
            DeploymentStatus::failed(provider_id, e.to_string())
        }
        Ok(_) => DeploymentStatus::failed(
            provider_id,
            format!("Provider '{}' is not configured", provider_id),
        ),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
