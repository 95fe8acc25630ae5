//! Job queue and executor
//!
//! Strictly serialized FIFO task runner: exactly one job's provider call is
//! in flight at any time. That is a resource-protection constraint, not an
//! optimization — the local acceleration unit cannot serve concurrent
//! requests efficiently, so queued jobs wait while the single slot is
//! occupied. The executor applies no timeout of its own; once a provider
//! call settles (success or failure) the queue continues draining.
//!
//! Lifecycle per job:
//! `queued -> processing -> {completed | failed | failed_quota}`.
//! Terminal states are final; failures never crash the worker loop.

use crate::decision::DecisionEngine;
use crate::jobs::store::{JobPatch, JobStore};
use crate::memory::{MemoryAdjustment, MemoryStore};
use crate::provider::{ProviderRegistry, ProviderRequest};
use chrono::Utc;
use sonex_common::events::EngineEvent;
use sonex_common::types::{GenerationJob, JobStatus, Layer};
use sonex_common::{EngineConfig, Error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Fixed user-facing message for exhausted credits / rejected authorization
pub const QUOTA_MESSAGE: &str = "Generation credits exhausted. Please recharge.";

/// Executes one job end to end: decision, sanitization, layer injection,
/// provider invocation, terminal state recording.
pub struct JobExecutor {
    config: EngineConfig,
    jobs: Arc<JobStore>,
    memory: Arc<MemoryStore>,
    decisions: DecisionEngine,
    registry: Arc<ProviderRegistry>,
    events: broadcast::Sender<EngineEvent>,
}

impl JobExecutor {
    pub fn new(
        config: EngineConfig,
        jobs: Arc<JobStore>,
        memory: Arc<MemoryStore>,
        registry: Arc<ProviderRegistry>,
        events: broadcast::Sender<EngineEvent>,
    ) -> Self {
        let decisions = DecisionEngine::new(Arc::clone(&memory));
        Self {
            config,
            jobs,
            memory,
            decisions,
            registry,
            events,
        }
    }

    /// Process a single dequeued job id
    ///
    /// Never returns an error: every failure path is classified, persisted
    /// on the job, and left behind for the next queued id.
    pub async fn process(&self, job_id: Uuid) {
        let Some(job) = self.jobs.get(&job_id) else {
            warn!("Job {} not found, skipping", job_id);
            return;
        };

        self.jobs.update(&job_id, JobPatch::status(JobStatus::Processing));
        self.emit(EngineEvent::JobStarted {
            job_id,
            timestamp: Utc::now(),
        });

        // Guard against unbounded-size abuse before any further processing
        let text = self.sanitize_prompt(&job);

        let decision = self.decisions.decide(&text, Some(job.kind));
        debug!(job_id = %job_id, "Decision: {}", decision.reasoning);

        // Explicit override > decision suggestion > fixed default
        let provider = self
            .registry
            .resolve(job.input.provider.as_deref(), &decision.provider);

        let layers = self.resolve_layers(&job, &decision);

        let request = ProviderRequest {
            text,
            layers,
            voice_id: job.input.voice_id.clone(),
            duration_secs: job.input.duration.unwrap_or(self.config.default_duration_secs),
            settings: job.input.settings.clone().unwrap_or_default(),
        };

        info!(
            job_id = %job_id,
            provider = provider.id(),
            kind = decision.kind.as_str(),
            "Dispatching job"
        );
        let started = Instant::now();

        match provider.generate(decision.kind, &request).await {
            Ok(result) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                info!(job_id = %job_id, elapsed_ms, "Job completed");
                self.jobs.update(&job_id, JobPatch::completed(result));
                self.emit(EngineEvent::JobCompleted {
                    job_id,
                    provider: provider.id().to_string(),
                    elapsed_ms,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                let (status, message) = classify_failure(e);
                error!(job_id = %job_id, "Job failed: {}", message);
                self.jobs
                    .update(&job_id, JobPatch::failed(status, message.clone()));
                self.emit(EngineEvent::JobFailed {
                    job_id,
                    status,
                    message,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Truncate overlong prompts on a char boundary
    fn sanitize_prompt(&self, job: &GenerationJob) -> String {
        let text = &job.input.text;
        if text.chars().count() > self.config.max_prompt_chars {
            warn!(job_id = %job.id, "Truncating oversized prompt");
            text.chars().take(self.config.max_prompt_chars).collect()
        } else {
            text.clone()
        }
    }

    /// Use the job's explicit layers, or adopt the decision's suggestion.
    /// Adoption rewards the detected style with the smaller automatic delta
    /// (a discovery signal, distinct from caller-initiated promotion) and is
    /// recorded on the persisted job.
    fn resolve_layers(
        &self,
        job: &GenerationJob,
        decision: &crate::decision::Decision,
    ) -> Vec<Layer> {
        if let Some(layers) = &job.input.layers {
            if !layers.is_empty() {
                return layers.clone();
            }
        }

        let Some(suggested) = &decision.suggested_layers else {
            return Vec::new();
        };

        info!(
            job_id = %job.id,
            style = decision.detected_style_id.as_deref().unwrap_or("?"),
            "Auto-injecting {} suggested layers",
            suggested.len()
        );
        let layers: Vec<Layer> = suggested.iter().map(|s| Layer::Plain(s.clone())).collect();
        self.jobs
            .update(&job.id, JobPatch::default().with_layers(layers.clone()));

        if let Some(style_id) = &decision.detected_style_id {
            let changes =
                self.memory
                    .reinforce(&[style_id.clone()], None, self.config.auto_adopt_delta);
            self.emit_memory_events(changes);
        }

        layers
    }

    fn emit_memory_events(&self, changes: Vec<MemoryAdjustment>) {
        for change in changes {
            let event = match change {
                MemoryAdjustment::Adjusted { key, score } => EngineEvent::MemoryAdjusted {
                    key,
                    score,
                    timestamp: Utc::now(),
                },
                MemoryAdjustment::Learned { tag } => EngineEvent::StyleLearned {
                    tag,
                    timestamp: Utc::now(),
                },
            };
            self.emit(event);
        }
    }

    fn emit(&self, event: EngineEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.events.send(event);
    }
}

/// Classify a provider failure into its terminal status and user-facing
/// message: quota/authorization exhaustion gets the fixed recharge message,
/// everything else keeps the raw provider message.
fn classify_failure(error: Error) -> (JobStatus, String) {
    if error.is_quota() {
        (JobStatus::FailedQuota, QUOTA_MESSAGE.to_string())
    } else {
        let message = match error {
            Error::Provider(msg) => msg,
            other => other.to_string(),
        };
        (JobStatus::Failed, message)
    }
}

/// FIFO handle feeding the single worker task
///
/// `add` never blocks; the worker drains ids in arrival order, one at a
/// time. Dropping the queue closes the channel and the worker exits after
/// finishing the jobs already accepted.
pub struct JobQueue {
    tx: mpsc::UnboundedSender<Uuid>,
    pending: Arc<AtomicUsize>,
}

impl JobQueue {
    /// Spawn the worker task and return the enqueue handle
    pub fn spawn(executor: Arc<JobExecutor>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Uuid>();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker_pending = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(job_id) = rx.recv().await {
                executor.process(job_id).await;
                worker_pending.fetch_sub(1, Ordering::Relaxed);
            }
            debug!("Job queue closed, worker exiting");
        });
        info!("Job queue started with single-flight worker");

        Self { tx, pending }
    }

    /// Append a job id to the FIFO
    pub fn add(&self, job_id: Uuid) {
        self.pending.fetch_add(1, Ordering::Relaxed);
        if self.tx.send(job_id).is_err() {
            self.pending.fetch_sub(1, Ordering::Relaxed);
            warn!("Job queue worker gone, dropping job {}", job_id);
            return;
        }
        debug!(
            "Job {} added to queue, pending: {}",
            job_id,
            self.pending.load(Ordering::Relaxed)
        );
    }

    /// Jobs accepted but not yet finished (including the in-flight one)
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_errors_get_the_fixed_message() {
        let (status, message) = classify_failure(Error::Provider("quota exceeded".into()));
        assert_eq!(status, JobStatus::FailedQuota);
        assert_eq!(message, QUOTA_MESSAGE);

        let (status, _) = classify_failure(Error::Provider("status 401".into()));
        assert_eq!(status, JobStatus::FailedQuota);
    }

    #[test]
    fn other_errors_keep_the_raw_message() {
        let (status, message) = classify_failure(Error::Provider("synth exploded".into()));
        assert_eq!(status, JobStatus::Failed);
        assert_eq!(message, "synth exploded");
    }
}
