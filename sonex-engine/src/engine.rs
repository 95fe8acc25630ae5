//! Engine facade
//!
//! Process-lifetime object owning the stores, the provider registry, the
//! event broadcaster, and the single-flight job queue. This is the whole
//! boundary the presentation/HTTP layer consumes: creating a job returns
//! immediately; generation progress is observed by polling job snapshots or
//! subscribing to the event stream. Intended lifecycle: constructed once at
//! process start, torn down never.

use crate::jobs::{JobExecutor, JobQueue, JobStore};
use crate::memory::{MemoryStore, WeightedMemory};
use crate::provider::ProviderRegistry;
use chrono::Utc;
use sonex_common::events::EngineEvent;
use sonex_common::types::{GenerationInput, GenerationJob, JobKind};
use sonex_common::EngineConfig;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

/// Durable document names inside the data folder
const JOBS_FILE: &str = "jobs.json";
const MEMORY_FILE: &str = "memory_weights.json";

/// The generation engine boundary
pub struct GenerationEngine {
    config: EngineConfig,
    jobs: Arc<JobStore>,
    memory: Arc<MemoryStore>,
    queue: JobQueue,
    events: broadcast::Sender<EngineEvent>,
}

impl GenerationEngine {
    /// Initialize stores from the configured data folder and start the
    /// queue worker. Must be called within a tokio runtime.
    ///
    /// Construction self-heals missing or corrupt durable documents; it
    /// never fails on storage problems.
    pub fn new(config: EngineConfig, registry: ProviderRegistry) -> Self {
        let jobs = Arc::new(JobStore::open(config.data_dir.join(JOBS_FILE)));
        let memory = Arc::new(MemoryStore::open(config.data_dir.join(MEMORY_FILE)));
        let (events, _) = broadcast::channel(100);

        let executor = Arc::new(JobExecutor::new(
            config.clone(),
            Arc::clone(&jobs),
            Arc::clone(&memory),
            Arc::new(registry),
            events.clone(),
        ));
        let queue = JobQueue::spawn(executor);

        info!("Generation engine initialized at {}", config.data_dir.display());
        Self {
            config,
            jobs,
            memory,
            queue,
            events,
        }
    }

    /// Create a job record (status queued); returns immediately without
    /// blocking on generation
    pub fn create_job(&self, kind: JobKind, input: GenerationInput) -> GenerationJob {
        self.jobs.create(kind, input)
    }

    /// Hand a created job id to the queue for eventual execution
    pub fn enqueue(&self, job_id: Uuid) {
        // Announce before the worker can pick the job up
        let _ = self.events.send(EngineEvent::JobQueued {
            job_id,
            timestamp: Utc::now(),
        });
        self.queue.add(job_id);
    }

    /// Create and enqueue in one step
    pub fn submit(&self, kind: JobKind, input: GenerationInput) -> GenerationJob {
        let job = self.create_job(kind, input);
        self.enqueue(job.id);
        job
    }

    /// Current status/result/error snapshot for polling; never blocks the
    /// executor
    pub fn job(&self, id: &Uuid) -> Option<GenerationJob> {
        self.jobs.get(id)
    }

    /// All jobs, newest first
    pub fn jobs(&self) -> Vec<GenerationJob> {
        self.jobs.list()
    }

    /// Explicit caller-initiated reinforcement, independent of job
    /// execution. `delta` defaults to the configured promotion reward.
    pub fn promote(&self, tags: &[String], provider: Option<&str>, delta: Option<f32>) {
        let delta = delta.unwrap_or(self.config.promote_delta);
        let changes = self.memory.reinforce(tags, provider, delta);
        for change in changes {
            let event = match change {
                crate::memory::MemoryAdjustment::Adjusted { key, score } => {
                    EngineEvent::MemoryAdjusted {
                        key,
                        score,
                        timestamp: Utc::now(),
                    }
                }
                crate::memory::MemoryAdjustment::Learned { tag } => EngineEvent::StyleLearned {
                    tag,
                    timestamp: Utc::now(),
                },
            };
            let _ = self.events.send(event);
        }
    }

    /// Read-only snapshot of the weighted memory for display
    pub fn memory(&self) -> WeightedMemory {
        self.memory.snapshot()
    }

    /// Subscribe to engine lifecycle events
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Jobs accepted but not yet finished
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }
}
