//! Shared test fixtures: mock providers and engine setup

use async_trait::async_trait;
use serde_json::json;
use sonex_common::types::{GenerationResult, JobKind, Layer};
use sonex_common::{EngineConfig, Error, Result};
use sonex_engine::{GenerationEngine, GenerationProvider, ProviderRegistry, ProviderRequest};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// One observed provider invocation
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub provider: &'static str,
    pub kind: JobKind,
    pub text: String,
    pub layers: Vec<Layer>,
    pub voice_id: Option<String>,
    pub duration_secs: u32,
    pub entered: Instant,
    pub exited: Instant,
}

/// Shared log of provider invocations across all mocks of one test
pub type CallLog = Arc<Mutex<Vec<CallRecord>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Configurable mock provider recording entry/exit timestamps
pub struct MockProvider {
    id: &'static str,
    delay: Duration,
    fail_with: Option<String>,
    calls: CallLog,
}

impl MockProvider {
    pub fn new(id: &'static str, calls: CallLog) -> Self {
        Self {
            id,
            delay: Duration::ZERO,
            fail_with: None,
            calls,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_with(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn generate(
        &self,
        kind: JobKind,
        request: &ProviderRequest,
    ) -> Result<GenerationResult> {
        let entered = Instant::now();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let exited = Instant::now();

        self.calls.lock().unwrap().push(CallRecord {
            provider: self.id,
            kind,
            text: request.text.clone(),
            layers: request.layers.clone(),
            voice_id: request.voice_id.clone(),
            duration_secs: request.duration_secs,
            entered,
            exited,
        });

        if let Some(message) = &self.fail_with {
            return Err(Error::Provider(message.clone()));
        }

        Ok(GenerationResult {
            handle: format!("mock://{}/artifact", self.id),
            metadata: json!({ "provider": self.id }),
        })
    }
}

/// Registry with all three well-known providers backed by recording mocks
pub fn full_registry(calls: &CallLog) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new(Arc::new(MockProvider::new(
        "cloud-audio",
        Arc::clone(calls),
    )));
    registry.register(Arc::new(MockProvider::new("cloud-voice", Arc::clone(calls))));
    registry.register(Arc::new(MockProvider::new("local-bridge", Arc::clone(calls))));
    registry
}

/// Engine rooted in a temp dir with the given registry
pub fn engine_with(dir: &tempfile::TempDir, registry: ProviderRegistry) -> GenerationEngine {
    GenerationEngine::new(EngineConfig::with_data_dir(dir.path()), registry)
}

/// Poll until the job reaches a terminal state
pub async fn wait_terminal(
    engine: &GenerationEngine,
    id: Uuid,
) -> sonex_common::types::GenerationJob {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(job) = engine.job(&id) {
            if job.status.is_terminal() {
                return job;
            }
        }
        assert!(Instant::now() < deadline, "job {id} never reached a terminal state");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
