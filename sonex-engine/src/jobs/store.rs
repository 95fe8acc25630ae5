//! Job lifecycle store
//!
//! Durable record of every submitted request and its current state,
//! independent of the queue. The whole collection is the unit of durability:
//! every mutation rewrites the backing JSON document. That is acceptable at
//! expected scale (dozens to low thousands of jobs); all writes are
//! serialized behind the store mutex. Jobs are never deleted by the core.

use crate::storage::DocumentStore;
use chrono::Utc;
use sonex_common::types::{
    GenerationInput, GenerationJob, GenerationResult, JobKind, JobStatus, Layer,
};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Partial update merged into an existing job record
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
    /// Layers adopted from a decision suggestion, recorded on the job input
    pub layers: Option<Vec<Layer>>,
}

impl JobPatch {
    /// Patch that only moves the status
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Terminal success patch
    pub fn completed(result: GenerationResult) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            result: Some(result),
            ..Self::default()
        }
    }

    /// Terminal failure patch
    pub fn failed(status: JobStatus, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Record adopted layers on the job input
    pub fn with_layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = Some(layers);
        self
    }
}

/// Durable job collection
///
/// Missing or corrupt storage self-heals to an empty collection rather than
/// failing the caller.
pub struct JobStore {
    store: DocumentStore<HashMap<Uuid, GenerationJob>>,
}

impl JobStore {
    /// Open (or initialize) the job document at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            store: DocumentStore::open(path),
        }
    }

    /// Allocate a fresh job with status queued and persist it immediately
    pub fn create(&self, kind: JobKind, input: GenerationInput) -> GenerationJob {
        let now = Utc::now();
        let job = GenerationJob {
            id: Uuid::new_v4(),
            kind,
            input,
            status: JobStatus::Queued,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        };

        let created = job.clone();
        self.store.mutate(|jobs| {
            jobs.insert(job.id, job);
        });
        created
    }

    /// Pure lookup
    pub fn get(&self, id: &Uuid) -> Option<GenerationJob> {
        self.store.read(|jobs| jobs.get(id).cloned())
    }

    /// Merge a patch into an existing record, bump `updated_at`, persist.
    /// A no-op (not an error) when the id is unknown.
    pub fn update(&self, id: &Uuid, patch: JobPatch) {
        self.store.mutate(|jobs| {
            if let Some(job) = jobs.get_mut(id) {
                if let Some(status) = patch.status {
                    job.status = status;
                }
                if let Some(result) = patch.result {
                    job.result = Some(result);
                }
                if let Some(error) = patch.error {
                    job.error = Some(error);
                }
                if let Some(layers) = patch.layers {
                    job.input.layers = Some(layers);
                }
                job.updated_at = Utc::now();
            }
        });
    }

    /// All jobs sorted by creation time, newest first
    pub fn list(&self) -> Vec<GenerationJob> {
        let mut all: Vec<GenerationJob> =
            self.store.read(|jobs| jobs.values().cloned().collect());
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }
}
