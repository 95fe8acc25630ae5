//! Event types for the Sonex engine event system
//!
//! Broadcast by the engine on every significant lifecycle transition so an
//! embedding service can stream them (SSE, websocket, log sink) without
//! polling the stores.

use crate::types::JobStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Engine event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// Job accepted into the FIFO
    JobQueued {
        job_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Executor picked the job up (status moved to processing)
    JobStarted {
        job_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Provider call succeeded
    JobCompleted {
        job_id: Uuid,
        provider: String,
        elapsed_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Provider call failed (terminal; no retry)
    JobFailed {
        job_id: Uuid,
        status: JobStatus,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A weighted-memory score was adjusted
    MemoryAdjusted {
        key: String,
        score: f32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A previously unknown tag was learned into memory
    StyleLearned {
        tag: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}
