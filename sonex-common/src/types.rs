//! Core data model for generation jobs
//!
//! Plain serde structs shared by the engine and any embedding service.
//! The whole job collection is persisted as one JSON document, so every
//! type here is serialize/deserialize round-trip safe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Well-known provider identifiers
///
/// Providers are opaque strings at the seam; these are the identifiers the
/// decision engine routes to. Unrecognized identifiers fall back to
/// [`providers::DEFAULT`] at execution time.
pub mod providers {
    /// Local acceleration unit behind the bridge daemon. Low latency,
    /// cannot serve concurrent requests.
    pub const LOCAL_BRIDGE: &str = "local-bridge";

    /// High-quality cloud speech synthesis.
    pub const CLOUD_VOICE: &str = "cloud-voice";

    /// General-purpose cloud generation model.
    pub const CLOUD_AUDIO: &str = "cloud-audio";

    /// Fixed fallback when a job names a provider nobody registered.
    pub const DEFAULT: &str = CLOUD_AUDIO;
}

/// What kind of artifact a job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Speech,
    SoundEffect,
    Music,
}

impl JobKind {
    /// Lowercase wire name, used in reasoning traces and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Speech => "speech",
            JobKind::SoundEffect => "sound_effect",
            JobKind::Music => "music",
        }
    }
}

/// Job lifecycle status
///
/// Legal transitions: `Queued -> Processing -> {Completed | Failed | FailedQuota}`.
/// Terminal states are final; a failed job is resubmitted as a new job by the
/// caller-facing boundary, never retried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    FailedQuota,
}

impl JobStatus {
    /// True for states that end the lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::FailedQuota
        )
    }
}

/// One composition layer: a descriptive sub-prompt, optionally with
/// mix placement hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Layer {
    /// Bare descriptive string
    Plain(String),
    /// Structured layer with mix hints
    Detailed {
        prompt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        volume: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pan: Option<f32>,
    },
}

impl Layer {
    /// The descriptive prompt regardless of representation
    pub fn prompt(&self) -> &str {
        match self {
            Layer::Plain(s) => s,
            Layer::Detailed { prompt, .. } => prompt,
        }
    }
}

impl From<&str> for Layer {
    fn from(s: &str) -> Self {
        Layer::Plain(s.to_string())
    }
}

/// Tuning knobs forwarded opaquely to the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmth: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumental_only: Option<bool>,

    /// Free-form extension fields, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Caller-supplied input for one generation job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationInput {
    /// Free text prompt
    pub text: String,

    /// Voice identifier for speech generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    /// Target duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    /// Explicit provider override; always wins over the decision engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Explicit composition layers; suppresses automatic layer injection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<GenerationSettings>,
}

/// Opaque result handle plus provider metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Artifact handle (URL, path, or provider reference)
    pub handle: String,

    /// Provider-specific metadata, not interpreted by the core
    #[serde(default)]
    pub metadata: Value,
}

/// One user-submitted generation request and its lifecycle state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    /// Unique identifier, assigned at creation, immutable
    pub id: Uuid,

    pub kind: JobKind,

    pub input: GenerationInput,

    pub status: JobStatus,

    /// Present only when completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResult>,

    /// Present only when failed / failed_quota
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Bumped on every mutation
    pub updated_at: DateTime<Utc>,
}
