//! Weighted memory store
//!
//! Persistent scalar "gravity" scores per genre, provider, and mood that bias
//! future decisions. Reinforcement is a coarse online bias, not a learning
//! model: adjustments are monotonic per call, clamped to [0.1, 1.0], with no
//! decay over time. The whole document is rewritten after every mutation.

use crate::storage::DocumentStore;
use serde::{Deserialize, Serialize};
use sonex_common::types::providers;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Score bounds; downstream decisions depend on this range invariant
const SCORE_MIN: f32 = 0.1;
const SCORE_MAX: f32 = 1.0;

/// Score assumed for keys not present in memory
const SCORE_NEUTRAL: f32 = 0.5;

/// Score a newly learned tag starts at
const SCORE_LEARNED: f32 = 0.6;

/// Tags this short are too ambiguous to learn as new genres
const MIN_LEARNABLE_TAG_LEN: usize = 3;

/// The persisted memory document: three independent scalar maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedMemory {
    pub genres: BTreeMap<String, f32>,
    pub providers: BTreeMap<String, f32>,
    pub moods: BTreeMap<String, f32>,
}

impl Default for WeightedMemory {
    fn default() -> Self {
        let mut genres = BTreeMap::new();
        for genre in ["cyberpunk", "ambient", "lofi", "orchestral"] {
            genres.insert(genre.to_string(), SCORE_NEUTRAL);
        }

        let mut provider_scores = BTreeMap::new();
        // Bias towards the local acceleration unit
        provider_scores.insert(providers::LOCAL_BRIDGE.to_string(), 0.8);
        provider_scores.insert(providers::CLOUD_VOICE.to_string(), SCORE_NEUTRAL);
        provider_scores.insert(providers::CLOUD_AUDIO.to_string(), SCORE_NEUTRAL);

        let mut moods = BTreeMap::new();
        for mood in ["dark", "uplifting", "neutral"] {
            moods.insert(mood.to_string(), SCORE_NEUTRAL);
        }

        Self {
            genres,
            providers: provider_scores,
            moods,
        }
    }
}

/// What a reinforcement call changed, for event emission by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryAdjustment {
    /// An existing score moved to a new value
    Adjusted { key: String, score: f32 },
    /// A previously unknown tag was learned
    Learned { tag: String },
}

/// Durable weighted memory
///
/// Owned state object with process lifetime: loaded once at construction,
/// write-through on every mutation. Construction never fails; missing or
/// corrupt storage self-heals to defaults.
pub struct MemoryStore {
    store: DocumentStore<WeightedMemory>,
}

impl MemoryStore {
    /// Open (or initialize) the memory document at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            store: DocumentStore::open(path),
        }
    }

    /// Read-only snapshot of the current memory state
    pub fn snapshot(&self) -> WeightedMemory {
        self.store.read(|memory| memory.clone())
    }

    /// Genre gravity for a style id, 0.5 when unknown. Pure read.
    pub fn gravity(&self, style_id: &str) -> f32 {
        let key = style_id.to_lowercase();
        self.store
            .read(|memory| memory.genres.get(&key).copied().unwrap_or(SCORE_NEUTRAL))
    }

    /// Reinforce (reward or punish) a set of tags and optionally a provider
    ///
    /// Per tag: the first case-insensitive containment match among known
    /// genre keys is adjusted by `delta`; an unmatched tag longer than three
    /// chars is learned at 0.6 when `delta` is positive. A known provider
    /// moves by `delta * 0.5` — infrastructure preferences change more
    /// slowly than style preferences. All scores stay inside [0.1, 1.0].
    /// The document is persisted once after all adjustments.
    pub fn reinforce(
        &self,
        tags: &[String],
        provider: Option<&str>,
        delta: f32,
    ) -> Vec<MemoryAdjustment> {
        self.store.mutate(|memory| {
            let mut changes = Vec::new();

            for tag in tags {
                let tag_lower = tag.to_lowercase();
                let matched = memory
                    .genres
                    .keys()
                    .find(|k| tag_lower.contains(k.as_str()))
                    .cloned();

                if let Some(key) = matched {
                    let score = clamp_score(
                        memory.genres.get(&key).copied().unwrap_or(SCORE_NEUTRAL) + delta,
                    );
                    memory.genres.insert(key.clone(), score);
                    debug!("Adjusted gravity for '{}': {:.2}", key, score);
                    changes.push(MemoryAdjustment::Adjusted { key, score });
                } else if delta > 0.0 && tag.len() > MIN_LEARNABLE_TAG_LEN {
                    memory.genres.insert(tag_lower.clone(), SCORE_LEARNED);
                    info!("Learned new concept: '{}'", tag_lower);
                    changes.push(MemoryAdjustment::Learned { tag: tag_lower });
                }
            }

            if let Some(provider_id) = provider {
                if let Some(current) = memory.providers.get(provider_id).copied() {
                    let score = clamp_score(current + delta * 0.5);
                    memory.providers.insert(provider_id.to_string(), score);
                    debug!(
                        "Adjusted provider score for '{}': {:.2}",
                        provider_id, score
                    );
                    changes.push(MemoryAdjustment::Adjusted {
                        key: provider_id.to_string(),
                        score,
                    });
                }
            }

            changes
        })
    }
}

fn clamp_score(score: f32) -> f32 {
    score.clamp(SCORE_MIN, SCORE_MAX)
}
