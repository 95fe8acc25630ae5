//! Tiered decision engine
//!
//! Two-stage classifier deciding which provider serves a prompt, what kind
//! of artifact to generate, and which composition layers to suggest.
//!
//! Tier 1 ([`fast::FastClassifier`]) applies cheap substring heuristics and
//! returns immediately when confident. Tier 2 ([`deep::DeepClassifier`])
//! consults the style catalog and weighted memory. `decide` never fails:
//! every prompt, including an empty one, produces a usable decision.

pub mod deep;
pub mod fast;

use crate::memory::MemoryStore;
use sonex_common::types::JobKind;
use std::sync::Arc;
use tracing::debug;

/// Which tier produced a decision (observability only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionTier {
    Fast,
    Deep,
}

/// The chosen provider/kind/layers for one request, plus a reasoning trace
///
/// Ephemeral: computed per request, never persisted independently of the job
/// it decided.
#[derive(Debug, Clone)]
pub struct Decision {
    /// Chosen generation capability identifier
    pub provider: String,

    /// Kind actually to be generated
    pub kind: JobKind,

    /// Human-readable trace of why; for logs and debugging, never parsed
    pub reasoning: String,

    /// Layer suggestions from a matched style; adopted by the executor only
    /// when the job carries no explicit layers
    pub suggested_layers: Option<Vec<String>>,

    /// Matched style catalog id, used to reinforce weighted memory
    pub detected_style_id: Option<String>,

    pub tier: DecisionTier,
}

/// Decision engine composing the fast and deep classifiers
pub struct DecisionEngine {
    memory: Arc<MemoryStore>,
}

impl DecisionEngine {
    pub fn new(memory: Arc<MemoryStore>) -> Self {
        Self { memory }
    }

    /// Decide provider, kind, and layer suggestions for a prompt
    ///
    /// An explicit kind from the caller always wins the final kind/provider
    /// pairing; absent one, kind is inferred from prompt vocabulary.
    pub fn decide(&self, prompt: &str, explicit_kind: Option<JobKind>) -> Decision {
        if let Some(decision) = fast::FastClassifier::evaluate(prompt, explicit_kind) {
            debug!(
                provider = %decision.provider,
                kind = decision.kind.as_str(),
                "Fast tier decision: {}",
                decision.reasoning
            );
            return decision;
        }

        let decision = deep::DeepClassifier::evaluate(prompt, explicit_kind, &self.memory);
        debug!(
            provider = %decision.provider,
            kind = decision.kind.as_str(),
            "Deep tier decision: {}",
            decision.reasoning
        );
        decision
    }
}
