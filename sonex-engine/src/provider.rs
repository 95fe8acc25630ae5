//! Generation provider seam
//!
//! The core treats every generation capability as interchangeable and opaque
//! behind [`GenerationProvider`]. Exactly one implementation is selected per
//! job by the executor; resolution order is explicit job override, then
//! decision engine suggestion, then the fixed default.

use async_trait::async_trait;
use sonex_common::types::{GenerationResult, GenerationSettings, JobKind, Layer};
use sonex_common::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Sanitized, fully resolved request handed to a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Prompt text, already truncated to the configured maximum
    pub text: String,

    /// Composition layers: the job's own, or injected suggestions
    pub layers: Vec<Layer>,

    pub voice_id: Option<String>,

    /// Target duration in seconds (config default applied when the job
    /// set none)
    pub duration_secs: u32,

    pub settings: GenerationSettings,
}

/// Universal interface for any generation capability
///
/// Implementations may block for tens of seconds; the executor awaits the
/// call inside its single slot and applies no timeout of its own. Failures
/// should surface as [`sonex_common::Error::Provider`] so the executor can
/// classify quota exhaustion.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider identifier used in routing, memory scores, and logs
    fn id(&self) -> &'static str;

    /// Produce an artifact for the request
    async fn generate(&self, kind: JobKind, request: &ProviderRequest)
        -> Result<GenerationResult>;
}

/// Provider lookup with unconditional fallback
///
/// An unrecognized identifier never fails resolution; it falls back to the
/// default provider registered at construction.
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn GenerationProvider>>,
    default_id: &'static str,
}

impl ProviderRegistry {
    /// Registry seeded with its fallback provider
    pub fn new(default_provider: Arc<dyn GenerationProvider>) -> Self {
        let default_id = default_provider.id();
        let mut providers: HashMap<&'static str, Arc<dyn GenerationProvider>> = HashMap::new();
        providers.insert(default_id, default_provider);
        Self {
            providers,
            default_id,
        }
    }

    /// Register (or replace) a provider under its own id
    pub fn register(&mut self, provider: Arc<dyn GenerationProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    /// Resolve the provider for a job
    ///
    /// `override_id` is the job's explicit provider, `suggested_id` the
    /// decision engine's pick. Unknown identifiers fall back to the default.
    pub fn resolve(
        &self,
        override_id: Option<&str>,
        suggested_id: &str,
    ) -> Arc<dyn GenerationProvider> {
        let target = override_id.unwrap_or(suggested_id);
        match self.providers.get(target) {
            Some(provider) => Arc::clone(provider),
            None => {
                warn!(
                    "Unknown provider '{}', falling back to '{}'",
                    target, self.default_id
                );
                Arc::clone(&self.providers[self.default_id])
            }
        }
    }

    /// Identifier of the fallback provider
    pub fn default_id(&self) -> &'static str {
        self.default_id
    }
}
