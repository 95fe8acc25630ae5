//! # Sonex Generation Engine
//!
//! Decision-and-execution core for natural-language audio generation
//! requests.
//!
//! **Purpose:** Decide which generation provider serves each request, inject
//! auxiliary composition layers, and execute requests strictly one at a time
//! so a constrained local acceleration unit is never hit concurrently.
//!
//! **Architecture:** Two-tier decision engine (fast heuristics, then
//! catalog + weighted memory), whole-document JSON persistence for the job
//! lifecycle store and the weighted memory store, and a single-worker FIFO
//! executor with terminal failure classification.

pub mod catalog;
pub mod decision;
pub mod engine;
pub mod jobs;
pub mod memory;
pub mod provider;
pub mod storage;

pub use engine::GenerationEngine;
pub use jobs::queue::QUOTA_MESSAGE;
pub use provider::{GenerationProvider, ProviderRegistry, ProviderRequest};
pub use sonex_common::{Error, Result};
