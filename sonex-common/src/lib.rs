//! # Sonex Common Library
//!
//! Shared code for the Sonex generation engine including:
//! - Job and decision data models
//! - Event types (EngineEvent enum)
//! - Error types
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::EngineConfig;
pub use error::{Error, Result};
