//! Job lifecycle store and serialized queue/executor

pub mod queue;
pub mod store;

pub use queue::{JobExecutor, JobQueue};
pub use store::{JobPatch, JobStore};
