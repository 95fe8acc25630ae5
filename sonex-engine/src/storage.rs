//! Whole-document JSON persistence
//!
//! Both durable stores (job collection, weighted memory) persist a single
//! JSON document rewritten in full on every mutation. This type owns that
//! pattern: load-on-open with self-healing (missing or corrupt storage
//! resets to `T::default()` and is re-persisted), mutex-serialized access,
//! write-through on mutation. Storage failures are logged and never
//! propagated — durability is best-effort by design at this scale.
//!
//! The mutex is a plain `std::sync::Mutex` and is never held across an
//! await point; reads from pollers only take it briefly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

pub struct DocumentStore<T> {
    path: PathBuf,
    doc: Mutex<T>,
}

impl<T> DocumentStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Open the document at `path`, self-healing to defaults when the file
    /// is missing or corrupt. The healed state is persisted immediately so
    /// storage and memory agree from the start.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = Self::load_or_default(&path);
        let store = Self {
            path,
            doc: Mutex::new(doc),
        };
        {
            let doc = store.doc.lock().unwrap();
            store.persist(&doc);
        }
        store
    }

    fn load_or_default(path: &Path) -> T {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(
                        "Document {} corrupt, resetting to defaults: {}",
                        path.display(),
                        e
                    );
                    T::default()
                }
            },
            Err(_) => {
                info!("No document at {}, initializing defaults", path.display());
                T::default()
            }
        }
    }

    /// Persist the whole document; failures are logged, never propagated
    fn persist(&self, doc: &T) {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                warn!("Failed to create data dir for {}: {}", self.path.display(), e);
                return;
            }
        }
        match serde_json::to_string_pretty(doc) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!("Failed to persist {}: {}", self.path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize {}: {}", self.path.display(), e),
        }
    }

    /// Run a closure against the current document
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let doc = self.doc.lock().unwrap();
        f(&doc)
    }

    /// Mutate the document and rewrite the backing file in full
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut doc = self.doc.lock().unwrap();
        let result = f(&mut doc);
        self.persist(&doc);
        result
    }
}
