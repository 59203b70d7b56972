//! Snapshot persistence: a small key-value store, restore-or-default on load
//! and debounced autosave.
//!
//! Persistence never interrupts editing. Restore falls back to a fresh
//! document, and failed writes are logged and dropped.

use crate::config::EditorConfig;
use crate::fs::write_atomic;
use crate::model::Document;
use crate::serialize::json;
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage quota exceeded ({needed} bytes needed, {limit} allowed)")]
    QuotaExceeded { needed: usize, limit: usize },
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key under a root directory.
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        write_atomic(&path, value.as_bytes())?;
        Ok(())
    }
}

/// In-process store with an optional size limit, mirroring a browser's storage quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(limit),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn save(
    store: &dyn KeyValueStore,
    key: &str,
    document: &Document,
) -> Result<(), StoreError> {
    let encoded = json::serialize(document)?;
    store.set(key, &encoded)
}

/// Loads the stored snapshot, or a fresh document when it is missing,
/// unreadable or corrupt.
pub fn restore(store: &dyn KeyValueStore, config: &EditorConfig) -> Document {
    let fresh = || Document::with_owner(config.owner_id.clone(), Utc::now());
    match store.get(&config.storage_key) {
        Ok(Some(snapshot)) => match json::deserialize(&snapshot) {
            Ok(document) => {
                debug!(key = %config.storage_key, blocks = document.blocks().len(), "restored snapshot");
                document
            }
            Err(err) => {
                warn!(key = %config.storage_key, %err, "discarding corrupt snapshot");
                fresh()
            }
        },
        Ok(None) => {
            debug!(key = %config.storage_key, "no snapshot; starting fresh");
            fresh()
        }
        Err(err) => {
            warn!(key = %config.storage_key, %err, "could not read snapshot; starting fresh");
            fresh()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveOutcome {
    /// No write is scheduled.
    Idle,
    /// A write is scheduled but its deadline has not passed.
    Waiting,
    Saved,
    /// The write failed. It was logged and will not be retried until the next change.
    Failed,
}

/// Debounced snapshot writer.
///
/// Each [`touch`](Autosaver::touch) pushes the deadline back, so at most one
/// write is ever pending. The write captures whatever document is passed to
/// [`poll`](Autosaver::poll) when the deadline has passed.
#[derive(Debug)]
pub struct Autosaver {
    key: String,
    delay: Duration,
    deadline: Option<Instant>,
}

impl Autosaver {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            key: config.storage_key.clone(),
            delay: config.autosave_delay,
            deadline: None,
        }
    }

    /// Records a change at `now`, replacing any pending deadline.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn poll(
        &mut self,
        now: Instant,
        store: &dyn KeyValueStore,
        current: &Document,
    ) -> AutosaveOutcome {
        match self.deadline {
            None => AutosaveOutcome::Idle,
            Some(deadline) if now < deadline => AutosaveOutcome::Waiting,
            Some(_) => {
                self.deadline = None;
                self.write(store, current)
            }
        }
    }

    /// Final synchronous write on shutdown. Failure is logged and ignored.
    pub fn flush_on_teardown(
        &mut self,
        store: &dyn KeyValueStore,
        current: &Document,
    ) -> AutosaveOutcome {
        self.deadline = None;
        self.write(store, current)
    }

    fn write(&self, store: &dyn KeyValueStore, current: &Document) -> AutosaveOutcome {
        match save(store, &self.key, current) {
            Ok(()) => {
                debug!(key = %self.key, "document auto-saved");
                AutosaveOutcome::Saved
            }
            Err(err) => {
                warn!(key = %self.key, %err, "failed to auto-save document");
                AutosaveOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockDraft;
    use crate::store::DocumentStore;
    use tempfile::tempdir;

    #[test]
    fn test_directory_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::open(dir.path().join("state")).unwrap();
        assert_eq!(store.get("current-document").unwrap(), None);
        store.set("current-document", "{}").unwrap();
        assert_eq!(store.get("current-document").unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("state").join("current-document.json").exists());
    }

    #[test]
    fn test_directory_store_rejects_path_keys() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(8);
        store.set("k", "1234").unwrap();
        assert!(matches!(
            store.set("k", "123456789"),
            Err(StoreError::QuotaExceeded { .. })
        ));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_restore_missing_and_corrupt() {
        let config = EditorConfig::default();
        let store = MemoryStore::new();
        assert!(restore(&store, &config).is_pristine());

        store.set(&config.storage_key, "{\"id\": \"x\", \"title\"").unwrap();
        let doc = restore(&store, &config);
        assert!(doc.is_pristine());
        assert_ne!(doc.id, "x");
    }

    #[test]
    fn test_save_then_restore() {
        let config = EditorConfig::default();
        let store = MemoryStore::new();
        let mut editor = DocumentStore::default();
        editor.add_block(BlockDraft::paragraph("kept"));
        save(&store, &config.storage_key, editor.document()).unwrap();
        assert_eq!(restore(&store, &config), *editor.document());
    }

    #[test]
    fn test_autosave_debounces_to_latest() {
        let config = EditorConfig::default();
        let store = MemoryStore::new();
        let mut saver = Autosaver::new(&config);
        let mut editor = DocumentStore::default();
        let start = Instant::now();

        assert_eq!(saver.poll(start, &store, editor.document()), AutosaveOutcome::Idle);

        editor.replace_title("first");
        saver.touch(start);
        editor.replace_title("second");
        saver.touch(start + Duration::from_millis(600));

        let early = start + Duration::from_millis(1200);
        assert_eq!(saver.poll(early, &store, editor.document()), AutosaveOutcome::Waiting);
        assert_eq!(store.get(&config.storage_key).unwrap(), None);

        editor.replace_title("third");
        let due = start + Duration::from_millis(1600);
        assert_eq!(saver.poll(due, &store, editor.document()), AutosaveOutcome::Saved);
        assert!(!saver.is_pending());
        assert_eq!(restore(&store, &config).title, "third");

        assert_eq!(saver.poll(due, &store, editor.document()), AutosaveOutcome::Idle);
    }

    #[test]
    fn test_autosave_failure_is_swallowed() {
        let config = EditorConfig::default();
        let store = MemoryStore::with_quota(10);
        let mut saver = Autosaver::new(&config);
        let editor = DocumentStore::default();
        let now = Instant::now();
        saver.touch(now);
        assert_eq!(
            saver.poll(now + config.autosave_delay, &store, editor.document()),
            AutosaveOutcome::Failed
        );
        assert!(!saver.is_pending());
        assert_eq!(
            saver.flush_on_teardown(&store, editor.document()),
            AutosaveOutcome::Failed
        );
    }
}
