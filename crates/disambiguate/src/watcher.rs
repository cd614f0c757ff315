//! Debounced vault watcher feeding note changes to the session loop.

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::vault::relative_note_path;

/// A note that changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Path relative to vault root, `/`-separated
    pub path: String,
    pub kind: FileEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    /// Note was created or its content changed
    Modified,
    /// Note no longer exists (deleted or renamed away)
    Deleted,
}

/// Last seen mtime per note, to drop events where nothing changed
type MtimeCache = Arc<Mutex<HashMap<String, SystemTime>>>;

/// Watches a vault's markdown notes.
pub struct FileWatcher {
    vault_path: PathBuf,
    /// Debouncer handle (must keep alive)
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    event_rx: mpsc::UnboundedReceiver<FileEvent>,
}

impl FileWatcher {
    /// Start watching `vault_path` recursively with a 200ms debounce.
    pub fn new(vault_path: PathBuf) -> Result<Self> {
        // FSEvents on macOS reports canonical paths (/private/var/...).
        let vault_path = vault_path.canonicalize().unwrap_or(vault_path);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let root = vault_path.clone();
        let mtime_cache: MtimeCache = Arc::new(Mutex::new(HashMap::new()));

        let mut debouncer = new_debouncer(
            Duration::from_millis(200),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        if let Some(file_event) = note_event(&event.path, &root, &mtime_cache) {
                            if event_tx.send(file_event).is_err() {
                                // Receiver dropped
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("File watcher error: {}", e);
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(&vault_path, RecursiveMode::Recursive)?;

        Ok(Self {
            vault_path,
            _debouncer: debouncer,
            event_rx,
        })
    }

    /// Get the receiver for file events.
    pub fn event_rx(&mut self) -> &mut mpsc::UnboundedReceiver<FileEvent> {
        &mut self.event_rx
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }
}

/// Turn a raw changed path into a note event, or None if it is not a note
/// or nothing changed.
fn note_event(path: &Path, vault_path: &Path, mtime_cache: &MtimeCache) -> Option<FileEvent> {
    let relative = relative_note_path(vault_path, path)?;

    let kind = if path.exists() {
        FileEventKind::Modified
    } else {
        FileEventKind::Deleted
    };

    if let Ok(mut cache) = mtime_cache.lock() {
        match kind {
            FileEventKind::Modified => {
                if let Some(mtime) = std::fs::metadata(path).and_then(|m| m.modified()).ok() {
                    if cache.get(&relative) == Some(&mtime) {
                        return None;
                    }
                    cache.insert(relative.clone(), mtime);
                }
            }
            FileEventKind::Deleted => {
                cache.remove(&relative);
            }
        }
    }

    debug!("File event: {:?} - {}", kind, relative);

    Some(FileEvent {
        path: relative,
        kind,
    })
}
