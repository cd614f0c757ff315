//! The on-disk vault and the alias index built from it.

use alias_index::{AliasIndex, NoteIdentity};
use obsidian_fs::{parse_frontmatter, FrontmatterError, IdentityFacts};
use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::watcher::{FileEvent, FileEventKind};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

/// Vault-relative, `/`-separated path of a markdown note under `vault_path`.
///
/// None for paths outside the vault, non-markdown files, and anything inside
/// a hidden entry (`.obsidian`, `.trash`, dotfiles).
pub fn relative_note_path(vault_path: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(vault_path).ok()?;

    let mut segments = Vec::new();
    for component in relative.components() {
        let Component::Normal(segment) = component else {
            return None;
        };
        let segment = segment.to_str()?;
        if segment.starts_with('.') {
            return None;
        }
        segments.push(segment);
    }

    let joined = segments.join("/");
    obsidian_fs::is_markdown_path(&joined).then_some(joined)
}

/// Title and aliases of a note's raw content.
pub fn identity_from_content(raw: &str) -> Result<NoteIdentity, FrontmatterError> {
    let parsed = parse_frontmatter(raw)?;
    let facts = IdentityFacts::from_frontmatter(parsed.frontmatter.as_ref());
    Ok(NoteIdentity::new(facts.title, facts.aliases))
}

/// Every folder and markdown note under `root`, hidden entries skipped.
struct Listing {
    notes: Vec<String>,
    folders: Vec<String>,
}

async fn list_vault(root: &Path) -> io::Result<Listing> {
    let mut listing = Listing {
        notes: Vec::new(),
        folders: vec!["/".to_string()],
    };
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_name = entry.file_name();
            if file_name.to_string_lossy().starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                if let Some(folder) = relative_folder(root, &path) {
                    listing.folders.push(folder);
                }
                pending.push(path);
            } else if file_type.is_file() {
                if let Some(note) = relative_note_path(root, &path) {
                    listing.notes.push(note);
                }
            }
        }
    }

    listing.notes.sort();
    listing.folders.sort();
    Ok(listing)
}

fn relative_folder(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Option<Vec<&str>> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect();
    Some(segments?.join("/"))
}

/// A vault on disk together with its alias index.
pub struct Vault {
    root: PathBuf,
    index: AliasIndex,
    folders: BTreeSet<String>,
}

impl Vault {
    /// Scan the vault and index every note's identity.
    ///
    /// Notes that cannot be read are skipped; notes with broken frontmatter
    /// are indexed without title or aliases. Both are logged.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        info!("Scanning vault at {}", root.display());

        let listing = list_vault(&root).await?;
        info!("Found {} markdown notes", listing.notes.len());

        let mut vault = Self {
            root,
            index: AliasIndex::new(),
            folders: listing.folders.into_iter().collect(),
        };
        for note in &listing.notes {
            vault.refresh_note(note).await;
        }

        info!("Indexed {} notes", vault.index.len());
        Ok(vault)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &AliasIndex {
        &self.index
    }

    /// Folder paths relative to the vault root; the root itself is `/`.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(String::as_str)
    }

    pub fn full_path(&self, note: &str) -> PathBuf {
        self.root.join(note)
    }

    /// Read a note's content.
    pub async fn read_note(&self, note: &str) -> io::Result<String> {
        fs::read_to_string(self.full_path(note)).await
    }

    async fn load_identity(&self, note: &str) -> Result<NoteIdentity, ScanError> {
        let raw = self.read_note(note).await?;
        Ok(identity_from_content(&raw)?)
    }

    /// Re-read one note and update its index entry.
    pub async fn refresh_note(&mut self, note: &str) {
        match self.load_identity(note).await {
            Ok(identity) => {
                self.index.update(note, identity);
                self.track_folders(note);
            }
            Err(ScanError::Frontmatter(e)) => {
                warn!("Ignoring frontmatter of {}: {}", note, e);
                self.index.update(note, NoteIdentity::default());
                self.track_folders(note);
            }
            Err(ScanError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} vanished before it could be read", note);
                self.index.remove(note);
                self.prune_folders(note).await;
            }
            Err(ScanError::Io(e)) => {
                warn!("Failed to read {}: {}", note, e);
            }
        }
    }

    /// Apply a watcher event to the index.
    pub async fn apply(&mut self, event: &FileEvent) {
        match event.kind {
            FileEventKind::Modified => self.refresh_note(&event.path).await,
            FileEventKind::Deleted => {
                if self.index.remove(&event.path) {
                    debug!("Note deleted: {}", event.path);
                }
                self.prune_folders(&event.path).await;
            }
        }
    }

    /// A note moved within the vault.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        let renamed = self.index.rename(from, to);
        if renamed {
            self.track_folders(to);
        }
        renamed
    }

    fn track_folders(&mut self, note: &str) {
        let mut folder = obsidian_fs::parent_folder(note);
        while folder != "/" && self.folders.insert(folder.to_string()) {
            folder = obsidian_fs::parent_folder(folder);
        }
    }

    /// Drop the note's folders that no longer exist on disk, innermost first,
    /// together with everything below them.
    async fn prune_folders(&mut self, note: &str) {
        let mut folder = obsidian_fs::parent_folder(note).to_string();
        while folder != "/" {
            match fs::try_exists(self.root.join(&folder)).await {
                Ok(false) => {
                    let prefix = format!("{}/", folder);
                    self.folders.retain(|f| *f != folder && !f.starts_with(&prefix));
                    debug!("Folder removed: {}", folder);
                }
                Ok(true) => break,
                Err(e) => {
                    warn!("Failed to check folder {}: {}", folder, e);
                    break;
                }
            }
            folder = obsidian_fs::parent_folder(&folder).to_string();
        }
    }
}
