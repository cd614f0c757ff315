//! View models for the disambiguation page and the unresolved-link dialog.
//!
//! Nothing here renders; a UI reads these and sends the user's choice back.

use serde::{Deserialize, Serialize};

use crate::index::{AliasIndex, SEARCH_THRESHOLD};
use crate::ranking::rank;

/// Saved state of a disambiguation page.
///
/// Only the request is persisted. Candidates are re-ranked each time the page
/// renders so they reflect the current vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisambiguationState {
    pub linktext: String,
    pub source_path: String,
    #[serde(default)]
    pub new_leaf: bool,
}

/// One candidate row on the disambiguation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisambiguationEntry {
    pub path: String,
    pub title: String,
    /// Link to open this candidate: its path without `.md`
    pub linktext: String,
}

impl DisambiguationState {
    pub fn new(linktext: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            linktext: linktext.into(),
            source_path: source_path.into(),
            new_leaf: false,
        }
    }

    /// Page title: `"<linktext> (Disambiguation)"`
    pub fn display_title(&self) -> String {
        format!("{} (Disambiguation)", self.linktext)
    }

    /// Current candidates, best first. Empty when the source note is gone or
    /// the link has no path.
    pub fn entries(&self, index: &AliasIndex) -> Vec<DisambiguationEntry> {
        if !index.contains(&self.source_path) {
            tracing::debug!(
                "Disambiguation source {} no longer indexed",
                self.source_path
            );
            return Vec::new();
        }

        let linkpath = wiki_links::linkpath(&self.linktext);
        if linkpath.is_empty() {
            return Vec::new();
        }

        index
            .search_linklike(linkpath, &self.source_path)
            .into_iter()
            .map(|path| DisambiguationEntry {
                path: path.to_string(),
                title: index.display_title(path).to_string(),
                linktext: obsidian_fs::strip_markdown_extension(path).to_string(),
            })
            .collect()
    }
}

/// A row in the "link to an existing note" picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSuggestion {
    pub path: String,
    pub title: String,
}

/// Notes matching `query` for the picker, best first.
pub fn suggest_notes(index: &AliasIndex, query: &str, source_path: &str) -> Vec<NoteSuggestion> {
    index
        .search(query, source_path)
        .into_iter()
        .map(|path| NoteSuggestion {
            path: path.to_string(),
            title: index.display_title(path).to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FolderKind {
    Existing,
    New,
}

/// A destination folder for a new note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFolder {
    pub kind: FolderKind,
    pub path: String,
}

impl SuggestedFolder {
    pub fn existing(path: impl Into<String>) -> Self {
        Self {
            kind: FolderKind::Existing,
            path: path.into(),
        }
    }

    /// Classify typed folder input against the vault's folders.
    pub fn from_input<'a>(
        input: &str,
        existing_folders: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let path = obsidian_fs::normalize_path(input);
        let kind = if existing_folders.into_iter().any(|folder| folder == path) {
            FolderKind::Existing
        } else {
            FolderKind::New
        };
        Self { kind, path }
    }
}

/// Folder suggestions for typed input, best match first.
///
/// Ends with a `New` entry for the typed path unless it names an existing
/// folder exactly.
pub fn suggest_folders<'a>(
    query: &str,
    existing_folders: impl IntoIterator<Item = &'a str>,
) -> Vec<SuggestedFolder> {
    // The vault root normalises to "/"; an empty query lists every folder.
    let query = match obsidian_fs::normalize_path(query.trim()) {
        root if root == "/" => String::new(),
        query => query,
    };

    let mut scored: Vec<_> = existing_folders
        .into_iter()
        .map(|folder| (rank(folder, &query), folder))
        .filter(|(score, _)| score.passes(SEARCH_THRESHOLD))
        .collect();
    scored.sort_by(|(score_a, a), (score_b, b)| score_b.cmp(score_a).then_with(|| a.cmp(b)));

    let exact = scored.iter().any(|(_, folder)| *folder == query);
    let mut suggestions: Vec<_> = scored
        .into_iter()
        .map(|(_, folder)| SuggestedFolder::existing(folder))
        .collect();

    if !exact && !query.is_empty() {
        suggestions.push(SuggestedFolder {
            kind: FolderKind::New,
            path: query,
        });
    }
    suggestions
}

/// The "create a new note" half of the unresolved-link dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNoteDraft {
    pub folder: SuggestedFolder,
    pub filename: String,
}

impl NewNoteDraft {
    /// Initial draft: the source note's folder and the linktext as filename.
    pub fn for_unresolved(linktext: &str, source_path: &str) -> Self {
        Self {
            folder: SuggestedFolder::existing(obsidian_fs::parent_folder(source_path)),
            filename: linktext.to_string(),
        }
    }

    /// Path the note would be created at. None while the filename is empty.
    pub fn target_path(&self) -> Option<String> {
        if self.filename.is_empty() {
            return None;
        }
        let joined = format!("{}/{}", self.folder.path, self.filename);
        Some(obsidian_fs::ensure_extension(
            &obsidian_fs::normalize_path(&joined),
            obsidian_fs::MARKDOWN_EXTENSION,
        ))
    }

    /// A note can go into a new folder, or into an existing one if the path
    /// is free.
    pub fn is_creatable(&self, index: &AliasIndex) -> bool {
        if self.folder.kind == FolderKind::New {
            return true;
        }
        self.target_path()
            .is_some_and(|target| !index.contains(&target))
    }
}
