use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::path::Path;

use crate::file_distance;
use crate::identity::NoteIdentity;
use crate::multimap::SetMultimap;
use crate::ranking::{best_rank, Ranking, Score};

/// Minimum ranking for free-text search: anything that matches at all.
pub const SEARCH_THRESHOLD: Ranking = Ranking::Matches;

/// Minimum ranking for linktext matching. Weaker matches are link noise.
pub const LINKLIKE_THRESHOLD: Ranking = Ranking::WordStartsWith;

/// Arena handle for an indexed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(u32);

/// Path storage behind `NoteId` handles.
///
/// Renaming a note re-points its slot, so index tables keyed by `NoteId` are
/// untouched by renames.
#[derive(Debug, Default)]
struct NoteArena {
    slots: Vec<Option<String>>,
    by_path: HashMap<String, NoteId>,
    free: Vec<NoteId>,
}

impl NoteArena {
    fn id(&self, path: &str) -> Option<NoteId> {
        self.by_path.get(path).copied()
    }

    fn path(&self, id: NoteId) -> Option<&str> {
        self.slots.get(id.0 as usize)?.as_deref()
    }

    fn intern(&mut self, path: &str) -> NoteId {
        if let Some(id) = self.id(path) {
            return id;
        }
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.0 as usize] = Some(path.to_string());
                id
            }
            None => {
                let id = NoteId(self.slots.len() as u32);
                self.slots.push(Some(path.to_string()));
                id
            }
        };
        self.by_path.insert(path.to_string(), id);
        id
    }

    fn release(&mut self, id: NoteId) {
        if let Some(path) = self.slots.get_mut(id.0 as usize).and_then(Option::take) {
            self.by_path.remove(&path);
            self.free.push(id);
        }
    }

    fn repoint(&mut self, id: NoteId, new_path: &str) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            if let Some(old) = slot.replace(new_path.to_string()) {
                self.by_path.remove(&old);
            }
            self.by_path.insert(new_path.to_string(), id);
        }
    }
}

/// Which keys a candidate is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKeys {
    PathAndAliases,
    AliasesOnly,
}

/// A violation of the index's bidirectional invariant.
///
/// Only produced by [`AliasIndex::inconsistencies`]; a correct index never
/// has any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// `alias` is listed for the note but the inverse map lacks the note.
    MissingInverse { path: String, alias: String },
    /// The inverse map lists a note under `alias` that does not own it.
    OrphanedInverse { alias: String, path: String },
    /// A table references a handle with no live path.
    DanglingHandle { id: NoteId },
    /// The note has aliases but no title entry, so it is outside the pool.
    UntrackedNote { path: String },
}

/// Maps notes to their titles and aliases and back.
///
/// Tracks three tables over arena handles:
/// - note → title (also the membership record for the candidate pool)
/// - note → aliases
/// - alias → notes, the exact transpose of note → aliases
///
/// Updates are diffed against the note's previous alias set, so their cost is
/// proportional to what changed rather than to the size of the vault.
#[derive(Debug, Default)]
pub struct AliasIndex {
    notes: NoteArena,
    note_to_title: IndexMap<NoteId, Option<String>>,
    note_to_aliases: SetMultimap<NoteId, String>,
    alias_to_notes: SetMultimap<String, NoteId>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a note's identity.
    ///
    /// Only aliases that appeared or vanished since the previous update touch
    /// the inverse map. A note with no title and no aliases is still indexed
    /// and remains searchable by path.
    pub fn update(&mut self, path: &str, identity: NoteIdentity) {
        let id = self.notes.intern(path);
        let aliases = identity.match_keys();

        let mut added = 0usize;
        let mut removed = 0usize;
        let previous = self.note_to_aliases.get(&id);
        for alias in &aliases {
            if previous.is_none_or(|previous| !previous.contains(alias)) {
                self.alias_to_notes.add(alias.clone(), id);
                added += 1;
            }
        }
        if let Some(previous) = previous {
            for alias in previous {
                if !aliases.contains(alias) {
                    self.alias_to_notes.remove(alias, &id);
                    removed += 1;
                }
            }
        }

        self.note_to_aliases.set(id, aliases);
        self.note_to_title.insert(id, identity.title);

        tracing::debug!("Indexed {} (+{} / -{} aliases)", path, added, removed);
    }

    /// Remove a note and every alias entry it owns.
    ///
    /// Returns false if the note was never indexed.
    pub fn remove(&mut self, path: &str) -> bool {
        let Some(id) = self.notes.id(path) else {
            return false;
        };

        if let Some(aliases) = self.note_to_aliases.remove_key(&id) {
            for alias in &aliases {
                self.alias_to_notes.remove(alias, &id);
            }
        }
        self.note_to_title.shift_remove(&id);
        self.notes.release(id);

        tracing::debug!("Removed {} from alias index", path);
        true
    }

    /// Move a note to a new path, keeping its title and aliases.
    ///
    /// A note already indexed at `new_path` is replaced. Returns false if
    /// `old_path` was never indexed.
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> bool {
        let Some(id) = self.notes.id(old_path) else {
            return false;
        };
        if old_path == new_path {
            return true;
        }
        self.remove(new_path);
        self.notes.repoint(id, new_path);

        tracing::debug!("Renamed {} -> {} in alias index", old_path, new_path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.notes
            .id(path)
            .is_some_and(|id| self.note_to_title.contains_key(&id))
    }

    /// Number of indexed notes.
    pub fn len(&self) -> usize {
        self.note_to_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.note_to_title.is_empty()
    }

    /// Indexed note paths in first-indexed order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.note_to_title
            .keys()
            .filter_map(|id| self.notes.path(*id))
    }

    /// The note's explicit title, if it has one.
    pub fn title(&self, path: &str) -> Option<&str> {
        let id = self.notes.id(path)?;
        self.note_to_title.get(&id)?.as_deref()
    }

    /// The note's title, or `fallback` when it has none.
    pub fn get_title<'a>(&'a self, path: &str, fallback: &'a str) -> &'a str {
        self.title(path).unwrap_or(fallback)
    }

    /// The note's title, falling back to its file stem.
    pub fn display_title<'a>(&'a self, path: &'a str) -> &'a str {
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path);
        self.get_title(path, stem)
    }

    /// All match keys (title included) the note currently owns.
    pub fn aliases(&self, path: &str) -> Option<&IndexSet<String>> {
        let id = self.notes.id(path)?;
        self.note_to_aliases.get(&id)
    }

    /// Paths of the notes that own `alias` exactly.
    pub fn notes_for_alias(&self, alias: &str) -> Vec<&str> {
        self.alias_to_notes
            .get(alias)
            .map(|ids| ids.iter().filter_map(|id| self.notes.path(*id)).collect())
            .unwrap_or_default()
    }

    /// Free-text search over paths and aliases, best match first.
    ///
    /// Used by "pick a note" pickers. Every candidate that matches at all is
    /// returned; equally ranked candidates are ordered by closeness to
    /// `source_path`.
    pub fn search(&self, query: &str, source_path: &str) -> Vec<&str> {
        self.ranked(query, source_path, MatchKeys::PathAndAliases, SEARCH_THRESHOLD)
    }

    /// Linktext matching over aliases only, requiring at least a word-prefix
    /// match.
    pub fn search_linklike(&self, linktext: &str, source_path: &str) -> Vec<&str> {
        self.ranked(linktext, source_path, MatchKeys::AliasesOnly, LINKLIKE_THRESHOLD)
    }

    fn ranked(
        &self,
        query: &str,
        source_path: &str,
        keys: MatchKeys,
        threshold: Ranking,
    ) -> Vec<&str> {
        let mut scored: Vec<(Score, &str)> = self
            .note_to_title
            .keys()
            .filter_map(|id| {
                let path = self.notes.path(*id)?;
                if path == source_path {
                    return None;
                }
                let aliases = self
                    .note_to_aliases
                    .get(id)
                    .into_iter()
                    .flatten()
                    .map(String::as_str);
                let score = match keys {
                    MatchKeys::PathAndAliases => {
                        best_rank(std::iter::once(path).chain(aliases), query)
                    }
                    MatchKeys::AliasesOnly => best_rank(aliases, query),
                };
                score.passes(threshold).then_some((score, path))
            })
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .cmp(score_a)
                .then_with(|| file_distance::compare(source_path, a, b))
        });

        tracing::trace!(
            "Ranked {} candidate(s) for {:?} from {}",
            scored.len(),
            query,
            source_path
        );

        scored.into_iter().map(|(_, path)| path).collect()
    }

    /// Every violation of the bidirectional invariant. Empty for a correct index.
    pub fn inconsistencies(&self) -> Vec<Inconsistency> {
        let mut found = Vec::new();
        let path_of = |id: NoteId| self.notes.path(id).map(str::to_string);

        for (id, aliases) in self.note_to_aliases.entries() {
            let Some(path) = path_of(*id) else {
                found.push(Inconsistency::DanglingHandle { id: *id });
                continue;
            };
            if !self.note_to_title.contains_key(id) {
                found.push(Inconsistency::UntrackedNote { path: path.clone() });
            }
            for alias in aliases {
                if !self.alias_to_notes.contains(alias, id) {
                    found.push(Inconsistency::MissingInverse {
                        path: path.clone(),
                        alias: alias.clone(),
                    });
                }
            }
        }

        for (alias, ids) in self.alias_to_notes.entries() {
            for id in ids {
                if !self.note_to_aliases.contains(id, alias) {
                    match path_of(*id) {
                        Some(path) => found.push(Inconsistency::OrphanedInverse {
                            alias: alias.clone(),
                            path,
                        }),
                        None => found.push(Inconsistency::DanglingHandle { id: *id }),
                    }
                }
            }
        }

        for id in self.note_to_title.keys() {
            if self.notes.path(*id).is_none() {
                found.push(Inconsistency::DanglingHandle { id: *id });
            }
        }

        found
    }
}
