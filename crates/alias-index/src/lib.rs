//! alias-index: Alias-aware link disambiguation for Obsidian-style vaults.
//!
//! This crate provides:
//! - An incremental index from notes to their titles and aliases, and back
//! - Ranking of candidate notes for a typed linktext, tie-broken by folder
//!   distance from the note the link was typed in
//! - The decision of what following a link should do (navigate, disambiguate
//!   or offer to create the note), and a pipeline to plug it into a host
//! - View models for the disambiguation page and the unresolved-link dialog
//!
//! The crate does no I/O. Hosts feed it identity changes and query it.

pub mod decider;
pub mod error;
pub mod file_distance;
pub mod identity;
pub mod index;
pub mod multimap;
pub mod pipeline;
pub mod ranking;
pub mod surfaces;

pub use decider::{decide, Decision};
pub use error::{ResolveError, Result};
pub use file_distance::{FileRelation, RelationKind};
pub use identity::NoteIdentity;
pub use index::{AliasIndex, Inconsistency, NoteId, LINKLIKE_THRESHOLD, SEARCH_THRESHOLD};
pub use multimap::SetMultimap;
pub use pipeline::{
    DisambiguationStage, Flow, LinkResolver, NavigationOutcome, NavigationPipeline,
    NavigationRequest, NavigationStage,
};
pub use ranking::{Ranking, Score};
pub use surfaces::{
    suggest_folders, suggest_notes, DisambiguationEntry, DisambiguationState, FolderKind,
    NewNoteDraft, NoteSuggestion, SuggestedFolder,
};
