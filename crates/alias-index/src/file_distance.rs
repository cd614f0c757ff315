//! Path-topology comparator used to break ranking ties.
//!
//! Candidates closer to the note a link was typed in sort first: notes in the
//! same folder, then notes below it, then notes above it, then everything
//! else. Within a kind, fewer folder hops win, and the candidate path itself
//! settles whatever is left so the order is total.

use serde::Serialize;
use std::cmp::Ordering;

/// How a candidate note's folder relates to the source note's folder.
///
/// Declaration order is ranking order: closer relationships compare lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    Sibling,
    Child,
    Parent,
    SharedAncestor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FileRelation {
    pub kind: RelationKind,
    pub distance: usize,
}

impl FileRelation {
    pub const SIBLING: FileRelation = FileRelation {
        kind: RelationKind::Sibling,
        distance: 0,
    };
}

/// Parent folder of a note path in `/folder/` form. Root notes map to `/`.
fn parent_dir(path: &str) -> String {
    let parent = match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    };
    ensure_leading_and_trailing_slash(parent)
}

fn ensure_leading_and_trailing_slash(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn segment_count(remainder: &str) -> usize {
    remainder.split('/').filter(|s| !s.is_empty()).count()
}

/// Classify `candidate_path` relative to `source_path`.
pub fn classify(source_path: &str, candidate_path: &str) -> FileRelation {
    let source_dir = parent_dir(source_path);
    let candidate_dir = parent_dir(candidate_path);

    if source_dir == candidate_dir {
        return FileRelation::SIBLING;
    }

    if let Some(remainder) = candidate_dir.strip_prefix(source_dir.as_str()) {
        return FileRelation {
            kind: RelationKind::Child,
            distance: segment_count(remainder),
        };
    }

    if let Some(remainder) = source_dir.strip_prefix(candidate_dir.as_str()) {
        return FileRelation {
            kind: RelationKind::Parent,
            distance: segment_count(remainder),
        };
    }

    // Neither folder contains the other, so they diverge strictly inside both.
    let source = source_dir.as_bytes();
    let candidate = candidate_dir.as_bytes();
    let split = source
        .iter()
        .zip(candidate.iter())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| source.len().min(candidate.len()));
    let end = (split + 1).min(source.len());
    let distance = source[..end].iter().filter(|&&b| b == b'/').count();

    FileRelation {
        kind: RelationKind::SharedAncestor,
        distance,
    }
}

/// Order two candidates by closeness to `source_path`.
///
/// Never returns `Equal` for distinct candidate paths.
pub fn compare(source_path: &str, a: &str, b: &str) -> Ordering {
    classify(source_path, a)
        .cmp(&classify(source_path, b))
        .then_with(|| a.cmp(b))
}
