//! Exact link resolution against the indexed notes.
//!
//! Follows Obsidian's rules for `getFirstLinkpathDest`:
//! 1. A link path naming a note exactly (with or without `.md`) wins, looked
//!    up relative to the source note's folder first, then the vault root.
//! 2. Otherwise any note whose path ends with the link path matches, file
//!    names compared case-insensitively.
//! 3. Among several matches the one closest to the source note wins.

use alias_index::file_distance;
use alias_index::{AliasIndex, LinkResolver};

#[derive(Debug, Default, Clone, Copy)]
pub struct VaultResolver;

impl VaultResolver {
    pub fn new() -> Self {
        Self
    }
}

fn exact_candidates(linkpath: &str, source_path: &str) -> Vec<String> {
    let folder = obsidian_fs::parent_folder(source_path);
    let relative = obsidian_fs::normalize_path(&format!("{}/{}", folder, linkpath));
    let absolute = obsidian_fs::normalize_path(linkpath);

    let mut candidates = Vec::with_capacity(4);
    for path in [relative, absolute] {
        let with_extension = obsidian_fs::ensure_markdown_extension(&path);
        if with_extension != path {
            candidates.push(path);
        }
        candidates.push(with_extension);
    }
    candidates
}

/// Whether `note` (a vault path) ends with `linkpath`, ignoring case and the
/// `.md` extension, on a path segment boundary.
fn ends_with_linkpath(note: &str, linkpath: &str) -> bool {
    let note = obsidian_fs::strip_markdown_extension(note).to_lowercase();
    let linkpath = obsidian_fs::strip_markdown_extension(linkpath).to_lowercase();

    match note.strip_suffix(&linkpath) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('/'),
        None => false,
    }
}

impl LinkResolver for VaultResolver {
    fn first_linkpath_dest(
        &self,
        index: &AliasIndex,
        linkpath: &str,
        source_path: &str,
    ) -> Option<String> {
        let linkpath = linkpath.trim().trim_start_matches('/');
        if linkpath.is_empty() {
            // `[[#Heading]]` points into the source note itself.
            return index.contains(source_path).then(|| source_path.to_string());
        }

        if let Some(exact) = exact_candidates(linkpath, source_path)
            .into_iter()
            .find(|candidate| index.contains(candidate))
        {
            return Some(exact);
        }

        index
            .paths()
            .filter(|note| ends_with_linkpath(note, linkpath))
            .min_by(|a, b| file_distance::compare(source_path, a, b))
            .map(str::to_string)
    }
}
