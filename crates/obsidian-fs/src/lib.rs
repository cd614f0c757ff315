//! Path helpers and frontmatter parsing for Obsidian notes
//!
//! Pure functions with no I/O: vault-relative path normalisation, note
//! naming, and reading a note's title/aliases out of its YAML frontmatter.

mod frontmatter;
mod identity;

pub use frontmatter::{
    parse_frontmatter, split_frontmatter, Frontmatter, FrontmatterError, ParsedNote,
};
pub use identity::{frontmatter_aliases, frontmatter_title, IdentityFacts};

/// Markdown note extension, without the dot
pub const MARKDOWN_EXTENSION: &str = "md";

/// Normalise a vault path the way Obsidian does.
///
/// Collapses runs of `/` or `\` into a single `/`, strips leading and
/// trailing separators, and turns non-breaking spaces into plain spaces.
/// The vault root is `/`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut last_was_separator = false;

    for c in path.chars() {
        match c {
            '/' | '\\' => {
                if !last_was_separator {
                    normalized.push('/');
                }
                last_was_separator = true;
            }
            '\u{00A0}' | '\u{202F}' => {
                normalized.push(' ');
                last_was_separator = false;
            }
            c => {
                normalized.push(c);
                last_was_separator = false;
            }
        }
    }

    let trimmed = normalized.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Append `.{extension}` unless the path already ends with it (any case).
pub fn ensure_extension(path: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension.to_lowercase());
    if path.to_lowercase().ends_with(&suffix) {
        path.to_string()
    } else {
        format!("{}.{}", path, extension)
    }
}

/// Ensure .md extension on note paths
pub fn ensure_markdown_extension(note_path: &str) -> String {
    ensure_extension(note_path, MARKDOWN_EXTENSION)
}

/// Whether the path names a markdown note (extension compared case-insensitively).
pub fn is_markdown_path(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

/// Folder containing the note, `/` for notes at the vault root.
pub fn parent_folder(path: &str) -> &str {
    match path.trim_start_matches('/').rfind('/') {
        Some(pos) => &path.trim_start_matches('/')[..pos],
        None => "/",
    }
}

/// Path without its markdown extension, used as the shortest link form.
pub fn strip_markdown_extension(path: &str) -> &str {
    if is_markdown_path(path) {
        &path[..path.len() - MARKDOWN_EXTENSION.len() - 1]
    } else {
        path
    }
}

/// Turn user input into a vault note path.
///
/// Accepts `Note`, `folder/Note.md`, `[[folder/Note]]`, or `/folder/Note`.
pub fn note_path_from_input(input: &str) -> String {
    let mut trimmed = input.trim();
    if let Some(inner) = trimmed.strip_prefix("[[").and_then(|s| s.strip_suffix("]]")) {
        trimmed = inner;
    }
    ensure_markdown_extension(&normalize_path(trimmed))
}
