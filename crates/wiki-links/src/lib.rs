//! Linktext parsing for Obsidian-style wiki links
//!
//! A linktext is what sits between `[[` and `]]`:
//! - Paths: `[[folder/Note]]`
//! - Headings: `[[Note#Heading]]`
//! - Block references: `[[Note#^block-id]]`
//! - Display text: `[[Note|shown instead]]`
//! - Embeds: `![[Note]]`
//!
//! Link resolution only cares about the link path (the part before any
//! `#` or `|`); the rest is kept for display and navigation.

use serde::{Deserialize, Serialize};

/// Fragment after the link path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Subpath {
    /// `#Heading Section`
    Heading(String),
    /// `#^block-id`
    Block(String),
}

/// A linktext split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Linktext {
    /// The link path with surrounding whitespace trimmed: "folder/Note"
    pub path: String,
    /// Heading or block fragment, if present
    pub subpath: Option<Subpath>,
    /// Text after `|`, if present
    pub display: Option<String>,
}

impl Linktext {
    /// Last path segment: "Note" for "folder/Note"
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Folder part of the path, None for a bare name
    pub fn parent(&self) -> Option<&str> {
        self.path.rfind('/').map(|pos| &self.path[..pos])
    }

    /// Display text if present, otherwise the link path
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.path)
    }
}

/// The link path of a linktext: everything before the first `#` or `|`,
/// trimmed.
///
/// ```
/// assert_eq!(wiki_links::linkpath("folder/Note#Heading|shown"), "folder/Note");
/// assert_eq!(wiki_links::linkpath("Note"), "Note");
/// ```
pub fn linkpath(linktext: &str) -> &str {
    let end = linktext.find(['#', '|']).unwrap_or(linktext.len());
    linktext[..end].trim()
}

/// Split a linktext into path, subpath and display text.
pub fn parse_linktext(linktext: &str) -> Linktext {
    let (target, display) = match linktext.split_once('|') {
        Some((target, display)) => (target, Some(display.to_string())),
        None => (linktext, None),
    };

    let (path, subpath) = match target.split_once('#') {
        Some((path, fragment)) => {
            let subpath = match fragment.strip_prefix('^') {
                Some(block) => Subpath::Block(block.to_string()),
                None => Subpath::Heading(fragment.to_string()),
            };
            (path, Some(subpath))
        }
        None => (target, None),
    };

    Linktext {
        path: path.trim().to_string(),
        subpath,
        display,
    }
}

/// Byte range of a link in the content it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A wiki link found in markdown content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiLink {
    /// The raw text between the brackets: "Note#Heading|shown"
    pub linktext: String,
    /// Parsed parts of `linktext`
    pub target: Linktext,
    /// Whether this is an embed (`![[...]]`)
    pub is_embed: bool,
    /// Location of the whole link, brackets and `!` included
    pub span: Span,
}

/// Parse all wiki links from markdown content, in document order.
pub fn parse_wiki_links(content: &str) -> Vec<WikiLink> {
    let mut links = Vec::new();
    let mut cursor = 0;

    while let Some(found) = content[cursor..].find("[[") {
        let open = cursor + found;
        let inner_start = open + 2;

        let Some(close) = content[inner_start..].find("]]") else {
            break;
        };
        let inner_end = inner_start + close;
        let inner = &content[inner_start..inner_end];

        // A nested opener means this one was stray text; resume at the inner one.
        if let Some(nested) = inner.find("[[") {
            cursor = inner_start + nested;
            continue;
        }

        let is_embed = open > 0 && content.as_bytes()[open - 1] == b'!';
        let start = if is_embed { open - 1 } else { open };
        let end = inner_end + 2;

        if !inner.trim().is_empty() {
            links.push(WikiLink {
                linktext: inner.to_string(),
                target: parse_linktext(inner),
                is_embed,
                span: Span { start, end },
            });
        }
        cursor = end;
    }

    links
}
