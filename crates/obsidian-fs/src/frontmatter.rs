//! YAML frontmatter parsing for Obsidian notes
//!
//! The frontmatter block sits at the very start of a markdown file:
//! ```markdown
//! ---
//! title: My Note
//! aliases: [Note, Mine]
//! ---
//!
//! Note content here...
//! ```

use serde_yaml::Value;
use std::collections::HashMap;

/// Top-level frontmatter keys mapped to their YAML values.
pub type Frontmatter = HashMap<String, Value>;

/// A note with its frontmatter separated from the body.
///
/// `content` borrows from `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNote<'a> {
    /// Frontmatter keys, None when there is no block or it has no keys
    pub frontmatter: Option<Frontmatter>,
    /// Body after the closing delimiter
    pub content: &'a str,
    /// The whole file
    pub raw: &'a str,
}

#[derive(Debug)]
pub enum FrontmatterError {
    /// The block between the delimiters is not valid YAML
    InvalidYaml(serde_yaml::Error),
    /// The block is valid YAML but not a mapping (e.g. a bare list)
    NotAMapping,
}

impl std::fmt::Display for FrontmatterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrontmatterError::InvalidYaml(e) => write!(f, "Invalid frontmatter YAML: {}", e),
            FrontmatterError::NotAMapping => write!(f, "Frontmatter is not a key/value mapping"),
        }
    }
}

impl std::error::Error for FrontmatterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrontmatterError::InvalidYaml(e) => Some(e),
            FrontmatterError::NotAMapping => None,
        }
    }
}

fn strip_line_break(s: &str) -> Option<&str> {
    s.strip_prefix('\n').or_else(|| s.strip_prefix("\r\n"))
}

/// Split a note into its frontmatter YAML and body without parsing the YAML.
///
/// Returns `(None, raw)` unless the file opens with a `---` line and a later
/// line is exactly `---`.
pub fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let Some(block) = raw.strip_prefix("---").and_then(strip_line_break) else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        if bare == "---" {
            let yaml = &block[..offset];
            let after = &block[offset + 3..];
            let content = strip_line_break(after).unwrap_or(after);
            return (Some(yaml), content);
        }
        offset += line.len();
    }

    (None, raw)
}

/// Parse a note's frontmatter block.
///
/// Notes without a block, or with an empty one, parse to `frontmatter: None`.
/// Non-string keys are skipped.
pub fn parse_frontmatter(raw: &str) -> Result<ParsedNote<'_>, FrontmatterError> {
    let (yaml, content) = split_frontmatter(raw);

    let frontmatter = match yaml {
        None => None,
        Some(yaml) if yaml.trim().is_empty() => None,
        Some(yaml) => {
            let value: Value = serde_yaml::from_str(yaml).map_err(FrontmatterError::InvalidYaml)?;
            match value {
                Value::Null => None,
                Value::Mapping(map) => {
                    let keys: Frontmatter = map
                        .into_iter()
                        .filter_map(|(k, v)| match k {
                            Value::String(key) => Some((key, v)),
                            _ => None,
                        })
                        .collect();
                    (!keys.is_empty()).then_some(keys)
                }
                _ => return Err(FrontmatterError::NotAMapping),
            }
        }
    };

    Ok(ParsedNote {
        frontmatter,
        content,
        raw,
    })
}
