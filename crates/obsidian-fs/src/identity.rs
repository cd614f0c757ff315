//! Title and alias extraction from frontmatter.
//!
//! Mirrors how Obsidian reads these keys:
//! - `title` is a single scalar entry
//! - `aliases` (or `alias`, any case) is either a list or a comma-separated
//!   string; entries are trimmed and empty ones dropped

use serde_yaml::Value;

use crate::frontmatter::Frontmatter;

/// Identity facts read from one note's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityFacts {
    pub title: Option<String>,
    pub aliases: Vec<String>,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// The `title` entry, if it is a non-blank scalar.
pub fn frontmatter_title(frontmatter: &Frontmatter) -> Option<String> {
    frontmatter
        .get("title")
        .and_then(scalar_to_string)
        .filter(|title| !title.trim().is_empty())
}

/// Every alias listed under `aliases` / `alias`, in file order.
pub fn frontmatter_aliases(frontmatter: &Frontmatter) -> Vec<String> {
    let mut keys: Vec<&String> = frontmatter
        .keys()
        .filter(|key| {
            key.eq_ignore_ascii_case("aliases") || key.eq_ignore_ascii_case("alias")
        })
        .collect();
    // HashMap order is arbitrary; keep the result stable.
    keys.sort();

    let mut aliases = Vec::new();
    for key in keys {
        match &frontmatter[key] {
            Value::Sequence(items) => {
                aliases.extend(items.iter().filter_map(scalar_to_string));
            }
            Value::String(s) => aliases.extend(s.split(',').map(str::to_string)),
            other => aliases.extend(scalar_to_string(other)),
        }
    }

    aliases
        .into_iter()
        .map(|alias| alias.trim().to_string())
        .filter(|alias| !alias.is_empty())
        .collect()
}

impl IdentityFacts {
    pub fn from_frontmatter(frontmatter: Option<&Frontmatter>) -> Self {
        match frontmatter {
            Some(fm) => Self {
                title: frontmatter_title(fm),
                aliases: frontmatter_aliases(fm),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse_frontmatter;

    fn facts(raw: &str) -> IdentityFacts {
        let parsed = parse_frontmatter(raw).unwrap();
        IdentityFacts::from_frontmatter(parsed.frontmatter.as_ref())
    }

    #[test]
    fn reads_title_and_alias_list() {
        let facts = facts("---\ntitle: Meeting Notes\naliases:\n  - Standup\n  - Sync\n---\n");
        assert_eq!(facts.title.as_deref(), Some("Meeting Notes"));
        assert_eq!(facts.aliases, vec!["Standup", "Sync"]);
    }

    #[test]
    fn splits_comma_separated_alias_string() {
        let facts = facts("---\nalias: one, two ,, three\n---\n");
        assert_eq!(facts.aliases, vec!["one", "two", "three"]);
    }

    #[test]
    fn alias_keys_are_case_insensitive() {
        let facts = facts("---\nAliases: [Upper]\n---\n");
        assert_eq!(facts.aliases, vec!["Upper"]);
    }

    #[test]
    fn numeric_title_and_aliases_become_strings() {
        let facts = facts("---\ntitle: 2024\naliases: [42, true]\n---\n");
        assert_eq!(facts.title.as_deref(), Some("2024"));
        assert_eq!(facts.aliases, vec!["42", "true"]);
    }

    #[test]
    fn blank_and_structured_values_are_ignored() {
        let facts = facts("---\ntitle: '  '\naliases:\n  - nested: map\n  - ''\n---\n");
        assert_eq!(facts.title, None);
        assert!(facts.aliases.is_empty());
    }

    #[test]
    fn missing_frontmatter_yields_empty_facts() {
        assert_eq!(facts("# Just a heading"), IdentityFacts::default());
    }
}
