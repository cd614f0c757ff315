use indexmap::IndexSet;

/// The display identity of a note, as read from its frontmatter.
///
/// The title is tracked separately for display but also counts as an alias
/// when matching links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteIdentity {
    pub title: Option<String>,
    pub aliases: IndexSet<String>,
}

impl NoteIdentity {
    pub fn new<I, S>(title: Option<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title,
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// Identity with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            aliases: IndexSet::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    /// Title followed by the explicit aliases, duplicates collapsed.
    pub fn match_keys(&self) -> IndexSet<String> {
        self.title
            .iter()
            .chain(self.aliases.iter())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.aliases.is_empty()
    }
}
