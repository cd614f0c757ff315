//! Property tests for the alias index.
//!
//! Random sequences of updates, removals and renames must leave the index
//! with note → aliases and alias → notes as exact transposes of each other.

use alias_index::{AliasIndex, NoteIdentity};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
enum Op {
    Update {
        path: String,
        title: Option<String>,
        aliases: Vec<String>,
    },
    Remove(String),
    Rename(String, String),
}

// ============================================================================
// Strategies
// ============================================================================

/// A small pool of paths so operations collide often
fn path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Index.md".to_string()),
        Just("proj/Note.md".to_string()),
        Just("proj/sub/Note.md".to_string()),
        Just("archive/Old.md".to_string()),
        Just("x/y/Far.md".to_string()),
    ]
}

fn alias_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Meeting Notes".to_string()),
        Just("Budget".to_string()),
        Just("Plan".to_string()),
        "[a-c]{1,3}",
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (
            path_strategy(),
            proptest::option::of(alias_strategy()),
            proptest::collection::vec(alias_strategy(), 0..4),
        )
            .prop_map(|(path, title, aliases)| Op::Update { path, title, aliases }),
        1 => path_strategy().prop_map(Op::Remove),
        1 => (path_strategy(), path_strategy()).prop_map(|(from, to)| Op::Rename(from, to)),
    ]
}

fn apply(index: &mut AliasIndex, op: &Op) {
    match op {
        Op::Update {
            path,
            title,
            aliases,
        } => index.update(path, NoteIdentity::new(title.clone(), aliases.iter().cloned())),
        Op::Remove(path) => {
            index.remove(path);
        }
        Op::Rename(from, to) => {
            index.rename(from, to);
        }
    }
}

/// alias → notes, rebuilt from the forward view
fn transpose_of_forward(index: &AliasIndex) -> BTreeMap<String, BTreeSet<String>> {
    let mut transposed: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for path in index.paths() {
        for alias in index.aliases(path).into_iter().flatten() {
            transposed
                .entry(alias.clone())
                .or_default()
                .insert(path.to_string());
        }
    }
    transposed
}

fn inverse_view(
    index: &AliasIndex,
    aliases: &BTreeSet<String>,
) -> BTreeMap<String, BTreeSet<String>> {
    aliases
        .iter()
        .filter_map(|alias| {
            let notes: BTreeSet<String> = index
                .notes_for_alias(alias)
                .into_iter()
                .map(str::to_string)
                .collect();
            (!notes.is_empty()).then(|| (alias.clone(), notes))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_index_stays_bidirectionally_consistent(
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let mut index = AliasIndex::new();
        let mut every_alias = BTreeSet::new();

        for op in &ops {
            if let Op::Update { title, aliases, .. } = op {
                every_alias.extend(title.iter().cloned());
                every_alias.extend(aliases.iter().cloned());
            }
            apply(&mut index, op);
            prop_assert!(index.inconsistencies().is_empty(), "{:?}", index.inconsistencies());
        }

        prop_assert_eq!(transpose_of_forward(&index), inverse_view(&index, &every_alias));
    }

    #[test]
    fn prop_update_is_idempotent(
        ops in proptest::collection::vec(op_strategy(), 0..20),
        path in path_strategy(),
        title in proptest::option::of(alias_strategy()),
        aliases in proptest::collection::vec(alias_strategy(), 0..4),
    ) {
        let mut index = AliasIndex::new();
        for op in &ops {
            apply(&mut index, op);
        }

        let identity = NoteIdentity::new(title, aliases);
        index.update(&path, identity.clone());
        let once = transpose_of_forward(&index);
        let len = index.len();

        index.update(&path, identity);
        prop_assert_eq!(transpose_of_forward(&index), once);
        prop_assert_eq!(index.len(), len);
    }

    #[test]
    fn prop_search_never_returns_source_or_duplicates(
        ops in proptest::collection::vec(op_strategy(), 0..30),
        query in alias_strategy(),
        source in path_strategy(),
    ) {
        let mut index = AliasIndex::new();
        for op in &ops {
            apply(&mut index, op);
        }

        for results in [index.search(&query, &source), index.search_linklike(&query, &source)] {
            prop_assert!(!results.contains(&source.as_str()));
            let unique: BTreeSet<_> = results.iter().collect();
            prop_assert_eq!(unique.len(), results.len());
        }
    }

    #[test]
    fn prop_removed_notes_leave_no_trace(
        ops in proptest::collection::vec(op_strategy(), 0..30),
        victim in path_strategy(),
        query in alias_strategy(),
        source in path_strategy(),
    ) {
        let mut index = AliasIndex::new();
        for op in &ops {
            apply(&mut index, op);
        }

        index.remove(&victim);

        prop_assert!(!index.contains(&victim));
        prop_assert!(index.aliases(&victim).is_none());
        for notes in transpose_of_forward(&index).values() {
            prop_assert!(!notes.contains(&victim));
        }
        prop_assert!(index.inconsistencies().is_empty(), "{:?}", index.inconsistencies());

        let victim_name = victim.trim_end_matches(".md");
        for query in [query.as_str(), victim_name] {
            prop_assert!(!index.search(query, &source).contains(&victim.as_str()));
            prop_assert!(!index.search_linklike(query, &source).contains(&victim.as_str()));
        }
    }
}
