//! Case-insensitive match ranking for note titles, aliases and paths.
//!
//! A query is ranked against each match key of a candidate and the best
//! ranking wins. Tiers, best first:
//!
//! | tier | key matched by query `"note"` |
//! |---|---|
//! | `CaseSensitiveEqual` | `note` |
//! | `Equal` | `Note` |
//! | `StartsWith` | `Notebook` |
//! | `WordStartsWith` | `Meeting Notes` |
//! | `Contains` | `Keynote` |
//! | `Acronym` | `New Open Task Entry` (query `"note"`) |
//! | `Matches` | `n-o-t-e` style scattered matches, scored by closeness |

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ranking {
    NoMatch,
    Matches,
    Acronym,
    Contains,
    WordStartsWith,
    StartsWith,
    Equal,
    CaseSensitiveEqual,
}

/// Ranking of one key against a query.
///
/// `closeness` is only meaningful for `Ranking::Matches`, where it lies in
/// `(0, 1]`; every other tier carries `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub ranking: Ranking,
    pub closeness: f64,
}

impl Score {
    pub const NO_MATCH: Score = Score::tier(Ranking::NoMatch);

    pub const fn tier(ranking: Ranking) -> Self {
        Self {
            ranking,
            closeness: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.ranking > Ranking::NoMatch
    }

    /// Whether this score reaches `threshold`.
    pub fn passes(&self, threshold: Ranking) -> bool {
        self.is_match() && self.ranking >= threshold
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ranking
            .cmp(&other.ranking)
            .then_with(|| self.closeness.total_cmp(&other.closeness))
    }
}

/// Rank a single key against `query`.
pub fn rank(key: &str, query: &str) -> Score {
    if query.chars().count() > key.chars().count() {
        return Score::NO_MATCH;
    }
    if key == query {
        return Score::tier(Ranking::CaseSensitiveEqual);
    }

    let key = key.to_lowercase();
    let query = query.to_lowercase();

    if key == query {
        return Score::tier(Ranking::Equal);
    }
    if key.starts_with(&query) {
        return Score::tier(Ranking::StartsWith);
    }
    if key.contains(&format!(" {query}")) {
        return Score::tier(Ranking::WordStartsWith);
    }
    if key.contains(&query) {
        return Score::tier(Ranking::Contains);
    }
    if query.chars().count() == 1 {
        return Score::NO_MATCH;
    }
    if acronym(&key).contains(&query) {
        return Score::tier(Ranking::Acronym);
    }

    closeness(&key, &query)
}

/// Best score of `query` across `keys`, `Score::NO_MATCH` when there are none.
pub fn best_rank<'a, I>(keys: I, query: &str) -> Score
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|key| rank(key, query))
        .max()
        .unwrap_or(Score::NO_MATCH)
}

/// First character of every space or hyphen separated word.
fn acronym(key: &str) -> String {
    key.split(' ')
        .flat_map(|word| word.split('-'))
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Score an in-order scattered match; tighter spreads score higher.
fn closeness(key: &str, query: &str) -> Score {
    let key: Vec<char> = key.chars().collect();
    let query: Vec<char> = query.chars().collect();

    let mut matched = 0usize;
    let mut first = None;
    let mut last = 0usize;
    let mut cursor = 0usize;

    for wanted in &query {
        let Some(offset) = key[cursor..].iter().position(|c| c == wanted) else {
            return Score::NO_MATCH;
        };
        let index = cursor + offset;
        first.get_or_insert(index);
        last = index;
        matched += 1;
        cursor = index + 1;
    }

    let first = first.unwrap_or(0);
    let spread = (last - first).max(1) as f64;
    let in_order = matched as f64 / query.len() as f64;

    Score {
        ranking: Ranking::Matches,
        closeness: in_order * (1.0 / spread),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_for_common_shapes() {
        assert_eq!(rank("Note", "Note").ranking, Ranking::CaseSensitiveEqual);
        assert_eq!(rank("Note", "note").ranking, Ranking::Equal);
        assert_eq!(rank("Notebook", "note").ranking, Ranking::StartsWith);
        assert_eq!(rank("Meeting Notes", "notes").ranking, Ranking::WordStartsWith);
        assert_eq!(rank("Keynote", "note").ranking, Ranking::Contains);
        assert_eq!(rank("New Open Task Entry", "note").ranking, Ranking::Acronym);
        assert_eq!(rank("north-east", "ne").ranking, Ranking::Acronym);
        assert_eq!(rank("Nothing here", "ngh").ranking, Ranking::Matches);
    }

    #[test]
    fn longer_query_never_matches() {
        assert_eq!(rank("abc", "abcd"), Score::NO_MATCH);
    }

    #[test]
    fn single_char_query_requires_substring() {
        assert_eq!(rank("abc", "z"), Score::NO_MATCH);
        assert_eq!(rank("abc", "b").ranking, Ranking::Contains);
    }

    #[test]
    fn out_of_order_chars_do_not_match() {
        assert_eq!(rank("abcdef", "fa"), Score::NO_MATCH);
    }

    #[test]
    fn tighter_scatter_scores_higher() {
        let tight = rank("xaxbx", "ab");
        let loose = rank("xaxxxxxxbx", "ab");
        assert_eq!(tight.ranking, Ranking::Matches);
        assert_eq!(loose.ranking, Ranking::Matches);
        assert!(tight > loose);
    }

    #[test]
    fn empty_query_matches_everything_as_prefix() {
        assert_eq!(rank("Anything", "").ranking, Ranking::StartsWith);
        assert_eq!(rank("", "").ranking, Ranking::CaseSensitiveEqual);
    }

    #[test]
    fn best_rank_takes_strongest_key() {
        let keys = ["projects/Meeting Notes.md", "Meeting Notes", "standup"];
        let score = best_rank(keys, "meeting notes");
        assert_eq!(score.ranking, Ranking::Equal);

        assert_eq!(best_rank(std::iter::empty(), "x"), Score::NO_MATCH);
    }

    #[test]
    fn threshold_filters_weaker_tiers() {
        assert!(rank("Old Meeting Notes", "meeting").passes(Ranking::WordStartsWith));
        assert!(!rank("Keynote", "note").passes(Ranking::WordStartsWith));
        assert!(!Score::NO_MATCH.passes(Ranking::NoMatch));
    }
}
