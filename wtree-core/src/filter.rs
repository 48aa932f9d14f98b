use crate::git::Branch;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

/// Matcher used for branch filtering: subsequence based, case-insensitive.
pub fn branch_matcher() -> SkimMatcherV2 {
    SkimMatcherV2::default().ignore_case()
}

/// Rank `candidates` against `query`, best match first.
///
/// An empty query returns the candidates untouched. Equal scores keep the
/// order they had in `candidates`.
pub fn filter_branches(matcher: &SkimMatcherV2, query: &str, candidates: &[Branch]) -> Vec<Branch> {
    if query.is_empty() {
        return candidates.to_vec();
    }

    let mut scored: Vec<(i64, &Branch)> = candidates
        .iter()
        .filter_map(|branch| {
            matcher
                .fuzzy_match(&branch.name, query)
                .map(|score| (score, branch))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, branch)| branch.clone()).collect()
}
